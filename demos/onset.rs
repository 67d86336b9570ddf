use std::collections::BTreeMap;
use std::time::Duration;

use audio_onsets::{
    AudioOnsetDetection, AudioSampleResult, EntropyOnsetConfig, FluxOnsetConfig, Signal,
    WindowedMatchEvaluator, decaying_bursts, evaluate_onsets,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn main() -> AudioSampleResult<()> {
    // RUST_LOG=audio_onsets=debug shows the detector events.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let sample_rate_hz = 44_100u32;
    let duration = Duration::from_secs(3);

    // Synthetic plucked notes: one decaying burst every 0.5s (120 BPM).
    let starts: Vec<f64> = (0..5).map(|i| 0.25 + i as f64 * 0.5).collect();
    let (signal, _) = decaying_bursts(220.0, &starts, 0.03, duration, sample_rate_hz, 0.8)?;
    let signal = Signal::with_source(signal.samples().to_owned(), sample_rate_hz, "plucks")?;

    let mut estimates = BTreeMap::new();

    let sum_magnitude = signal.flux_onsets(&FluxOnsetConfig::sum_magnitude())?;
    println!("Flux (sum of magnitudes) onsets: {:?}", sum_magnitude.onsets);
    println!("  times (s): {:?}", sum_magnitude.times());
    estimates.insert("sum_magnitude".to_string(), sum_magnitude.times());

    let std_normalized = signal.flux_onsets(&FluxOnsetConfig::std_normalized())?;
    println!("Flux (normalised per-bin) onsets: {:?}", std_normalized.onsets);
    println!("  times (s): {:?}", std_normalized.times());
    estimates.insert("std_normalized".to_string(), std_normalized.times());

    let entropy = signal.entropy_onsets(&EntropyOnsetConfig::new())?;
    println!("Entropy onsets: {:?}", entropy.onsets);
    println!("  times (s): {:?}", entropy.times());
    estimates.insert("entropy".to_string(), entropy.times());

    // Every detector is scored against the same ground truth.
    let targets: BTreeMap<String, Vec<f64>> = estimates
        .keys()
        .map(|name| (name.clone(), starts.clone()))
        .collect();
    let scores = evaluate_onsets(&targets, &estimates, &WindowedMatchEvaluator::new())?;
    for (name, score) in &scores {
        println!(
            "{name:>16}: P={:.2} R={:.2} F={:.2} ({} of {} matched)",
            score.precision, score.recall, score.f_measure, score.matches, score.reference_count
        );
    }

    Ok(())
}
