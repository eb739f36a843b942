//! Headless run of a track reveal.
//!
//! Usage:
//! ```text
//! cargo run --example reveal                        # default config
//! cargo run --example reveal -- config.json         # config from a file
//! RUST_LOG=racetrace=debug cargo run --example reveal
//! ```
//!
//! Simulates a 60 Hz frame loop with a stalled frame and a resize to a
//! portrait viewport halfway through, printing the draw ranges as it goes.

use std::error::Error;

use racetrace::{EngineConfig, MaterialCache, Strand, TrackEngine};

const FRAME: f64 = 1.0 / 60.0;

fn main() -> Result<(), Box<dyn Error>> {
    // Default: WARN for everything, INFO for racetrace.
    // Override with RUST_LOG env var (e.g. RUST_LOG=racetrace=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("reveal=info".parse().unwrap_or_default())
        .add_directive("racetrace=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };

    let materials = MaterialCache::new();
    let material = materials.acquire(&config.material);
    let mut engine = TrackEngine::new(config, material, 1280.0, 720.0)?;

    if let Some(paths) = engine.paths() {
        println!(
            "built {:?} track: turn point {:.3}, turn radius {:.3}",
            paths.orientation, paths.turn_point, paths.turn_radius
        );
    }
    for strand in Strand::ALL {
        if let Some(stop) = engine.stop_ratio(strand) {
            println!("  {} stop ratio {stop:.4}", strand.name());
        }
    }

    let mut frame = 0_u32;
    while !engine.is_finished() {
        frame += 1;
        // One stalled frame; the clamp keeps the reveal from jumping ahead.
        let dt = if frame == 30 { 2.0 } else { FRAME };
        let ranges = engine.advance(dt);

        if frame == 90 && engine.resize(390.0, 844.0)? {
            println!("frame {frame}: resized, progress kept at {:.3}", engine.progress());
        }
        if frame % 20 == 0 {
            let shown: Vec<String> = ranges
                .iter()
                .map(|(strand, range)| {
                    format!("{} {}..{}", strand.name(), range.start, range.end())
                })
                .collect();
            println!(
                "frame {frame:4}: progress {:.3}  {}",
                engine.progress(),
                shown.join("  ")
            );
        }
    }
    println!("finished after {frame} frames");

    engine.dispose();
    println!("material live after dispose: {}", materials.is_live());
    Ok(())
}
