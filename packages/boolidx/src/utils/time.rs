use std::time::Instant;

use log::info;

/// No-op unless `--perf` handed out an instant
pub fn print_time_elapsed(instant: &Option<Instant>, phase: &str) {
    if let Some(instant) = instant {
        let elapsed = instant.elapsed().as_secs_f64();
        info!("({}) {} mins {:.3} seconds elapsed.", phase, (elapsed as u32) / 60, elapsed % 60.0);
    }
}
