//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`; user-facing activity lines
//! travel separately through the `ActivityLog` port.

use tracing::{debug, trace};

/// Filter directive for a `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn,equipflow=info",
        1 => "equipflow=debug,info",
        2 => "trace,hyper=info,reqwest=info",
        _ => "trace",
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the verbosity flag.
pub fn init_logging(verbose: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_thread_ids(verbose >= 3)
        .with_line_number(verbose >= 3)
        .init();

    debug!("equipflow started with verbosity level: {}", verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_get_noisier() {
        assert!(log_level(0).contains("equipflow=info"));
        assert!(log_level(1).contains("equipflow=debug"));
        assert_eq!(log_level(9), "trace");
        for verbose in 0..4 {
            assert!(tracing_subscriber::EnvFilter::try_new(log_level(verbose)).is_ok());
        }
    }
}
