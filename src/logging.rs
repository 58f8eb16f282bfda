//! Logging setup using the `log` facade and `env_logger`.
//!
//! Level selection, highest priority first:
//! 1. `RUST_LOG`, if set
//! 2. `--quiet` (errors only)
//! 3. `-v` (debug) / `-vv` (trace)
//! 4. Info
//!
//! Logs go to stderr. Debug builds include a timestamp and, when verbose,
//! the module path; release builds print level and message only.

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize logging from CLI verbosity flags.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();
    let from_env = env::var("RUST_LOG").is_ok();

    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        return;
    }

    if from_env {
        log::debug!("Logging configured from RUST_LOG");
    } else {
        log::debug!(
            "Logging initialized at level {:?}",
            determine_level(verbose, quiet)
        );
    }
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        if verbose >= 1 {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        }
    });
}

#[cfg(not(debug_assertions))]
fn configure_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let style = buf.default_level_style(record.level());
        writeln!(buf, "{style}{:<5}{style:#} {}", record.level(), record.args())
    });
}
