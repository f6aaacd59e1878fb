//! helpers for logging.
use log::LevelFilter;

/// Log to stderr at `info` and above, unless `RUST_LOG` says otherwise.
///
/// If called multiple times in the same process, only applies once.
pub fn log_to_stderr() {
    log_to_stderr_with_level(LevelFilter::Info);
}

/// Log to stderr at `level` and above.  `RUST_LOG`, when set, still wins.
///
/// Only the first call in a process has any effect.  A logger installed by something else is left alone.
pub fn log_to_stderr_with_level(level: LevelFilter) {
    static ONCE: std::sync::Once = std::sync::Once::new();

    ONCE.call_once(|| {
        let _ = env_logger::builder()
            .filter_level(level)
            .parse_default_env()
            .format(|buf, record| {
                use std::io::Write;

                let now = time::OffsetDateTime::now_utc();

                writeln!(
                    buf,
                    "{} {} time={} target={}",
                    record.level(),
                    record.args(),
                    now,
                    record.target()
                )
            })
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_calls_are_harmless() {
        log_to_stderr_with_level(LevelFilter::Debug);
        log_to_stderr();
        log::debug!("still logging");
    }
}
