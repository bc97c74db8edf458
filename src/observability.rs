//! Logging hooks for the symbol codec.
//!
//! All diagnostics go through the `log` facade so the storage engine's own
//! logger picks them up. `enable_verbose_logging` is a convenience for tools
//! and tests that have no logger of their own.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use crate::error::Result;

/// Logs a structured key-value metric line at debug level, only in debug builds.
///
/// # Example
/// ```
/// use symdb_codec::log_metric;
/// let width = 8;
/// log_metric!("event"="strings_block_encoded", "width"=&width);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            $crate::__log::debug!("SYMDB_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` at `Debug` level, writing to stderr or appending
/// to `log_file`. Only the first call has any effect.
pub fn enable_verbose_logging(log_file: Option<&Path>) -> Result<()> {
    let target = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Debug);

        // Just the level and the message.
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_verbose_logging_is_idempotent() {
        enable_verbose_logging(None).unwrap();
        enable_verbose_logging(None).unwrap();
        log_metric!("event" = "observability_test", "value" = 1);
        assert!(log::max_level() >= LevelFilter::Debug);
    }
}
