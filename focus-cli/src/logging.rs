//! stderr logging for the `focus` binary.
//!
//! `--log-level` sets one global level. Without it, `FOCUS_LOG` is read as
//! a full filter (`debug`, `focus_core=trace,warn`, ...). Otherwise warn.
//! stdout is left for results so `--json` can be piped.

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "FOCUS_LOG";

pub fn init_logging(level: Option<LevelFilter>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level, env.as_deref()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("init logging: {e}"))
}

/// Unparseable `FOCUS_LOG` directives are skipped rather than fatal.
fn build_filter(level: Option<LevelFilter>, env: Option<&str>) -> EnvFilter {
    match (level, env.map(str::trim)) {
        (Some(level), _) => EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy(""),
        (None, Some(directives)) if !directives.is_empty() => {
            EnvFilter::builder().parse_lossy(directives)
        }
        _ => EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .parse_lossy(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_env() {
        let f = build_filter(Some(LevelFilter::DEBUG), Some("error"));
        assert_eq!(f.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn env_directives_apply_without_flag() {
        let f = build_filter(None, Some("focus_core=trace"));
        assert_eq!(f.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn defaults_to_warn() {
        assert_eq!(build_filter(None, None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(build_filter(None, Some("  ")).max_level_hint(), Some(LevelFilter::WARN));
    }
}
