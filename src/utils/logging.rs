use std::{path::Path, sync::LazyLock};

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const LOG_PREFIX: &str = "tasktally";
const KEPT_LOG_FILES: usize = 5;
const DEFAULT_LEVEL: &str = "info";

/// Filter directive for this crate. An explicit level wins over `RUST_LOG`.
fn crate_directive(log_level: Option<LevelFilter>, env_level: Option<String>) -> String {
    let level = match (log_level, env_level) {
        (Some(level), _) => level.to_string(),
        (None, Some(level)) if !level.trim().is_empty() => level,
        _ => DEFAULT_LEVEL.to_string(),
    };
    format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
}

/// Sets up logging into daily files under `log_dir`. Console output is only produced when
/// `show_std` is set, since regular command output shares stdout.
pub fn enable_logging(log_dir: &Path, log_level: Option<LevelFilter>, show_std: bool) -> Result<()> {
    let files = Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(LOG_PREFIX)
        .build(log_dir)
        .with_context(|| format!("Failed to create log files in {log_dir:?}"))?;
    let console = std::io::stdout.with_filter(move |_| show_std);

    let directive = crate_directive(log_level, std::env::var("RUST_LOG").ok());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(console.and(files))
        .pretty()
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .try_init();
});

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::crate_directive;

    #[test]
    fn test_crate_directive_precedence() {
        assert_eq!(
            crate_directive(Some(LevelFilter::TRACE), Some("warn".into())),
            "tasktally=trace"
        );
        assert_eq!(crate_directive(None, Some("warn".into())), "tasktally=warn");
        assert_eq!(crate_directive(None, Some(" ".into())), "tasktally=info");
        assert_eq!(crate_directive(None, None), "tasktally=info");
    }
}
