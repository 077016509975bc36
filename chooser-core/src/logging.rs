//! src/logging.rs
//!
//! Tracing setup for the chooser binary: a daily rolling file layer plus an
//! optional stderr mirror, both using a compact sequence-numbered format.

use std::{
    fs,
    sync::atomic::{AtomicUsize, Ordering},
};

use compact_str::CompactString;
use tracing::Metadata;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{
    EnvFilter,
    filter::{Directive, ParseError},
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    prelude::*,
};

use crate::config::LoggingConfig;
use crate::error::{ChooserError, CoreResult};

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main`. Keep the returned guard alive
    /// for as long as events should reach the log file.
    pub fn init_tracing(config: &LoggingConfig) -> CoreResult<WorkerGuard> {
        fs::create_dir_all(&config.log_dir)
            .map_err(|e| ChooserError::config_io(&config.log_dir, e))?;

        // daily rolling file appender → <log_dir>/<prefix>.YYYY-MM-DD
        let file = rolling::daily(&config.log_dir, config.file_prefix.as_str());
        let (writer, guard) = tracing_appender::non_blocking(file);

        let file_layer = fmt::layer()
            .event_format(SeqFileMod)
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(Self::filter(&config.level)?);

        // optional stderr layer for live debugging
        let stderr_layer = if config.stderr {
            Some(
                fmt::layer()
                    .event_format(SeqFileMod)
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_filter(Self::filter(&config.level)?),
            )
        } else {
            None
        };

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .try_init()
            .map_err(|e| ChooserError::Logging(CompactString::from(e.to_string())))?;

        Ok(guard)
    }

    /// `RUST_LOG` when set, otherwise the configured level.
    fn filter(level: &str) -> CoreResult<EnvFilter> {
        let directive: Directive = level
            .parse()
            .map_err(|e: ParseError| ChooserError::Logging(CompactString::from(format!("{level}: {e}"))))?;

        Ok(EnvFilter::builder()
            .with_default_directive(directive)
            .from_env_lossy())
    }
}

static SEQ: AtomicUsize = AtomicUsize::new(1);

/// Custom formatter: `[SEQ] LEVEL [file:line mod::path] message`
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // monotonically‑increasing sequence number
        let seq: usize = SEQ.fetch_add(1, Ordering::Relaxed);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {:5} [{}:{} {}] ",
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        // enclosing spans, outermost first
        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(w, "{}: ", span.name())?;
            }
        }

        ctx.field_format().format_fields(w.by_ref(), ev)?;
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_parses() {
        assert!(Logger::filter("debug").is_ok());
        assert!(Logger::filter("chooser_core=trace").is_ok());
    }
}
