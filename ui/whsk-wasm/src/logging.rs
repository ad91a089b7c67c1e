//! `tracing` output routed to the browser console. Each event goes to the
//! console method matching its level. The subscriber is built without the
//! `ansi` feature, so lines carry no escape codes.

use std::io::{self, Write};
use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Console method an event is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
    Log,
}

impl From<&Level> for ConsoleMethod {
    fn from(level: &Level) -> Self {
        match *level {
            Level::ERROR => ConsoleMethod::Error,
            Level::WARN => ConsoleMethod::Warn,
            Level::INFO => ConsoleMethod::Info,
            _ => ConsoleMethod::Debug,
        }
    }
}

/// Buffers one formatted event and hands it to the console on drop.
struct ConsoleWriter {
    method: ConsoleMethod,
    buf: Vec<u8>,
}

impl Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end().to_owned();
        if line.is_empty() {
            return;
        }
        match self.method {
            ConsoleMethod::Error => gloo_console::error!(line),
            ConsoleMethod::Warn => gloo_console::warn!(line),
            ConsoleMethod::Info => gloo_console::info!(line),
            ConsoleMethod::Debug => gloo_console::debug!(line),
            ConsoleMethod::Log => gloo_console::log!(line),
        }
    }
}

struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> ConsoleWriter {
        ConsoleWriter {
            method: ConsoleMethod::Log,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> ConsoleWriter {
        ConsoleWriter {
            method: ConsoleMethod::from(meta.level()),
            buf: Vec::new(),
        }
    }
}

/// Install the global subscriber. `level` is an `EnvFilter` directive.
pub fn init(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Console)
        .with_target(false)
        .without_time()
        .try_init();
    if let Err(err) = installed {
        gloo_console::warn!(format!("logging not installed: {err}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_keep_their_console_severity() {
        assert_eq!(ConsoleMethod::from(&Level::ERROR), ConsoleMethod::Error);
        assert_eq!(ConsoleMethod::from(&Level::WARN), ConsoleMethod::Warn);
        assert_eq!(ConsoleMethod::from(&Level::INFO), ConsoleMethod::Info);
        assert_eq!(ConsoleMethod::from(&Level::DEBUG), ConsoleMethod::Debug);
        assert_eq!(ConsoleMethod::from(&Level::TRACE), ConsoleMethod::Debug);
    }
}
