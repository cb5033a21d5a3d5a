//! Tracing output for the browser console.
//!
//! `tracing-subscriber`'s fmt layer writes formatted events through a
//! [`MakeWriter`]; each event gets a fresh [`ConsoleWriter`] that buffers the
//! line and forwards it to the console method matching the event level.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;
use wasm_bindgen::JsValue;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. The filter comes from `LOG_LEVEL` at build time.
pub fn init() {
    let filter = EnvFilter::try_new(option_env!("LOG_LEVEL").unwrap_or(DEFAULT_FILTER))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // wasm32 has no system clock, so no timestamps.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .without_time()
        .with_writer(ConsoleMakeWriter)
        .try_init();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }

    /// Drain the buffered text without the trailing newline the formatter adds.
    fn take_message(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let text = String::from_utf8_lossy(&self.buffer).trim_end().to_string();
        self.buffer.clear();
        Some(text)
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(message) = self.take_message() {
            let message = JsValue::from_str(&message);
            match self.level {
                Level::ERROR => web_sys::console::error_1(&message),
                Level::WARN => web_sys::console::warn_1(&message),
                Level::INFO => web_sys::console::info_1(&message),
                _ => web_sys::console::debug_1(&message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_take_message_trims_newline_and_drains() {
        let mut writer = ConsoleWriter::new(Level::WARN);
        writeln!(writer, " WARN upload: Upload failed: Request aborted").unwrap();

        assert_eq!(
            writer.take_message().as_deref(),
            Some(" WARN upload: Upload failed: Request aborted")
        );
        assert_eq!(writer.take_message(), None);
    }
}
