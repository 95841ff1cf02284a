//! Browser console logging
//!
//! `tracing` output is formatted by `tracing-subscriber` and written to the
//! devtools console, one `console.*` call per event, picked by level.

use std::io;

use anyhow::{anyhow, Result};
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use wasm_bindgen::JsValue;

/// Buffers one formatted event and hands it to the console when dropped
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&self.buffer);
        let message = JsValue::from_str(text.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&message),
            Level::WARN => web_sys::console::warn_1(&message),
            Level::INFO => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
        self.buffer.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

/// [`MakeWriter`] for the devtools console
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

/// Parse a filter directive such as `info` or `euphoria_effects=debug`
pub fn filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|err| anyhow!("invalid log filter `{directive}`: {err}"))
}

/// Install the panic hook and the console subscriber.
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init(directive: &str) -> Result<()> {
    console_error_panic_hook::set_once();

    let subscriber = tracing_subscriber::registry().with(filter(directive)?).with(
        tracing_subscriber::fmt::layer()
            .with_writer(ConsoleMakeWriter)
            .without_time()
            .with_target(false),
    );
    if subscriber.try_init().is_err() {
        tracing::debug!("console logging already initialized");
    }
    Ok(())
}
