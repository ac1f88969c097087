use std::io;
use std::sync::{Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Activate buffering. While active, log lines are stored instead of
/// being printed to stderr, so they cannot corrupt the TUI.
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    lock().take().unwrap_or_default()
}

/// Write a message. If buffering is active the message is stored;
/// otherwise it is printed to stderr immediately.
pub fn warn(msg: String) {
    let mut guard = lock();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// `tracing-subscriber` writer that sends each formatted event through the buffer
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedStderr;

impl<'a> MakeWriter<'a> for BufferedStderr {
    type Writer = EventWriter;

    fn make_writer(&'a self) -> Self::Writer {
        EventWriter::default()
    }
}

/// Collects one event; emitted when dropped
#[derive(Debug, Default)]
pub struct EventWriter {
    bytes: Vec<u8>,
}

impl io::Write for EventWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for EventWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.bytes);
        let text = text.trim_end_matches('\n');
        if !text.is_empty() {
            warn(text.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // One test touches the global buffer so parallel tests cannot interleave
    #[test]
    fn test_buffering_and_event_writer() {
        activate();
        warn("first".to_string());
        warn(format!("second {}", 2));
        {
            let mut writer = BufferedStderr.make_writer();
            writer.write_all(b"WARN will_win: ").unwrap();
            writer.write_all(b"fetch failed\n").unwrap();
        }
        {
            // Empty events are dropped
            let _writer = BufferedStderr.make_writer();
        }

        let lines = drain();
        assert_eq!(lines, vec!["first", "second 2", "WARN will_win: fetch failed"]);
        assert!(drain().is_empty());
    }
}
