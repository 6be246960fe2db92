#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

// Global lock to serialize tests (logger has global state)
pub fn test_lock() -> &'static Mutex<()> {
    static L: OnceLock<Mutex<()>> = OnceLock::new();
    L.get_or_init(|| Mutex::new(()))
}

#[derive(Clone)]
struct Mem(Arc<Mutex<Vec<u8>>>);
impl Write for Mem {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(bytes);
        Ok(bytes.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Install a fresh in-memory sink; the returned buffer sees only records
/// emitted after this call.
pub fn attach_mem_sink() -> Arc<Mutex<Vec<u8>>> {
    let buf = Arc::new(Mutex::new(Vec::new()));
    linelog::set_writer(Box::new(Mem(buf.clone())));
    buf
}

/// Deterministic output: no time/tid, everything else at defaults, TRACE
/// threshold.
pub fn reset_runtime() {
    linelog::set_show_time(false);
    linelog::set_show_thread_id(false);
    linelog::set_short_thread_id(false);
    linelog::set_show_file_line(true);
    linelog::set_show_line(true);
    linelog::set_show_group(true);
    linelog::set_show_build_tag(false);
    linelog::set_color_mode(linelog::ColorMode::Auto);
    linelog::set_level(linelog::Level::Trace);
}

/// Extract lines from buffer
/// # Panics
pub fn lines_from(buf: &Arc<Mutex<Vec<u8>>>) -> Vec<String> {
    let bytes = buf.lock().unwrap().clone();
    String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(std::string::ToString::to_string)
        .collect()
}

/// Whole captured output as text
/// # Panics
pub fn text_from(buf: &Arc<Mutex<Vec<u8>>>) -> String {
    String::from_utf8(buf.lock().unwrap().clone()).unwrap()
}
