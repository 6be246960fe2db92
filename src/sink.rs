//! Shared output target and the emit lock serializing concurrent writers.

use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::Mutex;

use crate::Level;

/// Output target
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Target {
    /// stdout
    Stdout,
    /// stderr
    Stderr,
    /// custom writer installed via [`set_writer`]
    Writer,
}

static TARGET: AtomicU8 = AtomicU8::new(Target::Stderr as u8);
static WRITER: Mutex<Option<Box<dyn Write + Send>>> = Mutex::new(None);

const fn target_from_u8(x: u8) -> Target {
    match x {
        0 => Target::Stdout,
        2 => Target::Writer,
        _ => Target::Stderr,
    }
}

/// Redirects subsequent records to `t`. Records already written stay where
/// they went; in-flight records land wherever the target was when their
/// write began.
pub fn set_target(t: Target) {
    TARGET.store(t as u8, Ordering::Relaxed);
}

/// Returns the current output target.
#[inline]
pub fn target() -> Target {
    target_from_u8(TARGET.load(Ordering::Relaxed))
}

/// Installs (or replaces) the custom writer and points the target at it.
pub fn set_writer(w: Box<dyn Write + Send>) {
    *WRITER.lock() = Some(w);
    set_target(Target::Writer);
}

/// Sets the output target to a file, opened for appending.
/// # Errors
/// Returns an error if the file cannot be opened for writing.
pub fn set_file(path: impl AsRef<Path>) -> io::Result<()> {
    let f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    set_writer(Box::new(f));
    Ok(())
}

cfg_if::cfg_if! {
    if #[cfg(feature = "lock-spin")] {
        use std::sync::atomic::AtomicBool;

        /// Bounded busy-wait iterations before yielding the CPU.
        pub const SPIN_ITERS: u32 = 100;

        static EMIT_FLAG: AtomicBool = AtomicBool::new(false);

        fn with_emit_lock<R>(f: impl FnOnce() -> R) -> R {
            let mut spins = 0u32;
            while EMIT_FLAG.swap(true, Ordering::Acquire) {
                spins += 1;
                if spins >= SPIN_ITERS {
                    spins = 0;
                    std::thread::yield_now();
                } else {
                    std::hint::spin_loop();
                }
            }
            let out = f();
            EMIT_FLAG.store(false, Ordering::Release);
            out
        }
    } else if #[cfg(feature = "lock-none")] {
        fn with_emit_lock<R>(f: impl FnOnce() -> R) -> R {
            f()
        }
    } else {
        static EMIT_LOCK: Mutex<()> = Mutex::new(());

        fn with_emit_lock<R>(f: impl FnOnce() -> R) -> R {
            let _g = EMIT_LOCK.lock();
            f()
        }
    }
}

/// Writes one formatted record to the current target as a single contiguous
/// unit. `write_all` retries interrupted writes; any other failure is
/// dropped without reaching the caller. Fatal records are followed by a
/// best-effort flush.
pub(crate) fn write_record(bytes: &[u8], l: Level) {
    let flush = l == Level::Fatal;
    with_emit_lock(|| match target() {
        Target::Stdout => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let _ = out.write_all(bytes);
            if flush {
                let _ = out.flush();
            }
        }
        Target::Stderr => {
            let stderr = io::stderr();
            let mut out = stderr.lock();
            let _ = out.write_all(bytes);
            if flush {
                let _ = out.flush();
            }
        }
        Target::Writer => {
            let mut slot = WRITER.lock();
            if let Some(w) = slot.as_mut() {
                let _ = w.write_all(bytes);
                if flush {
                    let _ = w.flush();
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_round_trips_through_u8() {
        for t in [Target::Stdout, Target::Stderr, Target::Writer] {
            assert_eq!(target_from_u8(t as u8), t);
        }
    }
}
