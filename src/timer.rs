//! Labeled interval timers over a fixed per-thread slot table.
//!
//! A label is hashed to a 64-bit key; `start`/`end` pair up through the key.
//! Two distinct labels that hash to the same key share a slot, so a
//! mismatched `end` would report against the wrong label. That collision is
//! an accepted rare failure mode, not a detected error.

use core::cell::RefCell;
use core::fmt;

use crate::clock;
use crate::Level;

/// Timer slots available per thread; a start beyond this emits a warning.
pub const TIMER_SLOTS: usize = 16;

/// Elapsed times below this report in nanoseconds.
pub const TIMER_NS_MAX: u64 = 1_000;
/// Elapsed times below this (and at least [`TIMER_NS_MAX`]) report in
/// microseconds.
pub const TIMER_US_MAX: u64 = 1_000_000;
/// Elapsed times below this report in milliseconds, beyond it in seconds.
pub const TIMER_MS_MAX: u64 = 1_000_000_000;
/// Unit label for the microsecond rung.
pub const TIMER_UNIT_US: &str = "µs";

const TIMER_GROUP: &str = "timer";

#[derive(Clone, Copy)]
struct TimerSlot {
    key: u64,
    start: u64,
    used: bool,
}

const FREE: TimerSlot = TimerSlot {
    key: 0,
    start: 0,
    used: false,
};

thread_local! {
    static TIMERS: RefCell<[TimerSlot; TIMER_SLOTS]> = const { RefCell::new([FREE; TIMER_SLOTS]) };
}

// FNV-1a; stable across platforms so colliding labels collide everywhere.
fn hash_label(label: &str) -> u64 {
    let mut h = 0xcbf2_9ce4_8422_2325_u64;
    for b in label.bytes() {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h
}

/// Starts (or restarts) the timer for `label`. Prefer the [`start_time!`]
/// macro, which captures the call site.
///
/// [`start_time!`]: crate::start_time
pub fn timer_start(file: &'static str, line: u32, label: &str) {
    let key = hash_label(label);
    let started = TIMERS.with(|t| {
        let mut slots = t.borrow_mut();
        let idx = slots
            .iter()
            .position(|s| s.used && s.key == key)
            .or_else(|| slots.iter().position(|s| !s.used));
        match idx {
            Some(i) => {
                slots[i] = TimerSlot {
                    key,
                    start: clock::monotonic_ns(),
                    used: true,
                };
                true
            }
            None => false,
        }
    });
    if !started {
        crate::emit(
            Level::Warn,
            Some(TIMER_GROUP),
            file,
            line,
            format_args!("no free timer slots (capacity {TIMER_SLOTS})"),
        );
    }
}

/// Ends the timer for `label` and reports its duration at Debug severity.
/// Prefer the [`end_time!`] macro, which captures the call site.
///
/// [`end_time!`]: crate::end_time
pub fn timer_end(file: &'static str, line: u32, label: &str) {
    let key = hash_label(label);
    let start = TIMERS.with(|t| {
        let mut slots = t.borrow_mut();
        slots.iter_mut().find(|s| s.used && s.key == key).map(|s| {
            s.used = false;
            s.start
        })
    });
    match start {
        Some(t0) => {
            let dt = clock::monotonic_ns().saturating_sub(t0);
            crate::emit(
                Level::Debug,
                Some(TIMER_GROUP),
                file,
                line,
                format_args!("[{}]: {label}", Elapsed(dt)),
            );
        }
        None => crate::emit(
            Level::Warn,
            Some(TIMER_GROUP),
            file,
            line,
            format_args!("end_time for unknown label: {label}"),
        ),
    }
}

/// Elapsed nanoseconds rendered through the four-way unit ladder.
struct Elapsed(u64);

impl fmt::Display for Elapsed {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = self.0;
        if ns < TIMER_NS_MAX {
            write!(f, "{ns} ns")
        } else if ns < TIMER_US_MAX {
            write!(f, "{:.3} {TIMER_UNIT_US}", ns as f64 / 1e3)
        } else if ns < TIMER_MS_MAX {
            write!(f, "{:.3} ms", ns as f64 / 1e6)
        } else {
            write!(f, "{:.6} s", ns as f64 / 1e9)
        }
    }
}

/// Guard that ends the labeled interval when dropped, early exits included.
/// Created by the [`scope_time!`] macro.
///
/// [`scope_time!`]: crate::scope_time
pub struct ScopeTimer {
    label: &'static str,
    file: &'static str,
    line: u32,
}

impl ScopeTimer {
    /// Starts the interval for `label`, recording the call site.
    #[inline]
    #[must_use]
    pub fn new_at(label: &'static str, file: &'static str, line: u32) -> Self {
        timer_start(file, line, label);
        Self { label, file, line }
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        timer_end(self.file, self.line, self.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_discriminates() {
        assert_eq!(hash_label("startup"), hash_label("startup"));
        assert_ne!(hash_label("startup"), hash_label("shutdown"));
        // FNV-1a of the empty string is the offset basis
        assert_eq!(hash_label(""), 0xcbf2_9ce4_8422_2325);
    }

    #[test]
    fn elapsed_picks_units_by_ladder() {
        assert_eq!(format!("{}", Elapsed(500)), "500 ns");
        assert_eq!(format!("{}", Elapsed(1_500)), "1.500 µs");
        assert_eq!(format!("{}", Elapsed(5_250_000)), "5.250 ms");
        assert_eq!(format!("{}", Elapsed(2_000_000_000)), "2.000000 s");
    }

    #[test]
    fn ladder_boundaries_round_down() {
        assert_eq!(format!("{}", Elapsed(999)), "999 ns");
        assert_eq!(format!("{}", Elapsed(1_000)), "1.000 µs");
        assert_eq!(format!("{}", Elapsed(999_999)), "999.999 µs");
        assert_eq!(format!("{}", Elapsed(1_000_000)), "1.000 ms");
        assert_eq!(format!("{}", Elapsed(1_000_000_000)), "1.000000 s");
    }
}
