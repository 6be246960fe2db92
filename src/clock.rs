//! Calendar and monotonic clock providers.

use std::sync::OnceLock;
use std::time::Instant;

/// Nanoseconds since a process-wide monotonic epoch.
pub(crate) fn monotonic_ns() -> u64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = EPOCH.get_or_init(Instant::now);
    #[allow(clippy::cast_possible_truncation)]
    let ns = epoch.elapsed().as_nanos() as u64;
    ns
}

/// Current calendar time as `(year, month, day, hour, minute, second, ms)`.
#[cfg(feature = "timestamp")]
pub(crate) fn calendar_parts() -> (i32, u8, u8, u8, u8, u8, u16) {
    let now = now_datetime();
    (
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
        now.millisecond(),
    )
}

// Local offset lookup can fail in multi-threaded processes; fall back to UTC
// rather than erroring out of a log call.
#[cfg(all(feature = "timestamp", feature = "localtime"))]
fn now_datetime() -> time::OffsetDateTime {
    let utc = time::OffsetDateTime::now_utc();
    match time::UtcOffset::current_local_offset() {
        Ok(offset) => utc.to_offset(offset),
        Err(_) => utc,
    }
}

#[cfg(all(feature = "timestamp", not(feature = "localtime")))]
fn now_datetime() -> time::OffsetDateTime {
    time::OffsetDateTime::now_utc()
}
