#![warn(missing_docs, unsafe_code)]
//! A bounded, allocation-free line logger.
//!
//! Records are formatted into a fixed per-thread scratch buffer (overflow is
//! truncated with a `...` marker, never grown) and written to the shared
//! output target as one contiguous newline-terminated line. Labeled interval
//! timers measure durations and report them through the same pipeline.

use core::fmt::Arguments;
use core::fmt::Write as _;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::OnceLock;

mod clock;
mod format;
mod scratch;
mod sink;
pub mod timer;

pub use scratch::LINE_MAX;
pub use sink::{set_file, set_target, set_writer, target, Target};
pub use timer::ScopeTimer;

use scratch::LineBuffer;

// ===== Levels =====
/// Log levels
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
#[repr(u8)]
pub enum Level {
    /// Trace
    Trace = 0,
    /// Debug
    Debug,
    /// Info
    Info,
    /// Warn
    Warn,
    /// Error
    Error,
    /// Fatal
    Fatal,
}

#[inline]
const fn level_from_u8(x: u8) -> Level {
    match x {
        0 => Level::Trace,
        1 => Level::Debug,
        3 => Level::Warn,
        4 => Level::Error,
        5 => Level::Fatal,
        _ => Level::Info, // sane default
    }
}

/// Error returned when parsing a [`Level`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLevelError;

impl core::str::FromStr for Level {
    type Err = ParseLevelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("trace") {
            Ok(Self::Trace)
        } else if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(Self::Warn)
        } else if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else if s.eq_ignore_ascii_case("fatal") {
            Ok(Self::Fatal)
        } else {
            Err(ParseLevelError)
        }
    }
}

// ===== Compile-time level floor =====
// Call sites below the floor fold to no-ops inside the macros; the highest
// named `min_level_*` feature wins, the default keeps everything.
cfg_if::cfg_if! {
    if #[cfg(feature = "min_level_fatal")] {
        const CT_MIN: Level = Level::Fatal;
    } else if #[cfg(feature = "min_level_error")] {
        const CT_MIN: Level = Level::Error;
    } else if #[cfg(feature = "min_level_warn")] {
        const CT_MIN: Level = Level::Warn;
    } else if #[cfg(feature = "min_level_info")] {
        const CT_MIN: Level = Level::Info;
    } else if #[cfg(feature = "min_level_debug")] {
        const CT_MIN: Level = Level::Debug;
    } else {
        const CT_MIN: Level = Level::Trace;
    }
}

/// Returns `true` if call sites at `l` survive the compile-time floor.
#[inline]
#[must_use]
pub const fn ct_enabled(l: Level) -> bool {
    (l as u8) >= (CT_MIN as u8)
}

// ===== Runtime state =====
static RUNTIME_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);
static COLOR_MODE: AtomicU8 = AtomicU8::new(ColorMode::Auto as u8);
static SHOW_TID: AtomicBool = AtomicBool::new(cfg!(feature = "thread-id"));
static TID_SHORT: AtomicBool = AtomicBool::new(false);
static SHOW_TIME: AtomicBool = AtomicBool::new(cfg!(feature = "timestamp"));
static SHOW_GROUP: AtomicBool = AtomicBool::new(true);
static SHOW_FILE_LINE: AtomicBool = AtomicBool::new(cfg!(feature = "file-line"));
static SHOW_LINE: AtomicBool = AtomicBool::new(true);
static SHOW_BUILD: AtomicBool = AtomicBool::new(false);
static BUILD_TAG: OnceLock<&'static str> = OnceLock::new();

#[inline]
fn rt_enabled(l: Level) -> bool {
    (l as u8) >= RUNTIME_LEVEL.load(Ordering::Relaxed)
}

/// Returns the current logging level
#[inline]
pub fn level() -> Level {
    level_from_u8(RUNTIME_LEVEL.load(Ordering::Relaxed))
}
/// Sets the current logging level; takes effect for subsequent calls only
pub fn set_level(l: Level) {
    RUNTIME_LEVEL.store(l as u8, Ordering::Relaxed);
}
/// Show thread ids
pub fn set_show_thread_id(on: bool) {
    SHOW_TID.store(on, Ordering::Relaxed);
}
/// Print thread ids as the low 24 bits in hex (`t#xxxxxx`) instead of the
/// full decimal id
pub fn set_short_thread_id(on: bool) {
    TID_SHORT.store(on, Ordering::Relaxed);
}
/// Show timestamps
pub fn set_show_time(on: bool) {
    SHOW_TIME.store(on, Ordering::Relaxed);
}
/// Show the call-site field
pub fn set_show_file_line(on: bool) {
    SHOW_FILE_LINE.store(on, Ordering::Relaxed);
}
/// Include the line number in the call-site field (`<file:line>` vs `<file>`)
pub fn set_show_line(on: bool) {
    SHOW_LINE.store(on, Ordering::Relaxed);
}
/// Show group
pub fn set_show_group(on: bool) {
    SHOW_GROUP.store(on, Ordering::Relaxed);
}
/// Include `[build:TAG]` in record prefixes (off by default)
pub fn set_show_build_tag(on: bool) {
    SHOW_BUILD.store(on, Ordering::Relaxed);
}
/// Sets the build tag reported by [`banner`] and by the prefix when
/// [`set_show_build_tag`] is on. The first call wins.
pub fn set_build_tag(tag: &'static str) {
    let _ = BUILD_TAG.set(tag);
}
/// Sets the color mode
pub fn set_color_mode(mode: ColorMode) {
    COLOR_MODE.store(mode as u8, Ordering::Relaxed);
}

#[cfg(feature = "timestamp")]
#[inline]
pub(crate) fn show_time() -> bool {
    SHOW_TIME.load(Ordering::Relaxed)
}
#[cfg(feature = "thread-id")]
#[inline]
pub(crate) fn show_thread_id() -> bool {
    SHOW_TID.load(Ordering::Relaxed)
}
#[cfg(feature = "thread-id")]
#[inline]
pub(crate) fn short_thread_id() -> bool {
    TID_SHORT.load(Ordering::Relaxed)
}
#[cfg(feature = "file-line")]
#[inline]
pub(crate) fn show_file_line() -> bool {
    SHOW_FILE_LINE.load(Ordering::Relaxed)
}
#[cfg(feature = "file-line")]
#[inline]
pub(crate) fn show_line() -> bool {
    SHOW_LINE.load(Ordering::Relaxed)
}
#[inline]
pub(crate) fn show_group() -> bool {
    SHOW_GROUP.load(Ordering::Relaxed)
}
#[inline]
pub(crate) fn show_build_tag() -> bool {
    SHOW_BUILD.load(Ordering::Relaxed)
}
#[inline]
pub(crate) fn build_tag() -> Option<&'static str> {
    BUILD_TAG.get().copied()
}
#[cfg(feature = "color")]
#[inline]
pub(crate) fn color_mode() -> ColorMode {
    color_mode_from_u8(COLOR_MODE.load(Ordering::Relaxed))
}

// ===== Color mode =====
/// Color mode
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum ColorMode {
    /// Auto
    Auto,
    /// Always
    Always,
    /// Never
    Never,
}

#[cfg(feature = "color")]
#[inline]
const fn color_mode_from_u8(x: u8) -> ColorMode {
    match x {
        1 => ColorMode::Always,
        2 => ColorMode::Never,
        _ => ColorMode::Auto,
    }
}

/// Error returned when parsing a [`ColorMode`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseColorModeError;

impl core::str::FromStr for ColorMode {
    type Err = ParseColorModeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("always") {
            Ok(Self::Always)
        } else if s.eq_ignore_ascii_case("never") {
            Ok(Self::Never)
        } else if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            Ok(Self::Auto)
        } else {
            Err(ParseColorModeError)
        }
    }
}

// ===== Environment =====
fn env_bool(s: &str) -> bool {
    s == "1" || s.eq_ignore_ascii_case("true")
}

/// Initialize the logger from environment variables: `LINELOG_LEVEL`,
/// `LINELOG_COLOR`, `LINELOG_SHOW_TID`, `LINELOG_SHOW_TIME`. Unknown values
/// leave the current setting untouched (color falls back to auto).
pub fn init_from_env() {
    if let Ok(s) = std::env::var("LINELOG_LEVEL") {
        set_level(s.parse().unwrap_or_else(|_| level()));
    }
    if let Ok(s) = std::env::var("LINELOG_COLOR") {
        set_color_mode(s.parse().unwrap_or(ColorMode::Auto));
    }
    if let Ok(s) = std::env::var("LINELOG_SHOW_TID") {
        set_show_thread_id(env_bool(&s));
    }
    if let Ok(s) = std::env::var("LINELOG_SHOW_TIME") {
        set_show_time(env_bool(&s));
    }
}

// ===== Emission =====
/// Emit a log record: level gate, prefix + message into the thread's
/// scratch buffer, one contiguous write under the emit lock. The macros are
/// the intended entry points; they capture the call site and apply the
/// compile-time floor before any argument is evaluated.
#[inline]
pub fn emit(l: Level, group: Option<&str>, file: &'static str, line_no: u32, args: Arguments) {
    if !ct_enabled(l) || !rt_enabled(l) {
        return;
    }
    scratch::SCRATCH.with(|cell| match cell.try_borrow_mut() {
        Ok(mut buf) => render_and_write(&mut buf, l, group, file, line_no, args),
        // re-entrant call from a Display impl inside `args`: fall back to a
        // fresh stack buffer instead of aliasing the thread's scratch
        Err(_) => {
            let mut local = [0u8; LINE_MAX];
            render_and_write(&mut local, l, group, file, line_no, args);
        }
    });
}

fn render_and_write(
    buf: &mut [u8; LINE_MAX],
    l: Level,
    group: Option<&str>,
    file: &'static str,
    line_no: u32,
    args: Arguments,
) {
    let mut w = LineBuffer::new(&mut *buf);
    format::write_prefix(&mut w, l, file, line_no, group);
    let _ = w.write_fmt(args);
    let used = w.finish();
    sink::write_record(&buf[..used], l);
}

/// Emits a single informational startup record through the normal pipeline.
pub fn banner() {
    let name = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    match build_tag() {
        Some(tag) => crate::info_group!("linelog", "{name} {ver} (build: {tag})"),
        None => crate::info_group!("linelog", "{name} {ver} ready"),
    }
}

// ===== Macros =====
/// Emit a log message
#[macro_export]
macro_rules! __linelog_log { ($lvl:expr, $grp:expr, $($t:tt)+) => {{ if $crate::ct_enabled($lvl) { $crate::emit($lvl, $grp, file!(), line!(), format_args!($($t)+)) } }} }
/// trace
#[macro_export]
macro_rules! trace { ($($t:tt)+) => { $crate::__linelog_log!($crate::Level::Trace, None, $($t)+) } }
/// debug
#[macro_export]
macro_rules! debug { ($($t:tt)+) => { $crate::__linelog_log!($crate::Level::Debug, None, $($t)+) } }
/// info
#[macro_export]
macro_rules! info  { ($($t:tt)+) => { $crate::__linelog_log!($crate::Level::Info,  None, $($t)+) } }
/// warning
#[macro_export]
macro_rules! warn  { ($($t:tt)+) => { $crate::__linelog_log!($crate::Level::Warn,  None, $($t)+) } }
/// error
#[macro_export]
macro_rules! error { ($($t:tt)+) => { $crate::__linelog_log!($crate::Level::Error, None, $($t)+) } }
/// fatal
#[macro_export]
macro_rules! fatal { ($($t:tt)+) => { $crate::__linelog_log!($crate::Level::Fatal, None, $($t)+) } }
/// trace group
#[macro_export]
macro_rules! trace_group { ($grp:expr, $($t:tt)+) => { $crate::__linelog_log!($crate::Level::Trace, Some($grp), $($t)+) } }
/// debug group
#[macro_export]
macro_rules! debug_group { ($grp:expr, $($t:tt)+) => { $crate::__linelog_log!($crate::Level::Debug, Some($grp), $($t)+) } }
/// info group
#[macro_export]
macro_rules! info_group  { ($grp:expr, $($t:tt)+) => { $crate::__linelog_log!($crate::Level::Info,  Some($grp), $($t)+) } }
/// warning group
#[macro_export]
macro_rules! warn_group  { ($grp:expr, $($t:tt)+) => { $crate::__linelog_log!($crate::Level::Warn,  Some($grp), $($t)+) } }
/// error group
#[macro_export]
macro_rules! error_group { ($grp:expr, $($t:tt)+) => { $crate::__linelog_log!($crate::Level::Error, Some($grp), $($t)+) } }
/// fatal group
#[macro_export]
macro_rules! fatal_group { ($grp:expr, $($t:tt)+) => { $crate::__linelog_log!($crate::Level::Fatal, Some($grp), $($t)+) } }

/// Start a labeled interval timer at this call site
#[macro_export]
macro_rules! start_time { ($label:expr) => { $crate::timer::timer_start(file!(), line!(), $label) } }
/// End a labeled interval timer and report its duration
#[macro_export]
macro_rules! end_time { ($label:expr) => { $crate::timer::timer_end(file!(), line!(), $label) } }

/// Time a scope (RAII form) or a block; the end record is emitted on scope
/// exit, early returns included
#[macro_export]
macro_rules! scope_time {
    ($label:expr) => {
        let _linelog_scope_timer = $crate::ScopeTimer::new_at($label, file!(), line!());
    };
    ($label:expr, $body:block) => {{
        let _linelog_scope_timer = $crate::ScopeTimer::new_at($label, file!(), line!());
        $body
    }};
}
