//! Record prefix rendering and the color policy.

use core::fmt::Write as _;

use crate::scratch::LineBuffer;
use crate::Level;

#[cfg(feature = "color")]
pub(crate) mod color {
    pub const RST: &str = "\x1b[0m";
    pub const TRACE: &str = "\x1b[90m"; // bright black
    pub const DEBUG: &str = "\x1b[36m"; // cyan
    pub const INFO: &str = "\x1b[32m"; // green
    pub const WARN: &str = "\x1b[33m"; // yellow
    pub const ERROR: &str = "\x1b[31m"; // red
    pub const FATAL: &str = "\x1b[35m"; // magenta
}

#[cfg(feature = "color")]
const fn level_color(l: Level) -> &'static str {
    use color::{DEBUG, ERROR, FATAL, INFO, TRACE, WARN};
    match l {
        Level::Trace => TRACE,
        Level::Debug => DEBUG,
        Level::Info => INFO,
        Level::Warn => WARN,
        Level::Error => ERROR,
        Level::Fatal => FATAL,
    }
}

pub(crate) const fn level_name(l: Level) -> &'static str {
    match l {
        Level::Trace => "TRACE",
        Level::Debug => "DEBUG",
        Level::Info => "INFO",
        Level::Warn => "WARN",
        Level::Error => "ERROR",
        Level::Fatal => "FATAL",
    }
}

/// Final path component of a call-site path; handles both separators.
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Whether the next record should carry ANSI codes. Evaluated per call
/// against the *current* target: the stream may have been redirected since
/// the last record, and a cached answer would color a plain file.
#[cfg(feature = "color")]
pub(crate) fn color_enabled() -> bool {
    use std::io::IsTerminal as _;

    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }
    match crate::color_mode() {
        crate::ColorMode::Always => true,
        crate::ColorMode::Never => false,
        crate::ColorMode::Auto => match crate::sink::target() {
            crate::Target::Stdout => std::io::stdout().is_terminal(),
            crate::Target::Stderr => std::io::stderr().is_terminal(),
            crate::Target::Writer => false,
        },
    }
}

/// Render the structured prefix into `w`, fields in fixed order: timestamp,
/// `[LEVEL]`, `[build:TAG]`, `(tid:N)`, `<basename:line>`, `[group]`. Every
/// present field ends with its separator so the message can follow directly.
pub(crate) fn write_prefix(
    w: &mut LineBuffer<'_>,
    l: Level,
    file: &'static str,
    line: u32,
    group: Option<&str>,
) {
    #[cfg(feature = "timestamp")]
    if crate::show_time() {
        let (y, mo, d, h, mi, s, ms) = crate::clock::calendar_parts();
        let _ = write!(w, "{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}.{ms:03} ");
    }

    #[cfg(feature = "color")]
    if color_enabled() {
        let _ = write!(w, "[{}{}{}]\t", level_color(l), level_name(l), color::RST);
    } else {
        let _ = write!(w, "[{}]\t", level_name(l));
    }
    #[cfg(not(feature = "color"))]
    {
        let _ = write!(w, "[{}]\t", level_name(l));
    }

    if crate::show_build_tag() {
        if let Some(tag) = crate::build_tag() {
            let _ = write!(w, "[build:{tag}] ");
        }
    }

    #[cfg(feature = "thread-id")]
    if crate::show_thread_id() {
        let tid = thread_id::get();
        if crate::short_thread_id() {
            let _ = write!(w, "(t#{:06x}) ", tid & 0xFF_FFFF);
        } else {
            let _ = write!(w, "(tid:{tid}) ");
        }
    }

    #[cfg(feature = "file-line")]
    if crate::show_file_line() {
        let name = basename(file);
        if crate::show_line() {
            let _ = write!(w, "<{name}:{line}> ");
        } else {
            let _ = write!(w, "<{name}> ");
        }
    }
    #[cfg(not(feature = "file-line"))]
    let _ = (file, line);

    if crate::show_group() {
        if let Some(g) = group {
            if !g.is_empty() {
                let _ = write!(w, "[{g}] ");
            }
        }
    }
}
