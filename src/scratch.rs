//! Fixed-capacity, thread-owned formatting buffer.

use core::cell::RefCell;
use core::fmt;

/// Capacity of one formatted record, terminating newline included.
pub const LINE_MAX: usize = 1024;

const MARKER: &[u8; 3] = b"...";

thread_local! {
    pub(crate) static SCRATCH: RefCell<[u8; LINE_MAX]> = const { RefCell::new([0; LINE_MAX]) };
}

/// Write cursor over a caller-owned `[u8; LINE_MAX]`. Writes past the end
/// mark the record truncated instead of growing; [`LineBuffer::finish`]
/// seals the record (truncation marker, exactly one trailing newline) and
/// returns the used length, which never exceeds `LINE_MAX`.
pub(crate) struct LineBuffer<'a> {
    buf: &'a mut [u8; LINE_MAX],
    pos: usize,
    truncated: bool,
}

impl<'a> LineBuffer<'a> {
    pub(crate) fn new(buf: &'a mut [u8; LINE_MAX]) -> Self {
        Self {
            buf,
            pos: 0,
            truncated: false,
        }
    }

    pub(crate) fn finish(self) -> usize {
        let Self {
            buf,
            mut pos,
            truncated,
        } = self;
        if truncated {
            // Marker plus newline must still land within capacity; back up to
            // a UTF-8 boundary so the overwrite cannot split a code point.
            let mut at = pos.min(LINE_MAX - MARKER.len() - 1);
            while at > 0 && at < pos && (buf[at] & 0xC0) == 0x80 {
                at -= 1;
            }
            buf[at..at + MARKER.len()].copy_from_slice(MARKER);
            pos = at + MARKER.len();
        }
        if pos == 0 || buf[pos - 1] != b'\n' {
            if pos < LINE_MAX {
                buf[pos] = b'\n';
                pos += 1;
            } else {
                buf[LINE_MAX - 1] = b'\n';
            }
        }
        pos
    }
}

impl fmt::Write for LineBuffer<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        let avail = LINE_MAX - self.pos;
        if s.len() <= avail {
            self.buf[self.pos..self.pos + s.len()].copy_from_slice(s.as_bytes());
            self.pos += s.len();
        } else {
            let mut cut = avail;
            while cut > 0 && !s.is_char_boundary(cut) {
                cut -= 1;
            }
            self.buf[self.pos..self.pos + cut].copy_from_slice(&s.as_bytes()[..cut]);
            self.pos += cut;
            self.truncated = true;
        }
        Ok(())
    }
}
