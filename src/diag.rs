//! Diagnostic sink collaborator.
//!
//! The concrete console (VGA text mode, a VESA framebuffer, a UART) lives outside this crate, the
//! same way the rest of the loader keeps `rinfo!`/`rerror!`/`info!`/`error!` thin wrappers over a
//! swappable `Writer`. The ext2 reader only needs one line per phase transition and one line per
//! error; it never needs full `core::fmt` formatting machinery (no `alloc`, so no `format!`), so
//! the sink trait is kept to plain `&str` messages plus a helper for the one thing that recurs
//! constantly in this code: printing a `u32` as hex.

use numtoa::NumToA;

/// Sink for the one diagnostic line per phase/error that this crate emits.
///
/// Implementations typically forward to a serial port or a framebuffer console; a host-side test
/// build can just push lines into a `Vec<String>` to assert against.
pub trait DiagnosticSink {
    /// Reports a normal phase transition (partition found, superblock decoded, file loaded, ...).
    fn info(&mut self, msg: &str);

    /// Reports a fatal or non-fatal error.
    fn error(&mut self, msg: &str);
}

/// A [`DiagnosticSink`] that discards every message.
///
/// Useful for callers that only care about the `Result`, and for tests that don't want to thread a
/// sink through every fixture.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn info(&mut self, _msg: &str) {}
    fn error(&mut self, _msg: &str) {}
}

/// Formats `value` as a zero-padded, 8-hex-digit string (`0x`-prefixed) into `buf`.
///
/// `buf` must be at least 10 bytes long. Mirrors the `hex_print!` macro used elsewhere in the
/// loader, built on the same `numtoa` crate, but returns the formatted `&str` instead of printing
/// it directly so callers can compose it into a longer diagnostic line.
pub fn format_hex(value: u32, buf: &mut [u8; 10]) -> &str {
    let mut digits = [0u8; 8];
    let rendered = value.numtoa(16, &mut digits);

    buf[0] = b'0';
    buf[1] = b'x';
    let pad = 8 - rendered.len();
    for slot in buf.iter_mut().skip(2).take(pad) {
        *slot = b'0';
    }
    buf[2 + pad..10].copy_from_slice(rendered);

    core::str::from_utf8(&buf[..]).unwrap_or("0x????????")
}

/// Composes `prefix` followed by a space and the hex rendering of `value` into `buf`, returning
/// the combined line as a `&str`.
///
/// `buf` must be at least `prefix.len() + 11` bytes long; if it is too short the line is truncated
/// to whatever fits rather than panicking, since a diagnostic line is best-effort by nature. Used
/// at every call site in [`crate::load`] that needs to report "the offending value" alongside a
/// phase name (an LBA, a feature mask, a decoded block size), per `SPEC_FULL.md` §7.
pub fn line_with_hex<'b>(buf: &'b mut [u8], prefix: &str, value: u32) -> &'b str {
    let mut hex_buf = [0u8; 10];
    let hex = format_hex(value, &mut hex_buf);

    let prefix_bytes = prefix.as_bytes();
    let prefix_len = core::cmp::min(prefix_bytes.len(), buf.len());
    buf[..prefix_len].copy_from_slice(&prefix_bytes[..prefix_len]);

    let mut pos = prefix_len;
    if pos < buf.len() {
        buf[pos] = b' ';
        pos += 1;
    }

    let hex_bytes = hex.as_bytes();
    let hex_len = core::cmp::min(hex_bytes.len(), buf.len() - pos);
    buf[pos..pos + hex_len].copy_from_slice(&hex_bytes[..hex_len]);
    pos += hex_len;

    core::str::from_utf8(&buf[..pos]).unwrap_or(prefix)
}
