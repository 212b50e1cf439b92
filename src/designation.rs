//! Time zone designations (abbreviations).
//!
//! A section stores its designations as one buffer of NUL terminated
//! strings. A local time type names its designation by byte offset into that
//! buffer, so designations can share a suffix: in `"LMT\0AEDT\0"` offset 5
//! resolves to `"EDT"` even though no string in the split list starts there.

use alloc::{borrow::Cow, string::String, vec::Vec};

/// Splits a designation buffer on NUL into its strings, in order.
///
/// Each run of bytes up to a NUL becomes one entry, so adjacent NULs yield an
/// empty entry. A trailing NUL does not add an entry, and a final run with no
/// NUL is kept as-is.
pub fn decode_abbrevs(buffer: &[u8]) -> Vec<String> {
    let mut abbrevs = Vec::new();
    let mut rest = buffer;
    while !rest.is_empty() {
        let (run, tail) = match rest.iter().position(|&b| b == 0) {
            Some(nul) => (&rest[..nul], &rest[nul + 1..]),
            None => (rest, &[][..]),
        };
        abbrevs.push(String::from_utf8_lossy(run).into_owned());
        rest = tail;
    }
    abbrevs
}

/// Resolves the designation that starts at byte `offset` of `buffer`.
///
/// The designation runs to the next NUL, or to the end of the buffer if none
/// follows. Returns `None` when `offset` is outside the buffer.
pub fn designation_at(buffer: &[u8], offset: usize) -> Option<Cow<'_, str>> {
    let tail = buffer.get(offset..).filter(|tail| !tail.is_empty())?;
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    Some(String::from_utf8_lossy(&tail[..end]))
}
