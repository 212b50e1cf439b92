//! The sequential byte reader that every decoder stage is built on.

use alloc::{format, vec, vec::Vec};

use crate::{
    primitive::{decode_uint, to_signed},
    TimeWidth, TzifError, TzifResult,
};

/// Largest number of bytes read from a source in one call.
///
/// Counts in a TZif header are untrusted, so a field is read in chunks of
/// this size instead of being allocated up front.
const CHUNK_SIZE: usize = 4096;

/// A forward-only source of bytes.
///
/// `read_exact` must fill `buf` completely or fail. A source that runs out
/// of data returns a [`TzifError`] of kind
/// [`TruncatedInput`][crate::ErrorKind::TruncatedInput]; the reader adds the
/// byte offset and field name afterwards.
pub trait ByteSource {
    /// Fill `buf` from the source, advancing past the bytes read.
    fn read_exact(&mut self, buf: &mut [u8]) -> TzifResult<()>;
}

impl ByteSource for &[u8] {
    fn read_exact(&mut self, buf: &mut [u8]) -> TzifResult<()> {
        if self.len() < buf.len() {
            *self = &[];
            return Err(TzifError::truncated());
        }
        let (head, tail) = self.split_at(buf.len());
        buf.copy_from_slice(head);
        *self = tail;
        Ok(())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_exact(&mut self, buf: &mut [u8]) -> TzifResult<()> {
        (**self).read_exact(buf)
    }
}

/// Adapts any [`std::io::Read`] into a [`ByteSource`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R>(pub R);

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for IoSource<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> TzifResult<()> {
        self.0.read_exact(buf).map_err(TzifError::from)
    }
}

/// A [`ByteSource`] wrapper that tracks the stream position and the name of
/// the field currently being decoded.
#[derive(Debug)]
pub(crate) struct ByteReader<S> {
    source: S,
    offset: u64,
    spans: Vec<&'static str>,
}

impl<S: ByteSource> ByteReader<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            offset: 0,
            spans: vec!["undefined"],
        }
    }

    /// Number of bytes consumed so far.
    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    pub(crate) fn enter(&mut self, name: &'static str) {
        self.spans.push(name);
    }

    pub(crate) fn exit(&mut self) {
        if self.spans.len() > 1 {
            self.spans.pop();
        }
    }

    pub(crate) fn span(&self) -> &'static str {
        self.spans.last().copied().unwrap_or("undefined")
    }

    /// Run `f` with `name` as the current field.
    pub(crate) fn in_field<T>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> TzifResult<T>,
    ) -> TzifResult<T> {
        self.enter(name);
        let result = f(self);
        self.exit();
        result
    }

    /// Attach the current field and the given offset to `err`.
    pub(crate) fn locate(&self, err: TzifError, offset: u64) -> TzifError {
        err.with_field(self.span()).with_offset(offset)
    }

    /// Read exactly `buf.len()` bytes.
    pub(crate) fn read_into(&mut self, buf: &mut [u8]) -> TzifResult<()> {
        let start = self.offset;
        self.source
            .read_exact(buf)
            .map_err(|err| self.locate(err, start))?;
        self.offset += buf.len() as u64;
        Ok(())
    }

    /// Read exactly `n` bytes.
    pub(crate) fn read(&mut self, n: usize) -> TzifResult<Vec<u8>> {
        let start = self.offset;
        let mut bytes = Vec::with_capacity(n.min(CHUNK_SIZE));
        let mut chunk = [0u8; CHUNK_SIZE];
        let mut remaining = n;
        while remaining > 0 {
            let len = remaining.min(CHUNK_SIZE);
            if let Err(err) = self.source.read_exact(&mut chunk[..len]) {
                return Err(self.locate(err, start));
            }
            bytes.extend_from_slice(&chunk[..len]);
            self.offset += len as u64;
            remaining -= len;
        }
        Ok(bytes)
    }

    /// Read exactly `N` bytes into an array.
    pub(crate) fn read_array<const N: usize>(&mut self) -> TzifResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_into(&mut buf)?;
        Ok(buf)
    }

    /// Read `N` bytes and map them through `f`.
    pub(crate) fn read_with<const N: usize, T>(
        &mut self,
        f: impl FnOnce([u8; N]) -> T,
    ) -> TzifResult<T> {
        self.read_array::<N>().map(f)
    }

    pub(crate) fn read_u8(&mut self) -> TzifResult<u8> {
        self.read_with(|[byte]: [u8; 1]| byte)
    }

    /// Read a four byte signed integer.
    pub(crate) fn read_long(&mut self) -> TzifResult<i32> {
        self.read_with(|bytes: [u8; 4]| to_signed(decode_uint(&bytes), 4) as i32)
    }

    /// Read an eight byte signed integer.
    pub(crate) fn read_quad(&mut self) -> TzifResult<i64> {
        self.read_with(|bytes: [u8; 8]| to_signed(decode_uint(&bytes), 8))
    }

    /// Read a transition or leap second instant of the given width.
    pub(crate) fn read_time(&mut self, width: TimeWidth) -> TzifResult<i64> {
        match width {
            TimeWidth::Four => self.read_long().map(i64::from),
            TimeWidth::Eight => self.read_quad(),
        }
    }

    /// Read bytes up to the next `\n`, consuming and discarding the newline.
    ///
    /// A line longer than `max` bytes is an `InvalidFooter` error located
    /// at the first byte past the limit.
    pub(crate) fn read_line(&mut self, max: usize) -> TzifResult<Vec<u8>> {
        let mut line = Vec::new();
        loop {
            match self.read_u8()? {
                b'\n' => return Ok(line),
                _ if line.len() == max => {
                    let err = TzifError::invalid_footer()
                        .with_message(format!("line longer than {max} bytes"));
                    return Err(self.locate(err, self.offset - 1));
                }
                byte => line.push(byte),
            }
        }
    }
}
