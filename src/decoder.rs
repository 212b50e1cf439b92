//! The top level TZif file decoder.

use alloc::{format, string::String};

#[cfg(feature = "std")]
use std::path::Path;

use crate::{
    reader::{ByteReader, ByteSource},
    section::{read_section, validate},
    types::{DecodedFile, Section, TimeWidth, Version},
    TzifError, TzifResult,
};

/// Longest TZ string accepted in the footer.
const MAX_FOOTER_LEN: usize = 1024;

/// Options that control how strictly a file is checked.
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Validate each section after it is read.
    ///
    /// When set, a section is rejected if a transition names a missing local
    /// time type, a designation index is outside the designation buffer,
    /// transitions or leap seconds are out of order, or an indicator count is
    /// neither zero nor the type count.
    pub strict: bool,
}

impl DecodeOptions {
    /// Options for strict decoding.
    #[must_use]
    pub const fn strict() -> Self {
        Self { strict: true }
    }
}

/// A TZif decoder.
///
/// A `Decoder` holds no state besides its options, so one decoder can be
/// shared across threads decoding independent files.
///
/// ```rust
/// use tzif_rs::{Decoder, DecodeOptions};
///
/// let mut bytes = b"TZif".to_vec();
/// bytes.push(0);
/// bytes.extend_from_slice(&[0; 15]);
/// for count in [0i32, 0, 0, 0, 1, 4] {
///     bytes.extend_from_slice(&count.to_be_bytes());
/// }
/// bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
/// bytes.extend_from_slice(b"UTC\0");
///
/// let decoded = Decoder::with_options(DecodeOptions::strict())
///     .decode_bytes(&bytes)
///     .unwrap();
/// let section = decoded.best_section();
/// assert_eq!(section.abbreviation(&section.local_time_types[0]).as_deref(), Some("UTC"));
/// assert!(decoded.extended.is_none());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    /// Creates a decoder with default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            options: DecodeOptions { strict: false },
        }
    }

    /// Creates a decoder with the provided options.
    #[must_use]
    pub const fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Returns this decoder's options.
    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Decodes a TZif file from `source`.
    ///
    /// The legacy section is always read. When the version marks an
    /// extended file, the eight byte section and the footer follow.
    pub fn decode<S: ByteSource>(&self, source: S) -> TzifResult<DecodedFile> {
        let mut reader = ByteReader::new(source);

        let legacy = self.read_section(&mut reader, TimeWidth::Four)?;
        let magic = legacy.header.magic;
        let version = Version::from_byte(legacy.header.version)
            .ok_or_else(|| {
                TzifError::unsupported_version()
                    .with_field("version")
                    .with_offset(legacy.offset + 4)
            })?;

        if !version.is_extended() {
            crate::log_debug!("decoded {version:?} file in {} bytes", reader.offset());
            return Ok(DecodedFile {
                magic,
                version,
                legacy,
                extended: None,
                posix_tz_string: None,
            });
        }

        let extended = self.read_section(&mut reader, TimeWidth::Eight)?;
        let posix_tz_string = read_footer(&mut reader)?;
        crate::log_debug!(
            "decoded {version:?} file in {} bytes, footer {posix_tz_string:?}",
            reader.offset()
        );

        Ok(DecodedFile {
            magic,
            version,
            legacy,
            extended: Some(extended),
            posix_tz_string: Some(posix_tz_string),
        })
    }

    /// Decodes a TZif file held in memory.
    pub fn decode_bytes(&self, bytes: &[u8]) -> TzifResult<DecodedFile> {
        self.decode(bytes)
    }

    /// Decodes a TZif file from a [`std::io::Read`].
    #[cfg(feature = "std")]
    pub fn decode_reader<R: std::io::Read>(&self, reader: R) -> TzifResult<DecodedFile> {
        self.decode(crate::reader::IoSource(reader))
    }

    /// Opens and decodes the TZif file at `path`.
    ///
    /// The file is closed before this returns, whether decoding succeeded or not.
    #[cfg(feature = "std")]
    pub fn decode_path<P: AsRef<Path>>(&self, path: P) -> TzifResult<DecodedFile> {
        let path = path.as_ref();
        crate::log_debug!("decoding {}", path.display());
        let file = std::fs::File::open(path).map_err(|err| {
            TzifError::from(err).with_field("path").with_message(format!(
                "could not open {}",
                path.display()
            ))
        })?;
        self.decode_reader(std::io::BufReader::new(file))
    }

    fn read_section<S: ByteSource>(
        &self,
        reader: &mut ByteReader<S>,
        width: TimeWidth,
    ) -> TzifResult<Section> {
        let section = read_section(reader, width)?;
        if self.options.strict {
            validate(&section)?;
        }
        Ok(section)
    }
}

/// Reads the newline enclosed POSIX TZ string that ends an extended file.
fn read_footer<S: ByteSource>(reader: &mut ByteReader<S>) -> TzifResult<String> {
    let start = reader.offset();
    reader.in_field("footer", |r| {
        let opening = r.read_u8()?;
        if opening != b'\n' {
            let err = TzifError::invalid_footer()
                .with_message(format!("expected a newline, found {opening:#04x}"));
            return Err(r.locate(err, start));
        }
        let rule = r.read_line(MAX_FOOTER_LEN)?;
        String::from_utf8(rule).map_err(|_| {
            r.locate(
                TzifError::invalid_footer().with_message("TZ string is not UTF-8"),
                start + 1,
            )
        })
    })
}
