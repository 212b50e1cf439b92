//! The `tzif_rs` crate decodes the TZif time zone information format.
//!
//! TZif files are the compiled form of the IANA time zone database, found
//! under `/usr/share/zoneinfo` and at `/etc/localtime` on most Unix systems.
//! The format is laid out by [RFC 9636][rfc9636] and the
//! [tzfile manual][tzfile-manual].
//!
//! ```rust,no_run
//! let decoded = tzif_rs::decode_path("/usr/share/zoneinfo/America/New_York").unwrap();
//!
//! let section = decoded.best_section();
//! for transition in section.transitions().take(4) {
//!     let abbr = transition
//!         .local_time_type
//!         .and_then(|t| section.abbreviation(t));
//!     println!("{} {:?}", transition.time, abbr);
//! }
//! println!("{:?}", decoded.posix_tz_string);
//! ```
//!
//! This crate is a decoder only. It exposes the raw fields of a file as plain
//! data and does not resolve local times or evaluate POSIX TZ strings.
//!
//! [rfc9636]: https://datatracker.ietf.org/doc/html/rfc9636
//! [tzfile-manual]: https://man7.org/linux/man-pages/man5/tzfile.5.html
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::redundant_pub_crate,
    clippy::missing_errors_doc,

    // Counts are checked to be non-negative before being widened.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

macro_rules! tzif_ensure {
    ($condition:expr, $err:expr, $($args:tt)+) => {
        if !$condition {
            #[cfg(feature = "log")]
            log::error!($($args)+);
            return Err($err);
        }
    };
}

macro_rules! log_error {
    ($($args:tt)+) => {
        #[cfg(feature = "log")]
        log::error!($($args)+);
    };
}

macro_rules! log_debug {
    ($($args:tt)+) => {
        #[cfg(feature = "log")]
        log::debug!($($args)+);
    };
}

macro_rules! log_trace {
    ($($args:tt)+) => {
        #[cfg(feature = "log")]
        log::trace!($($args)+);
    };
}

pub(crate) use {log_debug, log_error, log_trace, tzif_ensure};

pub mod designation;
pub mod error;
pub mod primitive;
pub mod reader;
pub mod types;

mod decoder;
mod section;

#[doc(inline)]
pub use error::{ErrorKind, TzifError};

pub use decoder::{DecodeOptions, Decoder};
pub use reader::ByteSource;
pub use types::{
    DecodedFile, LeapSecond, LocalTimeType, RawHeader, Section, TimeWidth, Transition, Version,
};

#[cfg(feature = "std")]
pub use reader::IoSource;

/// The `tzif_rs` result type
pub type TzifResult<T> = Result<T, TzifError>;

/// Decodes a TZif file held in memory.
pub fn decode_bytes(bytes: &[u8]) -> TzifResult<DecodedFile> {
    Decoder::new().decode_bytes(bytes)
}

/// Decodes a TZif file from a [`std::io::Read`].
#[cfg(feature = "std")]
pub fn decode_reader<R: std::io::Read>(reader: R) -> TzifResult<DecodedFile> {
    Decoder::new().decode_reader(reader)
}

/// Opens and decodes the TZif file at `path`.
#[cfg(feature = "std")]
pub fn decode_path<P: AsRef<std::path::Path>>(path: P) -> TzifResult<DecodedFile> {
    Decoder::new().decode_path(path)
}
