//! This module implements `TzifError`.

use alloc::borrow::Cow;
use core::fmt;

/// `TzifError`'s error type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ErrorKind {
    /// The first four bytes are not `TZif`.
    BadMagic,
    /// The version byte is not one of the recognized versions.
    UnsupportedVersion,
    /// The stream ended before a field was complete.
    TruncatedInput,
    /// A section declared zero local time types.
    InvalidTypeCount,
    /// A header count was negative.
    InvalidCount,
    /// A local time type designation index points outside the designation buffer.
    AbbrevIndexOutOfRange,
    /// A transition references a local time type that does not exist.
    TransitionTypeOutOfRange,
    /// Transition times are not in ascending order.
    UnsortedTransitions,
    /// Leap second occurrences are not in strictly ascending order.
    UnsortedLeapSeconds,
    /// A standard/wall or UT/local indicator count is neither zero nor the type count.
    InvalidIndicatorCount,
    /// The footer is not a newline enclosed UTF-8 string.
    InvalidFooter,
    /// The underlying stream failed for a reason other than end of input.
    #[default]
    Io,
}

impl ErrorKind {
    /// Returns the string representation for the current `ErrorKind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadMagic => "BadMagic",
            Self::UnsupportedVersion => "UnsupportedVersion",
            Self::TruncatedInput => "TruncatedInput",
            Self::InvalidTypeCount => "InvalidTypeCount",
            Self::InvalidCount => "InvalidCount",
            Self::AbbrevIndexOutOfRange => "AbbrevIndexOutOfRange",
            Self::TransitionTypeOutOfRange => "TransitionTypeOutOfRange",
            Self::UnsortedTransitions => "UnsortedTransitions",
            Self::UnsortedLeapSeconds => "UnsortedLeapSeconds",
            Self::InvalidIndicatorCount => "InvalidIndicatorCount",
            Self::InvalidFooter => "InvalidFooter",
            Self::Io => "Io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/// The error type returned by every decode operation.
///
/// A `TzifError` records the kind of failure together with the absolute
/// byte offset of the field that failed and that field's name, so a
/// corrupted file can be diagnosed without re-reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TzifError {
    kind: ErrorKind,
    offset: u64,
    field: &'static str,
    msg: Cow<'static, str>,
}

impl TzifError {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            offset: 0,
            field: "",
            msg: Cow::Borrowed(""),
        }
    }

    /// Create a bad magic error.
    #[must_use]
    pub fn bad_magic() -> Self {
        Self::new(ErrorKind::BadMagic)
    }

    /// Create an unsupported version error.
    #[must_use]
    pub fn unsupported_version() -> Self {
        Self::new(ErrorKind::UnsupportedVersion)
    }

    /// Create a truncated input error.
    #[must_use]
    pub fn truncated() -> Self {
        Self::new(ErrorKind::TruncatedInput)
    }

    /// Create an invalid type count error.
    #[must_use]
    pub fn invalid_type_count() -> Self {
        Self::new(ErrorKind::InvalidTypeCount)
    }

    /// Create an invalid (negative) count error.
    #[must_use]
    pub fn invalid_count() -> Self {
        Self::new(ErrorKind::InvalidCount)
    }

    /// Create an abbreviation index out of range error.
    #[must_use]
    pub fn abbrev_out_of_range() -> Self {
        Self::new(ErrorKind::AbbrevIndexOutOfRange)
    }

    /// Create a transition type out of range error.
    #[must_use]
    pub fn transition_type_out_of_range() -> Self {
        Self::new(ErrorKind::TransitionTypeOutOfRange)
    }

    /// Create an unsorted transitions error.
    #[must_use]
    pub fn unsorted_transitions() -> Self {
        Self::new(ErrorKind::UnsortedTransitions)
    }

    /// Create an unsorted leap seconds error.
    #[must_use]
    pub fn unsorted_leap_seconds() -> Self {
        Self::new(ErrorKind::UnsortedLeapSeconds)
    }

    /// Create an invalid indicator count error.
    #[must_use]
    pub fn invalid_indicator_count() -> Self {
        Self::new(ErrorKind::InvalidIndicatorCount)
    }

    /// Create an invalid footer error.
    #[must_use]
    pub fn invalid_footer() -> Self {
        Self::new(ErrorKind::InvalidFooter)
    }

    /// Create an io error.
    #[must_use]
    pub fn io() -> Self {
        Self::new(ErrorKind::Io)
    }

    /// Add a message to the error.
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Set the byte offset of the field that failed.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the name of the field that failed.
    #[must_use]
    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = field;
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the byte offset at which the failing field began.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the name of the field being decoded when the error occurred.
    #[inline]
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }
}

impl fmt::Display for TzifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.field.is_empty() {
            write!(f, " in `{}`", self.field)?;
        }
        write!(f, " at byte {}", self.offset)?;
        if !self.msg.is_empty() {
            write!(f, ": {}", self.msg)?;
        }
        Ok(())
    }
}

impl core::error::Error for TzifError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for TzifError {
    fn from(value: std::io::Error) -> Self {
        use alloc::string::ToString;
        match value.kind() {
            std::io::ErrorKind::UnexpectedEof => Self::truncated(),
            _ => Self::io().with_message(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_includes_context() {
        let err = TzifError::truncated()
            .with_field("transition_times")
            .with_offset(44);
        assert_eq!(
            err.to_string(),
            "TruncatedInput in `transition_times` at byte 44"
        );

        let err = TzifError::unsupported_version()
            .with_field("version")
            .with_offset(4)
            .with_message("found 0x31");
        assert_eq!(
            err.to_string(),
            "UnsupportedVersion in `version` at byte 4: found 0x31"
        );
    }

    #[test]
    fn accessors() {
        let err = TzifError::bad_magic().with_field("magic");
        assert_eq!(err.kind(), ErrorKind::BadMagic);
        assert_eq!(err.field(), "magic");
        assert_eq!(err.offset(), 0);
        assert_eq!(err.message(), "");
    }
}
