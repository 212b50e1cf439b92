//! The decoded representation of a TZif file.

use alloc::{borrow::Cow, string::String, vec::Vec};

use crate::designation;

/// The four magic bytes that begin every TZif header.
pub const TZIF_MAGIC: [u8; 4] = *b"TZif";

/// The size in bytes of a TZif header, magic and version included.
pub const HEADER_SIZE: usize = 44;

/// A TZif format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Version {
    /// Version 1, marked by a NUL byte. Only the four byte section exists.
    V1,
    /// Version 2, marked by `'2'`.
    V2,
    /// Version 3, marked by `'3'`.
    V3,
    /// Version 4, marked by `'4'`.
    V4,
}

impl Version {
    /// Returns the `Version` for a header version byte, if it is recognized.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::V1),
            b'2' => Some(Self::V2),
            b'3' => Some(Self::V3),
            b'4' => Some(Self::V4),
            _ => None,
        }
    }

    /// Returns the header byte for this version.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::V1 => 0,
            Self::V2 => b'2',
            Self::V3 => b'3',
            Self::V4 => b'4',
        }
    }

    /// Whether a second, eight byte section and a footer follow the first section.
    pub fn is_extended(self) -> bool {
        !matches!(self, Self::V1)
    }
}

/// The width of the transition and leap second instants in a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TimeWidth {
    /// Four byte instants, used by the legacy section.
    Four,
    /// Eight byte instants, used by the version 2+ section.
    Eight,
}

impl TimeWidth {
    /// The number of bytes in one instant.
    pub fn bytes(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}

/// A TZif header, as read from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RawHeader {
    pub magic: [u8; 4],
    pub version: u8,
    /// Count of UT/local indicators.
    pub utc_count: i32,
    /// Count of standard/wall indicators.
    pub wall_count: i32,
    /// Count of leap second records.
    pub leap_count: i32,
    /// Count of transition times.
    pub transition_count: i32,
    /// Count of local time type records.
    pub type_count: i32,
    /// Count of bytes in the designation buffer.
    pub abbrev_char_count: i32,
}

/// A local time type record (`ttinfo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LocalTimeType {
    /// Seconds added to UTC to get local time.
    pub gmt_offset: i32,
    pub is_dst: bool,
    /// Byte offset into the section's designation buffer.
    pub abbrev_index: u8,
}

/// A leap second record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LeapSecond {
    /// The instant at which the correction takes effect.
    pub occurrence: i64,
    /// The total number of leap seconds in effect after `occurrence`.
    pub correction: i32,
}

/// One transition joined with its local time type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<'a> {
    pub time: i64,
    pub type_index: u8,
    /// `None` when `type_index` does not name a local time type.
    pub local_time_type: Option<&'a LocalTimeType>,
}

/// A single TZif header and data block.
///
/// A version 1 file has one section with four byte instants. Version 2+
/// files repeat the data in a second section with eight byte instants.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Section {
    /// Byte offset of the section header within the file.
    pub offset: u64,
    pub header: RawHeader,
    pub time_width: TimeWidth,
    pub transition_times: Vec<i64>,
    /// Indices into `local_time_types`, parallel to `transition_times`.
    pub transition_types: Vec<u8>,
    pub local_time_types: Vec<LocalTimeType>,
    /// The raw, NUL delimited designation buffer.
    pub designations: Vec<u8>,
    /// The designation buffer split on NUL.
    ///
    /// Local time types refer to designations by byte offset, not by
    /// position in this list. Use [`Section::abbreviation`] to resolve one.
    pub abbreviations: Vec<String>,
    pub leap_seconds: Vec<LeapSecond>,
    pub standard_wall_indicators: Vec<u8>,
    pub ut_local_indicators: Vec<u8>,
}

impl Section {
    /// Returns the designation starting at byte `offset` of the designation buffer.
    pub fn abbreviation_at(&self, offset: usize) -> Option<Cow<'_, str>> {
        designation::designation_at(&self.designations, offset)
    }

    /// Returns the designation of `local_time_type`.
    pub fn abbreviation(&self, local_time_type: &LocalTimeType) -> Option<Cow<'_, str>> {
        self.abbreviation_at(usize::from(local_time_type.abbrev_index))
    }

    /// Iterates over the transitions in file order.
    pub fn transitions(&self) -> impl Iterator<Item = Transition<'_>> + '_ {
        self.transition_times
            .iter()
            .zip(self.transition_types.iter())
            .map(|(&time, &type_index)| Transition {
                time,
                type_index,
                local_time_type: self.local_time_types.get(usize::from(type_index)),
            })
    }

    /// Whether the transition times are in non-decreasing order.
    pub fn is_sorted(&self) -> bool {
        self.transition_times.windows(2).all(|w| w[0] <= w[1])
    }
}

/// A fully decoded TZif file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DecodedFile {
    pub magic: [u8; 4],
    pub version: Version,
    /// The four byte section, present in every file.
    pub legacy: Section,
    /// The eight byte section, present for version 2+.
    pub extended: Option<Section>,
    /// The POSIX TZ string from the footer, present for version 2+.
    ///
    /// This is empty when the file has no rule for times after the last
    /// transition.
    pub posix_tz_string: Option<String>,
}

impl DecodedFile {
    /// Returns the eight byte section if present, otherwise the legacy section.
    pub fn best_section(&self) -> &Section {
        self.extended.as_ref().unwrap_or(&self.legacy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn section() -> Section {
        Section {
            offset: 0,
            header: RawHeader {
                magic: TZIF_MAGIC,
                version: b'2',
                utc_count: 0,
                wall_count: 0,
                leap_count: 0,
                transition_count: 3,
                type_count: 2,
                abbrev_char_count: 9,
            },
            time_width: TimeWidth::Eight,
            transition_times: vec![-100, 0, 100],
            transition_types: vec![0, 1, 2],
            local_time_types: vec![
                LocalTimeType {
                    gmt_offset: -18000,
                    is_dst: false,
                    abbrev_index: 4,
                },
                LocalTimeType {
                    gmt_offset: -14400,
                    is_dst: true,
                    abbrev_index: 0,
                },
            ],
            designations: b"EDT\0EST\0\0".to_vec(),
            abbreviations: designation::decode_abbrevs(b"EDT\0EST\0\0"),
            leap_seconds: Vec::new(),
            standard_wall_indicators: Vec::new(),
            ut_local_indicators: Vec::new(),
        }
    }

    #[test]
    fn version_bytes() {
        assert_eq!(Version::from_byte(0), Some(Version::V1));
        assert_eq!(Version::from_byte(b'3'), Some(Version::V3));
        assert_eq!(Version::from_byte(b'1'), None);
        assert_eq!(Version::V4.as_byte(), b'4');
        assert!(!Version::V1.is_extended());
        assert!(Version::V2.is_extended());
    }

    #[test]
    fn abbreviation_by_offset() {
        let section = section();
        let est = section.local_time_types[0];
        assert_eq!(section.abbreviation(&est).as_deref(), Some("EST"));
        assert_eq!(section.abbreviation_at(1).as_deref(), Some("DT"));
        assert_eq!(section.abbreviation_at(8).as_deref(), Some(""));
        assert_eq!(section.abbreviation_at(9), None);
    }

    #[test]
    fn transitions_join_types() {
        let section = section();
        let transitions: Vec<_> = section.transitions().collect();
        assert_eq!(transitions.len(), 3);
        assert_eq!(transitions[1].time, 0);
        assert_eq!(
            transitions[1].local_time_type.map(|t| t.gmt_offset),
            Some(-14400)
        );
        assert_eq!(transitions[2].local_time_type, None);
        assert!(section.is_sorted());
    }
}
