//! Decoding of a single TZif header and data block.

use alloc::{format, vec::Vec};

use crate::{
    designation::decode_abbrevs,
    reader::{ByteReader, ByteSource},
    types::{
        LeapSecond, LocalTimeType, RawHeader, Section, TimeWidth, Version, HEADER_SIZE,
        TZIF_MAGIC,
    },
    TzifError, TzifResult,
};

/// Size of one `ttinfo` record.
const TTINFO_SIZE: u64 = 6;

/// Offset of the first count within a header.
const COUNTS_OFFSET: u64 = 20;

/// Converts a count that has already been checked to be non-negative.
#[inline]
fn len(count: i32) -> usize {
    usize::try_from(count).unwrap_or_default()
}

fn read_count<S: ByteSource>(reader: &mut ByteReader<S>, name: &'static str) -> TzifResult<i32> {
    let start = reader.offset();
    let count = reader.in_field(name, ByteReader::read_long)?;
    if count < 0 {
        let err = TzifError::invalid_count()
            .with_field(name)
            .with_offset(start)
            .with_message(format!("negative count {count}"));
        return Err(err);
    }
    Ok(count)
}

/// Reads a 44 byte header.
///
/// The magic is checked before anything else is consumed, and the version
/// byte is checked before the reserved bytes and counts are read.
pub(crate) fn read_header<S: ByteSource>(reader: &mut ByteReader<S>) -> TzifResult<RawHeader> {
    let start = reader.offset();
    let magic = reader.in_field("magic", ByteReader::read_array::<4>)?;
    if magic != TZIF_MAGIC {
        crate::log_error!("bad magic {magic:?} at byte {start}");
        return Err(TzifError::bad_magic()
            .with_field("magic")
            .with_offset(start)
            .with_message(format!("found {magic:?}")));
    }

    let version = reader.in_field("version", ByteReader::read_u8)?;
    if Version::from_byte(version).is_none() {
        crate::log_error!("unsupported version {version:#04x} at byte {}", start + 4);
        return Err(TzifError::unsupported_version()
            .with_field("version")
            .with_offset(start + 4)
            .with_message(format!("found {version:#04x}")));
    }

    reader.in_field("reserved", ByteReader::read_array::<15>)?;

    Ok(RawHeader {
        magic,
        version,
        utc_count: read_count(reader, "utc_count")?,
        wall_count: read_count(reader, "wall_count")?,
        leap_count: read_count(reader, "leap_count")?,
        transition_count: read_count(reader, "transition_count")?,
        type_count: read_count(reader, "type_count")?,
        abbrev_char_count: read_count(reader, "abbrev_char_count")?,
    })
}

/// Reads one six byte local time type record.
pub(crate) fn read_ttinfo<S: ByteSource>(
    reader: &mut ByteReader<S>,
) -> TzifResult<LocalTimeType> {
    Ok(LocalTimeType {
        gmt_offset: reader.read_long()?,
        is_dst: reader.read_u8()? != 0,
        abbrev_index: reader.read_u8()?,
    })
}

/// Reads a header and its data block, with instants of `width` bytes.
pub(crate) fn read_section<S: ByteSource>(
    reader: &mut ByteReader<S>,
    width: TimeWidth,
) -> TzifResult<Section> {
    let offset = reader.offset();
    let header = read_header(reader)?;
    if header.type_count == 0 {
        crate::log_error!("section at byte {offset} declares no local time types");
        return Err(TzifError::invalid_type_count()
            .with_field("type_count")
            .with_offset(offset + COUNTS_OFFSET + 16));
    }
    crate::log_debug!(
        "reading {width:?} section at byte {offset}: {} transitions, {} types, {} leap seconds",
        header.transition_count,
        header.type_count,
        header.leap_count
    );

    let transition_count = len(header.transition_count);
    let transition_times = reader.in_field("transition_times", |r| {
        (0..transition_count)
            .map(|_| r.read_time(width))
            .collect::<TzifResult<Vec<_>>>()
    })?;
    let transition_types = reader.in_field("transition_types", |r| r.read(transition_count))?;

    let local_time_types = reader.in_field("local_time_types", |r| {
        (0..len(header.type_count))
            .map(|_| read_ttinfo(r))
            .collect::<TzifResult<Vec<_>>>()
    })?;

    let designations =
        reader.in_field("designations", |r| r.read(len(header.abbrev_char_count)))?;
    let abbreviations = decode_abbrevs(&designations);

    let leap_seconds = reader.in_field("leap_seconds", |r| {
        (0..len(header.leap_count))
            .map(|_| {
                Ok::<_, TzifError>(LeapSecond {
                    occurrence: r.read_time(width)?,
                    correction: r.read_long()?,
                })
            })
            .collect::<TzifResult<Vec<_>>>()
    })?;

    let standard_wall_indicators =
        reader.in_field("standard_wall_indicators", |r| r.read(len(header.wall_count)))?;
    let ut_local_indicators =
        reader.in_field("ut_local_indicators", |r| r.read(len(header.utc_count)))?;

    crate::log_trace!("{width:?} section ends at byte {}", reader.offset());

    Ok(Section {
        offset,
        header,
        time_width: width,
        transition_times,
        transition_types,
        local_time_types,
        designations,
        abbreviations,
        leap_seconds,
        standard_wall_indicators,
        ut_local_indicators,
    })
}

/// Byte offsets of each field of a section, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    transition_times: u64,
    transition_types: u64,
    local_time_types: u64,
    leap_seconds: u64,
}

impl Layout {
    fn of(section: &Section) -> Self {
        let h = &section.header;
        let width = section.time_width.bytes() as u64;
        let transition_times = section.offset + HEADER_SIZE as u64;
        let transition_types = transition_times + width * len(h.transition_count) as u64;
        let local_time_types = transition_types + len(h.transition_count) as u64;
        let leap_seconds = local_time_types
            + TTINFO_SIZE * len(h.type_count) as u64
            + len(h.abbrev_char_count) as u64;
        Self {
            transition_times,
            transition_types,
            local_time_types,
            leap_seconds,
        }
    }
}

/// Checks the cross-field invariants of a decoded section.
pub(crate) fn validate(section: &Section) -> TzifResult<()> {
    let layout = Layout::of(section);
    let width = section.time_width.bytes() as u64;
    let type_count = section.local_time_types.len();

    for (i, &index) in section.transition_types.iter().enumerate() {
        crate::tzif_ensure!(
            usize::from(index) < type_count,
            TzifError::transition_type_out_of_range()
                .with_field("transition_types")
                .with_offset(layout.transition_types + i as u64)
                .with_message(format!("type {index} of {type_count}")),
            "transition {i} references local time type {index} of {type_count}"
        );
    }

    for (i, ttinfo) in section.local_time_types.iter().enumerate() {
        let index = usize::from(ttinfo.abbrev_index);
        crate::tzif_ensure!(
            index < section.designations.len(),
            TzifError::abbrev_out_of_range()
                .with_field("local_time_types")
                .with_offset(layout.local_time_types + TTINFO_SIZE * i as u64 + 5)
                .with_message(format!(
                    "designation index {index} of {}",
                    section.designations.len()
                )),
            "local time type {i} has designation index {index} outside the buffer"
        );
    }

    for (i, pair) in section.transition_times.windows(2).enumerate() {
        crate::tzif_ensure!(
            pair[0] <= pair[1],
            TzifError::unsorted_transitions()
                .with_field("transition_times")
                .with_offset(layout.transition_times + width * (i as u64 + 1))
                .with_message(format!("{} follows {}", pair[1], pair[0])),
            "transition {} at {} precedes {}",
            i + 1,
            pair[1],
            pair[0]
        );
    }

    for (i, pair) in section.leap_seconds.windows(2).enumerate() {
        crate::tzif_ensure!(
            pair[0].occurrence < pair[1].occurrence,
            TzifError::unsorted_leap_seconds()
                .with_field("leap_seconds")
                .with_offset(layout.leap_seconds + (width + 4) * (i as u64 + 1))
                .with_message(format!(
                    "{} follows {}",
                    pair[1].occurrence, pair[0].occurrence
                )),
            "leap second {} is not after its predecessor",
            i + 1
        );
    }

    let indicators = [
        ("wall_count", section.header.wall_count, COUNTS_OFFSET + 4),
        ("utc_count", section.header.utc_count, COUNTS_OFFSET),
    ];
    for (field, count, offset) in indicators {
        let count = len(count);
        crate::tzif_ensure!(
            count == 0 || count == type_count,
            TzifError::invalid_indicator_count()
                .with_field(field)
                .with_offset(section.offset + offset)
                .with_message(format!("{count} indicators for {type_count} types")),
            "{field} is {count}, expected 0 or {type_count}"
        );
    }

    Ok(())
}
