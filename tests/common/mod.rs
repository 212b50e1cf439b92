//! A test-only TZif writer and the JSON fixtures it is driven by.

#![allow(dead_code)]

use serde::Deserialize;
use std::{fs::read_to_string, path::Path};

#[derive(Debug, Clone, Deserialize)]
pub struct LocalTypeFixture {
    pub offset: i32,
    pub is_dst: bool,
    pub abbrev_index: u8,
    /// The designation expected when `abbrev_index` is resolved.
    pub abbr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneFixture {
    pub version: String,
    pub transitions: Vec<i64>,
    pub transition_types: Vec<u8>,
    pub types: Vec<LocalTypeFixture>,
    pub designations: String,
    #[serde(default)]
    pub leap_seconds: Vec<(i64, i32)>,
    #[serde(default)]
    pub wall_indicators: Vec<u8>,
    #[serde(default)]
    pub utc_indicators: Vec<u8>,
    pub footer: Option<String>,
}

impl ZoneFixture {
    pub fn load(name: &str) -> Self {
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let path = manifest_dir.join("tests").join("data").join(format!("{name}.json"));
        serde_json::from_str(&read_to_string(path).unwrap()).unwrap()
    }

    pub fn version_byte(&self) -> u8 {
        match self.version.as_str() {
            "1" => 0,
            v => v.as_bytes()[0],
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let version = self.version_byte();
        let mut bytes = self.encode_section(version, 4);
        if version != 0 {
            bytes.extend(self.encode_section(version, 8));
            bytes.push(b'\n');
            bytes.extend_from_slice(self.footer.as_deref().unwrap_or("").as_bytes());
            bytes.push(b'\n');
        }
        bytes
    }

    pub fn encode_section(&self, version: u8, width: usize) -> Vec<u8> {
        let mut section = SectionWriter::new(version);
        section.counts = [
            self.utc_indicators.len() as i32,
            self.wall_indicators.len() as i32,
            self.leap_seconds.len() as i32,
            self.transitions.len() as i32,
            self.types.len() as i32,
            self.designations.len() as i32,
        ];
        for &time in &self.transitions {
            section.time(time, width);
        }
        section.bytes.extend_from_slice(&self.transition_types);
        for ty in &self.types {
            section.ttinfo(ty.offset, ty.is_dst, ty.abbrev_index);
        }
        section.bytes.extend_from_slice(self.designations.as_bytes());
        for &(occurrence, correction) in &self.leap_seconds {
            section.time(occurrence, width);
            section.bytes.extend_from_slice(&correction.to_be_bytes());
        }
        section.bytes.extend_from_slice(&self.wall_indicators);
        section.bytes.extend_from_slice(&self.utc_indicators);
        section.finish()
    }
}

/// Writes one header and data block. Counts are written as given, so they
/// can disagree with the body.
pub struct SectionWriter {
    pub magic: [u8; 4],
    pub version: u8,
    pub counts: [i32; 6],
    pub bytes: Vec<u8>,
}

impl SectionWriter {
    pub fn new(version: u8) -> Self {
        Self {
            magic: *b"TZif",
            version,
            counts: [0; 6],
            bytes: Vec::new(),
        }
    }

    pub fn time(&mut self, time: i64, width: usize) {
        if width == 4 {
            self.bytes.extend_from_slice(&(time as i32).to_be_bytes());
        } else {
            self.bytes.extend_from_slice(&time.to_be_bytes());
        }
    }

    pub fn ttinfo(&mut self, offset: i32, is_dst: bool, abbrev_index: u8) {
        self.bytes.extend_from_slice(&offset.to_be_bytes());
        self.bytes.push(u8::from(is_dst));
        self.bytes.push(abbrev_index);
    }

    pub fn finish(self) -> Vec<u8> {
        let mut out = self.magic.to_vec();
        out.push(self.version);
        out.extend_from_slice(&[0; 15]);
        for count in self.counts {
            out.extend_from_slice(&count.to_be_bytes());
        }
        out.extend(self.bytes);
        out
    }
}

/// The smallest valid file: one `UTC` local time type and nothing else.
pub fn minimal_utc(version: u8) -> Vec<u8> {
    let mut section = SectionWriter::new(version);
    section.counts = [0, 0, 0, 0, 1, 4];
    section.ttinfo(0, false, 0);
    section.bytes.extend_from_slice(b"UTC\0");
    section.finish()
}
