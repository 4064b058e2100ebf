//! Decoding of standard MIDI files into flat lists of timed notes.

use std::{fs, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

mod error;
mod reader;
mod tempo;
mod track;

pub use error::{ChartError, ChartErrorKind};
pub use reader::{read_variable_length, MAX_VARIABLE_LENGTH_BYTES};
pub use tempo::{Tempo, DEFAULT_TEMPO_MICROS};

use reader::ByteReader;

pub const HEADER_MAGIC: &[u8; 4] = b"MThd";
pub const TRACK_MAGIC: &[u8; 4] = b"MTrk";
const HEADER_BODY_LEN: u32 = 6;

/// Duration assigned to a note whose Note-Off is missing when its track ends.
/// Such notes are kept rather than dropped.
pub const UNTERMINATED_NOTE_SECONDS: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawNote {
    pub pitch: u8,
    pub velocity: u8,
    pub start_time: f64,
    pub duration: f64,
}

impl RawNote {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub format: u16,
    pub track_count: u16,
    pub ticks_per_beat: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub header: Header,
    /// Tempo in effect after the last track was scanned.
    pub tempo: Tempo,
    pub tracks_parsed: usize,
    /// Sorted by start time; notes with equal start keep their decode order.
    pub notes: Vec<RawNote>,
}

pub fn parse(bytes: &[u8]) -> Result<Vec<RawNote>, ChartError> {
    parse_chart(bytes).map(|chart| chart.notes)
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Chart, ChartError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        ChartError::new("M3001", format!("failed to read chart: {e}"))
            .with_file(path.display().to_string())
    })?;
    parse_chart(&bytes).map_err(|e| e.with_file(path.display().to_string()))
}

pub fn parse_chart(bytes: &[u8]) -> Result<Chart, ChartError> {
    let mut reader = ByteReader::new(bytes);
    let header = parse_header(&mut reader)?;
    debug!(
        "header: format {}, {} tracks, {} ticks per beat",
        header.format, header.track_count, header.ticks_per_beat
    );

    let mut tempo = Tempo::new(header.ticks_per_beat);
    let mut notes = Vec::new();
    let mut tracks_parsed = 0;

    while !reader.is_empty() {
        let body = read_track_chunk(&mut reader)?;
        let track_notes = track::scan_track(body, &mut tempo);
        debug!("track {tracks_parsed}: {} bytes, {} notes", body.len(), track_notes.len());
        notes.extend(track_notes);
        tracks_parsed += 1;
    }

    notes.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    Ok(Chart {
        header,
        tempo,
        tracks_parsed,
        notes,
    })
}

fn parse_header(reader: &mut ByteReader<'_>) -> Result<Header, ChartError> {
    let magic = reader
        .take(4)
        .ok_or_else(|| ChartError::new("M1002", "file too short for header").with_offset(0))?;
    if magic != HEADER_MAGIC {
        return Err(ChartError::new("M1001", "invalid header signature").with_offset(0));
    }

    let length = reader
        .read_u32_be()
        .ok_or_else(|| ChartError::new("M1002", "file too short for header").with_offset(4))?;
    if length < HEADER_BODY_LEN {
        return Err(ChartError::new(
            "M1002",
            format!("header body is {length} bytes, expected {HEADER_BODY_LEN}"),
        )
        .with_offset(4));
    }

    // Anything past the six known bytes belongs to a newer header revision.
    let body = reader
        .take(length as usize)
        .ok_or_else(|| ChartError::new("M1002", "header body truncated").with_offset(8))?;
    let format = u16::from_be_bytes([body[0], body[1]]);
    let track_count = u16::from_be_bytes([body[2], body[3]]);
    let division = u16::from_be_bytes([body[4], body[5]]);

    if division == 0 || division & 0x8000 != 0 {
        return Err(ChartError::new(
            "M1003",
            format!("unsupported time division {division:#06x}"),
        )
        .with_offset(12));
    }

    Ok(Header {
        format,
        track_count,
        ticks_per_beat: division,
    })
}

fn read_track_chunk<'a>(reader: &mut ByteReader<'a>) -> Result<&'a [u8], ChartError> {
    let offset = reader.position();
    let magic = reader.take(4).ok_or_else(|| {
        ChartError::new("M2002", "not enough data for track header").with_offset(offset)
    })?;
    if magic != TRACK_MAGIC {
        return Err(ChartError::new("M2001", "invalid track header signature").with_offset(offset));
    }

    let length = reader.read_u32_be().ok_or_else(|| {
        ChartError::new("M2002", "not enough data for track header").with_offset(offset)
    })?;
    let remaining = reader.remaining();
    reader.take(length as usize).ok_or_else(|| {
        ChartError::new(
            "M2002",
            format!("track declares {length} bytes but only {remaining} remain"),
        )
        .with_offset(offset)
    })
}
