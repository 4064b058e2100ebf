use std::collections::BTreeMap;

use log::debug;

use crate::reader::ByteReader;
use crate::tempo::Tempo;
use crate::{RawNote, UNTERMINATED_NOTE_SECONDS};

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const SYSEX: u8 = 0xF0;
const SYSEX_ESCAPE: u8 = 0xF7;
const META: u8 = 0xFF;
const META_TEMPO: u8 = 0x51;

/// Data bytes per channel message, indexed by `(status & 0x70) >> 4`
/// (note off, note on, poly pressure, control change, program change,
/// channel pressure, pitch bend).
const CHANNEL_DATA_BYTES: [usize; 7] = [2, 2, 2, 2, 1, 1, 2];

#[derive(Debug, Clone, Copy)]
struct OpenNote {
    velocity: u8,
    start_time: f64,
}

/// Scans one track body and returns the notes it completes.
///
/// `tempo` carries across tracks so a conductor track that sets the tempo
/// also governs the tracks after it. Malformed event data ends the scan of
/// this track early; everything decoded up to that point is kept.
pub(crate) fn scan_track(body: &[u8], tempo: &mut Tempo) -> Vec<RawNote> {
    let mut reader = ByteReader::new(body);
    let mut notes = Vec::new();
    // Open notes are scoped to this track and dropped with it.
    let mut open: BTreeMap<u8, OpenNote> = BTreeMap::new();
    let mut tick: u64 = 0;
    let mut running_status: Option<u8> = None;

    while !reader.is_empty() {
        let Some(delta) = reader.read_variable_length() else {
            debug!("delta time runs past end of track at offset {}", reader.position());
            break;
        };
        tick += u64::from(delta);

        let Some(byte) = reader.read_u8() else {
            break;
        };
        let status = if byte & 0x80 != 0 {
            byte
        } else if let Some(status) = running_status {
            // Data byte: reuse the previous status and re-read this byte as data.
            reader.rewind(1);
            status
        } else {
            debug!(
                "data byte {byte:#04x} without running status at offset {}",
                reader.position() - 1
            );
            break;
        };

        let now = tempo.ticks_to_seconds(tick);
        let handled = match status {
            META => read_meta(&mut reader, tempo),
            SYSEX | SYSEX_ESCAPE => reader
                .read_variable_length()
                .map(|len| reader.skip(len as usize))
                .unwrap_or(false),
            0xF1..=0xFE => reader.skip(system_data_bytes(status)),
            _ => {
                running_status = Some(status);
                match status & 0xF0 {
                    NOTE_ON => match reader.take_array::<2>() {
                        Some([pitch, velocity]) => {
                            let pitch = pitch & 0x7F;
                            let velocity = velocity & 0x7F;
                            if velocity > 0 {
                                open.insert(pitch, OpenNote { velocity, start_time: now });
                            } else {
                                close_note(&mut open, &mut notes, pitch, now);
                            }
                            true
                        }
                        None => false,
                    },
                    NOTE_OFF => match reader.take_array::<2>() {
                        Some([pitch, _velocity]) => {
                            close_note(&mut open, &mut notes, pitch & 0x7F, now);
                            true
                        }
                        None => false,
                    },
                    _ => {
                        let kind = usize::from((status & 0x70) >> 4);
                        reader.skip(CHANNEL_DATA_BYTES[kind])
                    }
                }
            }
        };

        if !handled {
            debug!("event {status:#04x} truncated at offset {}", reader.position());
            break;
        }
    }

    for (pitch, note) in open {
        debug!("note {pitch} never released, using {UNTERMINATED_NOTE_SECONDS}s");
        notes.push(RawNote {
            pitch,
            velocity: note.velocity,
            start_time: note.start_time,
            duration: UNTERMINATED_NOTE_SECONDS,
        });
    }

    notes
}

fn close_note(open: &mut BTreeMap<u8, OpenNote>, notes: &mut Vec<RawNote>, pitch: u8, now: f64) {
    let Some(note) = open.remove(&pitch) else {
        return;
    };
    notes.push(RawNote {
        pitch,
        velocity: note.velocity,
        start_time: note.start_time,
        // A tempo change between on and off can move `now` behind the start.
        duration: (now - note.start_time).max(0.0),
    });
}

fn read_meta(reader: &mut ByteReader<'_>, tempo: &mut Tempo) -> bool {
    let Some(kind) = reader.read_u8() else {
        return false;
    };
    let Some(len) = reader.read_variable_length() else {
        return false;
    };
    let Some(data) = reader.take(len as usize) else {
        return false;
    };

    if kind == META_TEMPO && data.len() == 3 {
        let micros = u32::from(data[0]) << 16 | u32::from(data[1]) << 8 | u32::from(data[2]);
        debug!("tempo change: {micros} microseconds per beat");
        tempo.set_micros_per_beat(micros);
    }
    true
}

fn system_data_bytes(status: u8) -> usize {
    match status {
        0xF1 | 0xF3 => 1,
        0xF2 => 2,
        _ => 0,
    }
}
