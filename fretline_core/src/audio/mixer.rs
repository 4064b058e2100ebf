use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::info;

use super::synth::{NoteSynth, SynthConfig};
use super::{AudioError, AudioNote};
use crate::time::{Conductor, TimeSource};

pub enum MixerCommand {
    /// Begin a session. `origin` is the audio clock's zero point on the
    /// shared time source.
    Start {
        notes: Arc<[AudioNote]>,
        origin: f64,
    },
    Stop,
    SetVolume(f32),
}

/// Device-side half of the audio engine. Owns its own clock and synth and is
/// only reached through commands, so the pull callback never touches
/// gameplay state.
pub struct SynthMixer {
    config: SynthConfig,
    conductor: Conductor,
    synth: Option<NoteSynth>,
    volume: f32,
    command_rx: Receiver<MixerCommand>,
}

pub type SharedMixer = Arc<parking_lot::Mutex<SynthMixer>>;

/// Gameplay-side handle to a [`SynthMixer`].
pub struct AudioPlayer {
    command_tx: Sender<MixerCommand>,
    time: Arc<dyn TimeSource>,
    playing: bool,
}

impl AudioPlayer {
    pub fn start(&mut self, notes: Arc<[AudioNote]>) -> Result<(), AudioError> {
        let origin = self.time.now();
        self.command_tx
            .send(MixerCommand::Start { notes, origin })
            .map_err(|_| AudioError::NotReady)?;
        self.playing = true;
        Ok(())
    }

    /// No-op when already stopped.
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        let _ = self.command_tx.send(MixerCommand::Stop);
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_volume(&self, volume: f32) {
        let _ = self.command_tx.send(MixerCommand::SetVolume(volume));
    }
}

impl SynthMixer {
    pub fn new(config: SynthConfig, time: Arc<dyn TimeSource>) -> (Self, AudioPlayer) {
        let (tx, rx) = unbounded();
        let volume = config.master_volume.clamp(0.0, 1.0);
        (
            Self {
                config,
                conductor: Conductor::new(Arc::clone(&time)),
                synth: None,
                volume,
                command_rx: rx,
            },
            AudioPlayer {
                command_tx: tx,
                time,
                playing: false,
            },
        )
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    pub fn is_playing(&self) -> bool {
        self.synth.is_some()
    }

    pub fn into_shared(self) -> SharedMixer {
        Arc::new(parking_lot::Mutex::new(self))
    }

    /// Overwrites `buffer` (interleaved stereo) with the next block. Pending
    /// commands apply before any sample is written. Returns whether a session
    /// is playing.
    pub fn process_buffer(&mut self, buffer: &mut [f32]) -> bool {
        while let Ok(cmd) = self.command_rx.try_recv() {
            match cmd {
                MixerCommand::Start { notes, origin } => {
                    info!("audio started with {} notes", notes.len());
                    let mut synth = NoteSynth::new(notes, self.config.clone());
                    synth.set_volume(self.volume);
                    self.synth = Some(synth);
                    self.conductor.start_at(origin);
                }
                MixerCommand::Stop => {
                    if self.synth.take().is_some() {
                        info!("audio stopped");
                    }
                    self.conductor.stop();
                }
                MixerCommand::SetVolume(volume) => {
                    self.volume = volume.clamp(0.0, 1.0);
                    if let Some(synth) = self.synth.as_mut() {
                        synth.set_volume(self.volume);
                    }
                }
            }
        }

        buffer.fill(0.0);
        match &self.synth {
            Some(synth) => {
                synth.render(buffer, self.conductor.time());
                true
            }
            None => false,
        }
    }
}
