use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{OutputCallbackInfo, Stream, StreamConfig};
use log::{error, info};

use super::mixer::SharedMixer;
use super::AudioError;

/// Default output device pulling from a [`SynthMixer`](super::SynthMixer).
/// Dropping it closes the stream.
pub struct AudioStream {
    _stream: Stream,
}

impl AudioStream {
    pub fn new(mixer: SharedMixer) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::Init("no default output device".into()))?;

        let sample_rate = mixer.lock().sample_rate();
        let config = StreamConfig {
            channels: 2,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &OutputCallbackInfo| {
                    mixer.lock().process_buffer(data);
                },
                move |err| {
                    error!("audio output error: {err}");
                },
                None,
            )
            .map_err(|e| AudioError::Init(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::Init(e.to_string()))?;

        info!("audio output opened at {sample_rate} Hz");
        Ok(Self { _stream: stream })
    }
}
