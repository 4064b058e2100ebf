use std::{fs, path::Path};

use anyhow::Context;
use fretline_core::audio::{NoteSynth, SynthConfig};
use fretline_core::chart::SessionPlan;
use log::info;

const BLOCK_FRAMES: usize = 1024;

/// Writes the whole session, from time 0 to its configured length, as a
/// 32-bit float stereo WAV.
pub fn render_wav(plan: &SessionPlan, config: &SynthConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
    }

    let synth = NoteSynth::new(plan.audio_notes.clone(), config.clone());
    let sample_rate = synth.sample_rate();
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create wav file: {}", path.display()))?;

    let total_frames = (plan.session_length.max(0.0) * f64::from(sample_rate)).ceil() as usize;
    let mut block = vec![0.0f32; BLOCK_FRAMES * 2];
    let mut written = 0;
    while written < total_frames {
        let frames = BLOCK_FRAMES.min(total_frames - written);
        let out = &mut block[..frames * 2];
        synth.render(out, written as f64 / f64::from(sample_rate));
        for &sample in out.iter() {
            writer
                .write_sample(sample)
                .context("failed to write sample")?;
        }
        written += frames;
    }

    writer.finalize().context("failed to finalize wav file")?;
    info!(
        "rendered {:.1}s of audio to {}",
        written as f64 / f64::from(sample_rate),
        path.display()
    );
    Ok(())
}
