//! WAV reading and writing at a routing format's bit depth.
//!
//! Samples are held as `i32` at the target depth: 16-bit values for
//! `s16le`, sign-extended 24-bit values for `s24le` and full range for
//! `s32le`.

use std::path::Path;

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// Interleaved integer audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmAudio {
    /// Interleaved samples at the target bit depth.
    pub samples: Vec<i32>,
    /// Channel count.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl PcmAudio {
    /// Number of whole frames.
    pub fn frames(&self) -> usize {
        self.samples
            .len()
            .checked_div(usize::from(self.channels))
            .unwrap_or(0)
    }
}

/// Read a WAV file, rescaling samples to `bits`.
pub fn read_pcm(path: &Path, bits: u16) -> anyhow::Result<PcmAudio> {
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        SampleFormat::Int => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| rescale(v, spec.bits_per_sample, bits)))
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Float => {
            let full = (1i64 << (bits - 1)) as f64;
            reader
                .into_samples::<f32>()
                .map(|s| {
                    s.map(|v| {
                        let scaled = (f64::from(v) * full).round();
                        scaled.clamp(-full, full - 1.0) as i32
                    })
                })
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        bits = spec.bits_per_sample,
        frames = samples.len() / usize::from(spec.channels.max(1)),
        "read wav"
    );

    Ok(PcmAudio {
        samples,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
    })
}

/// Write integer samples as a `bits`-deep PCM WAV file.
pub fn write_pcm(path: &Path, audio: &PcmAudio, bits: u16) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: bits,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for &sample in &audio.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

fn rescale(value: i32, from: u16, to: u16) -> i32 {
    match from.cmp(&to) {
        std::cmp::Ordering::Less => value << (to - from),
        std::cmp::Ordering::Greater => value >> (from - to),
        std::cmp::Ordering::Equal => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_between_depths() {
        assert_eq!(rescale(1, 16, 24), 256);
        assert_eq!(rescale(-32768, 16, 32), i32::MIN);
        assert_eq!(rescale(0x7f_ffff, 24, 16), 0x7fff);
        assert_eq!(rescale(-5, 16, 16), -5);
    }

    #[test]
    fn write_then_read_keeps_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcm.wav");
        let audio = PcmAudio {
            samples: vec![0, 100, -100, 32767, -32768, 7],
            channels: 2,
            sample_rate: 48000,
        };

        write_pcm(&path, &audio, 16).unwrap();
        let back = read_pcm(&path, 16).unwrap();

        assert_eq!(back, audio);
        assert_eq!(back.frames(), 3);
    }

    #[test]
    fn read_upscales_to_24_bits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("up.wav");
        let audio = PcmAudio {
            samples: vec![1, -1],
            channels: 1,
            sample_rate: 8000,
        };

        write_pcm(&path, &audio, 16).unwrap();
        let back = read_pcm(&path, 24).unwrap();

        assert_eq!(back.samples, vec![256, -256]);
    }
}
