//! Playback duration of synthesized audio, by container.

use std::io::Cursor;

use crate::error::MeasureError;
use crate::format::OutputFormat;
use crate::mp3::mp3_stats;

/// Measured duration plus the container actually found in the bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioMeasurement {
    pub container: &'static str,
    pub duration_secs: f64,
}

fn is_wav(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

#[allow(clippy::cast_precision_loss)]
fn wav_duration(bytes: &[u8]) -> Result<f64, MeasureError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        return Err(MeasureError::ZeroDuration);
    }
    Ok(f64::from(reader.duration()) / f64::from(sample_rate))
}

#[allow(clippy::cast_precision_loss)]
fn raw_duration(len: usize, bytes_per_sample: usize, sample_rate: u32) -> f64 {
    (len / bytes_per_sample) as f64 / f64::from(sample_rate)
}

/// Measure how long `bytes` play for.
///
/// A RIFF/WAVE header wins over the requested format; otherwise `format`
/// decides between the MPEG frame walker and raw sample arithmetic.
///
/// # Errors
///
/// [`MeasureError::Empty`] for no bytes, [`MeasureError::NoFrames`] or
/// [`MeasureError::Wav`] for undecodable data, and
/// [`MeasureError::ZeroDuration`] when the stream holds no samples.
pub fn measure_duration(
    bytes: &[u8],
    format: OutputFormat,
) -> Result<AudioMeasurement, MeasureError> {
    if bytes.is_empty() {
        return Err(MeasureError::Empty);
    }

    let (container, duration_secs) = if is_wav(bytes) {
        ("wav", wav_duration(bytes)?)
    } else {
        match format {
            OutputFormat::Mp3 { .. } => ("mp3", mp3_stats(bytes)?.duration_secs),
            OutputFormat::Pcm { sample_rate } => ("pcm", raw_duration(bytes.len(), 2, sample_rate)),
            OutputFormat::Ulaw { sample_rate } => {
                ("ulaw", raw_duration(bytes.len(), 1, sample_rate))
            }
        }
    };

    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(MeasureError::ZeroDuration);
    }
    Ok(AudioMeasurement {
        container,
        duration_secs,
    })
}
