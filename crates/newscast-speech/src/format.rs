//! Output format tags such as `mp3_44100_128` or `pcm_16000`.

use std::fmt;
use std::str::FromStr;

use crate::error::SpeechError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Mp3 { sample_rate: u32, bitrate_kbps: u32 },
    /// Raw signed 16-bit little-endian mono.
    Pcm { sample_rate: u32 },
    /// 8-bit mu-law mono.
    Ulaw { sample_rate: u32 },
}

impl OutputFormat {
    /// Short container tag used for file extensions and result metadata.
    #[must_use]
    pub fn container(self) -> &'static str {
        match self {
            OutputFormat::Mp3 { .. } => "mp3",
            OutputFormat::Pcm { .. } => "pcm",
            OutputFormat::Ulaw { .. } => "ulaw",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Mp3 {
            sample_rate: 44_100,
            bitrate_kbps: 128,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Mp3 {
                sample_rate,
                bitrate_kbps,
            } => write!(f, "mp3_{sample_rate}_{bitrate_kbps}"),
            OutputFormat::Pcm { sample_rate } => write!(f, "pcm_{sample_rate}"),
            OutputFormat::Ulaw { sample_rate } => write!(f, "ulaw_{sample_rate}"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SpeechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || SpeechError::UnsupportedFormat(s.to_string());
        let mut parts = s.trim().split('_');
        let kind = parts.next().ok_or_else(unsupported)?;
        let rate: u32 = parts
            .next()
            .and_then(|r| r.parse().ok())
            .filter(|r| *r > 0)
            .ok_or_else(unsupported)?;

        let format = match kind {
            "mp3" => {
                let bitrate_kbps = parts
                    .next()
                    .and_then(|b| b.parse().ok())
                    .ok_or_else(unsupported)?;
                OutputFormat::Mp3 {
                    sample_rate: rate,
                    bitrate_kbps,
                }
            }
            "pcm" => OutputFormat::Pcm { sample_rate: rate },
            "ulaw" => OutputFormat::Ulaw { sample_rate: rate },
            _ => return Err(unsupported()),
        };
        if parts.next().is_some() {
            return Err(unsupported());
        }
        Ok(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        assert_eq!(
            "mp3_44100_128".parse::<OutputFormat>().unwrap(),
            OutputFormat::Mp3 {
                sample_rate: 44_100,
                bitrate_kbps: 128
            }
        );
        assert_eq!(
            "pcm_16000".parse::<OutputFormat>().unwrap(),
            OutputFormat::Pcm { sample_rate: 16_000 }
        );
        assert_eq!(
            "ulaw_8000".parse::<OutputFormat>().unwrap(),
            OutputFormat::Ulaw { sample_rate: 8_000 }
        );
    }

    #[test]
    fn display_round_trips_tag() {
        assert_eq!(OutputFormat::default().to_string(), "mp3_44100_128");
    }

    #[test]
    fn rejects_unknown_or_malformed() {
        assert!("opus_48000_64".parse::<OutputFormat>().is_err());
        assert!("mp3_44100".parse::<OutputFormat>().is_err());
        assert!("pcm_0".parse::<OutputFormat>().is_err());
        assert!("pcm_16000_extra".parse::<OutputFormat>().is_err());
        assert!("".parse::<OutputFormat>().is_err());
    }
}
