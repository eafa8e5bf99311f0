//! MPEG audio frame walker.
//!
//! Counts decodable frames and sums their sample counts. Handles a leading
//! ID3v2 tag, a trailing ID3v1 tag, a Xing/Info/VBRI header frame (which
//! carries no audio), and junk between frames.

use crate::error::MeasureError;

const ID3V2_HEADER_LEN: usize = 10;
const ID3V1_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Version {
    Mpeg1,
    Mpeg2,
    Mpeg25,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    One,
    Two,
    Three,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameHeader {
    version: Version,
    layer: Layer,
    sample_rate: u32,
    frame_len: usize,
    samples: u32,
    mono: bool,
}

/// Frame statistics for a whole stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mp3Stats {
    pub frames: u64,
    pub sample_rate: u32,
    pub duration_secs: f64,
}

const BITRATES_V1_L1: [u32; 15] = [
    0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448,
];
const BITRATES_V1_L2: [u32; 15] = [
    0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384,
];
const BITRATES_V1_L3: [u32; 15] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];
const BITRATES_V2_L1: [u32; 15] = [
    0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256,
];
const BITRATES_V2_L23: [u32; 15] = [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160];

fn parse_header(bytes: &[u8]) -> Option<FrameHeader> {
    let &[b0, b1, b2, b3, ..] = bytes else {
        return None;
    };
    if b0 != 0xFF || b1 & 0xE0 != 0xE0 {
        return None;
    }

    let version = match (b1 >> 3) & 0b11 {
        0 => Version::Mpeg25,
        2 => Version::Mpeg2,
        3 => Version::Mpeg1,
        _ => return None,
    };
    let layer = match (b1 >> 1) & 0b11 {
        1 => Layer::Three,
        2 => Layer::Two,
        3 => Layer::One,
        _ => return None,
    };

    let bitrate_index = usize::from(b2 >> 4);
    // 0 is free-format (length not derivable from the header), 15 is invalid.
    if bitrate_index == 0 || bitrate_index == 15 {
        return None;
    }
    let table = match (version, layer) {
        (Version::Mpeg1, Layer::One) => &BITRATES_V1_L1,
        (Version::Mpeg1, Layer::Two) => &BITRATES_V1_L2,
        (Version::Mpeg1, Layer::Three) => &BITRATES_V1_L3,
        (_, Layer::One) => &BITRATES_V2_L1,
        (_, _) => &BITRATES_V2_L23,
    };
    let bitrate = table[bitrate_index] * 1000;

    let base_rate = match (b2 >> 2) & 0b11 {
        0 => 44_100,
        1 => 48_000,
        2 => 32_000,
        _ => return None,
    };
    let sample_rate = match version {
        Version::Mpeg1 => base_rate,
        Version::Mpeg2 => base_rate / 2,
        Version::Mpeg25 => base_rate / 4,
    };

    let padding = u32::from((b2 >> 1) & 1);
    let samples = match (version, layer) {
        (_, Layer::One) => 384,
        (_, Layer::Two) | (Version::Mpeg1, Layer::Three) => 1152,
        (_, Layer::Three) => 576,
    };
    let frame_len = match layer {
        Layer::One => (12 * bitrate / sample_rate + padding) * 4,
        Layer::Two | Layer::Three => (samples / 8) * bitrate / sample_rate + padding,
    };

    Some(FrameHeader {
        version,
        layer,
        sample_rate,
        frame_len: usize::try_from(frame_len).ok()?,
        samples,
        mono: b3 >> 6 == 0b11,
    })
}

/// Whether a frame is a VBR info header rather than audio.
fn is_info_frame(frame: &[u8], header: &FrameHeader) -> bool {
    if header.layer != Layer::Three {
        return false;
    }
    let side_info = match (header.version, header.mono) {
        (Version::Mpeg1, true) => 17,
        (Version::Mpeg1, false) => 32,
        (_, true) => 9,
        (_, false) => 17,
    };
    let xing_at = 4 + side_info;
    let has_tag = |at: usize, tag: &[u8]| frame.get(at..at + tag.len()) == Some(tag);
    has_tag(xing_at, b"Xing") || has_tag(xing_at, b"Info") || has_tag(36, b"VBRI")
}

/// Byte offset of the first byte after a leading ID3v2 tag, or 0.
fn skip_id3v2(bytes: &[u8]) -> usize {
    if bytes.len() < ID3V2_HEADER_LEN || &bytes[..3] != b"ID3" {
        return 0;
    }
    // Tag size is a 28-bit syncsafe integer.
    let size = bytes[6..10]
        .iter()
        .fold(0usize, |acc, b| (acc << 7) | usize::from(b & 0x7F));
    let footer = if bytes[5] & 0x10 != 0 {
        ID3V2_HEADER_LEN
    } else {
        0
    };
    (ID3V2_HEADER_LEN + size + footer).min(bytes.len())
}

/// End offset excluding a trailing ID3v1 tag.
fn audio_end(bytes: &[u8], start: usize) -> usize {
    let len = bytes.len();
    if len >= start + ID3V1_LEN && &bytes[len - ID3V1_LEN..len - ID3V1_LEN + 3] == b"TAG" {
        len - ID3V1_LEN
    } else {
        len
    }
}

/// Walk every MPEG audio frame in `bytes`.
///
/// While in sync, each header must describe a frame that fits in the buffer.
/// After junk, a candidate header is accepted only if another valid header
/// (or the end of the audio) follows it, which filters out stray `0xFF` bytes.
///
/// # Errors
///
/// [`MeasureError::NoFrames`] when no audio frame is found.
pub fn mp3_stats(bytes: &[u8]) -> Result<Mp3Stats, MeasureError> {
    let start = skip_id3v2(bytes);
    let end = audio_end(bytes, start);

    let mut pos = start;
    let mut in_sync = true;
    let mut frames = 0u64;
    let mut total_samples = 0u64;
    let mut sample_rate = 0u32;
    let mut seen_first = false;

    while pos + 4 <= end {
        let candidate = parse_header(&bytes[pos..end])
            .filter(|h| h.frame_len >= 4 && pos + h.frame_len <= end);
        let Some(header) = candidate else {
            pos += 1;
            in_sync = false;
            continue;
        };

        let next = pos + header.frame_len;
        if !in_sync && next < end && parse_header(&bytes[next..end]).is_none() {
            pos += 1;
            continue;
        }
        in_sync = true;

        let frame = &bytes[pos..next];
        let info_frame = !seen_first && is_info_frame(frame, &header);
        seen_first = true;
        if !info_frame {
            frames += 1;
            total_samples += u64::from(header.samples);
            if sample_rate == 0 {
                sample_rate = header.sample_rate;
            }
        }
        pos = next;
    }

    if frames == 0 || sample_rate == 0 {
        return Err(MeasureError::NoFrames);
    }

    #[allow(clippy::cast_precision_loss)]
    let duration_secs = total_samples as f64 / f64::from(sample_rate);
    Ok(Mp3Stats {
        frames,
        sample_rate,
        duration_secs,
    })
}
