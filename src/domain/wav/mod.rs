//! Canonical 44-byte WAV framing for raw PCM.
//!
//! Every multi-byte field is little-endian. The header fully describes how to
//! reinterpret the trailing bytes, so framing never touches the samples.

use crate::domain::errors::DomainError;
use crate::domain::model::PcmFormat;

/// Size of the canonical RIFF/WAVE header.
pub const WAV_HEADER_LEN: usize = 44;

/// Audio format code for uncompressed PCM.
const FORMAT_PCM: u16 = 1;

/// Size of the `fmt ` sub-chunk body for PCM.
const FMT_CHUNK_LEN: u32 = 16;

/// Largest payload whose RIFF chunk size (`36 + len`) still fits in a u32.
pub const MAX_PCM_LEN: usize = (u32::MAX as usize) - (WAV_HEADER_LEN - 8);

/// Wrap `pcm` in a WAV header describing `format`.
///
/// Fails only when the payload or the derived rate fields do not fit their
/// header fields.
pub fn frame(pcm: &[u8], format: PcmFormat) -> Result<Vec<u8>, DomainError> {
    if pcm.len() > MAX_PCM_LEN {
        return Err(DomainError::WavPayloadTooLarge(pcm.len()));
    }
    let byte_rate = format.byte_rate()?;
    let block_align = format.block_align()?;
    let data_size = pcm.len() as u32;
    let chunk_size = (WAV_HEADER_LEN as u32 - 8) + data_size;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&chunk_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    wav.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    wav.extend_from_slice(&format.channels.to_le_bytes());
    wav.extend_from_slice(&format.sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&format.bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.extend_from_slice(pcm);

    Ok(wav)
}

/// Frame with the speech model's native format (24 kHz, mono, 16-bit).
pub fn frame_default(pcm: &[u8]) -> Result<Vec<u8>, DomainError> {
    frame(pcm, PcmFormat::default())
}

/// Fields read back from a canonical header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub format: PcmFormat,
    pub chunk_size: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub data_size: u32,
}

/// Parse a canonical 44-byte PCM header.
///
/// Only the layout produced by [`frame`] is accepted; files with extra
/// chunks between `fmt ` and `data` are rejected.
pub fn parse_header(bytes: &[u8]) -> Result<WavHeader, DomainError> {
    if bytes.len() < WAV_HEADER_LEN {
        return Err(DomainError::InvalidWav(format!(
            "need {} header bytes, got {}",
            WAV_HEADER_LEN,
            bytes.len()
        )));
    }
    expect_tag(bytes, 0, b"RIFF")?;
    expect_tag(bytes, 8, b"WAVE")?;
    expect_tag(bytes, 12, b"fmt ")?;
    expect_tag(bytes, 36, b"data")?;

    if read_u32(bytes, 16) != FMT_CHUNK_LEN {
        return Err(DomainError::InvalidWav("fmt chunk is not 16 bytes".into()));
    }
    let audio_format = read_u16(bytes, 20);
    if audio_format != FORMAT_PCM {
        return Err(DomainError::InvalidWav(format!(
            "audio format {} is not PCM",
            audio_format
        )));
    }

    Ok(WavHeader {
        format: PcmFormat {
            channels: read_u16(bytes, 22),
            sample_rate: read_u32(bytes, 24),
            bits_per_sample: read_u16(bytes, 34),
        },
        chunk_size: read_u32(bytes, 4),
        byte_rate: read_u32(bytes, 28),
        block_align: read_u16(bytes, 32),
        data_size: read_u32(bytes, 40),
    })
}

fn expect_tag(bytes: &[u8], offset: usize, tag: &[u8; 4]) -> Result<(), DomainError> {
    if &bytes[offset..offset + 4] != tag {
        return Err(DomainError::InvalidWav(format!(
            "expected '{}' at offset {}",
            String::from_utf8_lossy(tag),
            offset
        )));
    }
    Ok(())
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
