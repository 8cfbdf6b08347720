//! PNG encoding for decoded alert tiles.
//!
//! Decoded tiles use at most a handful of band colours at a few alpha
//! levels, so [`encode_auto`] almost always produces an indexed PNG
//! (colour type 3). Tiles with more than 256 distinct RGBA values fall back
//! to truecolour with alpha (colour type 6).

use alert_common::{AlertError, AlertResult};
use std::collections::HashMap;
use std::io::Write;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;

/// Encode RGBA8 pixels, choosing indexed output when the palette fits.
pub fn encode_auto(pixels: &[u8], width: usize, height: usize) -> AlertResult<Vec<u8>> {
    check_dimensions(pixels, width, height)?;
    match build_palette(pixels) {
        Some((palette, indices)) => encode_indexed(&palette, &indices, width, height),
        None => encode_rgba(pixels, width, height),
    }
}

/// Encode RGBA8 pixels as a colour type 6 PNG.
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> AlertResult<Vec<u8>> {
    check_dimensions(pixels, width, height)?;

    let mut png = Vec::with_capacity(pixels.len() / 2);
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, COLOR_TYPE_RGBA));
    write_chunk(&mut png, b"IDAT", &deflate_scanlines(pixels, width * 4, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Encode palette indices as a colour type 3 PNG, with a tRNS chunk when
/// any palette entry is translucent.
pub fn encode_indexed(
    palette: &[[u8; 4]],
    indices: &[u8],
    width: usize,
    height: usize,
) -> AlertResult<Vec<u8>> {
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(AlertError::ImageEncode(format!(
            "palette size {} outside 1-{}",
            palette.len(),
            MAX_PALETTE_SIZE
        )));
    }
    if indices.len() != width * height {
        return Err(AlertError::ImageEncode(format!(
            "expected {} indices for {}x{}, got {}",
            width * height,
            width,
            height,
            indices.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &header(width, height, COLOR_TYPE_INDEXED));

    let plte: Vec<u8> = palette.iter().flat_map(|&[r, g, b, _]| [r, g, b]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    write_chunk(&mut png, b"IDAT", &deflate_scanlines(indices, width, height)?);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Collect distinct colours in first-seen order. None if there are more than 256.
fn build_palette(pixels: &[u8]) -> Option<(Vec<[u8; 4]>, Vec<u8>)> {
    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(16);
    let mut palette: Vec<[u8; 4]> = Vec::with_capacity(16);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let key = u32::from_le_bytes([px[0], px[1], px[2], px[3]]);
        let index = match lookup.get(&key) {
            Some(&index) => index,
            None => {
                if palette.len() == MAX_PALETTE_SIZE {
                    return None;
                }
                let index = palette.len() as u8;
                palette.push([px[0], px[1], px[2], px[3]]);
                lookup.insert(key, index);
                index
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

fn check_dimensions(pixels: &[u8], width: usize, height: usize) -> AlertResult<()> {
    if width == 0 || height == 0 || pixels.len() != width * height * 4 {
        return Err(AlertError::ImageEncode(format!(
            "{} bytes do not form a {}x{} RGBA image",
            pixels.len(),
            width,
            height
        )));
    }
    Ok(())
}

/// IHDR payload: 8-bit depth, deflate, adaptive filtering, no interlace.
fn header(width: usize, height: usize, color_type: u8) -> Vec<u8> {
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.extend_from_slice(&[8, color_type, 0, 0, 0]);
    ihdr
}

/// Prefix each row with filter type 0 and zlib-compress the result.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> AlertResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes).take(height) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    let compress_err = |e: std::io::Error| AlertError::ImageEncode(format!("IDAT compression failed: {}", e));
    encoder.write_all(&raw).map_err(compress_err)?;
    encoder.finish().map_err(compress_err)
}

/// Length, type, payload, then CRC over type and payload.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
