//! Encoded and decoded alert rasters.

use alert_common::{AlertError, AlertResult, DecodeParameters};
use rayon::prelude::*;

use crate::decoder::{Decoder, DecoderVariant};
use crate::pixel::EncodedPixel;
use crate::png;

/// An RGBA8 alert tile as delivered by a tile source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTile {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl EncodedTile {
    /// Wrap an RGBA8 buffer. The buffer must hold exactly `width * height * 4` bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> AlertResult<Self> {
        if width == 0 || height == 0 {
            return Err(AlertError::malformed_tile(format!(
                "empty tile dimensions {}x{}",
                width, height
            )));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| AlertError::malformed_tile(format!("tile {}x{} is too large", width, height)))?;
        if data.len() != expected {
            return Err(AlertError::malformed_tile(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }

        Ok(Self { width, height, data })
    }

    pub fn from_pixels(width: usize, height: usize, pixels: &[EncodedPixel]) -> AlertResult<Self> {
        let data = pixels.iter().flat_map(|p| p.to_array()).collect();
        Self::new(width, height, data)
    }

    /// Decode a PNG (or any format the image crate reads) into RGBA8.
    pub fn from_png(bytes: &[u8]) -> AlertResult<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| AlertError::ImageDecode(e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Self::new(width as usize, height as usize, image.into_raw())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<EncodedPixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        EncodedPixel::from_slice(&self.data[idx..idx + 4])
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = EncodedPixel> + '_ {
        self.data.chunks_exact(4).filter_map(EncodedPixel::from_slice)
    }
}

/// A decoded RGBA8 raster, tagged with the decoder and parameters that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTile {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
    variant: DecoderVariant,
    params: DecodeParameters,
}

impl DecodedTile {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }

    pub fn variant(&self) -> DecoderVariant {
        self.variant
    }

    pub fn params(&self) -> &DecodeParameters {
        &self.params
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.rgba[idx..idx + 4]);
        Some(px)
    }

    /// Count of pixels with non-zero alpha.
    pub fn visible_pixels(&self) -> usize {
        self.rgba.chunks_exact(4).filter(|px| px[3] > 0).count()
    }

    /// True when the tile was decoded under different parameters.
    pub fn is_stale(&self, current: &DecodeParameters) -> bool {
        self.params != *current
    }

    /// Encode for a renderer or for disk.
    pub fn to_png(&self) -> AlertResult<Vec<u8>> {
        png::encode_auto(&self.rgba, self.width, self.height)
    }
}

/// Decode every pixel of a tile.
///
/// Rows are split across the rayon pool once the tile has at least
/// `parallel_threshold` pixels. Each pixel is independent, so the split
/// has no effect on the output.
pub fn decode_tile(
    tile: &EncodedTile,
    decoder: &dyn Decoder,
    params: &DecodeParameters,
    parallel_threshold: usize,
) -> DecodedTile {
    let row_bytes = tile.width * 4;
    let mut rgba = vec![0u8; tile.data.len()];

    if tile.width * tile.height >= parallel_threshold {
        tile.data
            .par_chunks(row_bytes)
            .zip(rgba.par_chunks_mut(row_bytes))
            .for_each(|(src, dst)| decode_row(src, dst, decoder, params));
    } else {
        tile.data
            .chunks(row_bytes)
            .zip(rgba.chunks_mut(row_bytes))
            .for_each(|(src, dst)| decode_row(src, dst, decoder, params));
    }

    DecodedTile {
        width: tile.width,
        height: tile.height,
        rgba,
        variant: decoder.variant(),
        params: *params,
    }
}

#[inline]
fn decode_row(src: &[u8], dst: &mut [u8], decoder: &dyn Decoder, params: &DecodeParameters) {
    for (src_px, dst_px) in src.chunks_exact(4).zip(dst.chunks_exact_mut(4)) {
        let pixel = EncodedPixel::new(src_px[0], src_px[1], src_px[2], src_px[3]);
        dst_px.copy_from_slice(&decoder.decode(pixel, params).to_rgba8());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrated::IntegratedAlertsDecoder;

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(matches!(
            EncodedTile::new(2, 2, vec![0; 15]),
            Err(AlertError::MalformedTile(_))
        ));
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(EncodedTile::new(0, 4, vec![]).is_err());
    }

    #[test]
    fn test_pixel_access() {
        let tile = EncodedTile::new(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(tile.pixel(1, 0), Some(EncodedPixel::new(5, 6, 7, 8)));
        assert_eq!(tile.pixel(2, 0), None);
        assert_eq!(tile.pixels().count(), 2);
    }

    #[test]
    fn test_from_pixels() {
        let pixels = [EncodedPixel::new(1, 2, 3, 4), EncodedPixel::new(5, 6, 7, 8)];
        let tile = EncodedTile::from_pixels(2, 1, &pixels).unwrap();
        assert_eq!(tile.as_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(tile.pixels().collect::<Vec<_>>(), pixels);

        // Pixel count must match the dimensions
        assert!(matches!(
            EncodedTile::from_pixels(2, 2, &pixels),
            Err(AlertError::MalformedTile(_))
        ));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let params = DecodeParameters::new(0, 40000, 40000, false).unwrap();
        let data: Vec<u8> = (0..64 * 64)
            .flat_map(|i: usize| [(i % 157) as u8, (i % 251) as u8, (i % 256) as u8, (i % 13 * 19) as u8])
            .collect();
        let tile = EncodedTile::new(64, 64, data).unwrap();

        let sequential = decode_tile(&tile, &IntegratedAlertsDecoder, &params, usize::MAX);
        let parallel = decode_tile(&tile, &IntegratedAlertsDecoder, &params, 1);
        assert_eq!(sequential, parallel);
    }
}
