//! GLAD alerts decoder.
//!
//! Channel layout:
//! - `r`, `g`: day index, `r * 255 * 255 + g * 255`.
//! - `b`: confidence magnitude. Values of 200 and above are confirmed.
//! - `a`: unused.
//!
//! `confirmed_only` acts as a hard threshold on `b`, unlike the
//! subtractive offset used for integrated alerts. The two confidence
//! scales are not comparable, so the mechanisms stay separate.

use alert_common::DecodeParameters;

use crate::decoder::{Decoder, DecoderVariant};
use crate::pixel::{DecodedPixel, EncodedPixel, HIGH_CONFIDENCE_COLOR, LOW_CONFIDENCE_COLOR};

/// Confidence at which a GLAD alert counts as confirmed.
pub const CONFIRMED_THRESHOLD: u8 = 200;

const INTENSITY_SCALE: u32 = 150;
const MAX_INTENSITY: u32 = 255;

/// Fields unpacked from a GLAD alert pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GladSample {
    pub day: u32,
    pub confidence: u8,
    /// Already clamped to 255.
    pub intensity: u32,
}

impl GladSample {
    pub fn is_confirmed(&self) -> bool {
        self.confidence >= CONFIRMED_THRESHOLD
    }
}

/// Decoder for the GLAD alerts encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct GladAlertsDecoder;

impl GladAlertsDecoder {
    #[inline]
    pub fn unpack(pixel: EncodedPixel) -> GladSample {
        GladSample {
            day: pixel.r as u32 * 255 * 255 + pixel.g as u32 * 255,
            confidence: pixel.b,
            intensity: ((pixel.b % 100) as u32 * INTENSITY_SCALE).min(MAX_INTENSITY),
        }
    }

    /// Minimum confidence shown under these parameters.
    #[inline]
    pub fn confidence_threshold(params: &DecodeParameters) -> u8 {
        if params.confirmed_only() {
            CONFIRMED_THRESHOLD
        } else {
            0
        }
    }
}

impl Decoder for GladAlertsDecoder {
    fn variant(&self) -> DecoderVariant {
        DecoderVariant::Glad
    }

    fn decode(&self, pixel: EncodedPixel, params: &DecodeParameters) -> DecodedPixel {
        let sample = Self::unpack(pixel);
        if sample.day == 0
            || !params.contains_day(sample.day)
            || sample.confidence < Self::confidence_threshold(params)
        {
            return DecodedPixel::TRANSPARENT;
        }

        let color = if sample.is_confirmed() {
            HIGH_CONFIDENCE_COLOR
        } else {
            LOW_CONFIDENCE_COLOR
        };
        DecodedPixel::new(color, sample.intensity as f32 / 255.0)
    }
}
