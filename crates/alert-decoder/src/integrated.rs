//! Integrated alerts decoder.
//!
//! Channel layout:
//! - `a`: agreement byte. Bits 7-6 are GLAD-L, 5-4 GLAD-S2, 3-2 RADD, each
//!   `00` (none), `01` (low) or `10` (high). Bits 1-0 are unused.
//! - `r`, `g`: day index, `r * 255 + g`.
//! - `b`: `(confidence + 1) * 100 + intensity step`.
//!
//! With `confirmed_only` set, single low-confidence alerts lose a fixed
//! 255 from their intensity, which hides them. High-confidence and
//! multi-system alerts are untouched.

use alert_common::DecodeParameters;

use crate::decoder::{Decoder, DecoderVariant};
use crate::pixel::{AlertClass, DecodedPixel, EncodedPixel};

/// Multiplier applied to the low two digits of `b`.
pub const INTENSITY_SCALE: u32 = 150;

const MAX_INTENSITY: u32 = 255;

/// Intensity removed from low-confidence alerts when only confirmed alerts are wanted.
const CONFIRMED_ONLY_OFFSET: f32 = 255.0;

/// Fields unpacked from an integrated alert pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegratedSample {
    pub day: u32,
    pub agreement: u8,
    /// `floor(b / 100) - 1`; carried by the encoding, not used for colouring.
    pub confidence: i32,
    /// Already clamped to 255.
    pub intensity: u32,
}

/// Decoder for the integrated alerts encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegratedAlertsDecoder;

impl IntegratedAlertsDecoder {
    #[inline]
    pub fn unpack(pixel: EncodedPixel) -> IntegratedSample {
        IntegratedSample {
            day: pixel.r as u32 * 255 + pixel.g as u32,
            agreement: pixel.a,
            confidence: (pixel.b / 100) as i32 - 1,
            intensity: ((pixel.b % 100) as u32 * INTENSITY_SCALE).min(MAX_INTENSITY),
        }
    }

    /// Class of the pixel once the day window is applied.
    pub fn classify(pixel: EncodedPixel, params: &DecodeParameters) -> AlertClass {
        let sample = Self::unpack(pixel);
        if Self::passes_filter(&sample, params) {
            AlertClass::from_agreement(sample.agreement)
        } else {
            AlertClass::NoAlert
        }
    }

    #[inline]
    fn passes_filter(sample: &IntegratedSample, params: &DecodeParameters) -> bool {
        sample.day > 0 && params.contains_day(sample.day) && sample.agreement != 0
    }
}

impl Decoder for IntegratedAlertsDecoder {
    fn variant(&self) -> DecoderVariant {
        DecoderVariant::Integrated
    }

    fn decode(&self, pixel: EncodedPixel, params: &DecodeParameters) -> DecodedPixel {
        let sample = Self::unpack(pixel);
        if !Self::passes_filter(&sample, params) {
            return DecodedPixel::TRANSPARENT;
        }

        let intensity = sample.intensity as f32;
        let class = AlertClass::from_agreement(sample.agreement);
        let alpha = match class {
            AlertClass::SingleLowConfidence if params.confirmed_only() => {
                (intensity - CONFIRMED_ONLY_OFFSET) / 255.0
            }
            _ => intensity / 255.0,
        };

        match class.color() {
            Some(color) => DecodedPixel::new(color, alpha),
            None => DecodedPixel::TRANSPARENT,
        }
    }
}
