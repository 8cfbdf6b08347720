//! The decoder capability and the available encodings.

use alert_common::{AlertError, AlertLayer, DecodeParameters};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::glad::GladAlertsDecoder;
use crate::integrated::IntegratedAlertsDecoder;
use crate::pixel::{DecodedPixel, EncodedPixel};

/// A per-pixel alert decoder.
///
/// Implementations must be pure and total: every byte combination yields a
/// pixel with colour and alpha in [0, 1], and the same input always yields
/// the same output. Pixels that should not be drawn get alpha 0.
pub trait Decoder: Send + Sync {
    /// Which encoding this decoder reads.
    fn variant(&self) -> DecoderVariant;

    /// Decode one pixel under the given parameters.
    fn decode(&self, pixel: EncodedPixel, params: &DecodeParameters) -> DecodedPixel;
}

/// Alert tile encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecoderVariant {
    /// Multi-system integrated alerts
    #[default]
    Integrated,
    /// Single-system GLAD alerts
    Glad,
}

impl DecoderVariant {
    pub const ALL: [DecoderVariant; 2] = [DecoderVariant::Integrated, DecoderVariant::Glad];

    /// The decoder implementing this encoding.
    pub fn decoder(self) -> &'static dyn Decoder {
        match self {
            DecoderVariant::Integrated => &IntegratedAlertsDecoder,
            DecoderVariant::Glad => &GladAlertsDecoder,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DecoderVariant::Integrated => "integrated",
            DecoderVariant::Glad => "glad",
        }
    }

    /// Tile layer published in this encoding.
    pub fn layer(&self) -> AlertLayer {
        match self {
            DecoderVariant::Integrated => AlertLayer::integrated_alerts(),
            DecoderVariant::Glad => AlertLayer::glad_alerts(),
        }
    }
}

impl fmt::Display for DecoderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DecoderVariant {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "integrated" | "integrated_alerts" | "integrated-alerts" => Ok(DecoderVariant::Integrated),
            "glad" | "glad_alerts" | "glad-alerts" => Ok(DecoderVariant::Glad),
            other => Err(AlertError::UnknownVariant(other.to_string())),
        }
    }
}
