//! Pixel contract shared by all decoders.

/// Colour of single low-confidence alerts (and provisional GLAD alerts).
pub const LOW_CONFIDENCE_COLOR: [u8; 3] = [237, 164, 194];

/// Colour of single high-confidence alerts (and confirmed GLAD alerts).
pub const HIGH_CONFIDENCE_COLOR: [u8; 3] = [220, 102, 153];

/// Colour of pixels flagged by more than one detection system.
pub const MULTIPLE_ALERTS_COLOR: [u8; 3] = [201, 42, 109];

/// One raw RGBA sample from an alert tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EncodedPixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl EncodedPixel {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build from a 4-byte RGBA chunk. Returns None for any other length.
    #[inline]
    pub fn from_slice(chunk: &[u8]) -> Option<Self> {
        match *chunk {
            [r, g, b, a] => Some(Self { r, g, b, a }),
            _ => None,
        }
    }

    /// Build from normalized channels in [0, 1], as a texture sampler would
    /// hand them over.
    pub fn from_normalized(channels: [f32; 4]) -> Self {
        let [r, g, b, a] = channels.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for EncodedPixel {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Decoder output: normalized colour plus opacity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecodedPixel {
    pub color: [f32; 3],
    pub alpha: f32,
}

impl DecodedPixel {
    /// Not drawn.
    pub const TRANSPARENT: DecodedPixel = DecodedPixel {
        color: [0.0, 0.0, 0.0],
        alpha: 0.0,
    };

    /// Build from an 8-bit colour and an unclamped alpha. Alpha is clamped to [0, 1].
    #[inline]
    pub fn new(color: [u8; 3], alpha: f32) -> Self {
        Self {
            color: color.map(|c| c as f32 / 255.0),
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }

    /// Convert to straight-alpha RGBA8. Invisible pixels become all zeros.
    #[inline]
    pub fn to_rgba8(&self) -> [u8; 4] {
        if !self.is_visible() {
            return [0, 0, 0, 0];
        }
        let [r, g, b] = self.color.map(to_byte);
        [r, g, b, to_byte(self.alpha)]
    }
}

#[inline(always)]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Visual class of an integrated-alert pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertClass {
    NoAlert,
    SingleLowConfidence,
    SingleHighConfidence,
    MultipleAlerts,
}

impl AlertClass {
    /// Classify an agreement byte.
    ///
    /// `{4, 16, 64}` and `{8, 32, 128}` are exactly the bytes where one
    /// system reports low (`01`) or high (`10`) confidence and the others
    /// report nothing. Every other non-zero byte is treated as agreement
    /// between several systems.
    #[inline]
    pub fn from_agreement(agreement: u8) -> Self {
        match agreement {
            0 => AlertClass::NoAlert,
            4 | 16 | 64 => AlertClass::SingleLowConfidence,
            8 | 32 | 128 => AlertClass::SingleHighConfidence,
            _ => AlertClass::MultipleAlerts,
        }
    }

    /// Band colour, or None for pixels that are never drawn.
    pub fn color(&self) -> Option<[u8; 3]> {
        match self {
            AlertClass::NoAlert => None,
            AlertClass::SingleLowConfidence => Some(LOW_CONFIDENCE_COLOR),
            AlertClass::SingleHighConfidence => Some(HIGH_CONFIDENCE_COLOR),
            AlertClass::MultipleAlerts => Some(MULTIPLE_ALERTS_COLOR),
        }
    }
}

/// Detection systems packed into the agreement byte, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionSystem {
    GladL,
    GladS2,
    Radd,
}

impl DetectionSystem {
    pub const ALL: [DetectionSystem; 3] = [
        DetectionSystem::GladL,
        DetectionSystem::GladS2,
        DetectionSystem::Radd,
    ];

    /// Bit offset of this system's 2-bit code. Bits 0-1 are unused.
    fn shift(self) -> u8 {
        match self {
            DetectionSystem::GladL => 6,
            DetectionSystem::GladS2 => 4,
            DetectionSystem::Radd => 2,
        }
    }
}

/// A single system's 2-bit confidence code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemConfidence {
    /// `00`
    None,
    /// `01`
    Low,
    /// `10`
    High,
    /// `11`, not produced by the encoder
    Reserved,
}

impl SystemConfidence {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => SystemConfidence::None,
            0b01 => SystemConfidence::Low,
            0b10 => SystemConfidence::High,
            _ => SystemConfidence::Reserved,
        }
    }
}

/// Per-system view of an agreement byte.
///
/// e.g. `0b00_10_01_00` is no GLAD-L, high GLAD-S2, low RADD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgreementBreakdown {
    pub glad_l: SystemConfidence,
    pub glad_s2: SystemConfidence,
    pub radd: SystemConfidence,
}

impl AgreementBreakdown {
    pub fn from_agreement(agreement: u8) -> Self {
        let code = |system: DetectionSystem| SystemConfidence::from_bits(agreement >> system.shift());
        Self {
            glad_l: code(DetectionSystem::GladL),
            glad_s2: code(DetectionSystem::GladS2),
            radd: code(DetectionSystem::Radd),
        }
    }

    pub fn get(&self, system: DetectionSystem) -> SystemConfidence {
        match system {
            DetectionSystem::GladL => self.glad_l,
            DetectionSystem::GladS2 => self.glad_s2,
            DetectionSystem::Radd => self.radd,
        }
    }

    /// Number of systems with a non-zero code.
    pub fn detecting_systems(&self) -> usize {
        DetectionSystem::ALL
            .iter()
            .filter(|&&s| self.get(s) != SystemConfidence::None)
            .count()
    }
}
