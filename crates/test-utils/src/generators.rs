//! Alert pixel encoders and synthetic tile generators.
//!
//! The encoders are the inverse of the decoder layouts and only exist for
//! tests; they panic on values the layout cannot represent.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Largest day an integrated alert pixel can carry (`255 * 255 + 255`).
pub const MAX_INTEGRATED_DAY: u32 = 255 * 255 + 255;

/// Agreement bytes spanning every alert class.
pub const SAMPLE_AGREEMENTS: [u8; 9] = [0, 4, 8, 12, 16, 32, 64, 128, 255];

/// Encode an integrated alert pixel.
///
/// `day = r * 255 + g`, `b` passes through, `agreement` goes in alpha.
///
/// # Example
///
/// ```
/// use test_utils::encode_integrated;
///
/// assert_eq!(encode_integrated(2950, 250, 8), [11, 145, 250, 8]);
/// ```
pub fn encode_integrated(day: u32, b: u8, agreement: u8) -> [u8; 4] {
    assert!(day <= MAX_INTEGRATED_DAY, "day {} not representable", day);
    let (r, g) = if day / 255 > 255 {
        (255, day - 255 * 255)
    } else {
        (day / 255, day % 255)
    };
    [r as u8, g as u8, b, agreement]
}

/// Encode a GLAD alert pixel. `day` must be a multiple of 255.
///
/// # Example
///
/// ```
/// use test_utils::encode_glad;
///
/// assert_eq!(encode_glad(7650, 250), [0, 30, 250, 255]);
/// ```
pub fn encode_glad(day: u32, confidence: u8) -> [u8; 4] {
    assert!(day % 255 == 0, "GLAD days are multiples of 255, got {}", day);
    let units = day / 255;
    assert!(units <= 255 * 255 + 255, "day {} not representable", day);
    let (r, g) = if units / 255 > 255 {
        (255, units - 255 * 255)
    } else {
        (units / 255, units % 255)
    };
    [r as u8, g as u8, confidence, 255]
}

/// Fill a tile with one pixel value.
pub fn uniform_tile(width: usize, height: usize, pixel: [u8; 4]) -> Vec<u8> {
    pixel.repeat(width * height)
}

/// Integrated alert tile cycling through days in `first_day..=last_day`,
/// the sample agreement bytes, and a few intensity steps.
pub fn integrated_alert_tile(width: usize, height: usize, first_day: u32, last_day: u32) -> Vec<u8> {
    assert!(first_day <= last_day);
    let span = (last_day - first_day + 1) as usize;
    let b_values = [150u8, 199, 250, 101, 200, 202];

    (0..width * height)
        .flat_map(|i| {
            let day = first_day + (i % span) as u32;
            let agreement = SAMPLE_AGREEMENTS[i % SAMPLE_AGREEMENTS.len()];
            let b = b_values[i % b_values.len()];
            encode_integrated(day, b, agreement)
        })
        .collect()
}

/// Uniformly random RGBA bytes from a fixed seed.
pub fn random_tile(width: usize, height: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; width * height * 4];
    rng.fill(data.as_mut_slice());
    data
}
