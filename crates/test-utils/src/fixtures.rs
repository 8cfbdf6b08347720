//! Common decode parameter fixtures.

use alert_common::DecodeParameters;

/// Day window used by the reference integrated alerts layer.
pub mod window {
    pub const START_DAY: u32 = 2785;
    pub const END_DAY: u32 = 3334;
    pub const NUMBER_OF_DAYS: u32 = 3334;
}

/// Standard tile edge length
pub const TILE_SIZE: usize = 256;

/// The reference window, without or with the confirmed-only filter.
pub fn reference_params(confirmed_only: bool) -> DecodeParameters {
    DecodeParameters::new(
        window::START_DAY,
        window::END_DAY,
        window::NUMBER_OF_DAYS,
        confirmed_only,
    )
    .expect("reference window is valid")
}

/// A window covering every representable day.
pub fn open_params(confirmed_only: bool) -> DecodeParameters {
    DecodeParameters::new(0, u32::MAX, u32::MAX, confirmed_only).expect("open window is valid")
}

/// A window containing exactly one day.
pub fn single_day_params(day: u32, confirmed_only: bool) -> DecodeParameters {
    DecodeParameters::new(day, day, day, confirmed_only).expect("single day window is valid")
}
