//! Common types shared by the forest alert decoding crates.

pub mod error;
pub mod layer;
pub mod params;
pub mod tile;

pub use error::{AlertError, AlertResult};
pub use layer::{AlertLayer, LayerId};
pub use params::{DayWindow, DecodeParameters, FlagValue, RawDecodeParameters};
pub use tile::TileCoord;
