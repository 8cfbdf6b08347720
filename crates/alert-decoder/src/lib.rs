//! Decoding of bit-packed forest disturbance alert tiles.
//!
//! Alert tiles carry a detection date, a confidence and (for integrated
//! alerts) per-system agreement bits in their RGBA channels. This crate
//! turns those tiles into displayable RGBA rasters:
//! - Integrated alerts (GLAD-L, GLAD-S2, RADD agreement)
//! - GLAD alerts (single system)
//!
//! Per-pixel decoding is a pure function ([`Decoder::decode`]); the
//! [`TileDecodePipeline`] applies it across tiles with caching keyed by
//! tile, decoder variant and parameters.

pub mod cache;
pub mod config;
pub mod decoder;
pub mod glad;
pub mod integrated;
pub mod pipeline;
pub mod pixel;
pub mod png;
pub mod raster;
pub mod source;

pub use cache::{CacheStats, DecodeKey, DecodedTileCache};
pub use config::PipelineConfig;
pub use decoder::{Decoder, DecoderVariant};
pub use glad::{GladAlertsDecoder, GladSample};
pub use integrated::{IntegratedAlertsDecoder, IntegratedSample};
pub use pipeline::{RenderState, TileDecodePipeline};
pub use pixel::{AgreementBreakdown, AlertClass, DecodedPixel, DetectionSystem, EncodedPixel, SystemConfidence};
pub use raster::{decode_tile, DecodedTile, EncodedTile};
pub use source::{DirectoryTileSink, DirectoryTileSource, TileSink, TileSource};

pub use alert_common::{AlertError, AlertResult, DecodeParameters, TileCoord};
