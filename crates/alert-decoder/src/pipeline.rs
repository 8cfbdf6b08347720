//! Tile decode pipeline.
//!
//! ```text
//! TileSource ──► EncodedTile ──► TileDecodePipeline ──► Arc<DecodedTile> ──► Renderer
//!                                   │
//!                                   ├─► snapshot RenderState (variant + params) once
//!                                   ├─► DecodedTileCache hit? return it
//!                                   └─► decode_tile() and cache under DecodeKey
//! ```
//!
//! Parameters and decoder variant live in one [`RenderState`] behind a
//! single lock. Each decode pass copies the state once up front, so all
//! pixels of a tile (and all tiles of a [`TileDecodePipeline::decode_many`]
//! batch) see the same values even if the state changes mid-pass.

use alert_common::{AlertError, AlertResult, DecodeParameters, TileCoord};
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::cache::{CacheStats, DecodeKey, DecodedTileCache};
use crate::config::PipelineConfig;
use crate::decoder::DecoderVariant;
use crate::raster::{decode_tile, DecodedTile, EncodedTile};

/// The inputs a decode pass depends on besides the tile itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderState {
    pub variant: DecoderVariant,
    pub params: DecodeParameters,
}

/// Applies the current decoder and parameters to whole tiles.
pub struct TileDecodePipeline {
    config: PipelineConfig,
    state: RwLock<RenderState>,
    generation: AtomicU64,
    cache: Mutex<DecodedTileCache>,
}

impl TileDecodePipeline {
    pub fn new(
        variant: DecoderVariant,
        params: DecodeParameters,
        config: PipelineConfig,
    ) -> AlertResult<Self> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.cache_entries)
            .ok_or_else(|| AlertError::Config("cache_entries must be > 0".to_string()))?;

        info!(
            %variant,
            %params,
            cache_entries = config.cache_entries,
            "Tile decode pipeline ready"
        );

        Ok(Self {
            config,
            state: RwLock::new(RenderState { variant, params }),
            generation: AtomicU64::new(0),
            cache: Mutex::new(DecodedTileCache::new(capacity)),
        })
    }

    /// Current variant and parameters, read together.
    pub fn state(&self) -> RenderState {
        *self.state.read()
    }

    pub fn parameters(&self) -> DecodeParameters {
        self.state.read().params
    }

    pub fn variant(&self) -> DecoderVariant {
        self.state.read().variant
    }

    /// Incremented each time the variant or parameters actually change.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replace the decode parameters. Returns false when nothing changed.
    pub fn set_parameters(&self, params: DecodeParameters) -> bool {
        self.update(|state| state.params = params)
    }

    /// Switch decoder. Returns false when the variant is already active.
    pub fn set_variant(&self, variant: DecoderVariant) -> bool {
        self.update(|state| state.variant = variant)
    }

    fn update(&self, apply: impl FnOnce(&mut RenderState)) -> bool {
        let mut state = self.state.write();
        let before = *state;
        apply(&mut state);
        if *state == before {
            return false;
        }
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(
            generation,
            variant = %state.variant,
            params = %state.params,
            "Render state changed"
        );
        true
    }

    /// Decode one tile under the current state, reusing a cached result
    /// when the tile was already decoded under the same state.
    ///
    /// The cache is keyed by coordinate, variant and parameters, not by the
    /// tile bytes. A hit returns the raster decoded from the bytes first seen
    /// at `coord`, so call [`clear_cache`](Self::clear_cache) after the
    /// source republishes tiles.
    pub fn decode(&self, coord: TileCoord, tile: &EncodedTile) -> Arc<DecodedTile> {
        let state = self.state();
        self.decode_with_state(coord, tile, state)
    }

    /// Decode a batch of tiles in parallel under one state snapshot.
    ///
    /// Shares the cache with [`decode`](Self::decode) and the same caveat
    /// applies: republished tiles need a [`clear_cache`](Self::clear_cache).
    pub fn decode_many(&self, tiles: &[(TileCoord, EncodedTile)]) -> Vec<(TileCoord, Arc<DecodedTile>)> {
        let state = self.state();
        tiles
            .par_iter()
            .map(|(coord, tile)| (*coord, self.decode_with_state(*coord, tile, state)))
            .collect()
    }

    fn decode_with_state(&self, coord: TileCoord, tile: &EncodedTile, state: RenderState) -> Arc<DecodedTile> {
        let key = DecodeKey {
            coord,
            variant: state.variant,
            params: state.params,
        };

        if let Some(cached) = self.cache.lock().get(&key) {
            debug!(tile = %coord, "Decoded tile cache hit");
            return cached;
        }

        let start = Instant::now();
        let decoded = Arc::new(decode_tile(
            tile,
            state.variant.decoder(),
            &state.params,
            self.config.parallel_threshold,
        ));
        debug!(
            tile = %coord,
            variant = %state.variant,
            visible = decoded.visible_pixels(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Decoded tile"
        );

        self.cache.lock().insert(key, Arc::clone(&decoded));
        decoded
    }

    /// True when the tile was produced under the current variant and parameters.
    pub fn is_current(&self, tile: &DecodedTile) -> bool {
        let state = self.state();
        tile.variant() == state.variant && !tile.is_stale(&state.params)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    /// Drop every cached tile, e.g. after the source republishes tiles.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}
