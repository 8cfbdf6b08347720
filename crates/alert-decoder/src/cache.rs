//! LRU cache for decoded tiles.

use alert_common::{DecodeParameters, TileCoord};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::decoder::DecoderVariant;
use crate::raster::DecodedTile;

/// Everything a decoded tile depends on, apart from the source bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeKey {
    pub coord: TileCoord,
    pub variant: DecoderVariant,
    pub params: DecodeParameters,
}

/// Statistics for the decoded tile cache
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub evictions: u64,
}

impl CacheStats {
    /// Hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Entry-bounded LRU of decoded tiles.
///
/// The key does not cover tile contents. When a source republishes a tile
/// under the same coordinate, clear the cache.
pub struct DecodedTileCache {
    cache: LruCache<DecodeKey, Arc<DecodedTile>>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl DecodedTileCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up a tile, counting the hit or miss.
    pub fn get(&mut self, key: &DecodeKey) -> Option<Arc<DecodedTile>> {
        match self.cache.get(key) {
            Some(tile) => {
                self.hits += 1;
                Some(Arc::clone(tile))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn contains(&self, key: &DecodeKey) -> bool {
        self.cache.contains(key)
    }

    /// Insert a tile, evicting the least recently used entry when full.
    pub fn insert(&mut self, key: DecodeKey, tile: Arc<DecodedTile>) {
        if let Some((evicted, _)) = self.cache.push(key, tile) {
            if evicted != key {
                self.evictions += 1;
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.cache.len(),
            evictions: self.evictions,
        }
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrated::IntegratedAlertsDecoder;
    use crate::raster::{decode_tile, EncodedTile};

    fn key(x: u32, params: DecodeParameters) -> DecodeKey {
        DecodeKey {
            coord: TileCoord::new(5, x, 0),
            variant: DecoderVariant::Integrated,
            params,
        }
    }

    fn tile(params: &DecodeParameters) -> Arc<DecodedTile> {
        let encoded = EncodedTile::new(1, 1, vec![10, 200, 250, 8]).unwrap();
        Arc::new(decode_tile(&encoded, &IntegratedAlertsDecoder, params, usize::MAX))
    }

    #[test]
    fn test_insert_and_get() {
        let params = DecodeParameters::new(0, 10, 10, false).unwrap();
        let mut cache = DecodedTileCache::new(NonZeroUsize::new(4).unwrap());

        assert!(cache.get(&key(0, params)).is_none());
        cache.insert(key(0, params), tile(&params));
        assert!(cache.get(&key(0, params)).is_some());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_params_are_part_of_key() {
        let params = DecodeParameters::new(0, 10, 10, false).unwrap();
        let mut cache = DecodedTileCache::new(NonZeroUsize::new(4).unwrap());
        cache.insert(key(0, params), tile(&params));

        assert!(!cache.contains(&key(0, params.with_confirmed_only(true))));
    }

    #[test]
    fn test_lru_eviction() {
        let params = DecodeParameters::new(0, 10, 10, false).unwrap();
        let mut cache = DecodedTileCache::new(NonZeroUsize::new(2).unwrap());
        for x in 0..3 {
            cache.insert(key(x, params), tile(&params));
        }

        assert!(!cache.contains(&key(0, params)));
        assert!(cache.contains(&key(2, params)));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_replacing_same_key_is_not_eviction() {
        let params = DecodeParameters::new(0, 10, 10, false).unwrap();
        let mut cache = DecodedTileCache::new(NonZeroUsize::new(2).unwrap());
        cache.insert(key(0, params), tile(&params));
        cache.insert(key(0, params), tile(&params));
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let params = DecodeParameters::new(0, 10, 10, false).unwrap();
        let mut cache = DecodedTileCache::new(NonZeroUsize::new(2).unwrap());
        cache.insert(key(0, params), tile(&params));
        cache.clear();
        assert!(cache.is_empty());
    }
}
