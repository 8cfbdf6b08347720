//! XYZ tile addressing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AlertError, AlertResult};

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Generate a cache key string.
    pub fn cache_key(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }

    /// Number of tiles along one edge at this zoom level.
    pub fn tiles_per_side(&self) -> u64 {
        1u64 << self.z.min(63)
    }

    /// Check that x and y address a tile that exists at this zoom.
    pub fn is_valid(&self) -> bool {
        self.z < 32 && (self.x as u64) < self.tiles_per_side() && (self.y as u64) < self.tiles_per_side()
    }

    /// Parse a `z/x/y` string. A trailing file extension on `y` is ignored,
    /// so `"5/10/12.png"` parses as well.
    pub fn parse(s: &str) -> AlertResult<Self> {
        let mut parts = s.trim_matches('/').split('/');
        let (Some(z), Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AlertError::InvalidTile(format!("expected z/x/y, got '{}'", s)));
        };
        let y = y.split_once('.').map(|(stem, _)| stem).unwrap_or(y);

        let parse = |name: &str, value: &str| {
            value
                .parse::<u32>()
                .map_err(|_| AlertError::InvalidTile(format!("bad {} '{}' in '{}'", name, value, s)))
        };

        Ok(Self::new(parse("z", z)?, parse("x", x)?, parse("y", y)?))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}
