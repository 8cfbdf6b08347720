//! Alert layer definitions: where tiles come from and which zooms they cover.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{AlertError, AlertResult, TileCoord};

/// Unique identifier for a layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standard tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Zoom range served by the alert tile products.
pub const ALERT_MIN_ZOOM: u32 = 3;
pub const ALERT_MAX_ZOOM: u32 = 12;

/// An alert raster layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertLayer {
    /// Unique layer identifier
    pub id: LayerId,

    /// Tile URL with `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,

    /// Tile edge length in pixels
    pub tile_size: u32,

    /// Lowest zoom with data
    pub min_zoom: u32,

    /// Highest zoom with data
    pub max_zoom: u32,
}

impl AlertLayer {
    /// Integrated alerts (GLAD-L, GLAD-S2 and RADD combined).
    pub fn integrated_alerts() -> Self {
        Self {
            id: LayerId::new("gfw_integrated_alerts"),
            url_template:
                "https://tiles.globalforestwatch.org/gfw_integrated_alerts/latest/default/{z}/{x}/{y}.png"
                    .to_string(),
            tile_size: DEFAULT_TILE_SIZE,
            min_zoom: ALERT_MIN_ZOOM,
            max_zoom: ALERT_MAX_ZOOM,
        }
    }

    /// GLAD-L alerts.
    pub fn glad_alerts() -> Self {
        Self {
            id: LayerId::new("umd_glad_landsat_alerts"),
            url_template:
                "https://tiles.globalforestwatch.org/umd_glad_landsat_alerts/latest/default/{z}/{x}/{y}.png"
                    .to_string(),
            tile_size: DEFAULT_TILE_SIZE,
            min_zoom: ALERT_MIN_ZOOM,
            max_zoom: ALERT_MAX_ZOOM,
        }
    }

    pub fn supports_zoom(&self, zoom: u32) -> bool {
        zoom >= self.min_zoom && zoom <= self.max_zoom
    }

    /// Check that a coordinate is addressable on this layer.
    pub fn check_coord(&self, coord: &TileCoord) -> AlertResult<()> {
        if !self.supports_zoom(coord.z) {
            return Err(AlertError::UnsupportedZoom {
                zoom: coord.z,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        if !coord.is_valid() {
            return Err(AlertError::InvalidTile(format!(
                "{} is outside the zoom {} tile grid",
                coord, coord.z
            )));
        }
        Ok(())
    }

    /// Expand the URL template for a tile.
    pub fn tile_url(&self, coord: &TileCoord) -> AlertResult<String> {
        self.check_coord(coord)?;
        Ok(self
            .url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string()))
    }
}
