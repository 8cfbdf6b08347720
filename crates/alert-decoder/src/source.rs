//! Tile source and sink seams, with `{z}/{x}/{y}.png` directory implementations.
//!
//! Network fetching stays outside this crate; anything that can hand over
//! RGBA tiles by coordinate can implement [`TileSource`].

use alert_common::{AlertResult, TileCoord};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::raster::{DecodedTile, EncodedTile};

/// Supplies encoded alert tiles by coordinate.
pub trait TileSource: Send + Sync {
    /// Fetch a tile. `Ok(None)` means the source has no tile there.
    fn tile(&self, coord: TileCoord) -> AlertResult<Option<EncodedTile>>;
}

/// Consumes decoded tiles.
pub trait TileSink: Send + Sync {
    fn write(&self, coord: TileCoord, tile: &DecodedTile) -> AlertResult<()>;
}

/// Path of a tile below a `{z}/{x}/{y}.png` root.
fn tile_path(root: &Path, coord: TileCoord) -> PathBuf {
    root.join(coord.z.to_string())
        .join(coord.x.to_string())
        .join(format!("{}.png", coord.y))
}

/// Reads PNG tiles from a `{z}/{x}/{y}.png` directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryTileSource {
    root: PathBuf,
}

impl DirectoryTileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn tile_path(&self, coord: TileCoord) -> PathBuf {
        tile_path(&self.root, coord)
    }

    /// Every tile coordinate present in the tree, sorted. Files that do not
    /// follow the `{z}/{x}/{y}.png` layout are skipped.
    pub fn list(&self) -> AlertResult<Vec<TileCoord>> {
        let mut coords = Vec::new();

        for entry in WalkDir::new(&self.root).min_depth(3).max_depth(3) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("png") {
                continue;
            }

            let relative = match path.strip_prefix(&self.root) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            let parts: Vec<_> = relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect();

            match TileCoord::parse(&parts.join("/")) {
                Ok(coord) => coords.push(coord),
                Err(e) => debug!(path = %path.display(), error = %e, "Skipping non-tile file"),
            }
        }

        coords.sort();
        Ok(coords)
    }
}

impl TileSource for DirectoryTileSource {
    fn tile(&self, coord: TileCoord) -> AlertResult<Option<EncodedTile>> {
        let path = self.tile_path(coord);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        EncodedTile::from_png(&bytes).map(Some)
    }
}

/// Writes decoded tiles as PNG into a `{z}/{x}/{y}.png` directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryTileSink {
    root: PathBuf,
}

impl DirectoryTileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn tile_path(&self, coord: TileCoord) -> PathBuf {
        tile_path(&self.root, coord)
    }
}

impl TileSink for DirectoryTileSink {
    fn write(&self, coord: TileCoord, tile: &DecodedTile) -> AlertResult<()> {
        let path = self.tile_path(coord);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, tile.to_png()?)?;
        debug!(tile = %coord, path = %path.display(), "Wrote decoded tile");
        Ok(())
    }
}
