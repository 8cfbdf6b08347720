//! Alert tile decode tool.
//!
//! Decodes bit-packed forest alert tiles stored on disk into displayable
//! RGBA PNG tiles. The input is either a single `.png` tile or a
//! `{z}/{x}/{y}.png` directory tree, which is mirrored into the output.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use alert_common::{DecodeParameters, FlagValue, RawDecodeParameters, TileCoord};
use alert_decoder::{
    DecoderVariant, DirectoryTileSink, DirectoryTileSource, EncodedTile, PipelineConfig,
    TileDecodePipeline, TileSink, TileSource,
};

/// Tiles handed to the pipeline per parallel batch in tree mode.
const BATCH_SIZE: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "alert-decode")]
#[command(about = "Decode forest alert tiles into displayable PNG tiles")]
struct Args {
    /// Encoded tile (.png) or {z}/{x}/{y}.png directory tree
    #[arg(short, long, env = "ALERT_INPUT")]
    input: PathBuf,

    /// Output file (single tile) or directory (tree)
    #[arg(short, long, env = "ALERT_OUTPUT")]
    output: PathBuf,

    /// Tile encoding: integrated or glad
    #[arg(long, env = "ALERT_VARIANT", default_value = "integrated")]
    variant: DecoderVariant,

    /// First day index shown (inclusive)
    #[arg(long, env = "ALERT_START_DAY", allow_negative_numbers = true)]
    start_day: Option<f64>,

    /// Last day index shown (inclusive)
    #[arg(long, env = "ALERT_END_DAY", allow_negative_numbers = true)]
    end_day: Option<f64>,

    /// Total days in the dataset
    #[arg(long, env = "ALERT_NUMBER_OF_DAYS")]
    number_of_days: Option<f64>,

    /// Only show confirmed alerts (env accepts true/false, 1/0, yes/no)
    #[arg(
        long,
        env = "ALERT_CONFIRMED_ONLY",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    confirmed_only: bool,

    /// JSON parameter file (startDayIndex, endDayIndex, numberOfDays,
    /// confirmedOnly). Overrides the individual day arguments; when the file
    /// has no confirmedOnly, --confirmed-only still applies.
    #[arg(long, env = "ALERT_PARAMS")]
    params: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "ALERT_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Debug, Default)]
struct Summary {
    tiles: usize,
    visible_pixels: usize,
    skipped: usize,
    failed: usize,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let params = load_params(&args)?;
    let config = PipelineConfig::from_env();
    let pipeline = TileDecodePipeline::new(args.variant, params, config)?;

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        variant = %args.variant,
        %params,
        "Starting alert tile decode"
    );

    let start = Instant::now();
    let summary = if args.input.is_dir() {
        decode_tree(&pipeline, &args.input, &args.output)?
    } else {
        decode_file(&pipeline, &args.input, &args.output)?
    };

    let stats = pipeline.cache_stats();
    info!(
        tiles = summary.tiles,
        visible_pixels = summary.visible_pixels,
        skipped = summary.skipped,
        failed = summary.failed,
        cache_hits = stats.hits,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Decode complete"
    );

    if summary.failed > 0 {
        bail!("{} tile(s) failed to decode", summary.failed);
    }
    Ok(())
}

/// Parameters from the JSON file when given, otherwise from the individual
/// arguments. Both paths go through the lenient normalization.
fn load_params(args: &Args) -> Result<DecodeParameters> {
    if let Some(path) = &args.params {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading parameter file {}", path.display()))?;
        let mut raw: RawDecodeParameters = serde_json::from_str(&json)
            .with_context(|| format!("parsing parameter file {}", path.display()))?;
        if raw.confirmed_only.is_none() {
            raw.confirmed_only = Some(FlagValue::Bool(args.confirmed_only));
        }
        return Ok(DecodeParameters::normalize(&raw));
    }

    Ok(DecodeParameters::normalize(&raw_from_args(args)))
}

fn raw_from_args(args: &Args) -> RawDecodeParameters {
    RawDecodeParameters {
        start_day_index: args.start_day,
        end_day_index: args.end_day,
        number_of_days: args.number_of_days,
        confirmed_only: Some(FlagValue::Bool(args.confirmed_only)),
    }
}

/// Coordinate implied by the last three path components, if they form one.
fn coord_from_path(path: &Path) -> Option<TileCoord> {
    let parts: Vec<_> = path
        .components()
        .rev()
        .take(3)
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    if parts.len() != 3 {
        return None;
    }
    TileCoord::parse(&format!("{}/{}/{}", parts[2], parts[1], parts[0])).ok()
}

fn decode_file(pipeline: &TileDecodePipeline, input: &Path, output: &Path) -> Result<Summary> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let tile = EncodedTile::from_png(&bytes).with_context(|| format!("decoding {}", input.display()))?;

    let coord = coord_from_path(input).unwrap_or_default();
    let decoded = pipeline.decode(coord, &tile);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, decoded.to_png()?).with_context(|| format!("writing {}", output.display()))?;

    info!(
        tile = %coord,
        width = decoded.width(),
        height = decoded.height(),
        visible = decoded.visible_pixels(),
        "Decoded tile"
    );

    Ok(Summary {
        tiles: 1,
        visible_pixels: decoded.visible_pixels(),
        ..Default::default()
    })
}

fn decode_tree(pipeline: &TileDecodePipeline, input: &Path, output: &Path) -> Result<Summary> {
    let source = DirectoryTileSource::new(input);
    let sink = DirectoryTileSink::new(output);
    let layer = pipeline.variant().layer();
    let mut summary = Summary::default();

    let coords = source.list()?;
    info!(found = coords.len(), layer = %layer.id, "Scanned input tree");

    let mut supported = Vec::with_capacity(coords.len());
    for coord in coords {
        match layer.check_coord(&coord) {
            Ok(()) => supported.push(coord),
            Err(e) => {
                warn!(tile = %coord, error = %e, "Skipping tile not addressable on layer");
                summary.skipped += 1;
            }
        }
    }

    for chunk in supported.chunks(BATCH_SIZE) {
        let mut batch = Vec::with_capacity(chunk.len());
        for &coord in chunk {
            match source.tile(coord) {
                Ok(Some(tile)) => batch.push((coord, tile)),
                Ok(None) => {
                    debug!(tile = %coord, "Tile disappeared before decode");
                    summary.skipped += 1;
                }
                Err(e) => {
                    warn!(tile = %coord, error = %e, "Failed to read tile");
                    summary.failed += 1;
                }
            }
        }

        for (coord, decoded) in pipeline.decode_many(&batch) {
            match sink.write(coord, &decoded) {
                Ok(()) => {
                    summary.tiles += 1;
                    summary.visible_pixels += decoded.visible_pixels();
                }
                Err(e) => {
                    warn!(tile = %coord, error = %e, "Failed to write tile");
                    summary.failed += 1;
                }
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_decoder::png;
    use tempfile::TempDir;
    use test_utils::{encode_integrated, reference_params, uniform_tile, window};

    fn pipeline() -> TileDecodePipeline {
        TileDecodePipeline::new(
            DecoderVariant::Integrated,
            reference_params(false),
            PipelineConfig::default(),
        )
        .unwrap()
    }

    fn write_tile(root: &Path, z: u32, x: u32, y: u32, pixel: [u8; 4]) {
        let dir = root.join(z.to_string()).join(x.to_string());
        fs::create_dir_all(&dir).unwrap();
        let bytes = png::encode_rgba(&uniform_tile(4, 4, pixel), 4, 4).unwrap();
        fs::write(dir.join(format!("{}.png", y)), bytes).unwrap();
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "alert-decode",
            "--input",
            "in",
            "--output",
            "out",
            "--variant",
            "glad",
            "--start-day",
            "-5",
            "--end-day",
            "3334",
            "--confirmed-only",
        ])
        .unwrap();
        assert_eq!(args.variant, DecoderVariant::Glad);
        assert_eq!(args.start_day, Some(-5.0));
        assert!(args.confirmed_only);

        let params = load_params(&args).unwrap();
        assert_eq!(params.start_day_index(), Some(0));
        assert_eq!(params.end_day_index(), Some(3334));
        assert_eq!(params.number_of_days(), 3334);
        assert!(params.confirmed_only());
    }

    #[test]
    fn test_params_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.json");
        fs::write(
            &path,
            r#"{"startDayIndex": 2785, "endDayIndex": 3334, "numberOfDays": 3334, "confirmedOnly": 1}"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "alert-decode",
            "-i",
            "in",
            "-o",
            "out",
            "--params",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(load_params(&args).unwrap(), reference_params(true));
    }

    #[test]
    fn test_confirmed_only_from_env_accepts_numbers() {
        let parse = || Args::try_parse_from(["alert-decode", "-i", "in", "-o", "out", "--end-day", "10"]);

        std::env::set_var("ALERT_CONFIRMED_ONLY", "1");
        let set = parse();
        std::env::set_var("ALERT_CONFIRMED_ONLY", "0");
        let unset = parse();
        std::env::remove_var("ALERT_CONFIRMED_ONLY");

        assert!(set.unwrap().confirmed_only);
        assert!(!unset.unwrap().confirmed_only);
    }

    #[test]
    fn test_params_file_without_flag_keeps_confirmed_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{"startDayIndex": 1, "endDayIndex": 10}"#).unwrap();

        let args = Args::try_parse_from([
            "alert-decode",
            "-i",
            "in",
            "-o",
            "out",
            "--confirmed-only",
            "--params",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let params = load_params(&args).unwrap();
        assert!(params.confirmed_only());
        assert_eq!(params.end_day_index(), Some(10));

        // An explicit value in the file wins
        fs::write(&path, r#"{"startDayIndex": 1, "endDayIndex": 10, "confirmedOnly": false}"#).unwrap();
        assert!(!load_params(&args).unwrap().confirmed_only());
    }

    #[test]
    fn test_coord_from_path() {
        assert_eq!(
            coord_from_path(Path::new("/data/tiles/10/300/400.png")),
            Some(TileCoord::new(10, 300, 400))
        );
        assert_eq!(coord_from_path(Path::new("tile.png")), None);
    }

    #[test]
    fn test_decode_tree_skips_unaddressable_tiles() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let pixel = encode_integrated(window::START_DAY + 1, 250, 8);
        write_tile(input.path(), 5, 1, 1, pixel);
        write_tile(input.path(), 6, 2, 3, pixel);
        write_tile(input.path(), 2, 0, 0, pixel);
        // x outside the zoom 5 grid
        write_tile(input.path(), 5, 40, 0, pixel);

        let summary = decode_tree(&pipeline(), input.path(), output.path()).unwrap();
        assert_eq!(summary.tiles, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.visible_pixels, 32);
        assert!(output.path().join("6/2/3.png").exists());
        assert!(!output.path().join("2/0/0.png").exists());
        assert!(!output.path().join("5/40/0.png").exists());
    }

    #[test]
    fn test_decode_file() {
        let dir = TempDir::new().unwrap();
        write_tile(dir.path(), 7, 1, 1, encode_integrated(window::START_DAY - 1, 250, 8));
        let output = dir.path().join("out/decoded.png");

        let summary = decode_file(&pipeline(), &dir.path().join("7/1/1.png"), &output).unwrap();
        assert_eq!(summary.tiles, 1);
        assert_eq!(summary.visible_pixels, 0);
        assert!(output.exists());
    }
}
