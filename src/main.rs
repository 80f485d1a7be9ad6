//! Image Tiler - split an annotated image into training tiles.
//!
//! This binary loads one image and its annotations, tiles it and writes the
//! tiles plus a COCO-style annotation document.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_tiler::{
    config::Config,
    create_s3_client, parse_annotations,
    output::{write_coco, write_tiles, write_visualizations},
    JpegTileEncoder, LocalImageSource, S3ImageSource, SourceAnnotation, SourceError,
    TileBuilder, TileService, TileSet, TilingError,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let annotations = match load_annotations(&config) {
        Ok(annotations) => annotations,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let builder = match TileBuilder::new(config.tile_width, config.tile_height, config.policy) {
        Ok(builder) => builder,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Configuration:");
    info!("  Input: {}", config.input);
    if let Some(ref bucket) = config.s3_bucket {
        info!("  S3 bucket: {}", bucket);
        if let Some(ref endpoint) = config.s3_endpoint {
            info!("  S3 endpoint: {}", endpoint);
        }
        info!("  S3 region: {}", config.s3_region);
    }
    info!(
        "  Tiles: {}x{} ({})",
        config.tile_width, config.tile_height, config.policy
    );
    info!("  Annotations: {}", annotations.len());
    info!("  Output: {}", config.output.display());

    let tiles = match tile_input(&config, builder, &annotations).await {
        Ok(tiles) => tiles,
        Err(TilingError::Source(SourceError::Connection(e))) => {
            error!("Connection failure while fetching {}: {}", config.input, e);
            if config.uses_s3() {
                error!("Please check the S3 endpoint is reachable and try again.");
            }
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!("Failed to tile {}: {}", config.input, e);
            return ExitCode::FAILURE;
        }
    };

    if !annotations.is_empty() && tiles.annotation_count() == 0 {
        warn!("No annotation survived clipping; check the annotation coordinates");
    }

    match write_output(&config, &tiles) {
        Ok(()) => {
            info!(
                "Wrote {} tile(s) with {} annotation(s) to {}",
                tiles.len(),
                tiles.annotation_count(),
                config.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load the input image from S3 or disk and tile it.
async fn tile_input(
    config: &Config,
    builder: TileBuilder,
    annotations: &[SourceAnnotation],
) -> Result<TileSet, TilingError> {
    match config.s3_bucket {
        Some(ref bucket) => {
            let client = create_s3_client(config.s3_endpoint.as_deref(), &config.s3_region).await;
            let source = S3ImageSource::new(client, bucket.clone());
            TileService::new(source, builder)
                .tile_image(&config.input, annotations)
                .await
        }
        None => {
            TileService::new(LocalImageSource::new(), builder)
                .tile_image(&config.input, annotations)
                .await
        }
    }
}

/// Read the source annotations file, if one was given.
fn load_annotations(config: &Config) -> Result<Vec<SourceAnnotation>, TilingError> {
    let Some(ref path) = config.annotations else {
        return Ok(Vec::new());
    };

    let json = std::fs::read_to_string(path).map_err(|e| {
        image_tiler::ConfigError::Invalid(format!("{}: {}", path.display(), e))
    })?;

    Ok(parse_annotations(&json)?)
}

/// Write tiles, the annotation document and optional debug renderings.
fn write_output(config: &Config, tiles: &TileSet) -> Result<(), TilingError> {
    let encoder = JpegTileEncoder::with_quality(config.jpeg_quality);

    write_tiles(tiles, &config.output, &encoder)?;
    write_coco(tiles, &config.annotations_output())?;

    if config.visualize {
        let count = write_visualizations(tiles, &config.visualize_dir(), &encoder)?;
        info!("Wrote {} debug rendering(s)", count);
    }

    Ok(())
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_tiler=debug"
    } else {
        "image_tiler=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
