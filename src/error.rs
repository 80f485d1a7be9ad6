use thiserror::Error;

/// Errors raised while loading a source image.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Image does not exist at the given location
    #[error("Image not found: {0}")]
    NotFound(String),

    /// Network or connection error while fetching the image
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error from S3 or S3-compatible storage
    #[error("S3 error: {0}")]
    S3(String),

    /// Local filesystem error other than a missing file
    #[error("I/O error: {0}")]
    Io(String),

    /// Bytes were fetched but could not be decoded as an image
    #[error("Failed to decode image: {0}")]
    Decode(String),
}

/// Invalid tiling configuration. Always fatal, raised before any tile is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Tiling policy name is not one of default, overlapping or padding
    #[error("{0} is not an acceptable tiling policy (expected default, overlapping or padding)")]
    UnknownPolicy(String),

    /// Tile width or height is zero
    #[error("Invalid tile size {width}x{height}: both dimensions must be greater than 0")]
    InvalidTileSize { width: u32, height: u32 },

    /// Any other invalid setting
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Faults in annotation geometry.
///
/// These are recovered locally: the offending annotation is dropped for the
/// tile being built and processing continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Flat coordinate list does not split into (x, y) pairs
    #[error("Coordinate list has odd length {0}")]
    OddCoordinateCount(usize),

    /// No points to work with
    #[error("Geometry has no points")]
    Empty,

    /// Ring has fewer points than a polygon needs
    #[error("Ring has {0} points, at least 3 are required")]
    TooFewPoints(usize),

    /// NaN or infinite coordinate
    #[error("Geometry contains a non-finite coordinate")]
    NonFinite,

    /// Annotation carries neither a segmentation nor a bbox
    #[error("Annotation has neither segmentation nor bbox")]
    MissingShape,

    /// Boolean operation or repair failed
    #[error("Geometry operation failed: {0}")]
    Operation(String),
}

/// Errors raised while persisting tiles.
#[derive(Debug, Clone, Error)]
pub enum OutputError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(String),

    /// Tile raster could not be encoded
    #[error("Failed to encode tile: {message}")]
    Encode { message: String },

    /// Annotation document could not be serialized
    #[error("Failed to serialize annotations: {0}")]
    Serialize(String),
}

/// Top-level error for a tiling run.
#[derive(Debug, Clone, Error)]
pub enum TilingError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Source image could not be loaded
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Tiles could not be written
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}
