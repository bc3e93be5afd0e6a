use thiserror::Error;

/// everything that can go wrong while building, painting or scoring a painting.
#[derive(Debug, Error)]
pub enum PaintError {
    #[error("vertex {index} is not a finite 2d point: ({x}, {y})")]
    InvalidVertex { index: usize, x: f32, y: f32 },

    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewSides(usize),

    #[error("color channels must be finite values in [0, 255], got {0:?}")]
    InvalidColor([f32; 3]),

    #[error("fit must be called on both paintings before comparing them")]
    Unevaluated,

    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("crossover needs genes from a parent that has none")]
    EmptyParent,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Settings(#[from] serde_json::Error),
}
