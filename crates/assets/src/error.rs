/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("cube face {face} is {width}x{height}, expected {expected}x{expected}")]
    CubeFaceSize {
        face: usize,
        width: u32,
        height: u32,
        expected: u32,
    },
    #[error("could not start load worker: {0}")]
    Worker(#[source] std::io::Error),
}
