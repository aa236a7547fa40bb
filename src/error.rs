use thiserror::Error;

pub type Result<T> = std::result::Result<T, MinerError>;

/// Errors raised by the pipeline core.
///
/// Empty results (zero posts, zero pain statements, zero clusters) are not
/// errors; callers check collection sizes. Per-cluster rejection is likewise
/// never an error, it is recorded in `FilterResult::rejection_reasons`.
#[derive(Error, Debug)]
pub enum MinerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown clustering method: {0}. Must be 'tfidf_kmeans' or 'simple_hash'.")]
    UnknownClusteringMethod(String),

    #[error("tfidf_kmeans clustering requires the 'kmeans' feature. Rebuild with --features kmeans or switch to the simple_hash method.")]
    KmeansUnavailable,

    #[error("Clustering failed: {0}")]
    Clustering(String),

    #[error("Invalid filter phrase pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
