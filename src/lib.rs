/// Sandmann Fetcher - Rust Implementation
///
/// Locates today's episode on the Sandmann homepage, picks the best quality
/// stream from its media descriptor and transfers it to a local directory or
/// an object storage bucket under a dated, sanitized filename.

pub mod config;
pub mod episode;
pub mod stream;
pub mod filename;
pub mod fetch;
pub mod transfer;
pub mod pipeline;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder, DestinationKind};
pub use crate::episode::{EpisodeLocator, LandingPageLink, ResolvedEpisode};
pub use crate::stream::{MediaDescriptor, Quality, StreamSelector};
pub use crate::filename::FilenameBuilder;
pub use crate::fetch::{Fetcher, SourceStream};
pub use crate::transfer::{BucketDestination, Destination, LocalDestination, ObjectMetadata};
pub use crate::pipeline::{DownloadPlan, Pipeline, TransferReport};

/// Result type for Sandmann Fetcher operations
pub type Result<T> = std::result::Result<T, SandmannError>;

/// Error types for Sandmann Fetcher operations
#[derive(thiserror::Error, Debug)]
pub enum SandmannError {
    #[error(
        "Expected exactly one teaser link with [{attribute}*=\"{fragment}\"] containing '{marker}', found {found}"
    )]
    AmbiguousEpisode {
        attribute: String,
        fragment: String,
        marker: String,
        found: usize,
    },

    #[error("Malformed media descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] object_store::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
