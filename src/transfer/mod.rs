/// Byte transfer from a media stream into a destination
///
/// Destinations hand out an async writer per object; `copy_stream` pumps the
/// source stream into it chunk by chunk so episodes are never held in memory.

pub mod local;
pub mod bucket;

pub use bucket::BucketDestination;
pub use local::LocalDestination;

use crate::fetch::SourceStream;
use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

/// Metadata stored alongside the transferred object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub content_type: String,
    pub content_language: String,
    pub content_length: Option<u64>,
}

/// Writer for a single object; `abort` cancels an unfinished upload
#[async_trait]
pub trait ObjectWriter: AsyncWrite + Unpin + Send {
    /// Give up on the object, releasing anything the backend holds for it
    async fn abort(&mut self) -> Result<()>;
}

/// A place episodes can be written to
#[async_trait]
pub trait Destination: Send + Sync {
    /// Human readable location of `name`
    fn location(&self, name: &str) -> String;

    /// Open a writer for `name`; the object is complete once the writer is shut down
    async fn open(&self, name: &str, metadata: &ObjectMetadata) -> Result<Box<dyn ObjectWriter>>;

    /// Remove whatever a failed transfer left behind
    async fn discard(&self, name: &str) -> Result<()>;
}

/// Copy every chunk of `body` into `writer`, then shut the writer down
pub async fn copy_stream<S, W>(mut body: S, writer: &mut W) -> Result<u64>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut copied = 0u64;
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        writer.write_all(&chunk).await?;
        copied += chunk.len() as u64;
    }
    writer.shutdown().await?;
    Ok(copied)
}

/// Transfer an opened source stream to `destination` under `name`
pub async fn transfer(
    source: SourceStream,
    destination: &dyn Destination,
    name: &str,
    metadata: &ObjectMetadata,
) -> Result<u64> {
    info!("⬆️ Transferring to {}", destination.location(name));
    if let Some(content_type) = &source.content_type {
        info!("Content-type: {}", content_type);
    }
    if let Some(length) = source.content_length {
        info!("Content-length: {} MB", length / 1024 / 1024);
    }

    let mut writer = destination.open(name, metadata).await?;
    match copy_stream(source.body, &mut writer).await {
        Ok(copied) => {
            if let Some(expected) = source.content_length {
                if expected != copied {
                    warn!("⚠️ Announced {} bytes but copied {}", expected, copied);
                }
            }
            info!("✅ Done transferring {} bytes", copied);
            Ok(copied)
        }
        Err(e) => {
            if let Err(abort) = writer.abort().await {
                warn!("Failed to abort transfer of {}: {}", name, abort);
            }
            if let Err(cleanup) = destination.discard(name).await {
                warn!("Failed to discard partial transfer of {}: {}", name, cleanup);
            }
            Err(e)
        }
    }
}
