use super::{Destination, ObjectMetadata, ObjectWriter};
use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::BufWriter;
use tracing::debug;

/// Writes episodes into a local directory
#[derive(Debug, Clone)]
pub struct LocalDestination {
    dir: PathBuf,
}

impl LocalDestination {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

/// Nothing to release; `discard` removes the partial file
#[async_trait]
impl ObjectWriter for BufWriter<fs::File> {
    async fn abort(&mut self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Destination for LocalDestination {
    fn location(&self, name: &str) -> String {
        self.path_of(name).display().to_string()
    }

    async fn open(&self, name: &str, metadata: &ObjectMetadata) -> Result<Box<dyn ObjectWriter>> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.path_of(name);
        debug!(
            "Writing {} ({}, {}) to {}",
            name,
            metadata.content_type,
            metadata.content_language,
            path.display()
        );

        let file = fs::File::create(&path).await?;
        Ok(Box::new(BufWriter::new(file)))
    }

    async fn discard(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path_of(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;

    fn metadata() -> ObjectMetadata {
        ObjectMetadata {
            content_type: "video/mp4".to_string(),
            content_language: "de".to_string(),
            content_length: Some(4),
        }
    }

    #[tokio::test]
    async fn test_open_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let destination = LocalDestination::new(temp_dir.path().join("a").join("b"));

        let mut writer = destination.open("episode.mp4", &metadata()).await.unwrap();
        writer.write_all(b"data").await.unwrap();
        writer.shutdown().await.unwrap();

        let written = fs::read(temp_dir.path().join("a/b/episode.mp4")).await.unwrap();
        assert_eq!(written, b"data");
    }

    #[tokio::test]
    async fn test_discard_missing_file_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let destination = LocalDestination::new(temp_dir.path().to_path_buf());
        assert!(destination.discard("never-written.mp4").await.is_ok());
    }

    #[test]
    fn test_location_is_file_path() {
        let destination = LocalDestination::new(PathBuf::from("/srv/sandmann"));
        assert_eq!(destination.location("x.mp4"), "/srv/sandmann/x.mp4");
    }
}
