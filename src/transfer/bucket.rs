use super::{Destination, ObjectMetadata, ObjectWriter};
use crate::Result;
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Writes episodes into an object storage bucket
#[derive(Debug, Clone)]
pub struct BucketDestination {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    key_prefix: String,
}

impl BucketDestination {
    /// S3 bucket with credentials taken from the environment
    pub fn s3_from_env(bucket: &str, region: &str, key_prefix: &str) -> Result<Self> {
        info!("🪣 Connecting to bucket {} in {}", bucket, region);

        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(region)
            .build()?;

        Ok(Self::with_store(Arc::new(store), bucket, key_prefix))
    }

    /// Bucket backed by an arbitrary object store
    pub fn with_store(store: Arc<dyn ObjectStore>, bucket: &str, key_prefix: &str) -> Self {
        Self {
            store,
            bucket: bucket.to_string(),
            key_prefix: key_prefix.to_string(),
        }
    }

    pub fn object_key(&self, name: &str) -> Path {
        Path::from(format!("{}{}", self.key_prefix, name))
    }
}

/// Aborting releases the multipart upload once the buffer has spilled into one
#[async_trait]
impl ObjectWriter for BufWriter {
    async fn abort(&mut self) -> Result<()> {
        BufWriter::abort(self).await?;
        Ok(())
    }
}

#[async_trait]
impl Destination for BucketDestination {
    fn location(&self, name: &str) -> String {
        format!("s3://{}/{}", self.bucket, self.object_key(name))
    }

    async fn open(&self, name: &str, metadata: &ObjectMetadata) -> Result<Box<dyn ObjectWriter>> {
        let key = self.object_key(name);
        debug!("Opening upload for {}", key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, metadata.content_type.clone().into());
        attributes.insert(Attribute::ContentLanguage, metadata.content_language.clone().into());

        let writer = BufWriter::new(Arc::clone(&self.store), key).with_attributes(attributes);
        Ok(Box::new(writer))
    }

    async fn discard(&self, name: &str) -> Result<()> {
        self.store.delete(&self.object_key(name)).await?;
        Ok(())
    }
}
