//! End-to-end run: landing page, descriptor, stream, transfer

use crate::config::{Config, DestinationKind};
use crate::episode::{EpisodeLocator, ResolvedEpisode};
use crate::fetch::Fetcher;
use crate::filename::FilenameBuilder;
use crate::stream::{MediaDescriptor, StreamSelector};
use crate::transfer::{self, BucketDestination, Destination, LocalDestination, ObjectMetadata};
use crate::{Result, SandmannError};
use chrono::NaiveDate;
use tracing::info;
use url::Url;

/// Everything needed to transfer today's episode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub episode: ResolvedEpisode,
    pub stream_url: Url,
    /// Output name including extension
    pub filename: String,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct TransferReport {
    pub plan: DownloadPlan,
    pub location: String,
    pub bytes: u64,
}

/// Sequential fetch pipeline; each URL is fetched once and nothing is retried
pub struct Pipeline {
    config: Config,
    fetcher: Fetcher,
    locator: EpisodeLocator,
    selector: StreamSelector,
    filenames: FilenameBuilder,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Fetcher::new(&config.http)?;
        let locator = EpisodeLocator::new(&config.source)?;

        Ok(Self {
            config,
            fetcher,
            locator,
            selector: StreamSelector::new(),
            filenames: FilenameBuilder::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Destination described by the configuration
    pub fn destination(&self) -> Result<Box<dyn Destination>> {
        let settings = &self.config.destination;
        let destination: Box<dyn Destination> = match settings.kind {
            DestinationKind::Local => Box::new(LocalDestination::new(settings.local_dir.clone())),
            DestinationKind::Bucket => Box::new(BucketDestination::s3_from_env(
                &settings.bucket,
                &settings.region,
                &settings.key_prefix,
            )?),
        };
        Ok(destination)
    }

    /// Resolve today's episode, its best stream and the output name
    pub async fn resolve(&self, date: NaiveDate) -> Result<DownloadPlan> {
        let homepage = Url::parse(&self.config.source.homepage_url).map_err(|source| {
            SandmannError::InvalidUrl {
                url: self.config.source.homepage_url.clone(),
                source,
            }
        })?;

        let episode = {
            let document = self.fetcher.fetch_landing_page(&homepage).await?;
            self.locator.locate(&document, &homepage)?
        };
        info!("📺 Today's episode: {}", episode);

        let descriptor = self.fetcher.fetch_descriptor(&episode.descriptor_url).await?;
        self.plan(episode, &descriptor, date)
    }

    /// Combine a resolved episode and its descriptor into a plan
    pub fn plan(
        &self,
        episode: ResolvedEpisode,
        descriptor: &MediaDescriptor,
        date: NaiveDate,
    ) -> Result<DownloadPlan> {
        let stream_url = self.selector.select_best(descriptor)?;
        info!("🎯 Best stream: {}", stream_url);

        let stem = self.filenames.build(&episode.title, date);
        let filename = match self.config.destination.file_extension.as_str() {
            "" => stem,
            extension => format!("{}.{}", stem, extension),
        };
        info!("📝 Output name: {}", filename);

        Ok(DownloadPlan {
            episode,
            stream_url,
            filename,
        })
    }

    /// Resolve and transfer today's episode into `destination`
    pub async fn run(&self, date: NaiveDate, destination: &dyn Destination) -> Result<TransferReport> {
        let plan = self.resolve(date).await?;

        let source = self.fetcher.open_stream(&plan.stream_url).await?;
        let metadata = ObjectMetadata {
            content_type: self.config.destination.content_type.clone(),
            content_language: self.config.destination.content_language.clone(),
            content_length: source.content_length,
        };

        let bytes = transfer::transfer(source, destination, &plan.filename, &metadata).await?;

        Ok(TransferReport {
            location: destination.location(&plan.filename),
            plan,
            bytes,
        })
    }
}
