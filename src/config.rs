use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the Sandmann Fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Landing page and teaser matching settings
    pub source: SourceConfig,

    /// HTTP client settings
    pub http: HttpConfig,

    /// Where the episode ends up
    pub destination: DestinationConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Landing page listing the current episodes
    pub homepage_url: String,

    /// Attribute carrying the media reference on teaser elements
    pub media_ref_attribute: String,

    /// Path fragment identifying links into the video section
    pub video_path_fragment: String,

    /// Marker identifying the automatic daily teaser descriptor
    pub teaser_marker: String,

    /// Element nested in the teaser that carries the title
    pub title_element: String,

    /// Attribute of the title element holding the episode title
    pub title_attribute: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds (applies to page and descriptor fetches)
    pub timeout_seconds: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    Local,
    Bucket,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Destination backend
    pub kind: DestinationKind,

    /// Output directory for local transfers
    pub local_dir: PathBuf,

    /// Bucket name for object storage transfers
    pub bucket: String,

    /// Bucket region
    pub region: String,

    /// Prefix prepended to object keys
    pub key_prefix: String,

    /// Extension appended to the output filename
    pub file_extension: String,

    /// Content type stored with the object
    pub content_type: String,

    /// Content language stored with the object
    pub content_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or tracing filter directive
    pub level: String,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        // Try to load from various locations
        let config_paths = [
            "sandmann-fetcher.toml",
            "config/sandmann-fetcher.toml",
            "/etc/sandmann-fetcher/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str::<Config>(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config.with_env_overrides());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::from_env())
    }

    /// Load configuration from an explicit file path
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read config file {}: {}", path.display(), e))?;
        let config: Config = toml::from_str(&config_str)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config.with_env_overrides())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(homepage) = std::env::var("SANDMANN_HOMEPAGE") {
            self.source.homepage_url = homepage;
        }

        if let Ok(output_dir) = std::env::var("SANDMANN_OUTPUT_DIR") {
            self.destination.local_dir = PathBuf::from(output_dir);
        }

        if let Ok(bucket) = std::env::var("SANDMANN_BUCKET") {
            self.destination.bucket = bucket;
        }

        if let Ok(region) = std::env::var("SANDMANN_REGION") {
            self.destination.region = region;
        }

        if let Ok(log_level) = std::env::var("SANDMANN_LOG_LEVEL") {
            self.logging.level = log_level;
        }

        self
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.homepage_url)
            .map_err(|e| anyhow!("homepage_url '{}' is not a valid URL: {}", self.source.homepage_url, e))?;

        let markers = [
            ("media_ref_attribute", &self.source.media_ref_attribute),
            ("video_path_fragment", &self.source.video_path_fragment),
            ("teaser_marker", &self.source.teaser_marker),
            ("title_element", &self.source.title_element),
            ("title_attribute", &self.source.title_attribute),
        ];
        for (name, value) in markers {
            if value.trim().is_empty() {
                return Err(anyhow!("source.{} must not be empty", name));
            }
        }

        if self.http.timeout_seconds == 0 {
            return Err(anyhow!("timeout_seconds must be greater than 0"));
        }

        if self.destination.kind == DestinationKind::Bucket && self.destination.bucket.trim().is_empty() {
            return Err(anyhow!("Bucket name required for bucket destination"));
        }

        if self.destination.file_extension.contains(['/', '\\', ':']) {
            return Err(anyhow!("file_extension must not contain path separators"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        let target = match self.destination.kind {
            DestinationKind::Local => format!("local directory {}", self.destination.local_dir.display()),
            DestinationKind::Bucket => format!(
                "bucket {}/{} ({})",
                self.destination.bucket, self.destination.key_prefix, self.destination.region
            ),
        };

        format!(
            "Sandmann Fetcher Configuration:\n\
            - Homepage: {}\n\
            - Teaser Marker: {}\n\
            - Destination: {}\n\
            - Extension: .{}\n\
            - Request Timeout: {}s",
            self.source.homepage_url,
            self.source.teaser_marker,
            target,
            self.destination.file_extension,
            self.http.timeout_seconds
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig {
                homepage_url: "https://www.sandmann.de/filme/index.html".to_string(),
                media_ref_attribute: "data-media-ref".to_string(),
                video_path_fragment: "/filme".to_string(),
                teaser_marker: "automaticteaser.mediajsn.jsn".to_string(),
                title_element: "img".to_string(),
                title_attribute: "title".to_string(),
            },
            http: HttpConfig {
                timeout_seconds: 30,
                user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            },
            destination: DestinationConfig {
                kind: DestinationKind::Local,
                local_dir: PathBuf::from("./episodes"),
                bucket: "sandmann-repo".to_string(),
                region: "eu-central-1".to_string(),
                key_prefix: String::new(),
                file_extension: "mp4".to_string(),
                content_type: "video/mp4".to_string(),
                content_language: "de".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_homepage(mut self, url: impl Into<String>) -> Self {
        self.config.source.homepage_url = url.into();
        self
    }

    pub fn with_teaser_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.source.teaser_marker = marker.into();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.http.timeout_seconds = seconds;
        self
    }

    pub fn with_local_dir(mut self, dir: PathBuf) -> Self {
        self.config.destination.kind = DestinationKind::Local;
        self.config.destination.local_dir = dir;
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.config.destination.kind = DestinationKind::Bucket;
        self.config.destination.bucket = bucket.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.config.destination.region = region.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
