/// Episode resolution module
///
/// Finds today's episode among the teaser links of the landing page.

pub mod locator;

pub use locator::EpisodeLocator;

use url::Url;

/// A teaser link found on the landing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingPageLink {
    /// Raw media reference, relative or absolute
    pub media_ref: String,
    /// Title of the nested image, empty when absent
    pub title: String,
}

/// Today's episode: where its media descriptor lives and what it is called
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEpisode {
    /// Absolute URL of the media descriptor
    pub descriptor_url: Url,
    /// Display title as published, possibly empty
    pub title: String,
}

impl std::fmt::Display for ResolvedEpisode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.title.is_empty() {
            write!(f, "<untitled> ({})", self.descriptor_url)
        } else {
            write!(f, "{} ({})", self.title, self.descriptor_url)
        }
    }
}
