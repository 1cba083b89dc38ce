//! Landing page teaser locator

use super::{LandingPageLink, ResolvedEpisode};
use crate::config::SourceConfig;
use crate::{Result, SandmannError};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Picks the single automatic daily teaser out of a landing page
#[derive(Debug, Clone)]
pub struct EpisodeLocator {
    attribute: String,
    fragment: String,
    marker: String,
    title_attribute: String,
    link_selector: Selector,
    title_selector: Selector,
}

impl EpisodeLocator {
    /// Build a locator from the source settings
    pub fn new(source: &SourceConfig) -> Result<Self> {
        let link_css = format!(
            "[{}*=\"{}\"]",
            source.media_ref_attribute, source.video_path_fragment
        );
        let title_css = format!("{}[{}]", source.title_element, source.title_attribute);

        Ok(Self {
            attribute: source.media_ref_attribute.clone(),
            fragment: source.video_path_fragment.clone(),
            marker: source.teaser_marker.clone(),
            title_attribute: source.title_attribute.clone(),
            link_selector: parse_selector(&link_css)?,
            title_selector: parse_selector(&title_css)?,
        })
    }

    /// Resolve today's episode from an already parsed landing page
    pub fn locate(&self, document: &Html, page_url: &Url) -> Result<ResolvedEpisode> {
        let links = self.teaser_links(document);

        let link = match links.as_slice() {
            [link] => link,
            _ => {
                return Err(SandmannError::AmbiguousEpisode {
                    attribute: self.attribute.clone(),
                    fragment: self.fragment.clone(),
                    marker: self.marker.clone(),
                    found: links.len(),
                })
            }
        };

        let descriptor_url = page_url
            .join(&link.media_ref)
            .map_err(|source| SandmannError::InvalidUrl {
                url: link.media_ref.clone(),
                source,
            })?;

        Ok(ResolvedEpisode {
            descriptor_url,
            title: link.title.clone(),
        })
    }

    /// Distinct video links carrying the teaser marker, in document order
    pub fn teaser_links(&self, document: &Html) -> Vec<LandingPageLink> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for element in document.select(&self.link_selector) {
            let Some(media_ref) = element.value().attr(&self.attribute) else {
                continue;
            };
            if !seen.insert(media_ref) {
                continue;
            }
            if !media_ref.contains(&self.marker) {
                debug!("Skipping non-teaser video link: {}", media_ref);
                continue;
            }

            links.push(LandingPageLink {
                media_ref: media_ref.to_string(),
                title: self.title_of(element),
            });
        }

        debug!("Found {} teaser link(s)", links.len());
        links
    }

    fn title_of(&self, element: ElementRef<'_>) -> String {
        element
            .select(&self.title_selector)
            .next()
            .and_then(|img| img.value().attr(&self.title_attribute))
            .unwrap_or_default()
            .to_string()
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| SandmannError::InvalidSelector(css.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const PAGE_URL: &str = "https://www.sandmann.de/filme/index.html";
    const TEASER_REF: &str =
        "/filme/sandmann-story-100~automaticteaser.mediajsn.jsn?mediaId=1";

    fn locator() -> EpisodeLocator {
        EpisodeLocator::new(&Config::default().source).unwrap()
    }

    fn page_url() -> Url {
        Url::parse(PAGE_URL).unwrap()
    }

    fn teaser(media_ref: &str, title: &str) -> String {
        format!(
            r#"<div class="teaser" data-media-ref="{}"><a href="{}"><img src="x.jpg" title="{}"></a></div>"#,
            media_ref, media_ref, title
        )
    }

    fn page(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    #[test]
    fn test_locate_single_teaser() {
        let body = format!(
            "{}{}",
            teaser(TEASER_REF, "Sandmann: Pittiplatsch (Quelle: rbb)"),
            teaser("/filme/archiv-100~mediajsn.jsn", "Archiv")
        );
        let episode = locator().locate(&page(&body), &page_url()).unwrap();

        assert_eq!(
            episode.descriptor_url.as_str(),
            "https://www.sandmann.de/filme/sandmann-story-100~automaticteaser.mediajsn.jsn?mediaId=1"
        );
        assert_eq!(episode.title, "Sandmann: Pittiplatsch (Quelle: rbb)");
    }

    #[test]
    fn test_duplicate_references_count_once() {
        let body = format!(
            "{}{}{}",
            teaser(TEASER_REF, "Heute"),
            teaser(TEASER_REF, "Heute"),
            teaser(TEASER_REF, "Heute")
        );
        let episode = locator().locate(&page(&body), &page_url()).unwrap();
        assert_eq!(episode.title, "Heute");
    }

    #[test]
    fn test_no_teaser_is_ambiguous() {
        let body = teaser("/filme/archiv-100~mediajsn.jsn", "Archiv");
        let err = locator().locate(&page(&body), &page_url()).unwrap_err();

        match err {
            SandmannError::AmbiguousEpisode { found, attribute, .. } => {
                assert_eq!(found, 0);
                assert_eq!(attribute, "data-media-ref");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_two_distinct_teasers_are_ambiguous() {
        let body = format!(
            "{}{}",
            teaser(TEASER_REF, "Heute"),
            teaser("/filme/other-200~automaticteaser.mediajsn.jsn", "Morgen")
        );
        let err = locator().locate(&page(&body), &page_url()).unwrap_err();
        assert!(matches!(err, SandmannError::AmbiguousEpisode { found: 2, .. }));
    }

    #[test]
    fn test_links_outside_video_section_are_ignored() {
        let body = format!(
            "{}{}",
            teaser(TEASER_REF, "Heute"),
            teaser("/spiele/quiz~automaticteaser.mediajsn.jsn", "Quiz")
        );
        let episode = locator().locate(&page(&body), &page_url()).unwrap();
        assert_eq!(episode.title, "Heute");
    }

    #[test]
    fn test_missing_title_is_empty() {
        let body = format!(
            r#"<div data-media-ref="{}"><img src="x.jpg"></div>"#,
            TEASER_REF
        );
        let episode = locator().locate(&page(&body), &page_url()).unwrap();
        assert_eq!(episode.title, "");
    }

    #[test]
    fn test_absolute_reference_is_kept() {
        let absolute = "https://cdn.sandmann.de/filme/x~automaticteaser.mediajsn.jsn";
        let body = teaser(absolute, "Heute");
        let episode = locator().locate(&page(&body), &page_url()).unwrap();
        assert_eq!(episode.descriptor_url.as_str(), absolute);
    }

    #[test]
    fn test_teaser_links_keep_document_order() {
        let body = format!(
            "{}{}{}",
            teaser("/filme/a~automaticteaser.mediajsn.jsn", "A"),
            teaser("/filme/b~automaticteaser.mediajsn.jsn", "B"),
            teaser("/filme/a~automaticteaser.mediajsn.jsn", "A again")
        );
        let links = locator().teaser_links(&page(&body));
        let titles: Vec<&str> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }
}
