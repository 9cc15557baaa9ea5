//! Post card view data

use serde::Serialize;

use crate::config::{LocaleConfig, SiteConfig};
use crate::content::PostSummary;
use crate::helpers::{date_iso, format_date, url_for};

/// One normalised post, ready for the card macro
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardData {
    pub href: String,
    pub title: String,
    pub image: String,
    pub datetime: String,
    pub date: String,
    pub tags: Vec<String>,
    pub more_tags: Option<String>,
    pub summary: String,
    pub read_more: String,
    pub link_label: String,
    pub read_more_label: String,
}

impl CardData {
    pub fn new(post: &PostSummary, config: &SiteConfig, locale: &LocaleConfig) -> Self {
        let max_tags = config.card.max_tags;
        let hidden = post.tags.len().saturating_sub(max_tags);
        let image = post.featured_image(&config.fallback_image);
        let image = if image.contains("://") {
            image.to_string()
        } else {
            url_for(config, image)
        };

        Self {
            href: url_for(config, &post.href()),
            title: post.title.clone(),
            image,
            datetime: date_iso(&post.date),
            date: format_date(&post.date, &config.date_format),
            tags: post.tags.iter().take(max_tags).cloned().collect(),
            more_tags: (hidden > 0).then(|| locale.more_tags_label(hidden)),
            summary: post.summary.clone(),
            read_more: locale.read_more.clone(),
            link_label: format!("Link to {}", post.title),
            read_more_label: format!("Read more about {}", post.title),
        }
    }
}
