//! Post records

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A blog post as loaded from the content directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Locale-prefixed path without leading slash, e.g. `blog/en/hello-world`
    pub path: String,

    /// Locale code, taken from the directory under the blog directory
    pub locale: String,

    /// Last path segment
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Last modified date
    pub lastmod: Option<DateTime<Local>>,

    /// Short description shown on cards
    pub summary: String,

    /// Post tags
    pub tags: Vec<String>,

    /// Image references; the first one is featured
    pub images: Vec<String>,

    /// Drafts are skipped unless `render_drafts` is set
    pub draft: bool,

    /// Source file path (relative to the content directory)
    pub source: String,

    /// Rendered HTML body
    pub content: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(path: &str, locale: &str, title: String, date: DateTime<Local>) -> Self {
        let slug = path.rsplit('/').next().unwrap_or_default().to_string();
        Self {
            path: path.to_string(),
            locale: locale.to_string(),
            slug,
            title,
            date,
            lastmod: None,
            summary: String::new(),
            tags: Vec::new(),
            images: Vec::new(),
            draft: false,
            source: String::new(),
            content: String::new(),
            extra: HashMap::new(),
        }
    }

    /// Metadata without the body, as consumed by listings and cards
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            path: self.path.clone(),
            locale: self.locale.clone(),
            slug: self.slug.clone(),
            title: self.title.clone(),
            date: self.date,
            summary: self.summary.clone(),
            tags: self.tags.clone(),
            images: self.images.clone(),
        }
    }
}

/// Body-less post metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub path: String,
    pub locale: String,
    pub slug: String,
    pub title: String,
    pub date: DateTime<Local>,
    pub summary: String,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

impl PostSummary {
    /// The featured image, or `fallback` when the post has none
    pub fn featured_image<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.images
            .first()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(fallback)
    }

    /// Site-relative URL of the post
    pub fn href(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Post {
        let date = Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Post::new("blog/en/hello-world", "en", "Hello".to_string(), date)
    }

    #[test]
    fn test_new_derives_slug() {
        let post = sample();
        assert_eq!(post.slug, "hello-world");
        assert!(post.lastmod.is_none());
    }

    #[test]
    fn test_featured_image_fallback() {
        let mut summary = sample().summary();
        assert_eq!(summary.featured_image("/fallback.jpg"), "/fallback.jpg");

        summary.images = vec![String::new()];
        assert_eq!(summary.featured_image("/fallback.jpg"), "/fallback.jpg");

        summary.images = vec!["/a.png".to_string(), "/b.png".to_string()];
        assert_eq!(summary.featured_image("/fallback.jpg"), "/a.png");
    }

    #[test]
    fn test_href() {
        assert_eq!(sample().summary().href(), "/blog/en/hello-world");
    }
}
