//! Site configuration (_config.yml)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub blog_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    // Writing
    pub render_drafts: bool,

    // Pagination
    pub per_page: usize,
    pub pagination_dir: String,
    pub invalid_page: InvalidPagePolicy,

    // Cards
    pub date_format: String,
    pub fallback_image: String,
    #[serde(default)]
    pub card: CardConfig,

    // Locales, in the order they are built and listed
    pub locales: Vec<LocaleConfig>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "data".to_string(),
            blog_dir: "blog".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            render_drafts: false,

            per_page: 5,
            pagination_dir: "page".to_string(),
            invalid_page: InvalidPagePolicy::default(),

            date_format: "MMMM DD, YYYY".to_string(),
            fallback_image: "/static/images/ocean.jpeg".to_string(),
            card: CardConfig::default(),

            locales: vec![LocaleConfig::english(), LocaleConfig::portuguese()],
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded configuration from {:?}", path.as_ref());
        Ok(config)
    }

    /// Reject configurations the listing pipeline cannot serve
    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            bail!("per_page must be greater than 0");
        }

        let mut seen = HashSet::new();
        for locale in &self.locales {
            let code = locale.code.trim();
            if code.is_empty() {
                bail!("locale code must not be empty");
            }
            if code.contains('/') {
                bail!("locale code must not contain '/': {}", code);
            }
            if !seen.insert(code) {
                bail!("duplicate locale code: {}", code);
            }
        }

        Ok(())
    }

    /// Posts per listing page, shared by every locale
    pub fn page_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.per_page).unwrap_or(NonZeroUsize::MIN)
    }

    /// Look up a configured locale by code
    pub fn locale(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|l| l.code == code)
    }

    /// Path prefix that every post of a locale starts with, e.g. `blog/en/`
    pub fn locale_prefix(&self, code: &str) -> String {
        format!("{}/{}/", self.blog_dir.trim_matches('/'), code)
    }
}

/// What the server does with a page token that is not a positive integer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidPagePolicy {
    #[default]
    NotFound,
    FirstPage,
}

/// One language variant of the blog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Directory name under the blog directory, e.g. `en`
    pub code: String,
    /// Heading of the listing pages
    pub title: String,
    /// Document title of the bare listing route
    pub meta_title: String,
    /// Label of the card link
    pub read_more: String,
    /// Label for tags that do not fit on a card; `{n}` is the hidden count
    pub more_tags: String,
    /// Shown on a listing without posts
    pub no_posts: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::english()
    }
}

impl LocaleConfig {
    pub fn english() -> Self {
        Self {
            code: "en".to_string(),
            title: "Posts in English".to_string(),
            meta_title: "Blog (EN)".to_string(),
            read_more: "Read more".to_string(),
            more_tags: "+{n} more".to_string(),
            no_posts: "No posts found.".to_string(),
        }
    }

    pub fn portuguese() -> Self {
        Self {
            code: "pt".to_string(),
            title: "Posts em Português".to_string(),
            meta_title: "Blog (PT)".to_string(),
            read_more: "Ler mais".to_string(),
            more_tags: "+{n} mais".to_string(),
            no_posts: "Nenhum post encontrado.".to_string(),
        }
    }

    /// Render the hidden-tags label for `n` tags
    pub fn more_tags_label(&self, n: usize) -> String {
        self.more_tags.replace("{n}", &n.to_string())
    }
}

/// Post card configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub max_tags: usize,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self { max_tags: 3 }
    }
}
