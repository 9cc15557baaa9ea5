//! Locale filter

use crate::config::SiteConfig;
use crate::content::PostSummary;

/// Posts whose path starts with `locale_prefix` (e.g. `blog/en/`), in their
/// original relative order. No match yields an empty vector.
pub fn filter_by_locale(posts: &[PostSummary], locale_prefix: &str) -> Vec<PostSummary> {
    posts
        .iter()
        .filter(|p| p.path.starts_with(locale_prefix))
        .cloned()
        .collect()
}

/// A configured locale and the path prefix its posts live under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub code: String,
    pub prefix: String,
}

impl Locale {
    pub fn new(config: &SiteConfig, code: &str) -> Self {
        Self {
            code: code.to_string(),
            prefix: config.locale_prefix(code),
        }
    }

    /// Whether the post belongs to this locale. Compares the explicit locale
    /// field, so `en` never claims posts of `en-us`.
    pub fn owns(&self, post: &PostSummary) -> bool {
        post.locale == self.code
    }

    /// Posts of this locale, in their original relative order. A post must
    /// live under the locale prefix and carry the locale's code.
    pub fn select(&self, posts: &[PostSummary]) -> Vec<PostSummary> {
        let mut selected = filter_by_locale(posts, &self.prefix);
        selected.retain(|p| self.owns(p));
        selected
    }

    /// URL of the bare listing route, e.g. `/blog/en/`
    pub fn listing_url(&self) -> String {
        format!("/{}", self.prefix)
    }

    /// URL of a paginated listing route; page 1 is the bare route
    pub fn page_url(&self, pagination_dir: &str, page: usize) -> String {
        if page <= 1 {
            self.listing_url()
        } else {
            format!("/{}{}/{}/", self.prefix, pagination_dir, page)
        }
    }
}
