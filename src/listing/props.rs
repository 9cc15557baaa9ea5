//! Per-locale listing and the props handed to the list renderer

use serde::Serialize;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use super::{enumerate_pages, paginate, sort_posts, ListingError, Locale, PageParam, PaginationState};
use crate::config::SiteConfig;
use crate::content::PostSummary;

/// Everything the list renderer needs for one listing page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProps<'a> {
    /// The whole filtered and sorted locale, for client-side "load more"
    pub posts: &'a [PostSummary],
    /// The slice shown on this page
    pub initial_display_posts: &'a [PostSummary],
    pub pagination: PaginationState,
    pub title: &'a str,
}

/// Filtered and sorted posts of one locale, computed once per build
#[derive(Debug, Clone)]
pub struct LocaleListing {
    pub locale: Locale,
    pub title: String,
    posts: Vec<PostSummary>,
    page_size: NonZeroUsize,
}

impl LocaleListing {
    /// Filter `posts` down to the locale `code` and sort them newest first
    pub fn build(
        config: &SiteConfig,
        code: &str,
        posts: &[PostSummary],
    ) -> Result<Self, ListingError> {
        let locale_config = config
            .locale(code)
            .ok_or_else(|| ListingError::UnknownLocale(code.to_string()))?;
        let locale = Locale::new(config, code);
        let posts = sort_posts(locale.select(posts));

        Ok(Self {
            locale,
            title: locale_config.title.clone(),
            posts,
            page_size: config.page_size(),
        })
    }

    /// All posts of the locale, newest first
    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Props for listing page `page_number`
    pub fn page(&self, page_number: usize) -> ListProps<'_> {
        let slice = paginate(&self.posts, self.page_size, page_number);
        ListProps {
            posts: &self.posts,
            initial_display_posts: slice.posts,
            pagination: slice.pagination,
            title: &self.title,
        }
    }

    /// Props for the bare listing route
    pub fn first_page(&self) -> ListProps<'_> {
        self.page(1)
    }

    /// Paginated routes to pre-render
    pub fn page_params(&self) -> Vec<PageParam> {
        enumerate_pages(&self.posts, self.page_size)
    }

    /// Tag usage within the locale, most used first, then by name
    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for tag in self.posts.iter().flat_map(|p| p.tags.iter()) {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(tag, count)| (tag.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// The older and newer neighbours of the post at `path`
    pub fn neighbours(&self, path: &str) -> (Option<&PostSummary>, Option<&PostSummary>) {
        let Some(pos) = self.posts.iter().position(|p| p.path == path) else {
            return (None, None);
        };
        let older = self.posts.get(pos + 1);
        let newer = pos.checked_sub(1).and_then(|i| self.posts.get(i));
        (older, newer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::locale::tests::post;

    fn twelve_english_posts() -> Vec<PostSummary> {
        // day 1 is the oldest, so sorted order is en/12 .. en/1
        (1..=12).map(|d| post(&format!("blog/en/{}", d), d)).collect()
    }

    #[test]
    fn test_page_two_of_twelve() {
        let config = SiteConfig::default();
        let listing = LocaleListing::build(&config, "en", &twelve_english_posts()).unwrap();

        let params = listing.page_params();
        let tokens: Vec<_> = params.iter().map(|p| p.page.as_str()).collect();
        assert_eq!(tokens, vec!["1", "2", "3"]);

        let props = listing.page(2);
        assert_eq!(props.posts.len(), 12);
        let paths: Vec<_> = props
            .initial_display_posts
            .iter()
            .map(|p| p.path.as_str())
            .collect();
        assert_eq!(
            paths,
            vec!["blog/en/7", "blog/en/6", "blog/en/5", "blog/en/4", "blog/en/3"]
        );
        assert_eq!(
            props.pagination,
            PaginationState {
                current_page: 2,
                total_pages: 3
            }
        );
        assert_eq!(props.title, "Posts in English");
    }

    #[test]
    fn test_empty_locale_bare_route() {
        let config = SiteConfig::default();
        let listing = LocaleListing::build(&config, "pt", &twelve_english_posts()).unwrap();

        assert!(listing.is_empty());
        assert!(listing.page_params().is_empty());

        let props = listing.first_page();
        assert!(props.initial_display_posts.is_empty());
        assert_eq!(
            props.pagination,
            PaginationState {
                current_page: 1,
                total_pages: 0
            }
        );
        assert_eq!(props.title, "Posts em Português");
    }

    #[test]
    fn test_out_of_range_page() {
        let config = SiteConfig::default();
        let listing = LocaleListing::build(&config, "en", &twelve_english_posts()).unwrap();
        let props = listing.page(99);
        assert!(props.initial_display_posts.is_empty());
        assert_eq!(props.pagination.current_page, 99);
        assert_eq!(props.pagination.total_pages, 3);
    }

    #[test]
    fn test_unknown_locale() {
        let config = SiteConfig::default();
        let err = LocaleListing::build(&config, "fr", &[]).unwrap_err();
        assert_eq!(err, ListingError::UnknownLocale("fr".to_string()));
    }

    #[test]
    fn test_props_serialize_for_renderer() {
        let config = SiteConfig::default();
        let listing = LocaleListing::build(&config, "en", &twelve_english_posts()).unwrap();
        let json = serde_json::to_value(listing.first_page()).unwrap();
        assert_eq!(json["posts"].as_array().unwrap().len(), 12);
        assert_eq!(json["initialDisplayPosts"].as_array().unwrap().len(), 5);
        assert_eq!(json["pagination"]["totalPages"], 3);
        assert_eq!(json["title"], "Posts in English");
    }

    #[test]
    fn test_tag_counts_and_neighbours() {
        let config = SiteConfig::default();
        let mut posts = vec![post("blog/en/a", 1), post("blog/en/b", 2), post("blog/en/c", 3)];
        posts[0].tags = vec!["rust".into(), "web".into()];
        posts[1].tags = vec!["rust".into()];
        let listing = LocaleListing::build(&config, "en", &posts).unwrap();

        assert_eq!(
            listing.tag_counts(),
            vec![("rust".to_string(), 2), ("web".to_string(), 1)]
        );

        let (older, newer) = listing.neighbours("blog/en/b");
        assert_eq!(older.unwrap().path, "blog/en/a");
        assert_eq!(newer.unwrap().path, "blog/en/c");
        let (older, newer) = listing.neighbours("blog/en/c");
        assert_eq!(older.unwrap().path, "blog/en/b");
        assert!(newer.is_none());
        assert_eq!(listing.neighbours("blog/en/missing"), (None, None));
    }
}
