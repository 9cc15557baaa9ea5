//! Page resolver: which paginated routes exist

use serde::Serialize;
use std::num::NonZeroUsize;

use super::paginate::page_count;
use super::ListingError;

/// Route parameter of one pre-rendered listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageParam {
    pub page: String,
}

/// Tokens `"1"..=total_pages` for a locale's posts, ascending.
///
/// An empty locale yields no tokens at all; its bare listing route is still
/// rendered separately.
pub fn enumerate_pages<T>(all_locale_posts: &[T], page_size: NonZeroUsize) -> Vec<PageParam> {
    (1..=page_count(all_locale_posts.len(), page_size))
        .map(|page| PageParam {
            page: page.to_string(),
        })
        .collect()
}

/// Parse a page token from a route. Only plain positive decimal integers are
/// accepted: `"0"`, `"-1"`, `"+2"`, `"2.0"` and `"abc"` are all rejected.
pub fn parse_page_token(token: &str) -> Result<NonZeroUsize, ListingError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ListingError::InvalidPageToken(token.to_string()));
    }
    token
        .parse::<NonZeroUsize>()
        .map_err(|_| ListingError::InvalidPageToken(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn tokens(params: &[PageParam]) -> Vec<&str> {
        params.iter().map(|p| p.page.as_str()).collect()
    }

    #[test]
    fn test_twelve_posts_three_pages() {
        let posts = vec![(); 12];
        assert_eq!(tokens(&enumerate_pages(&posts, size(5))), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_empty_locale_has_no_pages() {
        let posts: Vec<()> = Vec::new();
        assert!(enumerate_pages(&posts, size(5)).is_empty());
    }

    #[test]
    fn test_token_count_matches_ceiling() {
        for len in 1..=23 {
            let posts = vec![(); len];
            assert_eq!(enumerate_pages(&posts, size(5)).len(), len.div_ceil(5));
        }
        assert_eq!(tokens(&enumerate_pages(&[(); 5], size(5))), vec!["1"]);
    }

    #[test]
    fn test_serializes_as_route_params() {
        let params = enumerate_pages(&[(); 2], size(1));
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!([{"page": "1"}, {"page": "2"}]));
    }

    #[test]
    fn test_parse_page_token() {
        assert_eq!(parse_page_token("1").unwrap().get(), 1);
        assert_eq!(parse_page_token("42").unwrap().get(), 42);
        assert_eq!(parse_page_token("007").unwrap().get(), 7);

        for bad in ["", "0", "-1", "+2", "2.0", "abc", " 3", "99999999999999999999999"] {
            assert_eq!(
                parse_page_token(bad),
                Err(ListingError::InvalidPageToken(bad.to_string())),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
