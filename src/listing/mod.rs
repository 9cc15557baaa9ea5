//! Locale-aware listing: filter, sort, paginate and enumerate page routes
//!
//! Everything here is a pure function of its arguments. A [`LocaleListing`]
//! caches the filtered and sorted posts of one locale for the length of a
//! build so the bare route, every paginated route and the detail pages share
//! one computation.

mod locale;
mod pages;
mod paginate;
mod props;
mod sort;

use thiserror::Error;

pub use locale::{filter_by_locale, Locale};
pub use pages::{enumerate_pages, parse_page_token, PageParam};
pub use paginate::{paginate, PageSlice, PaginationState};
pub use props::{ListProps, LocaleListing};
pub use sort::sort_posts;

/// Errors raised by the listing layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    #[error("Invalid page token: {0:?}")]
    InvalidPageToken(String),

    #[error("Unknown locale: {0}")]
    UnknownLocale(String),
}
