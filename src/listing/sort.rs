//! Post ordering

use crate::content::PostSummary;

/// Newest first. The sort is stable, so posts sharing a date keep their
/// incoming order.
pub fn sort_posts(mut posts: Vec<PostSummary>) -> Vec<PostSummary> {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    posts
}
