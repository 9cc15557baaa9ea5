//! URL helper functions

use crate::config::SiteConfig;

/// Prefix a site-relative path with the configured root
///
/// # Examples
/// ```ignore
/// url_for(&config, "/blog/en/") // -> "/site/blog/en/" with root "/site/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Absolute URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}
