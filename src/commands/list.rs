//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::content::PostSummary;
use crate::listing::LocaleListing;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    for line in lines(blog, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

/// Build the listing output, one entry per line
fn lines(blog: &Blog, content_type: &str) -> Result<Vec<String>> {
    let posts = ContentLoader::new(blog).load_posts()?;
    let summaries: Vec<PostSummary> = posts.iter().map(|p| p.summary()).collect();
    let mut out = Vec::new();

    match content_type {
        "post" | "posts" => {
            let mut posts = posts;
            posts.sort_by(|a, b| b.date.cmp(&a.date));
            out.push(format!("Posts ({}):", posts.len()));
            for post in posts {
                out.push(format!(
                    "  {} - {} [{}] ({})",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.locale,
                    post.source
                ));
            }
        }
        "locale" | "locales" => {
            out.push(format!("Locales ({}):", blog.config.locales.len()));
            for locale in &blog.config.locales {
                let listing = LocaleListing::build(&blog.config, &locale.code, &summaries)?;
                out.push(format!(
                    "  {} - {} ({} posts, {} pages)",
                    locale.code,
                    locale.title,
                    listing.posts().len(),
                    listing.page_params().len()
                ));
            }
        }
        "route" | "routes" => {
            let dir = &blog.config.pagination_dir;
            let mut routes = Vec::new();
            for locale in &blog.config.locales {
                let listing = LocaleListing::build(&blog.config, &locale.code, &summaries)?;
                let base = listing.locale.listing_url();
                routes.push(base.clone());
                for param in listing.page_params() {
                    routes.push(format!("{}{}/{}/", base, dir, param.page));
                }
                for post in listing.posts() {
                    routes.push(format!("/{}/", post.path));
                }
            }
            out.push(format!("Routes ({}):", routes.len()));
            out.extend(routes.into_iter().map(|r| format!("  {}", r)));
        }
        "tag" | "tags" => {
            for locale in &blog.config.locales {
                let listing = LocaleListing::build(&blog.config, &locale.code, &summaries)?;
                let tags = listing.tag_counts();
                out.push(format!("Tags [{}] ({}):", locale.code, tags.len()));
                for (tag, count) in tags {
                    out.push(format!("  {} ({})", tag, count));
                }
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, locale, route, tag",
                content_type
            );
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn blog_with_posts(count: usize) -> (tempfile::TempDir, Blog) {
        let dir = tempfile::tempdir().unwrap();
        let en = dir.path().join("data/blog/en");
        fs::create_dir_all(&en).unwrap();
        for n in 1..=count {
            fs::write(
                en.join(format!("p{:02}.md", n)),
                format!(
                    "---\ntitle: P{}\ndate: '2024-03-{:02}'\ntags: [rust]\n---\n",
                    n, n
                ),
            )
            .unwrap();
        }
        let blog = Blog::new(dir.path()).unwrap();
        (dir, blog)
    }

    #[test]
    fn test_list_routes() {
        let (_dir, blog) = blog_with_posts(12);
        let out = lines(&blog, "routes").unwrap();

        assert_eq!(out[1], "  /blog/en/");
        assert_eq!(out[2], "  /blog/en/page/1/");
        assert!(out.contains(&"  /blog/en/page/2/".to_string()));
        assert!(out.contains(&"  /blog/en/page/3/".to_string()));
        assert!(!out.contains(&"  /blog/en/page/4/".to_string()));
        assert!(out.contains(&"  /blog/pt/".to_string()));
        assert!(!out.iter().any(|l| l.starts_with("  /blog/pt/page/")));
        assert!(out.contains(&"  /blog/en/p12/".to_string()));
    }

    #[test]
    fn test_list_locales_and_tags() {
        let (_dir, blog) = blog_with_posts(6);

        let out = lines(&blog, "locales").unwrap();
        assert_eq!(out[0], "Locales (2):");
        assert!(out[1].starts_with("  en - Posts in English (6 posts, 2 pages)"));
        assert!(out[2].starts_with("  pt - Posts em Português (0 posts, 0 pages)"));

        let out = lines(&blog, "tags").unwrap();
        assert_eq!(out[0], "Tags [en] (1):");
        assert_eq!(out[1], "  rust (6)");
        assert_eq!(out[2], "Tags [pt] (0):");
    }

    #[test]
    fn test_list_posts_newest_first() {
        let (_dir, blog) = blog_with_posts(2);
        let out = lines(&blog, "post").unwrap();
        assert_eq!(out[0], "Posts (2):");
        assert!(out[1].contains("P2 [en]"));
        assert!(out[2].contains("P1 [en]"));
    }

    #[test]
    fn test_unknown_type() {
        let (_dir, blog) = blog_with_posts(0);
        assert!(lines(&blog, "categories").is_err());
    }
}
