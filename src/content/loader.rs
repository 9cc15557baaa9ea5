//! Content loader - loads posts from the blog directory

use anyhow::{anyhow, Result};
use chrono::Local;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Post};
use crate::Blog;

/// Loads posts from `<content_dir>/<blog_dir>/<locale>/`
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        Self {
            blog,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load every post of every locale, in file name order. Paths are unique:
    /// of two files mapping to the same route only the first is kept.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let posts_dir = self.blog.posts_dir();
        if !posts_dir.exists() {
            tracing::warn!("Blog directory {:?} does not exist", posts_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        let mut seen = HashSet::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }
            match self.load_post(path) {
                Ok(post) if post.draft && !self.blog.config.render_drafts => {
                    tracing::debug!("Skipping draft {:?}", path);
                }
                Ok(post) if !seen.insert(post.path.clone()) => {
                    tracing::warn!(
                        "Skipping {:?}: route /{} is already taken by another post",
                        path,
                        post.path
                    );
                }
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        Ok(posts)
    }

    /// Load a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        let (route, locale) = self.route_path(path)?;

        let file_modified = fs::metadata(path)?
            .modified()
            .ok()
            .map(chrono::DateTime::<Local>::from);
        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));

        let title = fm.title.clone().unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let source = path
            .strip_prefix(self.blog.content_dir())
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        let mut post = Post::new(&route, &locale, title, date);
        post.lastmod = fm.parse_lastmod();
        post.summary = fm.summary.unwrap_or_default();
        post.tags = fm.tags.into_iter().filter(|t| !t.trim().is_empty()).collect();
        post.images = fm.images;
        post.draft = fm.draft;
        post.source = source;
        post.content = self.renderer.render(body)?;
        post.extra = fm.extra;

        Ok(post)
    }

    /// `data/blog/en/2024/hello.md` becomes (`blog/en/2024/hello`, `en`)
    fn route_path(&self, path: &Path) -> Result<(String, String)> {
        let relative = path
            .strip_prefix(self.blog.posts_dir())
            .map_err(|_| anyhow!("{:?} is outside the blog directory", path))?;

        let segments: Vec<String> = relative
            .with_extension("")
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if segments.len() < 2 {
            return Err(anyhow!("post is not inside a locale directory"));
        }

        let route = format!(
            "{}/{}",
            self.blog.config.blog_dir.trim_matches('/'),
            segments.join("/")
        );
        Ok((route, segments[0].clone()))
    }
}

/// Check if a file is a markdown or MDX file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "markdown" | "mdx"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn write(base: &Path, rel: &str, content: &str) {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn blog_in(dir: &Path) -> Blog {
        Blog::with_config(dir, SiteConfig::default())
    }

    #[test]
    fn test_load_posts_assigns_locale_and_path() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "data/blog/en/hello.md",
            "---\ntitle: Hello\ndate: '2024-01-02'\ntags: [a, '']\n---\nHi",
        );
        write(
            dir.path(),
            "data/blog/pt/nested/ola.mdx",
            "---\ntitle: Olá\ndate: '2024-01-03'\n---\nOi",
        );
        write(dir.path(), "data/blog/en/notes.txt", "ignored");

        let blog = blog_in(dir.path());
        let mut posts = ContentLoader::new(&blog).load_posts().unwrap();
        posts.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].path, "blog/en/hello");
        assert_eq!(posts[0].locale, "en");
        assert_eq!(posts[0].tags, vec!["a"]);
        assert_eq!(posts[0].source, "blog/en/hello.md");
        assert!(posts[0].content.contains("<p>Hi</p>"));
        assert_eq!(posts[1].path, "blog/pt/nested/ola");
        assert_eq!(posts[1].locale, "pt");
        assert_eq!(posts[1].slug, "ola");
    }

    #[test]
    fn test_drafts_are_skipped_unless_enabled() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "data/blog/en/wip.md",
            "---\ntitle: WIP\ndraft: true\n---\nSoon",
        );

        let blog = blog_in(dir.path());
        assert!(ContentLoader::new(&blog).load_posts().unwrap().is_empty());

        let mut config = SiteConfig::default();
        config.render_drafts = true;
        let blog = Blog::with_config(dir.path(), config);
        assert_eq!(ContentLoader::new(&blog).load_posts().unwrap().len(), 1);
    }

    #[test]
    fn test_post_outside_locale_directory_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "data/blog/orphan.md", "---\ntitle: Orphan\n---\n");

        let blog = blog_in(dir.path());
        assert!(ContentLoader::new(&blog).load_posts().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_route_keeps_first_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "data/blog/en/hello.md", "---\ntitle: From md\n---\n");
        write(dir.path(), "data/blog/en/hello.mdx", "---\ntitle: From mdx\n---\n");
        write(dir.path(), "data/blog/pt/hello.md", "---\ntitle: Olá\n---\n");

        let blog = blog_in(dir.path());
        let posts = ContentLoader::new(&blog).load_posts().unwrap();

        let en: Vec<_> = posts.iter().filter(|p| p.path == "blog/en/hello").collect();
        assert_eq!(en.len(), 1);
        assert_eq!(en[0].title, "From md");
        assert_eq!(en[0].source, "blog/en/hello.md");
        assert!(posts.iter().any(|p| p.path == "blog/pt/hello"));
        assert_eq!(posts.len(), 2);
    }

    #[test]
    fn test_missing_blog_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog_in(dir.path());
        assert!(ContentLoader::new(&blog).load_posts().unwrap().is_empty());
    }

    #[test]
    fn test_title_falls_back_to_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "data/blog/en/untitled-note.md", "Just a body");

        let blog = blog_in(dir.path());
        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        assert_eq!(posts[0].title, "untitled-note");
    }
}
