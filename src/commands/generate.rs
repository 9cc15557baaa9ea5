//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::content::loader::ContentLoader;
use crate::generator::{Generator, LocaleReport};
use crate::Blog;

/// Load every post and write the whole site
pub fn run(blog: &Blog) -> Result<()> {
    build(blog).map(|_| ())
}

/// Like [`run`], returning what was written per locale
pub fn build(blog: &Blog) -> Result<Vec<LocaleReport>> {
    let start = std::time::Instant::now();

    let posts = ContentLoader::new(blog).load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    let reports = Generator::new(blog)?.generate(&posts)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(reports)
}

/// Watch for file changes and regenerate
pub async fn watch(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&blog.content_dir(), notify::RecursiveMode::Recursive)?;
    if blog.static_dir.exists() {
        watcher.watch(&blog.static_dir, notify::RecursiveMode::Recursive)?;
    }
    let config_path = blog.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Debounce bursts of events from a single save
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = reload(blog).and_then(|blog| run(&blog)) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

/// Re-read `_config.yml` so configuration edits apply without a restart
pub(crate) fn reload(blog: &Blog) -> Result<Blog> {
    Blog::new(&blog.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_build_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let en = dir.path().join("data/blog/en");
        fs::create_dir_all(&en).unwrap();
        for n in 1..=6 {
            fs::write(
                en.join(format!("post-{}.md", n)),
                format!("---\ntitle: Post {}\ndate: '2024-02-0{}'\n---\nBody", n, n),
            )
            .unwrap();
        }

        let blog = Blog::new(dir.path()).unwrap();
        let reports = build(&blog).unwrap();

        assert_eq!(reports[0].code, "en");
        assert_eq!(reports[0].posts, 6);
        assert_eq!(reports[0].pages, 2);
        assert!(dir.path().join("public/blog/en/page/2/index.html").exists());
        assert!(dir.path().join("public/blog/en/post-1/index.html").exists());
    }
}
