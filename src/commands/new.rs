//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Create a new post under `<content_dir>/<blog_dir>/<locale>/`
pub fn create_post(
    blog: &Blog,
    title: &str,
    locale: &str,
    slug: Option<&str>,
) -> Result<PathBuf> {
    if blog.config.locale(locale).is_none() {
        let known: Vec<&str> = blog.config.locales.iter().map(|l| l.code.as_str()).collect();
        anyhow::bail!(
            "Unknown locale: {}. Configured: {}",
            locale,
            known.join(", ")
        );
    }

    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title: {:?}", title);
    }

    let target_dir = blog.posts_dir().join(locale);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let content = format!(
        r#"---
title: "{}"
date: {}
summary: ""
tags: []
images: []
draft: false
---
"#,
        title.replace('"', "\\\""),
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(&file_path, content)?;
    tracing::debug!("Created post {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(blog: &Blog, title: &str, locale: &str, slug: Option<&str>) -> Result<()> {
    let path = create_post(blog, title, locale, slug)?;
    println!("Created: {:?}", path);
    Ok(())
}
