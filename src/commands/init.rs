//! Initialize a new blog

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: My Blog
description: ''
author: John Doe

# URL
url: http://example.com
root: /

# Directory
content_dir: data
blog_dir: blog
public_dir: public
static_dir: static

# Writing
render_drafts: false

# Pagination, shared by every locale
per_page: 5
pagination_dir: page
# not_found | first_page
invalid_page: not_found

# Cards
date_format: MMMM DD, YYYY
fallback_image: /static/images/ocean.jpeg
card:
  max_tags: 3

# Locales
locales:
  - code: en
    title: Posts in English
    meta_title: Blog (EN)
    read_more: Read more
    more_tags: "+{n} more"
    no_posts: No posts found.
  - code: pt
    title: Posts em Português
    meta_title: Blog (PT)
    read_more: Ler mais
    more_tags: "+{n} mais"
    no_posts: Nenhum post encontrado.
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Already initialized: {:?}", config_path);
    }

    fs::create_dir_all(target_dir.join("data/blog/en"))?;
    fs::create_dir_all(target_dir.join("data/blog/pt"))?;
    fs::create_dir_all(target_dir.join("static/images"))?;

    fs::write(&config_path, CONFIG)?;

    let date = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let hello = format!(
        r#"---
title: Hello World
date: {}
summary: The first post of this blog.
tags: [welcome]
---

Welcome! Create a new post with:

```bash
$ polyglot-blog new "My New Post" --locale en
```
"#,
        date
    );
    let ola = format!(
        r#"---
title: Olá Mundo
date: {}
summary: O primeiro post deste blog.
tags: [boas-vindas]
---

Bem-vindo! Crie um novo post com:

```bash
$ polyglot-blog new "Meu Novo Post" --locale pt
```
"#,
        date
    );

    fs::write(target_dir.join("data/blog/en/hello-world.md"), hello)?;
    fs::write(target_dir.join("data/blog/pt/ola-mundo.md"), ola)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvalidPagePolicy;
    use crate::Blog;

    #[test]
    fn test_init_site_builds() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "My Blog");
        assert_eq!(blog.config.invalid_page, InvalidPagePolicy::NotFound);
        assert_eq!(blog.config.locale("pt").unwrap().read_more, "Ler mais");

        let reports = crate::commands::generate::build(&blog).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.posts == 1 && r.pages == 1));
        assert!(dir.path().join("public/blog/pt/ola-mundo/index.html").exists());
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
