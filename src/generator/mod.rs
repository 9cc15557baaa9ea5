//! Generator module - writes the static site

use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tera::Context;
use walkdir::WalkDir;

use crate::config::LocaleConfig;
use crate::content::{Post, PostSummary};
use crate::helpers::{date_iso, format_date, full_url_for, url_for};
use crate::listing::LocaleListing;
use crate::templates::{
    CardData, LocaleLink, NavPost, PagerData, PostView, SiteData, TagCount, TemplateRenderer,
};
use crate::Blog;

/// What was written for one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleReport {
    pub code: String,
    pub posts: usize,
    pub pages: usize,
}

/// Static site generator using the embedded Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &[Post]) -> Result<Vec<LocaleReport>> {
        fs::create_dir_all(&self.blog.public_dir)?;
        self.clear_listing_output()?;
        self.copy_static_assets()?;

        let summaries: Vec<PostSummary> = posts.iter().map(Post::summary).collect();
        let by_path: HashMap<&str, &Post> = posts.iter().map(|p| (p.path.as_str(), p)).collect();

        self.warn_unconfigured_locales(&summaries);

        let site_data = self.build_site_data();
        let mut reports = Vec::with_capacity(self.blog.config.locales.len());

        for locale_config in &self.blog.config.locales {
            let listing = LocaleListing::build(&self.blog.config, &locale_config.code, &summaries)?;

            let pages = self.generate_listing_pages(&listing, locale_config, &site_data)?;
            self.generate_post_pages(&listing, &by_path, &site_data)?;
            self.write_listing_data(&listing)?;

            tracing::info!(
                "Generated locale {}: {} posts, {} listing pages",
                locale_config.code,
                listing.posts().len(),
                pages
            );
            reports.push(LocaleReport {
                code: locale_config.code.clone(),
                posts: listing.posts().len(),
                pages,
            });
        }

        Ok(reports)
    }

    /// Remove routes of the previous build so pages and posts that no longer
    /// exist are not served
    fn clear_listing_output(&self) -> Result<()> {
        let config = &self.blog.config;
        let blog_dir = config.blog_dir.trim_matches('/');
        let targets: Vec<String> = if blog_dir.is_empty() {
            config
                .locales
                .iter()
                .map(|l| config.locale_prefix(&l.code))
                .collect()
        } else {
            vec![blog_dir.to_string()]
        };

        for target in targets {
            let dir = self.blog.public_dir.join(target.trim_matches('/'));
            if dir.exists() {
                fs::remove_dir_all(&dir)?;
                tracing::debug!("Removed previous output {:?}", dir);
            }
        }
        Ok(())
    }

    fn warn_unconfigured_locales(&self, posts: &[PostSummary]) {
        let unknown: HashSet<&str> = posts
            .iter()
            .map(|p| p.locale.as_str())
            .filter(|code| self.blog.config.locale(code).is_none())
            .collect();
        for code in unknown {
            tracing::warn!("Posts in unconfigured locale {:?} are not rendered", code);
        }
    }

    /// Build site data for templates
    fn build_site_data(&self) -> SiteData {
        let config = &self.blog.config;
        let locales = config
            .locales
            .iter()
            .map(|l| LocaleLink {
                code: l.code.clone(),
                title: l.title.clone(),
                url: url_for(config, &config.locale_prefix(&l.code)),
            })
            .collect();

        SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            home: url_for(config, "/"),
            locales,
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self, site_data: &SiteData, lang: &str, path: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("lang", lang);
        context.insert("canonical_url", &full_url_for(&self.blog.config, path));
        context.insert("current_year", &chrono::Local::now().format("%Y").to_string());
        context
    }

    /// Bare listing route plus one route per page token. Returns the number
    /// of paginated routes written.
    fn generate_listing_pages(
        &self,
        listing: &LocaleListing,
        locale_config: &LocaleConfig,
        site_data: &SiteData,
    ) -> Result<usize> {
        let html = self.render_listing(listing, locale_config, site_data, 1)?;
        self.write_output(&listing.locale.prefix, &html)?;

        let params = listing.page_params();
        for param in &params {
            // Tokens come from enumerate_pages, so they always parse
            let page_number: usize = param.page.parse()?;
            let html = self.render_listing(listing, locale_config, site_data, page_number)?;
            let dir = format!(
                "{}{}/{}/",
                listing.locale.prefix, self.blog.config.pagination_dir, param.page
            );
            self.write_output(&dir, &html)?;
        }

        Ok(params.len())
    }

    /// Render one listing page
    fn render_listing(
        &self,
        listing: &LocaleListing,
        locale_config: &LocaleConfig,
        site_data: &SiteData,
        page_number: usize,
    ) -> Result<String> {
        let config = &self.blog.config;
        let props = listing.page(page_number);
        let pagination = props.pagination;

        let cards: Vec<CardData> = props
            .initial_display_posts
            .iter()
            .map(|p| CardData::new(p, config, locale_config))
            .collect();

        let page_link = |n: usize| url_for(config, &listing.locale.page_url(&config.pagination_dir, n));
        let pager = PagerData {
            current: pagination.current_page,
            total: pagination.total_pages,
            prev_link: if pagination.has_prev() {
                page_link(pagination.current_page - 1)
            } else {
                String::new()
            },
            next_link: if pagination.has_next() {
                page_link(pagination.current_page + 1)
            } else {
                String::new()
            },
        };

        let tags: Vec<TagCount> = listing
            .tag_counts()
            .into_iter()
            .map(|(name, count)| TagCount { name, count })
            .collect();

        let current_url = listing.locale.page_url(&config.pagination_dir, page_number);
        let mut context = self.create_base_context(site_data, &listing.locale.code, &current_url);
        context.insert("props", &props);
        context.insert("meta_title", &locale_config.meta_title);
        context.insert("cards", &cards);
        context.insert("tags", &tags);
        context.insert("pager", &pager);
        context.insert("empty_text", &locale_config.no_posts);

        self.renderer.render("list.html", &context)
    }

    /// Detail page of every post in the listing
    fn generate_post_pages(
        &self,
        listing: &LocaleListing,
        by_path: &HashMap<&str, &Post>,
        site_data: &SiteData,
    ) -> Result<()> {
        let config = &self.blog.config;
        let nav = |p: &PostSummary| NavPost {
            title: p.title.clone(),
            path: url_for(config, &p.href()),
        };

        for summary in listing.posts() {
            let Some(post) = by_path.get(summary.path.as_str()) else {
                continue;
            };
            let (older, newer) = listing.neighbours(&summary.path);

            let view = PostView {
                title: post.title.clone(),
                date: format_date(&post.date, &config.date_format),
                datetime: date_iso(&post.date),
                summary: post.summary.clone(),
                tags: post.tags.clone(),
                content: post.content.clone(),
                updated: post
                    .lastmod
                    .map(|d| format_date(&d, &config.date_format)),
                updated_datetime: post.lastmod.map(|d| date_iso(&d)),
            };

            let mut context = self.create_base_context(site_data, &post.locale, &summary.href());
            context.insert("post", &view);
            context.insert("listing_url", &url_for(config, &listing.locale.listing_url()));
            context.insert("listing_title", &listing.title);
            if let Some(older) = older {
                context.insert("prev_post", &nav(older));
            }
            if let Some(newer) = newer {
                context.insert("next_post", &nav(newer));
            }

            let html = self.renderer.render("post.html", &context)?;
            self.write_output(&format!("{}/", post.path), &html)?;
        }

        Ok(())
    }

    /// `posts.json` for client-side "load more" and `pages.json` with the
    /// page tokens
    fn write_listing_data(&self, listing: &LocaleListing) -> Result<()> {
        let dir = self
            .blog
            .public_dir
            .join(listing.locale.prefix.trim_start_matches('/'));
        fs::create_dir_all(&dir)?;

        fs::write(
            dir.join("posts.json"),
            serde_json::to_string_pretty(listing.posts())?,
        )?;
        fs::write(
            dir.join("pages.json"),
            serde_json::to_string_pretty(&listing.page_params())?,
        )?;

        Ok(())
    }

    /// Write `html` as `<public>/<route>/index.html`
    fn write_output(&self, route: &str, html: &str) -> Result<()> {
        let output_path = self
            .blog
            .public_dir
            .join(route.trim_start_matches('/'))
            .join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(&output_path, html)
            .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", output_path, e))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy `static/` into `<public>/static/`
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        let target_root = self.blog.public_dir.join(
            Path::new(&self.blog.config.static_dir)
                .file_name()
                .unwrap_or_else(|| "static".as_ref()),
        );

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = target_root.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            copied += 1;
        }

        tracing::debug!("Copied {} static assets", copied);
        Ok(())
    }
}
