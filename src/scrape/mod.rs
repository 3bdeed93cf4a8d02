use std::sync::OnceLock;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use regex::Regex;
use reqwest::blocking::Client;

use crate::catalog::record::RawRecord;
use crate::error::Result;
use crate::util::output;

/// One course row from a catalog search page, before its detail page has
/// been visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseListing {
    pub code: String,
    pub detail_url: String,
    pub not_offered: bool,
}

/// Blocking client for the course catalog website. Pages through the search
/// listing until a page yields no course rows, then visits every course's
/// detail page in parallel to pull its prerequisite list.
pub struct CatalogClient {
    base_url: String,
    max_pages: usize,
    client: Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, max_pages: usize) -> Result<Self> {
        let client = Client::builder().user_agent("prereqmap").build()?;
        Ok(Self {
            base_url: base_url.into(),
            max_pages,
            client,
        })
    }

    fn page_url(&self, page: usize) -> String {
        format!("{}?page={}", self.base_url, page)
    }

    pub fn fetch_all(&self) -> Result<Vec<RawRecord>> {
        let mut listings = Vec::new();
        for page in 0..self.max_pages {
            output::fetch_op(&format!("page {}", page));
            let body = self
                .client
                .get(self.page_url(page))
                .send()?
                .error_for_status()?
                .text()?;
            let rows = parse_course_rows(&body, &site_origin(&self.base_url));
            if rows.is_empty() {
                break;
            }
            listings.extend(rows);
        }

        let bar = ProgressBar::new(listings.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
            bar.set_style(style);
        }

        let results: Vec<Result<RawRecord>> = listings
            .into_par_iter()
            .map(|listing| {
                let record = self.fetch_record(&listing);
                bar.inc(1);
                record
            })
            .collect();
        bar.finish_and_clear();

        let mut records = Vec::with_capacity(results.len());
        for result in results {
            records.push(result?);
        }
        Ok(records)
    }

    fn fetch_record(&self, listing: &CourseListing) -> Result<RawRecord> {
        let body = self
            .client
            .get(&listing.detail_url)
            .send()?
            .error_for_status()?
            .text()?;
        let prerequisites = parse_prerequisites(&body);
        let code = if listing.not_offered {
            format!("*{}", listing.code)
        } else {
            listing.code.clone()
        };
        Ok(RawRecord {
            code,
            prerequisites,
        })
    }
}

fn row_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<div[^>]*class="[^"]*views-row[^"]*"[^>]*>"#).expect("valid row regex")
    })
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?s)<h4[^>]*class="[^"]*field-content[^"]*"[^>]*>\s*<a\s+href="([^"]+)"[^>]*>(.*?)</a>"#,
        )
        .expect("valid title regex")
    })
}

fn code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Za-z]{2,5})[\s-]*([0-9]{3}[A-Za-z0-9]*)").expect("valid code regex")
    })
}

fn notes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<ul[^>]*class="[^"]*catalog-notes[^"]*"[^>]*>(.*?)</ul>"#)
            .expect("valid notes regex")
    })
}

fn list_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<li[^>]*>(.*?)</li>").expect("valid list item regex"))
}

fn anchor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<a[^>]*>(.*?)</a>").expect("valid anchor regex"))
}

/// Extracts course listings from one search results page. Scanning is local
/// to each `views-row` block; rows whose title carries no recognizable
/// course code are logged and skipped rather than failing the whole page.
pub fn parse_course_rows(html: &str, origin: &str) -> Vec<CourseListing> {
    let starts: Vec<_> = row_start_re().find_iter(html).collect();
    let mut listings = Vec::new();

    for (idx, start) in starts.iter().enumerate() {
        let end = starts
            .get(idx + 1)
            .map(|next| next.start())
            .unwrap_or(html.len());
        let block = &html[start.start()..end];
        let not_offered = start.as_str().contains("not-offered");

        let Some(title) = title_re().captures(block) else {
            continue;
        };
        let href = title.get(1).map(|m| m.as_str()).unwrap_or("");
        let text = title.get(2).map(|m| m.as_str()).unwrap_or("");

        let Some(code) = code_re().captures(text) else {
            output::warn(&format!("no course code in listing '{}'", text.trim()));
            continue;
        };
        let code = format!("{} {}", &code[1], &code[2]);
        let detail_url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", origin, href)
        };

        listings.push(CourseListing {
            code,
            detail_url,
            not_offered,
        });
    }
    listings
}

/// Pulls prerequisite course codes out of a course detail page: the
/// `catalog-notes` list items mentioning "Prerequisite", one code per
/// anchor. Order is preserved and duplicates dropped.
pub fn parse_prerequisites(html: &str) -> Vec<String> {
    let mut prerequisites = Vec::new();
    let Some(notes) = notes_re().captures(html) else {
        return prerequisites;
    };
    let notes = notes.get(1).map(|m| m.as_str()).unwrap_or("");

    for item in list_item_re().captures_iter(notes) {
        let item = item.get(1).map(|m| m.as_str()).unwrap_or("");
        if !item.contains("Prerequisite") {
            continue;
        }
        for anchor in anchor_re().captures_iter(item) {
            let text = anchor.get(1).map(|m| m.as_str()).unwrap_or("").trim();
            if let Some(code) = code_re().captures(text) {
                let code = format!("{} {}", &code[1], &code[2]);
                if !prerequisites.contains(&code) {
                    prerequisites.push(code);
                }
            }
        }
    }
    prerequisites
}

/// `https://host/path` -> `https://host`, for resolving relative detail
/// links.
fn site_origin(base_url: &str) -> String {
    if let Some(scheme_end) = base_url.find("://") {
        let rest = &base_url[scheme_end + 3..];
        if let Some(path_start) = rest.find('/') {
            return base_url[..scheme_end + 3 + path_start].to_string();
        }
    }
    base_url.trim_end_matches('/').to_string()
}
