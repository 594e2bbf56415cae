//! Turns raw provider output into a well-formed [`Article`].
//!
//! Providers are instructed to return a JSON object with `title` and
//! `content` fields, but routinely don't. This module never fails: when
//! the strict parse is unusable it falls back to best-effort extraction.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::Article;

/// Title used when recovery finds nothing better
const FALLBACK_TITLE: &str = "精彩文章";

fn title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("《(.*?)》").unwrap())
}

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap())
}

#[derive(Deserialize)]
struct RawArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

enum Parsed {
    Ok(Article),
    Malformed,
}

/// Normalize raw provider text into an article. Total: every input maps
/// to an article with a non-empty title.
pub fn normalize(raw: &str) -> Article {
    match parse_strict(raw) {
        Parsed::Ok(article) => article,
        Parsed::Malformed => recover(raw),
    }
}

fn parse_strict(raw: &str) -> Parsed {
    match serde_json::from_str::<RawArticle>(strip_code_fence(raw)) {
        Ok(parsed) if !parsed.title.trim().is_empty() && !parsed.content.trim().is_empty() => {
            Parsed::Ok(Article {
                title: parsed.title,
                content: parsed.content,
            })
        }
        // Missing or empty fields are treated exactly like a parse failure.
        _ => Parsed::Malformed,
    }
}

/// Models sometimes wrap the JSON in a fenced code block despite being
/// told not to; unwrap it so the strict parse still gets a chance.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn recover(raw: &str) -> Article {
    debug!("Provider response was not valid article JSON, extracting by pattern");

    let title = title_regex()
        .captures(raw)
        .map(|caps| caps[1].to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());

    // Strip a single leading markdown heading line, then trim.
    let content = heading_regex().replace(raw, "").trim().to_string();

    Article { title, content }
}
