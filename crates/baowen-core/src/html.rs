//! Deterministic article-to-HTML rendering for the download endpoint.

use std::sync::OnceLock;

use chrono::Local;
use regex::Regex;

fn paragraph_split_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{2,}").unwrap())
}

fn image_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^!\[.*\]\(.*\)$").unwrap())
}

fn strong_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").unwrap())
}

const DOC_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body {
            font-family: 微软雅黑;
            font-size: 17px;
            margin: 20px;
            line-height: 2;
            letter-spacing: 1px;
        }
        p {
            padding-left: 8px;
            padding-right: 8px;
            margin-top: 24px;
            margin-bottom: 0;
        }
        .content strong {
            color: #006ddb;
        }
        .h2-template strong {
            color: inherit;
        }
    </style>
</head>
<body>
    <section class="_editor" style="margin-bottom:unset;"><p><img src="https://img.96weixin.com/ueditor/20240504/1714833409545828.gif" alt="可爱猫爪GIF动态引导在看.gif" style="vertical-align:bottom;"></p></section>
"#;

const DOC_TAIL: &str = r#"
    <section class="_editor" data-support="96编辑器" data-style-id="14294" style="margin-bottom:unset;"><section style="margin:10px 0%;box-sizing:border-box;"><section style="display:inline-block;width:100%;vertical-align:top;border-bottom:1px dashed rgb(0, 82, 255);border-right:1px dashed rgb(0, 82, 255);box-sizing:border-box;margin-bottom:unset;" data-width="100%"><section style="box-sizing:border-box;margin-bottom:unset;"><section style="margin-right:0%;margin-bottom:10px;margin-left:0%;box-sizing:border-box;"><section style="display:inline-block;width:96%;border-color:rgb(0, 82, 255);border-style:solid;border-width:1px 0px 0px 10px;padding-right:10px;padding-left:10px;box-sizing:border-box;margin-bottom:unset;" data-width="96%"><section style="margin-top:10px;box-sizing:border-box;margin-bottom:unset;"><p>往期回顾</p></section></section></section></section><section style="box-sizing:border-box;margin-bottom:unset;"><section style="display:inline-block;width:100%;vertical-align:top;padding:2px 10px;box-sizing:border-box;margin-bottom:unset;" data-width="100%"><section style="margin:8px 0%;box-sizing:border-box;"><section style="font-size:13px;color:rgb(62, 62, 62);box-sizing:border-box;margin-bottom:unset;"><p>1.</p></section></section><section style="margin:8px 0%;box-sizing:border-box;"><section style="font-size:13px;color:rgb(62, 62, 62);box-sizing:border-box;margin-bottom:unset;"><p>2.</p></section></section><section style="margin:8px 0%;box-sizing:border-box;"><section style="font-size:13px;color:rgb(62, 62, 62);box-sizing:border-box;margin-bottom:unset;"><p>3.</p></section></section></section></section></section></section><section class="_editor" style="margin-bottom:unset;"><p><img src="https://img.96weixin.com/ueditor/20240507/17150500881715050088944885.gif" style="vertical-align:bottom;"></p></section>
</body>
</html>
"#;

/// Render article content into a complete styled HTML document.
///
/// Paragraphs are split on blank-line boundaries; blank paragraphs are
/// dropped. `**text**` becomes `<strong>text</strong>`, except inside a
/// paragraph that is exactly a markdown image reference, which passes
/// through untouched. Pure: identical input yields identical output.
pub fn render_document(content: &str) -> String {
    let paragraph_blocks: Vec<String> = paragraph_split_regex()
        .split(content)
        .filter(|p| !p.trim().is_empty())
        .map(render_paragraph)
        .collect();

    [DOC_HEAD, &paragraph_blocks.join("\n"), DOC_TAIL].concat()
}

fn render_paragraph(paragraph: &str) -> String {
    if image_regex().is_match(paragraph.trim()) {
        return format!("<div class=\"content\"><p>{}</p></div>", paragraph);
    }

    let formatted = strong_regex().replace_all(paragraph, "<strong>$1</strong>");
    format!("<div class=\"content\"><p>{}</p></div>", formatted)
}

/// Derive a download filename from the article title and the current
/// time, replacing path-unsafe characters.
pub fn download_filename(title: &str) -> String {
    let safe_title: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.html", safe_title, timestamp)
}
