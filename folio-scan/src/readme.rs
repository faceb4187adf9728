//! README heuristics: description, sections, bullets, and links.
//!
//! Everything here is best effort over free-form Markdown. Functions take the
//! README as an `Option<&str>` where a missing README is a normal input, and
//! return `None` or an empty list rather than failing.

use std::sync::LazyLock;

use regex::Regex;

/// Headings whose section becomes `whatILearned`.
pub const LEARNED_HEADINGS: &[&str] = &["What I learned", "Lessons learned", "Learnings", "Retrospective"];

/// Heading groups tried in order for `highlights`.
pub const HIGHLIGHT_HEADINGS: &[&[&str]] = &[
    &["Features", "Key features", "Highlights"],
    &["How it works", "How it works?"],
    &["Usage", "How to use", "Getting started"],
];

/// Substrings that make a link a likely live deployment, most telling first.
pub const LIVE_URL_HINTS: &[&str] = &[
    "demo",
    "live",
    "app",
    "vercel",
    "netlify",
    "github.io",
    "render.com",
    "fly.dev",
    "railway.app",
];

/// Lines scanned for the description paragraph.
const DESCRIPTION_SCAN_LINES: usize = 40;
/// Continuation lines joined onto the first description line.
const DESCRIPTION_MAX_CONTINUATION: usize = 5;
/// Shorter cleaned descriptions are treated as noise.
const DESCRIPTION_MIN_CHARS: usize = 6;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[\w\-._~:/?#\[\]@!$&'()*+,;=%]+").expect("valid url regex")
});
static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static BACKTICKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`+").expect("valid backtick regex"));
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?(?:```|\z)|~~~.*?(?:~~~|\z)").expect("valid fence regex"));
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+]\s+(.*)$").expect("valid bullet regex"));
static SUBHEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{2,6}\s+(.*)$").expect("valid subheading regex"));
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#+)\s+").expect("valid heading regex"));

// ---------------------------------------------------------------------------
// Inline cleanup
// ---------------------------------------------------------------------------

/// Collapse whitespace runs to single spaces and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop HTML tags and decode `&nbsp;` / `&amp;`.
#[must_use]
pub fn strip_html(text: &str) -> String {
    let untagged = HTML_TAG_RE.replace_all(text, "");
    collapse_whitespace(&untagged.replace("&nbsp;", " ").replace("&amp;", "&"))
}

/// Reduce `[label](url)` to `label` and drop backticks.
#[must_use]
pub fn strip_markdown_links(text: &str) -> String {
    let unlinked = MD_LINK_RE.replace_all(text, "$1");
    collapse_whitespace(&BACKTICKS_RE.replace_all(&unlinked, ""))
}

/// HTML then Markdown-link cleanup.
#[must_use]
pub fn clean_inline(text: &str) -> String {
    strip_markdown_links(&strip_html(text))
}

/// Remove fenced code blocks entirely. An unclosed fence runs to the end.
#[must_use]
pub fn strip_code_blocks(text: &str) -> String {
    FENCE_RE.replace_all(text, "").into_owned()
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// Distinct `http(s)` URLs in order of first appearance.
#[must_use]
pub fn extract_links(text: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for m in URL_RE.find_iter(text) {
        if !links.iter().any(|l| l == m.as_str()) {
            links.push(m.as_str().to_string());
        }
    }
    links
}

/// First link matching a [`LIVE_URL_HINTS`] entry (checked hint by hint),
/// else the first link.
#[must_use]
pub fn choose_live_url(links: &[String]) -> Option<&str> {
    LIVE_URL_HINTS
        .iter()
        .find_map(|hint| links.iter().find(|l| l.to_lowercase().contains(hint)))
        .or_else(|| links.first())
        .map(String::as_str)
}

/// Strip Markdown debris from the end of a URL: a closing `)` or `).`, then a
/// final `.`. Returns `None` if nothing is left.
#[must_use]
pub fn sanitize_url(url: &str) -> Option<String> {
    let mut s = url.trim();
    if let Some(rest) = s.strip_suffix(").") {
        s = rest;
    } else if let Some(rest) = s.strip_suffix(')') {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix('.') {
        s = rest;
    }
    (!s.is_empty()).then(|| s.to_string())
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn is_fence(line: &str) -> bool {
    line.starts_with("```") || line.starts_with("~~~")
}

/// Per line, whether it is a fence marker or inside a fenced block.
fn fenced_lines(lines: &[&str]) -> Vec<bool> {
    let mut in_fence = false;
    lines
        .iter()
        .map(|line| {
            if is_fence(line.trim()) {
                in_fence = !in_fence;
                true
            } else {
                in_fence
            }
        })
        .collect()
}

fn heading_level(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b'#').count().max(1)
}

/// Body of the first section whose heading matches one of `headings`
/// (case-insensitive), up to the next heading of the same or higher level.
#[must_use]
pub fn extract_section(readme: Option<&str>, headings: &[&str]) -> Option<String> {
    let lines: Vec<&str> = readme?.lines().collect();
    let fenced = fenced_lines(&lines);

    let start = lines.iter().zip(&fenced).position(|(raw, in_fence)| {
        let line = raw.trim();
        !in_fence && line.starts_with('#') && {
            let name = line.trim_start_matches('#').trim().to_lowercase();
            headings.iter().any(|h| h.to_lowercase() == name)
        }
    })?;
    let start_level = heading_level(lines[start]);

    let body: Vec<&str> = lines[start + 1..]
        .iter()
        .zip(&fenced[start + 1..])
        .take_while(|(line, in_fence)| {
            **in_fence
                || HEADING_RE
                    .captures(line)
                    .is_none_or(|caps| caps[1].len() > start_level)
        })
        .map(|(line, _)| *line)
        .collect();

    let text = body.join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// The first section found among `groups`, tried group by group.
#[must_use]
pub fn extract_first_section(readme: Option<&str>, groups: &[&[&str]]) -> Option<String> {
    groups.iter().find_map(|headings| extract_section(readme, headings))
}

/// Turn a section into at most `max_items` bullet strings.
///
/// Uses the section's list items if it has any, else its sub-headings, else
/// its sentences.
#[must_use]
pub fn bulletize(section: Option<&str>, max_items: usize) -> Vec<String> {
    let Some(section) = section else {
        return Vec::new();
    };
    let stripped = strip_code_blocks(section);
    let lines: Vec<&str> = stripped.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let bullets: Vec<String> = lines
        .iter()
        .filter_map(|line| BULLET_RE.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .filter(|item| !item.is_empty())
        .take(max_items)
        .collect();
    if !bullets.is_empty() {
        return bullets;
    }

    let headings: Vec<String> = lines
        .iter()
        .filter_map(|line| SUBHEADING_RE.captures(line))
        .map(|caps| clean_inline(caps[1].trim()))
        .filter(|item| !item.is_empty())
        .take(max_items)
        .collect();
    if !headings.is_empty() {
        return headings;
    }

    let joined = lines.iter().map(|l| clean_inline(l)).collect::<Vec<_>>().join(" ");
    split_sentences(&joined).into_iter().take(max_items).collect()
}

/// Split after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut prev = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            sentences.push(std::mem::take(&mut current));
            prev = None;
            continue;
        }
        current.push(c);
        prev = Some(c);
    }
    sentences.push(current);

    sentences
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// List items of the first bullet list anywhere in the README.
#[must_use]
pub fn first_bullet_block(readme: Option<&str>, max_items: usize) -> Vec<String> {
    let Some(readme) = readme else {
        return Vec::new();
    };
    let mut bullets = Vec::new();

    for raw in readme.lines() {
        let line = raw.trim();
        if line.is_empty() {
            if !bullets.is_empty() {
                break;
            }
            continue;
        }
        if let Some(caps) = BULLET_RE.captures(line) {
            let cleaned = clean_inline(caps[1].trim());
            if !cleaned.is_empty() {
                bullets.push(cleaned);
            }
            if bullets.len() >= max_items {
                break;
            }
            continue;
        }
        if !bullets.is_empty() {
            break;
        }
    }
    bullets
}

// ---------------------------------------------------------------------------
// Description
// ---------------------------------------------------------------------------

fn is_decoration(line: &str) -> bool {
    line.starts_with('#')
        || line.starts_with("![")
        || line.starts_with("[![")
        || line.contains("shields.io")
        || line.starts_with('<')
        || line.to_lowercase().contains("<img")
}

/// Lossy decoding left replacement characters or control bytes behind.
fn is_garbled(line: &str) -> bool {
    line.chars()
        .any(|c| c == char::REPLACEMENT_CHARACTER || (c.is_control() && c != '\t'))
}

fn ends_continuation(next: &str) -> bool {
    next.is_empty()
        || next.starts_with('#')
        || next.starts_with("- ")
        || next.starts_with("* ")
        || next.starts_with("+ ")
        || next.starts_with("![")
        || next.starts_with("[![")
        || is_fence(next)
        || is_garbled(next)
}

/// First prose paragraph near the top of the README, cleaned to plain text.
///
/// Headings, badges, images, raw HTML, fenced code and undecodable lines are
/// skipped. A line wrapped over several source lines is re-joined until a
/// sentence ends.
#[must_use]
pub fn extract_description(readme: Option<&str>) -> Option<String> {
    let lines: Vec<&str> = readme?.lines().collect();
    let scan = lines.len().min(DESCRIPTION_SCAN_LINES);
    let fenced = fenced_lines(&lines);

    for i in 0..scan {
        let line = lines[i].trim();
        if fenced[i] || line.is_empty() || is_decoration(line) || is_garbled(line) {
            continue;
        }

        let mut parts = vec![line];
        let end = lines.len().min(i + 1 + DESCRIPTION_MAX_CONTINUATION);
        for next in lines.iter().take(end).skip(i + 1).map(|l| l.trim()) {
            if ends_continuation(next) {
                break;
            }
            parts.push(next);
            if next.ends_with(['.', '!', '?']) {
                break;
            }
        }

        let cleaned = clean_inline(&parts.join(" "));
        if cleaned.chars().count() >= DESCRIPTION_MIN_CHARS {
            return Some(cleaned);
        }
    }
    None
}
