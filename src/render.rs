//! Markdown to HTML rendering using pulldown-cmark
//!
//! Renders a fully rewritten note (reference tags already turned into Markdown links,
//! image embeds already turned into inline `<img>` tags) into a standalone HTML page:
//!
//! - tables, strikethrough, task lists and footnotes are enabled
//! - bare `http(s)://` and `www.` URLs and email addresses become links when they start
//!   a text run or follow whitespace or one of `*_~(`
//! - headings get an `id` anchor derived from their text (deduplicated with `-1`, `-2`...)
//! - soft line breaks are rendered as `<br />`
//! - raw HTML passes through untouched

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream};
use regex::Regex;

use crate::constants as C;
use crate::error::{Error, Result};
use crate::util;

static BARE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|[\s*_~(])((?:https?://|www\.)[^\s<>]+|[A-Za-z0-9._+-]+@[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)+)",
    )
    .unwrap()
});

/// Characters stripped from the end of a bare URL
const URL_TRAILING_PUNCTUATION: &str = ".,:;!?'\"*_~";

/// Converts rewritten note text into HTML documents
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    stylesheet: Option<String>,
}

impl Renderer {
    /// Create a renderer with an optional stylesheet
    pub fn new(stylesheet: Option<String>) -> Self {
        Self { stylesheet }
    }

    /// Create a renderer using `style.css` from the metadata directory, if present
    pub fn load(meta_dir: &Path) -> Result<Self> {
        let style_path = meta_dir.join(C::STYLE_FILENAME);
        match fs::read_to_string(&style_path) {
            Ok(css) => {
                debug!("using stylesheet {}", util::display_path(&style_path));
                Ok(Self::new(Some(css)))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new(None)),
            Err(e) => Err(Error::from_io("stylesheet", &style_path, e)),
        }
    }

    /// Render `markdown` into a complete HTML page titled `title`
    pub fn to_html(&self, markdown: &str, title: &str) -> String {
        let body = markdown_to_html(markdown);

        let mut doc = String::with_capacity(body.len() + 256);
        doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        doc.push_str("<title>");
        doc.push_str(&escape_text(title));
        doc.push_str("</title>\n");
        if let Some(css) = &self.stylesheet {
            doc.push_str("<style>\n");
            doc.push_str(css);
            doc.push_str("\n</style>\n");
        }
        doc.push_str("</head>\n<body>\n");
        doc.push_str(&body);
        doc.push_str("</body>\n</html>\n");
        doc
    }

    /// Render and write to `dest`, creating parent directories as needed
    ///
    /// Nothing touches the disk until conversion has finished.
    pub fn render_to_file(&self, markdown: &str, title: &str, dest: &Path) -> Result<()> {
        let doc = self.to_html(markdown, title);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::from_io("output directory", parent, e))?;
        }
        fs::write(dest, doc).map_err(|e| Error::Io {
            path: dest.to_path_buf(),
            source: e,
        })?;

        debug!("wrote {}", util::display_path(dest));
        Ok(())
    }
}

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Convert Markdown to an HTML fragment
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = TextMergeStream::new(Parser::new_ext(markdown, markdown_options()));

    let mut events: Vec<Event<'_>> = Vec::new();
    let mut anchors = Anchors::default();
    let mut heading_start: Option<usize> = None;
    let mut link_depth = 0usize;
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::SoftBreak => events.push(Event::HardBreak),
            Event::Start(Tag::Heading { .. }) => {
                heading_start = Some(events.len());
                events.push(event);
            }
            Event::End(TagEnd::Heading(level)) => {
                if let Some(start) = heading_start.take() {
                    let text = heading_text(&events[start + 1..]);
                    if let Event::Start(Tag::Heading { id, .. }) = &mut events[start] {
                        if let Some(explicit) = id.as_deref() {
                            anchors.reserve(explicit);
                        } else {
                            *id = Some(anchors.unique(&text).into());
                        }
                    }
                }
                events.push(Event::End(TagEnd::Heading(level)));
            }
            Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => {
                link_depth += 1;
                events.push(event);
            }
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                link_depth = link_depth.saturating_sub(1);
                events.push(event);
            }
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                events.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                events.push(event);
            }
            Event::Text(text) if link_depth == 0 && !in_code_block => {
                let at_boundary = !matches!(
                    events.last(),
                    Some(
                        Event::Text(_)
                            | Event::Code(_)
                            | Event::InlineHtml(_)
                            | Event::End(TagEnd::Link | TagEnd::Image)
                    )
                );
                push_autolinked(text, at_boundary, &mut events);
            }
            other => events.push(other),
        }
    }

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Heading anchor ids handed out so far
#[derive(Default)]
struct Anchors {
    seen: HashMap<String, usize>,
}

impl Anchors {
    fn reserve(&mut self, id: &str) {
        self.seen.entry(id.to_string()).or_insert(0);
    }

    fn unique(&mut self, text: &str) -> String {
        let mut base = util::slugify(text);
        if base.is_empty() {
            base = "heading".to_string();
        }

        let mut candidate = base.clone();
        while let Some(count) = self.seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{}-{}", base, count);
        }
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}

fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        if let Event::Text(t) | Event::Code(t) = event {
            text.push_str(t);
        }
    }
    text
}

/// Push a text event, splitting out bare URLs and email addresses as autolinks
///
/// `at_boundary` tells whether the character before `text` allows a link to start there.
fn push_autolinked<'a>(text: CowStr<'a>, at_boundary: bool, events: &mut Vec<Event<'a>>) {
    let spans: Vec<(usize, usize, String)> = BARE_URL
        .captures_iter(&text)
        .filter_map(|caps| {
            let m = caps.get(1)?;
            if m.start() == 0 && !at_boundary {
                return None;
            }
            let (len, dest) = autolink_target(m.as_str())?;
            Some((m.start(), m.start() + len, dest))
        })
        .collect();

    if spans.is_empty() {
        events.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for (start, end, dest) in spans {
        if start > last {
            events.push(Event::Text(text[last..start].to_string().into()));
        }
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: dest.into(),
            title: "".into(),
            id: "".into(),
        }));
        events.push(Event::Text(text[start..end].to_string().into()));
        events.push(Event::End(TagEnd::Link));
        last = end;
    }
    if last < text.len() {
        events.push(Event::Text(text[last..].to_string().into()));
    }
}

/// Length of the linkable prefix of a candidate and its link destination
fn autolink_target(candidate: &str) -> Option<(usize, String)> {
    if candidate.starts_with("www.") || candidate.contains("://") {
        let url = trim_url(candidate);
        if url.ends_with("://") || url == "www." {
            return None;
        }
        let dest = if url.starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        return Some((url.len(), dest));
    }

    let email = candidate.trim_end_matches('.');
    let (_, domain) = email.split_once('@')?;
    if !domain.contains('.') || email.ends_with(|c: char| c == '-' || c == '_') {
        return None;
    }
    Some((email.len(), format!("mailto:{}", email)))
}

fn trim_url(mut url: &str) -> &str {
    while let Some(last) = url.chars().last() {
        let unbalanced_paren =
            last == ')' && url.matches(')').count() > url.matches('(').count();
        if URL_TRAILING_PUNCTUATION.contains(last) || unbalanced_paren {
            url = &url[..url.len() - last.len_utf8()];
        } else {
            break;
        }
    }
    url
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
