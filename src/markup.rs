//! Inline markup scanner
//!
//! Splits raw note text into a sequence of [`Token`]s:
//!
//! - `[[title|id]]` reference tags. The content between the brackets may not contain
//!   `[`, `]` or a newline. The id is the segment after the **last** `|`, so a title may
//!   itself contain `|` (`[[a|b|c]]` is title `a|b`, id `c`). Surrounding whitespace is
//!   trimmed from the id; the title is kept verbatim.
//! - `((name))` image embeds. The name may not contain `(`, `)` or a newline, and an
//!   empty or blank name is not an embed.
//!
//! Anything that does not parse is returned as [`Token::Literal`] so callers can write it
//! back unchanged. Concatenating the source slices of all tokens reproduces the input.

use crate::constants as C;

/// One piece of scanned note text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Text outside any recognised tag
    Literal(&'a str),
    /// `[[title|id]]`
    Reference(Reference<'a>),
    /// `((name))`
    Image(ImageEmbed<'a>),
}

/// A parsed reference tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    pub title: &'a str,
    pub id: &'a str,
}

/// A parsed image embed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageEmbed<'a> {
    pub name: &'a str,
}

/// Lazy token stream over note text
///
/// A clone continues from the same position. Call [`tokenize`] again to rescan.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

/// Scan `text` into tokens
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { text, pos: 0 }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.text[self.pos..];
        if rest.is_empty() {
            return None;
        }

        let mut search = 0;
        while let Some(offset) = rest[search..].find(|c: char| c == '[' || c == '(') {
            let at = search + offset;
            if let Some((token, len)) = parse_tag(&rest[at..]) {
                if at > 0 {
                    // Flush the literal prefix; the tag is picked up by the next call
                    self.pos += at;
                    return Some(Token::Literal(&rest[..at]));
                }
                self.pos += len;
                return Some(token);
            }
            search = at + 1;
        }

        self.pos = self.text.len();
        Some(Token::Literal(rest))
    }
}

/// Try to parse a tag at the very start of `s`, returning it with its byte length
fn parse_tag(s: &str) -> Option<(Token<'_>, usize)> {
    if let Some(inner) = s.strip_prefix(C::REFERENCE_OPEN) {
        let end = first_line(inner).find(C::REFERENCE_CLOSE)?;
        let body = &inner[..end];
        if body.contains(&['[', ']'][..]) {
            return None;
        }
        let (title, id) = body.rsplit_once(C::REFERENCE_SEPARATOR)?;
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        let len = C::REFERENCE_OPEN.len() + end + C::REFERENCE_CLOSE.len();
        return Some((Token::Reference(Reference { title, id }), len));
    }

    if let Some(inner) = s.strip_prefix(C::IMAGE_OPEN) {
        let end = first_line(inner).find(C::IMAGE_CLOSE)?;
        let name = &inner[..end];
        if name.trim().is_empty() || name.contains(&['(', ')'][..]) {
            return None;
        }
        let len = C::IMAGE_OPEN.len() + end + C::IMAGE_CLOSE.len();
        return Some((Token::Image(ImageEmbed { name }), len));
    }

    None
}

/// `s` up to its first newline; tags never span lines
fn first_line(s: &str) -> &str {
    s.find('\n').map_or(s, |end| &s[..end])
}

/// All reference tags in `text`, in order
pub fn references(text: &str) -> impl Iterator<Item = Reference<'_>> + Clone {
    tokenize(text).filter_map(|t| match t {
        Token::Reference(r) => Some(r),
        _ => None,
    })
}

/// Whether `text` holds a reference tag pointing at `id`
pub fn references_id(text: &str, id: &str) -> bool {
    references(text).any(|r| r.id == id)
}

/// Format a reference tag: `[[title|id]]`
pub fn reference_tag(title: &str, id: &str) -> String {
    format!(
        "{}{}{}{}{}",
        C::REFERENCE_OPEN,
        title,
        C::REFERENCE_SEPARATOR,
        id,
        C::REFERENCE_CLOSE
    )
}

/// Markdown link to the compiled artifact of `id`: `[title](id.html)`
pub fn markdown_link(reference: &Reference<'_>) -> String {
    let dest = format!("{}.{}", reference.id, C::HTML_EXTENSION);
    if dest.contains(char::is_whitespace) {
        format!("[{}](<{}>)", reference.title, dest)
    } else {
        format!("[{}]({})", reference.title, dest)
    }
}
