//! Converts the lightweight post markup into an HTML fragment. The markup is
//! a handful of line-oriented substitutions applied in a fixed order; each
//! pass operates on the output of the previous one:
//!
//! 1. `[h1]`, `[h2]`, `[h3]` at the start of a line become headers.
//! 2. Blank lines become `<br /><br />`.
//! 3. Remaining lone newlines become `<br />`.
//! 4. `[text](url)` becomes a link.
//! 5. `[b]` at the start of a line bolds the rest of the line.
//! 6. `[b]text[/b]` anywhere becomes bold text.
//!
//! Passes 5 and 6 run after every newline has been replaced, so "start of a
//! line" for pass 5 is effectively the start of the whole text.

use regex::Regex;
use std::sync::LazyLock;

const LINE_BREAK: &str = "<br />";

static H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\[h1\](.*?)$").unwrap());
static H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\[h2\](.*?)$").unwrap());
static H3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\[h3\](.*?)$").unwrap());
static BLANK_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());
static BOLD_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\[b\](.*?)$").unwrap());
static BOLD_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[b\](.*?)\[/b\]").unwrap());

/// Transforms raw post text into an HTML fragment. See the module docs for
/// the rules and their order.
pub fn to_html(text: &str) -> String {
    let html = headers(text);
    let html = blank_lines(&html);
    let html = single_newlines(&html);
    let html = links(&html);
    bold(&html)
}

/// Counts the whitespace-delimited tokens in `html`. This is meant to be
/// called on the output of [`to_html`], so tags count as words.
pub fn word_count(html: &str) -> usize {
    html.split_whitespace().count()
}

fn headers(text: &str) -> String {
    let html = H1.replace_all(text, "<h1>${1}</h1>");
    let html = H2.replace_all(&html, "<h2>${1}</h2>");
    H3.replace_all(&html, "<h3>${1}</h3>").into_owned()
}

fn blank_lines(text: &str) -> String {
    BLANK_LINE
        .replace_all(text, format!("{}{}", LINE_BREAK, LINE_BREAK).as_str())
        .into_owned()
}

// Replaces a newline only when neither neighbour is also a newline.
fn single_newlines(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.char_indices() {
        if c == '\n' {
            let after_newline = i > 0 && bytes[i - 1] == b'\n';
            let before_newline = bytes.get(i + 1) == Some(&b'\n');
            if !after_newline && !before_newline {
                out.push_str(LINE_BREAK);
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn links(text: &str) -> String {
    LINK.replace_all(text, r#"<a href="${2}">${1}</a>"#)
        .into_owned()
}

fn bold(text: &str) -> String {
    let html = BOLD_LINE.replace_all(text, "<b>${1}</b>");
    BOLD_SPAN.replace_all(&html, "<b>${1}</b>").into_owned()
}
