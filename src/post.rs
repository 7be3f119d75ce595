//! Defines the [`Post`] type and how it is presented to templates.

use chrono::{DateTime, Local};
use gtmpl_value::Value;
use std::collections::HashMap;

/// The display format for post dates and the site's last-update stamp, e.g.
/// `Tuesday Mar 05 2024 14:07`.
pub const DATE_FORMAT: &str = "%A %b %d %Y %H:%M";

/// Represents a single post: one source text file and its rendered form.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The file stem with spaces replaced by underscores. It doubles as the
    /// output file stem.
    pub title: String,

    /// The source file's modification time. Posts are ordered by this value;
    /// the displayed date is derived from it by [`Post::date`].
    pub modified: DateTime<Local>,

    /// The number of whitespace-delimited tokens in `content`.
    pub word_count: usize,

    /// The HTML fragment produced by [`crate::markup::to_html`].
    pub content: String,

    /// The size of the source file in bytes.
    pub size: u64,
}

impl Post {
    /// Builds a post from the file stem and raw text of its source file.
    pub fn from_source(stem: &str, text: &str, modified: DateTime<Local>, size: u64) -> Post {
        let content = crate::markup::to_html(text);
        Post {
            title: title_from_stem(stem),
            modified,
            word_count: crate::markup::word_count(&content),
            content,
            size,
        }
    }

    /// The title as shown to readers, with underscores turned back into
    /// spaces.
    pub fn display_title(&self) -> String {
        self.title.replace('_', " ")
    }

    /// The formatted modification time (see [`DATE_FORMAT`]).
    pub fn date(&self) -> String {
        self.modified.format(DATE_FORMAT).to_string()
    }

    /// The name of the post's standalone page, e.g. `My_Post.html`.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.title)
    }

    /// Converts a [`Post`] into a [`Value`] for templating. The result is a
    /// [`Value::Object`] with fields `title` (the file-name form),
    /// `display_title`, `date`, `word_count`, and `content`.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("title".to_owned(), Value::from(self.title.as_str()));
        m.insert("display_title".to_owned(), Value::from(self.display_title()));
        m.insert("date".to_owned(), Value::from(self.date()));
        m.insert("word_count".to_owned(), Value::from(self.word_count as u64));
        m.insert("content".to_owned(), Value::from(self.content.as_str()));
        Value::Object(m)
    }
}

/// Derives a post title from a file stem.
pub fn title_from_stem(stem: &str) -> String {
    stem.replace(' ', "_")
}
