//! Run-wide totals computed across all posts, and the pagination of the post
//! list into index pages.

use crate::post::{Post, DATE_FORMAT};
use chrono::{DateTime, Local};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// The aggregate view of the site handed to the index pages.
pub struct Site<'a> {
    /// All posts, most recent first.
    pub posts: &'a [Post],

    /// The number of posts per index page.
    pub page_size: usize,

    /// The sum of every post's word count.
    pub total_word_count: usize,

    /// The sum of the raw source file sizes, in megabytes.
    pub size_mb: f64,

    /// When this run happened; not the date of the newest post.
    pub updated: DateTime<Local>,
}

impl<'a> Site<'a> {
    /// Aggregates `posts`. `page_size` must be non-zero.
    pub fn new(posts: &'a [Post], page_size: usize, updated: DateTime<Local>) -> Site<'a> {
        Site {
            posts,
            page_size,
            total_word_count: posts.iter().map(|p| p.word_count).sum(),
            size_mb: posts.iter().map(|p| p.size).sum::<u64>() as f64 / BYTES_PER_MB,
            updated,
        }
    }

    /// The number of index pages. There is always at least one, so an empty
    /// site still gets an `index.html`.
    pub fn total_pages(&self) -> usize {
        self.posts.len().saturating_sub(1) / self.page_size + 1
    }

    /// [`Site::size_mb`] formatted for display (see [`format_size`]).
    pub fn site_size(&self) -> String {
        format_size(self.size_mb)
    }

    /// The formatted time of this run.
    pub fn last_update(&self) -> String {
        self.updated.format(DATE_FORMAT).to_string()
    }

    /// Splits the posts into index pages, yielding each 1-based page number
    /// with its posts.
    pub fn pages(&self) -> impl Iterator<Item = (usize, &'a [Post])> + '_ {
        let posts = self.posts;
        let page_size = self.page_size;
        (1..=self.total_pages()).map(move |page| {
            let start = ((page - 1) * page_size).min(posts.len());
            let end = (start + page_size).min(posts.len());
            (page, &posts[start..end])
        })
    }
}

/// The output file name for an index page: `index.html` for the first page,
/// `page_{n}.html` for the rest.
pub fn index_file_name(page: usize) -> String {
    match page {
        1 => String::from("index.html"),
        n => format!("page_{}.html", n),
    }
}

/// Formats a size given in megabytes with the largest fitting unit of KB, MB,
/// GB, or TB.
pub fn format_size(size_in_mb: f64) -> String {
    if size_in_mb < 1.0 {
        format!("{:.2} KB", size_in_mb * 1024.0)
    } else if size_in_mb < 1024.0 {
        format!("{:.2} MB", size_in_mb)
    } else if size_in_mb < 1024.0 * 1024.0 {
        format!("{:.2} GB", size_in_mb / 1024.0)
    } else {
        format!("{:.2} TB", size_in_mb / (1024.0 * 1024.0))
    }
}
