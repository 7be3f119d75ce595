//! Defines the [`Parser`] and [`Error`] types: the logic for collecting
//! [`Post`]s from a source directory of plain-text files.

use std::{
    collections::HashMap,
    fmt,
    fs::read_dir,
    path::{Path, PathBuf},
    string::FromUtf8Error,
};

use chrono::{DateTime, Local};
use log::{debug, warn};

use crate::post::Post;

/// The extension of post source files.
pub const TEXT_EXTENSION: &str = ".txt";

/// Parses [`Post`] objects from source files.
#[derive(Default)]
pub struct Parser;

impl Parser {
    /// Constructs a new parser.
    pub fn new() -> Parser {
        Parser
    }

    /// Searches `source_directory` (non-recursively) for post files
    /// (extension = `.txt`) and returns a list of [`Post`] objects sorted by
    /// modification time, most recent first. Posts with the same
    /// modification time keep file-name order.
    ///
    /// Any unreadable file aborts the whole collection.
    pub fn parse_posts(&self, source_directory: &Path) -> Result<Vec<Post>> {
        let mut paths = Vec::new();
        for result in read_dir(source_directory).map_err(|e| Error::ReadDirectory {
            path: source_directory.to_owned(),
            err: e,
        })? {
            let entry = result?;
            // Non-post entries are skipped whatever their name; only a post
            // whose own name isn't UTF-8 is an error (see `_parse_post`).
            let path = entry.path();
            if entry.file_name().to_string_lossy().ends_with(TEXT_EXTENSION) && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut posts = Vec::with_capacity(paths.len());
        for path in &paths {
            posts.push(self.parse_post(path)?);
        }
        warn_on_collisions(&posts, &paths);

        posts.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(posts)
    }

    /// Parses a single [`Post`] from the source file at `path`.
    fn parse_post(&self, path: &Path) -> Result<Post> {
        match self._parse_post(path) {
            Ok(p) => Ok(p),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{}`", path.display()),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(&self, path: &Path) -> Result<Post> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| InvalidFileNameError(path.to_owned()))?;

        let metadata = std::fs::metadata(path)?;
        let modified: DateTime<Local> = DateTime::from(metadata.modified()?);
        let text = universal_newlines(&String::from_utf8(std::fs::read(path)?)?);

        let post = Post::from_source(stem, &text, modified, metadata.len());
        debug!(
            "parsed `{}` ({} words, {} bytes)",
            post.title, post.word_count, post.size
        );
        Ok(post)
    }
}

// `\r\n` and lone `\r` line endings both become `\n`, so the markup rules
// see the same lines whatever platform wrote the file.
fn universal_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// Distinct stems can map onto the same title (`a b` and `a_b`); the later
// page silently replaces the earlier one on disk.
fn warn_on_collisions(posts: &[Post], paths: &[PathBuf]) {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for (post, path) in posts.iter().zip(paths) {
        if let Some(previous) = seen.insert(&post.title, path) {
            warn!(
                "`{}` and `{}` both produce `{}`; only one page will survive",
                previous.display(),
                path.display(),
                post.file_name()
            );
        }
    }
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when the source directory can't be listed.
    ReadDirectory { path: PathBuf, err: std::io::Error },

    /// Returned when a post source file isn't valid UTF-8.
    Decode(FromUtf8Error),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned when a source file name isn't valid UTF-8.
    InvalidFileName(InvalidFileNameError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ReadDirectory { path, err } => {
                write!(f, "Reading source directory '{}': {}", path.display(), err)
            }
            Error::Decode(err) => write!(f, "decoding UTF-8: {}", err),
            Error::Io(err) => err.fmt(f),
            Error::InvalidFileName(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadDirectory { path: _, err } => Some(err),
            Error::Decode(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<FromUtf8Error> for Error {
    /// Converts a [`FromUtf8Error`] into an [`Error`]. It allows us to use the
    /// `?` operator when decoding source files.
    fn from(err: FromUtf8Error) -> Error {
        Error::Decode(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
