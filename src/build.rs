//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: collecting the posts
//! ([`crate::parser`]), aggregating them ([`crate::site`]), and rendering
//! index and post pages ([`crate::write`]).
//!
//! A failure at any step stops the run. Pages written before the failure stay
//! on disk; the next successful run overwrites them.

use crate::config::Config;
use crate::parser::{Error as ParseError, Parser as PostParser};
use crate::site::Site;
use crate::write::{Error as WriteError, TemplateRenderer, Writer};
use chrono::{DateTime, Local};
use log::info;
use std::fmt;
use std::path::{Path, PathBuf};

/// What a successful run produced.
#[derive(Debug)]
pub struct Summary {
    /// The number of posts collected.
    pub posts: usize,

    /// The number of index pages written.
    pub index_pages: usize,

    /// Every file written, index pages first.
    pub files: Vec<PathBuf>,
}

/// Builds the site from a [`Config`] object, stamping the index pages with
/// the current time.
pub fn build_site(config: &Config) -> Result<Summary> {
    build_site_at(config, Local::now())
}

/// Builds the site from a [`Config`] object, using `now` as the site's
/// last-update time. This calls into [`PostParser::parse_posts`],
/// [`Writer::write_index_pages`], and [`Writer::write_post_pages`] which do
/// the heavy-lifting.
pub fn build_site_at(config: &Config, now: DateTime<Local>) -> Result<Summary> {
    if config.page_size == 0 {
        return Err(Error::InvalidPageSize);
    }

    std::fs::create_dir_all(&config.output_directory).map_err(|e| Error::CreateOutput {
        path: config.output_directory.clone(),
        err: e,
    })?;

    // collect all posts
    let posts = PostParser::new().parse_posts(&config.source_directory)?;
    info!(
        "collected {} posts from {}",
        posts.len(),
        config.source_directory.display()
    );

    let site = Site::new(&posts, config.page_size, now);
    let renderer = parse_template(&config.template_file)?;

    // write the index and post pages
    let writer = Writer {
        renderer: &renderer,
        output_directory: &config.output_directory,
        favicon: &config.favicon,
    };
    let mut files = writer.write_index_pages(&site)?;
    files.extend(writer.write_post_pages(&posts)?);

    info!(
        "built {} index pages and {} post pages ({} words, {})",
        site.total_pages(),
        posts.len(),
        site.total_word_count,
        site.site_size()
    );

    Ok(Summary {
        posts: posts.len(),
        index_pages: site.total_pages(),
        files,
    })
}

// Loads the template file and parses it into a renderer.
fn parse_template(template_file: &Path) -> Result<TemplateRenderer> {
    let contents =
        std::fs::read_to_string(template_file).map_err(|e| Error::OpenTemplateFile {
            path: template_file.to_owned(),
            err: e,
        })?;
    TemplateRenderer::parse(&contents).map_err(|e| Error::ParseTemplate {
        path: template_file.to_owned(),
        err: e,
    })
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing, writing,
/// parsing template files, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for errors writing [`crate::post::Post`]s to disk as HTML files.
    Write(WriteError),

    /// Returned when the output directory can't be created.
    CreateOutput { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate { path: PathBuf, err: WriteError },

    /// Returned when the configured page size is zero.
    InvalidPageSize,
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::CreateOutput { path, err } => {
                write!(f, "Creating output directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template file '{}': {}", path.display(), err)
            }
            Error::InvalidPageSize => write!(f, "page size must be at least 1"),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::CreateOutput { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate { path: _, err } => Some(err),
            Error::InvalidPageSize => None,
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use std::fs::{self, File};
    use std::time::{Duration, SystemTime};

    const TEMPLATE: &str = concat!(
        "<html><head><link rel=\"icon\" href=\"{{.favicon}}\"></head><body>\n",
        "{{range .posts}}<article><a href=\"{{.title}}.html\">{{.title}}</a> ",
        "{{.date}} ({{.word_count}} words)</article>\n{{end}}",
        "<footer>page {{.page}} of {{.total_pages}} | {{.total_word_count}} words | ",
        "{{.site_size}} | updated {{.last_update}}</footer></body></html>\n",
    );

    struct Fixture {
        _dir: tempfile::TempDir,
        config: Config,
    }

    fn fixture() -> std::io::Result<Fixture> {
        let dir = tempfile::tempdir()?;
        let config = Config {
            source_directory: dir.path().join("post"),
            template_file: dir.path().join("template").join("template.html"),
            output_directory: dir.path().join("www_html"),
            ..Config::default()
        };
        fs::create_dir_all(&config.source_directory)?;
        fs::create_dir_all(config.template_file.parent().unwrap())?;
        fs::write(&config.template_file, TEMPLATE)?;
        Ok(Fixture { _dir: dir, config })
    }

    fn write_post(dir: &Path, name: &str, text: &str, modified: SystemTime) -> std::io::Result<()> {
        let path = dir.join(name);
        fs::write(&path, text)?;
        File::options().write(true).open(&path)?.set_modified(modified)
    }

    fn sorted_file_names(dir: &Path) -> std::io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    #[test]
    fn test_build_site() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let f = fixture()?;
        let now = SystemTime::now();
        write_post(
            &f.config.source_directory,
            "First Post.txt",
            "[h1]Hello\nfirst words",
            now - Duration::from_secs(3 * 86400),
        )?;
        write_post(
            &f.config.source_directory,
            "second.txt",
            "see [home](index.html) now",
            now - Duration::from_secs(86400),
        )?;

        let updated = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        let summary = build_site_at(&f.config, updated)?;
        assert_eq!(2, summary.posts);
        assert_eq!(1, summary.index_pages);
        assert_eq!(3, summary.files.len());

        let out = &f.config.output_directory;
        assert_eq!(
            vec!["First_Post.html", "index.html", "second.html"],
            sorted_file_names(out)?
        );

        let index = fs::read_to_string(out.join("index.html"))?;
        let second = index.find("second.html").unwrap();
        let first = index.find("First_Post.html").unwrap();
        assert!(second < first, "newest post should be listed first");

        let article = |href: &str| index.lines().find(|l| l.contains(href)).unwrap().to_owned();
        // `<h1>Hello</h1><br`, `/>first`, `words`
        assert!(article("First_Post.html").ends_with("(3 words)</article>"));
        // `see`, `<a`, `href="index.html">home</a>`, `now`
        assert!(article("second.html").ends_with("(4 words)</article>"));
        assert!(index.contains("page 1 of 1 | 7 words |"));
        assert!(index.contains("updated Tuesday Mar 05 2024 14:07"));
        assert!(index.contains(r#"href="favicon.ico""#));

        let post = fs::read_to_string(out.join("First_Post.html"))?;
        assert!(post.contains("<title>First Post</title>"));
        assert!(post.contains("<div><h1>Hello</h1><br />first words</div>"));
        Ok(())
    }

    #[test]
    fn test_build_site_paginates() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let f = fixture()?;
        let now = SystemTime::now();
        for i in 0..23u64 {
            write_post(
                &f.config.source_directory,
                &format!("post {:02}.txt", i),
                "word",
                now - Duration::from_secs(600 * (i + 1)),
            )?;
        }

        let summary = build_site(&f.config)?;
        assert_eq!(23, summary.posts);
        assert_eq!(3, summary.index_pages);
        assert_eq!(26, summary.files.len());

        let out = &f.config.output_directory;
        let page_3 = fs::read_to_string(out.join("page_3.html"))?;
        assert_eq!(3, page_3.matches("<article>").count());
        assert!(page_3.contains("post_20.html"));
        assert!(page_3.contains("page 3 of 3 | 23 words |"));
        assert_eq!(10, fs::read_to_string(out.join("page_2.html"))?.matches("<article>").count());
        assert!(out.join("post_00.html").is_file());
        Ok(())
    }

    #[test]
    fn test_build_site_with_bundled_template() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let f = fixture()?;
        fs::write(&f.config.template_file, include_str!("../template/template.html"))?;
        let now = SystemTime::now();
        for i in 0..11u64 {
            write_post(
                &f.config.source_directory,
                &format!("post {:02}.txt", i),
                "word",
                now - Duration::from_secs(600 * (i + 1)),
            )?;
        }

        let summary = build_site(&f.config)?;
        assert_eq!(2, summary.index_pages);

        let out = &f.config.output_directory;
        let index = fs::read_to_string(out.join("index.html"))?;
        assert!(index.contains(r#"<a href="post_00.html">post 00</a>"#));
        assert!(index.contains(r#"<a href="page_2.html">Older &raquo;</a>"#));
        assert!(!index.contains("Newer"));

        let page_2 = fs::read_to_string(out.join("page_2.html"))?;
        assert!(page_2.contains(r#"<a href="index.html">&laquo; Newer</a>"#));
        assert!(page_2.contains("Page 2 of 2"));
        assert!(!page_2.contains("Older"));
        Ok(())
    }

    #[test]
    fn test_build_empty_site() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let f = fixture()?;
        let summary = build_site(&f.config)?;
        assert_eq!(0, summary.posts);
        assert_eq!(
            vec!["index.html"],
            sorted_file_names(&f.config.output_directory)?
        );
        let index = fs::read_to_string(f.config.output_directory.join("index.html"))?;
        assert!(index.contains("page 1 of 1 | 0 words | 0.00 KB |"));
        Ok(())
    }

    #[test]
    fn test_build_site_is_rerunnable() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let f = fixture()?;
        write_post(&f.config.source_directory, "a.txt", "one", SystemTime::now())?;
        build_site(&f.config)?;
        fs::write(f.config.source_directory.join("a.txt"), "one two")?;
        build_site(&f.config)?;
        let index = fs::read_to_string(f.config.output_directory.join("index.html"))?;
        assert!(index.contains("(2 words)"));
        Ok(())
    }

    #[test]
    fn test_build_site_missing_template() -> std::io::Result<()> {
        let f = fixture()?;
        fs::remove_file(&f.config.template_file)?;
        match build_site(&f.config) {
            Err(Error::OpenTemplateFile { .. }) => Ok(()),
            other => panic!("wanted OpenTemplateFile error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_site_bad_template() -> std::io::Result<()> {
        let f = fixture()?;
        fs::write(&f.config.template_file, "{{range .posts}}")?;
        match build_site(&f.config) {
            Err(Error::ParseTemplate { .. }) => Ok(()),
            other => panic!("wanted ParseTemplate error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_site_missing_source() -> std::io::Result<()> {
        let f = fixture()?;
        fs::remove_dir(&f.config.source_directory)?;
        match build_site(&f.config) {
            Err(Error::Parse(ParseError::ReadDirectory { .. })) => Ok(()),
            other => panic!("wanted ReadDirectory error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_site_rejects_zero_page_size() -> std::io::Result<()> {
        let mut f = fixture()?;
        f.config.page_size = 0;
        match build_site(&f.config) {
            Err(Error::InvalidPageSize) => Ok(()),
            other => panic!("wanted InvalidPageSize error, got {:?}", other),
        }
    }
}
