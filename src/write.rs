use crate::post::Post;
use crate::site::{index_file_name, Site};
use gtmpl::{Func, Template, Value};
use log::info;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// The values handed to the index template for one index page. These are the
/// only names the template can refer to.
pub struct IndexContext<'a> {
    /// The posts on this page, most recent first.
    pub posts: &'a [Post],

    /// The 1-based number of this page.
    pub page: usize,

    /// The number of index pages.
    pub total_pages: usize,

    /// The word count summed over every post on the site.
    pub total_word_count: usize,

    /// The total size of the post sources, already formatted.
    pub site_size: String,

    /// The time of this run, already formatted.
    pub last_update: String,

    /// The file name of the site icon.
    pub favicon: &'a str,
}

impl IndexContext<'_> {
    /// Converts an [`IndexContext`] into a [`Value`]. The result is a
    /// [`Value::Object`] with fields `posts`, `page`, `total_pages`,
    /// `total_word_count`, `site_size`, `last_update`, and `favicon`.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert(
            "posts".to_owned(),
            Value::Array(self.posts.iter().map(Post::to_value).collect()),
        );
        m.insert("page".to_owned(), Value::from(self.page as u64));
        m.insert("total_pages".to_owned(), Value::from(self.total_pages as u64));
        m.insert(
            "total_word_count".to_owned(),
            Value::from(self.total_word_count as u64),
        );
        m.insert("site_size".to_owned(), Value::from(self.site_size.as_str()));
        m.insert("last_update".to_owned(), Value::from(self.last_update.as_str()));
        m.insert("favicon".to_owned(), Value::from(self.favicon));
        Value::Object(m)
    }
}

/// Renders an index page from its [`IndexContext`].
pub trait Render {
    fn render(&self, context: &IndexContext) -> Result<String>;
}

/// A [`Render`] backed by a Go-style text template (see [`gtmpl`]).
pub struct TemplateRenderer {
    template: Template,
}

impl TemplateRenderer {
    /// Parses `source` into a template. Besides the [`IndexContext`] values,
    /// the template may call `newer_page .page` and
    /// `older_page .page .total_pages`, which yield the file name of the
    /// neighbouring index page, or an empty string where there is none.
    pub fn parse(source: &str) -> Result<TemplateRenderer> {
        let mut template = Template::default();
        template.add_funcs(&[
            ("newer_page", newer_page as Func),
            ("older_page", older_page as Func),
        ]);
        template.parse(source).map_err(Error::Template)?;
        Ok(TemplateRenderer { template })
    }
}

fn newer_page(args: &[Value]) -> std::result::Result<Value, String> {
    let page = page_arg(args, 0)?;
    Ok(Value::from(match page {
        0 | 1 => String::new(),
        n => index_file_name(n - 1),
    }))
}

fn older_page(args: &[Value]) -> std::result::Result<Value, String> {
    let page = page_arg(args, 0)?;
    let total_pages = page_arg(args, 1)?;
    Ok(Value::from(if page < total_pages {
        index_file_name(page + 1)
    } else {
        String::new()
    }))
}

fn page_arg(args: &[Value], i: usize) -> std::result::Result<usize, String> {
    match args.get(i) {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| format!("page number must be a non-negative integer, got {}", n)),
        Some(other) => Err(format!("page number must be a number, got {}", other)),
        None => Err(format!("missing page argument {}", i + 1)),
    }
}

impl Render for TemplateRenderer {
    fn render(&self, context: &IndexContext) -> Result<String> {
        let mut out: Vec<u8> = Vec::new();
        self.template.execute(
            &mut out,
            &gtmpl::Context::from(context.to_value()).map_err(Error::Template)?,
        )?;
        String::from_utf8(out).map_err(|e| Error::Template(e.to_string()))
    }
}

/// Responsible for templating and writing the index and post pages to disk.
pub struct Writer<'a> {
    /// Renders the index pages.
    pub renderer: &'a dyn Render,

    /// The directory in which every page is written. It is created if it
    /// doesn't exist; existing files are overwritten.
    pub output_directory: &'a Path,

    /// The file name of the site icon, linked from every page.
    pub favicon: &'a str,
}

impl Writer<'_> {
    /// Renders every index page of `site` and writes it to disk. Returns the
    /// paths written, in page order.
    pub fn write_index_pages(&self, site: &Site) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(self.output_directory)?;
        let mut written = Vec::with_capacity(site.total_pages());
        for (page, posts) in site.pages() {
            let context = IndexContext {
                posts,
                page,
                total_pages: site.total_pages(),
                total_word_count: site.total_word_count,
                site_size: site.site_size(),
                last_update: site.last_update(),
                favicon: self.favicon,
            };
            let html = self.renderer.render(&context).map_err(|e| {
                Error::Annotated(format!("rendering index page {}", page), Box::new(e))
            })?;
            written.push(self.write_file(&index_file_name(page), &html)?);
        }
        Ok(written)
    }

    /// Writes one standalone page per post. Returns the paths written.
    pub fn write_post_pages(&self, posts: &[Post]) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(self.output_directory)?;
        posts
            .iter()
            .map(|post| self.write_file(&post.file_name(), &post_page(post, self.favicon)))
            .collect()
    }

    fn write_file(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.output_directory.join(file_name);
        std::fs::write(&path, contents).map_err(|e| Error::WriteFile {
            path: path.clone(),
            err: e,
        })?;
        info!("wrote {}", path.display());
        Ok(path)
    }
}

/// Lays out the standalone HTML document for a single post.
pub fn post_page(post: &Post, favicon: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <meta name="viewport" content="width=device-width, initial-scale=1.0">
            <link rel="icon" type="image/x-icon" href="{favicon}">
            <title>{title}</title>
            <style>
                body {{
                    font-family: 'Trebuchet MS', Arial, sans-serif;
                    background-color: #000000;
                    color: #FFFFFF;
                    margin: 0;
                    padding: 0;
                }}
                .container {{
                    width: 800px;
                    margin: 0 auto;
                    padding: 20px;
                    background-color: #1E1E1E;
                }}
                a {{
                    color: #FF0000;
                    text-decoration: none;
                }}
                .footer {{
                    margin-top: 20px;
                    padding: 10px 0;
                    border-top: 1px solid #333;
                    text-align: center;
                }}
            </style>
        </head>
        <body>
            <div class="container">
                <h1>{title}</h1>
                <div>{content}</div>
                <div class="footer">
                    <p><a href="index.html">Home</a></p>
                </div>
            </div>
        </body>
        </html>
        "#,
        favicon = favicon,
        title = post.display_title(),
        content = post.content,
    )
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error parsing or executing a template.
    Template(String),

    /// An error writing an output file.
    WriteFile { path: PathBuf, err: io::Error },

    /// Any other I/O error, e.g. creating the output directory.
    Io(io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::WriteFile { path, err } => {
                write!(f, "Writing '{}': {}", path.display(), err)
            }
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => write!(f, "{}: {}", annotation, err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(_) => None,
            Error::WriteFile { path: _, err } => Some(err),
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}
