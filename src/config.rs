use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The directory holding the `.txt` post sources.
pub const DEFAULT_SOURCE_DIRECTORY: &str = "./post/";

/// The index page template.
pub const DEFAULT_TEMPLATE_FILE: &str = "./template/template.html";

/// The directory into which every page is written.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "./www_html/";

/// The site icon's file name. Only referenced, never generated.
pub const DEFAULT_FAVICON: &str = "favicon.ico";

/// The number of posts per index page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Everything a run needs to know. [`Config::default`] reproduces the
/// generator's fixed layout; [`Config::from_project_file`] and the
/// command-line flags override parts of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub source_directory: PathBuf,
    pub template_file: PathBuf,
    pub output_directory: PathBuf,
    pub favicon: String,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_directory: PathBuf::from(DEFAULT_SOURCE_DIRECTORY),
            template_file: PathBuf::from(DEFAULT_TEMPLATE_FILE),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            favicon: DEFAULT_FAVICON.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// Every key is optional; absent keys keep the default.
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct Project {
    source_directory: Option<PathBuf>,
    template_file: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    favicon: Option<String>,
    page_size: Option<usize>,
}

impl Config {
    /// Loads a YAML project file, e.g.:
    ///
    /// ```yaml
    /// source_directory: posts
    /// output_directory: public
    /// page_size: 5
    /// ```
    ///
    /// Relative paths in the file are resolved against the file's own
    /// directory. Keys left out keep their defaults, which stay relative to
    /// the working directory.
    pub fn from_project_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Opening project file `{}`: {}", path.display(), e))?;
        let project: Project = if contents.trim().is_empty() {
            Project::default()
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| anyhow!("Loading configuration `{}`: {}", path.display(), e))?
        };
        let root = path.parent().unwrap_or_else(|| Path::new(""));
        Config::default().merge(project, root)
    }

    /// Replaces the fields set in `project`, resolving relative paths
    /// against `root`.
    fn merge(mut self, project: Project, root: &Path) -> Result<Config> {
        if let Some(dir) = project.source_directory {
            self.source_directory = root.join(dir);
        }
        if let Some(file) = project.template_file {
            self.template_file = root.join(file);
        }
        if let Some(dir) = project.output_directory {
            self.output_directory = root.join(dir);
        }
        if let Some(favicon) = project.favicon {
            self.favicon = favicon;
        }
        if let Some(page_size) = project.page_size {
            self.page_size = page_size;
        }
        self.validate()?;
        Ok(self)
    }

    /// Checks the settings that would otherwise fail in the middle of a run.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(anyhow!("`page_size` must be at least 1"));
        }
        Ok(())
    }
}
