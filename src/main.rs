use anyhow::{anyhow, Context, Result};
use clap::{App, Arg, ArgMatches};
use std::path::{Path, PathBuf};
use txtblog::build::build_site;
use txtblog::config::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("txtblog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds a paginated HTML blog from a directory of .txt posts")
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .takes_value(true)
                .value_name("FILE")
                .help("A YAML project file; its paths are relative to the file"),
        )
        .arg(
            Arg::with_name("source")
                .long("source")
                .takes_value(true)
                .value_name("DIR")
                .help("The directory holding the .txt posts [default: ./post/]"),
        )
        .arg(
            Arg::with_name("template")
                .long("template")
                .takes_value(true)
                .value_name("FILE")
                .help("The index page template [default: ./template/template.html]"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .value_name("DIR")
                .help("The directory the pages are written to [default: ./www_html/]"),
        )
        .arg(
            Arg::with_name("favicon")
                .long("favicon")
                .takes_value(true)
                .value_name("NAME")
                .help("The site icon's file name [default: favicon.ico]"),
        )
        .arg(
            Arg::with_name("page-size")
                .long("page-size")
                .takes_value(true)
                .value_name("N")
                .help("Posts per index page [default: 10]"),
        )
        .get_matches();

    let config = config(&matches)?;
    let summary = build_site(&config).context("building site")?;
    log::info!(
        "{} posts, {} index pages, {} files in {}",
        summary.posts,
        summary.index_pages,
        summary.files.len(),
        config.output_directory.display()
    );
    Ok(())
}

// Flags win over the project file, which wins over the defaults.
fn config(matches: &ArgMatches) -> Result<Config> {
    let mut config = match matches.value_of("config") {
        Some(path) => Config::from_project_file(Path::new(path))?,
        None => Config::default(),
    };
    if let Some(dir) = matches.value_of("source") {
        config.source_directory = PathBuf::from(dir);
    }
    if let Some(file) = matches.value_of("template") {
        config.template_file = PathBuf::from(file);
    }
    if let Some(dir) = matches.value_of("output") {
        config.output_directory = PathBuf::from(dir);
    }
    if let Some(favicon) = matches.value_of("favicon") {
        config.favicon = favicon.to_owned();
    }
    if let Some(page_size) = matches.value_of("page-size") {
        config.page_size = page_size
            .parse()
            .map_err(|e| anyhow!("Invalid --page-size `{}`: {}", page_size, e))?;
    }
    config.validate()?;
    Ok(config)
}
