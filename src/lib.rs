//! The library code for the `txtblog` static blog generator. A run turns a
//! directory of plain-text posts into a paginated HTML blog in three steps:
//!
//! 1. Collecting posts from the source directory ([`crate::parser`]), which
//!    converts each file's lightweight markup to HTML ([`crate::markup`]).
//! 2. Aggregating the posts into site-wide totals and index pages
//!    ([`crate::site`]).
//! 3. Rendering the index pages through an external template and one
//!    standalone page per post, and writing them to disk
//!    ([`crate::write`]).
//!
//! [`crate::build::build_site`] runs all three from a
//! [`crate::config::Config`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod markup;
pub mod parser;
pub mod post;
pub mod site;
pub mod write;
