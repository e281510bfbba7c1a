//! static-box-packer generates a single source file embedding one or more
//! directory trees ("boxes"), so a program can read their files at runtime
//! without the files being present on disk.
//!
//! The generated file contains, for each box, every directory and file as a
//! named entry carrying its path relative to the box root and its
//! modification time. File content is written as a string literal, escaped
//! with the go interpreted string literal grammar, so parsing the literal
//! gives the original bytes back, whatever they are.
//!
//! This crate is usually used in build script / CI stage, not in your target
//! application. It can be used as a standalone application or as a library.
//!
//! # How it works
//!
//! Generation runs as a sequential pipeline:
//! 1. Every box root is walked into an [common::embed_box::EmbedBox] by
//!    [tree::build]. All boxes share one
//!    [common::identifier::IdentifierGenerator], so entry names (`file12`,
//!    `dir3`) are unique within the whole output. No file content is read
//!    here, files get a placeholder token ([placeholder::emit]) instead.
//! 2. Boxes are rendered into source text with a template by
//!    [render::Renderer]. The text still holds placeholders.
//! 3. Text is optionally passed through an external formatter
//!    ([format::CommandFormatter]).
//! 4. Text is copied to the output by [fill::fill], each placeholder being
//!    replaced by the content of its file, streamed through
//!    [encoder::StreamEncoder] using a fixed size buffer. Files are opened one
//!    at a time, so memory usage does not depend on file sizes.
//! 5. Output is flushed and atomically moved into place
//!    ([output::store_file]).
//!
//! # Using as a standalone application
//!
//! ```text
//! $ static-box-packer \
//!     --box templates=./templates \
//!     --box public=./public \
//!     --package main \
//!     --format-command gofmt \
//!     ./static-box.go
//! ```
//! will create `static-box.go`, registering two boxes in `EmbeddedBoxes` map.
//! Run with `--help` for all options.
//!
//! # Using as a library
//!
//! ```no_run
//! # use anyhow::Error;
//! # use std::path::Path;
//! # use static_box_packer::generate::{BoxSource, GenerateOptions, Generator};
//! #
//! # fn main() -> Result<(), Error> {
//! let generator = Generator::new(GenerateOptions::default())?;
//! generator.generate_file(
//!     &[BoxSource::new("templates", "./templates")],
//!     Path::new("./static-box.go"),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! For other output languages, provide own template with
//! [render::Renderer::from_template_str].

#![allow(clippy::new_without_default)]
#![warn(missing_docs)]

pub use static_box_common as common;

pub mod box_path;
pub mod encoder;
pub mod error;
pub mod fill;
pub mod format;
pub mod generate;
pub mod literal;
pub mod output;
pub mod placeholder;
pub mod render;
pub mod tree;
