//! Generation pipeline. Contains [Generator], running all stages for a list
//! of [BoxSource]s: tree build, render, format, fill and flush.

use crate::{
    common::{embed_box::EmbedBox, identifier::IdentifierGenerator},
    encoder::{BUFFER_CAPACITY_DEFAULT, BUFFER_CAPACITY_MIN, StreamEncoder},
    error::Error,
    fill::{FsContentSource, fill},
    format::{Formatter, Passthrough},
    output::{Sink, store_file},
    render::Renderer,
    tree::{self, BuildOptions},
};
use std::{
    fmt,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Directory to be embedded under a logical name.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BoxSource {
    /// Name under which the box is registered.
    pub name: String,
    /// Root directory.
    pub path: PathBuf,
}
impl BoxSource {
    /// Creates box source named `name` from directory at `path`.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Error returned when [BoxSource] can not be parsed from `NAME=PATH`.
#[derive(thiserror::Error, Debug)]
#[error("expected NAME=PATH with non-empty name and path, got {0:?}")]
pub struct BoxSourceParseError(String);

impl FromStr for BoxSource {
    type Err = BoxSourceParseError;

    /// Parses `NAME=PATH`. Name is everything up to the first `=`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once('=') {
            Some((name, path)) if !name.is_empty() && !path.is_empty() => {
                Ok(Self::new(name, path))
            }
            _ => Err(BoxSourceParseError(value.to_owned())),
        }
    }
}

/// Settings for [Generator].
///
/// If not sure what to set here, use [Default].
#[derive(Clone, Debug)]
pub struct GenerateOptions {
    /// Package name of generated source.
    pub package_name: String,
    /// Settings for building box trees.
    pub tree: BuildOptions,
    /// Size of the streaming encoder buffer. Values below
    /// [BUFFER_CAPACITY_MIN] are raised to it.
    pub encoder_buffer_capacity: usize,
}
impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            package_name: "main".to_owned(),
            tree: BuildOptions::default(),
            encoder_buffer_capacity: BUFFER_CAPACITY_DEFAULT,
        }
    }
}

/// Summary of a successful generation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Report {
    /// Number of boxes embedded.
    pub boxes: usize,
    /// Number of directories, including box roots.
    pub dirs: usize,
    /// Number of files.
    pub files: usize,
    /// Bytes of escaped file content written.
    pub content_bytes: u64,
    /// Total bytes written.
    pub output_bytes: u64,
}
impl fmt::Display for Report {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} box(es), {} dir(s), {} file(s), {} bytes of content, {} bytes total",
            self.boxes, self.dirs, self.files, self.content_bytes, self.output_bytes
        )
    }
}

/// Runs generation pipeline.
///
/// # Examples
///
/// ```no_run
/// # use static_box_packer::generate::{BoxSource, GenerateOptions, Generator};
/// # use std::path::Path;
/// #
/// # fn main() -> Result<(), static_box_packer::error::Error> {
/// let generator = Generator::new(GenerateOptions::default())?;
/// let report = generator.generate_file(
///     &[BoxSource::new("templates", "./templates")],
///     Path::new("./static-box.go"),
/// )?;
/// if let Some(report) = report {
///     println!("{report}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct Generator {
    renderer: Renderer,
    formatter: Box<dyn Formatter>,
    options: GenerateOptions,
}
impl Generator {
    /// Creates generator with default template and no formatting.
    pub fn new(options: GenerateOptions) -> Result<Self, Error> {
        Ok(Self::with_parts(Renderer::new()?, Box::new(Passthrough), options))
    }

    /// Creates generator using given `renderer` and `formatter`.
    pub fn with_parts(
        renderer: Renderer,
        formatter: Box<dyn Formatter>,
        options: GenerateOptions,
    ) -> Self {
        Self {
            renderer,
            formatter,
            options,
        }
    }

    /// Builds trees of all `sources`, one after another, sharing a single
    /// identifier generator.
    pub fn build(
        &self,
        sources: &[BoxSource],
    ) -> Result<Vec<EmbedBox>, Error> {
        let identifier_generator = IdentifierGenerator::new();

        sources
            .iter()
            .map(|source| {
                tree::build(
                    &source.name,
                    &source.path,
                    &identifier_generator,
                    &self.options.tree,
                )
            })
            .collect()
    }

    /// Generates source embedding all `sources` into `writer`.
    ///
    /// Everything is flushed before returning. On error, part of the output
    /// may have already been written, caller should discard it.
    pub fn generate<W: Write>(
        &self,
        sources: &[BoxSource],
        writer: W,
    ) -> Result<(W, Report), Error> {
        let mut sink = Sink::new(writer);
        let mut report = self.generate_into(sources, &mut sink)?;
        let (writer, output_bytes) = sink.finish()?;
        report.output_bytes = output_bytes;

        log::info!("generated {report}");

        Ok((writer, report))
    }

    /// Generates source embedding all `sources` into file at `path`.
    ///
    /// File is replaced atomically, on error it is left untouched. If
    /// `sources` is empty, nothing is generated, no file is written and
    /// `None` is returned.
    pub fn generate_file(
        &self,
        sources: &[BoxSource],
        path: &Path,
    ) -> Result<Option<Report>, Error> {
        if sources.is_empty() {
            log::info!("no boxes requested, nothing to generate");
            return Ok(None);
        }

        let (mut report, output_bytes) = store_file(path, |sink| self.generate_into(sources, sink))?;
        report.output_bytes = output_bytes;

        log::info!("generated {report} into {}", path.display());

        Ok(Some(report))
    }

    fn generate_into<W: Write>(
        &self,
        sources: &[BoxSource],
        sink: &mut Sink<W>,
    ) -> Result<Report, Error> {
        let boxes = self.build(sources)?;

        let text = self.renderer.render(&self.options.package_name, &boxes)?;
        let text = self.formatter.format(text)?;

        let mut encoder = StreamEncoder::with_capacity(
            self.options
                .encoder_buffer_capacity
                .max(BUFFER_CAPACITY_MIN),
        );
        let summary = fill(text.as_bytes(), &mut FsContentSource, &mut encoder, sink)?;

        Ok(Report {
            boxes: boxes.len(),
            dirs: boxes.iter().map(|embed_box| embed_box.dirs.len()).sum(),
            files: boxes.iter().map(EmbedBox::files_count).sum(),
            content_bytes: summary.content_bytes,
            output_bytes: 0,
        })
    }
}
