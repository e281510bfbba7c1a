//! Main packer executable, to be used as cli tool. For help run this command
//! with `-h`.

#![warn(missing_docs)]

use anyhow::{Context, Error};
use clap::{Args, Parser};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use static_box_packer::{
    format::{CommandFormatter, Formatter, Passthrough},
    generate::{BoxSource, GenerateOptions, Generator},
    render::Renderer,
    tree::BuildOptions,
};
use std::{ffi::OsString, fs, path::PathBuf};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Arguments {
    /// Directory to embed, as `NAME=PATH`. May be repeated. If none are given,
    /// nothing is generated.
    #[arg(long = "box", value_name = "NAME=PATH")]
    pub boxes: Vec<BoxSource>,

    /// Package name of generated source.
    #[arg(long = "package", default_value = "main")]
    pub package_name: String,

    /// Custom template file. If not set, self contained go source is
    /// generated.
    #[arg(long)]
    pub template: Option<PathBuf>,

    #[command(flatten)]
    pub format_options: FormatOptions,

    /// Keep raw filesystem listing order instead of sorting by name.
    #[arg(long)]
    pub no_sort: bool,

    /// Size of file content read buffer, in bytes.
    #[arg(long, default_value_t = static_box_packer::encoder::BUFFER_CAPACITY_DEFAULT)]
    pub buffer_capacity: usize,

    /// Print every included file and directory.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print warnings and errors only.
    #[arg(short, long)]
    pub quiet: bool,

    /// Output source file path.
    pub output_file_path: PathBuf,
}
impl Arguments {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Args, Debug)]
struct FormatOptions {
    /// Program formatting generated source, eg. `gofmt`. Receives path of a
    /// file to format as the last argument and must print the result to
    /// stdout.
    #[arg(long)]
    pub format_command: Option<OsString>,

    /// Argument for format command. May be repeated.
    #[arg(long = "format-arg", requires = "format_command", allow_hyphen_values = true)]
    pub format_args: Vec<OsString>,
}
impl FormatOptions {
    pub fn into_formatter(self) -> Box<dyn Formatter> {
        match self.format_command {
            Some(format_command) => Box::new(CommandFormatter::new(format_command, self.format_args)),
            None => Box::new(Passthrough),
        }
    }
}

fn main() -> Result<(), Error> {
    let arguments = Arguments::parse();

    SimpleLogger::new()
        .with_level(arguments.log_level())
        .init()
        .context("unable to initialize logger")?;

    let renderer = match &arguments.template {
        Some(template) => {
            let template_text = fs::read_to_string(template)
                .with_context(|| format!("unable to read template {}", template.display()))?;
            Renderer::from_template_str(&template_text)
                .with_context(|| format!("invalid template {}", template.display()))?
        }
        None => Renderer::new()?,
    };

    let generate_options = GenerateOptions {
        package_name: arguments.package_name,
        tree: BuildOptions {
            sort_by_name: !arguments.no_sort,
        },
        encoder_buffer_capacity: arguments.buffer_capacity,
    };

    let generator = Generator::with_parts(
        renderer,
        arguments.format_options.into_formatter(),
        generate_options,
    );
    generator
        .generate_file(&arguments.boxes, &arguments.output_file_path)
        .with_context(|| {
            format!(
                "unable to generate {}",
                arguments.output_file_path.display()
            )
        })?;

    Ok(())
}
