//! Structural render pass. Contains [Renderer], turning built boxes into
//! source text with content placeholders standing in for file content.
//!
//! Templates are [tera] templates, rendered with the following context:
//! - `package_name` - target package name,
//! - `boxes` - list of boxes, each having `name`, `mod_time`, `root`
//!   (identifier of the root dir), `files` and `dirs`,
//! - file: `identifier`, `path`, `mod_time`, `content` (placeholder, to be
//!   put between double quotes),
//! - dir: `identifier`, `path`, `mod_time`, `child_files` and `child_dirs`
//!   (lists of identifiers).
//!
//! Strings should be printed with the `literal` filter, which quotes and
//! escapes them (including the placeholder reserved character).

use crate::{
    common::{
        PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN, PLACEHOLDER_RESERVED,
        embed_box::EmbedBox,
        node::{DirNode, FileNode},
    },
    error::Error,
    literal,
};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// Default template, producing self contained go source file.
pub const TEMPLATE_DEFAULT: &str = include_str!("templates/box.go.tera");

const TEMPLATE_NAME: &str = "box";

#[derive(Serialize, Debug)]
struct OutputView<'a> {
    package_name: &'a str,
    boxes: Vec<BoxView<'a>>,
}

#[derive(Serialize, Debug)]
struct BoxView<'a> {
    name: &'a str,
    mod_time: i64,
    root: String,
    files: Vec<FileView<'a>>,
    dirs: Vec<DirView<'a>>,
}
impl<'a> BoxView<'a> {
    fn new(embed_box: &'a EmbedBox) -> Self {
        Self {
            name: &embed_box.name,
            mod_time: embed_box.mod_time,
            root: embed_box.root().identifier.to_string(),
            files: embed_box.files().map(FileView::new).collect(),
            dirs: embed_box
                .dirs
                .iter()
                .map(|dir| DirView::new(embed_box, dir))
                .collect(),
        }
    }
}

#[derive(Serialize, Debug)]
struct FileView<'a> {
    identifier: String,
    path: &'a str,
    mod_time: i64,
    content: &'a str,
}
impl<'a> FileView<'a> {
    fn new(file: &'a FileNode) -> Self {
        Self {
            identifier: file.identifier.to_string(),
            path: file.path.as_str(),
            mod_time: file.mod_time,
            content: &file.content_placeholder,
        }
    }
}

#[derive(Serialize, Debug)]
struct DirView<'a> {
    identifier: String,
    path: &'a str,
    mod_time: i64,
    child_files: Vec<String>,
    child_dirs: Vec<String>,
}
impl<'a> DirView<'a> {
    fn new(
        embed_box: &'a EmbedBox,
        dir: &'a DirNode,
    ) -> Self {
        Self {
            identifier: dir.identifier.to_string(),
            path: dir.path.as_str(),
            mod_time: dir.mod_time,
            child_files: dir
                .child_files
                .iter()
                .map(|file| file.identifier.to_string())
                .collect(),
            child_dirs: embed_box
                .child_dirs(dir)
                .map(|child| child.identifier.to_string())
                .collect(),
        }
    }
}

/// Renders boxes into source text using a single template.
///
/// # Examples
///
/// ```
/// # use static_box_packer::render::Renderer;
/// let renderer = Renderer::from_template_str(
///     "package {{ package_name }} // {{ boxes | length }} boxes",
/// )
/// .unwrap();
///
/// assert_eq!(renderer.render("assets", &[]).unwrap(), "package assets // 0 boxes");
/// ```
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
}
impl Renderer {
    /// Creates renderer with [TEMPLATE_DEFAULT].
    pub fn new() -> Result<Self, Error> {
        Self::from_template_str(TEMPLATE_DEFAULT)
    }

    /// Creates renderer with custom template.
    ///
    /// Template text must not contain placeholder delimiters.
    pub fn from_template_str(template: &str) -> Result<Self, Error> {
        for sequence in [PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE] {
            if template.contains(sequence) {
                return Err(Error::TemplateReservedSequence { sequence });
            }
        }

        let mut tera = Tera::default();
        tera.autoescape_on(Vec::new());
        tera.register_filter("literal", literal_filter);
        tera.add_raw_template(TEMPLATE_NAME, template)?;

        Ok(Self { tera })
    }

    /// Renders `boxes` as part of package `package_name`.
    ///
    /// Result contains placeholders instead of file content, see
    /// [crate::fill].
    pub fn render(
        &self,
        package_name: &str,
        boxes: &[EmbedBox],
    ) -> Result<String, Error> {
        if !is_identifier(package_name) {
            return Err(Error::InvalidPackageName {
                name: package_name.to_owned(),
            });
        }

        let view = OutputView {
            package_name,
            boxes: boxes.iter().map(BoxView::new).collect(),
        };
        let context = Context::from_serialize(&view)?;

        let text = self.tera.render(TEMPLATE_NAME, &context)?;
        Ok(text)
    }
}

/// `literal` tera filter, turning a string into a quoted, escaped literal.
fn literal_filter(
    value: &Value,
    _args: &HashMap<String, Value>,
) -> tera::Result<Value> {
    let text = match value {
        Value::String(text) => text,
        other => {
            return Err(tera::Error::msg(format!(
                "filter `literal` expects a string, got {other}"
            )));
        }
    };

    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    quoted.push_str(&literal::escape_to_string(
        text.as_bytes(),
        &[PLACEHOLDER_RESERVED],
    ));
    quoted.push('"');

    Ok(Value::String(quoted))
}

/// Ascii identifier: letter or underscore, followed by letters, digits or
/// underscores.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|char| char.is_ascii_alphanumeric() || char == '_')
}
