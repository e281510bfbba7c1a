//! Helpers for integration tests: fixture locations, generation into memory
//! and a reader for source produced by the default template.

#![doc(hidden)]

use anyhow::{Context, Error, anyhow, bail, ensure};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use static_box_packer::{
    generate::{BoxSource, GenerateOptions, Generator},
    literal::unquote,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
    sync::Once,
};
use walkdir::WalkDir;

// data/sample-box, checked in fixture tree
pub fn sample_box_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("sample-box")
}

// debug traces of the packer, shown for failing tests
pub fn logger_init() {
    static LOGGER: Once = Once::new();
    LOGGER.call_once(|| {
        // another logger may already be installed by the test harness
        let _ = SimpleLogger::new().with_level(LevelFilter::Debug).init();
    });
}

// runs whole pipeline with default template, returning generated source
pub fn generate(
    sources: &[BoxSource],
    options: GenerateOptions,
) -> Result<String, Error> {
    logger_init();

    let generator = Generator::new(options)?;
    let (output, _report) = generator.generate(sources, Vec::new())?;
    let text = String::from_utf8(output).context("generated source is not utf-8")?;
    Ok(text)
}

// files below `root`, by forward slash relative path
pub fn fixture_files(root: &Path) -> Result<BTreeMap<String, Vec<u8>>, Error> {
    let mut files = BTreeMap::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        files.insert(relative_path(root, entry.path())?, fs::read(entry.path())?);
    }
    Ok(files)
}

// directories below `root` (including root itself as ""), by forward slash
// relative path
pub fn fixture_dirs(root: &Path) -> Result<BTreeSet<String>, Error> {
    let mut dirs = BTreeSet::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        dirs.insert(relative_path(root, entry.path())?);
    }
    Ok(dirs)
}

fn relative_path(
    root: &Path,
    path: &Path,
) -> Result<String, Error> {
    let relative = path.strip_prefix(root)?;
    let segments = relative
        .components()
        .map(|component| {
            component
                .as_os_str()
                .to_str()
                .ok_or_else(|| anyhow!("non utf-8 path {}", path.display()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(segments.join("/"))
}

#[derive(Default, Debug)]
pub struct ParsedFile {
    pub identifier: String,
    pub mod_time: i64,
    // content literal as written, without quotes
    pub literal: String,
    pub content: Vec<u8>,
}

#[derive(Default, Debug)]
pub struct ParsedDir {
    pub identifier: String,
    pub mod_time: i64,
    pub child_files: Vec<String>,
    pub child_dirs: Vec<String>,
}

#[derive(Default, Debug)]
pub struct ParsedBox {
    pub name: String,
    pub mod_time: i64,
    pub files: BTreeMap<String, ParsedFile>,
    pub dirs: BTreeMap<String, ParsedDir>,
}
impl ParsedBox {
    pub fn dir_by_identifier(
        &self,
        identifier: &str,
    ) -> Option<(&String, &ParsedDir)> {
        self.dirs.iter().find(|(_, dir)| dir.identifier == identifier)
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.files
            .values()
            .map(|file| file.identifier.as_str())
            .chain(self.dirs.values().map(|dir| dir.identifier.as_str()))
    }
}

enum Block {
    None,
    File {
        path: Option<String>,
        file: ParsedFile,
    },
    Dir {
        path: Option<String>,
        dir: ParsedDir,
    },
    Link {
        identifier: String,
        child_dirs: Vec<String>,
    },
    Register,
}

// reads boxes back from source generated with the default template
pub fn parse(text: &str) -> Result<Vec<ParsedBox>, Error> {
    let mut boxes = Vec::<ParsedBox>::new();
    let mut block = Block::None;

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        let context = || format!("line {}: {line:?}", index + 1);

        if line == "func init() {" {
            boxes.push(ParsedBox::default());
            continue;
        }
        let parsed_box = match boxes.last_mut() {
            Some(parsed_box) => parsed_box,
            None => continue,
        };

        block = match block {
            Block::None => {
                if let Some(identifier) = line.strip_suffix(" := &EmbeddedFile{") {
                    Block::File {
                        path: None,
                        file: ParsedFile {
                            identifier: identifier.to_owned(),
                            ..ParsedFile::default()
                        },
                    }
                } else if let Some(identifier) = line.strip_suffix(" := &EmbeddedDir{") {
                    Block::Dir {
                        path: None,
                        dir: ParsedDir {
                            identifier: identifier.to_owned(),
                            ..ParsedDir::default()
                        },
                    }
                } else if let Some(identifier) = line.strip_suffix(".ChildDirs = []*EmbeddedDir{") {
                    Block::Link {
                        identifier: identifier.to_owned(),
                        child_dirs: Vec::new(),
                    }
                } else if line.starts_with("EmbeddedBoxes[") {
                    Block::Register
                } else {
                    Block::None
                }
            }
            Block::File { path, mut file } => {
                if line == "}" {
                    let path = path.ok_or_else(|| anyhow!("file without name")).with_context(context)?;
                    parsed_box.files.insert(path, file);
                    Block::None
                } else if let Some(value) = field(line, "Filename") {
                    Block::File {
                        path: Some(string(value).with_context(context)?),
                        file,
                    }
                } else if let Some(value) = field(line, "FileModTime") {
                    file.mod_time = unix(value).with_context(context)?;
                    Block::File { path, file }
                } else if let Some(value) = field(line, "Content") {
                    let literal = unquoted(value).with_context(context)?;
                    file.content = unquote(literal).with_context(context)?;
                    file.literal = literal.to_owned();
                    Block::File { path, file }
                } else {
                    bail!("unexpected file field, {}", context());
                }
            }
            Block::Dir { path, mut dir } => {
                if line == "}" {
                    let path = path.ok_or_else(|| anyhow!("dir without name")).with_context(context)?;
                    parsed_box.dirs.insert(path, dir);
                    Block::None
                } else if let Some(value) = field(line, "Filename") {
                    Block::Dir {
                        path: Some(string(value).with_context(context)?),
                        dir,
                    }
                } else if let Some(value) = field(line, "DirModTime") {
                    dir.mod_time = unix(value).with_context(context)?;
                    Block::Dir { path, dir }
                } else if let Some(child) = line.strip_suffix(',').filter(|child| child.starts_with("file")) {
                    dir.child_files.push(child.to_owned());
                    Block::Dir { path, dir }
                } else {
                    // `ChildFiles: []*EmbeddedFile{` and its closing brace
                    Block::Dir { path, dir }
                }
            }
            Block::Link {
                identifier,
                mut child_dirs,
            } => {
                if line == "}" {
                    let dir = parsed_box
                        .dirs
                        .values_mut()
                        .find(|dir| dir.identifier == identifier)
                        .ok_or_else(|| anyhow!("children linked to unknown dir {identifier}"))
                        .with_context(context)?;
                    dir.child_dirs = child_dirs;
                    Block::None
                } else {
                    let child = line
                        .strip_suffix(',')
                        .ok_or_else(|| anyhow!("expected child identifier"))
                        .with_context(context)?;
                    child_dirs.push(child.to_owned());
                    Block::Link {
                        identifier,
                        child_dirs,
                    }
                }
            }
            Block::Register => {
                if line == "}" {
                    Block::None
                } else {
                    if let Some(value) = field(line, "Name") {
                        parsed_box.name = string(value).with_context(context)?;
                    } else if let Some(value) = field(line, "Time") {
                        parsed_box.mod_time = unix(value).with_context(context)?;
                    }
                    Block::Register
                }
            }
        };
    }

    ensure!(matches!(block, Block::None), "source ends inside a block");
    Ok(boxes)
}

// `Name:   value,` -> `value`
fn field<'a>(
    line: &'a str,
    name: &str,
) -> Option<&'a str> {
    let value = line.strip_prefix(name)?.strip_prefix(':')?;
    value.trim_start().strip_suffix(',')
}

fn unquoted(value: &str) -> Result<&str, Error> {
    value
        .strip_prefix('"')
        .and_then(|value| value.strip_suffix('"'))
        .ok_or_else(|| anyhow!("expected quoted literal, got {value:?}"))
}

fn string(value: &str) -> Result<String, Error> {
    let content = unquote(unquoted(value)?)?;
    let string = String::from_utf8(content)?;
    Ok(string)
}

// `time.Unix(123, 0)` -> 123
fn unix(value: &str) -> Result<i64, Error> {
    let seconds = value
        .strip_prefix("time.Unix(")
        .and_then(|value| value.strip_suffix(", 0)"))
        .ok_or_else(|| anyhow!("expected time.Unix(..), got {value:?}"))?;
    Ok(seconds.parse()?)
}
