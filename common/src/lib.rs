//! Common crate, containing the box tree model used by
//! [static-box-packer](https://crates.io/crates/static-box-packer).
//!
//! The root type of this crate is [embed_box::EmbedBox]. It's a tree of
//! directories [node::DirNode] owning their files [node::FileNode], each
//! node carrying a path relative to the box root ([box_path::BoxPath]), a
//! modification time and a run-unique [identifier::Identifier] used as a
//! variable name in generated source.

#![allow(clippy::new_without_default)]
#![warn(missing_docs)]

pub mod box_path;
pub mod embed_box;
pub mod identifier;
pub mod node;

/// Opening delimiter of a content placeholder token.
///
/// Token is `PLACEHOLDER_OPEN`, escaped absolute source path,
/// `PLACEHOLDER_CLOSE`. The escaped path never contains `@`, so the first
/// `PLACEHOLDER_CLOSE` after an opening always terminates the token.
pub const PLACEHOLDER_OPEN: &str = "{@";
/// Closing delimiter of a content placeholder token.
pub const PLACEHOLDER_CLOSE: &str = "@}";
/// Character that is always escaped inside placeholder paths and template
/// values, so that delimiters can not be formed by accident.
pub const PLACEHOLDER_RESERVED: u8 = b'@';
