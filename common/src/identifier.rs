//! Stable node identifiers, used as variable names in generated source.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// Kind of node an [Identifier] names. Each kind has its own prefix, so
/// identifiers of files and directories never collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeKind {
    /// [crate::node::FileNode].
    File,
    /// [crate::node::DirNode].
    Dir,
}
impl NodeKind {
    /// Prefix used when rendering identifiers of this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Dir => "dir",
        }
    }
}

/// Identifier of a single node, eg. `file12` or `dir3`.
///
/// Numbers come from one [IdentifierGenerator] shared by the whole
/// generation run, so identifiers are unique across all boxes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Identifier {
    kind: NodeKind,
    number: u64,
}
impl Identifier {
    /// Kind of the node.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Sequence number assigned by the generator.
    pub fn number(&self) -> u64 {
        self.number
    }
}
impl fmt::Display for Identifier {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.number)
    }
}

/// Monotonically increasing source of [Identifier]s.
///
/// A single generator must be passed (by reference) to every tree build in a
/// run. Numbers are never reused. Advancing is atomic, so the generator may
/// be shared between threads.
///
/// # Examples
///
/// ```
/// # use static_box_common::identifier::{IdentifierGenerator, NodeKind};
/// let generator = IdentifierGenerator::new();
/// assert_eq!(generator.next(NodeKind::Dir).to_string(), "dir1");
/// assert_eq!(generator.next(NodeKind::File).to_string(), "file2");
/// ```
#[derive(Debug)]
pub struct IdentifierGenerator {
    next: AtomicU64,
}
impl IdentifierGenerator {
    /// Creates generator starting at 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates generator yielding `first` as the first number.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Takes next identifier for node of given `kind`.
    pub fn next(
        &self,
        kind: NodeKind,
    ) -> Identifier {
        let number = self.next.fetch_add(1, Ordering::Relaxed);
        Identifier { kind, number }
    }

    /// Number that will be assigned to the next node.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
impl Default for IdentifierGenerator {
    fn default() -> Self {
        Self::new()
    }
}
