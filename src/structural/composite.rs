//! Composite: files and directories answer the same questions.
//!
//! An enum is the natural composite in Rust: the leaf/branch split is
//! closed, and every operation is a recursive `match`.

use crate::catalog::DemoContext;
use crate::error::{PatternError, Result};
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq)]
pub enum FsNode {
    File { name: String, size: u64 },
    Directory { name: String, children: Vec<FsNode> },
}

impl FsNode {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        FsNode::File { name: name.into(), size }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        FsNode::Directory {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Builder-style helper for literals in tests and demos.
    pub fn with(mut self, child: FsNode) -> Self {
        if let FsNode::Directory { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            FsNode::File { name, .. } | FsNode::Directory { name, .. } => name,
        }
    }

    pub fn add(&mut self, child: FsNode) -> Result<()> {
        match self {
            FsNode::Directory { children, .. } => {
                children.push(child);
                Ok(())
            }
            FsNode::File { name, .. } => Err(PatternError::Validation(format!(
                "cannot add '{}' to file '{}'",
                child.name(),
                name
            ))),
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            FsNode::File { size, .. } => *size,
            FsNode::Directory { children, .. } => children.iter().map(FsNode::size).sum(),
        }
    }

    pub fn file_count(&self) -> usize {
        match self {
            FsNode::File { .. } => 1,
            FsNode::Directory { children, .. } => children.iter().map(FsNode::file_count).sum(),
        }
    }

    /// Depth-first search by name, the node itself included.
    pub fn find(&self, wanted: &str) -> Option<&FsNode> {
        if self.name() == wanted {
            return Some(self);
        }
        match self {
            FsNode::File { .. } => None,
            FsNode::Directory { children, .. } => children.iter().find_map(|c| c.find(wanted)),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match self {
            FsNode::File { name, size } => {
                let _ = writeln!(out, "{indent}{name} ({size} B)");
            }
            FsNode::Directory { name, children } => {
                let _ = writeln!(out, "{indent}{name}/ ({} B)", self.size());
                for child in children {
                    child.render_into(out, depth + 1);
                }
            }
        }
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let mut root = FsNode::dir("project")
        .with(FsNode::file("Cargo.toml", 820))
        .with(
            FsNode::dir("src")
                .with(FsNode::file("main.rs", 2_048))
                .with(FsNode::file("lib.rs", 4_096))
                .with(FsNode::dir("bin").with(FsNode::file("tool.rs", 512))),
        )
        .with(FsNode::dir("docs"));

    root.add(FsNode::file("README.md", 1_500))?;

    ctx.section("Tree");
    print!("{}", root.render());

    ctx.section("Uniform queries");
    println!("Total size: {} B", root.size());
    println!("Files: {}", root.file_count());
    if let Some(src) = root.find("src") {
        println!("src/ alone: {} B in {} file(s)", src.size(), src.file_count());
    }
    println!("Empty docs/ size: {} B", root.find("docs").map_or(0, FsNode::size));

    let mut leaf = FsNode::file("notes.txt", 10);
    if let Err(err) = leaf.add(FsNode::file("oops", 1)) {
        println!("Leaf refuses children: {err}");
    }

    Ok(())
}
