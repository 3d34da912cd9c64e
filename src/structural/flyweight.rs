//! Flyweight: thousands of trees, a handful of shared `TreeKind`s.
//!
//! Intrinsic state (name, colour, texture) lives once behind an `Rc`;
//! each `Tree` only stores its coordinates and a pointer.

use crate::catalog::DemoContext;
use crate::error::Result;
use rand::Rng;
use rustc_hash::FxHashMap;
use std::mem::size_of;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct TreeKind {
    pub name: String,
    pub color: String,
    pub texture: String,
}

impl TreeKind {
    fn heap_bytes(&self) -> usize {
        self.name.capacity() + self.color.capacity() + self.texture.capacity()
    }
}

#[derive(Debug, Default)]
pub struct TreeKindFactory {
    kinds: FxHashMap<(String, String, String), Rc<TreeKind>>,
}

impl TreeKindFactory {
    pub fn get(&mut self, name: &str, color: &str, texture: &str) -> Rc<TreeKind> {
        let key = (name.to_string(), color.to_string(), texture.to_string());
        let kind = self.kinds.entry(key).or_insert_with(|| {
            tracing::debug!(name, color, "new tree kind");
            Rc::new(TreeKind {
                name: name.to_string(),
                color: color.to_string(),
                texture: texture.to_string(),
            })
        });
        Rc::clone(kind)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[derive(Debug)]
pub struct Tree {
    pub x: u32,
    pub y: u32,
    pub kind: Rc<TreeKind>,
}

impl Tree {
    pub fn draw(&self) -> String {
        format!("{} {} tree at ({}, {})", self.kind.color, self.kind.name, self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryReport {
    pub trees: usize,
    pub kinds: usize,
    pub naive_bytes: usize,
    pub shared_bytes: usize,
}

#[derive(Debug, Default)]
pub struct Forest {
    trees: Vec<Tree>,
    factory: TreeKindFactory,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plant(&mut self, x: u32, y: u32, name: &str, color: &str, texture: &str) {
        let kind = self.factory.get(name, color, texture);
        self.trees.push(Tree { x, y, kind });
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn kinds(&self) -> usize {
        self.factory.len()
    }

    /// Rough comparison: every tree owning its strings vs sharing them.
    pub fn memory_report(&self) -> MemoryReport {
        let kind_bytes: usize = self
            .factory
            .kinds
            .values()
            .map(|k| size_of::<TreeKind>() + k.heap_bytes())
            .sum();
        let naive_per_tree = |t: &Tree| 2 * size_of::<u32>() + size_of::<TreeKind>() + t.kind.heap_bytes();

        MemoryReport {
            trees: self.trees.len(),
            kinds: self.kinds(),
            naive_bytes: self.trees.iter().map(naive_per_tree).sum(),
            shared_bytes: self.trees.len() * size_of::<Tree>() + kind_bytes,
        }
    }
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let species = [
        ("oak", "green", "oak_bark.png"),
        ("birch", "white", "birch_bark.png"),
        ("pine", "dark-green", "pine_needles.png"),
        ("maple", "red", "maple_leaf.png"),
    ];

    let mut forest = Forest::new();
    let mut rng = rand::thread_rng();
    for _ in 0..10_000 {
        let (name, color, texture) = species[rng.gen_range(0..species.len())];
        forest.plant(rng.gen_range(0..1_000), rng.gen_range(0..1_000), name, color, texture);
    }

    ctx.section("A few trees");
    for tree in forest.trees().iter().take(3) {
        println!("{}", tree.draw());
    }

    ctx.section("Sharing");
    let report = forest.memory_report();
    println!("{} trees share {} kinds", report.trees, report.kinds);
    println!("Naive: ~{} KB", report.naive_bytes / 1024);
    println!("Flyweight: ~{} KB", report.shared_bytes / 1024);
    if let Some(first) = forest.trees().first() {
        println!("References to '{}' kind: {}", first.kind.name, Rc::strong_count(&first.kind) - 1);
    }

    Ok(())
}
