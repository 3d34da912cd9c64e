//! Iterator: three traversals over an n-ary tree.
//!
//! Each traversal is its own iterator type that owns an explicit stack or
//! queue instead of recursing, so it can be paused, resumed, combined with
//! the standard adapters, and `reset()` to walk the same tree again.

use crate::catalog::DemoContext;
use crate::error::Result;
use itertools::Itertools;
use std::collections::VecDeque;
use std::iter::FusedIterator;

#[derive(Debug, Clone, PartialEq)]
pub struct Tree<T> {
    pub value: T,
    pub children: Vec<Tree<T>>,
}

impl<T> Tree<T> {
    pub fn leaf(value: T) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }

    pub fn node(value: T, children: Vec<Tree<T>>) -> Self {
        Self { value, children }
    }

    pub fn push(&mut self, child: Tree<T>) -> &mut Self {
        self.children.push(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pre_order().count()
    }

    /// Number of levels; a lone leaf has height 1.
    pub fn height(&self) -> usize {
        self.depth_first_with_depth()
            .map(|(depth, _)| depth + 1)
            .max()
            .unwrap_or(1)
    }

    pub fn pre_order(&self) -> PreOrder<'_, T> {
        PreOrder {
            root: self,
            stack: vec![self],
        }
    }

    pub fn post_order(&self) -> PostOrder<'_, T> {
        PostOrder {
            root: self,
            stack: vec![(self, 0)],
        }
    }

    pub fn level_order(&self) -> LevelOrder<'_, T> {
        LevelOrder {
            root: self,
            queue: VecDeque::from([self]),
        }
    }

    pub fn depth_first_with_depth(&self) -> WithDepth<'_, T> {
        WithDepth {
            root: self,
            stack: vec![(0, self)],
        }
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = PreOrder<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.pre_order()
    }
}

/// Node, then each child subtree left to right.
pub struct PreOrder<'a, T> {
    root: &'a Tree<T>,
    stack: Vec<&'a Tree<T>>,
}

impl<T> PreOrder<'_, T> {
    pub fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(self.root);
    }
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.stack.pop()?;
        // Reversed so the leftmost child is popped first.
        self.stack.extend(node.children.iter().rev());
        Some(&node.value)
    }
}

impl<T> FusedIterator for PreOrder<'_, T> {}

/// Every child subtree left to right, then the node.
pub struct PostOrder<'a, T> {
    root: &'a Tree<T>,
    // (node, index of the next child to descend into)
    stack: Vec<(&'a Tree<T>, usize)>,
}

impl<T> PostOrder<'_, T> {
    pub fn reset(&mut self) {
        self.stack.clear();
        self.stack.push((self.root, 0));
    }
}

impl<'a, T> Iterator for PostOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let (node, next_child) = self.stack.last_mut()?;
            let node: &'a Tree<T> = *node;
            if let Some(child) = node.children.get(*next_child) {
                *next_child += 1;
                self.stack.push((child, 0));
            } else {
                self.stack.pop();
                return Some(&node.value);
            }
        }
    }
}

impl<T> FusedIterator for PostOrder<'_, T> {}

/// Breadth-first: the root, then all of depth 1, then depth 2, ...
pub struct LevelOrder<'a, T> {
    root: &'a Tree<T>,
    queue: VecDeque<&'a Tree<T>>,
}

impl<T> LevelOrder<'_, T> {
    pub fn reset(&mut self) {
        self.queue.clear();
        self.queue.push_back(self.root);
    }
}

impl<'a, T> Iterator for LevelOrder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children.iter());
        Some(&node.value)
    }
}

impl<T> FusedIterator for LevelOrder<'_, T> {}

/// Pre-order with the depth of each node; the root is depth 0.
pub struct WithDepth<'a, T> {
    root: &'a Tree<T>,
    stack: Vec<(usize, &'a Tree<T>)>,
}

impl<T> WithDepth<'_, T> {
    pub fn reset(&mut self) {
        self.stack.clear();
        self.stack.push((0, self.root));
    }
}

impl<'a, T> Iterator for WithDepth<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, &node.value))
    }
}

/// ```text
///            CEO
///       /     |      \
///     CTO    CFO     COO
///    /   \    |
///  Dev   Ops  Acct
/// ```
pub fn org_chart() -> Tree<&'static str> {
    Tree::node(
        "CEO",
        vec![
            Tree::node("CTO", vec![Tree::leaf("Dev"), Tree::leaf("Ops")]),
            Tree::node("CFO", vec![Tree::leaf("Acct")]),
            Tree::leaf("COO"),
        ],
    )
}

pub fn demo(ctx: &DemoContext) -> Result<()> {
    let tree = org_chart();

    ctx.section("Traversals");
    println!("pre-order:   {}", tree.pre_order().join(" "));
    println!("post-order:  {}", tree.post_order().join(" "));
    println!("level-order: {}", tree.level_order().join(" "));
    println!("nodes: {}, height: {}", tree.len(), tree.height());

    ctx.section("Indented with depth");
    for (depth, name) in tree.depth_first_with_depth() {
        println!("{}{}", "  ".repeat(depth), name);
    }

    ctx.section("Pausing and resetting one iterator");
    let mut walk = tree.level_order();
    let first_two: Vec<_> = walk.by_ref().take(2).collect();
    println!("first two: {first_two:?}");
    println!("next one:  {:?}", walk.next());
    walk.reset();
    println!("after reset, whole walk: {}", walk.join(" "));

    ctx.section("Standard adapters still work");
    let managers: Vec<_> = tree
        .pre_order()
        .filter(|name| name.starts_with('C'))
        .collect();
    println!("C-level (pre-order): {managers:?}");
    let total: usize = (&tree).into_iter().map(|name| name.len()).sum();
    println!("total characters in names: {total}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_order() {
        let tree = org_chart();
        let order: Vec<_> = tree.pre_order().copied().collect();
        assert_eq!(order, ["CEO", "CTO", "Dev", "Ops", "CFO", "Acct", "COO"]);
    }

    #[test]
    fn test_post_order() {
        let tree = org_chart();
        let order: Vec<_> = tree.post_order().copied().collect();
        assert_eq!(order, ["Dev", "Ops", "CTO", "Acct", "CFO", "COO", "CEO"]);
    }

    #[test]
    fn test_level_order() {
        let tree = org_chart();
        let order: Vec<_> = tree.level_order().copied().collect();
        assert_eq!(order, ["CEO", "CTO", "CFO", "COO", "Dev", "Ops", "Acct"]);
    }

    #[test]
    fn test_single_leaf() {
        let tree = Tree::leaf(7);
        assert_eq!(tree.pre_order().collect::<Vec<_>>(), [&7]);
        assert_eq!(tree.post_order().collect::<Vec<_>>(), [&7]);
        assert_eq!(tree.level_order().collect::<Vec<_>>(), [&7]);
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn test_reset_restarts_from_root() {
        let tree = org_chart();
        let mut walk = tree.post_order();
        assert_eq!(walk.next(), Some(&"Dev"));
        assert_eq!(walk.next(), Some(&"Ops"));
        walk.reset();
        assert_eq!(walk.count(), 7);

        let mut pre = tree.pre_order();
        pre.by_ref().for_each(drop);
        assert_eq!(pre.next(), None);
        pre.reset();
        assert_eq!(pre.next(), Some(&"CEO"));
    }

    #[test]
    fn test_depth() {
        let tree = org_chart();
        let depths: Vec<_> = tree.depth_first_with_depth().map(|(d, _)| d).collect();
        assert_eq!(depths, [0, 1, 2, 2, 1, 2, 1]);
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let mut tree = Tree::leaf(0u32);
        for i in 1..50_000 {
            tree = Tree::node(i, vec![tree]);
        }
        assert_eq!(tree.post_order().count(), 50_000);
        assert_eq!(tree.level_order().last(), Some(&0));
        assert_eq!(tree.len(), 50_000);
        assert_eq!(tree.height(), 50_000);
        // Dropping a 50k-deep tree recurses; leak it instead.
        std::mem::forget(tree);
    }

    #[test]
    fn test_push_builds_incrementally() {
        let mut tree = Tree::leaf("root");
        tree.push(Tree::leaf("a")).push(Tree::leaf("b"));
        assert!(!tree.is_leaf());
        assert_eq!(tree.level_order().copied().collect::<Vec<_>>(), ["root", "a", "b"]);
    }
}
