// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Red-black tree of row-ids
//!
//! The tree stores bare row-ids; ordering is decided by a caller-supplied
//! comparison that looks the rows up elsewhere. Nodes live in a single pool
//! and link to each other by `u32` index. Duplicate keys are kept, and a key
//! equal to existing keys is placed after them, so traversal preserves
//! insertion order among equals.

use std::cmp::Ordering;
use std::mem::size_of;

use crate::core::{Error, Result, RowId};

/// Index value meaning "no node"
const NIL: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    row_id: RowId,
    left: u32,
    right: u32,
    parent: u32,
    color: Color,
}

/// Pool-backed red-black tree holding row-ids
#[derive(Debug)]
pub struct RowIdTree {
    nodes: Vec<Node>,
    root: u32,
}

impl Default for RowIdTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RowIdTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NIL,
        }
    }

    /// Create an empty tree with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(capacity).map_err(|_| {
            Error::out_of_memory("order index nodes", capacity.saturating_mul(size_of::<Node>()))
        })?;
        Ok(Self { nodes, root: NIL })
    }

    /// Number of keys in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert `row_id`, locating its place with `cmp`
    ///
    /// `cmp(existing)` orders the new key against an existing one. `Less`
    /// descends left, anything else descends right. An error from `cmp`
    /// aborts the insert with the tree unchanged.
    pub fn insert_by<F>(&mut self, row_id: RowId, mut cmp: F) -> Result<()>
    where
        F: FnMut(RowId) -> Result<Ordering>,
    {
        let mut parent = NIL;
        let mut cur = self.root;
        let mut go_left = false;
        while cur != NIL {
            parent = cur;
            let node = &self.nodes[cur as usize];
            go_left = cmp(node.row_id)? == Ordering::Less;
            cur = if go_left { node.left } else { node.right };
        }

        let idx = self.alloc(row_id, parent)?;
        if parent == NIL {
            self.root = idx;
        } else if go_left {
            self.nodes[parent as usize].left = idx;
        } else {
            self.nodes[parent as usize].right = idx;
        }
        self.fix_insert(idx);
        Ok(())
    }

    /// In-order traversal of the row-ids
    pub fn iter(&self) -> RowIdTreeIter<'_> {
        let start = if self.root == NIL {
            NIL
        } else {
            self.leftmost(self.root)
        };
        RowIdTreeIter {
            tree: self,
            cursor: start,
        }
    }

    /// Remove every key, keeping the node pool's capacity
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = NIL;
    }

    /// Remove every key and release the node pool
    pub fn close(&mut self) {
        self.nodes = Vec::new();
        self.root = NIL;
    }

    fn alloc(&mut self, row_id: RowId, parent: u32) -> Result<u32> {
        if self.nodes.len() >= NIL as usize {
            return Err(Error::out_of_memory("order index nodes", size_of::<Node>()));
        }
        if self.nodes.len() == self.nodes.capacity() {
            let additional = self.nodes.len().max(16);
            self.nodes.try_reserve(additional).map_err(|_| {
                Error::out_of_memory(
                    "order index nodes",
                    additional.saturating_mul(size_of::<Node>()),
                )
            })?;
        }
        let idx = self.nodes.len() as u32;
        self.nodes.push(Node {
            row_id,
            left: NIL,
            right: NIL,
            parent,
            color: Color::Red,
        });
        Ok(idx)
    }

    #[inline]
    fn color(&self, n: u32) -> Color {
        if n == NIL {
            Color::Black
        } else {
            self.nodes[n as usize].color
        }
    }

    #[inline]
    fn parent(&self, n: u32) -> u32 {
        self.nodes[n as usize].parent
    }

    #[inline]
    fn set_color(&mut self, n: u32, color: Color) {
        self.nodes[n as usize].color = color;
    }

    fn fix_insert(&mut self, mut z: u32) {
        while self.color(self.parent(z)) == Color::Red {
            let p = self.parent(z);
            // a red parent is never the root, so the grandparent exists
            let g = self.parent(p);
            if p == self.nodes[g as usize].left {
                let uncle = self.nodes[g as usize].right;
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.nodes[p as usize].right {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.nodes[g as usize].left;
                if self.color(uncle) == Color::Red {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.nodes[p as usize].left {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_left(g);
                }
            }
            if z == self.root {
                break;
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    fn rotate_left(&mut self, x: u32) {
        let y = self.nodes[x as usize].right;
        let y_left = self.nodes[y as usize].left;

        self.nodes[x as usize].right = y_left;
        if y_left != NIL {
            self.nodes[y_left as usize].parent = x;
        }
        self.replace_child(x, y);
        self.nodes[y as usize].left = x;
        self.nodes[x as usize].parent = y;
    }

    fn rotate_right(&mut self, x: u32) {
        let y = self.nodes[x as usize].left;
        let y_right = self.nodes[y as usize].right;

        self.nodes[x as usize].left = y_right;
        if y_right != NIL {
            self.nodes[y_right as usize].parent = x;
        }
        self.replace_child(x, y);
        self.nodes[y as usize].right = x;
        self.nodes[x as usize].parent = y;
    }

    /// Hang `new` where `old` used to hang under `old`'s parent
    fn replace_child(&mut self, old: u32, new: u32) {
        let parent = self.parent(old);
        self.nodes[new as usize].parent = parent;
        if parent == NIL {
            self.root = new;
        } else if self.nodes[parent as usize].left == old {
            self.nodes[parent as usize].left = new;
        } else {
            self.nodes[parent as usize].right = new;
        }
    }

    fn leftmost(&self, mut n: u32) -> u32 {
        while self.nodes[n as usize].left != NIL {
            n = self.nodes[n as usize].left;
        }
        n
    }

    fn successor(&self, n: u32) -> u32 {
        let right = self.nodes[n as usize].right;
        if right != NIL {
            return self.leftmost(right);
        }
        let mut child = n;
        let mut parent = self.parent(n);
        while parent != NIL && self.nodes[parent as usize].right == child {
            child = parent;
            parent = self.parent(parent);
        }
        parent
    }
}

/// In-order iterator over a [`RowIdTree`]
pub struct RowIdTreeIter<'a> {
    tree: &'a RowIdTree,
    cursor: u32,
}

impl Iterator for RowIdTreeIter<'_> {
    type Item = RowId;

    fn next(&mut self) -> Option<RowId> {
        if self.cursor == NIL {
            return None;
        }
        let row_id = self.tree.nodes[self.cursor as usize].row_id;
        self.cursor = self.tree.successor(self.cursor);
        Some(row_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_key(tree: &mut RowIdTree, keys: &[i64], row_id: RowId) {
        let key = keys[row_id as usize];
        tree.insert_by(row_id, |existing| Ok(key.cmp(&keys[existing as usize]))).unwrap();
    }

    /// Returns the black height, panicking on any red-black violation
    fn check_node(tree: &RowIdTree, n: u32) -> usize {
        if n == NIL {
            return 1;
        }
        let node = tree.nodes[n as usize];
        if node.color == Color::Red {
            assert_eq!(tree.color(node.left), Color::Black, "red node with red child");
            assert_eq!(tree.color(node.right), Color::Black, "red node with red child");
        }
        if node.left != NIL {
            assert_eq!(tree.parent(node.left), n);
        }
        if node.right != NIL {
            assert_eq!(tree.parent(node.right), n);
        }
        let lh = check_node(tree, node.left);
        let rh = check_node(tree, node.right);
        assert_eq!(lh, rh, "unequal black height");
        lh + usize::from(node.color == Color::Black)
    }

    fn check_invariants(tree: &RowIdTree) {
        assert_eq!(tree.color(tree.root), Color::Black);
        if tree.root != NIL {
            assert_eq!(tree.parent(tree.root), NIL);
        }
        check_node(tree, tree.root);
    }

    #[test]
    fn test_new_tree() {
        let tree = RowIdTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn test_sorted_traversal() {
        let keys = [50, 20, 80, 10, 30, 70, 90, 60];
        let mut tree = RowIdTree::with_capacity(4).unwrap();
        for row_id in 0..keys.len() as i64 {
            insert_key(&mut tree, &keys, row_id);
        }
        assert_eq!(tree.len(), keys.len());
        let sorted: Vec<i64> = tree.iter().map(|id| keys[id as usize]).collect();
        assert_eq!(sorted, vec![10, 20, 30, 50, 60, 70, 80, 90]);
        check_invariants(&tree);
    }

    #[test]
    fn test_duplicates_keep_insertion_order() {
        let keys = [1, 0, 1, 0, 1];
        let mut tree = RowIdTree::new();
        for row_id in 0..keys.len() as i64 {
            insert_key(&mut tree, &keys, row_id);
        }
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_many_insertions_stay_balanced() {
        // ascending input is the worst case for an unbalanced tree
        let keys: Vec<i64> = (0..2000).collect();
        let mut tree = RowIdTree::new();
        for row_id in 0..keys.len() as i64 {
            insert_key(&mut tree, &keys, row_id);
        }
        check_invariants(&tree);
        assert_eq!(tree.iter().collect::<Vec<_>>(), keys);

        let black_height = check_node(&tree, tree.root);
        assert!(black_height <= 12);
    }

    #[test]
    fn test_descending_and_mixed_insertions() {
        let keys: Vec<i64> = (0..500).map(|i| (i * 7919) % 503).rev().collect();
        let mut tree = RowIdTree::new();
        for row_id in 0..keys.len() as i64 {
            insert_key(&mut tree, &keys, row_id);
            if row_id % 50 == 0 {
                check_invariants(&tree);
            }
        }
        let mut expected = keys.clone();
        expected.sort();
        let sorted: Vec<i64> = tree.iter().map(|id| keys[id as usize]).collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_oversized_capacity_reports_out_of_memory() {
        let err = RowIdTree::with_capacity(usize::MAX).unwrap_err();
        assert!(err.is_resource_exhaustion());
        assert_eq!(err, Error::out_of_memory("order index nodes", usize::MAX));
    }

    #[test]
    fn test_comparator_error_leaves_tree_unchanged() {
        let keys = [3, 1, 2];
        let mut tree = RowIdTree::new();
        insert_key(&mut tree, &keys, 0);
        insert_key(&mut tree, &keys, 1);

        let result = tree.insert_by(2, |_| Err(Error::internal("comparator failed")));
        assert_eq!(result, Err(Error::internal("comparator failed")));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![1, 0]);
    }

    #[test]
    fn test_clear_and_close() {
        let keys = [2, 1];
        let mut tree = RowIdTree::new();
        insert_key(&mut tree, &keys, 0);
        insert_key(&mut tree, &keys, 1);

        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.iter().next(), None);

        insert_key(&mut tree, &keys, 1);
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![1]);

        tree.close();
        assert!(tree.is_empty());
    }
}
