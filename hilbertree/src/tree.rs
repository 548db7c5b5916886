// Copyright 2025 the Hilbertree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The Hilbert R-tree: arena-backed nodes ordered by Hilbert key, with
//! bottom-up bulk packing, ordered insertion, sibling redistribution before
//! splitting, and sibling merge on underflow.
//!
//! Nodes live in a flat arena addressed by [`NodeIdx`]; no parent or sibling
//! back-references are stored. Ancestors are recomputed by a top-down descent
//! from the root each time an operation needs them, which costs `O(log n)`
//! per lookup and keeps ownership strictly tree-shaped.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::error::Error;
use crate::hilbert::{DEFAULT_ORDER, MAX_ORDER};
use crate::types::{Rect, SpatialObject};

/// Arena handle for a tree node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn get(self) -> usize {
        self.0
    }
}

/// One child slot: objects at level 0, nodes above, never mixed in one node.
#[derive(Copy, Clone, Debug)]
enum Child {
    Object(SpatialObject),
    Node(NodeIdx),
}

#[derive(Clone, Debug)]
struct Node {
    /// Largest Hilbert key below this node; always the last child's key.
    key: u64,
    /// 0 for leaves; the root's level is the tree height.
    level: u32,
    /// Exact union of the children's boxes.
    bbox: Rect,
    /// Ascending by key at all times.
    children: Vec<Child>,
}

/// A Hilbert-curve-ordered R-tree over 2D axis-aligned rectangles.
///
/// Objects are kept sorted by the Hilbert key of their rectangle's center,
/// so a node's children occupy a contiguous run of the curve. Overflow is
/// resolved by lending a child to a sibling before a node is actually split,
/// which keeps fan-out high and the tree shallow.
#[derive(Clone)]
pub struct HilbertRTree {
    capacity: usize,
    order: u32,
    root: Option<NodeIdx>,
    arena: Vec<Node>,
    free: Vec<usize>,
    len: usize,
}

impl HilbertRTree {
    /// Create an empty tree with the given node capacity and the default
    /// curve order.
    ///
    /// # Panics
    ///
    /// Panics when `capacity < 2`.
    pub fn new(capacity: usize) -> Self {
        Self::with_order(capacity, DEFAULT_ORDER)
    }

    /// Create an empty tree with the given node capacity and curve order.
    ///
    /// # Panics
    ///
    /// Panics when `capacity < 2` or `order` is outside `1..=`[`MAX_ORDER`].
    pub fn with_order(capacity: usize, order: u32) -> Self {
        assert!(capacity >= 2, "node capacity must be at least 2");
        assert!(
            (1..=MAX_ORDER).contains(&order),
            "curve order must be in 1..=31"
        );
        Self {
            capacity,
            order,
            root: None,
            arena: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Build a balanced tree bottom-up from a batch of objects.
    ///
    /// Objects are sorted ascending by key (stable, so equal keys keep their
    /// input order) and packed into consecutive groups of `capacity` per
    /// level until a single node remains. A single object yields a leaf root
    /// of height 0.
    ///
    /// # Panics
    ///
    /// Panics when `capacity < 2`.
    pub fn bulk_build(objects: Vec<SpatialObject>, capacity: usize) -> Self {
        Self::bulk_build_with_order(objects, capacity, DEFAULT_ORDER)
    }

    /// [`bulk_build`](Self::bulk_build) with an explicit curve order, which
    /// must match the order the objects' keys were computed with.
    ///
    /// # Panics
    ///
    /// Panics when `capacity < 2` or `order` is outside `1..=`[`MAX_ORDER`].
    pub fn bulk_build_with_order(
        mut objects: Vec<SpatialObject>,
        capacity: usize,
        order: u32,
    ) -> Self {
        let mut tree = Self::with_order(capacity, order);
        if objects.is_empty() {
            return tree;
        }
        objects.sort_by_key(|obj| obj.key());
        tree.len = objects.len();
        let children: Vec<Child> = objects.into_iter().map(Child::Object).collect();
        let root = tree.pack(children, 0);
        tree.root = Some(root);
        tree
    }

    /// Number of objects in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no objects.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of children per node.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The curve order object keys are computed with.
    pub const fn order(&self) -> u32 {
        self.order
    }

    /// The root's level, or `None` for an empty tree. Every root-to-leaf path
    /// has exactly this many descents.
    pub fn height(&self) -> Option<u32> {
        self.root.map(|root| self.arena[root.get()].level)
    }

    /// Validate a rectangle and compute its [`SpatialObject`] using this
    /// tree's curve order.
    pub fn object(&self, rect: Rect) -> Result<SpatialObject, Error> {
        SpatialObject::new(rect, self.order)
    }

    /// Insert a single object, keeping its leaf's children ordered by key.
    ///
    /// The object's key must have been computed with this tree's curve order
    /// (see [`object`](Self::object)). Overflow is resolved by sibling
    /// redistribution where possible and by splitting otherwise.
    pub fn insert(&mut self, obj: SpatialObject) {
        self.len += 1;
        if self.root.is_none() {
            let root = self.new_node(0, vec![Child::Object(obj)]);
            self.root = Some(root);
            return;
        }

        let path = self.locate_path(obj.key(), 0);
        let leaf = *path.last().expect("non-empty tree yields a descent path");
        let pos = {
            let children = &self.arena[leaf.get()].children;
            match children.last() {
                Some(last) if obj.key() >= self.child_key(last) => children.len(),
                _ => children.partition_point(|c| self.child_key(c) < obj.key()),
            }
        };
        self.arena[leaf.get()].children.insert(pos, Child::Object(obj));
        for &idx in path.iter().rev() {
            self.refresh(idx);
        }
        if self.arena[leaf.get()].children.len() > self.capacity {
            self.split(&path);
        }
    }

    /// Remove the object with exactly `obj`'s key from its owning leaf.
    ///
    /// Returns the removed object, or [`Error::NotFound`] when no child of
    /// the owning leaf carries the key; the tree is then left unchanged. A
    /// leaf left with fewer than two children is merged into the first
    /// sibling with spare capacity, and the check repeats up the tree.
    pub fn delete(&mut self, obj: SpatialObject) -> Result<SpatialObject, Error> {
        let key = obj.key();
        if self.root.is_none() {
            return Err(Error::NotFound { key });
        }
        let path = self.locate_path(key, 0);
        let leaf = *path.last().expect("non-empty tree yields a descent path");
        let pos = self.arena[leaf.get()]
            .children
            .iter()
            .position(|c| self.child_key(c) == key)
            .ok_or(Error::NotFound { key })?;
        let Child::Object(removed) = self.arena[leaf.get()].children.remove(pos) else {
            unreachable!("leaves hold objects only");
        };
        self.len -= 1;
        self.rebalance_after_delete(&path);
        Ok(removed)
    }

    /// All objects whose rectangle intersects `window` under the
    /// open-interval test, in left-to-right traversal order.
    pub fn window_query(&self, window: Rect) -> Vec<SpatialObject> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let node = &self.arena[idx.get()];
            if node.level == 0 {
                for child in &node.children {
                    if let Child::Object(obj) = child
                        && obj.rect().intersects_open(&window)
                    {
                        out.push(*obj);
                    }
                }
            } else {
                // Reversed push so the lowest-key subtree pops first.
                for child in node.children.iter().rev() {
                    if let Child::Node(i) = child
                        && self.arena[i.get()].bbox.intersects_open(&window)
                    {
                        stack.push(*i);
                    }
                }
            }
        }
        out
    }

    /// The stored object nearest to `probe` in curve order: the first child
    /// of the owning leaf with key at least `probe`'s, or that leaf's last
    /// child. `None` on an empty tree.
    ///
    /// This is a Hilbert-key approximation, not a geometric nearest
    /// neighbor; callers must not assume Euclidean nearness.
    pub fn proximity_search(&self, probe: &SpatialObject) -> Option<SpatialObject> {
        self.root?;
        let path = self.locate_path(probe.key(), 0);
        let leaf = *path.last()?;
        let children = &self.arena[leaf.get()].children;
        let pos = children.partition_point(|c| self.child_key(c) < probe.key());
        match children.get(pos).or_else(|| children.last())? {
            Child::Object(obj) => Some(*obj),
            Child::Node(_) => unreachable!("leaves hold objects only"),
        }
    }

    /// All stored objects in left-to-right (ascending-key) traversal order.
    pub fn objects(&self) -> Vec<SpatialObject> {
        let mut out = Vec::with_capacity(self.len);
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let node = &self.arena[idx.get()];
            if node.level == 0 {
                for child in &node.children {
                    if let Child::Object(obj) = child {
                        out.push(*obj);
                    }
                }
            } else {
                for child in node.children.iter().rev() {
                    if let Child::Node(i) = child {
                        stack.push(*i);
                    }
                }
            }
        }
        out
    }

    /// Render the tree structure (node key, bounding box, level) for
    /// debugging, one line per node or object, indented by depth.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.dump_node(root, 0, &mut out);
        }
        out
    }

    fn dump_node(&self, idx: NodeIdx, depth: usize, out: &mut String) {
        let node = &self.arena[idx.get()];
        for _ in 0..depth {
            out.push_str("  ");
        }
        let _ = writeln!(
            out,
            "node key={} level={} bbox=({}, {}, {}, {})",
            node.key, node.level, node.bbox.min_x, node.bbox.min_y, node.bbox.max_x, node.bbox.max_y
        );
        for child in &node.children {
            match child {
                Child::Object(obj) => {
                    for _ in 0..=depth {
                        out.push_str("  ");
                    }
                    let rect = obj.rect();
                    let _ = writeln!(
                        out,
                        "- obj key={} rect=({}, {}, {}, {})",
                        obj.key(),
                        rect.min_x,
                        rect.min_y,
                        rect.max_x,
                        rect.max_y
                    );
                }
                Child::Node(i) => self.dump_node(*i, depth + 1, out),
            }
        }
    }

    // --- arena plumbing ---

    fn alloc(&mut self, node: Node) -> NodeIdx {
        if let Some(i) = self.free.pop() {
            self.arena[i] = node;
            NodeIdx(i)
        } else {
            self.arena.push(node);
            NodeIdx(self.arena.len() - 1)
        }
    }

    fn release(&mut self, idx: NodeIdx) {
        self.arena[idx.get()].children.clear();
        self.free.push(idx.get());
    }

    fn new_node(&mut self, level: u32, children: Vec<Child>) -> NodeIdx {
        let last = children.last().expect("nodes are created non-empty");
        let key = self.child_key(last);
        let bbox = self.children_bbox(&children);
        self.alloc(Node {
            key,
            level,
            bbox,
            children,
        })
    }

    fn child_key(&self, child: &Child) -> u64 {
        match child {
            Child::Object(obj) => obj.key(),
            Child::Node(idx) => self.arena[idx.get()].key,
        }
    }

    fn child_bbox(&self, child: &Child) -> Rect {
        match child {
            Child::Object(obj) => obj.rect(),
            Child::Node(idx) => self.arena[idx.get()].bbox,
        }
    }

    fn children_bbox(&self, children: &[Child]) -> Rect {
        let mut it = children.iter();
        let first = match it.next() {
            Some(child) => self.child_bbox(child),
            None => Rect::new(0, 0, 0, 0),
        };
        it.fold(first, |acc, child| acc.union(self.child_bbox(child)))
    }

    /// Recompute a node's key and bounding box from its current children.
    fn refresh(&mut self, idx: NodeIdx) {
        let key = match self.arena[idx.get()].children.last() {
            Some(last) => self.child_key(last),
            None => self.arena[idx.get()].key,
        };
        let bbox = self.children_bbox(&self.arena[idx.get()].children);
        let node = &mut self.arena[idx.get()];
        node.key = key;
        node.bbox = bbox;
    }

    // --- traversal ---

    /// Descend from the root to the node at `level` that owns (or should
    /// own) `key`, recording the path root-first. At each step: the last
    /// child when `key` exceeds every child key, else the first child whose
    /// key is at least `key`.
    fn locate_path(&self, key: u64, level: u32) -> Vec<NodeIdx> {
        let mut path = Vec::new();
        let Some(mut current) = self.root else {
            return path;
        };
        loop {
            path.push(current);
            if self.arena[current.get()].level <= level {
                return path;
            }
            current = self.step_down(current, key);
        }
    }

    fn step_down(&self, node: NodeIdx, key: u64) -> NodeIdx {
        let children = &self.arena[node.get()].children;
        let last = children.last().expect("internal nodes are never empty");
        let chosen = if key > self.child_key(last) {
            last
        } else {
            let pos = children.partition_point(|c| self.child_key(c) < key);
            &children[pos]
        };
        match chosen {
            Child::Node(idx) => *idx,
            Child::Object(_) => unreachable!("descent stops above level 0"),
        }
    }

    fn position_in(&self, parent: NodeIdx, node: NodeIdx) -> usize {
        self.arena[parent.get()]
            .children
            .iter()
            .position(|c| matches!(c, Child::Node(i) if *i == node))
            .expect("parent owns the node")
    }

    // --- overflow handling ---

    /// Resolve an overflow of the last node on `path`: lend a child to a
    /// sibling with spare capacity, else split off the lower half, then
    /// recurse when the parent overflows in turn. An overflowing root is
    /// rebuilt by re-packing its children, growing the tree by one level.
    fn split(&mut self, path: &[NodeIdx]) {
        let (&node, above) = path.split_last().expect("split requires a path");
        let Some(&parent) = above.last() else {
            self.rebuild_root();
            return;
        };
        let pos = self.position_in(parent, node);

        // Redistribution keeps fan-out high without creating a node.
        if let Some(sibling) = self.sibling_with_room(parent, pos + 1) {
            let moved = self.arena[node.get()]
                .children
                .pop()
                .expect("overflowing node has children");
            self.arena[sibling.get()].children.insert(0, moved);
            self.refresh(node);
            self.refresh(sibling);
            self.refresh(parent);
            return;
        }
        if pos > 0
            && let Some(sibling) = self.sibling_with_room(parent, pos - 1)
        {
            let moved = self.arena[node.get()].children.remove(0);
            self.arena[sibling.get()].children.push(moved);
            self.refresh(node);
            self.refresh(sibling);
            self.refresh(parent);
            return;
        }

        // Genuine split: a new left sibling takes the lower half.
        let lower: Vec<Child> = {
            let children = &mut self.arena[node.get()].children;
            let half = children.len() / 2;
            children.drain(..half).collect()
        };
        let level = self.arena[node.get()].level;
        let sibling = self.new_node(level, lower);
        self.arena[parent.get()]
            .children
            .insert(pos, Child::Node(sibling));
        self.refresh(node);
        self.refresh(parent);
        if self.arena[parent.get()].children.len() > self.capacity {
            self.split(above);
        }
    }

    fn sibling_with_room(&self, parent: NodeIdx, sibling_pos: usize) -> Option<NodeIdx> {
        let children = &self.arena[parent.get()].children;
        let Child::Node(sibling) = *children.get(sibling_pos)? else {
            unreachable!("internal nodes hold nodes only");
        };
        (self.arena[sibling.get()].children.len() < self.capacity).then_some(sibling)
    }

    /// Re-pack the root's children bottom-up, as in bulk construction. Called
    /// on root overflow; the re-pack adds one level of height.
    fn rebuild_root(&mut self) {
        let old = self.root.expect("rebuild requires a root");
        let level = self.arena[old.get()].level;
        let children = core::mem::take(&mut self.arena[old.get()].children);
        self.release(old);
        let root = self.pack(children, level);
        self.root = Some(root);
    }

    /// Group `items` (ascending by key) into nodes of at most `capacity`
    /// children at `level`, then repeat one level up until a single node
    /// remains; that node is returned as the root of the packed subtree.
    fn pack(&mut self, items: Vec<Child>, level: u32) -> NodeIdx {
        let mut items = items;
        let mut level = level;
        loop {
            let mut parents: Vec<Child> = Vec::with_capacity(items.len().div_ceil(self.capacity));
            while !items.is_empty() {
                let tail = items.split_off(items.len().min(self.capacity));
                let group = core::mem::replace(&mut items, tail);
                parents.push(Child::Node(self.new_node(level, group)));
            }
            if let [Child::Node(root)] = parents.as_slice() {
                return *root;
            }
            items = parents;
            level += 1;
        }
    }

    // --- underflow handling ---

    /// Walk the recorded descent path bottom-up after a removal: merge nodes
    /// left with fewer than two children into the first sibling with spare
    /// capacity, then refresh keys and boxes of the surviving ancestors and
    /// collapse the root when a level has emptied out.
    fn rebalance_after_delete(&mut self, path: &[NodeIdx]) {
        let mut end = path.len();
        for i in (1..path.len()).rev() {
            let node = path[i];
            let parent = path[i - 1];
            let remaining = self.arena[node.get()].children.len();
            if remaining >= 2 {
                break;
            }
            if remaining == 1 && !self.merge_into_sibling(parent, node) {
                // No sibling can take the child; a single-child node is legal.
                break;
            }
            if remaining == 0 {
                self.detach(parent, node);
            }
            end = i;
        }
        for &idx in path[..end].iter().rev() {
            self.refresh(idx);
        }
        self.collapse_root();
    }

    /// Move `node`'s children into the first sibling with spare capacity,
    /// preserving that sibling's key order, and detach `node` from `parent`.
    /// Returns `false` when every sibling is full.
    fn merge_into_sibling(&mut self, parent: NodeIdx, node: NodeIdx) -> bool {
        let sibling = self.arena[parent.get()].children.iter().find_map(|c| match c {
            Child::Node(s) if *s != node && self.arena[s.get()].children.len() < self.capacity => {
                Some(*s)
            }
            _ => None,
        });
        let Some(sibling) = sibling else {
            return false;
        };
        let moved = core::mem::take(&mut self.arena[node.get()].children);
        for child in moved {
            let key = self.child_key(&child);
            let pos = self.arena[sibling.get()]
                .children
                .partition_point(|c| self.child_key(c) < key);
            self.arena[sibling.get()].children.insert(pos, child);
        }
        self.refresh(sibling);
        self.detach(parent, node);
        true
    }

    fn detach(&mut self, parent: NodeIdx, node: NodeIdx) {
        let pos = self.position_in(parent, node);
        let _ = self.arena[parent.get()].children.remove(pos);
        self.release(node);
    }

    /// Replace an internal root holding a single child by that child, and
    /// drop an emptied root altogether.
    fn collapse_root(&mut self) {
        while let Some(root) = self.root {
            let (level, len) = {
                let node = &self.arena[root.get()];
                (node.level, node.children.len())
            };
            if len == 0 {
                self.release(root);
                self.root = None;
            } else if level > 0 && len == 1 {
                let Child::Node(child) = self.arena[root.get()].children[0] else {
                    unreachable!("internal nodes hold nodes only");
                };
                self.release(root);
                self.root = Some(child);
            } else {
                break;
            }
        }
    }
}

impl core::fmt::Debug for HilbertRTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HilbertRTree")
            .field("capacity", &self.capacity)
            .field("order", &self.order)
            .field("len", &self.len)
            .field("height", &self.height())
            .field("arena_nodes", &self.arena.len())
            .finish_non_exhaustive()
    }
}
