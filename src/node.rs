//! Binary tree nodes with parent back-links, kept in a generational arena.
//!
//! A [`Forest`] owns every node. Each node owns its children through its `left` and `right`
//! slots and refers back to its parent by handle. Root references are `Option<NodeId>`s held by
//! the caller, with `None` standing for the empty tree.
//!
//! # Examples
//!
//! ```
//! use bnode::Forest;
//!
//! let mut forest = Forest::new();
//! let mut dest = None;
//!
//! let src = forest.insert(1);
//! forest.add_left_value(src, 2).unwrap();
//!
//! // Assigning into an empty reference builds a fresh tree.
//! forest.assign(&mut dest, Some(src)).unwrap();
//! assert_eq!(forest.subtree(dest), forest.subtree(Some(src)));
//!
//! // Assigning again reuses the nodes that are already there.
//! let old_root = dest;
//! *forest.value_mut(src).unwrap() = 10;
//! forest.assign(&mut dest, Some(src)).unwrap();
//! assert_eq!(dest, old_root);
//! assert_eq!(forest.value(dest.unwrap()), Some(&10));
//!
//! // Assigning an empty tree tears the destination down.
//! forest.assign(&mut dest, None).unwrap();
//! assert_eq!(dest, None);
//! assert_eq!(forest.len(), 2);
//! ```

use std::fmt;
use std::mem;
use std::ops;

use generational_arena::{Arena, Index};
use log::trace;

use crate::error::{Error, Result};

/// A handle to a node in a [`Forest`]. Handles are generational: once the node is removed, the
/// handle is stale and every operation given it reports [`Error::StaleNode`] (or treats it as an
/// empty tree where the operation has no failure mode).
///
/// A handle is only meaningful in the forest that handed it out (and in clones of that forest).
/// Handles are not branded with their forest, so a handle from another forest is not detected:
/// it refers to whatever node sits in the same slot with the same generation, if any.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Index);

/// One of the two child slots of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The `left` slot.
    Left,
    /// The `right` slot.
    Right,
}

/// One vertex of a binary tree. It holds a value and links to its parent and children. The
/// links can only be changed through [`Forest`] so they always agree with each other.
#[derive(Clone, Debug)]
pub struct Node<T> {
    value: T,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
            parent: None,
        }
    }

    /// The value stored in this node.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The value stored in this node, mutably. The links stay untouched.
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// The root of the left subtree, if any.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// The root of the right subtree, if any.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// The node owning this one as a child. `None` for a root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The child on the given side.
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Whether this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// An arena of binary tree nodes. A forest can hold any number of independent trees; every
/// node belongs to exactly one of them.
#[derive(Clone, Debug)]
pub struct Forest<T> {
    nodes: Arena<Node<T>>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ops::Index<NodeId> for Forest<T> {
    type Output = Node<T>;

    /// ## Panics
    ///
    /// When `id` is stale.
    fn index(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }
}

impl<T> ops::IndexMut<NodeId> for Forest<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }
}

impl<T> Forest<T> {
    /// Generate a new, empty `Forest`.
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
        }
    }

    /// Generate a new, empty `Forest` with room for `capacity` nodes before it reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
        }
    }

    /// How many live nodes there are across all trees in the forest.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the forest holds no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the slot and generation of `id` hold a live node. See [`NodeId`] for handles from
    /// other forests.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id.0)
    }

    /// Adds a standalone node (no parent, no children) holding `value`.
    pub fn insert(&mut self, value: T) -> NodeId {
        NodeId(self.nodes.insert(Node::new(value)))
    }

    /// Adds a standalone node holding `T::default()`.
    pub fn insert_default(&mut self) -> NodeId
    where
        T: Default,
    {
        self.insert(T::default())
    }

    /// The node behind `id`, or `None` if the handle is stale.
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0)
    }

    /// The node behind `id`, mutably, or `None` if the handle is stale.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.nodes.get_mut(id.0)
    }

    /// The value of the node behind `id`, or `None` if the handle is stale.
    pub fn value(&self, id: NodeId) -> Option<&T> {
        self.get(id).map(Node::value)
    }

    /// The value of the node behind `id`, mutably, or `None` if the handle is stale.
    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.get_mut(id).map(Node::value_mut)
    }

    /// Every root in the forest, in no particular order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| node.is_root())
            .map(|(index, _)| NodeId(index))
    }

    /// A borrowed view of the subtree rooted at `root`.
    pub fn subtree(&self, root: Option<NodeId>) -> Subtree<'_, T> {
        Subtree { forest: self, root }
    }

    /// Removes a single node and returns its value. The node is unlinked from its parent and its
    /// children become roots of their own trees. Use [`Forest::clear`] to remove a whole
    /// subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bnode::Forest;
    ///
    /// let mut forest = Forest::new();
    /// let root = forest.insert(5);
    /// let (left, _) = forest.add_left_value(root, 3).unwrap();
    ///
    /// assert_eq!(forest.remove(root), Ok(5));
    /// assert!(forest[left].is_root());
    /// assert!(forest.remove(root).is_err());
    /// ```
    pub fn remove(&mut self, id: NodeId) -> Result<T> {
        self.ensure_live(id)?;
        self.unlink_from_parent(id);
        let node = self.nodes.remove(id.0).ok_or(Error::StaleNode(id))?;
        for child in node.left.into_iter().chain(node.right) {
            self.nodes[child.0].parent = None;
        }

        Ok(node.value)
    }

    /// Cuts `id` from its parent, in both directions, and returns the former parent. The node
    /// keeps its own children and becomes the root of its own tree.
    pub fn detach(&mut self, id: NodeId) -> Result<Option<NodeId>> {
        self.ensure_live(id)?;
        Ok(self.unlink_from_parent(id))
    }

    /// Returns the number of nodes in the subtree rooted at `root`, including the root itself.
    /// `None` and stale handles are empty trees.
    ///
    /// # Examples
    ///
    /// ```
    /// use bnode::Forest;
    ///
    /// let mut forest = Forest::new();
    /// assert_eq!(forest.size(None), 0);
    ///
    /// let root = forest.insert("root");
    /// forest.add_right_value(root, "right").unwrap();
    /// assert_eq!(forest.size(Some(root)), 2);
    /// ```
    pub fn size(&self, root: Option<NodeId>) -> usize {
        let mut pending: Vec<NodeId> = root.into_iter().filter(|&id| self.contains(id)).collect();
        let mut size = 0;
        while let Some(id) = pending.pop() {
            let node = &self.nodes[id.0];
            pending.extend(node.left);
            pending.extend(node.right);
            size += 1;
        }

        size
    }

    /// Makes `child` the left child of `parent` and returns the displaced former left child.
    ///
    /// `child` is taken away from its previous parent first, if it had one. The displaced child
    /// keeps its subtree and becomes a root; it is up to the caller to reattach it or
    /// [`clear`](Forest::clear) it.
    ///
    /// # Errors
    ///
    /// [`Error::StaleNode`] when either handle isn't live and [`Error::WouldCycle`] when `child`
    /// is `parent` or one of its ancestors. The forest is unchanged in both cases.
    ///
    /// # Examples
    ///
    /// ```
    /// use bnode::Forest;
    ///
    /// let mut forest = Forest::new();
    /// let root = forest.insert(5);
    /// let three = forest.insert(3);
    /// let four = forest.insert(4);
    ///
    /// assert_eq!(forest.add_left(root, three), Ok(None));
    /// assert_eq!(forest.add_left(root, four), Ok(Some(three)));
    /// assert!(forest[three].is_root());
    /// assert_eq!(forest[four].parent(), Some(root));
    /// ```
    pub fn add_left(&mut self, parent: NodeId, child: NodeId) -> Result<Option<NodeId>> {
        self.attach(parent, Side::Left, child)
    }

    /// Makes `child` the right child of `parent`. See [`Forest::add_left`].
    pub fn add_right(&mut self, parent: NodeId, child: NodeId) -> Result<Option<NodeId>> {
        self.attach(parent, Side::Right, child)
    }

    /// Allocates a node holding `value` and makes it the left child of `parent`. Returns the
    /// new node and the displaced former left child.
    ///
    /// # Errors
    ///
    /// [`Error::StaleNode`] when `parent` isn't live. Nothing is allocated in that case.
    pub fn add_left_value(&mut self, parent: NodeId, value: T) -> Result<(NodeId, Option<NodeId>)> {
        self.attach_value(parent, Side::Left, value)
    }

    /// Allocates a node holding `value` and makes it the right child of `parent`. See
    /// [`Forest::add_left_value`].
    pub fn add_right_value(
        &mut self,
        parent: NodeId,
        value: T,
    ) -> Result<(NodeId, Option<NodeId>)> {
        self.attach_value(parent, Side::Right, value)
    }

    /// Links `child` into the `side` slot of `parent`. [`Forest::add_left`] and
    /// [`Forest::add_right`] are shorthands for this.
    pub fn attach(&mut self, parent: NodeId, side: Side, child: NodeId) -> Result<Option<NodeId>> {
        self.ensure_live(parent)?;
        self.ensure_live(child)?;
        if self.is_ancestor_or_self(child, parent) {
            return Err(Error::WouldCycle { parent, child });
        }
        if self.nodes[parent.0].child(side) == Some(child) {
            return Ok(None);
        }

        self.unlink_from_parent(child);
        let displaced = mem::replace(self.nodes[parent.0].child_mut(side), Some(child));
        if let Some(displaced) = displaced {
            self.nodes[displaced.0].parent = None;
        }
        self.nodes[child.0].parent = Some(parent);

        trace!(
            "attached {:?} as {:?} child of {:?}, displacing {:?}",
            child,
            side,
            parent,
            displaced
        );
        Ok(displaced)
    }

    /// Allocates a node holding `value` and links it into the `side` slot of `parent`.
    pub fn attach_value(
        &mut self,
        parent: NodeId,
        side: Side,
        value: T,
    ) -> Result<(NodeId, Option<NodeId>)> {
        self.ensure_live(parent)?;
        let child = self.insert(value);
        let displaced = self.attach(parent, side, child)?;
        Ok((child, displaced))
    }

    /// Removes every node of the subtree rooted at `*root`, children before their parent, and
    /// sets `*root` to `None`. If the root had a parent, the parent's slot is emptied too.
    ///
    /// Clearing `None` does nothing. A stale handle has nothing left to remove so it is just
    /// reset to `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bnode::Forest;
    ///
    /// let mut forest = Forest::new();
    /// let root = forest.insert(5);
    /// forest.add_left_value(root, 3).unwrap();
    ///
    /// let mut root = Some(root);
    /// forest.clear(&mut root);
    ///
    /// assert_eq!(root, None);
    /// assert!(forest.is_empty());
    /// ```
    pub fn clear(&mut self, root: &mut Option<NodeId>) {
        let Some(root) = root.take() else {
            return;
        };
        if !self.contains(root) {
            trace!("cleared stale handle {:?}", root);
            return;
        }
        self.unlink_from_parent(root);

        // Visiting parent, right, left and then reversing gives left, right, parent.
        let mut pending = vec![root];
        let mut post_order = Vec::new();
        while let Some(id) = pending.pop() {
            let node = &self.nodes[id.0];
            pending.extend(node.left);
            pending.extend(node.right);
            post_order.push(id);
        }

        let removed = post_order.len();
        for id in post_order.into_iter().rev() {
            self.nodes.remove(id.0);
        }
        trace!("cleared {} nodes rooted at {:?}", removed, root);
    }

    /// Returns the root of a deep copy of the subtree rooted at `src`. Every node of the copy
    /// is newly allocated in this forest and the copy's root has no parent. Copying `None` gives
    /// `None`.
    ///
    /// The copy recurses once per level so very deep trees can exhaust the call stack. In debug
    /// builds the links of the copy are also checked, which walks the whole copy once more.
    ///
    /// # Errors
    ///
    /// [`Error::StaleNode`] when `src` isn't live.
    ///
    /// # Examples
    ///
    /// ```
    /// use bnode::Forest;
    ///
    /// let mut forest = Forest::new();
    /// let root = forest.insert(5);
    /// forest.add_left_value(root, 3).unwrap();
    ///
    /// let copy = forest.copy(Some(root)).unwrap();
    /// assert_ne!(copy, Some(root));
    /// assert_eq!(forest.subtree(copy), forest.subtree(Some(root)));
    /// assert_eq!(forest.len(), 4);
    /// ```
    pub fn copy(&mut self, src: Option<NodeId>) -> Result<Option<NodeId>>
    where
        T: Clone,
    {
        let Some(src) = src else {
            return Ok(None);
        };
        self.ensure_live(src)?;

        let copied = self.copy_subtree(src);
        if cfg!(debug_assertions) {
            self.assert_links(copied);
        }
        trace!("copied subtree {:?} to {:?}", src, copied);
        Ok(Some(copied))
    }

    /// Makes the subtree at `*dest` match the subtree at `src` in shape and values, reusing the
    /// destination's nodes wherever both trees have a node.
    ///
    /// * When `src` is `None` the destination is [cleared](Forest::clear).
    /// * When `*dest` is `None` a new tree is built and `*dest` is set to its root.
    /// * Otherwise `*dest` keeps its handle (and its parent) and only its value is overwritten
    ///   before the children are assigned, right first.
    ///
    /// Like [`Forest::copy`] this recurses once per level. In debug builds the links of the
    /// resulting tree are also checked, which walks the whole tree once more.
    ///
    /// # Errors
    ///
    /// [`Error::StaleNode`] when either handle isn't live and [`Error::Overlap`] when one
    /// subtree contains the other. Assigning a node to itself does nothing.
    pub fn assign(&mut self, dest: &mut Option<NodeId>, src: Option<NodeId>) -> Result<()>
    where
        T: Clone,
    {
        if let Some(dest) = *dest {
            self.ensure_live(dest)?;
        }
        if let Some(src) = src {
            self.ensure_live(src)?;
        }
        if let (Some(dest), Some(src)) = (*dest, src) {
            if dest == src {
                return Ok(());
            }
            if self.is_ancestor_or_self(dest, src) || self.is_ancestor_or_self(src, dest) {
                return Err(Error::Overlap { dest, src });
            }
        }

        let assigned = self.assign_subtree(*dest, src);
        if cfg!(debug_assertions) {
            if let Some(assigned) = assigned {
                self.assert_links(assigned);
            }
        }
        trace!("assigned subtree {:?} onto {:?}, now {:?}", src, dest, assigned);
        *dest = assigned;
        Ok(())
    }

    fn copy_subtree(&mut self, src: NodeId) -> NodeId
    where
        T: Clone,
    {
        let (value, left, right) = {
            let node = &self.nodes[src.0];
            (node.value.clone(), node.left, node.right)
        };

        let dest = self.insert(value);
        if let Some(left) = left {
            let left = self.copy_subtree(left);
            self.set_child(dest, Side::Left, Some(left));
        }
        if let Some(right) = right {
            let right = self.copy_subtree(right);
            self.set_child(dest, Side::Right, Some(right));
        }

        dest
    }

    fn assign_subtree(&mut self, dest: Option<NodeId>, src: Option<NodeId>) -> Option<NodeId>
    where
        T: Clone,
    {
        let Some(src) = src else {
            let mut dest = dest;
            self.clear(&mut dest);
            return None;
        };

        let (value, src_left, src_right) = {
            let node = &self.nodes[src.0];
            (node.value.clone(), node.left, node.right)
        };
        let dest = match dest {
            Some(dest) => {
                self.nodes[dest.0].value = value;
                dest
            }
            None => self.insert(value),
        };

        let dest_right = self.nodes[dest.0].right;
        let right = self.assign_subtree(dest_right, src_right);
        self.set_child(dest, Side::Right, right);

        let dest_left = self.nodes[dest.0].left;
        let left = self.assign_subtree(dest_left, src_left);
        self.set_child(dest, Side::Left, left);

        Some(dest)
    }

    /// Writes both directions of a link without checking the child's previous parent. Only for
    /// children that were just built for `parent` or already belong to it.
    fn set_child(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        *self.nodes[parent.0].child_mut(side) = child;
        if let Some(child) = child {
            self.nodes[child.0].parent = Some(parent);
        }
    }

    /// Clears the parent's slot for `id` and `id`'s parent link. Returns the former parent.
    fn unlink_from_parent(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.nodes[id.0].parent.take()?;
        let parent_node = &mut self.nodes[parent.0];
        if parent_node.left == Some(id) {
            parent_node.left = None;
        } else if parent_node.right == Some(id) {
            parent_node.right = None;
        }

        Some(parent)
    }

    /// Walks up from `node` looking for `ancestor`.
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }

        false
    }

    fn ensure_live(&self, id: NodeId) -> Result<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(Error::StaleNode(id))
        }
    }

    /// Asserts that every child below `root` points back at its parent. This is `O(size)` so it
    /// is only called under `cfg!(debug_assertions)`.
    fn assert_links(&self, root: NodeId) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let node = &self.nodes[id.0];
            for child in node.left.into_iter().chain(node.right) {
                assert_eq!(
                    self.nodes[child.0].parent,
                    Some(id),
                    "{:?} is a child of {:?} but doesn't point back at it",
                    child,
                    id
                );
                pending.push(child);
            }
        }
    }

    /// Checks every link of every node in the forest, and that each node is reachable from
    /// exactly one root.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> bool {
        let links_agree = self.nodes.iter().all(|(index, node)| {
            let id = NodeId(index);
            let children_agree = node
                .left
                .into_iter()
                .chain(node.right)
                .all(|child| self.get(child).map_or(false, |c| c.parent == Some(id)));
            let parent_agrees = node.parent.map_or(true, |parent| {
                self.get(parent)
                    .map_or(false, |p| p.left == Some(id) || p.right == Some(id))
            });
            children_agree && parent_agrees
        });
        let reachable: usize = self.roots().map(|root| self.size(Some(root))).sum();

        links_agree && reachable == self.len()
    }
}

/// Exchanges the trees two root references denote. No node is touched.
pub fn swap(lhs: &mut Option<NodeId>, rhs: &mut Option<NodeId>) {
    mem::swap(lhs, rhs);
}

/// A borrowed view of the subtree rooted at some node of a [`Forest`]. Two views are equal when
/// their trees have the same shape and equal values at every position, even when they belong to
/// different forests.
pub struct Subtree<'a, T> {
    forest: &'a Forest<T>,
    root: Option<NodeId>,
}

impl<T> Clone for Subtree<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Subtree<'_, T> {}

impl<'a, T> Subtree<'a, T> {
    /// The root of this subtree. `None` when the subtree is empty.
    pub fn root(&self) -> Option<NodeId> {
        self.node().and(self.root)
    }

    /// Whether this subtree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.node().is_none()
    }

    /// The value at the root of this subtree.
    pub fn value(&self) -> Option<&'a T> {
        self.node().map(Node::value)
    }

    /// The left subtree of the root. Empty if this subtree is.
    pub fn left(&self) -> Self {
        Self {
            forest: self.forest,
            root: self.node().and_then(Node::left),
        }
    }

    /// The right subtree of the root. Empty if this subtree is.
    pub fn right(&self) -> Self {
        Self {
            forest: self.forest,
            root: self.node().and_then(Node::right),
        }
    }

    /// See [`Forest::size`].
    pub fn size(&self) -> usize {
        self.forest.size(self.root)
    }

    fn node(&self) -> Option<&'a Node<T>> {
        self.root.and_then(|id| self.forest.get(id))
    }
}

impl<T> PartialEq<Subtree<'_, T>> for Subtree<'_, T>
where
    T: PartialEq,
{
    // TODO stack based eq
    fn eq(&self, other: &Subtree<'_, T>) -> bool {
        match (self.node(), other.node()) {
            (None, None) => true,
            (Some(lhs), Some(rhs)) => {
                lhs.value == rhs.value && self.left() == other.left() && self.right() == other.right()
            }
            _ => false,
        }
    }
}

impl<T> fmt::Debug for Subtree<'_, T>
where
    T: fmt::Debug,
{
    // TODO stack based Debug
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            None => f.write_str("Leaf"),
            Some(node) => f
                .debug_struct("Node")
                .field("value", &node.value)
                .field("left", &self.left())
                .field("right", &self.right())
                .finish(),
        }
    }
}
