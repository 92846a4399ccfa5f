//! This crate exposes a binary tree node primitive and the structural operations a container
//! such as a Binary Search Tree is built from, mostly for educational purposes.
//!
//! ## Binary Tree Nodes
//!
//! A binary tree is defined recursively using the notion of a `Node`. A `Node` stores some
//! value and may have a left child and a right child, each of which is the root of its own
//! subtree. This crate also gives every `Node` a link back to its parent so that "who owns me"
//! can be answered in `O(1)`.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes". A `Node`
//! > without a parent is the root of its tree.
//!
//! Nodes live in a [`Forest`], an arena that can hold any number of independent trees. A
//! [`NodeId`] is a handle into the arena and a root reference is an `Option<NodeId>`, where
//! `None` is the empty tree. Because handles are generational, using a handle to a node that
//! has been removed is detected and reported as an [`Error`] instead of reading freed memory.
//!
//! The invariants every [`Forest`] maintains are:
//!
//! 1. If `A.left` or `A.right` is `B`, then `B.parent` is `A`.
//! 2. The links are acyclic and every node is reachable from exactly one root.
//!
//! Nothing here orders values; the nodes don't know whether they are part of a search tree.
//!
//! # Examples
//!
//! ```
//! use bnode::Forest;
//!
//! let mut forest = Forest::new();
//! let root = forest.insert(5);
//! let (three, _) = forest.add_left_value(root, 3).unwrap();
//! forest.add_right_value(root, 8).unwrap();
//!
//! assert_eq!(forest.size(Some(root)), 3);
//! assert_eq!(forest[three].parent(), Some(root));
//!
//! let mut copy = forest.copy(Some(root)).unwrap();
//! assert_eq!(forest.subtree(copy), forest.subtree(Some(root)));
//!
//! forest.clear(&mut copy);
//! assert_eq!(copy, None);
//! assert_eq!(forest.size(copy), 0);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod node;

pub use error::{Error, Result};
pub use node::{swap, Forest, Node, NodeId, Side, Subtree};
