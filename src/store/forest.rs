//! Comment forest traversal.
//!
//! Nodes are addressed by index paths from the forest root: `[2, 0, 1]` is
//! the second reply of the first reply of the third root. A search resolves
//! an id to its path with an iterative depth-first walk, then mutation walks
//! that path once. No child list is ever borrowed twice.

use crate::types::{Comment, CommentId};
use std::collections::HashSet;

/// Index path from the forest root to a node.
pub type NodePath = Vec<usize>;

/// Result of inserting a comment into a forest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeInsert {
    Inserted,
    /// The comment (or a node it carries) already exists.
    Duplicate,
    /// `parent_id` does not resolve to any node.
    MissingParent,
}

/// Find the path of the node with `id`, searching every depth in pre-order.
pub fn locate(forest: &[Comment], id: &CommentId) -> Option<NodePath> {
    // One frame per level: the sibling list and the index of the next node to visit.
    let mut stack: Vec<(&[Comment], usize)> = vec![(forest, 0)];

    while let Some(frame) = stack.last_mut() {
        let (siblings, index) = *frame;
        if index >= siblings.len() {
            stack.pop();
            continue;
        }
        frame.1 += 1;

        let node = &siblings[index];
        if node.id == *id {
            return Some(stack.iter().map(|&(_, next)| next - 1).collect());
        }
        if !node.replies.is_empty() {
            stack.push((node.replies.as_slice(), 0));
        }
    }

    None
}

/// Resolve a path to a node.
pub fn node_at<'a>(forest: &'a [Comment], path: &[usize]) -> Option<&'a Comment> {
    let (first, rest) = path.split_first()?;
    let mut node = forest.get(*first)?;
    for &i in rest {
        node = node.replies.get(i)?;
    }
    Some(node)
}

/// Resolve a path to a mutable node.
pub fn node_at_mut<'a>(forest: &'a mut [Comment], path: &[usize]) -> Option<&'a mut Comment> {
    let (first, rest) = path.split_first()?;
    let mut node = forest.get_mut(*first)?;
    for &i in rest {
        node = node.replies.get_mut(i)?;
    }
    Some(node)
}

/// Detach the node at `path`, together with its replies.
pub fn remove_at(forest: &mut Vec<Comment>, path: &[usize]) -> Option<Comment> {
    let (&last, parent_path) = path.split_last()?;
    let siblings = if parent_path.is_empty() {
        forest
    } else {
        &mut node_at_mut(forest, parent_path)?.replies
    };
    if last < siblings.len() {
        Some(siblings.remove(last))
    } else {
        None
    }
}

pub fn find<'a>(forest: &'a [Comment], id: &CommentId) -> Option<&'a Comment> {
    locate(forest, id).and_then(|path| node_at(forest, &path))
}

pub fn find_mut<'a>(forest: &'a mut [Comment], id: &CommentId) -> Option<&'a mut Comment> {
    let path = locate(forest, id)?;
    node_at_mut(forest, &path)
}

pub fn contains(forest: &[Comment], id: &CommentId) -> bool {
    locate(forest, id).is_some()
}

/// Remove the node with `id` wherever it occurs.
pub fn remove(forest: &mut Vec<Comment>, id: &CommentId) -> Option<Comment> {
    let path = locate(forest, id)?;
    remove_at(forest, &path)
}

/// Drop every node whose id already appeared earlier in pre-order, together
/// with its replies. Returns the number of subtrees dropped.
pub fn dedup(forest: &mut Vec<Comment>) -> usize {
    let repeated = repeated_paths(forest);

    // Later paths first, so earlier paths keep their indices.
    for path in repeated.iter().rev() {
        remove_at(forest, path);
    }
    repeated.len()
}

/// Paths of nodes whose id was already seen earlier in pre-order. The walk
/// does not descend into a repeated node.
fn repeated_paths(forest: &[Comment]) -> Vec<NodePath> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    let mut stack: Vec<(&[Comment], usize)> = vec![(forest, 0)];

    while let Some(frame) = stack.last_mut() {
        let (siblings, index) = *frame;
        if index >= siblings.len() {
            stack.pop();
            continue;
        }
        frame.1 += 1;

        let node = &siblings[index];
        if !seen.insert(&node.id) {
            repeated.push(stack.iter().map(|&(_, next)| next - 1).collect());
            continue;
        }
        if !node.replies.is_empty() {
            stack.push((node.replies.as_slice(), 0));
        }
    }

    repeated
}

/// Append `comment` under its parent (or as a root when it has none).
///
/// Repeated ids inside the incoming subtree are dropped first. Rejected if
/// any remaining id is already in the forest.
pub fn insert(forest: &mut Vec<Comment>, comment: Comment) -> TreeInsert {
    let mut carried = vec![comment];
    dedup(&mut carried);
    let Some(comment) = carried.pop() else {
        return TreeInsert::Duplicate;
    };

    let mut incoming = vec![&comment];
    while let Some(node) = incoming.pop() {
        if contains(forest, &node.id) {
            return TreeInsert::Duplicate;
        }
        incoming.extend(node.replies.iter());
    }

    match comment.parent_id.clone() {
        None => {
            forest.push(comment);
            TreeInsert::Inserted
        }
        Some(parent_id) => match find_mut(forest, &parent_id) {
            Some(parent) => {
                parent.replies.push(comment);
                TreeInsert::Inserted
            }
            None => TreeInsert::MissingParent,
        },
    }
}

/// Total node count of the forest.
pub fn node_count(forest: &[Comment]) -> usize {
    forest.iter().map(Comment::subtree_size).sum()
}
