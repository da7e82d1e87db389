//! Walking [`THREAD`](https://tools.ietf.org/html/rfc5256#section-4) results.
//!
//! A thread list is drawn as an indented tree. For the response `(2)(3 6 (4 23)(44 7 96))`:
//!
//! ```text
//! -- 2
//! -- 3
//!     \-- 6
//!         |-- 4
//!         |   \-- 23
//!         \-- 44
//!             \-- 7
//!                 \-- 96
//! ```

use crate::types::{MessageId, ThreadNode};

/// Where one message sits in a thread tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThreadPosition {
    /// The message.
    pub id: MessageId,
    /// Indentation depth; thread roots are at 0.
    pub level: usize,
    /// The message this one is drawn under.
    pub parent: Option<MessageId>,
}

/// All message identifiers of a thread list, depth first.
pub fn flatten(nodes: &[ThreadNode]) -> Vec<MessageId> {
    let mut ids = Vec::new();
    flatten_onto(nodes, &mut ids);
    ids
}

fn flatten_onto(nodes: &[ThreadNode], ids: &mut Vec<MessageId>) {
    for node in nodes {
        match node {
            ThreadNode::Message(id) => ids.push(*id),
            ThreadNode::Branch(children) => flatten_onto(children, ids),
        }
    }
}

/// Every message of a thread list with its level and parent, depth first.
///
/// Within a branch each message sits one level below the message before it, and is that
/// message's child. A nested branch starts at the level reached so far, under the last message
/// seen before it.
pub fn positions(nodes: &[ThreadNode]) -> Vec<ThreadPosition> {
    let mut out = Vec::new();
    walk(nodes, 0, None, &mut out);
    out
}

fn walk(
    nodes: &[ThreadNode],
    mut level: usize,
    mut parent: Option<MessageId>,
    out: &mut Vec<ThreadPosition>,
) {
    for node in nodes {
        match node {
            ThreadNode::Branch(children) => walk(children, level, parent, out),
            ThreadNode::Message(id) => {
                out.push(ThreadPosition {
                    id: *id,
                    level,
                    parent,
                });
                level += 1;
                parent = Some(*id);
            }
        }
    }
}

/// Thread a flat list on the client.
///
/// No reply analysis is done: every message becomes a thread of its own, in the given order, so
/// levels and pagination downstream behave as for a flat list.
pub fn client_thread(ids: &[MessageId]) -> Vec<ThreadNode> {
    ids.iter()
        .map(|&id| ThreadNode::Branch(vec![ThreadNode::Message(id)]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ThreadNode::{Branch, Message};

    /// `(2)(3 6 (4 23)(44 7 96))`
    fn rfc_example() -> Vec<ThreadNode> {
        vec![
            ThreadNode::branch([2]),
            Branch(vec![
                Message(3),
                Message(6),
                ThreadNode::branch([4, 23]),
                ThreadNode::branch([44, 7, 96]),
            ]),
        ]
    }

    /// `[[2],[3,6,[4,23],[44,7,[96]]]]`
    fn nested_example() -> Vec<ThreadNode> {
        vec![
            ThreadNode::branch([2]),
            Branch(vec![
                Message(3),
                Message(6),
                ThreadNode::branch([4, 23]),
                Branch(vec![Message(44), Message(7), ThreadNode::branch([96])]),
            ]),
        ]
    }

    fn levels(nodes: &[ThreadNode]) -> Vec<usize> {
        positions(nodes).iter().map(|p| p.level).collect()
    }

    fn parents(nodes: &[ThreadNode]) -> Vec<Option<MessageId>> {
        positions(nodes).iter().map(|p| p.parent).collect()
    }

    #[test]
    fn flatten_is_depth_first() {
        assert_eq!(flatten(&rfc_example()), vec![2, 3, 6, 4, 23, 44, 7, 96]);
        assert_eq!(flatten(&nested_example()), vec![2, 3, 6, 4, 23, 44, 7, 96]);
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn levels_follow_the_drawn_tree() {
        assert_eq!(levels(&rfc_example()), vec![0, 0, 1, 2, 3, 2, 3, 4]);
        assert_eq!(levels(&nested_example()), vec![0, 0, 1, 2, 3, 2, 3, 4]);
    }

    #[test]
    fn parent_is_the_message_drawn_above() {
        assert_eq!(
            parents(&rfc_example()),
            vec![
                None,
                None,
                Some(3),
                Some(6),
                Some(4),
                Some(6),
                Some(44),
                Some(7)
            ]
        );
    }

    #[test]
    fn client_threading_keeps_a_flat_list_flat() {
        let threads = client_thread(&[9, 4, 7]);
        assert_eq!(flatten(&threads), vec![9, 4, 7]);
        assert_eq!(levels(&threads), vec![0, 0, 0]);
        assert_eq!(parents(&threads), vec![None, None, None]);
    }
}
