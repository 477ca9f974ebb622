// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A minimised finite-state automaton over characters, used to represent the
//! corpus vocabulary and to expand literal, wildcard, and fuzzy query
//! patterns against it.
//!
//! Nodes live in a flat arena (`Vec<Node>`) addressed by `NodeId`, rather
//! than behind `Rc<RefCell<_>>`, so that the wildcard self-loop edges used by
//! pattern automata don't need interior mutability or reference cycles.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::error::{Error, Result};

pub type NodeId = u32;

const WILDCARD: char = '*';

#[derive(Debug, Clone, Default)]
struct Node {
    is_final: bool,
    edges: BTreeMap<char, NodeId>,
}

/// A minimised automaton over characters. See module docs.
#[derive(Debug, Clone)]
pub struct TokenSet {
    arena: Vec<Node>,
    root: NodeId,
}

impl TokenSet {
    fn node(&self, id: NodeId) -> &Node {
        &self.arena[id as usize]
    }

    fn is_final(&self, id: NodeId) -> bool {
        self.node(id).is_final
    }

    /// Builds a minimal automaton accepting exactly the words in `words`.
    /// `words` must be sorted and free of duplicates; each word must be
    /// strictly greater than the previous one.
    pub fn from_sorted_vocabulary<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let mut arena = vec![Node::default()];
        let root: NodeId = 0;
        let mut unchecked: Vec<(NodeId, char, NodeId)> = Vec::new();
        let mut minimized: HashMap<String, NodeId> = HashMap::new();
        let mut previous = String::new();

        let minimize_down_to =
            |down_to: usize,
             arena: &mut Vec<Node>,
             unchecked: &mut Vec<(NodeId, char, NodeId)>,
             minimized: &mut HashMap<String, NodeId>| {
                while unchecked.len() > down_to {
                    let (parent, label, child) = unchecked.pop().unwrap();
                    let key = canonical_key(arena, child);
                    if let Some(&existing) = minimized.get(&key) {
                        arena[parent as usize].edges.insert(label, existing);
                    } else {
                        minimized.insert(key, child);
                    }
                }
            };

        for word in words {
            let word = word.as_ref();
            if !previous.is_empty() && word <= previous.as_str() {
                return Err(Error::UnsortedVocabulary {
                    previous,
                    next: word.to_string(),
                });
            }

            let prefix_len = previous
                .chars()
                .zip(word.chars())
                .take_while(|(a, b)| a == b)
                .count();

            minimize_down_to(prefix_len, &mut arena, &mut unchecked, &mut minimized);

            let mut current = match unchecked.last() {
                Some(&(_, _, child)) => child,
                None => root,
            };

            for ch in word.chars().skip(prefix_len) {
                let new_id = arena.len() as NodeId;
                arena.push(Node::default());
                arena[current as usize].edges.insert(ch, new_id);
                unchecked.push((current, ch, new_id));
                current = new_id;
            }
            arena[current as usize].is_final = true;
            previous = word.to_string();
        }

        minimize_down_to(0, &mut arena, &mut unchecked, &mut minimized);

        Ok(TokenSet { arena, root })
    }

    /// Builds an automaton for a literal pattern that may contain `*`
    /// wildcards. Each `*` becomes a self-loop accepting any run of
    /// characters (including none) at that position.
    pub fn from_pattern(pattern: &str) -> Self {
        let mut arena = vec![Node::default()];
        let root: NodeId = 0;
        let mut current = root;

        for ch in pattern.chars() {
            if ch == WILDCARD {
                arena[current as usize].edges.insert(WILDCARD, current);
            } else {
                let new_id = arena.len() as NodeId;
                arena.push(Node::default());
                arena[current as usize].edges.insert(ch, new_id);
                current = new_id;
            }
        }
        arena[current as usize].is_final = true;

        TokenSet { arena, root }
    }

    /// Builds an automaton accepting every string within `max_edits`
    /// insertions, deletions, substitutions, or adjacent transpositions of
    /// `pattern`.
    pub fn from_fuzzy_pattern(pattern: &str, max_edits: u8) -> Self {
        struct Frame {
            node: NodeId,
            edits_remaining: u8,
            suffix: Vec<char>,
        }

        fn get_or_insert_edge(arena: &mut Vec<Node>, node: NodeId, label: char) -> NodeId {
            if let Some(&id) = arena[node as usize].edges.get(&label) {
                return id;
            }
            let id = arena.len() as NodeId;
            arena.push(Node::default());
            arena[node as usize].edges.insert(label, id);
            id
        }

        let mut arena = vec![Node::default()];
        let root: NodeId = 0;
        let mut stack = vec![Frame {
            node: root,
            edits_remaining: max_edits,
            suffix: pattern.chars().collect(),
        }];

        while let Some(frame) = stack.pop() {
            let Frame {
                node,
                edits_remaining,
                suffix,
            } = frame;

            // No edit: consume the next literal character.
            if !suffix.is_empty() {
                let c = suffix[0];
                let child = get_or_insert_edge(&mut arena, node, c);
                if suffix.len() == 1 {
                    arena[child as usize].is_final = true;
                } else {
                    stack.push(Frame {
                        node: child,
                        edits_remaining,
                        suffix: suffix[1..].to_vec(),
                    });
                }
            }

            if edits_remaining == 0 {
                continue;
            }

            // Insertion: an extra character appears in the matched string
            // that isn't in the pattern. Reuses a wildcard edge and keeps
            // the remaining suffix unchanged.
            let insertion_node = get_or_insert_edge(&mut arena, node, WILDCARD);
            if suffix.is_empty() {
                arena[insertion_node as usize].is_final = true;
            } else {
                stack.push(Frame {
                    node: insertion_node,
                    edits_remaining: edits_remaining - 1,
                    suffix: suffix.clone(),
                });
            }

            // Deletion: a pattern character is missing from the matched
            // string. Stays on the current node and drops one suffix char.
            if suffix.len() > 1 {
                stack.push(Frame {
                    node,
                    edits_remaining: edits_remaining - 1,
                    suffix: suffix[1..].to_vec(),
                });
            } else if suffix.len() == 1 {
                arena[node as usize].is_final = true;
            }

            // Substitution: shares the insertion node's wildcard edge, but
            // advances the suffix.
            if !suffix.is_empty() {
                let substitution_node = get_or_insert_edge(&mut arena, node, WILDCARD);
                if suffix.len() == 1 {
                    arena[substitution_node as usize].is_final = true;
                } else {
                    stack.push(Frame {
                        node: substitution_node,
                        edits_remaining: edits_remaining - 1,
                        suffix: suffix[1..].to_vec(),
                    });
                }
            }

            // Transposition: the next two characters are swapped in the
            // matched string relative to the pattern. Always allocates a
            // fresh node rather than reusing an existing edge under `c_b`,
            // since the continuation (first char prepended to the tail)
            // differs from whatever that edge would otherwise mean.
            if suffix.len() > 1 {
                let (c_a, c_b) = (suffix[0], suffix[1]);
                let transpose_node = arena.len() as NodeId;
                arena.push(Node::default());
                arena[node as usize].edges.insert(c_b, transpose_node);
                // Always continue with c_a, even when it's the last character:
                // finality is only ever set once a literal char is consumed,
                // never as a side effect of the transposition edge itself.
                let mut tail = vec![c_a];
                tail.extend_from_slice(&suffix[2..]);
                stack.push(Frame {
                    node: transpose_node,
                    edits_remaining: edits_remaining - 1,
                    suffix: tail,
                });
            }
        }

        TokenSet { arena, root }
    }

    /// The automaton accepting exactly the strings accepted by both `self`
    /// and `other`. Terminates as long as `self` is acyclic (true of any
    /// automaton built from `from_sorted_vocabulary`), even when `other`
    /// contains wildcard self-loops.
    pub fn intersect(&self, other: &TokenSet) -> TokenSet {
        let mut arena = vec![Node {
            is_final: self.is_final(self.root) && other.is_final(other.root),
            edges: BTreeMap::new(),
        }];
        let out_root: NodeId = 0;
        let mut queue = VecDeque::new();
        queue.push_back((self.root, other.root, out_root));

        while let Some((l, r, out)) = queue.pop_front() {
            let left_edges: Vec<(char, NodeId)> = self
                .node(l)
                .edges
                .iter()
                .map(|(&c, &n)| (c, n))
                .collect();
            let right_edges: Vec<(char, NodeId)> = other
                .node(r)
                .edges
                .iter()
                .map(|(&c, &n)| (c, n))
                .collect();

            for &(ll, lchild) in &left_edges {
                for &(rl, rchild) in &right_edges {
                    if ll != rl && rl != WILDCARD {
                        continue;
                    }
                    let is_final = self.is_final(lchild) && other.is_final(rchild);
                    let existing = arena[out as usize].edges.get(&ll).copied();
                    let out_child = match existing {
                        Some(id) => {
                            if is_final {
                                arena[id as usize].is_final = true;
                            }
                            id
                        }
                        None => {
                            let id = arena.len() as NodeId;
                            arena.push(Node {
                                is_final,
                                edges: BTreeMap::new(),
                            });
                            arena[out as usize].edges.insert(ll, id);
                            id
                        }
                    };
                    queue.push_back((lchild, rchild, out_child));
                }
            }
        }

        TokenSet { arena, root: out_root }
    }

    /// Enumerates every accepted string. Only safe on finite automata
    /// (vocabulary automata and intersection results); an automaton with a
    /// wildcard self-loop never terminates here.
    pub fn to_array(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut path = String::new();
        self.dfs(self.root, &mut path, &mut out);
        out
    }

    fn dfs(&self, node: NodeId, path: &mut String, out: &mut Vec<String>) {
        let n = self.node(node);
        if n.is_final {
            out.push(path.clone());
        }
        for (&label, &child) in &n.edges {
            path.push(label);
            self.dfs(child, path, out);
            path.pop();
        }
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }
}

fn canonical_key(arena: &[Node], node: NodeId) -> String {
    let n = &arena[node as usize];
    let mut key = String::with_capacity(8);
    key.push(if n.is_final { '1' } else { '0' });
    for (&label, &child) in &n.edges {
        key.push(label);
        key.push('\u{1}');
        key.push_str(itoa(child).as_str());
        key.push('\u{1}');
    }
    key
}

fn itoa(n: NodeId) -> String {
    n.to_string()
}
