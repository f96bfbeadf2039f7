//! Contextual feature extraction
//!
//! Walks a tree's leaves in order and emits the flat feature sequence
//! collaborators build vocabularies over: each non-suppressed leaf
//! contributes its own normalized label, up to three ancestor triples,
//! adjacent-leaf pairs, and use-chain context pairs. Suppressed nodes
//! contribute nothing and are excluded wherever they would be referenced.

use crate::cass::config::FunSigMode;
use crate::cass::node::NodeId;
use crate::cass::tree::Tree;
use serde::Serialize;

/// The context token of an identifier use: either its slot under its
/// syntactic parent, or (for uses hanging off a global-scope node) the
/// nearest enclosing global symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Context {
    /// Child index and normalized label of the use's parent.
    Slot { index: usize, label: String },
    /// Normalized label of the nearest enclosing global variable or
    /// function.
    Global { label: String },
}

/// One contextual feature emitted for a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Feature {
    /// The leaf's own normalized label.
    Leaf(String),
    /// Ancestor triple: leaf label, child slot on the ancestor path, and
    /// the ancestor's normalized label.
    Ancestor {
        leaf: String,
        slot: usize,
        parent: String,
    },
    /// Adjacent leaves, in leaf order.
    Adjacent { left: String, right: String },
    /// Same identifier used in context `from`, then in context `to`.
    UseChain { from: Context, to: Context },
}

impl Tree {
    /// Resolve the context token of a use site.
    ///
    /// Callers check suppression first; a suppressed node must never be
    /// passed in.
    pub fn context_of(&self, id: NodeId) -> Option<Context> {
        debug_assert!(!self.node(id).suppressed);
        let parent_id = self.node(id).parent?;
        let parent = self.node(parent_id);
        if parent.label != crate::cass::node::GLOBAL_SCOPE {
            if parent.suppressed {
                return None;
            }
            Some(Context::Slot {
                index: self.node(id).child_index,
                label: parent.normalized.clone(),
            })
        } else {
            // Global scope: the context is the first global symbol among
            // the leaves the scope spans.
            let (start, end) = self.leaf_range(parent_id);
            for &leaf_id in &self.leaves()[start..end] {
                let leaf = self.node(leaf_id);
                if leaf.kind.is_global_symbol() {
                    if leaf.suppressed {
                        return None;
                    }
                    return Some(Context::Global {
                        label: leaf.normalized.clone(),
                    });
                }
            }
            None
        }
    }

    /// Emit the tree's flat feature sequence, in leaf order.
    pub fn featurize(&self) -> Vec<Feature> {
        let mut features = Vec::new();
        let leaves = self.leaves();

        for (position, &leaf_id) in leaves.iter().enumerate() {
            let leaf = self.node(leaf_id);
            if leaf.suppressed {
                continue;
            }

            features.push(Feature::Leaf(leaf.normalized.clone()));

            // Up to three ancestor levels. The slot recorded at each
            // level is the child index along the path. A suppressed
            // ancestor ends the walk.
            let mut current = leaf_id;
            for _ in 0..3 {
                let slot = self.node(current).child_index;
                let Some(parent_id) = self.node(current).parent else {
                    break;
                };
                let parent = self.node(parent_id);
                if parent.suppressed {
                    break;
                }
                features.push(Feature::Ancestor {
                    leaf: leaf.normalized.clone(),
                    slot,
                    parent: parent.normalized.clone(),
                });
                current = parent_id;
            }

            if position > 0 {
                let sibling = self.node(leaves[position - 1]);
                if !sibling.suppressed {
                    features.push(Feature::Adjacent {
                        left: sibling.normalized.clone(),
                        right: leaf.normalized.clone(),
                    });
                }
            }
            if position + 1 < leaves.len() {
                let sibling = self.node(leaves[position + 1]);
                if !sibling.suppressed {
                    features.push(Feature::Adjacent {
                        left: leaf.normalized.clone(),
                        right: sibling.normalized.clone(),
                    });
                }
            }

            if let Some(prev_id) = leaf.prev_use {
                if !self.node(prev_id).suppressed {
                    if let (Some(from), Some(to)) =
                        (self.context_of(prev_id), self.context_of(leaf_id))
                    {
                        features.push(Feature::UseChain { from, to });
                    }
                }
            }
            if let Some(next_id) = leaf.next_use {
                if !self.node(next_id).suppressed {
                    if let (Some(from), Some(to)) =
                        (self.context_of(leaf_id), self.context_of(next_id))
                    {
                        features.push(Feature::UseChain { from, to });
                    }
                }
            }
        }

        if self.config().fsig_mode == FunSigMode::Emit {
            if let Some(fs) = self.function_signature() {
                features.push(Feature::Leaf(self.node(fs).normalized.clone()));
            }
        }

        features
    }
}
