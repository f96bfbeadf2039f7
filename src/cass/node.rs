//! Node model and label normalization
//!
//! A CASS tree is an arena of [`Node`]s addressed by [`NodeId`] (the
//! node's position in the table, which is preorder with the optional
//! function-signature node first). Parent, child, and use-chain relations
//! are ids, not pointers, so the arena stays single-owner while the
//! backpointers remain O(1) lookups.
//!
//! Normalization is a pure function of `(kind, label, annotation, config)`
//! computed exactly once at construction. A node whose policy says its
//! contribution must be dropped carries `suppressed = true` but remains
//! structurally present in the tree.

use crate::cass::config::{AnnotMode, CompoundMode, Config, FunSigMode, GlobalFunMode, GlobalVarMode};
use crate::cass::error::RecordError;
use serde::Serialize;

/// Annotation of compound-statement internal nodes.
pub const COMPOUND_STATEMENT: &str = "#compound_statement#";
/// Annotation of parenthesized-expression internal nodes.
pub const PARENTHESIZED_EXPRESSION: &str = "#parenthesized_expression#";
/// Annotation of argument-list internal nodes.
pub const ARGUMENT_LIST: &str = "#argument_list#";
/// Structural label marking a global-scope node. Inherited verbatim from
/// the upstream tree-generation tool; compared literally, nothing more.
pub const GLOBAL_SCOPE: &str = "$.$";
/// Placeholder label for local (and optionally global) identifiers.
pub const VAR_PLACEHOLDER: &str = "$VAR";
/// Placeholder label for global variables.
pub const GVAR_PLACEHOLDER: &str = "$GVAR";
/// Placeholder label for global functions.
pub const GFUN_PLACEHOLDER: &str = "$GFUN";
/// Replacement label for compound statements in braces mode.
pub const COMPOUND_BRACES: &str = "{#}";

/// Stable node identity: position in the node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The closed set of CASS node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Internal,
    NumberLiteral,
    CharLiteral,
    StringLiteral,
    GlobalVariable,
    GlobalFunction,
    LocalVariable,
    LocalFunction,
    FunctionSignature,
    Error,
}

impl NodeKind {
    /// Leaves are everything except internal and function-signature nodes.
    pub fn is_leaf(self) -> bool {
        !matches!(self, NodeKind::Internal | NodeKind::FunctionSignature)
    }

    /// Global variable or global function.
    pub fn is_global_symbol(self) -> bool {
        matches!(self, NodeKind::GlobalVariable | NodeKind::GlobalFunction)
    }

    /// Local variable or local function: the kinds that carry use-chains.
    pub fn has_use_chain(self) -> bool {
        matches!(self, NodeKind::LocalVariable | NodeKind::LocalFunction)
    }
}

/// One node of a CASS tree. Immutable once the tree is built.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Structural label. For internal nodes this is the part after the
    /// annotation; for leaves it is the raw label (empty for errors).
    pub label: String,
    /// Annotation of internal nodes, both `#` delimiters included.
    pub annotation: Option<String>,
    /// Config-projected label used in all features. Computed once.
    pub normalized: String,
    /// True when this node's contribution is dropped from feature output.
    pub suppressed: bool,
    /// Declared child arity (0 for leaves and function signatures).
    pub arity: usize,
    /// Child slots, filled in order during tree reconstruction.
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Index within the parent's child list.
    pub child_index: usize,
    /// Previous use of the same identifier, for local variables/functions.
    pub prev_use: Option<NodeId>,
    /// Next use of the same identifier, for local variables/functions.
    pub next_use: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, label: String, annotation: Option<String>, arity: usize) -> Node {
        Node {
            kind,
            label,
            annotation,
            normalized: String::new(),
            suppressed: false,
            arity,
            // The arity is untrusted wire data until reconstruction
            // checks it against the table, so it must not size an
            // allocation.
            children: Vec::new(),
            parent: None,
            child_index: 0,
            prev_use: None,
            next_use: None,
        }
    }

    /// Construct the standalone function-signature node.
    pub(crate) fn function_signature(label: &str, config: &Config) -> Node {
        let mut node = Node::new(NodeKind::FunctionSignature, label.to_string(), None, 0);
        node.normalized = match config.fsig_mode {
            FunSigMode::Ignore => String::new(),
            FunSigMode::Emit => label.to_string(),
        };
        node
    }

    /// Construct an internal node from its raw `#annotation#structural`
    /// label and declared arity.
    pub(crate) fn internal(raw_label: &str, arity: usize, config: &Config) -> Result<Node, RecordError> {
        let (annotation, structural) = split_internal_label(raw_label)
            .ok_or_else(|| RecordError::MalformedInternalLabel(raw_label.to_string()))?;
        let (normalized, suppressed) = normalize_internal(annotation, structural, config);
        let mut node = Node::new(
            NodeKind::Internal,
            structural.to_string(),
            Some(annotation.to_string()),
            arity,
        );
        node.normalized = normalized;
        node.suppressed = suppressed;
        Ok(node)
    }

    /// Construct a leaf node.
    pub(crate) fn leaf(kind: NodeKind, label: &str, config: &Config) -> Node {
        debug_assert!(kind.is_leaf());
        let (normalized, suppressed) = normalize_leaf(kind, label, config);
        let mut node = Node::new(kind, label.to_string(), None, 0);
        node.normalized = normalized;
        node.suppressed = suppressed;
        node
    }

    /// The raw label as it appeared on the wire (annotation re-attached
    /// for internal nodes).
    pub fn raw_label(&self) -> String {
        match &self.annotation {
            Some(annotation) => format!("{}{}", annotation, self.label),
            None => self.label.clone(),
        }
    }
}

/// Split a raw internal label into `(annotation, structural)`.
///
/// The label must start with `#`, and the annotation body between the two
/// delimiting `#` characters must be non-empty. The returned annotation
/// includes both delimiters.
fn split_internal_label(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix('#')?;
    let close = rest.find('#')?;
    if close == 0 {
        return None;
    }
    // '#' is one byte, so these are valid char boundaries.
    Some((&raw[..close + 2], &raw[close + 2..]))
}

fn normalize_internal(annotation: &str, structural: &str, config: &Config) -> (String, bool) {
    if annotation == COMPOUND_STATEMENT {
        match config.compound_mode {
            CompoundMode::Keep => {}
            CompoundMode::Drop => return (structural.to_string(), true),
            CompoundMode::Braces => return (COMPOUND_BRACES.to_string(), false),
        }
    }
    let normalized = match config.annot_mode {
        AnnotMode::Plain => structural.to_string(),
        AnnotMode::Full => format!("{}{}", annotation, structural),
        AnnotMode::Selective => {
            if annotation == PARENTHESIZED_EXPRESSION || annotation == ARGUMENT_LIST {
                format!("{}{}", annotation, structural)
            } else {
                structural.to_string()
            }
        }
    };
    (normalized, false)
}

fn normalize_leaf(kind: NodeKind, label: &str, config: &Config) -> (String, bool) {
    match kind {
        NodeKind::LocalVariable | NodeKind::LocalFunction => (VAR_PLACEHOLDER.to_string(), false),
        NodeKind::GlobalVariable => match config.gvar_mode {
            GlobalVarMode::Keep => (label.to_string(), false),
            GlobalVarMode::Drop => (label.to_string(), true),
            GlobalVarMode::Generic => (GVAR_PLACEHOLDER.to_string(), false),
            GlobalVarMode::Variable => (VAR_PLACEHOLDER.to_string(), false),
        },
        NodeKind::GlobalFunction => match config.gfun_mode {
            GlobalFunMode::Keep => (label.to_string(), false),
            GlobalFunMode::Drop => (label.to_string(), true),
            GlobalFunMode::Generic => (GFUN_PLACEHOLDER.to_string(), false),
            GlobalFunMode::Variable => {
                if config.gvar_mode == GlobalVarMode::Variable {
                    (VAR_PLACEHOLDER.to_string(), false)
                } else {
                    (GVAR_PLACEHOLDER.to_string(), false)
                }
            }
        },
        _ => (label.to_string(), false),
    }
}
