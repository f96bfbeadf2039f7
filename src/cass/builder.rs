//! Record deserialization: node table, tree shape, use-chains
//!
//! This module turns the token stream of one record into a [`Tree`]
//! through three strictly ordered passes:
//!
//! 1. Node table construction: consume tokens in declaration order,
//!    materialize one node per tagged token, validate the declared count.
//! 2. Tree reconstruction: rebuild parent/child structure from the
//!    preorder table and the declared arities, using an explicit cursor
//!    and an explicit slot stack. No recursion, no sub-slicing.
//! 3. Use-chain resolution: convert raw prev/next indices into node ids
//!    against the final table (indices may point forward in the stream).
//!
//! Any inconsistency between declared and observed structure fails the
//! whole record; a partial tree is never produced.

use crate::cass::config::Config;
use crate::cass::error::RecordError;
use crate::cass::node::{Node, NodeId, NodeKind};
use crate::cass::token::{tokenize, RecordToken};
use crate::cass::tree::Tree;

/// Parse one line into a tree. Blank (or whitespace-only) lines yield
/// `Ok(None)`; they are not an error.
pub fn parse_record(line: &str, config: &Config) -> Result<Option<Tree>, RecordError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let tokens = tokenize(line)?;
    deserialize_tokens(&tokens, config).map(Some)
}

/// Deserialize a tokenized record into a tree.
pub fn deserialize_tokens(tokens: &[RecordToken], config: &Config) -> Result<Tree, RecordError> {
    let mut cursor = Cursor::new(tokens);

    let declared = cursor.expect_count("node count")?;

    // The declared count is untrusted wire data; it only sizes the
    // allocation up to what the token stream could actually produce.
    let mut nodes: Vec<Node> = Vec::with_capacity(declared.min(tokens.len()));
    let mut leaves: Vec<NodeId> = Vec::new();
    let mut pending_uses: Vec<(NodeId, i64, i64)> = Vec::new();

    // One-time interpretation of a leading 'S' field as the standalone
    // function-signature descriptor. Anywhere later in the stream, 'S'
    // means string literal.
    let mut function_signature = None;
    if let Some(RecordToken::Field(field)) = cursor.peek() {
        if field.starts_with('S') {
            let label = &field[1..];
            function_signature = Some(NodeId(nodes.len()));
            nodes.push(Node::function_signature(label, config));
            cursor.advance();
        }
    }

    while let Some(token) = cursor.next() {
        let field = match token {
            RecordToken::Field(field) => field,
            RecordToken::Int(value) => {
                return Err(RecordError::UnknownNodeTag(value.to_string()));
            }
        };
        let mut chars = field.chars();
        let tag = chars.next().expect("lexer never yields empty fields");
        let label = chars.as_str();
        let id = NodeId(nodes.len());
        match tag {
            'I' => {
                let arity = cursor.expect_count("child arity")?;
                if arity == 0 {
                    return Err(RecordError::Malformed(format!(
                        "internal node {:?} declares zero children",
                        field
                    )));
                }
                nodes.push(Node::internal(label, arity, config)?);
            }
            'N' => {
                nodes.push(Node::leaf(NodeKind::NumberLiteral, label, config));
                leaves.push(id);
            }
            'C' => {
                nodes.push(Node::leaf(NodeKind::CharLiteral, label, config));
                leaves.push(id);
            }
            'S' => {
                nodes.push(Node::leaf(NodeKind::StringLiteral, label, config));
                leaves.push(id);
            }
            'V' => {
                nodes.push(Node::leaf(NodeKind::GlobalVariable, label, config));
                leaves.push(id);
            }
            'F' => {
                nodes.push(Node::leaf(NodeKind::GlobalFunction, label, config));
                leaves.push(id);
            }
            'v' | 'f' => {
                let kind = if tag == 'v' {
                    NodeKind::LocalVariable
                } else {
                    NodeKind::LocalFunction
                };
                let prev = cursor.expect_int("prev-use index")?;
                let next = cursor.expect_int("next-use index")?;
                nodes.push(Node::leaf(kind, label, config));
                pending_uses.push((id, prev, next));
                leaves.push(id);
            }
            // Error nodes carry no label payload; any remainder is dropped.
            'E' => {
                nodes.push(Node::leaf(NodeKind::Error, "", config));
                leaves.push(id);
            }
            _ => return Err(RecordError::UnknownNodeTag(field.clone())),
        }
    }

    if nodes.len() != declared {
        return Err(RecordError::CountMismatch {
            declared,
            actual: nodes.len(),
        });
    }

    resolve_use_chains(&mut nodes, &pending_uses)?;

    let root = NodeId(if function_signature.is_some() { 1 } else { 0 });
    reconstruct(&mut nodes, root)?;

    Ok(Tree::new(nodes, leaves, root, function_signature, *config))
}

/// Resolve raw prev/next-use indices against the final node table.
/// Negative values are the "no such use" sentinel. Runs strictly after
/// the full table exists, because indices may point to nodes declared
/// later in the stream.
fn resolve_use_chains(
    nodes: &mut [Node],
    pending: &[(NodeId, i64, i64)],
) -> Result<(), RecordError> {
    let len = nodes.len();
    let resolve = |raw: i64| -> Result<Option<NodeId>, RecordError> {
        if raw < 0 {
            return Ok(None);
        }
        let index = raw as usize;
        if index >= len {
            return Err(RecordError::UseIndexOutOfRange { index, len });
        }
        Ok(Some(NodeId(index)))
    };
    for &(id, prev, next) in pending {
        nodes[id.index()].prev_use = resolve(prev)?;
        nodes[id.index()].next_use = resolve(next)?;
    }
    Ok(())
}

/// Rebuild parent/child structure from the preorder table.
///
/// Decodes a preorder traversal where each node carries its own arity:
/// a single left-to-right pass with a stack of parents whose child slots
/// are still open. The pass must consume the table exactly.
fn reconstruct(nodes: &mut [Node], root: NodeId) -> Result<(), RecordError> {
    let total = nodes.len() - root.index();
    if total == 0 {
        return Err(RecordError::TreeShapeMismatch { consumed: 0, total: 0 });
    }

    let mut open: Vec<NodeId> = Vec::new();
    for index in root.index()..nodes.len() {
        let id = NodeId(index);
        match open.last() {
            Some(&parent) => {
                let child_index = nodes[parent.index()].children.len();
                nodes[id.index()].parent = Some(parent);
                nodes[id.index()].child_index = child_index;
                nodes[parent.index()].children.push(id);
            }
            None => {
                if id != root {
                    // The root's subtree closed early; these nodes are
                    // unreachable.
                    return Err(RecordError::TreeShapeMismatch {
                        consumed: index - root.index(),
                        total,
                    });
                }
            }
        }
        if nodes[id.index()].arity > 0 {
            open.push(id);
        } else {
            while let Some(&top) = open.last() {
                if nodes[top.index()].children.len() == nodes[top.index()].arity {
                    open.pop();
                } else {
                    break;
                }
            }
        }
    }

    if !open.is_empty() {
        // Ran out of nodes with child slots still unfilled.
        return Err(RecordError::TreeShapeMismatch {
            consumed: total,
            total,
        });
    }
    Ok(())
}

/// Token cursor with typed expectations.
struct Cursor<'a> {
    tokens: &'a [RecordToken],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [RecordToken]) -> Cursor<'a> {
        Cursor { tokens, position: 0 }
    }

    fn peek(&self) -> Option<&'a RecordToken> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn next(&mut self) -> Option<&'a RecordToken> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Next token as a signed integer (use indices may be negative).
    fn expect_int(&mut self, what: &str) -> Result<i64, RecordError> {
        match self.next() {
            Some(RecordToken::Int(value)) => Ok(*value),
            Some(RecordToken::Field(field)) => Err(RecordError::Malformed(format!(
                "expected {}, found {:?}",
                what, field
            ))),
            None => Err(RecordError::Malformed(format!(
                "record ended while expecting {}",
                what
            ))),
        }
    }

    /// Next token as a non-negative integer.
    fn expect_count(&mut self, what: &str) -> Result<usize, RecordError> {
        let value = self.expect_int(what)?;
        usize::try_from(value)
            .map_err(|_| RecordError::Malformed(format!("negative {}: {}", what, value)))
    }
}
