//! Expression trees: a mutable arena used while building, and the immutable
//! [`Expression`] it finishes into.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

use crate::error::{FilterError, FilterResult};
use crate::operand::{Constant, FormRef, Operand};
use crate::operator::Operator;

/// Handle to a node inside a [`TreeBuilder`].
///
/// Handles are only meaningful for the builder that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Value held by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    Operator(Operator),
    Operand(Operand),
}

impl From<Operator> for NodeValue {
    fn from(op: Operator) -> Self {
        NodeValue::Operator(op)
    }
}

impl From<Operand> for NodeValue {
    fn from(operand: Operand) -> Self {
        NodeValue::Operand(operand)
    }
}

impl From<Constant> for NodeValue {
    fn from(c: Constant) -> Self {
        NodeValue::Operand(c.into())
    }
}

impl From<FormRef> for NodeValue {
    fn from(f: FormRef) -> Self {
        NodeValue::Operand(f.into())
    }
}

/// What can be attached below a node: an existing node, or an operand that
/// gets wrapped in a new leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Node(NodeId),
    Operand(Operand),
}

impl From<NodeId> for Child {
    fn from(id: NodeId) -> Self {
        Child::Node(id)
    }
}

impl From<Operand> for Child {
    fn from(operand: Operand) -> Self {
        Child::Operand(operand)
    }
}

impl From<Constant> for Child {
    fn from(c: Constant) -> Self {
        Child::Operand(c.into())
    }
}

impl From<FormRef> for Child {
    fn from(f: FormRef) -> Self {
        Child::Operand(f.into())
    }
}

#[derive(Debug, Clone, Default)]
struct Node {
    value: Option<NodeValue>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// Arena of nodes used to assemble an expression.
///
/// Nodes are addressed by [`NodeId`]; nothing is owned by another node, so
/// children can be attached, replaced, and revisited freely.
///
/// # Example
///
/// ```
/// use mstr_filter_rs::{Constant, DataType, Operator, TreeBuilder};
///
/// let mut tree = TreeBuilder::new();
/// let root = tree.root();
/// tree.set_value(root, Operator::Greater);
/// tree.attach_left(root, Constant::typed(5, DataType::Real));
/// tree.attach_right(root, Constant::typed(3, DataType::Real));
///
/// let expression = tree.finish().unwrap();
/// assert_eq!(expression.to_string(), "( 5 > 3 )");
/// ```
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Creates a builder holding one empty root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocates an empty, detached node.
    pub fn new_node(&mut self) -> NodeId {
        self.nodes.push(Node::default());
        NodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn value(&self, id: NodeId) -> Option<&NodeValue> {
        self.node(id).value.as_ref()
    }

    /// Sets the value of `id`, replacing any previous value.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<NodeValue>) {
        self.node_mut(id).value = Some(value.into());
    }

    /// Attaches `child` as the left child of `id`, replacing any existing one.
    /// Returns the attached node.
    pub fn attach_left(&mut self, id: NodeId, child: impl Into<Child>) -> NodeId {
        let child = self.child_node(child.into());
        self.node_mut(id).left = Some(child);
        child
    }

    /// Attaches `child` as the right child of `id`, replacing any existing one.
    /// Returns the attached node.
    pub fn attach_right(&mut self, id: NodeId, child: impl Into<Child>) -> NodeId {
        let child = self.child_node(child.into());
        self.node_mut(id).right = Some(child);
        child
    }

    fn child_node(&mut self, child: Child) -> NodeId {
        match child {
            Child::Node(id) => id,
            Child::Operand(operand) => {
                let id = self.new_node();
                self.set_value(id, operand);
                id
            }
        }
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    /// True when `id` has neither child.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        let node = self.node(id);
        node.left.is_none() && node.right.is_none()
    }

    /// Checks the tree under the root and freezes it.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::IncompleteTree`] when a node has no value, a
    /// leaf holds an operator, an operand has children, or an operator's
    /// populated children do not match its arity.
    pub fn finish(self) -> FilterResult<Expression> {
        self.freeze(self.root, 0)
    }

    fn freeze(&self, id: NodeId, depth: usize) -> FilterResult<Expression> {
        if depth > self.nodes.len() {
            return Err(FilterError::incomplete("cycle between nodes"));
        }

        let node = self.node(id);
        match &node.value {
            None => Err(FilterError::incomplete(format!("node {} has no value", id.0))),
            Some(NodeValue::Operand(operand)) => {
                if self.is_leaf(id) {
                    Ok(Expression::Leaf(operand.clone()))
                } else {
                    Err(FilterError::incomplete(format!(
                        "operand {} has children",
                        operand
                    )))
                }
            }
            Some(NodeValue::Operator(operator)) => {
                let children: Vec<NodeId> = [node.left, node.right].into_iter().flatten().collect();
                if children.len() != operator.arity() {
                    return Err(FilterError::incomplete(format!(
                        "operator {} expects {} operand(s), found {}",
                        operator,
                        operator.arity(),
                        children.len()
                    )));
                }
                let operands = children
                    .into_iter()
                    .map(|child| self.freeze(child, depth + 1))
                    .collect::<FilterResult<Vec<_>>>()?;
                Ok(Expression::Operation {
                    operator: *operator,
                    operands,
                })
            }
        }
    }
}

/// A finished filter expression.
///
/// Every operation holds exactly as many operands as its operator's arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Leaf(Operand),
    Operation {
        operator: Operator,
        operands: Vec<Expression>,
    },
}

impl Expression {
    pub fn leaf(operand: impl Into<Operand>) -> Self {
        Expression::Leaf(operand.into())
    }

    /// Combines two expressions with a binary operator.
    pub fn binary(operator: Operator, left: Expression, right: Expression) -> FilterResult<Self> {
        if operator.is_unary() {
            return Err(FilterError::incomplete(format!(
                "operator {} takes one operand",
                operator
            )));
        }
        Ok(Expression::Operation {
            operator,
            operands: vec![left, right],
        })
    }

    /// Negates an expression.
    pub fn negate(inner: Expression) -> Self {
        Expression::Operation {
            operator: Operator::Not,
            operands: vec![inner],
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Expression::Leaf(_))
    }

    /// The top-level operator, if this is not a leaf.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Expression::Leaf(_) => None,
            Expression::Operation { operator, .. } => Some(*operator),
        }
    }

    /// Maps the expression into the `{operator, operands}` JSON the server
    /// expects. Leaves map to their operand payload.
    pub fn to_payload(&self) -> Value {
        match self {
            Expression::Leaf(operand) => operand.to_payload(),
            Expression::Operation { operator, operands } => json!({
                "operator": operator.expression_name(),
                "operands": operands.iter().map(Expression::to_payload).collect::<Vec<_>>(),
            }),
        }
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_payload().serialize(serializer)
    }
}

/// Fully parenthesized infix text, accepted back by the lexer.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Leaf(operand) => write!(f, "{}", operand),
            Expression::Operation { operator, operands } => match operands.as_slice() {
                [inner] => write!(f, "( {} {} )", operator, inner),
                [left, right] => write!(f, "( {} {} {} )", left, operator, right),
                _ => write!(f, "( {} )", operator),
            },
        }
    }
}
