//! Display tree built from IR, consumed by tree views and chart layouts.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ir::tree::{
    coordinate, BinaryOperator, Document, Ident, LocalNode, Operand, Stmt, Value,
};
use crate::{Config, VirtualWireStyle};

/// Name of the root node of every display tree.
pub const ROOT_LABEL: &str = "Circuit";

#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

/// Shape of a display tree.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    /// Number of nodes on the longest root-to-leaf path.
    pub depth: usize,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    pub fn leaf(name: impl Into<String>) -> Self {
        Self::new(name, vec![])
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            nodes: 1,
            leaves: usize::from(self.is_leaf()),
            depth: 1,
        };

        for child in &self.children {
            let c = child.stats();
            stats.nodes += c.nodes;
            stats.leaves += c.leaves;
            stats.depth = stats.depth.max(c.depth + 1);
        }

        stats
    }

    /// Nodes in pre-order with their structural identifiers: the root is `0`,
    /// its second child `0-1`.
    ///
    /// Tree widgets key their expanded state on these.
    pub fn walk(&self) -> Vec<(String, &TreeNode)> {
        let mut out = vec![];
        self.collect("0".to_string(), &mut out);
        out
    }

    pub fn paths(&self) -> Vec<String> {
        self.walk().into_iter().map(|(path, _)| path).collect()
    }

    fn collect<'a>(&'a self, path: String, out: &mut Vec<(String, &'a TreeNode)>) {
        out.push((path.clone(), self));
        for (i, child) in self.children.iter().enumerate() {
            child.collect(format!("{path}-{i}"), out);
        }
    }

    /// Hex encoded SHA-256 of the JSON encoding of this tree.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        // Serializing a plain name/children struct cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        hasher.update(&json);
        base16ct::lower::encode_string(&hasher.finalize())
    }
}

/// Maps IR onto a display tree.
#[derive(Default, Clone)]
pub struct TreeBuilder {
    virtual_wire: VirtualWireStyle,
}

impl TreeBuilder {
    pub fn new(conf: &Config) -> Self {
        Self {
            virtual_wire: conf.virtual_wire,
        }
    }

    /// Root is always named `Circuit`. Statements that produce nothing are dropped.
    pub fn build(&self, doc: &Document) -> TreeNode {
        let children: Vec<_> = doc.stmts.iter().filter_map(|s| self.stmt(s)).collect();
        let dropped = doc.stmts.len() - children.len();
        if dropped > 0 {
            tracing::debug!(dropped, "skipped statements in display tree");
        }

        TreeNode::new(ROOT_LABEL, children)
    }

    fn stmt(&self, stmt: &Stmt) -> Option<TreeNode> {
        match stmt {
            Stmt::Local(a, b) => {
                let children = [a, b]
                    .into_iter()
                    .flatten()
                    .filter_map(|n| self.local(n))
                    .collect();
                Some(TreeNode::new("Local", children))
            }
            Stmt::Verify(op) => {
                let children = op.iter().map(|op| self.binop(op)).collect();
                Some(TreeNode::new("Verify", children))
            }
            Stmt::Unrecognized(_) => None,
        }
    }

    /// Assigned expressions only show up in code IR.
    fn local(&self, node: &LocalNode) -> Option<TreeNode> {
        match node {
            LocalNode::String(s) => Some(TreeNode::leaf(s)),
            LocalNode::Ident(ident) => Some(self.ident(ident)),
            LocalNode::Expr(_) => None,
        }
    }

    fn ident(&self, ident: &Ident) -> TreeNode {
        match ident {
            Ident::String(s) => TreeNode::leaf(s),
            Ident::Wire(w) => TreeNode::leaf(format!(
                "wire!({}, {})",
                coordinate(w.row),
                coordinate(w.column)
            )),
            Ident::VirtualWire(vw) => match self.virtual_wire {
                VirtualWireStyle::Macro => {
                    TreeNode::leaf(format!("v_wire!({})", coordinate(vw.index)))
                }
                VirtualWireStyle::Verbose => {
                    let value = match &vw.value {
                        Some(v) => value_label(v),
                        None => "none".to_string(),
                    };
                    TreeNode::leaf(format!(
                        "VW(index: {}, value: {value})",
                        coordinate(vw.index)
                    ))
                }
            },
            Ident::Other { tag, label } => {
                TreeNode::leaf(label.as_deref().unwrap_or(tag.as_str()))
            }
        }
    }

    fn operand(&self, operand: &Operand) -> TreeNode {
        match operand {
            Operand::Ident(ident) => self.ident(ident),
            Operand::Value(v) => TreeNode::leaf(format!("Value({})", value_label(v))),
            Operand::BinaryOperator(op) => self.binop(op),
            Operand::Nested { tag, inner } => {
                let children = inner.iter().map(|o| self.operand(o)).collect();
                TreeNode::new(tag, children)
            }
            Operand::Label(s) => TreeNode::leaf(s),
        }
    }

    fn binop(&self, op: &BinaryOperator) -> TreeNode {
        // Left operand always comes first
        let children = [&op.lhs, &op.rhs]
            .into_iter()
            .flatten()
            .map(|o| self.operand(o))
            .collect();
        TreeNode::new(format!("{}()", op.binop), children)
    }
}

/// `U64: 42`, or just the tag for unit variants.
fn value_label(value: &Value) -> String {
    match value {
        Value::U64(n) | Value::RandomU64(n) => format!("{}: {n}", value.tag()),
        Value::Random => value.tag().to_string(),
        Value::Other { tag, repr } if repr.is_empty() => tag.clone(),
        Value::Other { tag, repr } => format!("{tag}: {repr}"),
    }
}
