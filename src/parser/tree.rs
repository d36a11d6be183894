//! Concrete parse tree
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Recovery
//! detaches nodes from their parent; detached nodes stay in the arena so ids
//! held elsewhere remain valid, they just stop being reachable from the root.

use super::lexer::Token;
use crate::grammar::{Symbol, END_MARKER};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeLabel {
    Symbol(Symbol),
    /// Leaf standing for an ε-production.
    Epsilon,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub label: NodeLabel,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Set once a terminal node is matched.
    pub token: Option<Token>,
}

#[derive(Debug, Clone)]
pub struct ParseTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl ParseTree {
    pub fn new(root: Symbol) -> Self {
        ParseTree {
            nodes: vec![TreeNode {
                label: NodeLabel::Symbol(root),
                parent: None,
                children: Vec::new(),
                token: None,
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn add_child(&mut self, parent: NodeId, label: NodeLabel) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            label,
            parent: Some(parent),
            children: Vec::new(),
            token: None,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn attach_token(&mut self, id: NodeId, token: Token) {
        self.nodes[id.0].token = Some(token);
    }

    /// Unlinks a node from its parent. Detaching the root is a no-op.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != id);
        }
    }

    fn display_label(&self, id: NodeId) -> String {
        let node = self.node(id);
        match &node.label {
            NodeLabel::Epsilon => "epsilon".to_string(),
            NodeLabel::Symbol(Symbol::Terminal(name)) if name == END_MARKER => name.clone(),
            NodeLabel::Symbol(symbol) => match &node.token {
                Some(token) if symbol.is_terminal() => {
                    format!("({}, {})", token.kind, token.lexeme)
                }
                _ => symbol.to_string(),
            },
        }
    }

    /// Box-drawing rendering, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.display_label(self.root));
        out.push('\n');

        // (node, prefix inherited from ancestors, is last sibling)
        let mut pending: Vec<(NodeId, String, bool)> = Vec::new();
        let children = self.children(self.root);
        for (i, child) in children.iter().enumerate().rev() {
            pending.push((*child, String::new(), i + 1 == children.len()));
        }

        while let Some((id, prefix, last)) = pending.pop() {
            out.push_str(&prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(&self.display_label(id));
            out.push('\n');

            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            let children = self.children(id);
            for (i, child) in children.iter().enumerate().rev() {
                pending.push((*child, child_prefix.clone(), i + 1 == children.len()));
            }
        }

        out
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::TokenKind;

    fn nt(name: &str) -> NodeLabel {
        NodeLabel::Symbol(Symbol::NonTerminal(name.to_string()))
    }

    fn t(name: &str) -> NodeLabel {
        NodeLabel::Symbol(Symbol::Terminal(name.to_string()))
    }

    #[test]
    fn test_render_box_drawing() {
        let mut tree = ParseTree::new(Symbol::NonTerminal("S".to_string()));
        let root = tree.root();
        let a = tree.add_child(root, nt("A"));
        let id = tree.add_child(a, t("ID"));
        tree.attach_token(id, Token::new(1, TokenKind::Id, "x"));
        tree.add_child(a, NodeLabel::Epsilon);
        let end = tree.add_child(root, t("$"));
        tree.attach_token(end, Token::eof(1));

        assert_eq!(
            tree.render(),
            "S\n├── A\n│   ├── (ID, x)\n│   └── epsilon\n└── $\n"
        );
    }

    #[test]
    fn test_detach_removes_from_parent() {
        let mut tree = ParseTree::new(Symbol::NonTerminal("S".to_string()));
        let root = tree.root();
        let a = tree.add_child(root, t("a"));
        let b = tree.add_child(root, t("b"));

        tree.detach(a);

        assert_eq!(tree.children(root), &[b]);
        assert_eq!(tree.node(a).parent, None);
        assert_eq!(tree.render(), "S\n└── b\n");

        tree.detach(root);
        assert_eq!(tree.children(root), &[b]);
    }
}
