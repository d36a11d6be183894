// AST (Abstract Syntax Tree) definitions for C-minus

use serde::Serialize;

/// Declared type of a variable, parameter or function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSpec {
    Int,
    Void,
}

impl TypeSpec {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "int" => Some(TypeSpec::Int),
            "void" => Some(TypeSpec::Void),
            _ => None,
        }
    }

    pub fn lexeme(self) -> &'static str {
        match self {
            TypeSpec::Int => "int",
            TypeSpec::Void => "void",
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Additive
    Add,
    Sub,
    // Multiplicative
    Mul,
    // Relational
    Lt,
    Eq,
    Le,
}

impl BinOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "+" => Some(BinOp::Add),
            "-" => Some(BinOp::Sub),
            "*" => Some(BinOp::Mul),
            "<" => Some(BinOp::Lt),
            "==" => Some(BinOp::Eq),
            "<=" => Some(BinOp::Le),
            _ => None,
        }
    }

    pub fn lexeme(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Lt => "<",
            BinOp::Eq => "==",
            BinOp::Le => "<=",
        }
    }

    /// Export tag of the operator's precedence class.
    pub fn kind(self) -> NodeKind {
        match self {
            BinOp::Add | BinOp::Sub => NodeKind::AddOp,
            BinOp::Mul => NodeKind::MulOp,
            BinOp::Lt | BinOp::Eq | BinOp::Le => NodeKind::RelOp,
        }
    }
}

/// Root of a compilation unit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Var {
        ty: TypeSpec,
        name: String,
        line: usize,
    },
    Array {
        ty: TypeSpec,
        name: String,
        /// Size literal as written.
        size: String,
        line: usize,
    },
    Fun {
        ty: TypeSpec,
        name: String,
        params: Vec<Param>,
        body: CompoundStmt,
        line: usize,
    },
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// The `(void)` parameter list marker.
    Void,
    Scalar { ty: TypeSpec, name: String, line: usize },
    Array { ty: TypeSpec, name: String, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundStmt {
    pub declarations: Vec<Declaration>,
    pub statements: Vec<Stmt>,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Compound(CompoundStmt),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    Repeat {
        body: Box<Stmt>,
        condition: Expr,
    },
    Return(Option<Expr>),
    Break { line: usize },
    Empty,
    Expr(Expr),
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Assign {
        target: Var,
        value: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Var(Var),
    Call {
        name: String,
        args: Vec<Expr>,
        line: usize,
    },
    Num(String),
}

/// Variable reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Var {
    Simple {
        name: String,
        line: usize,
    },
    Array {
        name: String,
        index: Box<Expr>,
        line: usize,
    },
}

impl Var {
    pub fn name(&self) -> &str {
        match self {
            Var::Simple { name, .. } | Var::Array { name, .. } => name,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Var::Simple { line, .. } | Var::Array { line, .. } => *line,
        }
    }
}

// ===== Export =====

/// Tag of an exported node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    Program,
    VarDecl,
    ArrayDecl,
    FunDecl,
    Params,
    Param,
    ArrayParam,
    CompoundStmt,
    Assign,
    IfStmt,
    RepeatStmt,
    ReturnStmt,
    BreakStmt,
    EmptyStmt,
    AddOp,
    MulOp,
    RelOp,
    SimpleVar,
    ArrayVar,
    Call,
    Args,
    #[serde(rename = "NUM")]
    Num,
    #[serde(rename = "ID")]
    Id,
    TypeSpecifier,
}

/// Uniform `{NodeType, Value, Children}` view of the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AstRecord {
    #[serde(rename = "NodeType")]
    pub node_type: NodeKind,
    #[serde(rename = "Value")]
    pub value: Option<String>,
    #[serde(rename = "Children")]
    pub children: Vec<AstRecord>,
}

impl AstRecord {
    fn node(node_type: NodeKind, children: Vec<AstRecord>) -> Self {
        AstRecord {
            node_type,
            value: None,
            children,
        }
    }

    fn leaf(node_type: NodeKind, value: &str) -> Self {
        AstRecord {
            node_type,
            value: Some(value.to_string()),
            children: Vec::new(),
        }
    }

    fn type_spec(ty: TypeSpec) -> Self {
        AstRecord::leaf(NodeKind::TypeSpecifier, ty.lexeme())
    }

    fn id(name: &str) -> Self {
        AstRecord::leaf(NodeKind::Id, name)
    }
}

impl Program {
    pub fn to_record(&self) -> AstRecord {
        AstRecord::node(
            NodeKind::Program,
            self.declarations.iter().map(Declaration::to_record).collect(),
        )
    }

    /// Pretty JSON export.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_record())
    }
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Var { name, .. }
            | Declaration::Array { name, .. }
            | Declaration::Fun { name, .. } => name,
        }
    }

    pub fn to_record(&self) -> AstRecord {
        match self {
            Declaration::Var { ty, name, .. } => AstRecord::node(
                NodeKind::VarDecl,
                vec![AstRecord::type_spec(*ty), AstRecord::id(name)],
            ),
            Declaration::Array { ty, name, size, .. } => AstRecord::node(
                NodeKind::ArrayDecl,
                vec![
                    AstRecord::type_spec(*ty),
                    AstRecord::id(name),
                    AstRecord::leaf(NodeKind::Num, size),
                ],
            ),
            Declaration::Fun {
                ty,
                name,
                params,
                body,
                ..
            } => AstRecord::node(
                NodeKind::FunDecl,
                vec![
                    AstRecord::type_spec(*ty),
                    AstRecord::id(name),
                    AstRecord::node(NodeKind::Params, params.iter().map(Param::to_record).collect()),
                    body.to_record(),
                ],
            ),
        }
    }
}

impl Param {
    pub fn to_record(&self) -> AstRecord {
        match self {
            Param::Void => AstRecord::node(
                NodeKind::Param,
                vec![AstRecord::type_spec(TypeSpec::Void)],
            ),
            Param::Scalar { ty, name, .. } => AstRecord::node(
                NodeKind::Param,
                vec![AstRecord::type_spec(*ty), AstRecord::id(name)],
            ),
            Param::Array { ty, name, .. } => AstRecord::node(
                NodeKind::ArrayParam,
                vec![AstRecord::type_spec(*ty), AstRecord::id(name)],
            ),
        }
    }
}

impl CompoundStmt {
    pub fn to_record(&self) -> AstRecord {
        let children = self
            .declarations
            .iter()
            .map(Declaration::to_record)
            .chain(self.statements.iter().map(Stmt::to_record))
            .collect();
        AstRecord::node(NodeKind::CompoundStmt, children)
    }
}

impl Stmt {
    pub fn to_record(&self) -> AstRecord {
        match self {
            Stmt::Compound(block) => block.to_record(),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut children = vec![condition.to_record(), then_branch.to_record()];
                if let Some(else_branch) = else_branch {
                    children.push(else_branch.to_record());
                }
                AstRecord::node(NodeKind::IfStmt, children)
            }
            Stmt::Repeat { body, condition } => AstRecord::node(
                NodeKind::RepeatStmt,
                vec![body.to_record(), condition.to_record()],
            ),
            Stmt::Return(value) => AstRecord::node(
                NodeKind::ReturnStmt,
                value.iter().map(Expr::to_record).collect(),
            ),
            Stmt::Break { .. } => AstRecord::node(NodeKind::BreakStmt, Vec::new()),
            Stmt::Empty => AstRecord::node(NodeKind::EmptyStmt, Vec::new()),
            Stmt::Expr(expr) => expr.to_record(),
        }
    }
}

impl Expr {
    pub fn to_record(&self) -> AstRecord {
        match self {
            Expr::Assign { target, value } => AstRecord::node(
                NodeKind::Assign,
                vec![target.to_record(), value.to_record()],
            ),
            Expr::Binary { op, left, right } => AstRecord {
                node_type: op.kind(),
                value: Some(op.lexeme().to_string()),
                children: vec![left.to_record(), right.to_record()],
            },
            Expr::Var(var) => var.to_record(),
            Expr::Call { name, args, .. } => AstRecord::node(
                NodeKind::Call,
                vec![
                    AstRecord::id(name),
                    AstRecord::node(NodeKind::Args, args.iter().map(Expr::to_record).collect()),
                ],
            ),
            Expr::Num(literal) => AstRecord::leaf(NodeKind::Num, literal),
        }
    }
}

impl Var {
    pub fn to_record(&self) -> AstRecord {
        match self {
            Var::Simple { name, .. } => {
                AstRecord::node(NodeKind::SimpleVar, vec![AstRecord::id(name)])
            }
            Var::Array { name, index, .. } => AstRecord::node(
                NodeKind::ArrayVar,
                vec![AstRecord::id(name), index.to_record()],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_shape() {
        let program = Program {
            declarations: vec![Declaration::Var {
                ty: TypeSpec::Int,
                name: "x".to_string(),
                line: 1,
            }],
        };

        let json: serde_json::Value = serde_json::from_str(&program.to_json().unwrap()).unwrap();
        assert_eq!(json["NodeType"], "Program");
        assert_eq!(json["Value"], serde_json::Value::Null);
        assert_eq!(json["Children"][0]["NodeType"], "VarDecl");
        assert_eq!(json["Children"][0]["Children"][0]["Value"], "int");
        assert_eq!(json["Children"][0]["Children"][1]["NodeType"], "ID");
    }

    #[test]
    fn test_absent_children_are_omitted() {
        let stmt = Stmt::If {
            condition: Expr::Num("1".to_string()),
            then_branch: Box::new(Stmt::Empty),
            else_branch: None,
        };

        let record = stmt.to_record();
        assert_eq!(record.node_type, NodeKind::IfStmt);
        assert_eq!(record.children.len(), 2);
    }

    #[test]
    fn test_operator_records_carry_lexeme() {
        let expr = Expr::Binary {
            op: BinOp::Le,
            left: Box::new(Expr::Num("1".to_string())),
            right: Box::new(Expr::Num("2".to_string())),
        };

        let record = expr.to_record();
        assert_eq!(record.node_type, NodeKind::RelOp);
        assert_eq!(record.value.as_deref(), Some("<="));
        assert_eq!(record.children[1].node_type, NodeKind::Num);
    }
}
