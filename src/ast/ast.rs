use std::fmt::{Display, Formatter, Result};

use crate::{lexer::tokens::TokenKind, Span};

/// Operators carried by [`NodeKind::Binary`] and [`NodeKind::Unary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Negate,
    Not,
}

impl Operator {
    pub fn binary(kind: TokenKind) -> Option<Operator> {
        match kind {
            TokenKind::Plus => Some(Operator::Add),
            TokenKind::Dash => Some(Operator::Subtract),
            TokenKind::Star => Some(Operator::Multiply),
            TokenKind::Slash => Some(Operator::Divide),
            TokenKind::Percent => Some(Operator::Modulo),
            TokenKind::Equals => Some(Operator::Equal),
            TokenKind::NotEquals => Some(Operator::NotEqual),
            TokenKind::Less => Some(Operator::Less),
            TokenKind::LessEquals => Some(Operator::LessEqual),
            TokenKind::Greater => Some(Operator::Greater),
            TokenKind::GreaterEquals => Some(Operator::GreaterEqual),
            _ => None,
        }
    }

    pub fn unary(kind: TokenKind) -> Option<Operator> {
        match kind {
            TokenKind::Dash => Some(Operator::Negate),
            TokenKind::Not => Some(Operator::Not),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract | Operator::Negate => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Not => "!",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Identifier(String),
    Number(f64),
    String(String),
    Boolean(bool),
    /// A parenthesised parameter list, only valid as the left side of `->`.
    Arguments(Vec<String>),
    Function {
        params: Vec<String>,
        body: Vec<Node>,
    },
    Call {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    List(Vec<Node>),
    Index {
        target: Box<Node>,
        index: Box<Node>,
    },
    Binary {
        operator: Operator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        operator: Operator,
        operand: Box<Node>,
    },
    Assign {
        target: Box<Node>,
        value: Box<Node>,
    },
    Conditional {
        condition: Box<Node>,
        body: Vec<Node>,
    },
}

/// A syntax tree node. Children are owned, so a tree is moved rather than
/// shared once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn is_assignable(&self) -> bool {
        matches!(self.kind, NodeKind::Identifier(_) | NodeKind::Index { .. })
    }
}

fn write_all(f: &mut Formatter<'_>, nodes: &[Node]) -> Result {
    for node in nodes {
        write!(f, " {}", node)?;
    }
    Ok(())
}

/// Renders the node as an S-expression, e.g. `(+ a (* b c))`.
impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self.kind {
            NodeKind::Identifier(name) => write!(f, "{}", name),
            NodeKind::Number(value) => write!(f, "{}", value),
            NodeKind::String(value) => write!(f, "{:?}", value),
            NodeKind::Boolean(value) => write!(f, "{}", value),
            NodeKind::Arguments(names) => write!(f, "(args {})", names.join(" ")),
            NodeKind::Function { params, body } => {
                write!(f, "(fn ({})", params.join(" "))?;
                write_all(f, body)?;
                write!(f, ")")
            }
            NodeKind::Call { callee, arguments } => {
                write!(f, "(call {}", callee)?;
                write_all(f, arguments)?;
                write!(f, ")")
            }
            NodeKind::List(items) => {
                write!(f, "(list")?;
                write_all(f, items)?;
                write!(f, ")")
            }
            NodeKind::Index { target, index } => write!(f, "(index {} {})", target, index),
            NodeKind::Binary {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", operator, left, right),
            NodeKind::Unary { operator, operand } => write!(f, "({} {})", operator, operand),
            NodeKind::Assign { target, value } => write!(f, "(= {} {})", target, value),
            NodeKind::Conditional { condition, body } => {
                write!(f, "(? {}", condition)?;
                write_all(f, body)?;
                write!(f, ")")
            }
        }
    }
}
