//! Uniform, borrowed view over the syntax tree.
//!
//! Inference dispatches on [`NodeKind`] and recurses through
//! [`Node::children`], so it never needs to know how each AST struct is laid
//! out.

use lachs::Span;

use super::expression::{
    Binary, Boolean, Call, Expression, Function, FunctionBody, Ident, Null, Number, Object,
    Property, StringLiteral,
};
use super::statement::{
    Block, ExpressionStatement, ReturnStatement, Statement, VariableDeclaration,
    VariableDeclarator,
};
use super::{NodeId, Program};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    BlockStatement,
    ExpressionStatement,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    ReturnStatement,
    ArrowFunctionExpression,
    CallExpression,
    BinaryExpression,
    ObjectExpression,
    ObjectProperty,
    Identifier,
    BooleanLiteral,
    NumericLiteral,
    StringLiteral,
    NullLiteral,
}

impl NodeKind {
    pub const ALL: [NodeKind; 17] = [
        NodeKind::Program,
        NodeKind::BlockStatement,
        NodeKind::ExpressionStatement,
        NodeKind::VariableDeclaration,
        NodeKind::VariableDeclarator,
        NodeKind::FunctionDeclaration,
        NodeKind::ReturnStatement,
        NodeKind::ArrowFunctionExpression,
        NodeKind::CallExpression,
        NodeKind::BinaryExpression,
        NodeKind::ObjectExpression,
        NodeKind::ObjectProperty,
        NodeKind::Identifier,
        NodeKind::BooleanLiteral,
        NodeKind::NumericLiteral,
        NodeKind::StringLiteral,
        NodeKind::NullLiteral,
    ];

    /// Position in [`NodeKind::ALL`], used as a dispatch index.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::BlockStatement => "BlockStatement",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::VariableDeclarator => "VariableDeclarator",
            NodeKind::FunctionDeclaration => "FunctionDeclaration",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::ArrowFunctionExpression => "ArrowFunctionExpression",
            NodeKind::CallExpression => "CallExpression",
            NodeKind::BinaryExpression => "BinaryExpression",
            NodeKind::ObjectExpression => "ObjectExpression",
            NodeKind::ObjectProperty => "ObjectProperty",
            NodeKind::Identifier => "Identifier",
            NodeKind::BooleanLiteral => "BooleanLiteral",
            NodeKind::NumericLiteral => "NumericLiteral",
            NodeKind::StringLiteral => "StringLiteral",
            NodeKind::NullLiteral => "NullLiteral",
        }
    }

    /// Kinds whose schema declares no child nodes at all.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            NodeKind::Identifier
                | NodeKind::BooleanLiteral
                | NodeKind::NumericLiteral
                | NodeKind::StringLiteral
                | NodeKind::NullLiteral
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What an identifier is doing where it appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentRole {
    /// A use of a name already in scope
    Reference,
    /// A declarator name, a function name or a parameter
    Binding,
    /// An object property key
    Key,
}

#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Block(&'a Block),
    ExpressionStatement(&'a ExpressionStatement),
    VariableDeclaration(&'a VariableDeclaration),
    VariableDeclarator(&'a VariableDeclarator),
    FunctionDeclaration(&'a Function),
    Return(&'a ReturnStatement),
    Arrow(&'a Function),
    Call(&'a Call),
    Binary(&'a Binary),
    Object(&'a Object),
    Property(&'a Property),
    Identifier(&'a Ident, IdentRole),
    Boolean(&'a Boolean),
    Number(&'a Number),
    String(&'a StringLiteral),
    Null(&'a Null),
}

impl<'a> Node<'a> {
    pub fn statement(statement: &'a Statement) -> Self {
        match statement {
            Statement::Expression(e) => Node::ExpressionStatement(e),
            Statement::Declaration(d) => Node::VariableDeclaration(d),
            Statement::Function(f) => Node::FunctionDeclaration(f),
            Statement::Block(b) => Node::Block(b),
            Statement::Return(r) => Node::Return(r),
        }
    }

    pub fn expression(expression: &'a Expression) -> Self {
        match expression {
            Expression::Boolean(b) => Node::Boolean(b),
            Expression::Number(n) => Node::Number(n),
            Expression::String(s) => Node::String(s),
            Expression::Null(n) => Node::Null(n),
            Expression::Ident(i) => Node::Identifier(i, IdentRole::Reference),
            Expression::Call(c) => Node::Call(c),
            Expression::Function(f) => Node::Arrow(f),
            Expression::Binary(b) => Node::Binary(b),
            Expression::Object(o) => Node::Object(o),
        }
    }

    pub fn function_body(body: &'a FunctionBody) -> Self {
        match body {
            FunctionBody::Expression(e) => Node::expression(e),
            FunctionBody::Block(b) => Node::Block(b),
        }
    }

    pub fn binding(ident: &'a Ident) -> Self {
        Node::Identifier(ident, IdentRole::Binding)
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Program(_) => NodeKind::Program,
            Node::Block(_) => NodeKind::BlockStatement,
            Node::ExpressionStatement(_) => NodeKind::ExpressionStatement,
            Node::VariableDeclaration(_) => NodeKind::VariableDeclaration,
            Node::VariableDeclarator(_) => NodeKind::VariableDeclarator,
            Node::FunctionDeclaration(_) => NodeKind::FunctionDeclaration,
            Node::Return(_) => NodeKind::ReturnStatement,
            Node::Arrow(_) => NodeKind::ArrowFunctionExpression,
            Node::Call(_) => NodeKind::CallExpression,
            Node::Binary(_) => NodeKind::BinaryExpression,
            Node::Object(_) => NodeKind::ObjectExpression,
            Node::Property(_) => NodeKind::ObjectProperty,
            Node::Identifier(..) => NodeKind::Identifier,
            Node::Boolean(_) => NodeKind::BooleanLiteral,
            Node::Number(_) => NodeKind::NumericLiteral,
            Node::String(_) => NodeKind::StringLiteral,
            Node::Null(_) => NodeKind::NullLiteral,
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Node::Program(p) => p.id,
            Node::Block(b) => b.id,
            Node::ExpressionStatement(e) => e.id,
            Node::VariableDeclaration(d) => d.id,
            Node::VariableDeclarator(d) => d.id,
            Node::FunctionDeclaration(f) | Node::Arrow(f) => f.id,
            Node::Return(r) => r.id,
            Node::Call(c) => c.id,
            Node::Binary(b) => b.id,
            Node::Object(o) => o.id,
            Node::Property(p) => p.id,
            Node::Identifier(i, _) => i.id,
            Node::Boolean(b) => b.id,
            Node::Number(n) => n.id,
            Node::String(s) => s.id,
            Node::Null(n) => n.id,
        }
    }

    pub fn position(&self) -> &'a Span {
        match *self {
            Node::Program(p) => &p.position,
            Node::Block(b) => &b.position,
            Node::ExpressionStatement(e) => &e.position,
            Node::VariableDeclaration(d) => &d.position,
            Node::VariableDeclarator(d) => &d.position,
            Node::FunctionDeclaration(f) | Node::Arrow(f) => &f.position,
            Node::Return(r) => &r.position,
            Node::Call(c) => &c.position,
            Node::Binary(b) => &b.position,
            Node::Object(o) => &o.position,
            Node::Property(p) => &p.position,
            Node::Identifier(i, _) => &i.position,
            Node::Boolean(b) => &b.position,
            Node::Number(n) => &n.position,
            Node::String(s) => &s.position,
            Node::Null(n) => &n.position,
        }
    }

    /// The declared name, for identifiers in binding position.
    pub fn binding_name(&self) -> Option<&'a str> {
        match *self {
            Node::Identifier(ident, IdentRole::Binding) => Some(&ident.value),
            _ => None,
        }
    }

    /// Structural children in source order.
    pub fn children(&self) -> Vec<Node<'a>> {
        match *self {
            Node::Program(p) => p.body.iter().map(Node::statement).collect(),
            Node::Block(b) => b.body.iter().map(Node::statement).collect(),
            Node::ExpressionStatement(e) => vec![Node::expression(&e.expression)],
            Node::VariableDeclaration(d) => d
                .declarators
                .iter()
                .map(Node::VariableDeclarator)
                .collect(),
            Node::VariableDeclarator(d) => {
                let mut children = vec![Node::binding(&d.name)];
                children.extend(d.init.iter().map(Node::expression));
                children
            }
            Node::FunctionDeclaration(f) | Node::Arrow(f) => {
                let mut children: Vec<Node<'a>> = f.name.iter().map(Node::binding).collect();
                children.extend(f.params.iter().map(Node::binding));
                children.push(Node::function_body(&f.body));
                children
            }
            Node::Return(r) => r.argument.iter().map(Node::expression).collect(),
            Node::Call(c) => {
                let mut children = vec![Node::expression(&c.callee)];
                children.extend(c.args.iter().map(Node::expression));
                children
            }
            Node::Binary(b) => vec![Node::expression(&b.left), Node::expression(&b.right)],
            Node::Object(o) => o.properties.iter().map(Node::Property).collect(),
            Node::Property(p) => vec![
                Node::Identifier(&p.key, IdentRole::Key),
                Node::expression(&p.value),
            ],
            Node::Identifier(..)
            | Node::Boolean(_)
            | Node::Number(_)
            | Node::String(_)
            | Node::Null(_) => vec![],
        }
    }
}
