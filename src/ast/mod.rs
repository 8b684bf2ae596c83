/// AST (Abstract Syntax Tree) module
/// Contains the node type produced by the default grammar
///
/// Submodules:
/// - ast: Node, NodeKind and Operator definitions, plus S-expression rendering
pub mod ast;
