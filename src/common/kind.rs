//! The closed set of node kinds a compiled script is made of.

/// Exact kind of an AST node.
///
/// Several kinds share a payload with a more generic kind (an argument list is
/// a tuple, a declaration is a binary expression, ...), so the kind is the
/// only reliable way to tell them apart.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::IntoStaticStr,
    strum::EnumIter,
    strum::EnumCount,
    strum::AsRefStr,
)]
pub enum NodeKind {
    // declarations
    ClassNode,
    ConstructorNode,
    MethodNode,
    FieldNode,
    PropertyNode,
    AnnotationNode,

    // statements
    BlockStatement,
    ExpressionStatement,
    ReturnStatement,
    AssertStatement,
    ForStatement,
    WhileStatement,
    DoWhileStatement,
    IfStatement,
    TryCatchStatement,
    CatchStatement,
    SwitchStatement,
    CaseStatement,
    BreakStatement,
    ContinueStatement,
    SynchronizedStatement,
    ThrowStatement,
    EmptyStatement,

    // expressions
    MethodCallExpression,
    StaticMethodCallExpression,
    ConstructorCallExpression,
    BinaryExpression,
    DeclarationExpression,
    TernaryExpression,
    ElvisOperatorExpression,
    PostfixExpression,
    PrefixExpression,
    BooleanExpression,
    NotExpression,
    ClosureExpression,
    TupleExpression,
    ArgumentListExpression,
    ListExpression,
    ClosureListExpression,
    ArrayExpression,
    MapExpression,
    NamedArgumentListExpression,
    MapEntryExpression,
    RangeExpression,
    SpreadExpression,
    SpreadMapExpression,
    MethodPointerExpression,
    UnaryMinusExpression,
    UnaryPlusExpression,
    BitwiseNegationExpression,
    CastExpression,
    ConstantExpression,
    ClassExpression,
    VariableExpression,
    PropertyExpression,
    AttributeExpression,
    FieldExpression,
    RegexExpression,
    GStringExpression,
    BytecodeExpression,
    EmptyExpression,
}

const PACKAGE_ROOT: &str = "scriptview.ast";

impl NodeKind {
    /// Unqualified name, e.g. `BinaryExpression`.
    pub fn simple_name(self) -> &'static str {
        self.into()
    }

    /// Sub-package the kind lives in, relative to the AST root package.
    pub const fn package(self) -> Option<&'static str> {
        match self {
            Self::ClassNode
            | Self::ConstructorNode
            | Self::MethodNode
            | Self::FieldNode
            | Self::PropertyNode
            | Self::AnnotationNode => None,
            Self::BlockStatement
            | Self::ExpressionStatement
            | Self::ReturnStatement
            | Self::AssertStatement
            | Self::ForStatement
            | Self::WhileStatement
            | Self::DoWhileStatement
            | Self::IfStatement
            | Self::TryCatchStatement
            | Self::CatchStatement
            | Self::SwitchStatement
            | Self::CaseStatement
            | Self::BreakStatement
            | Self::ContinueStatement
            | Self::SynchronizedStatement
            | Self::ThrowStatement
            | Self::EmptyStatement => Some("stmt"),
            _ => Some("expr"),
        }
    }

    /// Fully-qualified name, e.g. `scriptview.ast.expr.BinaryExpression`.
    ///
    /// Label templates are keyed by this name.
    pub fn qualified_name(self) -> String {
        match self.package() {
            Some(package) => format!("{PACKAGE_ROOT}.{package}.{}", self.simple_name()),
            None => format!("{PACKAGE_ROOT}.{}", self.simple_name()),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_qualified_names() {
        assert_eq!(
            NodeKind::BinaryExpression.qualified_name(),
            "scriptview.ast.expr.BinaryExpression"
        );
        assert_eq!(
            NodeKind::IfStatement.qualified_name(),
            "scriptview.ast.stmt.IfStatement"
        );
        assert_eq!(NodeKind::ClassNode.qualified_name(), "scriptview.ast.ClassNode");
    }

    #[test]
    fn test_qualified_names_are_unique() {
        let mut names: Vec<_> = NodeKind::iter().map(NodeKind::qualified_name).collect();
        names.sort();
        names.dedup();

        assert_eq!(names.len(), <NodeKind as strum::EnumCount>::COUNT);
    }
}
