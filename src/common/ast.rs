//! Types representing the structure of a compiled script.
//!
//! The parser produces a [`ParsedModule`]; the conversion phase turns it into
//! a [`ModuleNode`] whose classes are then refined in place by the later
//! compilation phases.

/// Associate each AST element with its corresponding
/// source code span (for better error reporting).
pub type Span = std::ops::Range<usize>;

// region: modifiers & types

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub visibility: Option<Visibility>,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
    pub is_synchronized: bool,
}

impl Modifiers {
    pub const fn public() -> Self {
        Self {
            visibility: Some(Visibility::Public),
            is_static: false,
            is_final: false,
            is_abstract: false,
            is_synchronized: false,
        }
    }

    pub const fn private() -> Self {
        Self {
            visibility: Some(Visibility::Private),
            ..Self::public()
        }
    }

    #[must_use]
    pub const fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Reference to a type, as written in source.
///
/// `resolved` stays empty until semantic analysis maps the name
/// onto a declared class or a built-in type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub name: String,
    pub dimensions: usize,
    pub resolved: Option<String>,
}

impl TypeName {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            dimensions: 0,
            resolved: None,
        }
    }

    /// The dynamic type used whenever a declaration omits its type (`def`).
    pub fn dynamic() -> Self {
        Self::new("Object")
    }

    #[must_use]
    pub fn array_of(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub param_type: TypeName,
    pub default_value: Option<Expression>,
}

impl Parameter {
    pub fn new<S: Into<String>>(name: S, param_type: TypeName) -> Self {
        Self {
            name: name.into(),
            param_type,
            default_value: None,
        }
    }
}

// endregion

// region: declarations

/// Output of the parsing phase.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedModule {
    pub statements: Vec<Statement>,
    pub methods: Vec<MethodNode>,
    pub classes: Vec<ParsedClass>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedClass {
    pub name: String,
    pub modifiers: Modifiers,
    pub super_class: Option<TypeName>,
    pub interfaces: Vec<TypeName>,
    pub annotations: Vec<AnnotationNode>,
    pub members: Vec<ClassMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Declared with an explicit visibility modifier.
    Field(FieldNode),
    /// Declared without a visibility modifier.
    Property(FieldNode),
    Constructor(String, ConstructorNode),
    Method(MethodNode),
}

/// A compiled unit: every class it declares, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleNode {
    pub name: String,
    pub classes: Vec<ClassNode>,
}

impl ModuleNode {
    /// The script class generated for top-level statements, if any.
    pub fn script_class(&self) -> Option<&ClassNode> {
        self.classes.iter().find(|class| class.is_script)
    }

    /// Top-level statements of the script, which live in the
    /// body of the script class's `run` method.
    pub fn statement_block(&self) -> Option<&Statement> {
        self.script_class()?
            .methods
            .iter()
            .find(|method| method.name == "run" && method.parameters.is_empty())?
            .code
            .as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    pub name: String,
    pub modifiers: Modifiers,
    pub super_class: TypeName,
    pub interfaces: Vec<TypeName>,
    pub annotations: Vec<AnnotationNode>,
    pub constructors: Vec<ConstructorNode>,
    pub methods: Vec<MethodNode>,
    pub fields: Vec<FieldNode>,
    pub properties: Vec<PropertyNode>,
    pub is_script: bool,
    pub generated: bool,
    pub span: Span,
}

impl ClassNode {
    /// The private field storing the value of a property.
    pub fn property_field(&self, property: &PropertyNode) -> Option<&FieldNode> {
        self.fields.get(property.field_index)
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldNode> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn find_property(&self, name: &str) -> Option<&PropertyNode> {
        self.properties.iter().find(|property| property.name == name)
    }

    pub fn has_method(&self, name: &str, arity: usize) -> bool {
        self.methods
            .iter()
            .any(|method| method.name == name && method.parameters.len() == arity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorNode {
    pub modifiers: Modifiers,
    pub parameters: Vec<Parameter>,
    pub annotations: Vec<AnnotationNode>,
    pub code: Option<Statement>,
    pub synthetic: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodNode {
    pub name: String,
    pub modifiers: Modifiers,
    pub return_type: TypeName,
    pub parameters: Vec<Parameter>,
    pub annotations: Vec<AnnotationNode>,
    pub code: Option<Statement>,
    /// Local variables declared by the body; known after semantic analysis.
    pub variable_scope: Option<Vec<String>>,
    pub synthetic: bool,
    pub span: Span,
}

impl MethodNode {
    /// Construct a method generated by the compiler
    /// (as opposed to a parsed one).
    pub fn synthetic<S: Into<String>>(
        name: S,
        modifiers: Modifiers,
        return_type: TypeName,
        parameters: Vec<Parameter>,
        code: Statement,
    ) -> Self {
        Self {
            name: name.into(),
            modifiers,
            return_type,
            parameters,
            annotations: vec![],
            code: Some(code),
            variable_scope: None,
            synthetic: true,
            // did not come from a source file, so does not have a related span
            span: Span::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    pub modifiers: Modifiers,
    pub field_type: TypeName,
    pub annotations: Vec<AnnotationNode>,
    pub initial_expression: Option<Expression>,
    /// Name of the declaring class; filled in by the conversion phase.
    pub owner: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    pub name: String,
    pub modifiers: Modifiers,
    pub property_type: TypeName,
    /// Index of the backing field in [`ClassNode::fields`].
    pub field_index: usize,
    /// Accessor names; known once the accessors have been generated.
    pub getter_name: Option<String>,
    pub setter_name: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationNode {
    pub class_name: TypeName,
    pub members: Vec<(String, Expression)>,
    pub span: Span,
}

// endregion

// region: statements

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub node: Stmt,
    pub span: Span,
}

impl Statement {
    pub const fn new(node: Stmt, span: Span) -> Self {
        Self { node, span }
    }

    /// Construct an internally used statement
    /// (as opposed to a parsed one).
    pub const fn internal(node: Stmt) -> Self {
        // did not come from a source file, so does not have a related span
        Self::new(node, 0..0)
    }

    pub fn block(statements: Vec<Self>) -> Self {
        Self::internal(Stmt::Block(BlockStatement {
            statements,
            declared_variables: None,
        }))
    }

    pub fn expression(expression: Expression) -> Self {
        let span = expression.span.clone();
        Self::new(Stmt::Expression(Box::new(expression)), span)
    }

    pub fn empty() -> Self {
        Self::internal(Stmt::Empty)
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self.node, Stmt::Empty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(BlockStatement),
    Expression(Box<Expression>),
    Return(Box<Expression>),
    Assert(AssertStatement),
    For(ForStatement),
    While(LoopStatement),
    DoWhile(LoopStatement),
    If(IfStatement),
    TryCatch(TryCatchStatement),
    Switch(SwitchStatement),
    Break,
    Continue,
    Synchronized(SynchronizedStatement),
    Throw(Box<Expression>),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    /// Names declared directly in this block; known after semantic analysis.
    pub declared_variables: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssertStatement {
    pub condition: Box<Expression>,
    pub message: Box<Expression>,
}

/// Both loop flavours share this node: `for (x in xs)` carries its variable,
/// the classic `for (init; cond; update)` has none and keeps its three parts
/// in a closure list as its collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub variable: Option<Parameter>,
    pub collection: Box<Expression>,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopStatement {
    pub condition: Box<Expression>,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Box<Expression>,
    pub if_block: Box<Statement>,
    pub else_block: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryCatchStatement {
    pub try_block: Box<Statement>,
    pub catches: Vec<CatchStatement>,
    pub finally_block: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchStatement {
    pub variable: Parameter,
    pub code: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub expression: Box<Expression>,
    pub cases: Vec<CaseStatement>,
    pub default: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseStatement {
    pub expression: Expression,
    pub code: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynchronizedStatement {
    pub lock: Box<Expression>,
    pub code: Box<Statement>,
}

// endregion

// region: expressions

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub node: Expr,
    pub span: Span,
    /// Statically known type; filled in during instruction selection.
    pub inferred_type: Option<String>,
}

impl Expression {
    pub const fn new(node: Expr, span: Span) -> Self {
        Self {
            node,
            span,
            inferred_type: None,
        }
    }

    /// Construct an internally used expression
    /// (as opposed to a parsed one).
    pub const fn internal(node: Expr) -> Self {
        // did not come from a source file, so does not have a related span
        Self::new(node, 0..0)
    }

    pub fn variable<S: Into<String>>(name: S) -> Self {
        Self::internal(Expr::Variable(VariableExpression::new(name)))
    }

    pub fn constant(value: Constant) -> Self {
        Self::internal(Expr::Constant(value))
    }

    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    MethodCall(MethodCallExpression),
    StaticMethodCall(StaticMethodCallExpression),
    ConstructorCall(ConstructorCallExpression),
    Binary(BinaryExpression),
    /// `def x = 1`, `int y`: a binary `=` whose left side is being declared.
    Declaration(BinaryExpression),
    Ternary(TernaryExpression),
    /// `a ?: b`; the true branch repeats the tested expression.
    Elvis(TernaryExpression),
    Postfix(UnaryOperation),
    Prefix(UnaryOperation),
    Boolean(Box<Expression>),
    Not(Box<Expression>),
    Closure(ClosureExpression),
    Tuple(Vec<Expression>),
    ArgumentList(Vec<Expression>),
    List(Vec<Expression>),
    ClosureList(Vec<Expression>),
    Array(ArrayExpression),
    Map(Vec<Expression>),
    NamedArgumentList(Vec<Expression>),
    MapEntry(MapEntryExpression),
    Range(RangeExpression),
    Spread(Box<Expression>),
    SpreadMap(Box<Expression>),
    MethodPointer(MethodPointerExpression),
    UnaryMinus(Box<Expression>),
    UnaryPlus(Box<Expression>),
    BitwiseNegation(Box<Expression>),
    Cast(CastExpression),
    Constant(Constant),
    Class(TypeName),
    Variable(VariableExpression),
    Property(PropertyExpression),
    Attribute(PropertyExpression),
    Field(FieldExpression),
    Regex(Box<Expression>),
    GString(GStringExpression),
    /// Raw instructions emitted by class generation.
    Bytecode(Vec<String>),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCallExpression {
    pub object: Box<Expression>,
    pub method: String,
    pub arguments: Box<Expression>,
    pub safe: bool,
    pub implicit_this: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticMethodCallExpression {
    pub owner_type: TypeName,
    pub method: String,
    pub arguments: Box<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SpecialCall {
    This,
    Super,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorCallExpression {
    pub target: TypeName,
    pub arguments: Box<Expression>,
    pub special: Option<SpecialCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operation: String,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TernaryExpression {
    pub condition: Box<Expression>,
    pub true_expression: Box<Expression>,
    pub false_expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperation {
    pub operation: String,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosureExpression {
    /// `None` when the closure relies on the implicit `it` parameter.
    pub parameters: Option<Vec<Parameter>>,
    pub code: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpression {
    pub element_type: TypeName,
    pub expressions: Vec<Expression>,
    pub size_expressions: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntryExpression {
    pub key: Box<Expression>,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpression {
    pub from: Box<Expression>,
    pub to: Box<Expression>,
    pub inclusive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodPointerExpression {
    pub expression: Box<Expression>,
    pub method_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastExpression {
    pub target: TypeName,
    pub expression: Box<Expression>,
    /// `x as T` rather than `(T) x`.
    pub coerce: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    String(String),
}

impl Constant {
    /// Name of the type a constant evaluates to.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "Object",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "int",
            Self::Decimal(_) => "BigDecimal",
            Self::String(_) => "String",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum VariableOrigin {
    This,
    Local,
    Parameter,
    Field,
    Property,
    /// Not declared anywhere: looked up in the script binding at run time.
    Dynamic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpression {
    pub name: String,
    pub declared_type: Option<TypeName>,
    /// What the name refers to; known after semantic analysis.
    pub origin: Option<VariableOrigin>,
}

impl VariableExpression {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            origin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyExpression {
    pub object: Box<Expression>,
    pub property: String,
    pub safe: bool,
    pub spread_safe: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldExpression {
    pub field: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GStringExpression {
    /// Literal fragments; one more than `values` (possibly empty strings).
    pub strings: Vec<Expression>,
    pub values: Vec<Expression>,
}

// endregion
