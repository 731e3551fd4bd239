/// Decoded circuit IR. Only `stmts` is traversed; other top-level fields are ignored.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Document {
    pub stmts: Vec<Stmt>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Stmt {
    /// Local assignment like `let x = y;`
    Local(Option<LocalNode>, Option<LocalNode>),
    /// `None` when the payload is not an object.
    Verify(Option<BinaryOperator>),
    /// Statement with an unknown tag, or not a single-key object at all.
    Unrecognized(Option<String>),
}

/// One side of a `Local` statement.
#[derive(PartialEq, Debug, Clone)]
pub enum LocalNode {
    String(String),
    Ident(Ident),
    /// Expression assigned by `let`, as the compiler writes it: `{"BinaryOperator": ..}`,
    /// `{"Value": ..}`, or a wire without an `Ident` wrapper.
    Expr(Operand),
}

#[derive(PartialEq, Debug, Clone)]
pub enum Ident {
    String(String),
    // Wires act like variables
    Wire(Wire),
    VirtualWire(VirtualWire),
    /// Unknown tag. `label` holds the payload when it is a plain string.
    Other { tag: String, label: Option<String> },
}

/// `Target` in plonky2. Coordinates are `None` when missing or not an integer.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Wire {
    pub row: Option<u64>,
    pub column: Option<u64>,
    pub value: Option<Value>,
}

/// `VirtualTarget` in plonky2
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct VirtualWire {
    pub index: Option<u64>,
    pub value: Option<Value>,
}

/// Wire coordinate as text, `?` when the IR left it out.
pub(crate) fn coordinate(n: Option<u64>) -> String {
    n.map_or_else(|| "?".to_string(), |n| n.to_string())
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Value {
    U64(u64),
    RandomU64(u64),
    /// Placeholder emitted instead of random values in deterministic snapshots.
    Random,
    /// Numeric variant this crate does not know. `repr` is the payload as JSON text.
    Other { tag: String, repr: String },
}

impl Value {
    /// Variant name as it appears in the IR.
    pub fn tag(&self) -> &str {
        match self {
            Value::U64(_) => "U64",
            Value::RandomU64(_) => "RandomU64",
            Value::Random => "Random",
            Value::Other { tag, .. } => tag,
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct BinaryOperator {
    pub lhs: Option<Operand>,
    pub binop: String,
    pub rhs: Option<Operand>,
}

#[derive(PartialEq, Debug, Clone)]
pub enum Operand {
    Ident(Ident),
    Value(Value),
    BinaryOperator(Box<BinaryOperator>),
    /// Unknown tag wrapping an object; `inner` is that object decoded as an operand.
    Nested {
        tag: String,
        inner: Option<Box<Operand>>,
    },
    /// Unknown tag wrapping a plain string.
    Label(String),
}
