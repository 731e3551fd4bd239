use crate::ir::tree::{
    coordinate, BinaryOperator, Document, Ident, LocalNode, Operand, Stmt, Value,
};

/// Placeholder for parts of a statement the IR left out.
const MISSING: &str = "_";

/// Print IR as code (`.cir`): one statement per paragraph.
pub fn build_code_ir(doc: &Document) -> String {
    CirWriter::default().compile_document(doc)
}

#[derive(Default)]
struct CirWriter {}

impl CirWriter {
    fn compile_document(&mut self, doc: &Document) -> String {
        doc.stmts
            .iter()
            .map(|s| self.compile_stmt(s))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn compile_stmt(&mut self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Local(ident, def) => {
                let ident = self.compile_optional(ident.as_ref(), Self::compile_local);
                let def = self.compile_optional(def.as_ref(), Self::compile_local);
                format!("let {ident} = {def};")
            }
            Stmt::Verify(op) => {
                let op = self.compile_optional(op.as_ref(), Self::compile_binop);
                format!("verify!({op});")
            }
            Stmt::Unrecognized(Some(tag)) => format!("// unrecognized statement: {tag}"),
            Stmt::Unrecognized(None) => "// unrecognized statement".to_string(),
        }
    }

    fn compile_optional<T>(
        &mut self,
        node: Option<&T>,
        f: impl FnOnce(&mut Self, &T) -> String,
    ) -> String {
        match node {
            Some(node) => f(self, node),
            None => MISSING.to_string(),
        }
    }

    fn compile_local(&mut self, node: &LocalNode) -> String {
        match node {
            LocalNode::String(s) => s.clone(),
            LocalNode::Ident(ident) => self.compile_ident(ident),
            LocalNode::Expr(expr) => self.compile_operand(expr),
        }
    }

    fn compile_ident(&mut self, ident: &Ident) -> String {
        match ident {
            Ident::String(s) => s.clone(),
            Ident::Wire(wire) => {
                let (row, column) = (coordinate(wire.row), coordinate(wire.column));
                match &wire.value {
                    Some(value) => format!(
                        "wire!(row: {row}, column: {column}, value: {})",
                        self.compile_value(value)
                    ),
                    None => format!("wire!(row: {row}, column: {column})"),
                }
            }
            Ident::VirtualWire(virtual_wire) => {
                let index = coordinate(virtual_wire.index);
                match &virtual_wire.value {
                    Some(value) => format!(
                        "virtual_wire!(index: {index}, value: {})",
                        self.compile_value(value)
                    ),
                    None => format!("virtual_wire!(index: {index})"),
                }
            }
            Ident::Other { tag, label } => label.clone().unwrap_or_else(|| tag.clone()),
        }
    }

    fn compile_value(&mut self, value: &Value) -> String {
        match value {
            Value::U64(n) => format!("{n}u64"),
            Value::RandomU64(n) => format!("(random!() -> {n}u64)"),
            Value::Random => "random!()".to_string(),
            Value::Other { tag, repr } => format!("{tag}({repr})"),
        }
    }

    fn compile_binop(&mut self, op: &BinaryOperator) -> String {
        let lhs = self.compile_side(op.lhs.as_ref());
        let rhs = self.compile_side(op.rhs.as_ref());
        format!("{lhs} {} {rhs}", binop_symbol(&op.binop))
    }

    /// Nested binary operators are wrapped in parentheses.
    fn compile_side(&mut self, operand: Option<&Operand>) -> String {
        match operand {
            Some(Operand::BinaryOperator(op)) => format!("({})", self.compile_binop(op)),
            Some(operand) => self.compile_operand(operand),
            None => MISSING.to_string(),
        }
    }

    fn compile_operand(&mut self, operand: &Operand) -> String {
        match operand {
            Operand::Ident(ident) => self.compile_ident(ident),
            Operand::Value(value) => self.compile_value(value),
            Operand::BinaryOperator(op) => self.compile_binop(op),
            Operand::Nested { tag, inner } => {
                let inner = match inner {
                    Some(inner) => self.compile_operand(inner),
                    None => String::new(),
                };
                format!("{tag}({inner})")
            }
            Operand::Label(s) => s.clone(),
        }
    }
}

/// Operator names the compiler knows print as symbols, anything else as-is.
fn binop_symbol(binop: &str) -> &str {
    match binop {
        "Add" => "+",
        "Divide" => "/",
        "Equal" => "==",
        "Exponent" => "^",
        "GreaterThanEqual" => ">=",
        "GreaterThan" => ">",
        "LessThan" => "<",
        "LessThanEqual" => "<=",
        "Multiply" => "*",
        "Subtract" => "-",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::ir::convert;

    use super::build_code_ir;

    #[test]
    fn test_code_ir() {
        let raw = json!({
            "stmts": [
                { "Local": [
                    { "String": "x" },
                    { "Ident": { "VirtualWire": { "index": 3, "value": { "U64": 23 } } } }
                ] },
                { "Verify": { "BinaryOperator": {
                    "lhs": { "BinaryOperator": {
                        "lhs": { "Ident": { "Wire": { "row": 1, "column": 2 } } },
                        "binop": "Add",
                        "rhs": { "Ident": { "VirtualWire": { "index": 3 } } }
                    } },
                    "binop": "Multiply",
                    "rhs": { "Value": { "U64": 42 } }
                } } }
            ]
        });

        assert_eq!(
            build_code_ir(&convert(&raw)),
            r#"let x = virtual_wire!(index: 3, value: 23u64);

verify!((wire!(row: 1, column: 2) + virtual_wire!(index: 3)) * 42u64);"#
        );
    }

    #[test]
    fn test_values() {
        let raw = json!({
            "stmts": [
                { "Verify": {
                    "lhs": { "Ident": { "Wire": { "row": 5, "column": 6, "value": { "RandomU64": 32 } } } },
                    "binop": "GreaterThanEqual",
                    "rhs": { "Value": "Random" }
                } },
                { "Verify": { "BinaryOperator": {
                    "lhs": { "Value": { "U128": 7 } },
                    "binop": "Modulo",
                    "rhs": { "Wrapped": { "Ident": { "String": "y" } } }
                } } }
            ]
        });

        assert_eq!(
            build_code_ir(&convert(&raw)),
            r#"verify!(wire!(row: 5, column: 6, value: (random!() -> 32u64)) >= random!());

verify!(U128(7) Modulo Wrapped(y));"#
        );
    }

    #[test]
    fn test_missing_parts() {
        let raw = json!({
            "stmts": [
                { "Local": [ { "String": "x" } ] },
                { "Verify": { "BinaryOperator": { "binop": "Equal", "rhs": { "Value": { "U64": 1 } } } } },
                { "Verify": 3 },
                { "Unknown": {} },
                []
            ]
        });

        assert_eq!(
            build_code_ir(&convert(&raw)),
            r#"let x = _;

verify!(_ == 1u64);

verify!(_);

// unrecognized statement: Unknown

// unrecognized statement"#
        );
    }

    #[test]
    fn test_local_expression() {
        let raw = json!({
            "stmts": [
                { "Local": [
                    { "String": "x" },
                    { "BinaryOperator": {
                        "lhs": { "Wire": { "row": 1, "column": 2 } },
                        "binop": "Add",
                        "rhs": { "Value": { "U64": 5 } }
                    } }
                ] },
                { "Local": [
                    { "Ident": { "Wire": { "row": 3, "column": 2 } } },
                    { "BinaryOperator": {
                        "lhs": { "BinaryOperator": {
                            "lhs": { "Wire": { "row": 1 } },
                            "binop": "Add",
                            "rhs": { "VirtualWire": { "index": 3 } }
                        } },
                        "binop": "Multiply",
                        "rhs": { "Wire": { "row": 5, "column": 6 } }
                    } }
                ] },
                { "Local": [ { "String": "y" }, { "Value": { "U64": 7 } } ] }
            ]
        });

        assert_eq!(
            build_code_ir(&convert(&raw)),
            r#"let x = wire!(row: 1, column: 2) + 5u64;

let wire!(row: 3, column: 2) = (wire!(row: 1, column: ?) + virtual_wire!(index: 3)) * wire!(row: 5, column: 6);

let y = 7u64;"#
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(build_code_ir(&convert(&json!({ "stmts": [] }))), "");
    }
}
