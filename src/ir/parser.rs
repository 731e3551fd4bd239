use serde_json::Value as Json;

use super::tree::{
    BinaryOperator, Document, Ident, LocalNode, Operand, Stmt, Value, VirtualWire, Wire,
};

/// Operands nested deeper than this are dropped, the same limit serde_json
/// applies when parsing text.
pub const MAX_DEPTH: usize = 128;

/// Decode a parsed JSON document into IR.
///
/// Never fails. Anything the decoder does not understand ends up in a fallback
/// variant or is left out.
pub fn convert(raw: &Json) -> Document {
    let mut converter = Converter::default();
    let doc = converter.convert(raw);
    if converter.unrecognized > 0 {
        tracing::debug!(
            count = converter.unrecognized,
            "IR contains unrecognized variants"
        );
    }
    doc
}

#[derive(Default)]
struct Converter {
    /// Number of tags that fell through to a fallback.
    unrecognized: usize,
    /// Operands currently being decoded.
    depth: usize,
    /// Inside a `Local` expression, where wires appear without an `Ident` wrapper.
    in_expression: bool,
}

impl Converter {
    fn convert(&mut self, raw: &Json) -> Document {
        let Some(stmts) = raw.get("stmts").and_then(Json::as_array) else {
            tracing::warn!("IR document has no stmts array");
            return Document::default();
        };

        let stmts = stmts
            .iter()
            .enumerate()
            .map(|(i, s)| {
                tracing::trace!(index = i, "converting statement");
                self.convert_stmt(s)
            })
            .collect();

        Document { stmts }
    }

    fn convert_stmt(&mut self, raw: &Json) -> Stmt {
        let Some((tag, payload)) = single_key(raw) else {
            self.unrecognized += 1;
            return Stmt::Unrecognized(None);
        };

        match tag {
            "Local" => match payload.as_array() {
                Some(items) => {
                    if items.len() != 2 {
                        tracing::debug!(len = items.len(), "Local expects a pair");
                    }
                    Stmt::Local(
                        items.first().and_then(|n| self.convert_local(n)),
                        items.get(1).and_then(|n| self.convert_local(n)),
                    )
                }
                None => {
                    self.unrecognized += 1;
                    Stmt::Unrecognized(Some(tag.into()))
                }
            },
            "Verify" => {
                // Newer IRs wrap the operator in one more `BinaryOperator` layer.
                let inner = match single_key(payload) {
                    Some(("BinaryOperator", inner)) => inner,
                    _ => payload,
                };
                Stmt::Verify(self.convert_binop(inner))
            }
            _ => {
                tracing::debug!(tag, "unrecognized statement");
                self.unrecognized += 1;
                Stmt::Unrecognized(Some(tag.into()))
            }
        }
    }

    fn convert_local(&mut self, raw: &Json) -> Option<LocalNode> {
        match single_key(raw)? {
            ("String", Json::String(s)) => Some(LocalNode::String(s.clone())),
            ("Ident", payload) => self.convert_ident(payload).map(LocalNode::Ident),
            ("BinaryOperator" | "Value" | "Wire" | "VirtualWire", _) => {
                self.convert_expression(raw).map(LocalNode::Expr)
            }
            (tag, _) => {
                tracing::debug!(tag, "unrecognized local");
                self.unrecognized += 1;
                None
            }
        }
    }

    fn convert_ident(&mut self, raw: &Json) -> Option<Ident> {
        let (tag, payload) = single_key(raw)?;
        let ident = match tag {
            "String" => match payload {
                Json::String(s) => Ident::String(s.clone()),
                _ => Ident::Other {
                    tag: tag.into(),
                    label: None,
                },
            },
            "Wire" => Ident::Wire(Wire {
                row: number_field(payload, "row"),
                column: number_field(payload, "column"),
                value: payload.get("value").and_then(|v| self.convert_value(v)),
            }),
            "VirtualWire" => Ident::VirtualWire(VirtualWire {
                index: number_field(payload, "index"),
                value: payload.get("value").and_then(|v| self.convert_value(v)),
            }),
            _ => {
                tracing::debug!(tag, "unrecognized ident");
                self.unrecognized += 1;
                Ident::Other {
                    tag: tag.into(),
                    label: payload.as_str().map(String::from),
                }
            }
        };
        Some(ident)
    }

    fn convert_value(&mut self, raw: &Json) -> Option<Value> {
        // Unit variants serialize as bare strings
        if let Json::String(s) = raw {
            return Some(match s.as_str() {
                "Random" => Value::Random,
                _ => Value::Other {
                    tag: s.clone(),
                    repr: String::new(),
                },
            });
        }

        let (tag, payload) = single_key(raw)?;
        let value = match (tag, payload.as_u64()) {
            ("U64", Some(n)) => Value::U64(n),
            ("RandomU64", Some(n)) => Value::RandomU64(n),
            _ => {
                self.unrecognized += 1;
                Value::Other {
                    tag: tag.into(),
                    repr: match payload {
                        Json::String(s) => s.clone(),
                        other => other.to_string(),
                    },
                }
            }
        };
        Some(value)
    }

    fn convert_binop(&mut self, raw: &Json) -> Option<BinaryOperator> {
        let obj = raw.as_object()?;
        let binop = match obj.get("binop").and_then(Json::as_str) {
            Some(op) => op.to_string(),
            None => {
                tracing::debug!("binary operator without binop");
                "Unknown".to_string()
            }
        };

        Some(BinaryOperator {
            lhs: obj.get("lhs").and_then(|n| self.convert_operand(n)),
            binop,
            rhs: obj.get("rhs").and_then(|n| self.convert_operand(n)),
        })
    }

    fn convert_expression(&mut self, raw: &Json) -> Option<Operand> {
        let outer = std::mem::replace(&mut self.in_expression, true);
        let expr = self.convert_operand(raw);
        self.in_expression = outer;
        expr
    }

    fn convert_operand(&mut self, raw: &Json) -> Option<Operand> {
        if self.depth >= MAX_DEPTH {
            tracing::warn!(max = MAX_DEPTH, "operand nested too deeply, dropping it");
            self.unrecognized += 1;
            return None;
        }

        self.depth += 1;
        let operand = self.convert_tagged_operand(raw);
        self.depth -= 1;
        operand
    }

    fn convert_tagged_operand(&mut self, raw: &Json) -> Option<Operand> {
        let (tag, payload) = single_key(raw)?;
        match tag {
            "Ident" => self.convert_ident(payload).map(Operand::Ident),
            "Wire" | "VirtualWire" if self.in_expression => {
                self.convert_ident(raw).map(Operand::Ident)
            }
            "Value" => self.convert_value(payload).map(Operand::Value),
            "BinaryOperator" => self
                .convert_binop(payload)
                .map(|b| Operand::BinaryOperator(Box::new(b))),
            _ => {
                tracing::debug!(tag, "unrecognized operand");
                self.unrecognized += 1;
                match payload {
                    Json::Object(_) => Some(Operand::Nested {
                        tag: tag.into(),
                        inner: self.convert_operand(payload).map(Box::new),
                    }),
                    Json::String(s) => Some(Operand::Label(s.clone())),
                    _ => None,
                }
            }
        }
    }
}

/// Split a tagged-union value into its discriminant and payload.
/// Only objects with exactly one key qualify.
fn single_key(raw: &Json) -> Option<(&str, &Json)> {
    let obj = raw.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    obj.iter().next().map(|(k, v)| (k.as_str(), v))
}

fn number_field(raw: &Json, field: &str) -> Option<u64> {
    let n = raw.get(field).and_then(Json::as_u64);
    if n.is_none() {
        tracing::debug!(field, "missing or non-integer field");
    }
    n
}
