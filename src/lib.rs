//! Turns circuit IR emitted by the zkcir compiler into display trees and code IR.

use std::{fs::File, io::Read, path::PathBuf};

use anyhow::{anyhow, Result};
use serde_json::Value as Json;

pub use error::Error;
pub use ir::tree::Document;
pub use view::{TreeBuilder, TreeNode, TreeStats, ROOT_LABEL};

pub mod cir;
mod error;
pub mod ir;
pub mod render;
pub mod report;
pub mod view;

/// Global configuration for turning IR into trees.
#[derive(Default, Clone, Debug)]
pub struct Config {
    pub virtual_wire: VirtualWireStyle,
}

/// How virtual wires are labelled in the display tree.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VirtualWireStyle {
    /// `v_wire!(3)`
    #[default]
    Macro,
    /// `VW(index: 3, value: U64: 23)`
    Verbose,
}

/// IR accepted by [`generate_tree`]: JSON text or an already parsed document.
#[derive(Debug, Clone, Copy)]
pub enum IrInput<'a> {
    Json(&'a str),
    Value(&'a Json),
}

impl<'a> From<&'a str> for IrInput<'a> {
    fn from(s: &'a str) -> Self {
        IrInput::Json(s)
    }
}

impl<'a> From<&'a String> for IrInput<'a> {
    fn from(s: &'a String) -> Self {
        IrInput::Json(s)
    }
}

impl<'a> From<&'a Json> for IrInput<'a> {
    fn from(v: &'a Json) -> Self {
        IrInput::Value(v)
    }
}

/// Build the display tree for an IR document using the default [`Config`].
///
/// Only fails when JSON text cannot be decoded. Unknown variants never fail,
/// they become fallback nodes or are left out. Operands nested deeper than
/// [`ir::MAX_DEPTH`] are left out as well, which keeps hand-built values from
/// overflowing the stack.
pub fn generate_tree<'a>(input: impl Into<IrInput<'a>>) -> Result<TreeNode, Error> {
    let tree = match input.into() {
        IrInput::Json(src) => import_from_str(src, Config::default())?.tree(),
        IrInput::Value(raw) => import_value(raw, Config::default()).tree(),
    };
    Ok(tree)
}

/// Read IR from file.
pub fn import(s: impl Into<PathBuf>, conf: Config) -> Result<ParsedIr> {
    let p = s.into();
    let file = File::open(&p)?;
    let ir = import_reader(file, conf)?;

    Ok(ParsedIr {
        path: Some(p),
        ..ir
    })
}

/// Read IR from any source, e.g. stdin.
pub fn import_reader(mut reader: impl Read, conf: Config) -> Result<ParsedIr, Error> {
    let mut src = String::new();
    reader.read_to_string(&mut src)?;
    import_from_str(&src, conf)
}

pub fn import_from_str(src: &str, conf: Config) -> Result<ParsedIr, Error> {
    let raw: Json = serde_json::from_str(src)?;
    Ok(import_value(&raw, conf))
}

pub fn import_value(raw: &Json, conf: Config) -> ParsedIr {
    ParsedIr {
        path: None,
        config: conf,
        document: ir::convert(raw),
    }
}

#[derive(Debug, Clone)]
pub struct ParsedIr {
    path: Option<PathBuf>,
    config: Config,
    document: Document,
}

impl ParsedIr {
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Build a fresh display tree.
    pub fn tree(&self) -> TreeNode {
        TreeBuilder::new(&self.config).build(&self.document)
    }

    /// Print the IR as code.
    pub fn code_ir(&self) -> String {
        cir::build_code_ir(&self.document)
    }

    /// Read the IR from disk again.
    pub fn reload(&self) -> Result<Self> {
        let Some(ref p) = self.path else {
            return Err(anyhow!("ParsedIr was built from memory and cannot be reloaded."));
        };

        import(p.clone(), self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::{
        generate_tree, import, import_from_str, import_reader, import_value, Config, Error,
        TreeNode, VirtualWireStyle,
    };

    const IR: &str = r#"{
  "config": { "num_wires": 10 },
  "stmts": [
    { "Local": [ { "String": "x" }, { "Ident": { "VirtualWire": { "index": 1, "value": { "U64": 5 } } } } ] },
    { "Unknown": { "foo": "bar" } },
    { "Verify": { "BinaryOperator": {
      "lhs": { "Ident": { "String": "x" } },
      "binop": "LessThanEqual",
      "rhs": { "Value": { "U64": 9 } }
    } } }
  ],
  "public_wire_inputs": [],
  "public_virtual_wire_inputs": []
}"#;

    #[test]
    fn test_string_and_value_inputs_agree() {
        let raw: serde_json::Value = serde_json::from_str(IR).unwrap();
        let from_str = generate_tree(IR).unwrap();
        let from_value = generate_tree(&raw).unwrap();
        let owned = IR.to_string();

        assert_eq!(from_str, from_value);
        assert_eq!(from_str, generate_tree(&owned).unwrap());
        assert_eq!(from_str.name, "Circuit");
        // 3 statements, one of them unknown
        assert_eq!(from_str.children.len(), 2);
    }

    #[test]
    fn test_parsed_ir() {
        let ir = import_from_str(
            IR,
            Config {
                virtual_wire: VirtualWireStyle::Verbose,
            },
        )
        .unwrap();

        assert_eq!(ir.document().stmts.len(), 3);
        assert_eq!(
            ir.tree().children[0],
            TreeNode::new(
                "Local",
                vec![
                    TreeNode::leaf("x"),
                    TreeNode::leaf("VW(index: 1, value: U64: 5)")
                ]
            )
        );
        assert_eq!(
            ir.code_ir(),
            r#"let x = virtual_wire!(index: 1, value: 5u64);

// unrecognized statement: Unknown

verify!(x <= 9u64);"#
        );
        assert!(ir.reload().is_err());
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            import_from_str("{not valid json", Config::default()),
            Err(Error::MalformedInput(_))
        ));
        assert!(matches!(
            generate_tree("[1, 2"),
            Err(Error::MalformedInput(_))
        ));
    }

    #[test]
    fn test_import_reader() {
        let ir = import_reader(IR.as_bytes(), Config::default()).unwrap();
        assert_eq!(ir.tree().children.len(), 2);

        let invalid_utf8: &[u8] = &[b'{', 0xff, b'}'];
        assert!(matches!(
            import_reader(invalid_utf8, Config::default()),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_non_object_document() {
        let tree = import_value(&json!("stmts"), Config::default()).tree();
        assert_eq!(tree, TreeNode::new("Circuit", vec![]));
    }

    #[test]
    fn test_import_and_reload() {
        let path = std::env::temp_dir().join(format!("cirview-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "stmts": [] }"#).unwrap();

        let ir = import(&path, Config::default()).unwrap();
        assert_eq!(ir.tree().children.len(), 0);

        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(IR.as_bytes()).unwrap();
        drop(file);

        let reloaded = ir.reload().unwrap();
        assert_eq!(reloaded.tree().children.len(), 2);

        std::fs::remove_file(&path).unwrap();
        assert!(ir.reload().is_err());
    }
}
