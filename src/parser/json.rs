//! Terraform JSON (`.tf.json`) module extraction.
//!
//! Terraform accepts several equivalent shapes for the `module` key:
//!
//! ```json
//! {"module": {"vpc": {"source": "./vpc"}}}
//! {"module": {"vpc": [{"source": "./vpc"}, {"source": "./vpc-v2"}]}}
//! {"module": [{"vpc": {"source": "./vpc"}}, {"eks": {"source": "./eks"}}]}
//! ```

use crate::error::{ModSourceError, Result};
use crate::parser::{ModuleBlock, ModuleEntry};
use serde_json::{Map, Value};
use std::path::Path;

/// Extract the module blocks of a Terraform JSON document, in document order.
pub(super) fn parse_modules(content: &str, file_path: &Path) -> Result<Vec<ModuleBlock>> {
    let document: Value = serde_json::from_str(content)
        .map_err(|e| ModSourceError::hcl_parse(file_path, e.to_string(), file!(), line!()))?;

    let mut blocks = Vec::new();
    if let Some(modules) = document.get("module") {
        collect_blocks(modules, file_path, &mut blocks)?;
    }
    Ok(blocks)
}

fn collect_blocks(value: &Value, file_path: &Path, blocks: &mut Vec<ModuleBlock>) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (name, body) in map {
                blocks.push(ModuleBlock {
                    name: name.clone(),
                    entries: collect_entries(name, body, file_path)?,
                });
            }
            Ok(())
        }
        Value::Array(items) => items
            .iter()
            .try_for_each(|item| collect_blocks(item, file_path, blocks)),
        other => Err(structure_error(file_path, format!("'module' must be an object or an array, got {other}"))),
    }
}

fn collect_entries(name: &str, body: &Value, file_path: &Path) -> Result<Vec<ModuleEntry>> {
    match body {
        Value::Object(fields) => Ok(vec![entry(fields)]),
        Value::Array(bodies) => bodies
            .iter()
            .map(|b| match b {
                Value::Object(fields) => Ok(entry(fields)),
                _ => Err(structure_error(file_path, format!("module '{name}' has a body that is not an object"))),
            })
            .collect(),
        _ => Err(structure_error(file_path, format!("module '{name}' must be an object or an array of objects"))),
    }
}

fn entry(fields: &Map<String, Value>) -> ModuleEntry {
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .unwrap_or_default()
    };

    ModuleEntry {
        source: text("source"),
        version: text("version"),
    }
}

fn structure_error(file_path: &Path, message: String) -> ModSourceError {
    ModSourceError::hcl_parse(file_path, message, file!(), line!())
}
