//! Tree documents: JSON or TOML files holding a [`NodeRecord`] tree

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{CompositeNode, NodeRecord, Value};

/// On-disk encoding of a tree document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ApplicationError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Reads and builds the tree stored at `path`.
#[instrument(level = "debug")]
pub fn load_tree(path: &Path) -> ApplicationResult<CompositeNode> {
    let format = DocumentFormat::from_path(path)?;
    let content = fs::read_to_string(path).with_path_context("read tree document", path)?;
    let root = parse_tree(&content, format).map_err(|message| ApplicationError::Document {
        path: path.to_path_buf(),
        message,
    })?;
    debug!(root = %root.name(), "loaded tree document");
    Ok(root)
}

/// Builds a tree from document text; the error is the parser message.
pub fn parse_tree(content: &str, format: DocumentFormat) -> Result<CompositeNode, String> {
    let record: NodeRecord = match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
        DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string())?,
    };
    Ok(record.into_composite())
}

/// Serializes the subtree of `root` as a document.
///
/// TOML has no null, so null fields and list items are left out of TOML
/// documents; a null attribute value is omitted in both formats and reads
/// back as null.
pub fn render_document(root: &CompositeNode, format: DocumentFormat) -> ApplicationResult<String> {
    let mut record = root.to_record();
    let rendered = match format {
        DocumentFormat::Json => serde_json::to_string_pretty(&record).map_err(|e| e.to_string()),
        DocumentFormat::Toml => {
            prune_nulls(&mut record);
            toml::to_string_pretty(&record).map_err(|e| e.to_string())
        }
    };
    rendered.map_err(|message| ApplicationError::OperationFailed {
        context: format!("render {:?} document for {}", format, root.name()),
        source: message.into(),
    })
}

fn prune_nulls(record: &mut NodeRecord) {
    prune_map(&mut record.fields);
    for attribute in record.attributes.values_mut() {
        prune_value(&mut attribute.value);
        prune_map(&mut attribute.fields);
    }
    for child in &mut record.children {
        prune_nulls(child);
    }
}

fn prune_map(map: &mut IndexMap<String, Value>) {
    map.retain(|_, value| {
        prune_value(value);
        !value.is_null()
    });
}

fn prune_value(value: &mut Value) {
    match value {
        Value::List(items) => items.retain_mut(|item| {
            prune_value(item);
            !item.is_null()
        }),
        Value::Map(entries) => prune_map(entries),
        _ => {}
    }
}
