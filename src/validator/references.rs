use crate::REF_FIELD;
use crate::document::Document;
use crate::error::DocumentError;
use crate::openapi_common::Reference;
use crate::traverser::{ReferenceTraverser, TraverserError};
use crate::types::json_path::JsonPath;
use crate::types::version::SpecVersion;
use crate::validator::{ConformanceReport, IssueKind, Rule};
use serde_json::Value;

/// Every local `$ref` must land on a node, and pure reference chains must end.
///
/// Works on the serialized tree so references at any depth are seen without
/// walking each typed shape. External references are left alone.
pub(crate) struct ReferenceRule;

impl Rule for ReferenceRule {
    fn name(&self) -> &'static str {
        "references"
    }

    fn check(&self, document: &Document, report: &mut ConformanceReport) {
        check_tree(document.to_value(), document.version(), report);
    }
}

/// A tree that could not be produced is reported rather than passed.
fn check_tree(
    tree: Result<Value, DocumentError>,
    version: SpecVersion,
    report: &mut ConformanceReport,
) {
    let tree = match tree {
        Ok(tree) => tree,
        Err(e) => {
            log::error!("Could not serialize document for reference checks: {}", e);
            report.push(JsonPath::new(), IssueKind::ReferencesNotChecked(e.to_string()));
            return;
        }
    };
    let traverser = ReferenceTraverser::new(&tree, version);

    for (path, reference) in traverser.collect_references() {
        if !Reference::new(reference).is_local() {
            log::debug!("Skipping external reference {} at {}", reference, path);
            continue;
        }
        let kind = match traverser.resolve(reference) {
            Ok(_) => continue,
            Err(TraverserError::PathNotFound(_)) => {
                IssueKind::UnresolvedReference(reference.to_string())
            }
            Err(TraverserError::CyclicReference(_)) => {
                IssueKind::CyclicReference(reference.to_string())
            }
            // a local chain that ends in another document
            Err(TraverserError::ExternalReference(_)) => continue,
        };
        report.push(path.join(REF_FIELD), kind);
    }
}
