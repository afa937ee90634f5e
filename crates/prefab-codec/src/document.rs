// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Output artifact: record sequence, sidecar meta and diagnostics.

use prefab_app_core::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticLog};
use prefab_port::{IdGenerator, NodeSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::assemble::SnapshotAssembler;
use crate::error::SerializeError;
use crate::record::{Record, ROOT_POSITION};
use crate::resolver::ResolverTables;
use crate::validate::{dangling_references, validate_records, ValidationReport};
use crate::walker::{SerializedGraph, Serializer};

/// Importer name written into the sidecar meta.
pub const META_IMPORTER: &str = "prefab";

/// `userData` block of the sidecar meta.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaUserData {
    /// Name of the root node the asset was captured from.
    #[serde(rename = "syncNodeName")]
    pub sync_node_name: String,
}

/// Sidecar meta document written next to the prefab.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefabMeta {
    /// Meta format version.
    pub ver: String,
    /// Importer name.
    pub importer: String,
    /// Whether the host has imported the asset.
    pub imported: bool,
    /// Persistent identifier of the asset.
    pub uuid: String,
    /// Importer-specific data.
    #[serde(rename = "userData")]
    pub user_data: MetaUserData,
}

impl PrefabMeta {
    /// Meta for asset `uuid` captured from the node named `sync_node_name`.
    pub fn new(
        version: impl Into<String>,
        uuid: impl Into<String>,
        sync_node_name: impl Into<String>,
    ) -> Self {
        Self {
            ver: version.into(),
            importer: META_IMPORTER.to_string(),
            imported: true,
            uuid: uuid.into(),
            user_data: MetaUserData {
                sync_node_name: sync_node_name.into(),
            },
        }
    }
}

/// A serialized prefab ready to be written out.
#[derive(Debug)]
pub struct PrefabDocument {
    /// Flat record sequence.
    pub records: Vec<Record>,
    /// Sidecar meta.
    pub meta: PrefabMeta,
    /// Soft issues from assembly, serialization and self-check.
    pub diagnostics: DiagnosticLog,
    /// Identifier tables of the pass that produced `records`.
    pub tables: ResolverTables,
}

impl PrefabDocument {
    /// Wrap a serialized graph. `asset_uuid` is the asset's persistent identifier.
    pub fn from_graph(graph: SerializedGraph, asset_uuid: &str, meta_version: &str) -> Self {
        let sync_node_name = graph
            .records
            .get(ROOT_POSITION)
            .and_then(Record::as_node)
            .map(|n| n.name.clone())
            .unwrap_or_default();
        Self {
            records: graph.records,
            meta: PrefabMeta::new(meta_version, asset_uuid, sync_node_name),
            diagnostics: graph.diagnostics,
            tables: graph.tables,
        }
    }

    /// Records as a JSON array.
    pub fn to_value(&self) -> Result<Value, SerializeError> {
        Ok(serde_json::to_value(&self.records)?)
    }

    /// Records as pretty-printed JSON text.
    pub fn to_json(&self) -> Result<String, SerializeError> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Sidecar meta as pretty-printed JSON text.
    pub fn meta_json(&self) -> Result<String, SerializeError> {
        Ok(serde_json::to_string_pretty(&self.meta)?)
    }

    /// Structural report on the records.
    pub fn validate(&self) -> ValidationReport {
        validate_records(&self.records)
    }

    /// Validate and scan for dangling references, recording every problem
    /// as a validation diagnostic. Returns the structural report.
    pub fn self_check(&mut self) -> Result<ValidationReport, SerializeError> {
        let report = self.validate();
        for issue in &report.issues {
            self.diagnostics
                .warn(DiagnosticKind::Validation, None, issue.clone());
        }
        for dangling in dangling_references(&self.to_value()?) {
            self.diagnostics.warn(
                DiagnosticKind::Validation,
                Some(dangling.as_str()),
                "reference points outside the sequence",
            );
        }
        Ok(report)
    }

    /// User-facing summary of this document.
    pub fn outcome(&self) -> SerializeOutcome {
        let warnings = self.diagnostics.len();
        let message = if warnings == 0 {
            format!("serialized {} records", self.records.len())
        } else {
            format!(
                "serialized {} records with {warnings} warning(s)",
                self.records.len()
            )
        };
        SerializeOutcome {
            success: true,
            message,
            diagnostics: self.diagnostics.entries().to_vec(),
        }
    }
}

/// User-visible result of a serialization request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SerializeOutcome {
    /// False only when serialization aborted.
    pub success: bool,
    /// One-line summary.
    pub message: String,
    /// Soft issues, in first-seen order.
    pub diagnostics: Vec<Diagnostic>,
}

impl SerializeOutcome {
    /// Summarize a serialization result.
    pub fn from_result(result: &Result<PrefabDocument, SerializeError>) -> Self {
        match result {
            Ok(document) => document.outcome(),
            Err(err) => Self {
                success: false,
                message: err.to_string(),
                diagnostics: Vec::new(),
            },
        }
    }
}

/// Fetch the tree at `root_id` from `source`, serialize it and self-check
/// the result.
pub fn export<S, G>(
    source: S,
    root_id: &str,
    serializer: &mut Serializer<G>,
    asset_uuid: &str,
) -> Result<PrefabDocument, SerializeError>
where
    S: NodeSource,
    G: IdGenerator,
{
    let assembled = SnapshotAssembler::new(source).assemble(root_id)?;
    let graph = serializer.serialize(&assembled.root)?;
    let meta_version = serializer.options().meta_version.clone();

    let mut diagnostics = assembled.diagnostics;
    let mut document = PrefabDocument::from_graph(graph, asset_uuid, &meta_version);
    diagnostics.extend(std::mem::take(&mut document.diagnostics));
    document.diagnostics = diagnostics;

    let report = document.self_check()?;
    info!(
        records = document.records.len(),
        nodes = report.node_count,
        components = report.component_count,
        warnings = document.diagnostics.len(),
        "exported prefab"
    );
    Ok(document)
}
