// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tree walker and index allocator.
//!
//! Positions are handed out in pre-order: a child's slot is reserved before
//! its subtree is visited, then each component gets its slot followed by its
//! metadata slot, and the node's own metadata slot comes last. The layout is
//! computed once up front; both resolution modes emit into the same layout
//! and differ only in when identifiers become resolvable.

use prefab_app_core::diagnostics::{DiagnosticKind, DiagnosticLog};
use prefab_app_core::options::{ResolutionMode, SerializerOptions};
use prefab_port::{ComponentSnapshot, IdGenerator, NodeSnapshot, TransformSnapshot};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{RegisterError, SerializeError};
use crate::idgen::RandomIdGenerator;
use crate::kind::ComponentKind;
use crate::normalize::PropertyNormalizer;
use crate::record::{
    values, AssetHeader, ComponentInfoRecord, NodeInfoRecord, NodeRecord, Record, Reference,
    FALLBACK_COMPONENT_TYPE, HEADER_POSITION, ROOT_POSITION,
};
use crate::resolver::{ReferenceResolver, ResolverTables, TargetKind};
use crate::synth;

/// Arena of record slots addressed by position.
#[derive(Debug, Default)]
pub struct IndexAllocator {
    slots: Vec<Option<Record>>,
}

impl IndexAllocator {
    /// Empty allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next position.
    pub fn reserve(&mut self) -> usize {
        self.slots.push(None);
        self.slots.len() - 1
    }

    /// Number of positions handed out.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when nothing was reserved.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Place `record` into a reserved, still-empty slot.
    pub fn fill(&mut self, position: usize, record: Record) -> Result<(), SerializeError> {
        match self.slots.get_mut(position) {
            Some(slot) if slot.is_none() => {
                *slot = Some(record);
                Ok(())
            }
            Some(_) => Err(SerializeError::Internal(format!(
                "slot {position} filled twice"
            ))),
            None => Err(SerializeError::Internal(format!(
                "slot {position} was never reserved"
            ))),
        }
    }

    /// The finished sequence. Fails if any slot is still a placeholder.
    pub fn finish(self) -> Result<Vec<Record>, SerializeError> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(position, slot)| {
                slot.ok_or_else(|| {
                    SerializeError::Internal(format!("slot {position} left unfilled"))
                })
            })
            .collect()
    }
}

/// Positions planned for one component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ComponentLayout {
    position: usize,
    info: usize,
}

/// Positions planned for one node and its subtree.
#[derive(Clone, Debug, PartialEq, Eq)]
struct NodeLayout {
    position: usize,
    children: Vec<NodeLayout>,
    components: Vec<ComponentLayout>,
    info: usize,
}

/// Result of one serialization pass.
#[derive(Debug)]
pub struct SerializedGraph {
    /// The flat record sequence.
    pub records: Vec<Record>,
    /// Identifier tables as they stood at the end of the pass.
    pub tables: ResolverTables,
    /// Soft issues observed during the pass.
    pub diagnostics: DiagnosticLog,
}

impl SerializedGraph {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The root node record.
    pub fn root(&self) -> Option<&NodeRecord> {
        self.records.get(ROOT_POSITION).and_then(Record::as_node)
    }

    /// The sequence as a JSON array.
    pub fn to_value(&self) -> Result<Value, SerializeError> {
        Ok(serde_json::to_value(&self.records)?)
    }
}

/// State shared by every step of one pass.
struct WalkContext<'g, G> {
    options: &'g SerializerOptions,
    ids: &'g mut G,
    allocator: IndexAllocator,
    resolver: ReferenceResolver,
    diagnostics: DiagnosticLog,
}

impl<G: IdGenerator> WalkContext<'_, G> {
    fn two_pass(&self) -> bool {
        self.options.resolution == ResolutionMode::TwoPass
    }

    fn register(&mut self, id: Option<&str>, kind: TargetKind, position: usize) {
        let Some(id) = id.filter(|id| !id.is_empty()) else {
            return;
        };
        if let Err(RegisterError::Duplicate { existing, .. }) =
            self.resolver.register(id, kind, position)
        {
            self.diagnostics.warn(
                DiagnosticKind::DuplicateIdentifier,
                Some(id),
                format!("identifier already bound to position {existing}; position {position} ignored"),
            );
        }
    }

    fn file_id(&mut self, explicit: Option<&str>) -> String {
        match explicit.filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => self.ids.file_id(),
        }
    }

    /// Reserve every position of the subtree rooted at `node`.
    fn plan<'n>(
        &mut self,
        node: &'n NodeSnapshot,
        position: usize,
        ancestors: &mut Vec<&'n str>,
    ) -> Result<NodeLayout, SerializeError> {
        let id = node.id.as_deref().filter(|id| !id.is_empty());
        if let Some(id) = id {
            if ancestors.contains(&id) {
                return Err(SerializeError::Cycle { id: id.to_string() });
            }
            ancestors.push(id);
        }
        if self.two_pass() {
            self.register(id, TargetKind::Node, position);
        }

        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            let child_position = self.allocator.reserve();
            children.push(self.plan(child, child_position, ancestors)?);
        }

        let mut components = Vec::with_capacity(node.components.len());
        for component in &node.components {
            let layout = ComponentLayout {
                position: self.allocator.reserve(),
                info: self.allocator.reserve(),
            };
            if self.two_pass() {
                self.register(
                    component.id.as_deref(),
                    TargetKind::Component,
                    layout.position,
                );
            }
            components.push(layout);
        }

        let info = self.allocator.reserve();
        if id.is_some() {
            ancestors.pop();
        }
        Ok(NodeLayout {
            position,
            children,
            components,
            info,
        })
    }

    /// Emit the records of the subtree rooted at `node` into `layout`.
    fn emit(
        &mut self,
        node: &NodeSnapshot,
        layout: &NodeLayout,
        parent: Option<usize>,
    ) -> Result<(), SerializeError> {
        let id = node.id.as_deref();
        if !self.two_pass() {
            self.register(id, TargetKind::Node, layout.position);
        }

        let name = match node.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                self.diagnostics.warn(
                    DiagnosticKind::MalformedSnapshot,
                    id,
                    format!(
                        "node has no name; using \"{}\"",
                        self.options.default_node_name
                    ),
                );
                self.options.default_node_name.clone()
            }
        };

        let parent_ref = parent.map_or(Reference::Null, Reference::Index);
        let mut record = NodeRecord::new(
            name,
            parent_ref,
            node.active.unwrap_or(true),
            node.layer.unwrap_or(self.options.default_layer),
        );
        apply_transform(&mut record, &node.transform);

        for (child, child_layout) in node.children.iter().zip(&layout.children) {
            record.children.push(Reference::Index(child_layout.position));
            self.emit(child, child_layout, Some(layout.position))?;
        }

        for (component, component_layout) in node.components.iter().zip(&layout.components) {
            record
                .components
                .push(Reference::Index(component_layout.position));
            self.emit_component(component, *component_layout, layout.position)?;
        }

        record.prefab = Reference::Index(layout.info);
        let info = NodeInfoRecord {
            root: Reference::Index(ROOT_POSITION),
            asset: Reference::Index(HEADER_POSITION),
            file_id: self.file_id(node.file_id.as_deref()),
            is_root: parent.is_none(),
        };
        self.allocator.fill(layout.info, Record::NodeInfo(info))?;
        self.allocator.fill(layout.position, Record::Node(record))
    }

    fn emit_component(
        &mut self,
        component: &ComponentSnapshot,
        layout: ComponentLayout,
        owner: usize,
    ) -> Result<(), SerializeError> {
        if !self.two_pass() {
            self.register(
                component.id.as_deref(),
                TargetKind::Component,
                layout.position,
            );
        }

        let kind = match component.kind.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => ComponentKind::parse(tag),
            _ => {
                self.diagnostics.warn(
                    DiagnosticKind::MalformedSnapshot,
                    component.id.as_deref(),
                    format!("component has no kind; using \"{FALLBACK_COMPONENT_TYPE}\""),
                );
                ComponentKind::Other(FALLBACK_COMPONENT_TYPE.to_string())
            }
        };

        let mut record = {
            let mut normalizer = PropertyNormalizer::new(&self.resolver, &mut self.diagnostics);
            synth::synthesize(
                &mut normalizer,
                &kind,
                component.enabled.unwrap_or(true),
                owner,
                &component.properties,
            )
        };
        record.prefab = Reference::Index(layout.info);

        let info = ComponentInfoRecord::new(self.file_id(component.file_id.as_deref()));
        self.allocator.fill(layout.position, Record::Component(record))?;
        self.allocator.fill(layout.info, Record::ComponentInfo(info))
    }
}

fn apply_transform(record: &mut NodeRecord, transform: &TransformSnapshot) {
    let p = transform.position;
    let r = transform.rotation;
    let s = transform.scale;
    let e = transform.euler.unwrap_or_else(|| r.to_euler_degrees());
    record.position = values::vec3(p.x, p.y, p.z);
    record.rotation = values::quat(r.x, r.y, r.z, r.w);
    record.scale = values::vec3(s.x, s.y, s.z);
    record.euler = values::vec3(e.x, e.y, e.z);
}

/// Serializes snapshot trees into record sequences.
///
/// Each call to [`Serializer::serialize`] is an independent pass with its
/// own resolver; only the identifier generator carries over.
pub struct Serializer<G = RandomIdGenerator> {
    options: SerializerOptions,
    ids: G,
}

impl Serializer<RandomIdGenerator> {
    /// Serializer with random file identifiers.
    pub fn new(options: SerializerOptions) -> Self {
        Self::with_generator(options, RandomIdGenerator::new())
    }
}

impl<G: IdGenerator> Serializer<G> {
    /// Serializer drawing file identifiers from `ids`.
    pub fn with_generator(options: SerializerOptions, ids: G) -> Self {
        Self { options, ids }
    }

    /// Options in effect.
    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// Serialize `root`, naming the asset after the root node.
    pub fn serialize(&mut self, root: &NodeSnapshot) -> Result<SerializedGraph, SerializeError> {
        let name = root
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.options.default_node_name.clone());
        self.serialize_as(&name, root)
    }

    /// Serialize `root` into a sequence whose header is named `asset_name`.
    #[instrument(skip_all, fields(asset = asset_name, mode = ?self.options.resolution))]
    pub fn serialize_as(
        &mut self,
        asset_name: &str,
        root: &NodeSnapshot,
    ) -> Result<SerializedGraph, SerializeError> {
        let mut ctx = WalkContext {
            options: &self.options,
            ids: &mut self.ids,
            allocator: IndexAllocator::new(),
            resolver: ReferenceResolver::new(self.options.compact_asset_ids),
            diagnostics: DiagnosticLog::new(),
        };

        let header = ctx.allocator.reserve();
        let root_position = ctx.allocator.reserve();
        let layout = ctx.plan(root, root_position, &mut Vec::new())?;
        ctx.allocator.fill(
            header,
            Record::Header(AssetHeader::new(
                asset_name,
                Reference::Index(root_position),
            )),
        )?;
        ctx.emit(root, &layout, None)?;

        let tables = ctx.resolver.tables();
        let diagnostics = ctx.diagnostics;
        let records = ctx.allocator.finish()?;
        debug!(
            records = records.len(),
            warnings = diagnostics.len(),
            "serialized prefab"
        );
        Ok(SerializedGraph {
            records,
            tables,
            diagnostics,
        })
    }
}
