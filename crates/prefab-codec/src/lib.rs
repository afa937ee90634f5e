// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Prefab graph serializer, validator and compact identifier codec.
//!
//! This crate provides:
//! - [`Serializer`]: snapshot tree → flat, index-addressed record sequence
//! - [`validate()`]: structural checks on a parsed sequence
//! - [`ident`]: the host's 23-character compact identifier form
//! - [`SnapshotAssembler`] and [`export`]: fetch-driven capture from a host
//! - [`MockSource`] for headless testing
//!
//! # Design
//!
//! The host contract lives in `prefab-port`; options and diagnostics live
//! in `prefab-app-core`. Everything here is synchronous and single-threaded:
//! one pass owns its resolver and allocator outright.

mod assemble;
mod document;
mod error;
pub mod ident;
mod idgen;
mod kind;
mod mock_source;
mod normalize;
pub mod record;
mod resolver;
mod synth;
mod validate;
mod walker;

pub use assemble::{Assembled, SnapshotAssembler};
pub use document::{export, MetaUserData, PrefabDocument, PrefabMeta, SerializeOutcome, META_IMPORTER};
pub use error::{RegisterError, SerializeError};
pub use ident::{canonical, compact, expand, is_compact};
pub use idgen::{RandomIdGenerator, FILE_ID_LEN};
pub use kind::{AssetKind, ComponentKind, PropertyKind};
pub use mock_source::MockSource;
pub use normalize::PropertyNormalizer;
pub use record::{Record, Reference};
pub use resolver::{ReferenceResolver, Resolution, ResolverTables, TargetKind};
pub use synth::{synthesize, DENY_LIST};
pub use validate::{dangling_references, validate, validate_records, ValidationReport};
pub use walker::{IndexAllocator, SerializedGraph, Serializer};
