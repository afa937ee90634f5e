// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for the prefab serializer (config, options, diagnostics).
//! Keeps the codec free of storage and reporting concerns.

pub mod config;
pub mod diagnostics;
pub mod options;
