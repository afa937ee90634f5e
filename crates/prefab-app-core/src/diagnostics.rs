// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Diagnostics channel with dedupe for soft serialization issues.
//!
//! Soft issues (unresolved references, malformed snapshots, duplicate ids)
//! never abort a pass. They are recorded here and mirrored to `tracing`.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational note.
    Info,
    /// Something was degraded but output is still usable.
    Warn,
}

/// What kind of soft issue was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A reference pointed outside the serialized graph and became null.
    UnresolvedReference,
    /// A snapshot lacked required identity data; defaults were used.
    MalformedSnapshot,
    /// A stable identifier was registered twice; the first registration won.
    DuplicateIdentifier,
    /// The produced sequence failed a structural check.
    Validation,
}

/// One recorded issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Issue kind.
    pub kind: DiagnosticKind,
    /// Object the issue is about (stable id, property path, ...), if any.
    pub subject: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// How many identical issues were folded into this entry.
    pub occurrences: u32,
}

/// Ordered, deduplicating diagnostics log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue, folding it into an identical earlier entry if present.
    ///
    /// Returns the index of the entry that now holds the issue.
    pub fn push<M>(
        &mut self,
        severity: Severity,
        kind: DiagnosticKind,
        subject: Option<&str>,
        message: M,
    ) -> usize
    where
        M: Into<String>,
    {
        let subject = subject.map(str::to_owned);
        let message = message.into();

        match severity {
            Severity::Info => info!(?kind, subject = subject.as_deref(), "{message}"),
            Severity::Warn => warn!(?kind, subject = subject.as_deref(), "{message}"),
        }

        if let Some(pos) = self.entries.iter().position(|d| {
            d.severity == severity && d.kind == kind && d.subject == subject && d.message == message
        }) {
            self.entries[pos].occurrences += 1;
            return pos;
        }

        self.entries.push(Diagnostic {
            severity,
            kind,
            subject,
            message,
            occurrences: 1,
        });
        self.entries.len() - 1
    }

    /// Record a warning.
    pub fn warn<M>(&mut self, kind: DiagnosticKind, subject: Option<&str>, message: M) -> usize
    where
        M: Into<String>,
    {
        self.push(Severity::Warn, kind, subject, message)
    }

    /// All entries, in first-seen order.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct entries of `kind`.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Messages of all entries, in order.
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|d| d.message.clone()).collect()
    }

    /// Append every entry of `other`, keeping dedupe semantics.
    pub fn extend(&mut self, other: DiagnosticLog) {
        for d in other.entries {
            let idx = self.push(d.severity, d.kind, d.subject.as_deref(), d.message);
            self.entries[idx].occurrences += d.occurrences - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_entries_fold() {
        let mut log = DiagnosticLog::new();
        let a = log.warn(DiagnosticKind::UnresolvedReference, Some("x"), "gone");
        let b = log.warn(DiagnosticKind::UnresolvedReference, Some("x"), "gone");
        assert_eq!(a, b);
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].occurrences, 2);
    }

    #[test]
    fn different_subjects_stay_separate() {
        let mut log = DiagnosticLog::new();
        log.warn(DiagnosticKind::MalformedSnapshot, None, "no name");
        log.warn(DiagnosticKind::MalformedSnapshot, Some("n1"), "no name");
        log.warn(DiagnosticKind::DuplicateIdentifier, None, "dup");
        assert_eq!(log.len(), 3);
        assert_eq!(log.count(DiagnosticKind::MalformedSnapshot), 2);
    }

    #[test]
    fn extend_preserves_occurrences() {
        let mut a = DiagnosticLog::new();
        a.warn(DiagnosticKind::Validation, None, "v");
        let mut b = DiagnosticLog::new();
        b.warn(DiagnosticKind::Validation, None, "v");
        b.warn(DiagnosticKind::Validation, None, "v");
        a.extend(b);
        assert_eq!(a.len(), 1);
        assert_eq!(a.entries()[0].occurrences, 3);
    }
}
