// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic file identifier generator.

use prefab_port::IdGenerator;

/// Yields `<prefix>-0`, `<prefix>-1`, ... in call order.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    /// Generator with prefix `fid`.
    pub fn new() -> Self {
        Self::with_prefix("fid")
    }

    /// Generator with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    /// Number of identifiers handed out so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn file_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_up_from_zero() {
        let mut g = SequentialIdGenerator::with_prefix("x");
        assert_eq!(g.file_id(), "x-0");
        assert_eq!(g.file_id(), "x-1");
        assert_eq!(g.issued(), 2);
    }
}
