//! Limits for codec-level decoding.

/// How optional ids that are not in the game tables are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownIdPolicy {
    /// Reject the save as corrupt.
    #[default]
    Strict,
    /// Decode the id as absent and log a warning.
    TreatAsAbsent,
}

/// Codec-specific limits enforced while loading a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum number of message log entries.
    pub max_messages: usize,
    /// Maximum number of monsters on one level.
    pub max_monsters_per_level: usize,
    /// Maximum number of items in one store.
    pub max_store_stock: usize,
    /// Maximum number of stores.
    pub max_stores: usize,
    /// Maximum number of history entries.
    pub max_history: usize,
    /// Maximum number of stored background chunks.
    pub max_chunks: usize,
    /// Maximum number of slots in the player's body plan.
    pub max_body_slots: usize,
    /// Maximum number of auto-inscriptions.
    pub max_inscriptions: usize,
    /// Maximum number of object kinds, quests and artifacts in knowledge sections.
    pub max_kinds: usize,
    /// Maximum number of named options.
    pub max_options: usize,
    /// Policy for optional ids missing from the tables.
    pub unknown_ids: UnknownIdPolicy,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_messages: 80,
            max_monsters_per_level: 1024,
            max_store_stock: 40,
            max_stores: 16,
            max_history: 4096,
            max_chunks: 128,
            max_body_slots: 24,
            max_inscriptions: 1024,
            max_kinds: 4096,
            max_options: 256,
            unknown_ids: UnknownIdPolicy::Strict,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_messages: 80,
            max_monsters_per_level: 32,
            max_store_stock: 8,
            max_stores: 4,
            max_history: 32,
            max_chunks: 4,
            max_body_slots: 12,
            max_inscriptions: 16,
            max_kinds: 64,
            max_options: 16,
            unknown_ids: UnknownIdPolicy::Strict,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_messages: usize::MAX,
            max_monsters_per_level: usize::MAX,
            max_store_stock: usize::MAX,
            max_stores: usize::MAX,
            max_history: usize::MAX,
            max_chunks: usize::MAX,
            max_body_slots: usize::MAX,
            max_inscriptions: usize::MAX,
            max_kinds: usize::MAX,
            max_options: usize::MAX,
            unknown_ids: UnknownIdPolicy::TreatAsAbsent,
        }
    }

    /// Returns these limits with a different unknown-id policy.
    #[must_use]
    pub const fn with_unknown_ids(mut self, policy: UnknownIdPolicy) -> Self {
        self.unknown_ids = policy;
        self
    }
}
