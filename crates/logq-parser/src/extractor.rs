//! Common interface for the two slot extractors.
//!
//! Converts raw operator text ("show failed logins from yesterday") into a
//! reading for each of the four slots.
//!
//! Two tiers:
//! - **Rule** ([`RuleExtractor`](crate::rules::RuleExtractor)): ordered regex
//!   tables, no confidence.
//! - **Statistical** ([`StatExtractor`](crate::stat::StatExtractor)): one
//!   classifier per slot, confidence attached to every reading.

use logq_protocol::SlotReadings;

/// Trait for extractors that read slot values out of natural language.
///
/// Implementations must be total: every input, including the empty string,
/// produces a reading for all four slots.
pub trait SlotExtractor: Send + Sync {
    fn extract(&self, text: &str) -> SlotReadings;

    /// Name of this tier (for logging/evaluation).
    fn tier_name(&self) -> &str;
}
