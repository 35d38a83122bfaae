//! # Label Delivery
//!
//! **Crash-safe two-phase delivery acknowledgment over append-only message labels.**
//!
//! A sender records that a message was sent; later, a recipient records that
//! it was received. Neither fact is stored as a state field. Both are labels
//! appended to the message, and delivery state is derived from whatever labels
//! are present when a reader looks.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use label_delivery::{delivery_ack_label_sequence, parse_delivery_labels, DeliveryState};
//!
//! let at = Utc.with_ymd_and_hms(2026, 2, 17, 12, 0, 0).unwrap();
//! let mut labels = vec!["delivery:pending".to_string()];
//! labels.extend(delivery_ack_label_sequence("gastown/worker", &at));
//!
//! let status = parse_delivery_labels(&labels);
//! assert_eq!(status.state, DeliveryState::Acked);
//! assert_eq!(status.acked_by, "gastown/worker");
//! ```
//!
//! ## Architecture
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`protocol`] | Label vocabulary, timestamp encoding, producers, state deriver, ack state machine |
//! | [`store`] | Label store contract and in-memory reference store |
//! | [`delivery`] | Send / acknowledge / status operations driven against a store |

// Crate-level lint configuration: stylistic doc-comment lints only.
#![allow(clippy::empty_line_after_doc_comments, clippy::doc_lazy_continuation)]

// ── Public modules ──────────────────────────────────────────────────────────

/// Label vocabulary, producers, and the delivery state deriver.
pub mod protocol;

/// Label store contract (app implements) and `MemoryLabelStore`.
pub mod store;

/// Store-driving operations: `mark_sent`, `acknowledge`, `delivery_status`.
pub mod delivery;

// ── Re-exports for convenience ──────────────────────────────────────────────

pub use protocol::{
    delivery_ack_label_sequence, delivery_send_labels, parse_delivery_labels, AckPhase,
    AckProgress, AckSequenceError, AckStep, DeliveryLabel, DeliveryState, DeliveryStatus,
};

pub use store::{LabelStore, MemoryLabelStore, StoreError};

pub use delivery::{acknowledge, delivery_status, mark_sent, AckOptions, DeliveryError};

// ── Library metadata ────────────────────────────────────────────────────────

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version string.
pub fn version() -> &'static str {
    VERSION
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
        assert!(version().contains('.'));
    }

    #[test]
    fn test_reexported_round_trip() {
        let store = MemoryLabelStore::new();
        mark_sent(&store, "msg-1").unwrap();
        let at = chrono::Utc::now();
        let status = acknowledge(&store, "msg-1", "crew/alice", &at, &AckOptions::default())
            .unwrap();
        assert_eq!(status.state, DeliveryState::Acked);
        assert_eq!(status.acked_by, "crew/alice");
    }
}
