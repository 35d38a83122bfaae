//! Send-phase and ack-phase label producers.
//!
//! The ack phase is three labels that MUST be appended one at a time, in
//! order:
//!
//! 1. `delivery-acked-by:<identity>`
//! 2. `delivery-acked-at:<RFC 3339 UTC>`
//! 3. `delivery:acked`
//!
//! A crash after step 1 or 2 leaves the message `pending`. Once step 3 is
//! visible, steps 1 and 2 are already durable.
//!
//! `AckProgress` tracks one acknowledger through the steps and rejects any
//! attempt to record them out of order.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;
use thiserror::Error;

use crate::protocol::label::DeliveryLabel;
use crate::protocol::timestamp::normalize_ack_time;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AckSequenceError {
    #[error("Out-of-order ack step: expected {expected}, got {got}")]
    OutOfOrder { expected: String, got: String },

    #[error("Ack sequence already complete")]
    AlreadyComplete,
}

// ---------------------------------------------------------------------------
// Producers
// ---------------------------------------------------------------------------

/// Labels written during phase 1 (send).
pub fn delivery_send_labels() -> Vec<String> {
    vec![DeliveryLabel::Pending.to_string()]
}

/// Labels for phase 2 (ack), in the order they must be appended.
pub fn delivery_ack_label_sequence<Tz: TimeZone>(
    recipient_identity: &str,
    at: &DateTime<Tz>,
) -> Vec<String> {
    ack_steps(recipient_identity, at)
        .iter()
        .map(AckStep::label)
        .collect()
}

fn ack_steps<Tz: TimeZone>(recipient_identity: &str, at: &DateTime<Tz>) -> [AckStep; 3] {
    [
        AckStep::AckedBy(recipient_identity.to_string()),
        AckStep::AckedAt(normalize_ack_time(at)),
        AckStep::Acked,
    ]
}

// ---------------------------------------------------------------------------
// AckStep
// ---------------------------------------------------------------------------

/// One append of the ack sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckStep {
    AckedBy(String),
    AckedAt(DateTime<Utc>),
    Acked,
}

impl AckStep {
    pub fn delivery_label(&self) -> DeliveryLabel {
        match self {
            AckStep::AckedBy(identity) => DeliveryLabel::AckedBy(identity.clone()),
            AckStep::AckedAt(at) => DeliveryLabel::AckedAt(*at),
            AckStep::Acked => DeliveryLabel::Acked,
        }
    }

    /// Wire text to append.
    pub fn label(&self) -> String {
        self.delivery_label().to_string()
    }
}

// ---------------------------------------------------------------------------
// AckProgress
// ---------------------------------------------------------------------------

/// How far one acknowledger has got through its ack sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AckPhase {
    NotStarted,
    /// `delivery-acked-by:` written, timestamp not yet.
    AckedByWritten,
    /// Both metadata labels written; the message still reads as pending.
    MetadataWritten,
    Acked,
}

/// Ordered ack sequence for one acknowledger.
///
/// Callers append `next_step()` to the store and, only once that append has
/// succeeded, call `record_applied` with the same step. Skipping ahead is an
/// error.
#[derive(Debug, Clone)]
pub struct AckProgress {
    steps: [AckStep; 3],
    applied: usize,
}

impl AckProgress {
    pub fn new<Tz: TimeZone>(recipient_identity: &str, at: &DateTime<Tz>) -> Self {
        AckProgress {
            steps: ack_steps(recipient_identity, at),
            applied: 0,
        }
    }

    /// All steps in append order, applied or not.
    pub fn steps(&self) -> &[AckStep] {
        &self.steps
    }

    /// The only step that may be appended next, or `None` when complete.
    pub fn next_step(&self) -> Option<&AckStep> {
        self.steps.get(self.applied)
    }

    pub fn applied_count(&self) -> usize {
        self.applied
    }

    pub fn phase(&self) -> AckPhase {
        match self.applied {
            0 => AckPhase::NotStarted,
            1 => AckPhase::AckedByWritten,
            2 => AckPhase::MetadataWritten,
            _ => AckPhase::Acked,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.applied == self.steps.len()
    }

    /// Record that `step` has been durably appended.
    pub fn record_applied(&mut self, step: &AckStep) -> Result<(), AckSequenceError> {
        let expected = self.next_step().ok_or(AckSequenceError::AlreadyComplete)?;
        if expected != step {
            log::warn!(
                "Rejected out-of-order ack step {} (expected {})",
                step.label(),
                expected.label()
            );
            return Err(AckSequenceError::OutOfOrder {
                expected: expected.label(),
                got: step.label(),
            });
        }
        self.applied += 1;
        Ok(())
    }

    /// Mark the current `next_step()` as appended. No-op once complete.
    pub(crate) fn advance(&mut self) {
        if !self.is_complete() {
            self.applied += 1;
        }
    }

    /// Advance past leading steps whose exact labels are already present in
    /// `labels`, stopping at the first missing one. Returns how many steps
    /// were skipped.
    ///
    /// Timestamps are part of the match, so a retry planned with a different
    /// time re-appends the `delivery-acked-at:` step.
    pub fn resume_from<I, S>(&mut self, labels: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let present: HashSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();

        let start = self.applied;
        while let Some(step) = self.next_step() {
            if !present.contains(&step.label()) {
                break;
            }
            self.applied += 1;
        }

        let skipped = self.applied - start;
        if skipped > 0 {
            log::debug!("Ack sequence resumed: {} step(s) already applied", skipped);
        }
        skipped
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
