//! Store-driving delivery operations.
//!
//! These wrap the pure producers and deriver around a `LabelStore`:
//! `mark_sent` writes the send label, `acknowledge` writes the ack sequence
//! one append at a time, and `delivery_status` reads and derives.

use chrono::{DateTime, TimeZone};
use thiserror::Error;

use crate::protocol::sequence::{delivery_send_labels, AckProgress};
use crate::protocol::state::{parse_delivery_labels, DeliveryStatus};
use crate::store::{LabelStore, StoreError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Label store error: {0}")]
    Store(#[from] StoreError),

    /// An ack append failed. Steps before it are durable; the message still
    /// reads as pending.
    #[error("Ack interrupted appending {label} ({applied} of 3 steps applied): {source}")]
    AckInterrupted {
        label: String,
        applied: usize,
        #[source]
        source: StoreError,
    },
}

pub type Result<T> = std::result::Result<T, DeliveryError>;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AckOptions {
    /// Read the label set first and skip ack steps that are already present.
    /// Also returns early without appending if the message is already acked.
    pub skip_applied_steps: bool,
}

impl Default for AckOptions {
    fn default() -> Self {
        Self {
            skip_applied_steps: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Phase 1: mark a message as durably sent.
pub fn mark_sent<S: LabelStore + ?Sized>(store: &S, message_id: &str) -> Result<()> {
    for label in delivery_send_labels() {
        store.append_label(message_id, &label)?;
    }
    log::debug!("Message {} marked pending", message_id);
    Ok(())
}

/// Phase 2: record that `recipient_identity` acknowledged the message at `at`.
///
/// Each ack step is a separate append, issued only after the previous one
/// succeeded. On failure the error reports which step was interrupted and
/// the call can simply be retried.
pub fn acknowledge<S, Tz>(
    store: &S,
    message_id: &str,
    recipient_identity: &str,
    at: &DateTime<Tz>,
    options: &AckOptions,
) -> Result<DeliveryStatus>
where
    S: LabelStore + ?Sized,
    Tz: TimeZone,
{
    let mut progress = AckProgress::new(recipient_identity, at);

    if options.skip_applied_steps {
        let current = store.get_labels(message_id)?;
        let status = parse_delivery_labels(&current);
        if status.is_acked() {
            log::debug!(
                "Message {} already acked by {:?}; nothing to append",
                message_id,
                status.acked_by
            );
            return Ok(status);
        }
        progress.resume_from(&current);
    }

    while let Some(step) = progress.next_step().cloned() {
        let label = step.label();
        if let Err(source) = store.append_label(message_id, &label) {
            log::warn!(
                "Ack append failed for message {} at {}: {}",
                message_id,
                label,
                source
            );
            return Err(DeliveryError::AckInterrupted {
                label,
                applied: progress.applied_count(),
                source,
            });
        }
        progress.advance();
    }

    log::info!("Message {} acked by {:?}", message_id, recipient_identity);
    delivery_status(store, message_id)
}

/// Read a message's labels and derive its delivery state.
pub fn delivery_status<S: LabelStore + ?Sized>(
    store: &S,
    message_id: &str,
) -> Result<DeliveryStatus> {
    let labels = store.get_labels(message_id)?;
    Ok(parse_delivery_labels(&labels))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
