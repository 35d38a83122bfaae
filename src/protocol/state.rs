/// Delivery state derivation.
///
/// State is never stored. It is recomputed from a message's label set by a
/// single fold that only tests for marker presence, so the result does not
/// depend on label order:
///
/// - `delivery:acked` present → `acked`, with whatever ack metadata was seen
/// - else `delivery:pending` present → `pending`, metadata withheld
/// - else → unknown (`""`)
///
/// A partially written ack sequence therefore always reads as `pending`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::protocol::label::DeliveryLabel;

// ---------------------------------------------------------------------------
// DeliveryState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeliveryState {
    /// Neither marker present.
    #[default]
    #[serde(rename = "")]
    Unknown,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "acked")]
    Acked,
}

impl DeliveryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryState::Unknown => "",
            DeliveryState::Pending => "pending",
            DeliveryState::Acked => "acked",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "pending" => DeliveryState::Pending,
            "acked" => DeliveryState::Acked,
            _ => DeliveryState::Unknown,
        }
    }
}

impl fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DeliveryStatus
// ---------------------------------------------------------------------------

/// Result of deriving state from one label set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryStatus {
    pub state: DeliveryState,
    /// Acknowledging identity; empty unless `state` is `Acked`.
    pub acked_by: String,
    /// Ack time; `None` unless `state` is `Acked` and a valid timestamp label exists.
    pub acked_at: Option<DateTime<Utc>>,
    /// Whether `delivery:pending` was present in the label set.
    pub send_recorded: bool,
}

impl DeliveryStatus {
    pub fn is_pending(&self) -> bool {
        self.state == DeliveryState::Pending
    }

    pub fn is_acked(&self) -> bool {
        self.state == DeliveryState::Acked
    }

    /// Acked with no `delivery:pending` label. Reported as acked; callers
    /// that require a send record can treat this as an integrity problem.
    pub fn is_missing_send_record(&self) -> bool {
        self.is_acked() && !self.send_recorded
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Accumulator for the single pass over a label set.
#[derive(Default)]
struct LabelScan {
    seen_pending: bool,
    seen_acked: bool,
    acked_by: String,
    acked_at: Option<DateTime<Utc>>,
}

impl LabelScan {
    fn observe(mut self, label: DeliveryLabel) -> Self {
        match label {
            DeliveryLabel::Pending => self.seen_pending = true,
            DeliveryLabel::Acked => self.seen_acked = true,
            // Duplicates from retried writes: last seen wins.
            DeliveryLabel::AckedBy(identity) => self.acked_by = identity,
            DeliveryLabel::AckedAt(at) => self.acked_at = Some(at),
            DeliveryLabel::Unrecognized(_) => {}
        }
        self
    }

    fn finish(self) -> DeliveryStatus {
        if self.seen_acked {
            if !self.seen_pending {
                log::debug!("Delivery acked without a send record");
            }
            DeliveryStatus {
                state: DeliveryState::Acked,
                acked_by: self.acked_by,
                acked_at: self.acked_at,
                send_recorded: self.seen_pending,
            }
        } else if self.seen_pending {
            DeliveryStatus {
                state: DeliveryState::Pending,
                send_recorded: true,
                ..DeliveryStatus::default()
            }
        } else {
            DeliveryStatus::default()
        }
    }
}

/// Derive delivery state and ack metadata from a message's labels.
///
/// Total: empty sets, unknown labels and malformed metadata never fail.
pub fn parse_delivery_labels<I, S>(labels: I) -> DeliveryStatus
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|label| DeliveryLabel::parse(label.as_ref()))
        .fold(LabelScan::default(), LabelScan::observe)
        .finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
