/// Delivery label vocabulary.
///
/// Labels are opaque strings in the store. This module owns their exact wire
/// text; the rest of the crate classifies and builds labels through
/// `DeliveryLabel` instead of matching raw strings.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::protocol::timestamp::{format_ack_timestamp, parse_ack_timestamp};

// ---------------------------------------------------------------------------
// Wire constants
// ---------------------------------------------------------------------------

/// Marker: message durably sent, not yet acknowledged.
pub const LABEL_PENDING: &str = "delivery:pending";

/// Marker: receipt acknowledged.
pub const LABEL_ACKED: &str = "delivery:acked";

/// Keyed prefix carrying the acknowledging identity.
pub const ACKED_BY_PREFIX: &str = "delivery-acked-by:";

/// Keyed prefix carrying the RFC 3339 UTC ack time.
pub const ACKED_AT_PREFIX: &str = "delivery-acked-at:";

// ---------------------------------------------------------------------------
// DeliveryLabel
// ---------------------------------------------------------------------------

/// A single label classified against the delivery vocabulary.
///
/// `parse` followed by `to_string` reproduces the input text for every label
/// except non-canonical `delivery-acked-at:` values, which re-render in the
/// canonical UTC form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryLabel {
    Pending,
    Acked,
    AckedBy(String),
    AckedAt(DateTime<Utc>),
    /// Anything else, including `delivery-acked-at:` with an unparseable value.
    Unrecognized(String),
}

impl DeliveryLabel {
    pub fn parse(label: &str) -> Self {
        match label {
            LABEL_PENDING => DeliveryLabel::Pending,
            LABEL_ACKED => DeliveryLabel::Acked,
            _ => {
                if let Some(identity) = label.strip_prefix(ACKED_BY_PREFIX) {
                    DeliveryLabel::AckedBy(identity.to_string())
                } else if let Some(value) = label.strip_prefix(ACKED_AT_PREFIX) {
                    match parse_ack_timestamp(value) {
                        Some(at) => DeliveryLabel::AckedAt(at),
                        None => {
                            log::debug!("Ignoring malformed ack timestamp label: {:?}", label);
                            DeliveryLabel::Unrecognized(label.to_string())
                        }
                    }
                } else {
                    DeliveryLabel::Unrecognized(label.to_string())
                }
            }
        }
    }

    /// True for the two boolean marker labels.
    pub fn is_marker(&self) -> bool {
        matches!(self, DeliveryLabel::Pending | DeliveryLabel::Acked)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, DeliveryLabel::Unrecognized(_))
    }
}

impl fmt::Display for DeliveryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryLabel::Pending => f.write_str(LABEL_PENDING),
            DeliveryLabel::Acked => f.write_str(LABEL_ACKED),
            DeliveryLabel::AckedBy(identity) => write!(f, "{}{}", ACKED_BY_PREFIX, identity),
            DeliveryLabel::AckedAt(at) => {
                write!(f, "{}{}", ACKED_AT_PREFIX, format_ack_timestamp(at))
            }
            DeliveryLabel::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl From<&str> for DeliveryLabel {
    fn from(label: &str) -> Self {
        DeliveryLabel::parse(label)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_markers() {
        assert_eq!(DeliveryLabel::parse("delivery:pending"), DeliveryLabel::Pending);
        assert_eq!(DeliveryLabel::parse("delivery:acked"), DeliveryLabel::Acked);
        assert!(DeliveryLabel::Pending.is_marker());
        assert!(!DeliveryLabel::AckedBy("x".into()).is_marker());
    }

    #[test]
    fn test_parse_keyed() {
        assert_eq!(
            DeliveryLabel::parse("delivery-acked-by:gastown/worker"),
            DeliveryLabel::AckedBy("gastown/worker".to_string())
        );
        assert_eq!(
            DeliveryLabel::parse("delivery-acked-at:2026-02-17T12:00:00Z"),
            DeliveryLabel::AckedAt(Utc.with_ymd_and_hms(2026, 2, 17, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_empty_identity_round_trips() {
        let label = DeliveryLabel::parse("delivery-acked-by:");
        assert_eq!(label, DeliveryLabel::AckedBy(String::new()));
        assert_eq!(label.to_string(), "delivery-acked-by:");
    }

    #[test]
    fn test_identity_may_contain_colons() {
        let label = DeliveryLabel::parse("delivery-acked-by:rig:crew/alice");
        assert_eq!(label, DeliveryLabel::AckedBy("rig:crew/alice".to_string()));
    }

    #[test]
    fn test_malformed_timestamp_is_unrecognized() {
        let label = DeliveryLabel::parse("delivery-acked-at:not-a-date");
        assert!(!label.is_recognized());
        assert_eq!(label.to_string(), "delivery-acked-at:not-a-date");
    }

    #[test]
    fn test_space_separated_timestamp_is_unrecognized() {
        let raw = "delivery-acked-at:2026-02-17 12:00:00Z";
        assert_eq!(DeliveryLabel::parse(raw), DeliveryLabel::Unrecognized(raw.to_string()));
    }

    #[test]
    fn test_near_misses_are_unrecognized() {
        for raw in [
            "delivery:Pending",
            "delivery:pending ",
            "delivery:ack",
            "delivery-acked-by",
            "priority:high",
            "",
        ] {
            assert_eq!(DeliveryLabel::parse(raw), DeliveryLabel::Unrecognized(raw.to_string()));
        }
    }

    #[test]
    fn test_display_matches_wire_text() {
        let at = Utc.with_ymd_and_hms(2026, 2, 17, 12, 0, 0).unwrap();
        assert_eq!(DeliveryLabel::Pending.to_string(), LABEL_PENDING);
        assert_eq!(DeliveryLabel::Acked.to_string(), LABEL_ACKED);
        assert_eq!(
            DeliveryLabel::AckedAt(at).to_string(),
            "delivery-acked-at:2026-02-17T12:00:00Z"
        );
    }
}
