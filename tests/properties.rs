//! Property tests for the label producers and the state deriver.

use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use label_delivery::{
    delivery_ack_label_sequence, delivery_send_labels, parse_delivery_labels, DeliveryState,
};
use proptest::prelude::*;

fn arb_time() -> impl Strategy<Value = DateTime<Utc>> {
    // 1970 .. ~2100, with sub-second noise
    (0i64..4_102_444_800, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
}

fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("delivery:pending".to_string()),
        Just("delivery:acked".to_string()),
        "[a-z/]{0,12}".prop_map(|id| format!("delivery-acked-by:{}", id)),
        arb_time().prop_map(|t| format!("delivery-acked-at:{}", t.format("%Y-%m-%dT%H:%M:%SZ"))),
        Just("delivery-acked-at:not-a-date".to_string()),
        "[a-z:-]{0,20}",
    ]
}

proptest! {
    #[test]
    fn ack_sequence_ends_with_acked_marker(identity in ".*", at in arb_time()) {
        let seq = delivery_ack_label_sequence(&identity, &at);
        prop_assert_eq!(seq.len(), 3);
        prop_assert_eq!(seq[2].as_str(), "delivery:acked");
        prop_assert_eq!(seq[0].clone(), format!("delivery-acked-by:{}", identity));
    }

    #[test]
    fn ack_timestamp_round_trips_to_seconds(identity in "[a-z/]{1,16}", at in arb_time()) {
        let mut labels = delivery_send_labels();
        labels.extend(delivery_ack_label_sequence(&identity, &at));
        let status = parse_delivery_labels(&labels);
        prop_assert_eq!(status.state, DeliveryState::Acked);
        prop_assert_eq!(status.acked_by, identity);
        prop_assert_eq!(status.acked_at, Some(at.trunc_subsecs(0)));
    }

    #[test]
    fn deriver_is_idempotent(labels in prop::collection::vec(arb_label(), 0..12)) {
        prop_assert_eq!(parse_delivery_labels(&labels), parse_delivery_labels(&labels));
    }

    #[test]
    fn acked_never_downgrades(
        base in prop::collection::vec(arb_label(), 0..8),
        appended in prop::collection::vec(arb_label(), 0..8),
    ) {
        let mut labels = base;
        labels.push("delivery:acked".to_string());
        prop_assert_eq!(parse_delivery_labels(&labels).state, DeliveryState::Acked);

        labels.extend(appended);
        prop_assert_eq!(parse_delivery_labels(&labels).state, DeliveryState::Acked);
    }

    #[test]
    fn metadata_never_flips_pending(
        identity in "[a-z/]{0,16}",
        at in arb_time(),
        noise in prop::collection::vec("[a-z]{1,6}:[a-z]{1,8}", 0..4),
    ) {
        let seq = delivery_ack_label_sequence(&identity, &at);
        let mut labels = delivery_send_labels();
        labels.extend(noise);
        labels.extend(seq[..2].iter().cloned());

        let status = parse_delivery_labels(&labels);
        prop_assert_eq!(status.state, DeliveryState::Pending);
        prop_assert_eq!(status.acked_by, "");
        prop_assert_eq!(status.acked_at, None);
    }

    #[test]
    fn state_ignores_label_order(labels in prop::collection::vec(arb_label(), 0..12)) {
        let mut reversed = labels.clone();
        reversed.reverse();
        prop_assert_eq!(
            parse_delivery_labels(&labels).state,
            parse_delivery_labels(&reversed).state
        );
    }
}
