pub mod label;
pub mod sequence;
pub mod state;
pub mod timestamp;

pub use label::{DeliveryLabel, ACKED_AT_PREFIX, ACKED_BY_PREFIX, LABEL_ACKED, LABEL_PENDING};
pub use sequence::{
    delivery_ack_label_sequence, delivery_send_labels, AckPhase, AckProgress, AckSequenceError,
    AckStep,
};
pub use state::{parse_delivery_labels, DeliveryState, DeliveryStatus};
pub use timestamp::{format_ack_timestamp, normalize_ack_time, parse_ack_timestamp};
