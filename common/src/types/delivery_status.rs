use super::status_flow::StatusFlow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a delivery task from the driver's point of view.
///
/// `Arrived` is the last state of the flow. Leaving it is the external
/// confirmation, tracked by the task itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Driver assigned, still at the store
    Assigned,
    /// On the way to the client
    Driving,
    /// At the client's door
    Arrived,
}

impl StatusFlow for DeliveryStatus {
    const SEQUENCE: &'static [Self] = &[
        DeliveryStatus::Assigned,
        DeliveryStatus::Driving,
        DeliveryStatus::Arrived,
    ];
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Assigned => write!(f, "assigned"),
            DeliveryStatus::Driving => write!(f, "driving"),
            DeliveryStatus::Arrived => write!(f, "arrived"),
        }
    }
}
