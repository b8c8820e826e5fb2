use super::status_flow::StatusFlow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an order inside the kitchen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum KitchenStatus {
    Pending,      // Received, nobody working on it yet
    Preparing,    // Ingredients being put together
    Baking,       // In the oven, countdown running
    Cooling,      // Out of the oven
    Packaging,    // Boxed and labelled
    QualityCheck, // Checklist being ticked
    Ready,        // Waiting for a driver
}

impl StatusFlow for KitchenStatus {
    const SEQUENCE: &'static [Self] = &[
        KitchenStatus::Pending,
        KitchenStatus::Preparing,
        KitchenStatus::Baking,
        KitchenStatus::Cooling,
        KitchenStatus::Packaging,
        KitchenStatus::QualityCheck,
        KitchenStatus::Ready,
    ];
}

impl KitchenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KitchenStatus::Pending => "pending",
            KitchenStatus::Preparing => "preparing",
            KitchenStatus::Baking => "baking",
            KitchenStatus::Cooling => "cooling",
            KitchenStatus::Packaging => "packaging",
            KitchenStatus::QualityCheck => "quality_check",
            KitchenStatus::Ready => "ready",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::SEQUENCE
            .iter()
            .copied()
            .find(|status| status.as_str() == value)
    }
}

impl fmt::Display for KitchenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_linear() {
        assert_eq!(KitchenStatus::initial(), KitchenStatus::Pending);
        assert_eq!(KitchenStatus::Pending.next(), Some(KitchenStatus::Preparing));
        assert_eq!(
            KitchenStatus::QualityCheck.next(),
            Some(KitchenStatus::Ready)
        );
        assert!(KitchenStatus::Ready.is_terminal());
        assert!(!KitchenStatus::Cooling.is_terminal());
    }

    #[test]
    fn only_the_adjacent_state_is_accepted() {
        for (i, from) in KitchenStatus::SEQUENCE.iter().enumerate() {
            for (j, to) in KitchenStatus::SEQUENCE.iter().enumerate() {
                assert_eq!(from.can_advance_to(*to), j == i + 1, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn skipping_fails_with_invalid_transition() {
        let err = KitchenStatus::Pending
            .check_advance(KitchenStatus::Ready)
            .unwrap_err();
        assert_eq!(err, crate::errors::FlowError::invalid_transition("pending", "ready"));
    }

    #[test]
    fn serializes_in_snake_case() {
        let json = serde_json::to_string(&KitchenStatus::QualityCheck).unwrap();
        assert_eq!(json, "\"quality_check\"");
        assert_eq!(
            KitchenStatus::parse("quality_check"),
            Some(KitchenStatus::QualityCheck)
        );
        assert_eq!(KitchenStatus::parse("burnt"), None);
    }
}
