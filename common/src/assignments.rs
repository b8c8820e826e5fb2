use crate::errors::FlowError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// One-to-one map between orders and the drivers delivering them.
///
/// Unlike a plain bidirectional map, an existing pair is never silently
/// replaced: both the order and the driver must be free.
#[derive(Debug, Clone, Default)]
pub struct Assignments {
    by_order: HashMap<u64, String>,
    by_driver: HashMap<String, u64>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, order_id: u64, driver_id: &str) -> Result<(), FlowError> {
        if self.by_order.contains_key(&order_id) {
            return Err(FlowError::AlreadyAssigned(order_id));
        }
        if let Some(current) = self.by_driver.get(driver_id) {
            return Err(FlowError::DriverBusy {
                driver_id: driver_id.to_string(),
                order_id: *current,
            });
        }
        self.by_order.insert(order_id, driver_id.to_string());
        self.by_driver.insert(driver_id.to_string(), order_id);
        Ok(())
    }

    /// Frees the driver of `order_id`. The order keeps no driver afterwards.
    pub fn release_order(&mut self, order_id: u64) -> Option<String> {
        let driver_id = self.by_order.remove(&order_id)?;
        self.by_driver.remove(&driver_id);
        Some(driver_id)
    }

    pub fn driver_of(&self, order_id: u64) -> Option<&String> {
        self.by_order.get(&order_id)
    }

    pub fn order_of(&self, driver_id: &str) -> Option<u64> {
        self.by_driver.get(driver_id).copied()
    }

    pub fn is_driver_free(&self, driver_id: &str) -> bool {
        !self.by_driver.contains_key(driver_id)
    }

    pub fn len(&self) -> usize {
        self.by_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_order.is_empty()
    }
}

impl Serialize for Assignments {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.by_order.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Assignments {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let by_order = HashMap::<u64, String>::deserialize(deserializer)?;
        let by_driver = by_order
            .iter()
            .map(|(order_id, driver_id)| (driver_id.clone(), *order_id))
            .collect();
        Ok(Assignments {
            by_order,
            by_driver,
        })
    }
}
