use crate::assignments::Assignments;
use crate::types::delivery_status::DeliveryStatus;
use crate::types::dtos::{DeliveryCompleted, DeliveryTask, Order};
use crate::types::kitchen_status::KitchenStatus;
use actix::{Message, Recipient};
use serde::{Deserialize, Serialize};

/// Everything that changed on the board, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum BoardEvent {
    OrderCreated {
        order_id: u64,
        store_id: String,
        priority: bool,
    },
    OrderAdvanced {
        order_id: u64,
        from: KitchenStatus,
        to: KitchenStatus,
    },
    CheckTicked {
        order_id: u64,
        check: String,
    },
    DriverAssigned {
        order_id: u64,
        driver_id: String,
    },
    DeliveryAdvanced {
        order_id: u64,
        from: DeliveryStatus,
        to: DeliveryStatus,
    },
    DeliveryCompleted(DeliveryCompleted),
}

impl BoardEvent {
    pub fn order_id(&self) -> u64 {
        match self {
            BoardEvent::OrderCreated { order_id, .. }
            | BoardEvent::OrderAdvanced { order_id, .. }
            | BoardEvent::CheckTicked { order_id, .. }
            | BoardEvent::DriverAssigned { order_id, .. }
            | BoardEvent::DeliveryAdvanced { order_id, .. } => *order_id,
            BoardEvent::DeliveryCompleted(completed) => completed.order_id,
        }
    }
}

/// Pushed to every subscriber after the board accepted a change.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct BoardNotification {
    pub log_index: u64,
    pub event: BoardEvent,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Subscribe {
    pub recipient: Recipient<BoardNotification>,
}

/// Full copy of the board, for admin views and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub orders: Vec<Order>,
    pub tasks: Vec<DeliveryTask>,
    pub assignments: Assignments,
    pub events: Vec<(u64, BoardEvent)>,
}

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "BoardSnapshot")]
pub struct GetSnapshot;
