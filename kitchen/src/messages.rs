use actix::Message;
use common::errors::FlowError;
use common::types::dtos::Order;
use common::types::kitchen_status::KitchenStatus;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Message sent by the kitchen view to move an order to `target`.
///
/// Replies with the updated [`Order`](../../common/types/dtos/struct.Order.html).
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<Order, FlowError>")]
pub struct AdvanceKitchenOrder {
    pub order_id: u64,
    pub target: KitchenStatus,
}

/// Message sent when the "next" button of an order is pressed.
///
/// The kitchen looks up the current status and advances to the following one.
#[derive(Message, Debug, Clone, Copy, Serialize, Deserialize)]
#[rtype(result = "Result<Order, FlowError>")]
pub struct PressNext {
    pub order_id: u64,
}

/// Message sent when a cook ticks an item of the quality checklist.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<Order, FlowError>")]
pub struct TickQualityCheck {
    pub order_id: u64,
    pub check: String,
}

/// Message to read what the kitchen screen shows.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Result<KitchenView, FlowError>")]
pub struct GetKitchenView;

/// Orders of this store still in the kitchen and the running oven timers.
#[derive(Debug, Clone)]
pub struct KitchenView {
    pub queue: Vec<Order>,
    pub ovens: Vec<(u64, Duration)>,
}

impl KitchenView {
    pub fn oven_remaining(&self, order_id: u64) -> Option<Duration> {
        self.ovens
            .iter()
            .find(|(id, _)| *id == order_id)
            .map(|(_, remaining)| *remaining)
    }
}

/// Internal: an oven countdown reached zero.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct OvenFinished {
    pub order_id: u64,
}
