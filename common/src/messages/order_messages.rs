use crate::errors::FlowError;
use crate::types::dtos::{LineItem, Order, TransitionEffect};
use crate::types::kitchen_status::KitchenStatus;
use actix::Message;
use serde::{Deserialize, Serialize};

/// Message to register a new order on the board.
///
/// ## Purpose
/// Sent when a client checks out (or the arrival simulation fires). The board
/// assigns the order id and the oven time.
#[derive(Message, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[rtype(result = "Result<Order, FlowError>")]
pub struct CreateOrder {
    pub client_id: String,
    pub store_id: String,
    pub items: Vec<LineItem>,
    pub priority: bool,
}

/// Message to move an order one step forward in the kitchen.
///
/// ## Contents
/// - `order_id`: The order to advance.
/// - `target`: The status the caller expects to reach. Anything but the
///   next one is rejected.
///
/// Replies with the updated order and the effect the transition triggered.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<(Order, TransitionEffect), FlowError>")]
pub struct AdvanceOrder {
    pub order_id: u64,
    pub target: KitchenStatus,
}

/// Message to tick one item of an order's quality checklist.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<Order, FlowError>")]
pub struct TickCheck {
    pub order_id: u64,
    pub check: String,
}

#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Option<Order>")]
pub struct GetOrder {
    pub order_id: u64,
}

/// Message to list orders, optionally filtered.
///
/// Replies with priority orders first, then oldest first.
#[derive(Message, Debug, Clone, Default, Serialize, Deserialize)]
#[rtype(result = "Vec<Order>")]
pub struct GetOrders {
    pub status: Option<KitchenStatus>,
    pub store_id: Option<String>,
}
