use actix::Message;
use common::errors::FlowError;
use common::types::dtos::{DeliveryCompleted, DeliveryTask};
use serde::{Deserialize, Serialize};

/// Message sent when the driver accepts a ready order.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<DeliveryTask, FlowError>")]
pub struct TakeOrder {
    pub order_id: u64,
    pub client_position: (f32, f32),
}

/// Message sent when the driver leaves the store with the current order.
#[derive(Message, Debug, Clone, Copy, Serialize, Deserialize)]
#[rtype(result = "Result<DeliveryTask, FlowError>")]
pub struct StartDriving;

/// Message sent when the driver hands the order over at the door.
///
/// Photo and signature are both optional.
#[derive(Message, Debug, Clone, Default, Serialize, Deserialize)]
#[rtype(result = "Result<DeliveryCompleted, FlowError>")]
pub struct ConfirmArrival {
    pub photo: Option<String>,
    pub signature: Option<String>,
}

/// Message to toggle whether the driver accepts new orders.
#[derive(Message, Debug, Clone, Copy, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct SetOnline(pub bool);

#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "DriverState")]
pub struct GetDriverState;

/// What the driver screen shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverState {
    pub driver_id: String,
    pub position: (f32, f32),
    pub online: bool,
    pub current_order: Option<u64>,
    pub completed: Vec<u64>,
}

/// Internal: the board reports the driver reached the client.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "()")]
pub struct ReachedClient {
    pub order_id: u64,
}
