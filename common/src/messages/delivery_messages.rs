use crate::errors::FlowError;
use crate::types::delivery_status::DeliveryStatus;
use crate::types::dtos::{DeliveryCompleted, DeliveryTask, ProofOfDelivery};
use actix::Message;
use serde::{Deserialize, Serialize};

/// Message to hand a ready order to a driver.
///
/// ## Purpose
/// Creates the delivery task. The order must be `ready` and neither the
/// order nor the driver may already be part of another task.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<DeliveryTask, FlowError>")]
pub struct AssignDriver {
    pub order_id: u64,
    pub driver_id: String,
    pub driver_position: (f32, f32),
    pub client_position: (f32, f32),
}

#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<DeliveryTask, FlowError>")]
pub struct AdvanceDelivery {
    pub order_id: u64,
    pub target: DeliveryStatus,
}

/// Message to report distance driven since the last report.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<DeliveryTask, FlowError>")]
pub struct UpdateDeliveryProgress {
    pub order_id: u64,
    pub km_driven: f32,
}

/// Message to close a delivery task with its proof of delivery.
///
/// Only the first confirmation of an arrived task succeeds.
#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Result<DeliveryCompleted, FlowError>")]
pub struct ConfirmDelivery {
    pub order_id: u64,
    pub proof: ProofOfDelivery,
}

#[derive(Message, Debug, Clone, Serialize, Deserialize)]
#[rtype(result = "Option<DeliveryTask>")]
pub struct GetDeliveryTask {
    pub order_id: u64,
}
