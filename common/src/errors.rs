use thiserror::Error;

/// Every way an order, a delivery task or a role view can refuse an action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("Quality checklist incomplete, missing: {}", missing.join(", "))]
    ChecklistIncomplete { missing: Vec<String> },
    #[error("Delivery task for order {0} has not arrived yet")]
    NotArrived(u64),
    #[error("Delivery task for order {0} was already confirmed")]
    AlreadyConfirmed(u64),
    #[error("Order not found: {0}")]
    OrderNotFound(u64),
    #[error("Delivery task not found for order: {0}")]
    TaskNotFound(u64),
    #[error("Driver {0} has no order in progress")]
    NoActiveTask(String),
    #[error("Delivery task for order {0} is not on the way")]
    NotDriving(u64),
    #[error("Driver {driver_id} is already delivering order {order_id}")]
    DriverBusy { driver_id: String, order_id: u64 },
    #[error("Order {0} is not ready for delivery")]
    OrderNotReady(u64),
    #[error("Order {0} already has a driver assigned")]
    AlreadyAssigned(u64),
    #[error("Cannot check out an empty cart")]
    EmptyCart,
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
    #[error("Order {0} is not in quality_check")]
    NotInQualityCheck(u64),
    #[error("Unknown check item: {0}")]
    UnknownCheck(String),
    #[error("No view mounted for path {0}")]
    UnknownRoute(String),
    #[error("Role {role} cannot perform {action}")]
    ActionNotAllowed { role: String, action: String },
    #[error("Order {order_id} is still in the oven, {remaining_secs}s left")]
    OvenStillRunning { order_id: u64, remaining_secs: u64 },
    #[error("Cannot understand command: {0}")]
    BadCommand(String),
    #[error("Actor unavailable: {0}")]
    Unavailable(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FlowError {
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        FlowError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
