pub mod catalog;
pub mod checklist;
pub mod delivery_status;
pub mod dtos;
pub mod kitchen_status;
pub mod status_flow;
