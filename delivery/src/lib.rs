pub mod delivery_actors;
pub mod messages;

pub use delivery_actors::delivery::Delivery;
