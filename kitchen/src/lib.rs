pub mod kitchen_actors;
pub mod messages;

pub use kitchen_actors::chef::Chef;
pub use kitchen_actors::kitchen::Kitchen;
