pub mod client_actors;
pub mod commands;
pub mod messages;
pub mod render;

pub use client_actors::app::App;
