pub mod board_messages;
pub mod delivery_messages;
pub mod order_messages;

pub use board_messages::*;
pub use delivery_messages::*;
pub use order_messages::*;
