pub mod board_actors;

pub use board_actors::arrivals::OrderArrivals;
pub use board_actors::order_board::OrderBoard;
