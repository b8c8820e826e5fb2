pub mod arrivals;
pub mod order_board;
