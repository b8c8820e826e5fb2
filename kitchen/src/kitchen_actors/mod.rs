pub mod chef;
pub mod kitchen;
