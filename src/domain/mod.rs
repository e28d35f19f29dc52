pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod errors;
pub mod limits;
pub mod order;
pub mod ports;
