pub mod booking;
pub mod catalog;
pub mod profile;
pub mod session;
pub mod shop;
