pub mod booking;
pub mod catalog;
pub mod profile;
pub mod shop;
pub mod subscription;
