//! Domain types and pure logic for the Slotbook booking service.
//!
//! Nothing in this crate touches the database or the network; the `db` and
//! `api` crates build on these types.

pub mod errors;
pub mod models;
