//! Domain types and the ports the application layer talks through.

pub mod booking;
pub mod employee;
pub mod identity;
pub mod inventory;
pub mod ports;
pub mod record;
pub mod session;
pub mod submission;
