//! Application layer orchestrating the equipment workflow.
//!
//! `EquipmentService` is the single entry point for every front-end. It owns
//! the session, the request gateway and the badge scanner, and composes the
//! read queries and the checkout/return orchestrators.

pub mod dispatch;
pub mod gateway;
pub mod orchestrator;
pub mod outcome;
pub mod queries;
pub mod service;
