//! Adapters behind the domain ports.

pub mod activity;
pub mod http;
pub mod in_memory;
pub mod scanner;
