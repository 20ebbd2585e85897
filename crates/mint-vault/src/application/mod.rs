//! # Application Module
//!
//! The drop service orchestrating issuance, custody, and administration.

pub mod service;

pub use service::DropService;
