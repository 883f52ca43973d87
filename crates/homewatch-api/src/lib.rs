//! # Homewatch API
//! Client for the homework status API plus response-shape validation.

pub mod client;
pub mod validate;

pub use client::StatusClient;
pub use validate::check_response;
