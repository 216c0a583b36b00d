//! Route handlers for the contacts REST API.

pub mod contacts;
pub mod health;
