//! SmartContact: a contact book that syncs with a remote collection service
//! and falls back to an on-device snapshot when the service is unreachable.

pub mod api;
pub mod error;
pub mod insight;
pub mod logging;
pub mod search;
pub mod server;
pub mod session;
pub mod settings;
pub mod storage;
pub mod sync;
pub mod utils;
