//! Baserow REST API client.
//!
//! Companion to `brtool-webhook`: webhook callbacks usually write something
//! back to the table that notified them, which is what
//! [`BaserowClient::update_row_field`] is for.

mod client;
mod config;
mod error;

pub use client::{BaserowClient, InstanceSettings};
pub use config::BaserowConfig;
pub use error::{ClientError, ClientResult};
