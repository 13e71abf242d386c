//! HTTP handlers for the gateway.

pub(crate) mod chat;
pub(crate) mod status;
