//! API client and state container for the matters service.
//!
//! The `data` feature builds the domain, forms and views layers only; the
//! default `client` feature adds the HTTP transport, gateways, stores and the
//! async services that tie them together.

pub mod domain;
pub mod forms;
pub mod views;

#[cfg(feature = "client")]
pub mod gateway;
#[cfg(feature = "client")]
pub mod models;
#[cfg(feature = "client")]
pub mod services;
#[cfg(feature = "client")]
pub mod storage;
#[cfg(feature = "client")]
pub mod store;
#[cfg(feature = "client")]
pub mod transport;
