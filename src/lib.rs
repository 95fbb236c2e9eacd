//! cardvault - a card collection service
//!
//! Cards are owned records keyed by `(owner, local id)`. Every write goes
//! through a strict validator before it reaches the record store.
//!
//! - [`card`]: the card model and its closed enumerations
//! - [`validation`]: untrusted JSON to validated [`card::Card`]
//! - [`store`]: the record store trait, in-memory and file-backed stores
//! - [`service`]: validator and store composed into card operations
//! - [`rest_api`], [`http_server`]: the HTTP surface
//! - [`cli`]: the `cardvault` binary

pub mod card;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod rest_api;
pub mod service;
pub mod store;
pub mod validation;
