//! A single shard process: an off-chain 2PC participant backed by a volatile key-value store,
//! plus a signed driver for that shard's own on-chain escrow contract.

pub mod config;
pub mod metrics;
pub mod service;
pub mod state;

pub use config::Config;
pub use service::Shard;
