//! Configuration management
//!
//! Settings for the ledger node: listen address, wallet funding, the
//! release fee and the settlement policy. Values come from an optional TOML
//! file with environment overrides applied on top.

pub mod settings;

pub use settings::{Settings, SettlementSettings, GLOBAL_CONFIG};
