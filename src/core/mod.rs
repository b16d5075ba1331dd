//! Core ledger functionality
//!
//! This module contains the block data model, the hash engine, the
//! append-only ledger with its integrity check, and the settlement policy.

pub mod block;
pub mod hash;
pub mod ledger;
pub mod settlement;

pub use block::{
    Block, ContractRecord, Payload, SensorRecord, GENESIS_PREVIOUS_HASH, GENESIS_SENTINEL,
    UNSET,
};
pub use hash::{content_hash, derive_transaction_id, short_digest};
pub use ledger::{
    verify_chain, verify_chain_with_policy, CommitRequest, Ledger, SharedLedger,
};
pub use settlement::{
    AlwaysRelease, Bounds, SensorBounds, SettlementMode, SettlementPolicy, Status,
};
