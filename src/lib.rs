//! # Bharat Chain - Work Attestation Ledger
//!
//! An append-only, hash-linked ledger of construction-work attestations.
//! A contract's declared work and the sensor readings taken on site are
//! committed together as one block, and each commit settles a simulated
//! payment from the project wallet.
//!
//! ## What It Does
//! - **Hash-linked chain**: SHA-256 content hashes, `IND-` transaction IDs, integrity checks
//! - **Settlement**: pluggable policy deciding RELEASED vs LOCKED per commit
//! - **Wallet**: running balance, gas spend and commit count
//! - **Interpreter**: line-oriented scripts (`CONTRACT`, `SENSOR_DATA`, `GENERATE_TX`, ...)
//! - **HTTP API**: JSON endpoints over one shared in-memory ledger
//!
//! ## How the Code Is Organized
//! - `core/`: blocks, the hash engine, the ledger and settlement policies
//! - `wallet/`: balance accounting and lenient amount parsing
//! - `interpreter/`: command parsing and the pending-record fold
//! - `display/`: terminal rendering of DISPLAY snapshots
//! - `server/`: axum routes
//! - `config/`: TOML settings with environment overrides
//! - `utils/`: digests, timestamps and JSON helpers
//! - `cli/`: command-line interface
//!
//! ## Where to Start
//! 1. `core/ledger.rs` for append and verification
//! 2. `interpreter/session.rs` for how a script becomes blocks
//! 3. `server/routes.rs` for the JSON contract

pub mod cli;
pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod interpreter;
pub mod server;
pub mod utils;
pub mod wallet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Settings, SettlementSettings, GLOBAL_CONFIG};
pub use core::{
    content_hash, derive_transaction_id, short_digest, verify_chain, verify_chain_with_policy,
    AlwaysRelease, Block, Bounds, CommitRequest, ContractRecord, Ledger, Payload, SensorBounds,
    SensorRecord, SettlementMode, SettlementPolicy, SharedLedger, Status, UNSET,
};
pub use display::{render_box, Presenter, TerminalPresenter};
pub use error::{LedgerError, Result};
pub use interpreter::{
    step, Diagnostic, DisplaySnapshot, Event, PendingRecord, RunOutcome, Session,
};
pub use utils::{canonical_json, current_timestamp, read_chain, sha256_hex, write_chain};
pub use wallet::{coerce_amount, Amount, Wallet, WalletLedger};
