//! Wallet accounting
//!
//! The simulated payment account behind the ledger: running balance, gas
//! spend and commit count, updated once per appended block.

pub mod balance;

pub use balance::{coerce_amount, Amount, Wallet, WalletLedger};
