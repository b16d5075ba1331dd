//! Command interpreter
//!
//! Turns a line-oriented script into commits against the ledger. The draft
//! of the next block is an explicit `PendingRecord` value threaded through
//! `step` for each command; `Session::run` folds a whole script.

pub mod command;
pub mod record;
pub mod session;

pub use command::{parse_line, parse_script, Command, MissingArgument, ScriptLine};
pub use record::{DisplaySnapshot, PendingRecord, TxView};
pub use session::{step, Diagnostic, Event, RunOutcome, Session};
