//! Core votelock client.
//!
//! Three cooperating pieces sit on top of the chain seams:
//! - [`LockupAggregator`] — pages through a staker's lockup slots one index
//!   at a time, folding running totals until the terminating empty slot.
//! - [`VoteSequencer`] — turns a user-entered amount into the minimal write
//!   sequence (conditional max-approval, then the vote extension), and offers
//!   the merge-then-extend compound action.
//! - [`AccountSession`] — address-keyed state with a fixed-interval poll
//!   loop and explicit reset on address change.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod sequencer;
pub mod session;
pub mod shutdown;

pub use aggregator::{LockupAggregator, Observation};
pub use config::ClientConfig;
pub use error::ClientError;
pub use sequencer::{ExtendReceipt, MergeReceipt, SubmitPhase, VoteSequencer};
pub use session::{AccountSession, SessionSnapshot};
pub use shutdown::ShutdownController;
