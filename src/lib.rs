//! 1A2B guessing-game server library.
//!
//! Two independent components sit behind a thin HTTP layer:
//!
//! - **Session engine** ([`GameEngine`]): the in-memory table of
//!   in-progress games, each a 4-distinct-digit secret plus an attempt
//!   counter, with guess validation and A/B scoring.
//! - **Record store** ([`RecordStore`]): a JSON-file-backed pair of
//!   historical bests (fewest attempts, fastest completion).
//!
//! The HTTP layer ([`router`]) only marshals requests into those two
//! components and maps their errors onto status codes.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod game;
mod records;
mod server;
mod session;

// Crate-level exports - Game logic
pub use game::{CODE_LEN, GuessError, Score, Secret, parse_guess, score};

// Crate-level exports - Session engine
pub use session::{EngineError, GameEngine, GameSession, SessionId};

// Crate-level exports - Record store
pub use records::{BestRecord, RecordStore};

// Crate-level exports - HTTP layer
pub use server::{
    AbCount, AppState, GuessRequest, GuessResponse, NewGameResponse, RecordRequest,
    UpdateResponse, router,
};
