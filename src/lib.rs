//! auctioneer: turn-based auction game engine
//!
//! Goals:
//! - Deterministic text command interpretation (no language model in the loop)
//! - A validating state machine that never leaves a half-applied state behind
//! - Rejections are values, not panics
//!
//! ## Quick start: run an auction from chat lines
//! ```
//! use auctioneer::session::Session;
//! use auctioneer::state::Status;
//!
//! let mut session = Session::with_seed(7);
//! session.chat("start game players Ann, Bo budget 100");
//! session.chat("add Old Vase");
//! session.chat("auction next");
//! session.chat("Ann bid 5");
//! session.chat("sell it");
//!
//! let state = session.state();
//! assert_eq!(state.budget("Ann"), Some(95));
//! assert_eq!(state.status, Status::GameOver);
//! ```
//!
//! ## Driving the state machine directly
//! ```
//! use auctioneer::action::Action;
//! use auctioneer::applier::apply;
//! use auctioneer::state::GameState;
//!
//! let init = Action::InitGame { players: vec!["Ann".into()], budget: 10 };
//! let out = apply(&init, GameState::new());
//! assert!(out.changed);
//! let again = apply(&init, out.state);
//! assert!(!again.changed);
//! ```
//!
//! ## TUI
//! Run the interactive console with:
//! ```sh
//! cargo run --bin auctioneer
//! ```

pub mod action;
pub mod applier;
pub mod ingest;
pub mod interpreter;
pub mod session;
pub mod state;
pub mod tui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
