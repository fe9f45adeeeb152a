//! Terminal console for running an auction: state panel, chat log, input line,
//! and function-key buttons that send actions without going through the
//! command interpreter.

pub mod app;
pub mod controller;
pub mod ui;
