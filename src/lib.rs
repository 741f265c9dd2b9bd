//! Core of an interactive, keyboard-driven terminal file manager: the line
//! editor, command classifier, suggestion engine, and highlighter that make
//! the prompt feel live. See `DESIGN.md` for the grounding ledger.

pub mod binindex;
pub mod buffer;
pub mod classifier;
pub mod config;
pub mod error;
pub mod executor;
pub mod highlight;
pub mod listing;
pub mod logging;
pub mod session;
pub mod stores;
pub mod suggest;
pub mod term;
pub mod word;
