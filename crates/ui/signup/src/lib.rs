//! Terminal front end for the user info form.
//!
//! `run` opens the interactive page; `validate` applies `path=value` assignments
//! non-interactively and reports the outcome.

pub mod action;
pub mod app;
pub mod cli;
pub mod components;
pub mod errors;
pub mod logging;
pub mod tui;
pub mod validate;
