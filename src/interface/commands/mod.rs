//! # Command Handlers
//!
//! Contains specific handler functions for each supported command (e.g. /create_sticker, /reset).
//! These handlers are invoked by the Router and answer with directives.

pub mod help;
pub mod sticker;
