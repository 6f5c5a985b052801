//! # Application Layer
//!
//! Contains the core logic and orchestration of the bot.
//! This includes the wizard steps, input validation, rendering, session storage and command routing.

pub mod logging;
pub mod renderer;
pub mod router;
pub mod session;
pub mod validators;
pub mod wizard;
