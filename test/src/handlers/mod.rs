//! Route handlers of the demo application.

pub mod public;
