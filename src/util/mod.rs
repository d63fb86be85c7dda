//! Utility modules: clock abstraction, timeout.

pub mod clock;
pub mod timeout;
