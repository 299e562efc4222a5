//! Application state

pub mod session;
