//! Page modules

pub mod greeting;

pub use greeting::GreetingPage;
