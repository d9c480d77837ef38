//! Small shared utilities: time abstraction, input parsing and polling.

pub mod clock;
pub mod parse;
pub mod poll;
