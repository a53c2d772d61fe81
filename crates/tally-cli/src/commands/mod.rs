//! Command handlers, one module per noun.

pub mod attendance;
pub mod grade;
pub mod resolve;
