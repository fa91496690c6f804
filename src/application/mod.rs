//! Application layer: run-mode parsing, batch execution and reporting.
//!
//! The binary turns its flags into a [`RunMode`], then hands the selected
//! names to a [`Dispatcher`], which produces a [`BatchReport`].

pub mod dispatcher;
pub mod mode;
pub mod report;

pub use dispatcher::Dispatcher;
pub use mode::{RunMode, parse_param};
pub use report::{BatchReport, Outcome, RunResult};
