//! Library components of the report generator CLI.

pub mod logging;
pub mod pipeline;
