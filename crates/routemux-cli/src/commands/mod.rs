//! CLI command implementations.

pub mod common;
pub mod decode;
pub mod encode;
pub mod formats;
pub mod routes;
pub mod run;
