//! Cross-cutting building blocks shared by the feature modules and the binary.

pub mod config;
pub mod error;
pub mod extractors;
pub mod identity;
pub mod middleware;
pub mod rejection;
pub mod response;
pub mod storage;
pub mod time;
