pub mod config;
pub mod domain;
pub mod error;
pub mod send;
pub mod sequence;
pub mod stream;
