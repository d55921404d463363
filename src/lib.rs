#![doc = include_str!("../README.md")]

mod error;

pub mod decode;
pub mod edge;
pub mod telegram;

pub use error::{Error, Result};
