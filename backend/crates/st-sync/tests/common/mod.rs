#![allow(dead_code)]

mod fixtures;
mod memory_store;

pub use fixtures::*;
pub use memory_store::*;
