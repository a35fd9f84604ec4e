#![doc = include_str!("../README.md")]

mod channel;
mod error;
mod event;
mod id;
mod pool;
mod stats;
mod worker;

pub use crate::error::*;
pub use crate::event::*;
pub use crate::id::*;
pub use crate::pool::*;
pub use crate::stats::PoolStats;
