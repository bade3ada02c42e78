//#![warn(missing_docs)]

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

pub mod common;
pub mod entities;
pub mod extract;
pub mod import;
pub mod online;
pub mod wallet;

pub use common::context::*;
pub use common::error::*;
pub use common::*;
pub use entities::*;

// Re-exports
pub use bitcoin;
pub use bitcoincore_rpc;
pub use log;
pub use serde;
pub use serde_json;
pub use structopt;

pub type Result<R> = std::result::Result<R, Error>;
