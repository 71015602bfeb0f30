pub mod client;
pub mod collection;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod mutation;
pub mod risk;
pub mod stats;
pub mod types;
pub mod view;

pub use client::*;
pub use collection::*;
pub use config::*;
pub use dashboard::*;
pub use error::*;
pub use filter::*;
pub use mutation::*;
pub use risk::*;
pub use stats::*;
pub use types::*;
pub use view::*;
