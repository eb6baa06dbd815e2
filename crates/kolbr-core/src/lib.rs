//! # KOLBR Core
//!
//! Data models and pure transformations for the KOLBR Analyst pipeline.
//!
//! This crate holds everything that does not touch the network: the loosely
//! typed trade record coming out of the recent-trades feed, the canonical
//! analysis request built from it, the verdict returned by the remote analyst
//! and the presentation derived from that verdict.

pub mod error;
pub mod models;
pub mod normalize;
pub mod render;
pub mod verdict;

pub use error::*;
pub use models::*;
pub use normalize::*;
pub use render::*;
pub use verdict::*;
