#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
/// Error handling and custom [`Error`](std::error::Error) types
pub mod errors;
/// Functions for loading the product and order feeds, and writing reports
pub mod io;
/// Business logic for pricing, capacity and searching orders
pub mod ops;
/// Data types used throughout the order desk
pub mod types;
