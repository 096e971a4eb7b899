//! # Domain Module
//!
//! Core domain types for proposal deposits.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
