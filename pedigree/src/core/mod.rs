//! A module contain the interfaces, utilities and data-structures that are
//! shared by the other modules.

pub mod base;
pub mod error;
pub mod options;
pub mod properties;
pub mod utils;
