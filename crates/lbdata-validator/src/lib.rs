//! LB Data Validator library
//!
//! This exposes the internal modules for testing and for embedding the
//! validator in other tools

pub mod commands;
pub mod dataset;
pub mod output;
pub mod parser;
pub mod schema;
pub mod utils;
