//! Compliance domain: driver records, rules, and evaluation services

pub mod model;
pub mod service;
