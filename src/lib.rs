//! Reflexive - simulation runner for the reflexive belief graph

pub mod cli;
pub mod logging;
