//! Game system rules.
//!
//! Each submodule is a self-contained rule set of pure functions.

pub mod finance;
