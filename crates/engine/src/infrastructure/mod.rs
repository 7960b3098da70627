//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod llm_client;
pub mod llm_judge;
pub mod llm_narrator;
pub mod persistence;
pub mod ports;
pub mod resilient_llm;
