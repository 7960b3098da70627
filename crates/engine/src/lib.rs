//! Blank Wars Engine library.
//!
//! Financial decision resolution: characters are periodically offered a
//! purchase or debt payment, the coach endorses or advises against it, and a
//! judge grades the episode before the ledger is updated.
//!
//! ## Structure
//!
//! - `entities/` - Entity modules wrapping repository ports
//! - `use_cases/` - User story orchestration across entities
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
