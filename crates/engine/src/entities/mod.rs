//! Entity modules - Domain capability encapsulation.
//!
//! Each module wraps operations for a domain entity type.
//! They depend on repository ports and provide the building blocks for use cases.

pub mod catalog;
pub mod character;
pub mod decision;

pub use catalog::Catalog;
pub use character::{Character, CharacterError};
pub use decision::Decision;
