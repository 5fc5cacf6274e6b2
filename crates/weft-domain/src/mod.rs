//! # Domain Layer
//!
//! Core types of the weft resolution engine. Nothing in this crate resolves
//! anything; it only describes what a resolution is made of.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy shared by every layer |
//! | [`value_objects`] | Lifetimes, pipeline states, scope identifiers |
//! | [`entities`] | Definitions, class descriptors, prototypes, contexts, traces |
//! | [`ports`] | The `Service` trait and the resolver handed to factories |
//! | [`constants`] | Engine-wide defaults |

pub mod constants;
pub mod entities;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use entities::*;
pub use error::{Error, Result};
pub use ports::*;
pub use value_objects::*;
