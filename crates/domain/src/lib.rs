//! Domain layer for Narrator
//!
//! Contains the speaker identities, playback states, quantization inputs and
//! the entities exchanged between the speech backends and the session.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
