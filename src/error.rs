//! Error type for engine construction and unit instantiation.
//!
//! Out-of-range parameter values are never errors; they are clamped.

use thiserror::Error;

use crate::unit::ComponentDescription;

#[derive(Error, Debug)]
pub enum Error {
    /// The engine configuration cannot be used to build a graph.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    /// `instantiate` was called for a description nobody registered.
    #[error("no unit registered for component {0}")]
    ComponentNotRegistered(ComponentDescription),

    /// A registered factory refused to build its unit.
    #[error("failed to instantiate {name}: {reason}")]
    Instantiation { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
