//! The module contains the error the engine can throw.
//!
//! Deleting a record that does not exist is never an error: the store treats
//! it as a no-op. Errors are reserved for:
//!
//! - [`MissingDatabase`] thrown when a [`Store`] is built without storage.
//! - write-time validation ([`InvalidAmount`], [`InvalidName`],
//!   [`InvalidMember`], [`KeyNotFound`], [`ExistingKey`]).
//! - storage failures ([`Database`], [`Serialization`]).
//!
//!  [`MissingDatabase`]: EngineError::MissingDatabase
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidName`]: EngineError::InvalidName
//!  [`InvalidMember`]: EngineError::InvalidMember
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Database`]: EngineError::Database
//!  [`Serialization`]: EngineError::Serialization
//!  [`Store`]: crate::Store
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("store has no database: call `StoreBuilder::database` before `build`")]
    MissingDatabase,
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid member: {0}")]
    InvalidMember(String),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingDatabase, Self::MissingDatabase) => true,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidMember(a), Self::InvalidMember(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Serialization(a), Self::Serialization(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
