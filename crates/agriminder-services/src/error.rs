//! Store-specific error types.

use agriminder_core::{AppError, DatabaseError, RusqliteErrorExt, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Store not initialized: {0} missing")]
    NotInitialized(&'static str),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.into_database_error())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => AppError::Validation(v),
            StoreError::Database(d) => AppError::Database(d),
            StoreError::NotInitialized(what) => {
                AppError::Database(DatabaseError::QueryFailed(format!("{} missing", what)))
            }
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
