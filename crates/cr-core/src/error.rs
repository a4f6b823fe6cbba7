use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid rating code: {0:?}")]
    InvalidRatingCode(String),

    #[error("Alias {alias:?} is claimed by both {first} and {second}")]
    AliasConflict {
        alias: String,
        first: String,
        second: String,
    },

    #[error("Duplicate rating code: {0}")]
    DuplicateRatingCode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
