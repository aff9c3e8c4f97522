use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid display name: {0}")]
    InvalidDisplayName(String),

    #[error("Perk '{0}' has not been granted to this profile")]
    PerkNotGranted(String),

    #[error("Invalid avatar URL: {0}")]
    InvalidAvatarUrl(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
