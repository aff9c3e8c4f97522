use thiserror::Error;

use domain::ban::BanError;
use domain::error::DomainError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal server error")]
    InternalServerError,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden { message: String },
}

impl From<BanError> for AppError {
    fn from(error: BanError) -> Self {
        match error {
            BanError::EmptyReason | BanError::InvalidDuration(_) | BanError::InvalidBanType(_) => {
                AppError::ValidationError {
                    message: error.to_string(),
                }
            }
            BanError::ProtectedTarget | BanError::InsufficientPermissions => AppError::Forbidden {
                message: error.to_string(),
            },
            BanError::ActionInProgress => AppError::Conflict {
                message: error.to_string(),
            },
        }
    }
}

impl AppError {
    /// Errors caused by the caller's input or permissions, as opposed to
    /// failures of the service or its collaborators.
    pub fn is_client_error(&self) -> bool {
        match self {
            AppError::Domain(_)
            | AppError::ValidationError { .. }
            | AppError::NotFound { .. }
            | AppError::Conflict { .. }
            | AppError::Unauthorized
            | AppError::Forbidden { .. } => true,
            AppError::ConfigError { .. }
            | AppError::DatabaseError { .. }
            | AppError::InternalServerError => false,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ban_errors_map_onto_the_taxonomy() {
        assert!(matches!(
            AppError::from(BanError::EmptyReason),
            AppError::ValidationError { .. }
        ));
        assert!(matches!(
            AppError::from(BanError::ProtectedTarget),
            AppError::Forbidden { .. }
        ));
        assert!(matches!(
            AppError::from(BanError::ActionInProgress),
            AppError::Conflict { .. }
        ));
    }

    #[test]
    fn store_failures_are_not_client_errors() {
        let error = AppError::DatabaseError {
            message: "connection reset".to_string(),
        };
        assert!(!error.is_client_error());
        assert!(AppError::Unauthorized.is_client_error());
    }
}
