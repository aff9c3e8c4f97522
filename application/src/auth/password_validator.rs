use crate::error::{AppError, AppResult};
use zxcvbn::{Score, zxcvbn};

pub struct PasswordValidator {
    min_score: Score,
}

impl Default for PasswordValidator {
    fn default() -> Self {
        Self {
            min_score: Score::Three,
        }
    }
}

impl PasswordValidator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_min_score(mut self, min_score: Score) -> Self {
        self.min_score = min_score;
        self
    }

    /// Builds a validator from the numeric score used in configuration.
    /// Values above 4 are treated as 4.
    pub fn from_config_score(min_score: u8) -> Self {
        let min_score = match min_score {
            0 => Score::Zero,
            1 => Score::One,
            2 => Score::Two,
            3 => Score::Three,
            _ => Score::Four,
        };
        Self::new().with_min_score(min_score)
    }

    /// Rejects weak passwords. `user_inputs` are words the estimator should
    /// treat as guessable, such as the account's email and display name.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> AppResult<()> {
        let estimate = zxcvbn(password, user_inputs);

        if estimate.score() < self.min_score {
            let feedback_messages = estimate
                .feedback()
                .map(|feedback| {
                    feedback
                        .warning()
                        .map(|warning| warning.to_string())
                        .into_iter()
                        .chain(feedback.suggestions().iter().map(ToString::to_string))
                        .collect::<Vec<_>>()
                })
                .filter(|messages| !messages.is_empty())
                .unwrap_or_else(|| vec!["Password is too weak".to_string()]);

            return Err(AppError::ValidationError {
                message: format!(
                    "Password strength is insufficient (score: {}/4, minimum: {}). {}",
                    estimate.score() as u8,
                    self.min_score as u8,
                    feedback_messages.join("; ")
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_password_is_rejected() {
        let result = PasswordValidator::new().validate("password123", &[]);
        assert!(matches!(result, Err(AppError::ValidationError { .. })));
    }

    #[test]
    fn long_mixed_passphrase_is_accepted() {
        let result =
            PasswordValidator::new().validate("vivid-Lantern-93-orchard-Pebble", &["mira"]);
        assert!(result.is_ok());
    }

    #[test]
    fn zero_minimum_accepts_anything() {
        let validator = PasswordValidator::from_config_score(0);
        assert!(validator.validate("a", &[]).is_ok());
    }
}
