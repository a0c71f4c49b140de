//! Domain validation errors
//!
//! Every caller-supplied value that fails a domain constraint is rejected
//! with a [`ValidationError`] before anything is constructed.

/// A caller-supplied value violated a domain constraint
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Unknown rarity: {0}")]
    UnknownRarity(String),

    #[error("Unknown special effect: {0}")]
    UnknownEffect(String),

    #[error("Invalid rarity weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid gradient: {0}")]
    InvalidGradient(String),

    #[error("Custom colors must contain at least one non-blank color")]
    EmptyCustomColors,

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid position: latitude {latitude}, longitude {longitude}")]
    InvalidPosition { latitude: f64, longitude: f64 },

    #[error("Invalid resource amounts: {0}")]
    InvalidResources(String),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}
