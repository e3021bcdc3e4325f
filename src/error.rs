//! Error types for the sketch_judge library
//!
//! Evaluation itself never fails: degenerate drawings resolve to a zero
//! [`ScoreBreakdown`](crate::ScoreBreakdown). Errors are reserved for setup
//! time, when a template asset or a configuration file is unusable.

use thiserror::Error;

/// Result type alias for sketch_judge operations
pub type Result<T> = std::result::Result<T, EvaluationError>;

/// Setup-time failures of the drawing evaluator
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// Image file could not be opened or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Template asset has no detectable shape
    #[error("Template has no usable shape: {reason}")]
    EmptyTemplate { reason: String },

    /// Invalid configuration value
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read, parsed or written
    #[error("Configuration file error: {message}")]
    ConfigFileError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl EvaluationError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration file error with context
    pub fn config_file<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigFileError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// True when the error stems from exercise setup rather than file I/O
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EvaluationError::EmptyTemplate { .. } | EvaluationError::InvalidParameter { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            EvaluationError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            EvaluationError::EmptyTemplate { .. } => {
                "The reference shape is blank. Please choose a template with a visible drawing."
                    .to_string()
            }
            EvaluationError::InvalidParameter { parameter, value } => {
                format!("Setting '{}' has an unusable value ({}).", parameter, value)
            }
            EvaluationError::ConfigFileError { .. } => {
                "Could not read the evaluator settings file.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EvaluationError::EmptyTemplate {
            reason: "no contour found".into(),
        };
        assert_eq!(err.to_string(), "Template has no usable shape: no contour found");

        let err = EvaluationError::invalid_parameter("canonical_size", 0);
        assert_eq!(err.to_string(), "Invalid parameter: canonical_size = 0");
    }

    #[test]
    fn test_configuration_classification() {
        assert!(EvaluationError::EmptyTemplate { reason: String::new() }.is_configuration_error());
        assert!(EvaluationError::invalid_parameter("dilation_radius", -1).is_configuration_error());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!EvaluationError::image_load("template.png", io).is_configuration_error());
    }

    #[test]
    fn test_source_is_preserved() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = EvaluationError::config_file("config.json", io);
        assert!(err.source().is_some());
        assert!(err.user_message().contains("settings file"));
    }
}
