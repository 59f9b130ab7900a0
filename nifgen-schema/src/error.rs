//! Error types for nif.xml reading and schema construction.

use thiserror::Error;

/// Structural errors raised while reading the XML or interpreting its
/// attributes. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed entity or character reference.
    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Expression that matches none of the recognized shapes.
    #[error("unrecognized expression '{expression}'")]
    Expression {
        /// Offending expression text.
        expression: String,
    },

    /// Version string with a non-numeric component.
    #[error("invalid version string '{value}'")]
    InvalidVersion {
        /// Offending version text.
        value: String,
    },

    /// Document has no root element.
    #[error("invalid document structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Errors raised while assembling the [`Context`](crate::Context).
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Circular inheritance between objects.
    #[error("circular inheritance detected: {path}")]
    CircularReference {
        /// Chain of object names forming the cycle.
        path: String,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unrecognized expression error.
    pub fn expression(expression: impl Into<String>) -> Self {
        Self::Expression {
            expression: expression.into(),
        }
    }

    /// Creates an invalid version error.
    pub fn invalid_version(value: impl Into<String>) -> Self {
        Self::InvalidVersion {
            value: value.into(),
        }
    }
}
