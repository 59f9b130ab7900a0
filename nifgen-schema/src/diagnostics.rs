//! Non-fatal findings collected while building the schema model.

use std::fmt;

/// A model inconsistency that does not stop generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A field was redeclared with a different shape; the first
    /// declaration was kept.
    FieldConflict {
        /// Compound or object owning the field.
        owner: String,
        /// Converted field name.
        field: String,
        /// Type of the kept declaration.
        old: String,
        /// Type of the rejected declaration.
        new: String,
    },
    /// An object inherits from a type that is not part of the model.
    UnresolvedParent {
        /// Object name.
        object: String,
        /// Missing parent name.
        parent: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldConflict {
                owner,
                field,
                old,
                new,
            } => write!(
                f,
                "redeclaration of field {field} in {owner} with incompatible signature (old: {old}, new: {new})"
            ),
            Self::UnresolvedParent { object, parent } => {
                write!(f, "{object} inherits from unknown type {parent}")
            }
        }
    }
}

/// Ordered collection of diagnostics for one run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and records a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Iterates over all diagnostics in report order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of field conflicts recorded.
    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| matches!(d, Diagnostic::FieldConflict { .. }))
            .count()
    }

    /// Returns the number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
