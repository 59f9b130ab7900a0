//! Structured entities: compounds and block objects.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ParseError;
use crate::naming::{convert_field_name, convert_struct_name, convert_type};
use crate::parser::Element;
use crate::profile::TargetProfile;
use crate::types::{FieldInsert, FieldMap, SchemaType, doc_lines, emitted_members};

/// Reads the emitted fields of `entry` into a [`FieldMap`].
fn collect_fields(
    profile: &TargetProfile,
    owner: &str,
    entry: &Element,
    diagnostics: &mut Diagnostics,
) -> Result<FieldMap, ParseError> {
    let mut fields = FieldMap::new();

    for member in emitted_members(profile, entry)? {
        let name = convert_field_name(member.require("name")?);
        let mut ty = SchemaType::from_attributes(&member.tag, &member.attributes)?;

        if let Some(rule) = profile.field_override(owner, &name) {
            if let Some(arr1) = &rule.arr1 {
                ty.arr1 = Some(arr1.clone());
            }
            if rule.clear_condition {
                ty.cond = None;
            }
        }

        match fields.insert(name.clone(), ty) {
            FieldInsert::Conflict { old, new } => diagnostics.report(Diagnostic::FieldConflict {
                owner: owner.to_string(),
                field: name,
                old,
                new,
            }),
            outcome => tracing::trace!(owner, field = %name, ?outcome, "field added"),
        }
    }

    Ok(fields)
}

/// A value type embedded in blocks and other compounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    /// Type name.
    pub name: String,
    /// Documentation lines.
    pub doc: Vec<String>,
    /// Takes a `#T#` type parameter.
    pub generic: bool,
    /// Fields in declaration order.
    pub fields: FieldMap,
}

impl Compound {
    /// Builds a compound from a `struct` or `compound` entry.
    ///
    /// # Errors
    /// Returns `ParseError` on missing attributes or malformed versions.
    pub fn from_element(
        profile: &TargetProfile,
        entry: &Element,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, ParseError> {
        let name = convert_type(entry.require("name")?);
        let fields = collect_fields(profile, &name, entry, diagnostics)?;

        Ok(Self {
            doc: doc_lines(&entry.text),
            generic: entry.attr("generic") == Some("true"),
            fields,
            name,
        })
    }

    /// Returns true if any field reads `#ARG#`.
    #[must_use]
    pub fn mentions_arg(&self) -> bool {
        self.fields.values().any(SchemaType::mentions_arg)
    }
}

/// A block type that can appear in a file's block list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NiObject {
    /// Type name.
    pub name: String,
    /// Documentation lines.
    pub doc: Vec<String>,
    /// Parent object, `None` when it derives directly from the root.
    pub parent: Option<String>,
    /// Never instantiated directly.
    pub is_abstract: bool,
    /// Own fields in declaration order, excluding inherited ones.
    pub fields: FieldMap,
}

impl NiObject {
    /// Builds an object from a `niobject` entry.
    ///
    /// # Errors
    /// Returns [`ParseError::MissingAttribute`] if `name` or `inherit` is
    /// absent.
    pub fn from_element(
        profile: &TargetProfile,
        entry: &Element,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, ParseError> {
        let name = convert_struct_name(entry.require("name")?);
        let inherit = entry.require("inherit")?;
        let fields = collect_fields(profile, &name, entry, diagnostics)?;

        Ok(Self {
            doc: doc_lines(&entry.text),
            parent: (inherit != profile.root_object).then(|| convert_struct_name(inherit)),
            is_abstract: entry.attr("abstract") == Some("true"),
            fields,
            name,
        })
    }
}
