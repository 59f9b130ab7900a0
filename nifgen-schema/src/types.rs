//! Schema type definitions.
//!
//! This module contains the field storage description ([`SchemaType`]), the
//! ordered field map with its redeclaration rule, and the integer-backed
//! entities: bit flags, enums and bit fields.

use crate::error::ParseError;
use crate::expr::parse_expression;
use crate::naming::{convert_field_name, convert_type, convert_variant_name, is_numeric};
use crate::parser::{Attributes, Element};
use crate::predicates::should_emit_member;
use crate::profile::TargetProfile;
use crate::version::Version;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Splits element text into trimmed documentation lines.
#[must_use]
pub fn doc_lines(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    text.lines().map(|line| line.trim().to_string()).collect()
}

/// Storage shape of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaType {
    /// Converted base type name.
    pub ty: String,
    /// Converted generic argument.
    pub template: Option<String>,
    /// Element count expression.
    pub arr1: Option<String>,
    /// Second dimension, added to `arr1` when both are literals.
    pub arr2: Option<String>,
    /// Argument passed to the referenced type's reader.
    pub arg: Option<String>,
    /// Existence condition.
    pub cond: Option<String>,
    /// First runtime header version the field appears in.
    pub ver1: Option<String>,
    /// Last runtime header version the field appears in.
    pub ver2: Option<String>,
}

impl SchemaType {
    /// Creates a plain scalar of the given (already converted) type.
    #[must_use]
    pub fn new(ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            template: None,
            arr1: None,
            arr2: None,
            arg: None,
            cond: None,
            ver1: None,
            ver2: None,
        }
    }

    /// Reads a field description from element attributes.
    ///
    /// # Errors
    /// Returns [`ParseError::MissingAttribute`] if `type` is absent.
    pub fn from_attributes(element: &str, attrs: &Attributes) -> Result<Self, ParseError> {
        let owned = |key: &str| attrs.get(key).map(str::to_string);

        Ok(Self {
            ty: convert_type(attrs.require(element, "type")?),
            template: attrs.get("template").map(convert_type),
            arr1: owned("arr1"),
            arr2: owned("arr2"),
            arg: owned("arg"),
            cond: owned("cond"),
            ver1: owned("ver1"),
            ver2: owned("ver2"),
        })
    }

    /// Base type with its generic argument, e.g. `Ref<NiNode>`.
    #[must_use]
    pub fn inner_type(&self) -> String {
        match &self.template {
            Some(t) => format!("{}<{}>", self.ty, t),
            None => self.ty.clone(),
        }
    }

    /// Type including array wrapping, excluding optionality.
    #[must_use]
    pub fn full_type(&self) -> String {
        let inner = self.inner_type();
        match self.arr1.as_deref() {
            Some(arr1) if is_numeric(arr1) => match self.arr2.as_deref() {
                Some(arr2) if is_numeric(arr2) => format!("[{inner}; {arr1} + {arr2}]"),
                _ => format!("[{inner}; {arr1}]"),
            },
            Some(_) => format!("Vec<{inner}>"),
            None => inner,
        }
    }

    /// Returns true if the field has an existence condition.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.cond.is_some()
    }

    /// Returns true for a sequence whose length comes from another field.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.arr1.as_deref().is_some_and(|a| !is_numeric(a))
    }

    /// Returns true for a `bool` stored as a byte.
    #[must_use]
    pub fn needs_bool_mapping(&self) -> bool {
        self.ty == "bool"
    }

    /// Returns true if any expression refers to the reader argument.
    #[must_use]
    pub fn mentions_arg(&self) -> bool {
        [&self.cond, &self.arr1, &self.arr2, &self.arg]
            .into_iter()
            .flatten()
            .any(|e| e.contains("#ARG#"))
    }

    /// Length expression of a dynamic sequence.
    ///
    /// # Errors
    /// Returns [`ParseError::Expression`] if `arr1` does not parse.
    pub fn count_expression(&self) -> Result<Option<String>, ParseError> {
        match self.arr1.as_deref() {
            Some(arr1) if !is_numeric(arr1) => parse_expression(arr1).map(Some),
            _ => Ok(None),
        }
    }

    /// Normalized existence condition.
    ///
    /// # Errors
    /// Returns [`ParseError::Expression`] if `cond` does not parse.
    pub fn condition_expression(&self) -> Result<Option<String>, ParseError> {
        self.cond.as_deref().map(parse_expression).transpose()
    }

    /// Runtime header version range check, if `ver1` or `ver2` is set.
    ///
    /// # Errors
    /// Returns [`ParseError::InvalidVersion`] if a bound does not parse.
    pub fn version_guard(&self) -> Result<Option<String>, ParseError> {
        let mut parts = Vec::new();
        if let Some(ver1) = &self.ver1 {
            let v = Version::parse(ver1)?;
            parts.push(format!(
                "FileVersion({}) <= _header_version",
                v.to_tuple_literal()
            ));
        }
        if let Some(ver2) = &self.ver2 {
            let v = Version::parse(ver2)?;
            parts.push(format!(
                "_header_version <= FileVersion({})",
                v.to_tuple_literal()
            ));
        }
        Ok((!parts.is_empty()).then(|| parts.join(" && ")))
    }

    /// Argument passed to the referenced type, as a Rust expression.
    #[must_use]
    pub fn arg_expression(&self) -> Option<String> {
        self.arg.as_deref().map(|arg| {
            if is_numeric(arg) {
                arg.to_string()
            } else {
                convert_field_name(arg)
            }
        })
    }

    /// Returns true if both declarations read the same bytes, ignoring
    /// their conditions.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.ty == other.ty
            && self.template == other.template
            && self.arr1 == other.arr1
            && self.arr2 == other.arr2
            && self.arg == other.arg
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_optional() {
            write!(f, "Option<{}>", self.full_type())
        } else {
            f.write_str(&self.full_type())
        }
    }
}

/// What happened when a field was added to a [`FieldMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInsert {
    /// First declaration of the name.
    Inserted,
    /// Unconditional redeclaration, ignored.
    Dropped,
    /// Conditions of both declarations were combined.
    Merged,
    /// Shapes differ; the first declaration was kept.
    Conflict {
        /// Type of the kept declaration.
        old: String,
        /// Type of the rejected declaration.
        new: String,
    },
}

/// Insertion-ordered fields of a compound or object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: IndexMap<String, SchemaType>,
}

impl FieldMap {
    /// Creates an empty field map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, applying the redeclaration rule when `name` exists.
    ///
    /// Two conditional declarations of the same shape are combined as
    /// `(old) #OR# (new)`, verbatim even when both conditions are equal. If
    /// either one is unconditional the combined field is unconditional.
    pub fn insert(&mut self, name: String, field: SchemaType) -> FieldInsert {
        let Some(old) = self.fields.get_mut(&name) else {
            self.fields.insert(name, field);
            return FieldInsert::Inserted;
        };

        if old.cond.is_none() && field.cond.is_none() {
            return FieldInsert::Dropped;
        }

        if !old.matches(&field) {
            return FieldInsert::Conflict {
                old: old.to_string(),
                new: field.to_string(),
            };
        }

        old.cond = match (old.cond.take(), field.cond) {
            (Some(a), Some(b)) => Some(format!("({a}) #OR# ({b})")),
            _ => None,
        };
        FieldInsert::Merged
    }

    /// Looks up a field by converted name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.fields.get(name)
    }

    /// Iterates over fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SchemaType)> {
        self.fields.iter()
    }

    /// Iterates over field types in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &SchemaType> {
        self.fields.values()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Filters an entry's children through [`should_emit_member`].
pub(crate) fn emitted_members<'a>(
    profile: &TargetProfile,
    entry: &'a Element,
) -> Result<Vec<&'a Element>, ParseError> {
    let mut members = Vec::with_capacity(entry.children.len());
    for child in &entry.children {
        if should_emit_member(profile, &child.attributes)? {
            members.push(child);
        }
    }
    Ok(members)
}

fn prefixed(prefix: Option<&str>, name: &str) -> String {
    let name = convert_variant_name(name);
    match prefix {
        Some(prefix) => format!("{prefix}_{name}"),
        None => name,
    }
}

/// A set of named bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitFlags {
    /// Type name.
    pub name: String,
    /// Documentation lines.
    pub doc: Vec<String>,
    /// Storage primitive.
    pub storage: String,
    /// Flag name to bit index.
    pub flags: IndexMap<String, u32>,
}

impl BitFlags {
    /// Builds a bit flag set from a `bitflags` entry.
    ///
    /// # Errors
    /// Returns `ParseError` on missing or malformed attributes.
    pub fn from_element(profile: &TargetProfile, entry: &Element) -> Result<Self, ParseError> {
        let mut flags = IndexMap::new();
        let prefix = entry.attr("prefix");

        for flag in emitted_members(profile, entry)? {
            let bit = flag.require("bit")?;
            let bit = bit
                .parse::<u32>()
                .map_err(|_| ParseError::invalid_attr(&flag.tag, "bit", bit))?;
            flags.insert(prefixed(prefix, flag.require("name")?), bit);
        }

        Ok(Self {
            name: entry.require("name")?.to_string(),
            doc: doc_lines(&entry.text),
            storage: convert_type(entry.require("storage")?),
            flags,
        })
    }
}

/// A C-like enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enum {
    /// Type name.
    pub name: String,
    /// Documentation lines.
    pub doc: Vec<String>,
    /// Storage primitive.
    pub storage: String,
    /// Variant prefix, if declared.
    pub prefix: Option<String>,
    /// Variant name to value.
    pub options: IndexMap<String, i64>,
}

fn parse_enum_value(tag: &str, value: &str) -> Result<i64, ParseError> {
    let parsed = match value.strip_prefix("0x") {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => value.parse::<i64>(),
    };
    parsed.map_err(|_| ParseError::invalid_attr(tag, "value", value))
}

impl Enum {
    /// Builds an enum from an `enum` entry.
    ///
    /// # Errors
    /// Returns `ParseError` on missing or malformed attributes.
    pub fn from_element(profile: &TargetProfile, entry: &Element) -> Result<Self, ParseError> {
        let mut options = IndexMap::new();
        let prefix = entry.attr("prefix");

        for option in emitted_members(profile, entry)? {
            let value = parse_enum_value(&option.tag, option.require("value")?)?;
            options.insert(prefixed(prefix, option.require("name")?), value);
        }

        Ok(Self {
            name: entry.require("name")?.to_string(),
            doc: doc_lines(&entry.text),
            storage: convert_type(entry.require("storage")?),
            prefix: prefix.map(str::to_string),
            options,
        })
    }
}

/// One packed member of a [`BitField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitFieldMember {
    /// Member type.
    pub ty: SchemaType,
    /// Bit position expression.
    pub pos: String,
    /// Bit mask expression.
    pub mask: String,
    /// Default value, qualified with the enum prefix when applicable.
    pub default: Option<String>,
}

/// Several values packed into one integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitField {
    /// Type name.
    pub name: String,
    /// Documentation lines.
    pub doc: Vec<String>,
    /// Storage primitive.
    pub storage: String,
    /// Member name to layout.
    pub members: IndexMap<String, BitFieldMember>,
}

impl BitField {
    /// Builds a bit field from a `bitfield` entry.
    ///
    /// `prefixes` maps enum type names to their declared variant prefix.
    ///
    /// # Errors
    /// Returns `ParseError` on missing attributes.
    pub fn from_element(
        profile: &TargetProfile,
        entry: &Element,
        prefixes: &HashMap<String, String>,
    ) -> Result<Self, ParseError> {
        let mut members = IndexMap::new();

        for member in emitted_members(profile, entry)? {
            let ty = SchemaType::from_attributes(&member.tag, &member.attributes)?;
            let default = member.attr("default").map(|d| match prefixes.get(&ty.ty) {
                Some(prefix) => format!("{prefix}_{d}"),
                None => d.to_string(),
            });

            members.insert(
                convert_field_name(member.require("name")?),
                BitFieldMember {
                    pos: member.require("pos")?.to_string(),
                    mask: member.require("mask")?.to_string(),
                    ty,
                    default,
                },
            );
        }

        Ok(Self {
            name: entry.require("name")?.to_string(),
            doc: doc_lines(&entry.text),
            storage: convert_type(entry.require("storage")?),
            members,
        })
    }
}
