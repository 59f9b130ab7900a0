//! Filtered schema model assembled from one nif.xml document.

use crate::diagnostics::Diagnostics;
use crate::error::{ParseError, SchemaError};
use crate::hierarchy::Hierarchy;
use crate::parser::{Document, parse_document};
use crate::predicates::should_emit_struct;
use crate::profile::TargetProfile;
use crate::structs::{Compound, NiObject};
use crate::types::{BitField, BitFlags, Enum};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;

/// Every structure emitted for a [`TargetProfile`], in document order.
#[derive(Debug, Clone)]
pub struct Context {
    /// `version` attribute of the document root.
    pub version: Option<String>,
    /// Bit flag sets by name.
    pub bitflags: IndexMap<String, BitFlags>,
    /// Enums by name.
    pub enums: IndexMap<String, Enum>,
    /// Bit fields by name.
    pub bitfields: IndexMap<String, BitField>,
    /// Compounds by converted name.
    pub compounds: IndexMap<String, Compound>,
    /// Block objects by converted name.
    pub objects: IndexMap<String, NiObject>,
    /// Non-fatal findings.
    pub diagnostics: Diagnostics,
    /// Inheritance links between `objects`.
    pub hierarchy: Hierarchy,
}

impl Context {
    /// Parses nif.xml text and builds the model.
    ///
    /// # Errors
    /// Returns `SchemaError` if the document is malformed, a required
    /// attribute is missing, or the object hierarchy has a cycle.
    pub fn parse(xml: &str, profile: &TargetProfile) -> Result<Self, SchemaError> {
        let document = parse_document(xml)?;
        Self::from_document(&document, profile)
    }

    /// Reads and builds the model from a file.
    ///
    /// # Errors
    /// Returns `SchemaError` if the file cannot be read or [`Context::parse`]
    /// fails.
    pub fn from_file(path: impl AsRef<Path>, profile: &TargetProfile) -> Result<Self, SchemaError> {
        let xml = std::fs::read_to_string(path).map_err(ParseError::from)?;
        Self::parse(&xml, profile)
    }

    /// Builds the model from an already parsed document.
    ///
    /// # Errors
    /// See [`Context::parse`].
    pub fn from_document(document: &Document, profile: &TargetProfile) -> Result<Self, SchemaError> {
        let mut diagnostics = Diagnostics::new();
        let mut bitflags = IndexMap::new();
        let mut enums = IndexMap::new();

        let mut emitted = Vec::with_capacity(document.entries.len());
        for entry in &document.entries {
            if should_emit_struct(profile, &entry.attributes)? {
                emitted.push(entry);
            }
        }

        for entry in &emitted {
            match entry.tag.as_str() {
                "bitflags" => {
                    let flags = BitFlags::from_element(profile, entry)?;
                    bitflags.insert(flags.name.clone(), flags);
                }
                "enum" => {
                    let e = Enum::from_element(profile, entry)?;
                    enums.insert(e.name.clone(), e);
                }
                _ => {}
            }
        }

        let prefixes: HashMap<String, String> = enums
            .values()
            .filter_map(|e: &Enum| Some((e.name.clone(), e.prefix.clone()?)))
            .collect();

        let mut bitfields = IndexMap::new();
        let mut compounds = IndexMap::new();
        let mut objects = IndexMap::new();

        for entry in &emitted {
            match entry.tag.as_str() {
                "bitfield" => {
                    let bf = BitField::from_element(profile, entry, &prefixes)?;
                    bitfields.insert(bf.name.clone(), bf);
                }
                "struct" | "compound" => {
                    let c = Compound::from_element(profile, entry, &mut diagnostics)?;
                    compounds.insert(c.name.clone(), c);
                }
                "niobject" if entry.attr("name") == Some(profile.root_object.as_str()) => {}
                "niobject" => {
                    let o = NiObject::from_element(profile, entry, &mut diagnostics)?;
                    objects.insert(o.name.clone(), o);
                }
                _ => {}
            }
        }

        let hierarchy = Hierarchy::resolve(&objects, &mut diagnostics)?;

        tracing::debug!(
            bitflags = bitflags.len(),
            enums = enums.len(),
            bitfields = bitfields.len(),
            compounds = compounds.len(),
            objects = objects.len(),
            diagnostics = diagnostics.len(),
            "schema model built"
        );

        Ok(Self {
            version: document.version.clone(),
            bitflags,
            enums,
            bitfields,
            compounds,
            objects,
            diagnostics,
            hierarchy,
        })
    }
}
