//! Deployment profile: which format versions the generated bindings must
//! read, and which vendor-specific parts of nif.xml are left out.

use crate::version::Version;
use serde::Deserialize;

/// Normalization applied to every occurrence of one named field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldOverride {
    /// Converted name of the owning compound or object.
    pub owner: String,
    /// Converted field name.
    pub field: String,
    /// Replacement `arr1` expression.
    #[serde(default)]
    pub arr1: Option<String>,
    /// Drop the field's existence condition.
    #[serde(default)]
    pub clear_condition: bool,
}

/// Filtering rules and target versions for one generation run.
///
/// Every key may be omitted from a JSON profile; missing keys keep the
/// values of [`TargetProfile::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    /// Deployment versions the bindings must support simultaneously.
    pub versions: Vec<Version>,
    /// Drop every structure that carries a `versions` attribute.
    pub skip_version_specific: bool,
    /// Vendor modules excluded wholesale.
    pub excluded_modules: Vec<String>,
    /// Structure names excluded by exact match.
    pub excluded_names: Vec<String>,
    /// Case-insensitive name fragments that exclude a structure.
    pub excluded_name_fragments: Vec<String>,
    /// Name prefixes that exclude a structure.
    pub excluded_name_prefixes: Vec<String>,
    /// `vercond` values accepted verbatim.
    pub vercond_sentinels: Vec<String>,
    /// `vercond` prefixes that are accepted.
    pub vercond_prefixes: Vec<String>,
    /// `cond` values that exclude a member outright.
    pub excluded_conds: Vec<String>,
    /// Name of the implicit root every object descends from.
    pub root_object: String,
    /// Field normalizations applied before the merge rule.
    pub field_overrides: Vec<FieldOverride>,
    /// Compounds whose readers take an extra `arg` parameter.
    pub arg_compounds: Vec<String>,
    /// Compounds expected to be hand-written downstream.
    pub manual_compounds: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            versions: vec![
                Version::new(20, 1, 0, 3),
                Version::new(20, 2, 0, 7),
                Version::new(20, 2, 0, 8),
                Version::new(20, 3, 0, 9),
                Version::new(20, 6, 0, 0),
            ],
            skip_version_specific: true,
            excluded_modules: strings(&[
                "BSMain",
                "BSAnimation",
                "BSParticle",
                "BSHavok",
                "BSLegacy",
            ]),
            excluded_names: strings(&["RendererID", "BoneTransform"]),
            excluded_name_fragments: strings(&["physx"]),
            excluded_name_prefixes: strings(&["bhk"]),
            vercond_sentinels: strings(&["#NISTREAM#"]),
            vercond_prefixes: strings(&["!", "#NI", "#BSVER# #LT"]),
            excluded_conds: strings(&["#BSSTREAMHEADER#"]),
            root_object: "NiObject".to_string(),
            field_overrides: vec![FieldOverride {
                owner: "NiPalette".to_string(),
                field: "palette".to_string(),
                arr1: Some("Num Entries".to_string()),
                clear_condition: true,
            }],
            arg_compounds: strings(&["Morph", "NiAGDDataBlocks"]),
            manual_compounds: strings(&[
                "SizedString",
                "SizedString16",
                "Key",
                "KeyGroup",
                "BoundingVolume",
            ]),
        }
    }
}

impl TargetProfile {
    /// Returns a copy of this profile targeting `versions` instead.
    #[must_use]
    pub fn with_versions(mut self, versions: Vec<Version>) -> Self {
        self.versions = versions;
        self
    }

    /// Looks up the override registered for `owner.field`, if any.
    #[must_use]
    pub fn field_override(&self, owner: &str, field: &str) -> Option<&FieldOverride> {
        self.field_overrides
            .iter()
            .find(|o| o.owner == owner && o.field == field)
    }

    /// Returns true if `name` is a compound expected to be hand-written.
    #[must_use]
    pub fn is_manual(&self, name: &str) -> bool {
        self.manual_compounds.iter().any(|m| m == name)
    }
}
