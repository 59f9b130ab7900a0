//! Inclusion rules for schema structures and their members.
//!
//! Both predicates are pure: they look only at an element's attributes and
//! the [`TargetProfile`]. A `false` result is a deliberate omission and is
//! never reported.

use crate::error::ParseError;
use crate::parser::Attributes;
use crate::profile::TargetProfile;
use crate::version::{Version, VersionRelation, compare};

/// Returns true if any target version satisfies `check`.
fn any_target(
    profile: &TargetProfile,
    mut check: impl FnMut(Version) -> Result<bool, ParseError>,
) -> Result<bool, ParseError> {
    for &target in &profile.versions {
        if check(target)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn struct_supports(attrs: &Attributes, target: Version) -> Result<bool, ParseError> {
    let versions = attrs.get("versions");

    if let (Some(since), None) = (attrs.get("since"), versions) {
        let mut supported = compare(target, since)? != VersionRelation::Lower;
        if let Some(until) = attrs.get("until") {
            supported = supported && compare(target, until)? != VersionRelation::Lower;
        }
        return Ok(supported);
    }

    if let Some(versions) = versions.filter(|v| !v.starts_with('#')) {
        for version in versions.split(' ') {
            if compare(target, version)? == VersionRelation::Exact {
                return Ok(true);
            }
        }
        return Ok(false);
    }

    Ok(true)
}

fn is_denylisted(profile: &TargetProfile, attrs: &Attributes) -> bool {
    if let Some(module) = attrs.get("module") {
        if profile.excluded_modules.iter().any(|m| m == module) {
            return true;
        }
    }

    let Some(name) = attrs.get("name") else {
        return false;
    };
    let lowered = name.to_lowercase();

    profile.excluded_names.iter().any(|n| n == name)
        || profile
            .excluded_name_fragments
            .iter()
            .any(|f| lowered.contains(&f.to_lowercase()))
        || profile
            .excluded_name_prefixes
            .iter()
            .any(|p| name.starts_with(p.as_str()))
}

/// Decides whether a top-level structure is generated at all.
///
/// # Errors
/// Returns [`ParseError::InvalidVersion`] if a version attribute does not
/// parse.
pub fn should_emit_struct(profile: &TargetProfile, attrs: &Attributes) -> Result<bool, ParseError> {
    if profile.skip_version_specific && attrs.contains("versions") {
        return Ok(false);
    }
    if is_denylisted(profile, attrs) {
        return Ok(false);
    }

    any_target(profile, |target| struct_supports(attrs, target))
}

fn member_supports(attrs: &Attributes, target: Version) -> Result<bool, ParseError> {
    if let Some(ver1) = attrs.get("ver1") {
        if compare(target, ver1)? == VersionRelation::Lower {
            return Ok(false);
        }
    }
    if let Some(ver2) = attrs.get("ver2") {
        if compare(target, ver2)? == VersionRelation::Higher {
            return Ok(false);
        }
    }
    Ok(true)
}

fn vercond_allowed(profile: &TargetProfile, vercond: &str) -> bool {
    profile.vercond_sentinels.iter().any(|s| s == vercond)
        || profile
            .vercond_prefixes
            .iter()
            .any(|p| vercond.starts_with(p.as_str()))
}

/// Decides whether a member (field, option, flag) of an emitted structure
/// is generated.
///
/// # Errors
/// Returns [`ParseError::InvalidVersion`] if `ver1` or `ver2` does not
/// parse.
pub fn should_emit_member(profile: &TargetProfile, attrs: &Attributes) -> Result<bool, ParseError> {
    if !any_target(profile, |target| member_supports(attrs, target))? {
        return Ok(false);
    }

    if let Some(vercond) = attrs.get("vercond") {
        if !vercond_allowed(profile, vercond) {
            return Ok(false);
        }
    }

    // The stream header condition is spelled as `cond` in exactly one place
    // and cannot be evaluated by the generated readers.
    if let Some(cond) = attrs.get("cond") {
        if profile.excluded_conds.iter().any(|c| c == cond) {
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    fn profile() -> TargetProfile {
        TargetProfile::default()
    }

    #[test]
    fn test_struct_without_version_attributes_is_emitted() {
        assert!(should_emit_struct(&profile(), &attrs(&[("name", "NiNode")])).unwrap());
    }

    #[test]
    fn test_struct_in_vendor_module_is_excluded() {
        let a = attrs(&[("name", "bhkShape"), ("module", "BSHavok"), ("since", "20.0.0.4")]);
        assert!(!should_emit_struct(&profile(), &a).unwrap());

        let a = attrs(&[("name", "Anything"), ("module", "BSHavok")]);
        assert!(!should_emit_struct(&profile(), &a).unwrap());
    }

    #[test]
    fn test_struct_with_versions_is_excluded_even_on_exact_match() {
        let a = attrs(&[("name", "Foo"), ("versions", "10.0.1.0")]);
        let p = profile().with_versions(vec![Version::new(10, 0, 1, 0)]);
        assert!(!should_emit_struct(&p, &a).unwrap());
    }

    #[test]
    fn test_struct_versions_list_when_not_skipped() {
        let mut p = profile();
        p.skip_version_specific = false;

        let hit = attrs(&[("name", "Foo"), ("versions", "V10_0_1_0 20.2.0.7")]);
        assert!(should_emit_struct(&p, &hit).unwrap());

        let miss = attrs(&[("name", "Foo"), ("versions", "10.0.1.0 10.1.0.0")]);
        assert!(!should_emit_struct(&p, &miss).unwrap());

        let token = attrs(&[("name", "Foo"), ("versions", "#BETHESDA#")]);
        assert!(should_emit_struct(&p, &token).unwrap());
    }

    #[test]
    fn test_struct_denylisted_names() {
        let p = profile();
        assert!(!should_emit_struct(&p, &attrs(&[("name", "RendererID")])).unwrap());
        assert!(!should_emit_struct(&p, &attrs(&[("name", "NiPhysXProp")])).unwrap());
        assert!(!should_emit_struct(&p, &attrs(&[("name", "bhkRigidBody")])).unwrap());
        assert!(should_emit_struct(&p, &attrs(&[("name", "BhkLookalike")])).unwrap());
    }

    #[test]
    fn test_struct_since_range() {
        let p = profile();
        let old_enough = attrs(&[("name", "Foo"), ("since", "10.0.1.0")]);
        assert!(should_emit_struct(&p, &old_enough).unwrap());

        let too_new = attrs(&[("name", "Foo"), ("since", "20.7.0.0")]);
        assert!(!should_emit_struct(&p, &too_new).unwrap());

        let one_target = attrs(&[("name", "Foo"), ("since", "20.6.0.0")]);
        assert!(should_emit_struct(&p, &one_target).unwrap());
    }

    #[test]
    fn test_struct_until_passes_targets_at_or_above_it() {
        let p = profile();
        let range = |until| attrs(&[("name", "Foo"), ("since", "10.0.0.0"), ("until", until)]);

        assert!(should_emit_struct(&p, &range("20.2.0.7")).unwrap());
        assert!(should_emit_struct(&p, &range("10.1.0.0")).unwrap());
        assert!(!should_emit_struct(&p, &range("20.7.0.0")).unwrap());

        let only_first = p.clone().with_versions(vec![Version::new(20, 1, 0, 3)]);
        assert!(!should_emit_struct(&only_first, &range("20.2.0.7")).unwrap());
    }

    #[test]
    fn test_struct_versions_list_overrides_since() {
        let mut p = profile();
        p.skip_version_specific = false;

        let listed = attrs(&[("name", "Foo"), ("since", "20.7.0.0"), ("versions", "20.2.0.7")]);
        assert!(should_emit_struct(&p, &listed).unwrap());

        let unlisted = attrs(&[("name", "Foo"), ("since", "10.0.0.0"), ("versions", "10.1.0.0")]);
        assert!(!should_emit_struct(&p, &unlisted).unwrap());

        assert!(!should_emit_struct(&profile(), &listed).unwrap());
    }

    #[test]
    fn test_struct_invalid_version_is_an_error() {
        let a = attrs(&[("name", "Foo"), ("since", "twenty")]);
        assert!(should_emit_struct(&profile(), &a).is_err());
    }

    #[test]
    fn test_member_ver1_below_all_targets() {
        let p = profile();
        assert!(!should_emit_member(&p, &attrs(&[("ver1", "20.7.0.0")])).unwrap());
        assert!(should_emit_member(&p, &attrs(&[("ver1", "20.6.0.0")])).unwrap());
    }

    #[test]
    fn test_member_ver2_excludes_newer_targets() {
        let p = profile();
        assert!(!should_emit_member(&p, &attrs(&[("ver2", "10.0.1.0")])).unwrap());
        assert!(should_emit_member(&p, &attrs(&[("ver2", "20.1.0.3")])).unwrap());
        assert!(
            !should_emit_member(&p, &attrs(&[("ver1", "20.3.0.0"), ("ver2", "20.2.0.9")]))
                .unwrap()
        );
    }

    #[test]
    fn test_member_vercond_allowlist() {
        let p = profile();
        for ok in ["#NISTREAM#", "!#BSSTREAM#", "#NI_BS_LTE_FO3#", "#BSVER# #LT# 26"] {
            assert!(should_emit_member(&p, &attrs(&[("vercond", ok)])).unwrap(), "{ok}");
        }
        for bad in ["#BSSTREAM#", "#BSVER# #GT# 26", "#USER# #GTE# 10"] {
            assert!(!should_emit_member(&p, &attrs(&[("vercond", bad)])).unwrap(), "{bad}");
        }
    }

    #[test]
    fn test_member_stream_header_cond_is_excluded() {
        let p = profile();
        let a = attrs(&[("name", "Export Info"), ("cond", "#BSSTREAMHEADER#")]);
        assert!(!should_emit_member(&p, &a).unwrap());
    }
}
