//! Resolved inheritance tree of block objects.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::SchemaError;
use crate::structs::NiObject;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Parent and child links between the objects of a [`Context`](crate::Context).
///
/// Objects whose parent is not part of the model are treated as roots.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    names: Vec<String>,
    index: HashMap<String, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl Hierarchy {
    /// Resolves parent names into links.
    ///
    /// # Errors
    /// Returns [`SchemaError::CircularReference`] if an object is its own
    /// ancestor.
    pub fn resolve(
        objects: &IndexMap<String, NiObject>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, SchemaError> {
        let names: Vec<String> = objects.keys().cloned().collect();
        let index: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        let mut parents = vec![None; names.len()];
        let mut children = vec![Vec::new(); names.len()];

        for (i, object) in objects.values().enumerate() {
            let Some(parent) = &object.parent else {
                continue;
            };
            match index.get(parent) {
                Some(&p) => {
                    parents[i] = Some(p);
                    children[p].push(i);
                }
                None => diagnostics.report(Diagnostic::UnresolvedParent {
                    object: object.name.clone(),
                    parent: parent.clone(),
                }),
            }
        }

        let hierarchy = Self {
            names,
            index,
            parents,
            children,
        };
        hierarchy.check_cycles()?;
        Ok(hierarchy)
    }

    fn check_cycles(&self) -> Result<(), SchemaError> {
        for start in 0..self.names.len() {
            let mut path = vec![start];
            let mut current = self.parents[start];
            while let Some(p) = current {
                if let Some(pos) = path.iter().position(|&seen| seen == p) {
                    let mut cycle: Vec<&str> =
                        path[pos..].iter().map(|&i| self.names[i].as_str()).collect();
                    cycle.push(self.names[p].as_str());
                    return Err(SchemaError::CircularReference {
                        path: cycle.join(" -> "),
                    });
                }
                path.push(p);
                current = self.parents[p];
            }
        }
        Ok(())
    }

    /// Returns the parent of `name`, if it resolved.
    #[must_use]
    pub fn parent(&self, name: &str) -> Option<&str> {
        let i = *self.index.get(name)?;
        self.parents[i].map(|p| self.names[p].as_str())
    }

    /// Returns the direct children of `name` in declaration order.
    #[must_use]
    pub fn children(&self, name: &str) -> Vec<&str> {
        self.index.get(name).map_or_else(Vec::new, |&i| {
            self.children[i]
                .iter()
                .map(|&c| self.names[c].as_str())
                .collect()
        })
    }

    /// Returns the ancestors of `name`, nearest first.
    #[must_use]
    pub fn ancestors(&self, name: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut current = self.index.get(name).and_then(|&i| self.parents[i]);
        while let Some(p) = current {
            out.push(self.names[p].as_str());
            current = self.parents[p];
        }
        out
    }

    /// Returns `name` and every object below it, depth first.
    #[must_use]
    pub fn descendants(&self, name: &str) -> Vec<&str> {
        let Some(&root) = self.index.get(name) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            out.push(self.names[i].as_str());
            stack.extend(self.children[i].iter().rev());
        }
        out
    }

    /// Returns true if `name` is `ancestor` or derives from it.
    #[must_use]
    pub fn inherits_from(&self, name: &str, ancestor: &str) -> bool {
        self.index.contains_key(name)
            && (name == ancestor || self.ancestors(name).contains(&ancestor))
    }

    /// Objects without a resolved parent, in declaration order.
    #[must_use]
    pub fn roots(&self) -> Vec<&str> {
        self.names
            .iter()
            .zip(&self.parents)
            .filter(|(_, parent)| parent.is_none())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Number of objects in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if there are no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldMap;

    fn object(name: &str, parent: Option<&str>) -> (String, NiObject) {
        (
            name.to_string(),
            NiObject {
                name: name.to_string(),
                doc: Vec::new(),
                parent: parent.map(str::to_string),
                is_abstract: false,
                fields: FieldMap::new(),
            },
        )
    }

    fn tree() -> IndexMap<String, NiObject> {
        [
            object("NiObjectNET", None),
            object("NiAVObject", Some("NiObjectNET")),
            object("NiNode", Some("NiAVObject")),
            object("NiCamera", Some("NiAVObject")),
            object("NiBillboardNode", Some("NiNode")),
            object("NiExtraData", None),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_links() {
        let h = Hierarchy::resolve(&tree(), &mut Diagnostics::new()).unwrap();
        assert_eq!(h.len(), 6);
        assert_eq!(h.parent("NiNode"), Some("NiAVObject"));
        assert_eq!(h.parent("NiObjectNET"), None);
        assert_eq!(h.children("NiAVObject"), vec!["NiNode", "NiCamera"]);
        assert_eq!(h.roots(), vec!["NiObjectNET", "NiExtraData"]);
    }

    #[test]
    fn test_ancestors_and_descendants() {
        let h = Hierarchy::resolve(&tree(), &mut Diagnostics::new()).unwrap();
        assert_eq!(
            h.ancestors("NiBillboardNode"),
            vec!["NiNode", "NiAVObject", "NiObjectNET"]
        );
        assert_eq!(
            h.descendants("NiAVObject"),
            vec!["NiAVObject", "NiNode", "NiBillboardNode", "NiCamera"]
        );
        assert!(h.inherits_from("NiBillboardNode", "NiObjectNET"));
        assert!(h.inherits_from("NiNode", "NiNode"));
        assert!(!h.inherits_from("NiExtraData", "NiAVObject"));
        assert!(!h.inherits_from("Missing", "Missing"));
    }

    #[test]
    fn test_unresolved_parent_is_a_diagnostic() {
        let mut objects = tree();
        let (name, obj) = object("NiPhysXThing", Some("NiPhysXProp"));
        objects.insert(name, obj);

        let mut diags = Diagnostics::new();
        let h = Hierarchy::resolve(&objects, &mut diags).unwrap();
        assert_eq!(h.parent("NiPhysXThing"), None);
        assert_eq!(
            diags.iter().next(),
            Some(&Diagnostic::UnresolvedParent {
                object: "NiPhysXThing".to_string(),
                parent: "NiPhysXProp".to_string(),
            })
        );
    }

    #[test]
    fn test_cycle_is_an_error() {
        let objects: IndexMap<_, _> = [
            object("A", Some("B")),
            object("B", Some("C")),
            object("C", Some("A")),
        ]
        .into_iter()
        .collect();

        match Hierarchy::resolve(&objects, &mut Diagnostics::new()) {
            Err(SchemaError::CircularReference { path }) => assert_eq!(path, "A -> B -> C -> A"),
            other => panic!("expected cycle, got {other:?}"),
        }
    }
}
