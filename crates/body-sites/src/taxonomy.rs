//! The validated body-site forest and its read operations.

use crate::node::{Branch, Leaf, SiteCode, TaxonomyNode};
use crate::wire::{domain_to_wire, parse_wire, wire_to_domain};
use crate::{TaxonomyError, TaxonomyResult};
use std::path::Path;
use std::sync::OnceLock;

/// The taxonomy data asset shipped with the crate.
pub const BUILTIN_TAXONOMY_YAML: &str = include_str!("../data/body_sites.yaml");

static BUILTIN: OnceLock<Result<Taxonomy, String>> = OnceLock::new();

/// An immutable, validated forest of body-site nodes.
///
/// Every node is a branch or a leaf, sibling ids are unique, and leaf codes are unique across
/// the whole forest. Once built a `Taxonomy` is never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Taxonomy {
    roots: Vec<TaxonomyNode>,
}

impl Taxonomy {
    /// Parse and validate a taxonomy from YAML text.
    ///
    /// Uses `serde_path_to_error` so a schema mismatch names the failing field, for example
    /// `[3].children[0].code`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError`] if the YAML does not match the wire schema or breaks any
    /// structural rule (leaf xor branch, empty branch, duplicate sibling id, duplicate code).
    pub fn parse(yaml_text: &str) -> TaxonomyResult<Self> {
        let wire = parse_wire(yaml_text)?;
        let roots = wire_to_domain(wire)?;
        Ok(Self { roots })
    }

    /// Read and validate a taxonomy file.
    pub fn load(path: &Path) -> TaxonomyResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let taxonomy = Self::parse(&text)?;
        tracing::debug!(
            "loaded body-site taxonomy from {} ({} leaves)",
            path.display(),
            taxonomy.leaves().count()
        );
        Ok(taxonomy)
    }

    /// Render the taxonomy as YAML in the data-asset format.
    pub fn render(&self) -> TaxonomyResult<String> {
        Ok(serde_yaml::to_string(&domain_to_wire(&self.roots))?)
    }

    /// The taxonomy embedded in this crate, parsed once per process.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::Builtin`] if the embedded asset fails validation.
    pub fn builtin() -> TaxonomyResult<&'static Taxonomy> {
        BUILTIN
            .get_or_init(|| Self::parse(BUILTIN_TAXONOMY_YAML).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|msg| TaxonomyError::Builtin(msg.clone()))
    }

    /// The root forest in declaration order.
    pub fn roots(&self) -> &[TaxonomyNode] {
        &self.roots
    }

    /// Children of the branch reached by following `path` (node ids) from the root.
    ///
    /// An empty path yields the root forest.
    ///
    /// # Errors
    ///
    /// Returns [`TaxonomyError::UnknownPath`] if a path element matches no sibling or names a
    /// leaf. Paths built from nodes this taxonomy handed out never fail.
    pub fn children_of<S: AsRef<str>>(&self, path: &[S]) -> TaxonomyResult<&[TaxonomyNode]> {
        let mut view: &[TaxonomyNode] = &self.roots;

        for id in path {
            let id = id.as_ref();
            view = view
                .iter()
                .find(|node| node.id() == id)
                .and_then(TaxonomyNode::children)
                .ok_or_else(|| {
                    TaxonomyError::UnknownPath(path.iter().map(|s| s.as_ref().to_owned()).collect())
                })?;
        }

        Ok(view)
    }

    /// Full-forest search for the leaf carrying `code`.
    pub fn find_leaf(&self, code: SiteCode) -> Option<&Leaf> {
        self.leaves().find(|leaf| leaf.code() == code)
    }

    /// The chain of branches from the root down to the leaf carrying `code`.
    ///
    /// A root-level leaf yields an empty chain.
    pub fn path_to(&self, code: SiteCode) -> Option<Vec<&Branch>> {
        fn walk<'a>(
            nodes: &'a [TaxonomyNode],
            code: SiteCode,
            chain: &mut Vec<&'a Branch>,
        ) -> bool {
            for node in nodes {
                match node {
                    TaxonomyNode::Leaf(leaf) if leaf.code() == code => return true,
                    TaxonomyNode::Leaf(_) => {}
                    TaxonomyNode::Branch(branch) => {
                        chain.push(branch);
                        if walk(branch.children(), code, chain) {
                            return true;
                        }
                        chain.pop();
                    }
                }
            }
            false
        }

        let mut chain = Vec::new();
        walk(&self.roots, code, &mut chain).then_some(chain)
    }

    /// Depth-first iterator over every leaf in declaration order.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![self.roots.iter()],
        }
    }
}

/// Iterator returned by [`Taxonomy::leaves`].
pub struct Leaves<'a> {
    stack: Vec<std::slice::Iter<'a, TaxonomyNode>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Leaf;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(iter) = self.stack.last_mut() {
            match iter.next() {
                Some(TaxonomyNode::Leaf(leaf)) => return Some(leaf),
                Some(TaxonomyNode::Branch(branch)) => self.stack.push(branch.children().iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn builtin() -> &'static Taxonomy {
        Taxonomy::builtin().expect("embedded taxonomy is valid")
    }

    #[test]
    fn builtin_has_four_root_branches() {
        let roots = builtin().roots();
        assert_eq!(roots.len(), 4);
        assert!(roots.iter().all(|node| node.as_branch().is_some()));
        assert_eq!(
            roots.iter().map(TaxonomyNode::label).collect::<Vec<_>>(),
            ["Head & Neck", "Torso", "Arms & Legs", "Hands & Fingers"]
        );
    }

    #[test]
    fn builtin_codes_are_unique() {
        let codes: Vec<_> = builtin().leaves().map(Leaf::code).collect();
        let unique: HashSet<_> = codes.iter().copied().collect();
        assert_eq!(codes.len(), unique.len());
        assert_eq!(codes.len(), 43);
    }

    #[test]
    fn children_of_follows_ids() {
        let view = builtin()
            .children_of(&["hands_fingers", "right_hand", "fingers_r"])
            .expect("valid path");
        let index = view
            .iter()
            .find(|node| node.id() == "index_r_tip")
            .expect("index tip offered");
        assert_eq!(index.label(), "Index Tip (R)");
        assert_eq!(index.code().map(SiteCode::get), Some(4));
    }

    #[test]
    fn children_of_empty_path_is_root_forest() {
        let empty: [&str; 0] = [];
        let view = builtin().children_of(&empty).expect("root");
        assert_eq!(view, builtin().roots());
    }

    #[test]
    fn children_of_rejects_unknown_and_leaf_paths() {
        let err = builtin()
            .children_of(&["hands_fingers", "third_hand"])
            .expect_err("unknown id");
        assert!(matches!(err, TaxonomyError::UnknownPath(p) if p == ["hands_fingers", "third_hand"]));

        let err = builtin()
            .children_of(&["torso", "chest"])
            .expect_err("leaf has no children");
        assert!(matches!(err, TaxonomyError::UnknownPath(_)));
    }

    #[test]
    fn find_leaf_and_path_to() {
        let code = SiteCode::new(4).expect("code");
        let leaf = builtin().find_leaf(code).expect("leaf 4");
        assert_eq!(leaf.id(), "index_r_tip");

        let chain = builtin().path_to(code).expect("path to 4");
        assert_eq!(
            chain.iter().map(|b| b.label()).collect::<Vec<_>>(),
            ["Hands & Fingers", "Right Hand", "Fingers (Right)"]
        );

        let missing = SiteCode::new(999).expect("code");
        assert!(builtin().find_leaf(missing).is_none());
        assert!(builtin().path_to(missing).is_none());
    }

    #[test]
    fn path_to_root_leaf_is_empty_chain() {
        let taxonomy = Taxonomy::parse("- {id: other, label: Other, code: 99}\n").expect("valid");
        let chain = taxonomy
            .path_to(SiteCode::new(99).expect("code"))
            .expect("found");
        assert!(chain.is_empty());
    }

    #[test]
    fn leaves_iterate_in_declaration_order() {
        let ids: Vec<_> = builtin().leaves().map(Leaf::id).take(3).collect();
        assert_eq!(ids, ["scalp", "eye_r", "eye_l"]);
    }

    #[test]
    fn render_then_parse_preserves_taxonomy() {
        let rendered = builtin().render().expect("render");
        let reparsed = Taxonomy::parse(&rendered).expect("reparse");
        assert_eq!(&reparsed, builtin());
    }

    #[test]
    fn load_reads_override_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sites.yaml");
        std::fs::write(
            &path,
            "- id: hand\n  label: Hand\n  children:\n    - {id: palm, label: Palm, code: 7}\n",
        )
        .expect("write");

        let taxonomy = Taxonomy::load(&path).expect("load");
        assert_eq!(taxonomy.leaves().count(), 1);

        let err = Taxonomy::load(&dir.path().join("missing.yaml")).expect_err("missing file");
        assert!(matches!(err, TaxonomyError::Io(_)));
    }
}
