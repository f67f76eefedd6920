//! YAML wire model for the taxonomy data asset and translation to the domain model.
//!
//! The wire form uses one record type with optional `code` and `children`, which is the natural
//! shape for hand-edited YAML. Translation enforces every structural rule before a domain
//! [`Taxonomy`] exists:
//! - exactly one of `code` / `children` per node
//! - non-empty branches
//! - valid ids and labels
//! - sibling ids unique, codes unique across the forest

use crate::node::{Branch, Leaf, SiteCode, TaxonomyNode};
use crate::{TaxonomyError, TaxonomyResult};
use ipc_types::{Identifier, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Deepest nesting accepted from a data file.
const MAX_DEPTH: usize = 16;

const ROOT_PATH: &str = "<root>";

/// Wire representation of one node.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct NodeWire {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeWire>>,
}

/// Deserialize the wire forest.
///
/// YAML syntax errors surface as [`TaxonomyError::InvalidYaml`]. Well-formed YAML that does not
/// match the wire schema is reported with the failing field path.
pub(crate) fn parse_wire(yaml_text: &str) -> TaxonomyResult<Vec<NodeWire>> {
    let document: serde_yaml::Value = serde_yaml::from_str(yaml_text)?;

    match serde_path_to_error::deserialize::<_, Vec<NodeWire>>(document) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                ROOT_PATH
            } else {
                path.as_str()
            };
            Err(TaxonomyError::Translation(format!(
                "Taxonomy schema mismatch at {path}: {source}"
            )))
        }
    }
}

/// Convert a wire forest into validated domain nodes.
pub(crate) fn wire_to_domain(roots: Vec<NodeWire>) -> TaxonomyResult<Vec<TaxonomyNode>> {
    if roots.is_empty() {
        return Err(TaxonomyError::EmptyTaxonomy);
    }

    let mut translator = Translator {
        path: Vec::new(),
        codes: HashMap::new(),
    };
    translator.translate_siblings(roots)
}

/// Convert domain nodes back into the wire forest.
pub(crate) fn domain_to_wire(nodes: &[TaxonomyNode]) -> Vec<NodeWire> {
    nodes
        .iter()
        .map(|node| match node {
            TaxonomyNode::Branch(branch) => NodeWire {
                id: branch.id().to_owned(),
                label: branch.label().to_owned(),
                code: None,
                children: Some(domain_to_wire(branch.children())),
            },
            TaxonomyNode::Leaf(leaf) => NodeWire {
                id: leaf.id().to_owned(),
                label: leaf.label().to_owned(),
                code: Some(leaf.code().get()),
                children: None,
            },
        })
        .collect()
}

struct Translator {
    /// Ids from the root to the node being translated.
    path: Vec<String>,
    /// Code -> path of the leaf that first claimed it.
    codes: HashMap<SiteCode, String>,
}

impl Translator {
    fn display_path(&self) -> String {
        if self.path.is_empty() {
            ROOT_PATH.to_owned()
        } else {
            self.path.join("/")
        }
    }

    fn translate_siblings(&mut self, nodes: Vec<NodeWire>) -> TaxonomyResult<Vec<TaxonomyNode>> {
        if self.path.len() >= MAX_DEPTH {
            return Err(TaxonomyError::TooDeep {
                path: self.display_path(),
                max: MAX_DEPTH,
            });
        }

        let mut seen = HashSet::with_capacity(nodes.len());
        let mut out = Vec::with_capacity(nodes.len());

        for node in nodes {
            if !seen.insert(node.id.trim().to_owned()) {
                return Err(TaxonomyError::DuplicateSiblingId {
                    parent: self.display_path(),
                    id: node.id,
                });
            }

            self.path.push(node.id.clone());
            let translated = self.translate_node(node);
            self.path.pop();
            out.push(translated?);
        }

        Ok(out)
    }

    fn translate_node(&mut self, node: NodeWire) -> TaxonomyResult<TaxonomyNode> {
        let path = self.display_path();
        let id = Identifier::new(&node.id).map_err(|source| TaxonomyError::InvalidText {
            path: path.clone(),
            source,
        })?;
        let label = NonEmptyText::new(&node.label).map_err(|source| {
            TaxonomyError::InvalidText {
                path: path.clone(),
                source,
            }
        })?;

        match (node.code, node.children) {
            (Some(_), Some(_)) => Err(TaxonomyError::AmbiguousNode { path }),
            (None, None) => Err(TaxonomyError::IncompleteNode { path }),
            (None, Some(children)) => {
                if children.is_empty() {
                    return Err(TaxonomyError::EmptyBranch { path });
                }
                let children = self.translate_siblings(children)?;
                Ok(TaxonomyNode::Branch(Branch {
                    id,
                    label,
                    children,
                }))
            }
            (Some(raw), None) => {
                let code = SiteCode::new(raw)
                    .map_err(|_| TaxonomyError::InvalidCode(format!("{raw} at {path}")))?;
                if let Some(first) = self.codes.get(&code) {
                    return Err(TaxonomyError::DuplicateCode {
                        code,
                        first: first.clone(),
                        second: path,
                    });
                }
                self.codes.insert(code, path);
                Ok(TaxonomyNode::Leaf(Leaf { id, label, code }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(yaml: &str) -> TaxonomyResult<Vec<TaxonomyNode>> {
        wire_to_domain(parse_wire(yaml)?)
    }

    #[test]
    fn translates_nested_forest() {
        let nodes = translate(
            r#"
- id: right_hand
  label: Right Hand
  children:
    - id: palm_r
      label: Palm (R)
      code: 1
- id: neck
  label: Neck
  code: 27
"#,
        )
        .expect("valid forest");

        assert_eq!(nodes.len(), 2);
        let hand = nodes[0].as_branch().expect("branch");
        assert_eq!(hand.children()[0].code().map(SiteCode::get), Some(1));
        assert_eq!(nodes[1].label(), "Neck");
    }

    #[test]
    fn rejects_unknown_keys_with_path() {
        let err = translate(
            r#"
- id: neck
  label: Neck
  code: 27
  icon: neck.svg
"#,
        )
        .expect_err("should reject unknown key");
        match err {
            TaxonomyError::Translation(msg) => {
                assert!(msg.contains("icon"), "{msg}");
                assert!(msg.contains("[0]"), "{msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn reports_broken_yaml_separately_from_schema_mismatch() {
        let err = translate("- id: neck\n  label: [Neck\n").expect_err("unclosed flow sequence");
        assert!(matches!(err, TaxonomyError::InvalidYaml(_)), "{err:?}");
        assert!(err.to_string().starts_with("invalid YAML"));

        let err = translate("id: neck\n").expect_err("mapping instead of sequence");
        assert!(matches!(err, TaxonomyError::Translation(_)), "{err:?}");
    }

    #[test]
    fn rejects_negative_code_as_schema_mismatch() {
        let err = translate("- {id: neck, label: Neck, code: -1}\n").expect_err("negative");
        match err {
            TaxonomyError::Translation(msg) => assert!(msg.contains("code"), "{msg}"),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_node_with_code_and_children() {
        let err = translate(
            r#"
- id: hand
  label: Hand
  code: 3
  children:
    - {id: palm, label: Palm, code: 1}
"#,
        )
        .expect_err("ambiguous");
        assert!(matches!(err, TaxonomyError::AmbiguousNode { path } if path == "hand"));
    }

    #[test]
    fn rejects_node_with_neither() {
        let err = translate("- {id: hand, label: Hand}\n").expect_err("incomplete");
        assert!(matches!(err, TaxonomyError::IncompleteNode { path } if path == "hand"));
    }

    #[test]
    fn rejects_empty_branch_and_empty_forest() {
        let err = translate("- {id: hand, label: Hand, children: []}\n").expect_err("empty");
        assert!(matches!(err, TaxonomyError::EmptyBranch { .. }));

        let err = translate("[]\n").expect_err("empty forest");
        assert!(matches!(err, TaxonomyError::EmptyTaxonomy));
    }

    #[test]
    fn rejects_zero_code() {
        let err = translate("- {id: neck, label: Neck, code: 0}\n").expect_err("zero");
        assert!(matches!(err, TaxonomyError::InvalidCode(msg) if msg.contains("neck")));
    }

    #[test]
    fn rejects_duplicate_sibling_ids_but_allows_cousins() {
        let err = translate(
            r#"
- {id: neck, label: Neck, code: 1}
- {id: neck, label: Neck again, code: 2}
"#,
        )
        .expect_err("duplicate sibling");
        assert!(
            matches!(err, TaxonomyError::DuplicateSiblingId { parent, id } if parent == "<root>" && id == "neck")
        );

        translate(
            r#"
- id: right_hand
  label: Right Hand
  children:
    - {id: palm, label: Palm (R), code: 1}
- id: left_hand
  label: Left Hand
  children:
    - {id: palm, label: Palm (L), code: 2}
"#,
        )
        .expect("same id under different parents is allowed");
    }

    #[test]
    fn rejects_duplicate_codes_across_forest() {
        let err = translate(
            r#"
- id: right_hand
  label: Right Hand
  children:
    - {id: palm_r, label: Palm (R), code: 1}
- id: left_hand
  label: Left Hand
  children:
    - {id: palm_l, label: Palm (L), code: 1}
"#,
        )
        .expect_err("duplicate code");
        match err {
            TaxonomyError::DuplicateCode {
                code,
                first,
                second,
            } => {
                assert_eq!(code.get(), 1);
                assert_eq!(first, "right_hand/palm_r");
                assert_eq!(second, "left_hand/palm_l");
            }
            other => panic!("expected DuplicateCode, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_identifier() {
        let err = translate("- {id: Right Hand, label: Right Hand, code: 1}\n").expect_err("id");
        assert!(matches!(err, TaxonomyError::InvalidText { path, .. } if path == "Right Hand"));
    }

    #[test]
    fn rejects_excessive_nesting() {
        let mut yaml = String::new();
        for depth in 0..=MAX_DEPTH {
            let indent = "  ".repeat(depth * 2);
            yaml.push_str(&format!("{indent}- id: n{depth}\n{indent}  label: N{depth}\n"));
            yaml.push_str(&format!("{indent}  children:\n"));
        }
        let indent = "  ".repeat((MAX_DEPTH + 1) * 2);
        yaml.push_str(&format!("{indent}- {{id: leaf, label: Leaf, code: 1}}\n"));

        let err = translate(&yaml).expect_err("too deep");
        assert!(matches!(err, TaxonomyError::TooDeep { max, .. } if max == MAX_DEPTH));
    }
}
