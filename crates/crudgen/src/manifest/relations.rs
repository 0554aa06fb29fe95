use std::collections::{BTreeMap, BTreeSet};

use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};

use super::Manifest;

/// Relation topology across the manifest's generated entities.
///
/// Single-valued owned relations embed the target payload directly, so a
/// reference cycle would produce infinitely sized structs. Entities on a
/// cycle get their single-valued embeds boxed; collection relations already
/// indirect through `Vec` and need nothing.
#[derive(Debug, Default)]
pub struct RelationGraph {
  cyclic_entities: BTreeSet<String>,
  cycles: Vec<Vec<String>>,
}

impl RelationGraph {
  #[must_use]
  pub fn analyze(manifest: &Manifest) -> Self {
    let mut dependencies: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (name, decl) in manifest.described_entities() {
      let deps = dependencies.entry(name.clone()).or_default();
      for field in decl.fields.values() {
        // Unknown targets are not validated here; the writer that renders
        // the relation raises the marker error for its own entity.
        if let Some(relation) = &field.relation
          && relation.owned
          && manifest.entities.contains_key(&relation.target)
        {
          deps.insert(relation.target.clone());
        }
      }
    }

    let cycles = detect_cycles(&dependencies);
    let cyclic_entities = cycles.iter().flatten().cloned().collect();

    Self {
      cyclic_entities,
      cycles,
    }
  }

  #[must_use]
  pub fn is_cyclic(&self, entity: &str) -> bool {
    self.cyclic_entities.contains(entity)
  }

  #[must_use]
  pub fn cycles(&self) -> &[Vec<String>] {
    &self.cycles
  }
}

fn detect_cycles(dependencies: &BTreeMap<String, BTreeSet<String>>) -> Vec<Vec<String>> {
  let mut graph = DiGraphMap::<&str, ()>::new();
  for (node, deps) in dependencies {
    graph.add_node(node.as_str());
    for dep in deps {
      graph.add_edge(node.as_str(), dep.as_str(), ());
    }
  }

  kosaraju_scc(&graph)
    .into_iter()
    .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
    .map(|scc| scc.into_iter().map(String::from).collect())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::{super::loader::manifest_from_yaml, *};

  #[test]
  fn mutual_embeds_form_a_cycle() {
    let manifest = manifest_from_yaml(
      r"
entities:
  person:
    fields:
      id: { type: i64, id: true }
      partner:
        type: person
        relation: { target: person, cardinality: one-to-one, owned: true }
  pet:
    fields:
      id: { type: i64, id: true }
      owner:
        type: person
        relation: { target: person, cardinality: many-to-one, owned: true }
",
    )
    .unwrap();

    let graph = RelationGraph::analyze(&manifest);
    assert!(graph.is_cyclic("person"), "self-reference is a cycle");
    assert!(!graph.is_cyclic("pet"), "one-way embed is not a cycle");
    assert_eq!(graph.cycles().len(), 1);
  }

  #[test]
  fn collection_relations_do_not_require_boxing() {
    let manifest = manifest_from_yaml(
      r"
entities:
  order:
    fields:
      id: { type: i64, id: true }
      items:
        type: order_item
        relation: { target: order_item, cardinality: one-to-many, owned: true }
  order_item:
    fields:
      id: { type: i64, id: true }
      parent:
        type: order
        relation: { target: order, cardinality: many-to-one, owned: false }
",
    )
    .unwrap();

    // The unowned back-reference embeds only the identifier, so no edge and
    // no cycle.
    let graph = RelationGraph::analyze(&manifest);
    assert!(!graph.is_cyclic("order"));
    assert!(!graph.is_cyclic("order_item"));
  }
}
