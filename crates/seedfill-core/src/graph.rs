use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::registry::ModelRegistry;

/// Summary of the belongs-to graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Report for belongs-to dependency ordering over a configured model set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyReport {
    pub summary: DependencySummary,
    pub topo_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
}

/// Build a deterministic dependency report for the configured models.
///
/// Edges run from a belongs-to target to the model that references it, so a
/// topological order lists referenced models before their dependents. Edges
/// to models outside `configured` do not order anything; those targets are
/// expected to hold data already and are checked against the store at run
/// time.
pub fn build_dependency_report(
    registry: &ModelRegistry,
    configured: &BTreeSet<String>,
) -> DependencyReport {
    let graph = build_adjacency(registry, configured);
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = DependencySummary { nodes, edges };

    match toposort(&graph) {
        Ok(order) => DependencyReport {
            summary,
            topo_order: Some(order),
            cycle: None,
        },
        Err(cycle) => DependencyReport {
            summary,
            topo_order: None,
            cycle: Some(cycle),
        },
    }
}

fn build_adjacency(
    registry: &ModelRegistry,
    configured: &BTreeSet<String>,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for name in configured {
        graph.entry(name.clone()).or_default();

        let Some(spec) = registry.get(name) else {
            continue;
        };

        for rel in spec.belongs_to() {
            if !configured.contains(&rel.target_model) {
                continue;
            }
            graph
                .entry(rel.target_model.clone())
                .or_default()
                .insert(name.clone());
        }
    }

    graph
}

fn toposort(graph: &BTreeMap<String, BTreeSet<String>>) -> Result<Vec<String>, Vec<String>> {
    let mut indegree: BTreeMap<String, usize> = BTreeMap::new();

    for node in graph.keys() {
        indegree.entry(node.clone()).or_insert(0);
    }

    for targets in graph.values() {
        for target in targets {
            *indegree.entry(target.clone()).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<String> = indegree
        .iter()
        .filter_map(|(node, count)| {
            if *count == 0 {
                Some(node.clone())
            } else {
                None
            }
        })
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = ready.iter().next().cloned() {
        ready.remove(&node);
        order.push(node.clone());

        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(target.clone());
                    }
                }
            }
        }
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        let cycle_nodes: Vec<String> = indegree
            .into_iter()
            .filter_map(|(node, count)| if count > 0 { Some(node) } else { None })
            .collect();
        Err(cycle_nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldKind, ModelSpec, Relationship};

    fn spec(name: &str, belongs_to: &[(&str, &str)]) -> ModelSpec {
        let mut fields = vec![Field::new("id", FieldKind::Integer, false)];
        for (local_field, _) in belongs_to {
            fields.push(Field::new(local_field, FieldKind::Integer, false));
        }
        ModelSpec {
            name: name.to_string(),
            key: "id".to_string(),
            fields,
            relationships: belongs_to
                .iter()
                .map(|(local_field, target)| Relationship::belongs_to(local_field, target))
                .collect(),
        }
    }

    fn configured(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn toposort_orders_dependencies() {
        let mut registry = ModelRegistry::new();
        registry.insert(spec("authors", &[])).unwrap();
        registry
            .insert(spec("books", &[("author_id", "authors")]))
            .unwrap();

        let report = build_dependency_report(&registry, &configured(&["authors", "books"]));
        let order = report.topo_order.expect("expected topo order");
        let authors_idx = order.iter().position(|name| name == "authors").unwrap();
        let books_idx = order.iter().position(|name| name == "books").unwrap();
        assert!(authors_idx < books_idx);
        assert_eq!(report.summary.nodes, 2);
        assert_eq!(report.summary.edges, 1);
    }

    #[test]
    fn toposort_reports_cycle() {
        let mut registry = ModelRegistry::new();
        registry
            .insert(spec("chickens", &[("egg_id", "eggs")]))
            .unwrap();
        registry
            .insert(spec("eggs", &[("chicken_id", "chickens")]))
            .unwrap();

        let report = build_dependency_report(&registry, &configured(&["chickens", "eggs"]));
        assert!(report.topo_order.is_none());
        let cycle = report.cycle.unwrap();
        assert!(cycle.contains(&"chickens".to_string()));
        assert!(cycle.contains(&"eggs".to_string()));
    }

    #[test]
    fn unconfigured_targets_do_not_add_edges() {
        let mut registry = ModelRegistry::new();
        registry.insert(spec("authors", &[])).unwrap();
        registry
            .insert(spec("books", &[("author_id", "authors")]))
            .unwrap();

        let report = build_dependency_report(&registry, &configured(&["books"]));
        assert_eq!(report.summary.nodes, 1);
        assert_eq!(report.summary.edges, 0);
        assert_eq!(report.topo_order.unwrap(), vec!["books".to_string()]);
    }
}
