/// Property-based tests for dependency resolution
///
/// Random acyclic graphs must always resolve, and closing any chain into a
/// loop must always be reported as a cycle.

use direct_di::{
    BindingCollection, ConstructorIndex, DependencyResolver, GenerationError, SignatureMap,
    TypeKey,
};
use proptest::prelude::*;

/// Node `i` depends on a subset of nodes `< i`, plus `i - 1` when `chain` is set.
fn dag(max_nodes: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_nodes).prop_flat_map(|n| {
        (0..n)
            .map(|i| proptest::collection::btree_set(0..i.max(1), 0..=i.min(3)))
            .collect::<Vec<_>>()
            .prop_map(|sets| {
                sets.into_iter()
                    .enumerate()
                    .map(|(i, set)| set.into_iter().filter(|&j| j < i).collect())
                    .collect()
            })
    })
}

fn build(edges: &[Vec<usize>], scoped: &[bool]) -> (BindingCollection, SignatureMap) {
    let mut bindings = BindingCollection::new();
    let mut model = SignatureMap::new();
    for (i, deps) in edges.iter().enumerate() {
        let contract = format!("dyn Service{i}");
        let implementation = format!("Service{i}Impl");
        if scoped.get(i).copied().unwrap_or(false) {
            bindings.add_scoped(&contract, &implementation);
        } else {
            bindings.add_transient(&contract, &implementation);
        }
        let parameters: Vec<String> = deps.iter().map(|j| format!("Arc<dyn Service{j}>")).collect();
        model.insert(&implementation, parameters.as_slice()).unwrap();
    }
    (bindings, model)
}

proptest! {
    #[test]
    fn acyclic_graphs_resolve_in_dependency_order(edges in dag(12)) {
        let (bindings, model) = build(&edges, &[]);
        let table = bindings.build().unwrap();
        let index = ConstructorIndex::build(&table, &model).unwrap();
        let graph = DependencyResolver::new(&table, &index).resolve().unwrap();

        prop_assert_eq!(graph.len(), edges.len());
        prop_assert_eq!(graph.edge_count(), edges.iter().map(Vec::len).sum::<usize>());

        let order: Vec<usize> = graph.topological_order().map(|n| n.binding.ordinal).collect();
        prop_assert_eq!(order.len(), edges.len());
        for (i, deps) in edges.iter().enumerate() {
            let at = order.iter().position(|&o| o == i).unwrap();
            for &dep in deps {
                let dep_at = order.iter().position(|&o| o == dep).unwrap();
                prop_assert!(dep_at < at, "{} must precede {}", dep, i);
            }
        }
    }
}

proptest! {
    #[test]
    fn scope_requirement_is_reachability_of_a_scoped_binding(
        edges in dag(10),
        scoped in proptest::collection::vec(any::<bool>(), 10),
    ) {
        let (bindings, model) = build(&edges, &scoped);
        let table = bindings.build().unwrap();
        let index = ConstructorIndex::build(&table, &model).unwrap();
        let graph = DependencyResolver::new(&table, &index).resolve().unwrap();

        // Nodes only depend on lower indices, so one forward pass suffices
        let mut expected = vec![false; edges.len()];
        for (i, deps) in edges.iter().enumerate() {
            expected[i] = scoped[i] || deps.iter().any(|&j| expected[j]);
        }

        for (i, needs_scope) in expected.into_iter().enumerate() {
            let contract = TypeKey::contract(&format!("dyn Service{i}")).unwrap();
            prop_assert_eq!(graph.requires_scope(&contract), Some(needs_scope));
        }
    }
}

proptest! {
    #[test]
    fn closing_a_chain_is_always_a_cycle(length in 1usize..10, extra in dag(10)) {
        // i depends on i - 1, plus whatever acyclic extras fit
        let mut edges: Vec<Vec<usize>> = (0..length)
            .map(|i| if i == 0 { Vec::new() } else { vec![i - 1] })
            .collect();
        for (i, deps) in extra.into_iter().enumerate().take(length) {
            for dep in deps {
                if !edges[i].contains(&dep) {
                    edges[i].push(dep);
                }
            }
        }
        // Back edge: the chain's root needs its tip
        edges[0].push(length - 1);

        let (bindings, model) = build(&edges, &[]);
        let table = bindings.build().unwrap();
        let index = ConstructorIndex::build(&table, &model).unwrap();

        match DependencyResolver::new(&table, &index).resolve() {
            Err(GenerationError::CyclicDependency(path)) => {
                prop_assert!(path.len() >= 2);
                prop_assert_eq!(path.first(), path.last());
            }
            other => prop_assert!(false, "expected a cycle, got {:?}", other),
        }
    }
}
