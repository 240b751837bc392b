#![no_main]

use direct_di::{BindingCollection, ConstructorIndex, DependencyResolver, GenerationError, SignatureMap};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte: node count; then (consumer, dependency) byte pairs
    let nodes = (data[0] % 16) as usize + 1;
    let mut edges = vec![Vec::new(); nodes];
    for pair in data[1..].chunks_exact(2) {
        edges[pair[0] as usize % nodes].push(pair[1] as usize % (nodes + 1));
    }

    let mut bindings = BindingCollection::new();
    let mut model = SignatureMap::new();
    for (i, deps) in edges.iter().enumerate() {
        bindings.add_transient(&format!("dyn C{i}"), &format!("Impl{i}"));
        let parameters: Vec<String> = deps.iter().map(|d| format!("Arc<dyn C{d}>")).collect();
        model.insert(&format!("Impl{i}"), parameters.as_slice()).unwrap();
    }

    let table = bindings.build().unwrap();
    let index = ConstructorIndex::build(&table, &model).unwrap();
    match DependencyResolver::new(&table, &index).resolve() {
        Ok(graph) => assert_eq!(graph.topological_order().count(), nodes),
        Err(GenerationError::CyclicDependency(path)) => assert_eq!(path.first(), path.last()),
        // Index `nodes` is never bound
        Err(GenerationError::UnresolvedDependency { missing, .. }) => {
            assert_eq!(missing, format!("dyn C{nodes}"))
        }
        Err(other) => panic!("unexpected error: {other}"),
    }
});
