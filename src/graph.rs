//! The validated dependency graph and its diagnostic exports.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::descriptors::Binding;
use crate::error::{GenResult, GenerationError};
use crate::key::TypeKey;

/// A binding together with its constructor-parameter edges.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    /// The binding this node activates
    pub binding: Binding,
    /// Node indices of the constructor parameters, in parameter order
    pub dependencies: Vec<usize>,
    /// Whether activation needs a scope: the binding is scoped, or some
    /// dependency (transitively) is
    pub requires_scope: bool,
}

/// Acyclic, fully resolved dependency graph.
///
/// Only [`DependencyResolver`](crate::DependencyResolver) builds one, so
/// every edge points at an existing node and there are no cycles.
///
/// # Examples
///
/// ```rust
/// use direct_di::{BindingCollection, ConstructorIndex, DependencyResolver, SignatureMap, TypeKey};
///
/// let mut bindings = BindingCollection::new();
/// bindings
///     .add_transient("dyn Foo", "FooClass")
///     .add_scoped("dyn Bar", "BarOne");
/// let table = bindings.build().unwrap();
///
/// let mut model = SignatureMap::new();
/// model.insert("FooClass", &["Arc<dyn Bar>"]).unwrap();
/// let index = ConstructorIndex::build(&table, &model).unwrap();
///
/// let graph = DependencyResolver::new(&table, &index).resolve().unwrap();
/// let foo = TypeKey::contract("dyn Foo").unwrap();
/// assert_eq!(graph.requires_scope(&foo), Some(true));
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    order: Vec<usize>,
    #[serde(skip)]
    by_contract: HashMap<TypeKey, usize>,
}

impl DependencyGraph {
    /// `order` must list every node after all of its dependencies.
    pub(crate) fn new(bindings: Vec<Binding>, dependencies: Vec<Vec<usize>>, order: Vec<usize>) -> Self {
        let mut nodes: Vec<GraphNode> = bindings
            .into_iter()
            .zip(dependencies)
            .map(|(binding, dependencies)| GraphNode {
                requires_scope: binding.is_scoped(),
                binding,
                dependencies,
            })
            .collect();

        for &index in &order {
            let inherited = nodes[index]
                .dependencies
                .iter()
                .any(|&dep| nodes[dep].requires_scope);
            nodes[index].requires_scope |= inherited;
        }

        let by_contract = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.binding.contract.clone(), index))
            .collect();

        Self {
            nodes,
            order,
            by_contract,
        }
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, contract: &TypeKey) -> Option<&GraphNode> {
        self.index_of(contract).map(|index| &self.nodes[index])
    }

    pub fn index_of(&self, contract: &TypeKey) -> Option<usize> {
        self.by_contract.get(contract).copied()
    }

    /// Bindings a contract's implementation is constructed from, in parameter order.
    pub fn dependencies_of(&self, contract: &TypeKey) -> Option<Vec<&Binding>> {
        self.node(contract).map(|node| {
            node.dependencies
                .iter()
                .map(|&dep| &self.nodes[dep].binding)
                .collect()
        })
    }

    /// Nodes ordered so that each appears after all of its dependencies.
    pub fn topological_order(&self) -> impl DoubleEndedIterator<Item = &GraphNode> + '_ {
        self.order.iter().map(move |&index| &self.nodes[index])
    }

    pub fn requires_scope(&self, contract: &TypeKey) -> Option<bool> {
        self.node(contract).map(|node| node.requires_scope)
    }

    pub fn scoped_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.binding.is_scoped()).count()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.dependencies.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Graphviz rendering: one node per binding, one edge per parameter.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph dependencies {\n    rankdir=LR;\n");
        for (index, node) in self.nodes.iter().enumerate() {
            let b = &node.binding;
            let shape = if b.is_scoped() { "box" } else { "ellipse" };
            let _ = writeln!(
                out,
                "    n{index} [label=\"{} => {} ({})\", shape={shape}];",
                escape(b.contract.display_name()),
                escape(b.implementation.display_name()),
                b.lifetime
            );
        }
        for (index, node) in self.nodes.iter().enumerate() {
            for (position, dep) in node.dependencies.iter().enumerate() {
                let _ = writeln!(out, "    n{index} -> n{dep} [label=\"{position}\"];");
            }
        }
        out.push_str("}\n");
        out
    }

    /// JSON export of nodes and topological order.
    pub fn to_json(&self) -> GenResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GenerationError::Config(format!("graph serialization failed: {e}")))
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
