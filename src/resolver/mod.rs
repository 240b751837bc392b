//! Static resolution of the binding table into a dependency graph.

use tracing::{debug, info};

use crate::collection::BindingTable;
use crate::error::{GenResult, GenerationError};
use crate::graph::DependencyGraph;
use crate::internal::ResolutionPath;
use crate::type_model::ConstructorIndex;

/// Walks every binding's constructor parameters and builds the graph.
///
/// Bindings are visited in declaration order and parameters in constructor
/// order, so the first defect reported is deterministic. Any defect aborts
/// resolution; there is no partial graph.
pub struct DependencyResolver<'a> {
    table: &'a BindingTable,
    index: &'a ConstructorIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

struct Walk<'a> {
    table: &'a BindingTable,
    index: &'a ConstructorIndex,
    marks: Vec<Mark>,
    dependencies: Vec<Vec<usize>>,
    order: Vec<usize>,
    path: ResolutionPath<'a>,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(table: &'a BindingTable, index: &'a ConstructorIndex) -> Self {
        Self { table, index }
    }

    /// Resolves every binding, failing fast on missing bindings and cycles.
    pub fn resolve(&self) -> GenResult<DependencyGraph> {
        let count = self.table.len();
        let mut walk = Walk {
            table: self.table,
            index: self.index,
            marks: vec![Mark::Unvisited; count],
            dependencies: vec![Vec::new(); count],
            order: Vec::with_capacity(count),
            path: ResolutionPath::default(),
        };

        for node in 0..count {
            walk.visit(node)?;
        }

        let graph = DependencyGraph::new(
            self.table.iter().cloned().collect(),
            walk.dependencies,
            walk.order,
        );
        info!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            scoped = graph.scoped_count(),
            "dependency graph resolved"
        );
        Ok(graph)
    }
}

impl<'a> Walk<'a> {
    fn visit(&mut self, node: usize) -> GenResult<()> {
        if self.marks[node] == Mark::Done {
            return Ok(());
        }
        let table = self.table;
        let binding = table
            .binding_at(node)
            .ok_or_else(|| GenerationError::UnsupportedType(format!("binding #{node}")))?;

        // An in-progress node is on the path, so this reports the cycle.
        self.path.enter(&binding.contract)?;
        self.marks[node] = Mark::InProgress;

        for parameter in self.index.signature_of(&binding.implementation) {
            let dep = table.index_of(parameter).ok_or_else(|| {
                GenerationError::UnresolvedDependency {
                    consumer: binding.implementation.display_name().to_string(),
                    missing: parameter.display_name().to_string(),
                }
            })?;
            debug!(
                consumer = %binding.implementation,
                parameter = %parameter,
                depth = self.path.depth(),
                "dependency edge"
            );
            self.dependencies[node].push(dep);
            self.visit(dep)?;
        }

        self.path.leave(&binding.contract);
        self.marks[node] = Mark::Done;
        self.order.push(node);
        Ok(())
    }
}
