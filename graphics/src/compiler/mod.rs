//! Frame graph compilation.
//!
//! This module turns the executions submitted for a frame into an execution
//! plan ([`CompiledGraph`]).
//!
//! Compilation performs:
//!
//! 1. **Validation** - Every parent must be submitted in the same frame
//! 2. **Topological Sort** - Order passes respecting dependencies
//! 3. **Cycle Detection** - Validate the graph is a DAG
//!
//! Independent passes keep their relative submission order, which makes the
//! result deterministic for a given frame.
//!
//! # Example
//!
//! ```ignore
//! let executions = vec![
//!     RenderPassExecution::new(lighting).with_parents([geometry]),
//!     RenderPassExecution::new(geometry),
//! ];
//!
//! let compiled = compile(&executions)?;
//! assert_eq!(compiled.pass_order(), &[geometry, lighting]);
//! ```

use std::collections::{HashMap, VecDeque};

use thiserror::Error;

use crate::graph::{PassHandle, RenderPassExecution};

/// A compiled frame graph ready for execution.
///
/// Contains a topologically sorted pass order that respects all dependencies.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompiledGraph {
    pass_order: Vec<PassHandle>,
}

impl CompiledGraph {
    #[cfg(test)]
    pub(crate) fn new(pass_order: Vec<PassHandle>) -> Self {
        Self { pass_order }
    }

    /// Pass execution order as handles.
    pub fn pass_order(&self) -> &[PassHandle] {
        &self.pass_order
    }

    pub fn pass_count(&self) -> usize {
        self.pass_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pass_order.is_empty()
    }

    /// Position of `handle` in the order, if it was compiled.
    pub fn position(&self, handle: PassHandle) -> Option<usize> {
        self.pass_order.iter().position(|&h| h == handle)
    }
}

/// Errors that can occur during graph compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The graph contains a cyclic dependency.
    #[error("frame graph contains cyclic dependency")]
    CyclicDependency,

    /// A parent was named that was not submitted this frame.
    #[error("pass {pass:?} has missing parent {parent:?}")]
    MissingParent { pass: PassHandle, parent: PassHandle },

    /// The same pass was submitted twice in one frame.
    #[error("pass {0:?} submitted more than once")]
    DuplicatePass(PassHandle),

    /// A pass lists itself as a parent.
    #[error("pass {0:?} depends on itself")]
    SelfDependency(PassHandle),
}

/// Compile one frame's executions into an execution plan.
pub fn compile(executions: &[RenderPassExecution]) -> Result<CompiledGraph, GraphError> {
    let mut result = CompiledGraph::default();
    compile_into(executions, &mut result)?;
    Ok(result)
}

/// In-place variant of [`compile`] that reuses the target's allocation.
pub(crate) fn compile_into(
    executions: &[RenderPassExecution],
    target: &mut CompiledGraph,
) -> Result<(), GraphError> {
    let n = executions.len();
    target.pass_order.clear();

    if n == 0 {
        return Ok(());
    }

    let mut node_of: HashMap<PassHandle, usize> = HashMap::with_capacity(n);
    for (node, execution) in executions.iter().enumerate() {
        if node_of.insert(execution.handle, node).is_some() {
            return Err(GraphError::DuplicatePass(execution.handle));
        }
    }

    // Kahn's algorithm for topological sort
    //
    // 1. Resolve parents to nodes, dropping duplicate edges
    // 2. Start with passes that have no parents (in-degree = 0)
    // 3. Process them, reducing in-degree of their children
    // 4. If we can't process all passes, there's a cycle

    let mut in_degree = vec![0u32; n];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (node, execution) in executions.iter().enumerate() {
        let mut seen: Vec<usize> = Vec::with_capacity(execution.parents.len());
        for &parent in &execution.parents {
            if parent == execution.handle {
                return Err(GraphError::SelfDependency(parent));
            }
            let parent_node = *node_of.get(&parent).ok_or(GraphError::MissingParent {
                pass: execution.handle,
                parent,
            })?;
            if seen.contains(&parent_node) {
                continue;
            }
            seen.push(parent_node);
            children[parent_node].push(node);
            in_degree[node] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&node| in_degree[node] == 0).collect();

    while let Some(node) = queue.pop_front() {
        target.pass_order.push(executions[node].handle);

        for &child in &children[node] {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    if target.pass_order.len() != n {
        target.pass_order.clear();
        return Err(GraphError::CyclicDependency);
    }

    Ok(())
}
