//! The traversal engines.
//!
//! Both engines make the same decision at every node, in the same order:
//! the leaf check first, then the container probe. Children are mapped left
//! to right and the container is rebuilt after all of them, so the function
//! sees leaves in the same order whichever engine runs.

use crate::dtype::TypeMatch;
use crate::error::ConstructionError;
use crate::value::{NodeShape, Value};

use super::Selector;
use super::args::Args;
use super::node::{Rebuild, Step};

/// One mapping pass over a value tree.
pub(crate) struct Walk<'a, D: ?Sized, W: ?Sized, F> {
    selector: Selector<'a, D, W>,
    args: &'a Args,
    function: F,
    nodes: usize,
    leaves: usize,
}

enum Task {
    Visit { value: Value, depth: usize },
    Build { rebuild: Rebuild, arity: usize, depth: usize },
}

impl<'a, D, W, F, E> Walk<'a, D, W, F>
where
    D: TypeMatch + ?Sized,
    W: TypeMatch + ?Sized,
    F: FnMut(Value, &Args) -> Result<Value, E>,
    E: From<ConstructionError>,
{
    pub(crate) fn new(selector: Selector<'a, D, W>, args: &'a Args, function: F) -> Self {
        Self {
            selector,
            args,
            function,
            nodes: 0,
            leaves: 0,
        }
    }

    pub(crate) const fn nodes(&self) -> usize {
        self.nodes
    }

    pub(crate) const fn leaves(&self) -> usize {
        self.leaves
    }

    fn step(&mut self, value: Value, depth: usize) -> (Step, NodeShape) {
        self.nodes += 1;
        let selected = self.selector.selects(&value, depth);
        let step = Step::of(value, selected);
        let shape = step.shape();
        (step, shape)
    }

    fn transform(&mut self, value: Value, shape: NodeShape, depth: usize) -> Result<Value, E> {
        self.leaves += 1;
        tracing::trace!(depth, ?shape, type_name = value.type_name(), "transforming leaf");
        (self.function)(value, self.args)
    }

    fn finish(rebuild: Rebuild, children: Vec<Value>, depth: usize) -> Result<Value, E> {
        let shape = rebuild.shape();
        rebuild.finish(children).map_err(|error| {
            tracing::debug!(
                depth,
                ?shape,
                type_name = error.type_name(),
                %error,
                "container rebuild failed"
            );
            E::from(error)
        })
    }

    /// Maps `value` on the call stack. Stack use grows with nesting depth.
    pub(crate) fn recursive(&mut self, value: Value, depth: usize) -> Result<Value, E> {
        match self.step(value, depth) {
            (Step::Leaf(value), shape) => self.transform(value, shape, depth),
            (Step::Descend(rebuild, children), shape) => {
                tracing::trace!(
                    depth,
                    ?shape,
                    type_name = rebuild.type_name(),
                    arity = children.len(),
                    "descending"
                );
                let mut mapped = Vec::with_capacity(children.len());
                for child in children {
                    mapped.push(self.recursive(child, depth + 1)?);
                }
                Self::finish(rebuild, mapped, depth)
            }
            (Step::Opaque(value), _) => Ok(value),
        }
    }

    /// Maps `value` with an explicit work stack. Stack use is constant.
    pub(crate) fn iterative(&mut self, root: Value) -> Result<Value, E> {
        let mut tasks = vec![Task::Visit {
            value: root,
            depth: 0,
        }];
        let mut results: Vec<Value> = Vec::new();

        while let Some(task) = tasks.pop() {
            match task {
                Task::Visit { value, depth } => match self.step(value, depth) {
                    (Step::Leaf(value), shape) => {
                        let mapped = self.transform(value, shape, depth)?;
                        results.push(mapped);
                    }
                    (Step::Descend(rebuild, children), shape) => {
                        tracing::trace!(
                            depth,
                            ?shape,
                            type_name = rebuild.type_name(),
                            arity = children.len(),
                            "descending"
                        );
                        tasks.push(Task::Build {
                            rebuild,
                            arity: children.len(),
                            depth,
                        });
                        tasks.extend(children.into_iter().rev().map(|value| Task::Visit {
                            value,
                            depth: depth + 1,
                        }));
                    }
                    (Step::Opaque(value), _) => results.push(value),
                },
                Task::Build {
                    rebuild,
                    arity,
                    depth,
                } => {
                    let children = results.split_off(results.len() - arity);
                    results.push(Self::finish(rebuild, children, depth)?);
                }
            }
        }

        debug_assert_eq!(results.len(), 1);
        Ok(results.pop().unwrap_or_default())
    }
}
