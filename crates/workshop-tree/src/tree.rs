//! ---
//! ems_section: "02-parameter-tree"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Path-addressable parameter tree."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, TreeError};
use crate::metadata::Metadata;
use crate::node::{Access, Branch, Node, ParamSource};
use crate::path::{join, segments};
use crate::value::ValueKind;

/// Whether declared `min`/`max` metadata is checked on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    /// Bounds are descriptive only.
    #[default]
    Advisory,
    /// Writes outside the bounds fail.
    Enforced,
}

/// Write accepted during validation, applied once the whole request has been checked.
enum PendingWrite<F> {
    Field { path: String, field: F, value: Value },
    Stored { path: String, value: Value },
}

/// Path-addressable tree of parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTree<F> {
    root: Node<F>,
    bounds: BoundsPolicy,
}

impl<F: Copy> ParameterTree<F> {
    /// Build a tree from its top-level children.
    pub fn new(root: Branch<F>) -> Self {
        Self {
            root: Node::Branch(root),
            bounds: BoundsPolicy::default(),
        }
    }

    /// Build a tree from `(name, node)` pairs.
    pub fn from_children<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, Node<F>)>,
        K: Into<String>,
    {
        Self {
            root: Node::branch(children),
            bounds: BoundsPolicy::default(),
        }
    }

    /// Select how declared bounds are treated.
    pub fn with_bounds_policy(mut self, bounds: BoundsPolicy) -> Self {
        self.bounds = bounds;
        self
    }

    /// Active bounds policy.
    pub fn bounds_policy(&self) -> BoundsPolicy {
        self.bounds
    }

    /// Every leaf path in declaration order.
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_paths(&self.root, "", &mut paths);
        paths
    }

    /// True when `path` resolves to a node.
    pub fn contains(&self, path: &str) -> bool {
        segments(path)
            .and_then(|names| self.resolve(&names, &names.join("/")).map(|_| ()))
            .is_ok()
    }

    /// Read the node at `path`.
    ///
    /// A leaf yields its value; a branch yields a snapshot of all descendants. With
    /// `with_metadata` every leaf is rendered as `{"value", "type", "writeable", ..}`
    /// followed by its declared metadata. Reading a write-only leaf directly fails;
    /// inside a snapshot it renders as `null`.
    pub fn get<S>(&self, path: &str, with_metadata: bool, source: &S) -> Result<Value>
    where
        S: ParamSource<F> + ?Sized,
    {
        let names = segments(path)?;
        let canonical = names.join("/");
        let node = self.resolve(&names, &canonical)?;
        if let Node::Field {
            access: Access::WriteOnly,
            ..
        } = node
        {
            return Err(TreeError::WriteOnly(canonical));
        }
        Ok(render(node, with_metadata, source))
    }

    /// Write `data` to the node at `path`.
    ///
    /// A leaf receives `data` as its new value. A branch expects a mapping whose keys
    /// name existing children and is applied recursively; read-only leaves reached
    /// through a branch are skipped, while a direct write to one fails. The request is
    /// validated in full before any value is written.
    pub fn set<S>(&mut self, path: &str, data: Value, source: &mut S) -> Result<()>
    where
        S: ParamSource<F> + ?Sized,
    {
        let names = segments(path)?;
        let canonical = names.join("/");
        let mut writes = Vec::new();
        let node = self.resolve(&names, &canonical)?;
        self.plan(node, &canonical, data, &*source, true, &mut writes)?;

        for write in writes {
            match write {
                PendingWrite::Field { path, field, value } => {
                    source
                        .write(field, value)
                        .map_err(|reason| TreeError::Setter {
                            path: path.clone(),
                            source: reason,
                        })?;
                    debug!(path = %path, "parameter written");
                }
                PendingWrite::Stored { path, value } => {
                    let names = segments(&path)?;
                    match self.resolve_mut(&names) {
                        Some(Node::Stored { value: slot, .. }) => *slot = value,
                        _ => return Err(TreeError::InvalidPath(path)),
                    }
                    debug!(path = %path, "stored parameter written");
                }
            }
        }
        Ok(())
    }

    fn resolve(&self, names: &[&str], path: &str) -> Result<&Node<F>> {
        let mut node = &self.root;
        for name in names {
            node = match node {
                Node::Branch(children) => children
                    .get(*name)
                    .ok_or_else(|| TreeError::InvalidPath(path.to_owned()))?,
                _ => return Err(TreeError::InvalidPath(path.to_owned())),
            };
        }
        Ok(node)
    }

    fn resolve_mut(&mut self, names: &[&str]) -> Option<&mut Node<F>> {
        let mut node = &mut self.root;
        for name in names {
            node = match node {
                Node::Branch(children) => children.get_mut(*name)?,
                _ => return None,
            };
        }
        Some(node)
    }

    fn plan<S>(
        &self,
        node: &Node<F>,
        path: &str,
        data: Value,
        source: &S,
        direct: bool,
        writes: &mut Vec<PendingWrite<F>>,
    ) -> Result<()>
    where
        S: ParamSource<F> + ?Sized,
    {
        match node {
            Node::Branch(children) => {
                let entries = match data {
                    Value::Object(entries) => entries,
                    other => {
                        return Err(TreeError::NotABranch {
                            path: path.to_owned(),
                            actual: ValueKind::of(&other).as_str(),
                        })
                    }
                };
                for (name, value) in entries {
                    let child_path = join(path, &name);
                    let child = children
                        .get(&name)
                        .ok_or_else(|| TreeError::InvalidPath(child_path.clone()))?;
                    self.plan(child, &child_path, value, source, false, writes)?;
                }
                Ok(())
            }
            Node::Field {
                field,
                access,
                metadata,
            } => {
                if !access.writeable() {
                    return skip_read_only(path, direct);
                }
                if access.readable() {
                    check_kind(path, &source.read(*field), &data)?;
                }
                self.check_bounds(path, metadata, &data)?;
                source
                    .check(*field, &data)
                    .map_err(|reason| TreeError::Setter {
                        path: path.to_owned(),
                        source: reason,
                    })?;
                writes.push(PendingWrite::Field {
                    path: path.to_owned(),
                    field: *field,
                    value: data,
                });
                Ok(())
            }
            Node::Stored {
                value,
                writeable,
                metadata,
            } => {
                if !writeable {
                    return skip_read_only(path, direct);
                }
                check_kind(path, value, &data)?;
                self.check_bounds(path, metadata, &data)?;
                let value = match (ValueKind::of(value), data.as_f64()) {
                    (ValueKind::Float, Some(widened)) => Value::from(widened),
                    _ => data,
                };
                writes.push(PendingWrite::Stored {
                    path: path.to_owned(),
                    value,
                });
                Ok(())
            }
        }
    }

    fn check_bounds(&self, path: &str, metadata: &Metadata, data: &Value) -> Result<()> {
        if self.bounds == BoundsPolicy::Advisory {
            return Ok(());
        }
        let Some(number) = data.as_f64() else {
            return Ok(());
        };
        if let Some(min) = &metadata.min {
            if min.as_f64().is_some_and(|limit| number < limit) {
                return Err(TreeError::BelowMinimum {
                    path: path.to_owned(),
                    value: data.clone(),
                    min: min.clone(),
                });
            }
        }
        if let Some(max) = &metadata.max {
            if max.as_f64().is_some_and(|limit| number > limit) {
                return Err(TreeError::AboveMaximum {
                    path: path.to_owned(),
                    value: data.clone(),
                    max: max.clone(),
                });
            }
        }
        Ok(())
    }
}

fn skip_read_only(path: &str, direct: bool) -> Result<()> {
    if direct {
        return Err(TreeError::ReadOnly(path.to_owned()));
    }
    debug!(path, "skipping read-only parameter in branch update");
    Ok(())
}

fn check_kind(path: &str, current: &Value, incoming: &Value) -> Result<()> {
    let expected = ValueKind::of(current);
    let actual = ValueKind::of(incoming);
    if expected.accepts(actual) {
        Ok(())
    } else {
        Err(TreeError::TypeMismatch {
            path: path.to_owned(),
            expected: expected.as_str(),
            actual: actual.as_str(),
        })
    }
}

fn render<F, S>(node: &Node<F>, with_metadata: bool, source: &S) -> Value
where
    F: Copy,
    S: ParamSource<F> + ?Sized,
{
    match node {
        Node::Branch(children) => Value::Object(
            children
                .iter()
                .map(|(name, child)| (name.clone(), render(child, with_metadata, source)))
                .collect(),
        ),
        Node::Field {
            field,
            access,
            metadata,
        } => {
            let value = if access.readable() {
                source.read(*field)
            } else {
                Value::Null
            };
            if with_metadata {
                describe(value, access.writeable(), metadata)
            } else {
                value
            }
        }
        Node::Stored {
            value,
            writeable,
            metadata,
        } => {
            if with_metadata {
                describe(value.clone(), *writeable, metadata)
            } else {
                value.clone()
            }
        }
    }
}

fn describe(value: Value, writeable: bool, metadata: &Metadata) -> Value {
    let mut described = Map::new();
    described.insert("type".into(), ValueKind::of(&value).as_str().into());
    described.insert("writeable".into(), writeable.into());
    described.insert("value".into(), value);
    described.extend(metadata.to_map());
    Value::Object(described)
}

fn collect_paths<F>(node: &Node<F>, prefix: &str, paths: &mut Vec<String>) {
    match node {
        Node::Branch(children) => {
            for (name, child) in children {
                collect_paths(child, &join(prefix, name), paths);
            }
        }
        _ => paths.push(prefix.to_owned()),
    }
}
