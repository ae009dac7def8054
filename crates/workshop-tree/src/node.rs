//! ---
//! ems_section: "02-parameter-tree"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Path-addressable parameter tree."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::FieldError;
use crate::metadata::Metadata;

/// Children of a branch, kept in declaration order.
pub type Branch<F> = IndexMap<String, Node<F>>;

/// Which accessors a field leaf exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Getter and setter.
    ReadWrite,
    /// Getter only; writes fail.
    ReadOnly,
    /// Setter only; nothing is stored to read back.
    WriteOnly,
}

impl Access {
    /// True when the leaf has a getter.
    pub fn readable(&self) -> bool {
        !matches!(self, Access::WriteOnly)
    }

    /// True when the leaf has a setter.
    pub fn writeable(&self) -> bool {
        !matches!(self, Access::ReadOnly)
    }
}

/// Owner of the state behind field leaves.
///
/// The tree calls `read` only for readable leaves and `write` only for writeable ones.
/// `check` runs while the request is validated, before any leaf is written; a value it
/// accepts must not be rejected by `write`. `write` may store, coerce or silently
/// ignore the value; an `Err` aborts the remaining writes of the request.
pub trait ParamSource<F> {
    /// Current value of `field`.
    fn read(&self, field: F) -> Value;

    /// Whether `value` can be applied to `field`.
    fn check(&self, _field: F, _value: &Value) -> Result<(), FieldError> {
        Ok(())
    }

    /// Apply `value` to `field`.
    fn write(&mut self, field: F, value: Value) -> Result<(), FieldError>;
}

/// A node of the parameter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<F> {
    /// Leaf dispatched through a [`ParamSource`].
    Field {
        /// Tag handed to the source.
        field: F,
        /// Exposed accessors.
        access: Access,
        /// Declared metadata.
        metadata: Metadata,
    },
    /// Leaf whose value is held by the tree itself.
    Stored {
        /// Current value.
        value: Value,
        /// Whether `set` may replace it.
        writeable: bool,
        /// Declared metadata.
        metadata: Metadata,
    },
    /// Internal node.
    Branch(Branch<F>),
}

impl<F> Node<F> {
    /// Field leaf with getter and setter.
    pub fn read_write(field: F) -> Self {
        Self::field(field, Access::ReadWrite)
    }

    /// Field leaf with a getter only, e.g. a computed value.
    pub fn read_only(field: F) -> Self {
        Self::field(field, Access::ReadOnly)
    }

    /// Field leaf with a setter only, e.g. a trigger.
    pub fn write_only(field: F) -> Self {
        Self::field(field, Access::WriteOnly)
    }

    fn field(field: F, access: Access) -> Self {
        Node::Field {
            field,
            access,
            metadata: Metadata::default(),
        }
    }

    /// Writeable value held by the tree.
    pub fn value(value: impl Into<Value>) -> Self {
        Node::Stored {
            value: value.into(),
            writeable: true,
            metadata: Metadata::default(),
        }
    }

    /// Read-only value held by the tree.
    pub fn constant(value: impl Into<Value>) -> Self {
        Node::Stored {
            value: value.into(),
            writeable: false,
            metadata: Metadata::default(),
        }
    }

    /// Internal node built from `(name, node)` pairs; order is preserved.
    pub fn branch<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, Node<F>)>,
        K: Into<String>,
    {
        Node::Branch(
            children
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        )
    }

    /// Replace the metadata of a leaf. Branches carry no metadata and are returned unchanged.
    pub fn with_metadata(mut self, declared: Metadata) -> Self {
        match &mut self {
            Node::Field { metadata, .. } | Node::Stored { metadata, .. } => *metadata = declared,
            Node::Branch(_) => {}
        }
        self
    }

    /// Declared metadata of a leaf.
    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Node::Field { metadata, .. } | Node::Stored { metadata, .. } => Some(metadata),
            Node::Branch(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_preserves_declaration_order() {
        let node: Node<u8> = Node::branch([
            ("zeta", Node::read_write(0)),
            ("alpha", Node::read_only(1)),
            ("mid", Node::constant("x")),
        ]);
        let Node::Branch(children) = node else {
            panic!("expected a branch");
        };
        let names: Vec<&str> = children.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn metadata_is_ignored_on_branches() {
        let node: Node<u8> = Node::branch(Vec::<(String, Node<u8>)>::new())
            .with_metadata(Metadata::new().with_name("ignored"));
        assert!(node.metadata().is_none());
        let leaf: Node<u8> = Node::read_write(0).with_metadata(Metadata::new().with_min(1));
        assert_eq!(leaf.metadata().unwrap().min, Some(Value::from(1)));
    }

    #[test]
    fn access_flags() {
        assert!(Access::ReadWrite.readable() && Access::ReadWrite.writeable());
        assert!(Access::ReadOnly.readable() && !Access::ReadOnly.writeable());
        assert!(!Access::WriteOnly.readable() && Access::WriteOnly.writeable());
    }
}
