use crate::TagKind;
use std::{
    convert::Infallible,
    error::Error,
    fmt::{self, Debug, Display, Formatter},
};

/// An error associated with the structure of an in-memory NBT tag tree.
///
/// This is raised when a mutation would violate one of the tree's invariants (such as pushing a tag of
/// the wrong kind into a list, or naming a list element), when a root tag does not match the shape
/// required by a [`Flavor`], or when a lookup into a compound or list finds a missing tag or a tag of an
/// unexpected type. These errors indicate a bug in the caller rather than bad input data.
///
/// [`Flavor`]: crate::Flavor
#[repr(transparent)]
pub struct NbtStructureError {
    repr: NbtStructureErrorRepr,
}

impl NbtStructureError {
    pub(crate) fn missing_tag<T: Into<String>>(tag_name: T) -> Self {
        NbtStructureError {
            repr: NbtStructureErrorRepr::MissingTag {
                tag_name: tag_name.into().into_boxed_str(),
            },
        }
    }

    pub(crate) fn invalid_index(index: usize, length: usize) -> Self {
        NbtStructureError {
            repr: NbtStructureErrorRepr::InvalidIndex { index, length },
        }
    }

    pub(crate) fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        NbtStructureError {
            repr: NbtStructureErrorRepr::TypeMismatch {
                expected,
                found,
            },
        }
    }

    pub(crate) fn heterogeneous_list(expected: TagKind, found: TagKind) -> Self {
        NbtStructureError {
            repr: NbtStructureErrorRepr::HeterogeneousList { expected, found },
        }
    }

    pub(crate) fn named_list_element<T: Into<String>>(name: T) -> Self {
        NbtStructureError {
            repr: NbtStructureErrorRepr::NamedListElement {
                name: name.into().into_boxed_str(),
            },
        }
    }

    pub(crate) fn unnamed_compound_child() -> Self {
        NbtStructureError {
            repr: NbtStructureErrorRepr::UnnamedCompoundChild,
        }
    }

    pub(crate) fn invalid_root(flavor: &'static str, found: TagKind) -> Self {
        NbtStructureError {
            repr: NbtStructureErrorRepr::InvalidRoot { flavor, found },
        }
    }

    pub(crate) fn root_name(flavor: &'static str, unnamed_root: bool) -> Self {
        NbtStructureError {
            repr: NbtStructureErrorRepr::RootName {
                flavor,
                unnamed_root,
            },
        }
    }

    /// Returns whether this error was caused by a missing compound tag or an out-of-range list index.
    pub fn is_missing(&self) -> bool {
        matches!(
            self.repr,
            NbtStructureErrorRepr::MissingTag { .. } | NbtStructureErrorRepr::InvalidIndex { .. }
        )
    }

    /// Returns whether this error was caused by a tag of an unexpected type.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.repr, NbtStructureErrorRepr::TypeMismatch { .. })
    }

    /// Returns whether this error was caused by a violated tree invariant or a root shape rejected by a
    /// flavor, as opposed to a failed lookup.
    pub fn is_invariant_violation(&self) -> bool {
        !self.is_missing() && !self.is_type_mismatch()
    }
}

impl From<Infallible> for NbtStructureError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

impl Debug for NbtStructureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.repr, f)
    }
}

impl Display for NbtStructureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.repr {
            NbtStructureErrorRepr::MissingTag { tag_name } =>
                write!(f, "Missing tag \"{}\"", tag_name),
            NbtStructureErrorRepr::InvalidIndex { index, length } =>
                write!(f, "Index out of range: {} >= {}", index, length),
            NbtStructureErrorRepr::TypeMismatch { expected, found } => write!(
                f,
                "Tag type mismatch: expected {} but found {}",
                expected, found
            ),
            NbtStructureErrorRepr::HeterogeneousList { expected, found } => write!(
                f,
                "Cannot insert a {} tag into a list of {} tags",
                found, expected
            ),
            NbtStructureErrorRepr::NamedListElement { name } => write!(
                f,
                "List elements cannot be named, but found a tag named \"{}\"",
                name
            ),
            NbtStructureErrorRepr::UnnamedCompoundChild =>
                write!(f, "Compound children must be named"),
            NbtStructureErrorRepr::InvalidRoot { flavor, found } => write!(
                f,
                "A {} tag is not a valid root under the {} flavor",
                found, flavor
            ),
            NbtStructureErrorRepr::RootName {
                flavor,
                unnamed_root: true,
            } => write!(f, "The {} flavor requires an unnamed root tag", flavor),
            NbtStructureErrorRepr::RootName {
                flavor,
                unnamed_root: false,
            } => write!(f, "The {} flavor requires a named root tag", flavor),
        }
    }
}

impl Error for NbtStructureError {}

#[derive(Debug)]
enum NbtStructureErrorRepr {
    MissingTag {
        tag_name: Box<str>,
    },
    InvalidIndex {
        index: usize,
        length: usize,
    },
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    HeterogeneousList {
        expected: TagKind,
        found: TagKind,
    },
    NamedListElement {
        name: Box<str>,
    },
    UnnamedCompoundChild,
    InvalidRoot {
        flavor: &'static str,
        found: TagKind,
    },
    RootName {
        flavor: &'static str,
        unnamed_root: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories() {
        assert!(NbtStructureError::missing_tag("foo").is_missing());
        assert!(NbtStructureError::invalid_index(3, 2).is_missing());
        assert!(NbtStructureError::type_mismatch("Int", "Byte").is_type_mismatch());

        let error = NbtStructureError::heterogeneous_list(TagKind::Int, TagKind::String);
        assert!(error.is_invariant_violation());
        assert_eq!(
            error.to_string(),
            "Cannot insert a String tag into a list of Int tags"
        );
    }
}
