use crate::{Flavor, NbtCompound, NbtList, NbtStructureError, NbtTag, TagKind};
use std::convert::TryFrom;

/// A detached tag paired with an optional name.
///
/// An absent name (`None`) and an empty name (`Some("")`) are distinct: compound children must be named,
/// even if only with the empty string, while list elements must not be named at all. See
/// [`NbtCompound::insert_named`] and [`NbtList::push_named`].
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTag {
    name: Option<String>,
    tag: NbtTag,
}

impl NamedTag {
    /// Creates a named tag.
    pub fn new<K: Into<String>, T: Into<NbtTag>>(name: K, tag: T) -> Self {
        NamedTag {
            name: Some(name.into()),
            tag: tag.into(),
        }
    }

    /// Creates a tag without a name.
    pub fn unnamed<T: Into<NbtTag>>(tag: T) -> Self {
        NamedTag {
            name: None,
            tag: tag.into(),
        }
    }

    /// Returns the name of this tag, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets or clears the name of this tag.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// Removes the name of this tag, returning it.
    pub fn clear_name(&mut self) -> Option<String> {
        self.name.take()
    }

    /// Returns the kind of the wrapped tag.
    #[inline]
    pub fn kind(&self) -> TagKind {
        self.tag.kind()
    }

    /// Returns the wrapped tag.
    pub fn tag(&self) -> &NbtTag {
        &self.tag
    }

    /// Returns the wrapped tag mutably. The kind of a detached tag may be changed freely.
    pub fn tag_mut(&mut self) -> &mut NbtTag {
        &mut self.tag
    }

    /// Splits this tag into its name and value.
    pub fn into_parts(self) -> (Option<String>, NbtTag) {
        (self.name, self.tag)
    }
}

/// The outermost tag of an NBT document.
///
/// A root is always a compound or a list, and its name is present or absent depending on the [`Flavor`]
/// it is used with. Both rules are checked whenever the root's tag or name is set, so a root that exists
/// is known to be valid for the flavor it was built against.
///
/// ```
/// # use nbt_codec::*;
/// let root = NbtRoot::new(Flavor::DEFAULT, Some("Level".to_owned()), NbtCompound::new()).unwrap();
/// assert_eq!(root.name(), Some("Level"));
///
/// // Lists are only accepted as the root by some flavors
/// assert!(NbtRoot::for_flavor(Flavor::DEFAULT, NbtList::from(vec![1i32])).is_err());
/// assert!(NbtRoot::for_flavor(Flavor::LENIENT, NbtList::from(vec![1i32])).is_ok());
///
/// // Network dialects have no root name
/// assert!(NbtRoot::new(Flavor::JAVA_NETWORK, Some(String::new()), NbtCompound::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NbtRoot {
    name: Option<String>,
    tag: NbtTag,
}

impl NbtRoot {
    /// Creates a root from the given name and tag, checking both against the given flavor.
    pub fn new<T: Into<NbtTag>>(
        flavor: Flavor,
        name: Option<String>,
        tag: T,
    ) -> Result<Self, NbtStructureError> {
        let tag = tag.into();
        flavor.check_root(tag.kind(), name.as_deref())?;
        Ok(NbtRoot { name, tag })
    }

    /// Creates a root with the default name for the given flavor: empty for named-root flavors, absent
    /// otherwise.
    pub fn for_flavor<T: Into<NbtTag>>(flavor: Flavor, tag: T) -> Result<Self, NbtStructureError> {
        Self::new(flavor, flavor.default_root_name(), tag)
    }

    /// Creates a named compound root without checking it against any flavor.
    ///
    /// Compound roots with a name suit every flavor with named roots, but nothing stops this root from
    /// being paired with an unnamed-root flavor later. Use [`NbtRoot::new`] or [`NbtRoot::for_flavor`] to
    /// check up front, or [`NbtRoot::validate`]. Writing through [`io::write_nbt`](crate::io::write_nbt)
    /// rejects a mismatched root before any byte is written.
    ///
    /// ```
    /// # use nbt_codec::*;
    /// let root = NbtRoot::named("", NbtCompound::new());
    /// assert!(root.validate(Flavor::DEFAULT).is_ok());
    /// assert!(root.validate(Flavor::JAVA_NETWORK).is_err());
    /// ```
    pub fn named<K: Into<String>>(name: K, compound: NbtCompound) -> Self {
        NbtRoot {
            name: Some(name.into()),
            tag: NbtTag::Compound(compound),
        }
    }

    /// Creates an unnamed compound root without checking it against any flavor. It only suits flavors
    /// with unnamed roots; see [`NbtRoot::named`] for the checked alternatives.
    ///
    /// ```
    /// # use nbt_codec::*;
    /// let root = NbtRoot::unnamed(NbtCompound::new());
    /// assert!(root.validate(Flavor::JAVA_NETWORK).is_ok());
    /// assert!(root.validate(Flavor::DEFAULT).is_err());
    /// ```
    pub fn unnamed(compound: NbtCompound) -> Self {
        NbtRoot {
            name: None,
            tag: NbtTag::Compound(compound),
        }
    }

    // The decoder only produces roots it has already checked against the flavor
    pub(crate) fn from_parts_unchecked(name: Option<String>, tag: NbtTag) -> Self {
        NbtRoot { name, tag }
    }

    /// Checks this root against the rules of the given flavor.
    pub fn validate(&self, flavor: Flavor) -> Result<(), NbtStructureError> {
        flavor.check_root(self.tag.kind(), self.name.as_deref())
    }

    /// Returns the name of this root, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Replaces the name of this root, failing without modifying the root if the name's presence does not
    /// match the given flavor.
    pub fn set_name(&mut self, flavor: Flavor, name: Option<String>) -> Result<(), NbtStructureError> {
        flavor.check_root(self.tag.kind(), name.as_deref())?;
        self.name = name;
        Ok(())
    }

    /// Returns the root tag.
    pub fn tag(&self) -> &NbtTag {
        &self.tag
    }

    /// Replaces the root tag, failing without modifying the root if the new tag is not an acceptable root
    /// under the given flavor. The previous tag is returned.
    pub fn set_tag<T: Into<NbtTag>>(&mut self, flavor: Flavor, tag: T) -> Result<NbtTag, NbtStructureError> {
        let tag = tag.into();
        flavor.check_root(tag.kind(), self.name.as_deref())?;
        Ok(std::mem::replace(&mut self.tag, tag))
    }

    /// Returns the root compound, if the root is a compound.
    pub fn as_compound(&self) -> Option<&NbtCompound> {
        match &self.tag {
            NbtTag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    /// Returns the root compound mutably, if the root is a compound.
    pub fn as_compound_mut(&mut self) -> Option<&mut NbtCompound> {
        match &mut self.tag {
            NbtTag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    /// Returns the root list, if the root is a list.
    pub fn as_list(&self) -> Option<&NbtList> {
        match &self.tag {
            NbtTag::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the root list mutably, if the root is a list.
    pub fn as_list_mut(&mut self) -> Option<&mut NbtList> {
        match &mut self.tag {
            NbtTag::List(list) => Some(list),
            _ => None,
        }
    }

    /// Consumes this root, returning the compound it holds or an error if it holds a list.
    pub fn into_compound(self) -> Result<NbtCompound, NbtStructureError> {
        NbtCompound::try_from(self.tag)
    }

    /// Splits this root into its name and tag.
    pub fn into_parts(self) -> (Option<String>, NbtTag) {
        (self.name, self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_updates_leave_root_untouched() {
        let mut root = NbtRoot::named("root", NbtCompound::new());

        assert!(root.set_name(Flavor::DEFAULT, None).is_err());
        assert_eq!(root.name(), Some("root"));

        assert!(root
            .set_tag(Flavor::DEFAULT, NbtList::from(vec![1i8]))
            .is_err());
        assert!(root.as_compound().is_some());

        let previous = root
            .set_tag(Flavor::LENIENT, NbtList::from(vec![1i8]))
            .unwrap();
        assert_eq!(previous, NbtTag::Compound(NbtCompound::new()));
        assert_eq!(root.as_list().map(NbtList::len), Some(1));
        assert!(root.validate(Flavor::DEFAULT).is_err());
        assert!(root.validate(Flavor::LENIENT).is_ok());
    }

    #[test]
    fn scalar_roots_are_rejected() {
        let error = NbtRoot::for_flavor(Flavor::LENIENT, 5i32).unwrap_err();
        assert!(error.is_invariant_violation());
    }

    #[test]
    fn detached_names() {
        let mut tag = NamedTag::new("", 1i32);
        assert_eq!(tag.name(), Some(""));
        assert_eq!(tag.clear_name(), Some(String::new()));
        assert_eq!(tag.name(), None);
        assert_eq!(tag.kind(), TagKind::Int);
    }
}
