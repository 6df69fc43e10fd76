use crate::{NbtStructureError, TagKind};

/// Describes an NBT dialect: the byte order of multi-byte values, and the rules governing the shape of
/// the root tag.
///
/// Flavors are plain values which are passed explicitly to every read and write. A handful of presets are
/// provided as associated constants, and custom dialects can be assembled with [`Flavor::custom`] and the
/// `with_*` builder methods.
///
/// ```
/// # use nbt_codec::Flavor;
/// const MY_DIALECT: Flavor = Flavor::custom("my dialect")
///     .with_big_endian(false)
///     .with_allow_list_root(true);
///
/// assert!(!MY_DIALECT.big_endian);
/// assert!(!MY_DIALECT.unnamed_root);
/// assert_eq!(MY_DIALECT.name, "my dialect");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flavor {
    /// The name of this flavor, used in error messages.
    pub name: &'static str,
    /// Whether multi-byte scalars, lengths and counts are big-endian.
    pub big_endian: bool,
    /// Whether the root tag's name is omitted from the wire format entirely.
    pub unnamed_root: bool,
    /// Whether a list is accepted as the root tag in addition to a compound.
    pub allow_list_root: bool,
    /// Whether strings are encoded with Java's modified UTF-8 rather than plain UTF-8.
    pub modified_utf8: bool,
}

impl Flavor {
    /// The classic dialect: big-endian, named compound root, modified UTF-8 strings.
    pub const DEFAULT: Flavor = Flavor {
        name: "default",
        big_endian: true,
        unnamed_root: false,
        allow_list_root: false,
        modified_utf8: true,
    };

    /// Identical to [`DEFAULT`](Flavor::DEFAULT) except that a list may also be the root tag.
    pub const LENIENT: Flavor = Flavor::DEFAULT
        .renamed("lenient")
        .with_allow_list_root(true);

    /// The dialect used by network packets, where the root tag carries no name.
    pub const JAVA_NETWORK: Flavor = Flavor::DEFAULT
        .renamed("java network")
        .with_unnamed_root(true);

    /// The little-endian dialect used by Bedrock edition files.
    pub const BEDROCK: Flavor = Flavor {
        name: "bedrock",
        big_endian: false,
        unnamed_root: false,
        allow_list_root: true,
        modified_utf8: false,
    };

    /// Returns a new flavor with the given name and the options of [`DEFAULT`](Flavor::DEFAULT).
    pub const fn custom(name: &'static str) -> Self {
        Flavor::DEFAULT.renamed(name)
    }

    /// Returns a copy of this flavor with the given name.
    pub const fn renamed(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Returns a copy of this flavor with the given byte order.
    pub const fn with_big_endian(mut self, big_endian: bool) -> Self {
        self.big_endian = big_endian;
        self
    }

    /// Returns a copy of this flavor with the given root naming rule.
    pub const fn with_unnamed_root(mut self, unnamed_root: bool) -> Self {
        self.unnamed_root = unnamed_root;
        self
    }

    /// Returns a copy of this flavor with the given root kind rule.
    pub const fn with_allow_list_root(mut self, allow_list_root: bool) -> Self {
        self.allow_list_root = allow_list_root;
        self
    }

    /// Returns a copy of this flavor with the given string encoding.
    pub const fn with_modified_utf8(mut self, modified_utf8: bool) -> Self {
        self.modified_utf8 = modified_utf8;
        self
    }

    /// Returns whether a tag of the given kind may be the root tag under this flavor.
    #[inline]
    pub const fn accepts_root_kind(&self, kind: TagKind) -> bool {
        match kind {
            TagKind::Compound => true,
            TagKind::List => self.allow_list_root,
            _ => false,
        }
    }

    /// Checks that a root tag of the given kind and name satisfies this flavor's rules.
    ///
    /// ```
    /// # use nbt_codec::{Flavor, TagKind};
    /// assert!(Flavor::DEFAULT.check_root(TagKind::Compound, Some("")).is_ok());
    /// assert!(Flavor::DEFAULT.check_root(TagKind::Compound, None).is_err());
    /// assert!(Flavor::DEFAULT.check_root(TagKind::List, Some("")).is_err());
    /// assert!(Flavor::LENIENT.check_root(TagKind::List, Some("")).is_ok());
    /// assert!(Flavor::JAVA_NETWORK.check_root(TagKind::Compound, Some("root")).is_err());
    /// ```
    pub fn check_root(&self, kind: TagKind, name: Option<&str>) -> Result<(), NbtStructureError> {
        if !self.accepts_root_kind(kind) {
            return Err(NbtStructureError::invalid_root(self.name, kind));
        }

        if self.unnamed_root == name.is_some() {
            return Err(NbtStructureError::root_name(self.name, self.unnamed_root));
        }

        Ok(())
    }

    /// Returns the root name a freshly created root should carry under this flavor: an empty name for
    /// named-root dialects and no name otherwise.
    pub fn default_root_name(&self) -> Option<String> {
        if self.unnamed_root {
            None
        } else {
            Some(String::new())
        }
    }
}

impl Default for Flavor {
    fn default() -> Self {
        Flavor::DEFAULT
    }
}
