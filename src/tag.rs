use crate::{raw, NamedTag, NbtStructureError};
use indexmap::IndexMap;
use std::{
    borrow::Borrow,
    convert::{AsRef, TryFrom},
    fmt::{self, Display, Formatter},
    hash::Hash,
    ops::Index,
};

/// The kind of an NBT tag, including the structural `End` marker which terminates compounds on the
/// wire but never appears as a value.
///
/// The discriminant of each variant is its tag ID in the binary format.
///
/// ```
/// # use nbt_codec::TagKind;
/// use std::convert::TryFrom;
///
/// assert_eq!(TagKind::Compound.id(), 0x0A);
/// assert_eq!(TagKind::try_from(0x09u8), Ok(TagKind::List));
/// assert_eq!(TagKind::try_from(0x0Du8), Err(0x0D));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagKind {
    /// Marks the end of a compound.
    End = 0x0,
    /// A signed, one-byte integer.
    Byte = 0x1,
    /// A signed, two-byte integer.
    Short = 0x2,
    /// A signed, four-byte integer.
    Int = 0x3,
    /// A signed, eight-byte integer.
    Long = 0x4,
    /// A 32-bit floating point value.
    Float = 0x5,
    /// A 64-bit floating point value.
    Double = 0x6,
    /// An array of signed bytes.
    ByteArray = 0x7,
    /// A string.
    String = 0x8,
    /// A homogeneous list of unnamed tags.
    List = 0x9,
    /// A collection of named tags.
    Compound = 0xA,
    /// An array of signed, four-byte integers.
    IntArray = 0xB,
    /// An array of signed, eight-byte integers.
    LongArray = 0xC,
}

impl TagKind {
    /// Returns the tag ID of this kind in the binary format.
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns the human-readable name of this kind.
    pub const fn name(self) -> &'static str {
        match self {
            TagKind::End => "End",
            TagKind::Byte => "Byte",
            TagKind::Short => "Short",
            TagKind::Int => "Int",
            TagKind::Long => "Long",
            TagKind::Float => "Float",
            TagKind::Double => "Double",
            TagKind::ByteArray => "ByteArray",
            TagKind::String => "String",
            TagKind::List => "List",
            TagKind::Compound => "Compound",
            TagKind::IntArray => "IntArray",
            TagKind::LongArray => "LongArray",
        }
    }
}

// Written out by hand, the set of tag IDs is fixed by the format.
impl TryFrom<u8> for TagKind {
    type Error = u8;

    fn try_from(id: u8) -> Result<Self, u8> {
        Ok(match id {
            0x0 => TagKind::End,
            0x1 => TagKind::Byte,
            0x2 => TagKind::Short,
            0x3 => TagKind::Int,
            0x4 => TagKind::Long,
            0x5 => TagKind::Float,
            0x6 => TagKind::Double,
            0x7 => TagKind::ByteArray,
            0x8 => TagKind::String,
            0x9 => TagKind::List,
            0xA => TagKind::Compound,
            0xB => TagKind::IntArray,
            0xC => TagKind::LongArray,
            _ => return Err(id),
        })
    }
}

impl From<TagKind> for u8 {
    fn from(kind: TagKind) -> Self {
        kind.id()
    }
}

impl Display for TagKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The generic NBT tag type, containing all value-carrying tag variants which wrap around a
/// corresponding rust type.
///
/// A tag does not store its own name: the name of a compound child is its key in the
/// [`NbtCompound`], list elements are unnamed, and a detached tag that needs a name travels as a
/// [`NamedTag`].
///
/// Two tags are equal when they would be written as the same bytes, so floating point values are
/// compared by their bit patterns: a NaN equals an identical NaN, and `0.0` differs from `-0.0`.
///
/// ```
/// # use nbt_codec::NbtTag;
/// assert_eq!(NbtTag::Float(f32::NAN), NbtTag::Float(f32::NAN));
/// assert_ne!(NbtTag::Double(0.0), NbtTag::Double(-0.0));
/// ```
///
/// [`NamedTag`]: crate::NamedTag
#[derive(Debug, Clone)]
pub enum NbtTag {
    /// A signed, one-byte integer.
    Byte(i8),
    /// A signed, two-byte integer.
    Short(i16),
    /// A signed, four-byte integer.
    Int(i32),
    /// A signed, eight-byte integer.
    Long(i64),
    /// A 32-bit floating point value.
    Float(f32),
    /// A 64-bit floating point value.
    Double(f64),
    /// An array (vec) of one-byte integers. Minecraft treats this as an array of signed bytes.
    ByteArray(Vec<i8>),
    /// A UTF-8 string.
    String(String),
    /// An NBT tag list.
    List(NbtList),
    /// An NBT tag compound.
    Compound(NbtCompound),
    /// An array (vec) of signed, four-byte integers.
    IntArray(Vec<i32>),
    /// An array (vec) of signed, eight-byte integers.
    LongArray(Vec<i64>),
}

impl NbtTag {
    /// Returns the kind of this tag.
    ///
    /// ```
    /// # use nbt_codec::{NbtTag, TagKind};
    /// assert_eq!(NbtTag::Long(10).kind(), TagKind::Long);
    /// assert_eq!(NbtTag::from("text").kind(), TagKind::String);
    /// ```
    #[inline]
    pub const fn kind(&self) -> TagKind {
        match self {
            NbtTag::Byte(..) => TagKind::Byte,
            NbtTag::Short(..) => TagKind::Short,
            NbtTag::Int(..) => TagKind::Int,
            NbtTag::Long(..) => TagKind::Long,
            NbtTag::Float(..) => TagKind::Float,
            NbtTag::Double(..) => TagKind::Double,
            NbtTag::ByteArray(..) => TagKind::ByteArray,
            NbtTag::String(..) => TagKind::String,
            NbtTag::List(..) => TagKind::List,
            NbtTag::Compound(..) => TagKind::Compound,
            NbtTag::IntArray(..) => TagKind::IntArray,
            NbtTag::LongArray(..) => TagKind::LongArray,
        }
    }

    #[inline]
    pub(crate) fn tag_name(&self) -> &'static str {
        self.kind().name()
    }
}

impl PartialEq for NbtTag {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NbtTag::Byte(a), NbtTag::Byte(b)) => a == b,
            (NbtTag::Short(a), NbtTag::Short(b)) => a == b,
            (NbtTag::Int(a), NbtTag::Int(b)) => a == b,
            (NbtTag::Long(a), NbtTag::Long(b)) => a == b,
            (NbtTag::Float(a), NbtTag::Float(b)) => a.to_bits() == b.to_bits(),
            (NbtTag::Double(a), NbtTag::Double(b)) => a.to_bits() == b.to_bits(),
            (NbtTag::ByteArray(a), NbtTag::ByteArray(b)) => a == b,
            (NbtTag::String(a), NbtTag::String(b)) => a == b,
            (NbtTag::List(a), NbtTag::List(b)) => a == b,
            (NbtTag::Compound(a), NbtTag::Compound(b)) => a == b,
            (NbtTag::IntArray(a), NbtTag::IntArray(b)) => a == b,
            (NbtTag::LongArray(a), NbtTag::LongArray(b)) => a == b,
            _ => false,
        }
    }
}

// Implement the from trait for all the tag's internal types
macro_rules! tag_from {
    ($($type:ty, $tag:ident);*) => {
        $(
            impl From<$type> for NbtTag {
                fn from(value: $type) -> NbtTag {
                    NbtTag::$tag(value)
                }
            }
        )*
    };
}

tag_from!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    String, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    Vec<i64>, LongArray
);

impl From<&str> for NbtTag {
    fn from(value: &str) -> NbtTag {
        NbtTag::String(value.to_owned())
    }
}

impl From<&String> for NbtTag {
    fn from(value: &String) -> NbtTag {
        NbtTag::String(value.clone())
    }
}

impl From<bool> for NbtTag {
    fn from(value: bool) -> NbtTag {
        NbtTag::Byte(if value { 1 } else { 0 })
    }
}

impl From<u8> for NbtTag {
    fn from(value: u8) -> Self {
        NbtTag::Byte(value as i8)
    }
}

impl From<Vec<u8>> for NbtTag {
    fn from(value: Vec<u8>) -> Self {
        NbtTag::ByteArray(raw::cast_byte_buf_to_signed(value))
    }
}

macro_rules! prim_from_tag {
    ($($type:ty, $tag:ident);*) => {
        $(
            impl TryFrom<&NbtTag> for $type {
                type Error = NbtStructureError;

                fn try_from(tag: &NbtTag) -> Result<Self, Self::Error> {
                    if let NbtTag::$tag(value) = tag {
                        Ok(*value)
                    } else {
                        Err(NbtStructureError::type_mismatch(stringify!($tag), tag.tag_name()))
                    }
                }
            }
        )*
    };
}

prim_from_tag!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double
);

impl TryFrom<&NbtTag> for bool {
    type Error = NbtStructureError;

    fn try_from(tag: &NbtTag) -> Result<Self, Self::Error> {
        match tag {
            &NbtTag::Byte(value) => Ok(value != 0),
            &NbtTag::Short(value) => Ok(value != 0),
            &NbtTag::Int(value) => Ok(value != 0),
            &NbtTag::Long(value) => Ok(value != 0),
            _ => Err(NbtStructureError::type_mismatch(
                "Byte, Short, Int, or Long",
                tag.tag_name(),
            )),
        }
    }
}

impl TryFrom<&NbtTag> for u8 {
    type Error = NbtStructureError;

    fn try_from(tag: &NbtTag) -> Result<Self, Self::Error> {
        match tag {
            &NbtTag::Byte(value) => Ok(value as u8),
            _ => Err(NbtStructureError::type_mismatch("Byte", tag.tag_name())),
        }
    }
}

macro_rules! ref_from_tag {
    ($($type:ty, $tag:ident);*) => {
        $(
            impl<'a> TryFrom<&'a NbtTag> for &'a $type {
                type Error = NbtStructureError;

                fn try_from(tag: &'a NbtTag) -> Result<Self, Self::Error> {
                    if let NbtTag::$tag(value) = tag {
                        Ok(value)
                    } else {
                        Err(NbtStructureError::type_mismatch(stringify!($tag), tag.tag_name()))
                    }
                }
            }

            impl<'a> TryFrom<&'a mut NbtTag> for &'a mut $type {
                type Error = NbtStructureError;

                fn try_from(tag: &'a mut NbtTag) -> Result<Self, Self::Error> {
                    if let NbtTag::$tag(value) = tag {
                        Ok(value)
                    } else {
                        Err(NbtStructureError::type_mismatch(stringify!($tag), tag.tag_name()))
                    }
                }
            }
        )*
    };
}

ref_from_tag!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    [i8], ByteArray;
    String, String;
    str, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    [i32], IntArray;
    Vec<i64>, LongArray;
    [i64], LongArray
);

impl<'a> TryFrom<&'a NbtTag> for &'a [u8] {
    type Error = NbtStructureError;

    fn try_from(tag: &'a NbtTag) -> Result<Self, Self::Error> {
        if let NbtTag::ByteArray(value) = tag {
            Ok(raw::cast_bytes_to_unsigned(value.as_slice()))
        } else {
            Err(NbtStructureError::type_mismatch(
                "ByteArray",
                tag.tag_name(),
            ))
        }
    }
}

macro_rules! from_tag {
    ($($type:ty, $tag:ident);*) => {
        $(
            impl TryFrom<NbtTag> for $type {
                type Error = NbtStructureError;

                fn try_from(tag: NbtTag) -> Result<Self, Self::Error> {
                    if let NbtTag::$tag(value) = tag {
                        Ok(value)
                    } else {
                        Err(NbtStructureError::type_mismatch(stringify!($tag), tag.tag_name()))
                    }
                }
            }
        )*
    };
}

from_tag!(
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    String, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    Vec<i64>, LongArray
);

impl TryFrom<NbtTag> for Vec<u8> {
    type Error = NbtStructureError;

    fn try_from(tag: NbtTag) -> Result<Self, Self::Error> {
        if let NbtTag::ByteArray(value) = tag {
            Ok(raw::cast_byte_buf_to_unsigned(value))
        } else {
            Err(NbtStructureError::type_mismatch(
                "ByteArray",
                tag.tag_name(),
            ))
        }
    }
}

/// A rust type which always converts into a tag of the same kind, and can therefore be collected into an
/// [`NbtList`] without checking each element.
pub trait ListElement: Into<NbtTag> {
    /// The kind of tag this type converts into.
    const KIND: TagKind;
}

macro_rules! list_element {
    ($($type:ty, $kind:ident);*) => {
        $(
            impl ListElement for $type {
                const KIND: TagKind = TagKind::$kind;
            }
        )*
    };
}

list_element!(
    bool, Byte;
    u8, Byte;
    i8, Byte;
    i16, Short;
    i32, Int;
    i64, Long;
    f32, Float;
    f64, Double;
    Vec<i8>, ByteArray;
    Vec<u8>, ByteArray;
    String, String;
    &str, String;
    &String, String;
    NbtList, List;
    NbtCompound, Compound;
    Vec<i32>, IntArray;
    Vec<i64>, LongArray
);

/// The NBT tag list type: a vec of unnamed tags which all share the same kind.
///
/// The element kind of a list is fixed by the first element inserted into it (or up front with
/// [`of_kind`](NbtList::of_kind)), and from then on every insertion of a tag with a different kind fails
/// with an [`NbtStructureError`]. Removing elements never resets the element kind. A list created with
/// [`new`](NbtList::new) and never filled has no element kind, and cannot be written until it has one.
///
/// ```
/// # use nbt_codec::*;
/// let mut list = NbtList::new();
/// assert_eq!(list.element_kind(), None);
///
/// list.push(1i32).unwrap();
/// list.push(2i32).unwrap();
/// assert_eq!(list.element_kind(), Some(TagKind::Int));
/// assert!(list.push("three").is_err());
/// assert_eq!(list.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NbtList {
    kind: Option<TagKind>,
    tags: Vec<NbtTag>,
}

impl NbtList {
    /// Returns a new, empty NBT tag list with no element kind.
    pub const fn new() -> Self {
        NbtList {
            kind: None,
            tags: Vec::new(),
        }
    }

    /// Returns a new, empty NBT tag list whose element kind is already fixed.
    ///
    /// Passing [`TagKind::End`] yields the placeholder used for empty lists on the wire: such a list is
    /// written with an `End` element kind, and adopts the kind of the first element pushed into it.
    pub const fn of_kind(kind: TagKind) -> Self {
        NbtList {
            kind: Some(kind),
            tags: Vec::new(),
        }
    }

    /// Returns a new NBT tag list with no element kind and the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        NbtList {
            kind: None,
            tags: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn with_kind_and_capacity(kind: TagKind, capacity: usize) -> Self {
        NbtList {
            kind: Some(kind),
            tags: Vec::with_capacity(capacity),
        }
    }

    /// Builds a list from arbitrary tags, failing if they are not all of the same kind.
    ///
    /// ```
    /// # use nbt_codec::*;
    /// assert!(NbtList::try_from_tags(vec![NbtTag::Int(1), NbtTag::Int(2)]).is_ok());
    /// assert!(NbtList::try_from_tags(vec![NbtTag::Int(1), NbtTag::Long(2)]).is_err());
    /// assert_eq!(NbtList::try_from_tags(Vec::new()).unwrap().element_kind(), None);
    /// ```
    pub fn try_from_tags(tags: Vec<NbtTag>) -> Result<Self, NbtStructureError> {
        let kind = match tags.first() {
            Some(first) => first.kind(),
            None => return Ok(NbtList::new()),
        };

        if let Some(stray) = tags.iter().find(|tag| tag.kind() != kind) {
            return Err(NbtStructureError::heterogeneous_list(kind, stray.kind()));
        }

        Ok(NbtList {
            kind: Some(kind),
            tags,
        })
    }

    /// Clones the data in the given list and converts it into an [`NbtList`].
    ///
    /// ```
    /// # use nbt_codec::NbtList;
    /// let list: Vec<i32> = vec![1, 2, 3];
    /// let nbt_list = NbtList::clone_from(&list);
    /// assert_eq!(nbt_list.iter_map::<i32>().flatten().collect::<Vec<i32>>(), list);
    /// ```
    pub fn clone_from<'a, T, L>(list: L) -> Self
    where
        T: Clone + ListElement + 'a,
        L: IntoIterator<Item = &'a T>,
    {
        NbtList {
            kind: Some(T::KIND),
            tags: list.into_iter().map(|x| x.clone().into()).collect(),
        }
    }

    /// Returns the element kind of this list, or `None` if it has not been fixed yet.
    #[inline]
    pub fn element_kind(&self) -> Option<TagKind> {
        self.kind
    }

    /// Returns the internal vector of this NBT list.
    pub fn into_inner(self) -> Vec<NbtTag> {
        self.tags
    }

    /// Returns an iterator over the tags in this list.
    pub fn iter(&self) -> std::slice::Iter<'_, NbtTag> {
        self.tags.iter()
    }

    /// Iterates over this tag list, converting each tag reference into the specified type.
    ///
    /// ```
    /// # use nbt_codec::NbtList;
    /// let list = NbtList::from(vec![0i32, 1, 2]);
    ///
    /// let mut iter = list.iter_map::<i32>();
    /// assert!(matches!(iter.next(), Some(Ok(0i32))));
    /// assert!(matches!(iter.next(), Some(Ok(1i32))));
    /// assert!(matches!(iter.next(), Some(Ok(2i32))));
    /// assert!(iter.next().is_none());
    ///
    /// assert!(list.iter_map::<f64>().all(|x| x.is_err()));
    /// ```
    pub fn iter_map<'a, T: TryFrom<&'a NbtTag>>(
        &'a self,
    ) -> impl Iterator<Item = Result<T, <T as TryFrom<&'a NbtTag>>::Error>> + 'a {
        self.tags.iter().map(|tag| T::try_from(tag))
    }

    /// Iterates over mutable references to the values in this list, converting each tag reference into
    /// the specified type. Only conversions which preserve the kind of the element are available.
    pub fn iter_mut_map<'a, T>(&'a mut self) -> impl Iterator<Item = Result<T, NbtStructureError>> + 'a
    where T: TryFrom<&'a mut NbtTag, Error = NbtStructureError> + 'a {
        self.tags.iter_mut().map(|tag| T::try_from(tag))
    }

    /// Returns the length of this list.
    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if this tag list has a length of zero, false otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Returns the value of the tag at the given index, or an error if the index is out of bounds or the
    /// the tag type does not match the type specified.
    ///
    /// ```
    /// # use nbt_codec::*;
    /// let list = NbtList::from(vec![1i32, 2, 3]);
    ///
    /// assert!(matches!(list.get::<i32>(0), Ok(1)));
    /// assert!(list.get::<f64>(0).is_err()); // Type mismatch
    /// assert!(list.get::<i32>(10).is_err()); // Invalid index
    /// ```
    pub fn get<'a, T>(&'a self, index: usize) -> Result<T, NbtStructureError>
    where
        T: TryFrom<&'a NbtTag>,
        T::Error: Into<NbtStructureError>,
    {
        T::try_from(
            self.tags
                .get(index)
                .ok_or_else(|| NbtStructureError::invalid_index(index, self.len()))?,
        )
        .map_err(Into::into)
    }

    /// Returns a mutable reference to the value at the given index, or an error if the index is out of
    /// bounds or the tag type does not match the type specified.
    ///
    /// Only references which cannot change the kind of the element are handed out. To swap an element for
    /// another tag, use [`replace`](NbtList::replace).
    ///
    /// ```
    /// # use nbt_codec::*;
    /// let mut list = NbtList::from(vec![1i32, 2, 3]);
    ///
    /// *list.get_mut::<&mut i32>(0).unwrap() += 1;
    ///
    /// assert!(matches!(list.get::<i32>(0), Ok(2)));
    /// ```
    pub fn get_mut<'a, T>(&'a mut self, index: usize) -> Result<T, NbtStructureError>
    where T: TryFrom<&'a mut NbtTag, Error = NbtStructureError> {
        let len = self.len();
        T::try_from(
            self.tags
                .get_mut(index)
                .ok_or_else(|| NbtStructureError::invalid_index(index, len))?,
        )
    }

    fn adopt_kind(&mut self, kind: TagKind) -> Result<(), NbtStructureError> {
        match self.kind {
            // The End placeholder only ever describes an empty list
            None | Some(TagKind::End) => {
                self.kind = Some(kind);
                Ok(())
            }
            Some(expected) if expected == kind => Ok(()),
            Some(expected) => Err(NbtStructureError::heterogeneous_list(expected, kind)),
        }
    }

    /// Pushes the given value to the back of the list after wrapping it in an `NbtTag`, failing if its
    /// kind differs from the element kind of this list.
    pub fn push<T: Into<NbtTag>>(&mut self, value: T) -> Result<(), NbtStructureError> {
        let tag = value.into();
        self.adopt_kind(tag.kind())?;
        self.tags.push(tag);
        Ok(())
    }

    /// Pushes a detached named tag into this list. List elements are unnamed, so the tag must not carry a
    /// name.
    ///
    /// ```
    /// # use nbt_codec::*;
    /// let mut list = NbtList::new();
    /// assert!(list.push_named(NamedTag::unnamed(5i16)).is_ok());
    /// assert!(list.push_named(NamedTag::new("five", 5i16)).is_err());
    /// ```
    pub fn push_named(&mut self, tag: NamedTag) -> Result<(), NbtStructureError> {
        let (name, tag) = tag.into_parts();
        if let Some(name) = name {
            return Err(NbtStructureError::named_list_element(name));
        }

        self.push(tag)
    }

    /// Inserts the given value at the given index, shifting later elements back.
    pub fn insert<T: Into<NbtTag>>(&mut self, index: usize, value: T) -> Result<(), NbtStructureError> {
        if index > self.len() {
            return Err(NbtStructureError::invalid_index(index, self.len()));
        }

        let tag = value.into();
        self.adopt_kind(tag.kind())?;
        self.tags.insert(index, tag);
        Ok(())
    }

    /// Replaces the element at the given index with a tag of the same kind, returning the old element.
    pub fn replace<T: Into<NbtTag>>(
        &mut self,
        index: usize,
        value: T,
    ) -> Result<NbtTag, NbtStructureError> {
        let len = self.len();
        let tag = value.into();
        // A non-empty list always has a fixed element kind
        if let Some(expected) = self.kind {
            if expected != tag.kind() {
                return Err(NbtStructureError::heterogeneous_list(expected, tag.kind()));
            }
        }

        let slot = self
            .tags
            .get_mut(index)
            .ok_or_else(|| NbtStructureError::invalid_index(index, len))?;
        Ok(std::mem::replace(slot, tag))
    }

    /// Removes and returns the element at the given index. The element kind of the list is retained.
    pub fn remove(&mut self, index: usize) -> Result<NbtTag, NbtStructureError> {
        if index >= self.len() {
            return Err(NbtStructureError::invalid_index(index, self.len()));
        }

        Ok(self.tags.remove(index))
    }

    /// Removes and returns the last element of this list, if any.
    pub fn pop(&mut self) -> Option<NbtTag> {
        self.tags.pop()
    }

    /// Removes every element from this list. The element kind of the list is retained.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    // Used by the decoder, which has already checked every element against the declared kind
    pub(crate) fn push_unchecked(&mut self, tag: NbtTag) {
        debug_assert_eq!(self.kind, Some(tag.kind()));
        self.tags.push(tag);
    }
}

impl Default for NbtList {
    fn default() -> Self {
        NbtList::new()
    }
}

impl<T: ListElement> From<Vec<T>> for NbtList {
    fn from(list: Vec<T>) -> Self {
        NbtList {
            kind: Some(T::KIND),
            tags: list.into_iter().map(|x| x.into()).collect(),
        }
    }
}

impl AsRef<[NbtTag]> for NbtList {
    fn as_ref(&self) -> &[NbtTag] {
        &self.tags
    }
}

impl Index<usize> for NbtList {
    type Output = NbtTag;

    fn index(&self, index: usize) -> &Self::Output {
        &self.tags[index]
    }
}

impl<'a> IntoIterator for &'a NbtList {
    type IntoIter = std::slice::Iter<'a, NbtTag>;
    type Item = &'a NbtTag;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

/// The NBT tag compound type, a wrapper around an insertion-ordered map of names to tags.
///
/// Children are written back in the order they were inserted, but that order carries no meaning
/// otherwise: two compounds are equal when they hold the same named tags in any order. Names are unique
/// within a compound, and inserting a tag under a name which is already present replaces the old tag in
/// place.
///
/// ```
/// # use nbt_codec::*;
/// let mut compound = NbtCompound::new();
/// compound.insert("a", 1i32);
/// compound.insert("b", 2i32);
/// assert_eq!(compound.insert("a", 3i32), Some(NbtTag::Int(1)));
///
/// let names: Vec<&str> = compound.iter().map(|(name, _)| name).collect();
/// assert_eq!(names, ["a", "b"]);
/// assert!(matches!(compound.get::<_, i32>("a"), Ok(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NbtCompound(pub(crate) IndexMap<String, NbtTag>);

impl NbtCompound {
    /// Returns a new NBT tag compound with an empty internal map.
    pub fn new() -> Self {
        NbtCompound(IndexMap::new())
    }

    /// Returns a new NBT tag compound with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        NbtCompound(IndexMap::with_capacity(capacity))
    }

    /// Returns a reference to the internal map of this compound.
    pub fn inner(&self) -> &IndexMap<String, NbtTag> {
        &self.0
    }

    /// Returns a mutable reference to the internal map of this compound.
    pub fn inner_mut(&mut self) -> &mut IndexMap<String, NbtTag> {
        &mut self.0
    }

    /// Returns the internal map of this NBT compound.
    pub fn into_inner(self) -> IndexMap<String, NbtTag> {
        self.0
    }

    /// Clones the data in the given map and converts it into an [`NbtCompound`].
    ///
    /// ```
    /// # use nbt_codec::NbtCompound;
    /// # use std::collections::HashMap;
    /// let mut map = HashMap::new();
    /// map.insert("foo", 10i32);
    /// map.insert("bar", -5i32);
    ///
    /// let compound = NbtCompound::clone_from(&map);
    /// assert_eq!(
    ///     compound.get::<_, i32>("foo").unwrap() + compound.get::<_, i32>("bar").unwrap(),
    ///     5i32
    /// );
    /// ```
    pub fn clone_from<'a, K, V, M>(map: &'a M) -> Self
    where
        K: Clone + Into<String> + 'a,
        V: Clone + Into<NbtTag> + 'a,
        &'a M: IntoIterator<Item = (&'a K, &'a V)>,
    {
        NbtCompound(
            map.into_iter()
                .map(|(key, value)| (key.clone().into(), value.clone().into()))
                .collect(),
        )
    }

    /// Returns an iterator over the names and tags of this compound, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NbtTag)> + '_ {
        self.0.iter().map(|(key, tag)| (key.as_str(), tag))
    }

    /// Iterates over this tag compound, converting each tag reference into the specified type. Each key is
    /// paired with the result of the attempted conversion into the specified type. The iterator will not
    /// terminate even if some conversions fail.
    pub fn iter_map<'a, T: TryFrom<&'a NbtTag>>(
        &'a self,
    ) -> impl Iterator<Item = (&'a str, Result<T, <T as TryFrom<&'a NbtTag>>::Error>)> + 'a {
        self.0
            .iter()
            .map(|(key, tag)| (key.as_str(), T::try_from(tag)))
    }

    /// Iterates over this tag compound, converting each mutable tag reference into the specified type. See
    /// [`iter_map`](crate::NbtCompound::iter_map) for details.
    pub fn iter_mut_map<'a, T: TryFrom<&'a mut NbtTag>>(
        &'a mut self,
    ) -> impl Iterator<Item = (&'a str, Result<T, <T as TryFrom<&'a mut NbtTag>>::Error>)> + 'a
    {
        self.0
            .iter_mut()
            .map(|(key, tag)| (key.as_str(), T::try_from(tag)))
    }

    /// Returns the number of tags in this compound.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the length of this compound is zero, false otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value of the tag with the given name, or an error if no tag exists with the given name
    /// or specified type. This method should be used to obtain primitives as well as shared references to
    /// lists and compounds.
    ///
    /// ```
    /// # use nbt_codec::*;
    /// let mut compound = NbtCompound::new();
    /// compound.insert("test", 1.0f64);
    ///
    /// assert!((compound.get::<_, f64>("test").unwrap() - 1.0f64).abs() < 1e-5);
    /// assert!(compound.get::<_, i32>("test").is_err()); // Type mismatch
    /// assert!(compound.get::<_, f64>("foo").is_err()); // Missing tag
    /// ```
    pub fn get<'a, 'b, K, T>(&'a self, name: &'b K) -> Result<T, NbtStructureError>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
        &'b K: Into<String>,
        T: TryFrom<&'a NbtTag>,
        T::Error: Into<NbtStructureError>,
    {
        T::try_from(
            self.0
                .get(name)
                .ok_or_else(|| NbtStructureError::missing_tag(name))?,
        )
        .map_err(Into::into)
    }

    /// Returns the value of the tag with the given name, or an error if no tag exists with the given name
    /// or specified type. This method should be used to obtain mutable references to lists and compounds.
    ///
    /// ```
    /// # use nbt_codec::*;
    /// let mut compound = NbtCompound::new();
    /// compound.insert("test", 1.0f64);
    ///
    /// *compound.get_mut::<_, &mut f64>("test").unwrap() *= 2.0;
    ///
    /// assert!((compound.get::<_, f64>("test").unwrap() - 2.0f64).abs() < 1e-5);
    /// ```
    pub fn get_mut<'a, 'b, K, T>(&'a mut self, name: &'b K) -> Result<T, NbtStructureError>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
        &'b K: Into<String>,
        T: TryFrom<&'a mut NbtTag>,
        T::Error: Into<NbtStructureError>,
    {
        T::try_from(
            self.0
                .get_mut(name)
                .ok_or_else(|| NbtStructureError::missing_tag(name))?,
        )
        .map_err(Into::into)
    }

    /// Returns the tag with the given name, if any.
    pub fn get_tag<K>(&self, name: &K) -> Option<&NbtTag>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        self.0.get(name)
    }

    /// Returns whether or not this compound has a tag with the given name.
    #[inline]
    pub fn contains_key<K>(&self, key: &K) -> bool
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        self.0.contains_key(key)
    }

    /// Adds the given value to this compound with the given name after wrapping that value in an `NbtTag`.
    /// If a tag with that name already exists, it is replaced in place and returned.
    pub fn insert<K: Into<String>, T: Into<NbtTag>>(&mut self, name: K, value: T) -> Option<NbtTag> {
        self.0.insert(name.into(), value.into())
    }

    /// Attaches a detached named tag to this compound. Compound children are always named, so the tag must
    /// carry a name.
    ///
    /// ```
    /// # use nbt_codec::*;
    /// let mut compound = NbtCompound::new();
    /// assert!(compound.insert_named(NamedTag::new("x", 1i8)).is_ok());
    /// assert!(compound.insert_named(NamedTag::unnamed(1i8)).is_err());
    /// assert_eq!(compound.len(), 1);
    /// ```
    pub fn insert_named(&mut self, tag: NamedTag) -> Result<Option<NbtTag>, NbtStructureError> {
        match tag.into_parts() {
            (Some(name), tag) => Ok(self.insert(name, tag)),
            (None, _) => Err(NbtStructureError::unnamed_compound_child()),
        }
    }

    /// Removes the tag with the given name, preserving the order of the remaining tags.
    pub fn remove<K>(&mut self, name: &K) -> Option<NbtTag>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        self.0.shift_remove(name)
    }

    /// Detaches the tag with the given name, returning it together with its name.
    ///
    /// ```
    /// # use nbt_codec::*;
    /// let mut compound = NbtCompound::new();
    /// compound.insert("x", 1i8);
    ///
    /// let detached = compound.remove_named("x").unwrap();
    /// assert_eq!(detached.name(), Some("x"));
    /// assert!(compound.is_empty());
    /// ```
    pub fn remove_named<K>(&mut self, name: &K) -> Option<NamedTag>
    where
        String: Borrow<K>,
        K: Hash + Eq + ?Sized,
    {
        self.0
            .shift_remove_entry(name)
            .map(|(name, tag)| NamedTag::new(name, tag))
    }
}

impl<'a> IntoIterator for &'a NbtCompound {
    type IntoIter = indexmap::map::Iter<'a, String, NbtTag>;
    type Item = (&'a String, &'a NbtTag);

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
