use crate::{
    io::{NbtIoError, PathSegment, MAX_DEPTH},
    raw,
    Flavor,
    NbtCompound,
    NbtList,
    NbtRoot,
    NbtTag,
    TagKind,
};
use byteorder::ByteOrder;
use std::{convert::TryFrom, io::Read, marker::PhantomData};
use tracing::trace;

/// Decides which compound children are materialized during a selective read.
///
/// The selector is consulted once for every child of every compound that is being materialized, before
/// the child's payload is read. Children it declines are still consumed from the stream, so the reader
/// stays correctly positioned, but no tags are built for them. The root tag is always materialized.
///
/// Any `FnMut(TagKind, &str) -> bool` closure is a selector.
pub trait Selector {
    /// Returns whether the compound child of the given kind and name should be materialized.
    fn select(&mut self, kind: TagKind, name: &str) -> bool;
}

impl<F> Selector for F
where F: FnMut(TagKind, &str) -> bool
{
    #[inline]
    fn select(&mut self, kind: TagKind, name: &str) -> bool {
        self(kind, name)
    }
}

/// A selector which materializes every tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectAll;

impl Selector for SelectAll {
    #[inline]
    fn select(&mut self, _kind: TagKind, _name: &str) -> bool {
        true
    }
}

// Lists and arrays are filled as they are read, so a bogus length in a corrupt stream cannot force a huge
// allocation up front
const MAX_PREALLOCATION: usize = 4096;

pub(crate) struct Decoder<'a, B, R, S> {
    reader: &'a mut R,
    modified_utf8: bool,
    selector: S,
    // The chain of children leading to the tag currently being read. On failure it is left in place and
    // describes where the failure occurred.
    path: Vec<PathSegment>,
    // Compounds and lists currently open, including ones being skipped
    depth: usize,
    _order: PhantomData<B>,
}

impl<'a, B, R, S> Decoder<'a, B, R, S>
where
    B: ByteOrder,
    R: Read,
    S: Selector,
{
    pub(crate) fn new(reader: &'a mut R, flavor: Flavor, selector: S) -> Self {
        Decoder {
            reader,
            modified_utf8: flavor.modified_utf8,
            selector,
            path: Vec::new(),
            depth: 0,
            _order: PhantomData,
        }
    }

    /// Reads a complete document, wrapping any failure in the path at which it occurred.
    pub(crate) fn read_root(mut self, flavor: Flavor) -> Result<NbtRoot, NbtIoError> {
        let result = self.read_root_inner(flavor);
        result.map_err(|error| NbtIoError::with_path(error, self.path))
    }

    fn read_root_inner(&mut self, flavor: Flavor) -> Result<NbtRoot, NbtIoError> {
        let (kind, name) = self.read_root_header(flavor)?;
        match self.payload(kind, true)? {
            Some(tag) => Ok(NbtRoot::from_parts_unchecked(name, tag)),
            // Only reachable if `payload` ignored the request to materialize
            None => Err(NbtIoError::InvalidRootTag(kind.id())),
        }
    }

    /// Reads the root kind and, for named-root flavors, the root name.
    pub(crate) fn read_root_header(
        &mut self,
        flavor: Flavor,
    ) -> Result<(TagKind, Option<String>), NbtIoError> {
        let root_id = raw::read_u8(self.reader)?;
        let kind = match TagKind::try_from(root_id) {
            Ok(kind) if flavor.accepts_root_kind(kind) => kind,
            _ => return Err(NbtIoError::InvalidRootTag(root_id)),
        };

        let name = if flavor.unnamed_root {
            None
        } else {
            Some(self.read_string()?)
        };

        Ok((kind, name))
    }

    fn read_string(&mut self) -> Result<String, NbtIoError> {
        let bytes = raw::read_string_bytes::<B, _>(self.reader)?;
        raw::decode_string(bytes, self.modified_utf8).ok_or(NbtIoError::InvalidString)
    }

    fn read_len(&mut self) -> Result<usize, NbtIoError> {
        let len = raw::read_i32::<B, _>(self.reader)?;
        if len < 0 {
            return Err(NbtIoError::NegativeLength(len));
        }

        Ok(len as usize)
    }

    fn enter_nested(&mut self) -> Result<(), NbtIoError> {
        if self.depth >= MAX_DEPTH {
            return Err(NbtIoError::ExceedsMaxDepth);
        }

        self.depth += 1;
        Ok(())
    }

    fn read_kind(&mut self) -> Result<TagKind, NbtIoError> {
        let id = raw::read_u8(self.reader)?;
        TagKind::try_from(id).map_err(NbtIoError::InvalidTagId)
    }

    /// Consumes the payload of a tag of the given kind. When `keep` is false, the bytes are consumed and
    /// discarded and `None` is returned; otherwise the decoded tag is returned. Both modes go through the
    /// same match so that skipping always consumes exactly what reading would.
    fn payload(&mut self, kind: TagKind, keep: bool) -> Result<Option<NbtTag>, NbtIoError> {
        let tag = match kind {
            TagKind::End => return Err(NbtIoError::InvalidTagId(kind.id())),
            TagKind::Byte => NbtTag::Byte(raw::read_i8(self.reader)?),
            TagKind::Short => NbtTag::Short(raw::read_i16::<B, _>(self.reader)?),
            TagKind::Int => NbtTag::Int(raw::read_i32::<B, _>(self.reader)?),
            TagKind::Long => NbtTag::Long(raw::read_i64::<B, _>(self.reader)?),
            TagKind::Float => NbtTag::Float(raw::read_f32::<B, _>(self.reader)?),
            TagKind::Double => NbtTag::Double(raw::read_f64::<B, _>(self.reader)?),
            TagKind::ByteArray => {
                let len = self.read_len()?;
                if !keep {
                    raw::skip_bytes(self.reader, len as u64)?;
                    return Ok(None);
                }

                let mut array = Vec::with_capacity(len.min(MAX_PREALLOCATION));
                let read = self.reader.by_ref().take(len as u64).read_to_end(&mut array)?;
                if read < len {
                    return Err(NbtIoError::UnexpectedEof);
                }

                NbtTag::ByteArray(raw::cast_byte_buf_to_signed(array))
            }
            TagKind::String => {
                if !keep {
                    raw::skip_string::<B, _>(self.reader)?;
                    return Ok(None);
                }

                NbtTag::String(self.read_string()?)
            }
            TagKind::List => {
                self.enter_nested()?;
                let element_kind = self.read_kind()?;
                let len = self.read_len()?;

                // Only an empty list may declare End as its element kind
                if element_kind == TagKind::End && len > 0 {
                    return Err(NbtIoError::InvalidListType(element_kind.id()));
                }

                let mut list = if keep {
                    Some(NbtList::with_kind_and_capacity(
                        element_kind,
                        len.min(MAX_PREALLOCATION),
                    ))
                } else {
                    None
                };

                for index in 0 .. len {
                    self.path.push(PathSegment::Index(index));
                    let element = self.payload(element_kind, keep)?;
                    self.path.pop();

                    if let (Some(list), Some(element)) = (list.as_mut(), element) {
                        list.push_unchecked(element);
                    }
                }
                self.depth -= 1;

                match list {
                    Some(list) => NbtTag::List(list),
                    None => return Ok(None),
                }
            }
            TagKind::Compound => {
                self.enter_nested()?;
                let mut compound = if keep { Some(NbtCompound::new()) } else { None };

                loop {
                    let child_kind = self.read_kind()?;
                    if child_kind == TagKind::End {
                        break;
                    }

                    let compound = match compound.as_mut() {
                        Some(compound) => compound,
                        // The children of a skipped compound are skipped without decoding their names
                        None => {
                            raw::skip_string::<B, _>(self.reader)?;
                            self.payload(child_kind, false)?;
                            continue;
                        }
                    };

                    let name = self.read_string()?;
                    let keep_child = self.selector.select(child_kind, &name);
                    if !keep_child {
                        trace!(kind = %child_kind, name = %name, "skipping compound child");
                    }

                    self.path.push(PathSegment::Name(name));
                    let child = self.payload(child_kind, keep_child)?;
                    let name = match self.path.pop() {
                        Some(PathSegment::Name(name)) => name,
                        _ => unreachable!("decoder path out of sync"),
                    };

                    if let Some(child) = child {
                        // Later duplicates overwrite earlier ones
                        compound.insert(name, child);
                    }
                }
                self.depth -= 1;

                match compound {
                    Some(compound) => NbtTag::Compound(compound),
                    None => return Ok(None),
                }
            }
            TagKind::IntArray => {
                let len = self.read_len()?;
                if !keep {
                    raw::skip_bytes(self.reader, len as u64 * 4)?;
                    return Ok(None);
                }

                let mut array = Vec::with_capacity(len.min(MAX_PREALLOCATION));
                for _ in 0 .. len {
                    array.push(raw::read_i32::<B, _>(self.reader)?);
                }

                NbtTag::IntArray(array)
            }
            TagKind::LongArray => {
                let len = self.read_len()?;
                if !keep {
                    raw::skip_bytes(self.reader, len as u64 * 8)?;
                    return Ok(None);
                }

                let mut array = Vec::with_capacity(len.min(MAX_PREALLOCATION));
                for _ in 0 .. len {
                    array.push(raw::read_i64::<B, _>(self.reader)?);
                }

                NbtTag::LongArray(array)
            }
        };

        Ok(if keep { Some(tag) } else { None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::BigEndian;
    use std::io::Cursor;

    fn decode(bytes: &[u8], flavor: Flavor) -> Result<NbtRoot, NbtIoError> {
        let mut cursor = Cursor::new(bytes);
        Decoder::<BigEndian, _, _>::new(&mut cursor, flavor, SelectAll).read_root(flavor)
    }

    #[test]
    fn empty_end_list_is_placeholder() {
        let bytes = [0x0A, 0, 0, 0x09, 0, 1, b'l', 0x00, 0, 0, 0, 0, 0x00];
        let root = decode(&bytes, Flavor::DEFAULT).unwrap();
        let list = root.as_compound().unwrap().get::<_, &NbtList>("l").unwrap();

        assert!(list.is_empty());
        assert_eq!(list.element_kind(), Some(TagKind::End));
    }

    #[test]
    fn non_empty_end_list_is_rejected() {
        let bytes = [0x0A, 0, 0, 0x09, 0, 1, b'l', 0x00, 0, 0, 0, 1, 0x00];
        let error = decode(&bytes, Flavor::DEFAULT).unwrap_err();
        assert!(matches!(error.root_cause(), NbtIoError::InvalidListType(0)));
    }

    #[test]
    fn negative_length_is_rejected() {
        let bytes = [0x0A, 0, 0, 0x0B, 0, 1, b'a', 0xFF, 0xFF, 0xFF, 0xFF, 0x00];
        let error = decode(&bytes, Flavor::DEFAULT).unwrap_err();
        assert!(matches!(error.root_cause(), NbtIoError::NegativeLength(-1)));
    }

    #[test]
    fn unknown_child_kind_reports_path() {
        let bytes = [0x0A, 0, 0, 0x0A, 0, 1, b'c', 0x0F, 0, 1, b'x'];
        let error = decode(&bytes, Flavor::DEFAULT).unwrap_err();

        assert!(matches!(error.root_cause(), NbtIoError::InvalidTagId(0x0F)));
        assert_eq!(error.path(), Some("c"));
    }

    // A root compound holding a single list nested `lists` deep
    fn nested_lists(lists: usize) -> Vec<u8> {
        let mut bytes = vec![0x0A, 0, 0, 0x09, 0, 1, b'l'];
        for _ in 1 .. lists {
            bytes.extend_from_slice(&[0x09, 0, 0, 0, 1]);
        }
        bytes.extend_from_slice(&[0x01, 0, 0, 0, 0, 0x00]);
        bytes
    }

    #[test]
    fn nesting_limit() {
        assert!(decode(&nested_lists(MAX_DEPTH - 1), Flavor::DEFAULT).is_ok());

        let error = decode(&nested_lists(MAX_DEPTH), Flavor::DEFAULT).unwrap_err();
        assert!(matches!(error.root_cause(), NbtIoError::ExceedsMaxDepth));
        assert_eq!(error.path().map(|path| path.matches('[').count()), Some(MAX_DEPTH - 1));
    }

    #[test]
    fn root_kind_must_match_flavor() {
        let list_root = [0x09, 0, 0, 0x03, 0, 0, 0, 1, 0, 0, 0, 7];
        assert!(matches!(
            decode(&list_root, Flavor::DEFAULT),
            Err(NbtIoError::InvalidRootTag(0x09))
        ));

        let root = decode(&list_root, Flavor::LENIENT).unwrap();
        assert_eq!(root.as_list().unwrap().get::<i32>(0).unwrap(), 7);
    }
}
