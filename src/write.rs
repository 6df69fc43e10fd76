use crate::{
    io::{NbtIoError, PathSegment},
    raw,
    Flavor,
    NbtList,
    NbtRoot,
    NbtTag,
    TagKind,
};
use byteorder::ByteOrder;
use std::{io::Write, marker::PhantomData};

pub(crate) struct Encoder<'a, B, W> {
    writer: &'a mut W,
    modified_utf8: bool,
    // Filled innermost first, and only while an error propagates
    path: Vec<PathSegment>,
    _order: PhantomData<B>,
}

impl<'a, B, W> Encoder<'a, B, W>
where
    B: ByteOrder,
    W: Write,
{
    pub(crate) fn new(writer: &'a mut W, flavor: Flavor) -> Self {
        Encoder {
            writer,
            modified_utf8: flavor.modified_utf8,
            path: Vec::new(),
            _order: PhantomData,
        }
    }

    /// Writes a complete document. The caller must have checked the root against the flavor.
    pub(crate) fn write_root(mut self, root: &NbtRoot) -> Result<(), NbtIoError> {
        let result = self.write_root_inner(root);
        result.map_err(|error| {
            self.path.reverse();
            NbtIoError::with_path(error, self.path)
        })
    }

    fn write_root_inner(&mut self, root: &NbtRoot) -> Result<(), NbtIoError> {
        raw::write_u8(self.writer, root.tag().kind().id())?;
        // A validated root carries a name exactly when the flavor wants one
        if let Some(name) = root.name() {
            self.write_string(name)?;
        }

        self.payload(root.tag())
    }

    fn write_string(&mut self, string: &str) -> Result<(), NbtIoError> {
        let bytes = raw::encode_string(string, self.modified_utf8);
        if bytes.len() > u16::MAX as usize {
            return Err(NbtIoError::StringTooLong(bytes.len()));
        }

        raw::write_encoded_string::<B, _>(self.writer, &bytes)?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<(), NbtIoError> {
        if len > i32::MAX as usize {
            return Err(NbtIoError::SequenceTooLong(len));
        }

        raw::write_i32::<B, _>(self.writer, len as i32)?;
        Ok(())
    }

    fn write_list(&mut self, list: &NbtList) -> Result<(), NbtIoError> {
        let element_kind = list
            .element_kind()
            .ok_or(NbtIoError::IndeterminateListType)?;

        raw::write_u8(self.writer, element_kind.id())?;
        self.write_len(list.len())?;

        for (index, element) in list.iter().enumerate() {
            debug_assert_eq!(element.kind(), element_kind);

            self.payload(element).map_err(|error| {
                self.path.push(PathSegment::Index(index));
                error
            })?;
        }

        Ok(())
    }

    fn payload(&mut self, tag: &NbtTag) -> Result<(), NbtIoError> {
        match tag {
            &NbtTag::Byte(value) => raw::write_i8(self.writer, value)?,
            &NbtTag::Short(value) => raw::write_i16::<B, _>(self.writer, value)?,
            &NbtTag::Int(value) => raw::write_i32::<B, _>(self.writer, value)?,
            &NbtTag::Long(value) => raw::write_i64::<B, _>(self.writer, value)?,
            &NbtTag::Float(value) => raw::write_f32::<B, _>(self.writer, value)?,
            &NbtTag::Double(value) => raw::write_f64::<B, _>(self.writer, value)?,
            NbtTag::ByteArray(value) => {
                self.write_len(value.len())?;
                self.writer
                    .write_all(raw::cast_bytes_to_unsigned(value.as_slice()))?;
            }
            NbtTag::String(value) => self.write_string(value)?,
            NbtTag::List(value) => self.write_list(value)?,
            NbtTag::Compound(value) => {
                for (name, tag) in value.inner() {
                    raw::write_u8(self.writer, tag.kind().id())?;
                    self.write_string(name)?;

                    self.payload(tag).map_err(|error| {
                        self.path.push(PathSegment::Name(name.clone()));
                        error
                    })?;
                }

                raw::write_u8(self.writer, TagKind::End.id())?;
            }
            NbtTag::IntArray(value) => {
                self.write_len(value.len())?;

                for &int in value.iter() {
                    raw::write_i32::<B, _>(self.writer, int)?;
                }
            }
            NbtTag::LongArray(value) => {
                self.write_len(value.len())?;

                for &long in value.iter() {
                    raw::write_i64::<B, _>(self.writer, long)?;
                }
            }
        }

        Ok(())
    }
}
