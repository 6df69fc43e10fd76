use byteorder::{ByteOrder, ReadBytesExt, WriteBytesExt};
use std::{
    borrow::Cow,
    io::{self, Error, ErrorKind, Read, Result, Write},
    mem::ManuallyDrop,
    slice,
};

// Scalars that are a single byte wide are order-independent, everything else takes the byte order
// selected by the active flavor as a type parameter so each flavor gets its own monomorphized codec.

#[inline]
pub fn read_u8<R: Read>(reader: &mut R) -> Result<u8> {
    reader.read_u8()
}

#[inline]
pub fn read_i8<R: Read>(reader: &mut R) -> Result<i8> {
    reader.read_i8()
}

#[inline]
pub fn read_i16<B: ByteOrder, R: Read>(reader: &mut R) -> Result<i16> {
    reader.read_i16::<B>()
}

#[inline]
pub fn read_u16<B: ByteOrder, R: Read>(reader: &mut R) -> Result<u16> {
    reader.read_u16::<B>()
}

#[inline]
pub fn read_i32<B: ByteOrder, R: Read>(reader: &mut R) -> Result<i32> {
    reader.read_i32::<B>()
}

#[inline]
pub fn read_i64<B: ByteOrder, R: Read>(reader: &mut R) -> Result<i64> {
    reader.read_i64::<B>()
}

#[inline]
pub fn read_f32<B: ByteOrder, R: Read>(reader: &mut R) -> Result<f32> {
    reader.read_f32::<B>()
}

#[inline]
pub fn read_f64<B: ByteOrder, R: Read>(reader: &mut R) -> Result<f64> {
    reader.read_f64::<B>()
}

/// Reads the raw bytes of a length-prefixed string without decoding them.
pub fn read_string_bytes<B: ByteOrder, R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let len = read_u16::<B, _>(reader)? as usize;
    let mut bytes = vec![0; len];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

/// Decodes string bytes read off the wire. `modified_utf8` selects Java's modified UTF-8 over plain
/// UTF-8. Returns `None` if the bytes are not valid in the selected encoding.
pub fn decode_string(bytes: Vec<u8>, modified_utf8: bool) -> Option<String> {
    if modified_utf8 {
        cesu8::from_java_cesu8(&bytes)
            .ok()
            .map(|string| string.into_owned())
    } else {
        String::from_utf8(bytes).ok()
    }
}

/// Consumes exactly `len` bytes, failing with `UnexpectedEof` if the reader runs dry first.
pub fn skip_bytes<R: Read>(reader: &mut R, len: u64) -> Result<()> {
    let skipped = io::copy(&mut reader.by_ref().take(len), &mut io::sink())?;
    if skipped < len {
        return Err(Error::new(
            ErrorKind::UnexpectedEof,
            "stream ended while skipping a value",
        ));
    }

    Ok(())
}

/// Consumes a length-prefixed string without decoding it.
pub fn skip_string<B: ByteOrder, R: Read>(reader: &mut R) -> Result<()> {
    let len = read_u16::<B, _>(reader)?;
    skip_bytes(reader, len as u64)
}

#[inline]
pub fn write_u8<W: Write>(writer: &mut W, value: u8) -> Result<()> {
    writer.write_u8(value)
}

#[inline]
pub fn write_i8<W: Write>(writer: &mut W, value: i8) -> Result<()> {
    writer.write_i8(value)
}

#[inline]
pub fn write_i16<B: ByteOrder, W: Write>(writer: &mut W, value: i16) -> Result<()> {
    writer.write_i16::<B>(value)
}

#[inline]
pub fn write_u16<B: ByteOrder, W: Write>(writer: &mut W, value: u16) -> Result<()> {
    writer.write_u16::<B>(value)
}

#[inline]
pub fn write_i32<B: ByteOrder, W: Write>(writer: &mut W, value: i32) -> Result<()> {
    writer.write_i32::<B>(value)
}

#[inline]
pub fn write_i64<B: ByteOrder, W: Write>(writer: &mut W, value: i64) -> Result<()> {
    writer.write_i64::<B>(value)
}

#[inline]
pub fn write_f32<B: ByteOrder, W: Write>(writer: &mut W, value: f32) -> Result<()> {
    writer.write_f32::<B>(value)
}

#[inline]
pub fn write_f64<B: ByteOrder, W: Write>(writer: &mut W, value: f64) -> Result<()> {
    writer.write_f64::<B>(value)
}

/// Encodes a string into its on-the-wire byte form without the length prefix.
pub fn encode_string(string: &str, modified_utf8: bool) -> Cow<'_, [u8]> {
    if modified_utf8 {
        cesu8::to_java_cesu8(string)
    } else {
        Cow::Borrowed(string.as_bytes())
    }
}

/// Writes an already-encoded string with its length prefix. The caller guarantees the length fits
/// in a `u16`.
pub fn write_encoded_string<B: ByteOrder, W: Write>(writer: &mut W, bytes: &[u8]) -> Result<()> {
    write_u16::<B, _>(writer, bytes.len() as u16)?;
    writer.write_all(bytes)
}

#[inline]
pub fn cast_byte_buf_to_signed(buf: Vec<u8>) -> Vec<i8> {
    let mut me = ManuallyDrop::new(buf);
    // Pointer cast is valid because i8 and u8 have the same layout
    let ptr = me.as_mut_ptr() as *mut i8;
    let length = me.len();
    let capacity = me.capacity();

    // Safety
    // * `ptr` was allocated by a Vec
    // * i8 has the same size and alignment as u8
    // * `length` and `capacity` came from a valid Vec
    unsafe { Vec::from_raw_parts(ptr, length, capacity) }
}

#[inline]
pub fn cast_byte_buf_to_unsigned(buf: Vec<i8>) -> Vec<u8> {
    let mut me = ManuallyDrop::new(buf);
    let ptr = me.as_mut_ptr() as *mut u8;
    let length = me.len();
    let capacity = me.capacity();

    // Safety: see `cast_byte_buf_to_signed`
    unsafe { Vec::from_raw_parts(ptr, length, capacity) }
}

#[inline]
pub fn cast_bytes_to_unsigned(bytes: &[i8]) -> &[u8] {
    // Safety
    // * the pointer is valid for `len` bytes and comes from a single allocated slice
    // * i8 and u8 share size and alignment
    // * the returned slice borrows from `bytes`, so it cannot outlive the data
    unsafe { slice::from_raw_parts(bytes.as_ptr() as *const u8, bytes.len()) }
}
