use crate::{
    read::Decoder,
    write::Encoder,
    Flavor,
    NbtRoot,
    NbtStructureError,
};
use byteorder::{BigEndian, LittleEndian};
use flate2::{
    read::{GzDecoder, ZlibDecoder},
    write::{GzEncoder, ZlibEncoder},
    Compression,
};
use std::{
    error::Error,
    fmt::{self, Display, Formatter, Write as _},
    fs::File,
    io::{self, BufReader, BufWriter, Cursor, ErrorKind, Read, Seek, SeekFrom, Write},
    path::Path,
};
use tracing::debug;

pub use crate::read::{SelectAll, Selector};

/// The first byte of a gzip stream.
pub const GZIP_MAGIC: u8 = 0x1F;
/// The first byte of a zlib stream using deflate with a 32K window, the only zlib header accepted when
/// detecting containers.
pub const ZLIB_MAGIC: u8 = 0x78;

/// The deepest nesting of compounds and lists accepted when reading, counting the root tag as the first
/// level. Deeper documents fail with [`NbtIoError::ExceedsMaxDepth`].
pub const MAX_DEPTH: usize = 512;

/// Describes the container wrapped around raw NBT data: none, zlib or gzip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Uncompressed NBT data.
    Uncompressed,
    /// Zlib compressed NBT data. When writing, the default compression level will be used.
    ZlibCompressed,
    /// Zlib compressed NBT data with the given compression level.
    ZlibCompressedWith(Compression),
    /// Gz compressed NBT data. When writing, the default compression level will be used.
    GzCompressed,
    /// Gz compressed NBT data with the given compression level.
    GzCompressedWith(Compression),
    /// Detect the container from the first bytes of the data. Only valid when reading from a seekable
    /// source.
    Detect,
}

impl Default for Container {
    fn default() -> Self {
        Container::Detect
    }
}

/// Options for reading NBT documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// The dialect of the data.
    pub flavor: Flavor,
    /// The container wrapped around the data.
    pub container: Container,
    /// Whether to read compressed data through to the end of the container after the document, which
    /// verifies the gzip CRC-32 or zlib Adler-32 trailer.
    pub verify_checksum: bool,
    /// The buffer size used when reading files.
    pub buffer_size: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            flavor: Flavor::DEFAULT,
            container: Container::Detect,
            verify_checksum: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Options for writing NBT documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// The dialect to write.
    pub flavor: Flavor,
    /// The container to wrap around the data. [`Container::Detect`] is rejected.
    pub container: Container,
    /// The buffer size used when writing files.
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            flavor: Flavor::DEFAULT,
            container: Container::GzCompressed,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.count += read as u64;
        Ok(read)
    }
}

struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.count += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Peeks at the start of the given source to determine which container wraps the NBT data. The position
/// of the source is restored afterwards, so the data can be read from the same position.
///
/// ```
/// # use nbt_codec::io::{detect_container, Container};
/// use std::io::Cursor;
///
/// assert_eq!(detect_container(&mut Cursor::new([0x0A, 0x00])).unwrap(), Container::Uncompressed);
/// assert_eq!(detect_container(&mut Cursor::new([0x1F, 0x8B])).unwrap(), Container::GzCompressed);
/// assert_eq!(detect_container(&mut Cursor::new([0x78, 0x9C])).unwrap(), Container::ZlibCompressed);
/// assert!(detect_container(&mut Cursor::new([0xFF])).is_err());
/// ```
pub fn detect_container<R: Read + Seek>(reader: &mut R) -> Result<Container, NbtIoError> {
    let start = reader.stream_position()?;
    let mut header = [0u8; 2];
    let mut filled = 0;
    while filled < header.len() {
        match reader.read(&mut header[filled ..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) => return Err(error.into()),
        }
    }
    reader.seek(SeekFrom::Start(start))?;

    if filled == 0 {
        return Err(NbtIoError::UnexpectedEof);
    }

    let container = match header[0] {
        0x0A | 0x09 => Container::Uncompressed,
        GZIP_MAGIC => Container::GzCompressed,
        ZLIB_MAGIC => {
            if filled < 2 {
                return Err(NbtIoError::UnexpectedEof);
            }

            // RFC 1950: the header read as a big-endian u16 is a multiple of 31
            if u16::from_be_bytes(header) % 31 != 0 {
                return Err(NbtIoError::InvalidContainerHeader(header[0], header[1]));
            }

            Container::ZlibCompressed
        }
        other => return Err(NbtIoError::UnrecognizedContainer(other)),
    };

    debug!(?container, "detected NBT container");
    Ok(container)
}

/// Reads the given container and flavor of NBT data from the given reader, returning the resulting root
/// and the number of bytes consumed from the reader.
///
/// Container detection needs to look ahead in the stream, so [`Container::Detect`] is rejected here. Use
/// [`read_nbt_seekable`] or [`from_bytes`] to detect the container.
pub fn read_nbt<R: Read>(
    reader: &mut R,
    flavor: Flavor,
    container: Container,
) -> Result<(NbtRoot, u64), NbtIoError> {
    read_nbt_selective(reader, flavor, container, SelectAll)
}

/// Reads NBT data like [`read_nbt`], but only materializes the compound children accepted by the given
/// selector. See [`Selector`] for details.
///
/// ```
/// # use nbt_codec::*;
/// # use nbt_codec::io::{self, Container};
/// use std::io::Cursor;
///
/// let mut compound = NbtCompound::new();
/// compound.insert("keep", 1i32);
/// compound.insert("drop", vec![0i64; 64]);
/// let bytes = io::to_bytes(&NbtRoot::named("", compound), Flavor::DEFAULT, Container::Uncompressed)?;
///
/// let (root, read) = io::read_nbt_selective(
///     &mut Cursor::new(&bytes),
///     Flavor::DEFAULT,
///     Container::Uncompressed,
///     |_kind: TagKind, name: &str| name != "drop",
/// )?;
///
/// let compound = root.as_compound().unwrap();
/// assert!(compound.contains_key("keep"));
/// assert!(!compound.contains_key("drop"));
/// assert_eq!(read, bytes.len() as u64);
/// # Ok::<(), io::NbtIoError>(())
/// ```
pub fn read_nbt_selective<R: Read, S: Selector>(
    reader: &mut R,
    flavor: Flavor,
    container: Container,
    selector: S,
) -> Result<(NbtRoot, u64), NbtIoError> {
    let options = ReadOptions {
        flavor,
        container,
        ..ReadOptions::default()
    };
    read_nbt_with(reader, &options, selector)
}

/// Reads NBT data as described by the given options. [`Container::Detect`] is rejected, see
/// [`read_nbt`].
pub fn read_nbt_with<R: Read, S: Selector>(
    reader: &mut R,
    options: &ReadOptions,
    selector: S,
) -> Result<(NbtRoot, u64), NbtIoError> {
    let mut counter = CountingReader {
        inner: reader,
        count: 0,
    };

    let root = match options.container {
        Container::Uncompressed => decode(&mut counter, options.flavor, selector)?,
        Container::ZlibCompressed | Container::ZlibCompressedWith(_) => {
            let mut decoder = ZlibDecoder::new(&mut counter);
            let root = decode(&mut decoder, options.flavor, selector)?;
            if options.verify_checksum {
                drain(&mut decoder)?;
            }
            root
        }
        Container::GzCompressed | Container::GzCompressedWith(_) => {
            let mut decoder = GzDecoder::new(&mut counter);
            let root = decode(&mut decoder, options.flavor, selector)?;
            if options.verify_checksum {
                drain(&mut decoder)?;
            }
            root
        }
        Container::Detect => return Err(NbtIoError::DetectionUnavailable),
    };

    debug!(
        flavor = options.flavor.name,
        bytes = counter.count,
        "decoded NBT document"
    );
    Ok((root, counter.count))
}

/// Reads NBT data like [`read_nbt`], additionally supporting [`Container::Detect`].
pub fn read_nbt_seekable<R: Read + Seek>(
    reader: &mut R,
    flavor: Flavor,
    container: Container,
) -> Result<(NbtRoot, u64), NbtIoError> {
    let container = match container {
        Container::Detect => detect_container(reader)?,
        container => container,
    };

    read_nbt(reader, flavor, container)
}

/// Reads NBT data from a byte slice, supporting [`Container::Detect`].
pub fn from_bytes(
    bytes: &[u8],
    flavor: Flavor,
    container: Container,
) -> Result<(NbtRoot, u64), NbtIoError> {
    read_nbt_seekable(&mut Cursor::new(bytes), flavor, container)
}

/// Reads an NBT file as described by the given options.
pub fn read_nbt_file<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<NbtRoot, NbtIoError> {
    let mut reader = BufReader::with_capacity(options.buffer_size, File::open(path)?);
    let container = match options.container {
        Container::Detect => detect_container(&mut reader)?,
        container => container,
    };

    let options = ReadOptions {
        container,
        ..*options
    };
    read_nbt_with(&mut reader, &options, SelectAll).map(|(root, _)| root)
}

/// Reads only the kind and name of the root tag, without parsing its contents. Returns `None` for flavors
/// with unnamed roots.
pub fn read_root_name<R: Read>(
    reader: &mut R,
    flavor: Flavor,
    container: Container,
) -> Result<Option<String>, NbtIoError> {
    match container {
        Container::Uncompressed => root_name(reader, flavor),
        Container::ZlibCompressed | Container::ZlibCompressedWith(_) =>
            root_name(&mut ZlibDecoder::new(reader), flavor),
        Container::GzCompressed | Container::GzCompressedWith(_) =>
            root_name(&mut GzDecoder::new(reader), flavor),
        Container::Detect => Err(NbtIoError::DetectionUnavailable),
    }
}

fn decode<R: Read, S: Selector>(
    reader: &mut R,
    flavor: Flavor,
    selector: S,
) -> Result<NbtRoot, NbtIoError> {
    if flavor.big_endian {
        Decoder::<BigEndian, _, _>::new(reader, flavor, selector).read_root(flavor)
    } else {
        Decoder::<LittleEndian, _, _>::new(reader, flavor, selector).read_root(flavor)
    }
}

fn root_name<R: Read>(reader: &mut R, flavor: Flavor) -> Result<Option<String>, NbtIoError> {
    let (_, name) = if flavor.big_endian {
        Decoder::<BigEndian, _, _>::new(reader, flavor, SelectAll).read_root_header(flavor)?
    } else {
        Decoder::<LittleEndian, _, _>::new(reader, flavor, SelectAll).read_root_header(flavor)?
    };

    Ok(name)
}

fn drain<R: Read>(reader: &mut R) -> Result<(), NbtIoError> {
    io::copy(reader, &mut io::sink())?;
    Ok(())
}

/// Writes the given root with the given container and flavor to the given writer, returning the number of
/// bytes written to the writer.
///
/// The root is checked against the flavor before anything is written. Other failures abort the write
/// midway, leaving whatever was already written in place. To avoid partial output, write into a buffer
/// with [`to_bytes`] first.
pub fn write_nbt<W: Write>(
    writer: &mut W,
    root: &NbtRoot,
    flavor: Flavor,
    container: Container,
) -> Result<u64, NbtIoError> {
    let compression = match container {
        Container::Detect => return Err(NbtIoError::DetectOnWrite),
        Container::ZlibCompressedWith(compression) | Container::GzCompressedWith(compression) =>
            compression,
        _ => Compression::default(),
    };

    root.validate(flavor)?;

    let mut counter = CountingWriter {
        inner: writer,
        count: 0,
    };

    match container {
        Container::ZlibCompressed | Container::ZlibCompressedWith(_) => {
            let mut encoder = ZlibEncoder::new(&mut counter, compression);
            encode(&mut encoder, root, flavor)?;
            encoder.finish()?;
        }
        Container::GzCompressed | Container::GzCompressedWith(_) => {
            let mut encoder = GzEncoder::new(&mut counter, compression);
            encode(&mut encoder, root, flavor)?;
            encoder.finish()?;
        }
        _ => encode(&mut counter, root, flavor)?,
    }

    counter.flush()?;
    debug!(
        flavor = flavor.name,
        bytes = counter.count,
        "encoded NBT document"
    );
    Ok(counter.count)
}

/// Writes the given root into a new buffer.
///
/// ```
/// # use nbt_codec::*;
/// # use nbt_codec::io::{self, Container};
/// let mut compound = NbtCompound::new();
/// compound.insert("val", 42i32);
///
/// let bytes = io::to_bytes(&NbtRoot::named("", compound), Flavor::DEFAULT, Container::Uncompressed)?;
/// assert_eq!(bytes, [0x0A, 0, 0, 0x03, 0, 3, b'v', b'a', b'l', 0, 0, 0, 42, 0x00]);
///
/// let (root, _) = io::from_bytes(&bytes, Flavor::DEFAULT, Container::Detect)?;
/// assert_eq!(root.as_compound().unwrap().get::<_, i32>("val")?, 42);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn to_bytes(root: &NbtRoot, flavor: Flavor, container: Container) -> Result<Vec<u8>, NbtIoError> {
    let mut bytes = Vec::new();
    write_nbt(&mut bytes, root, flavor, container)?;
    Ok(bytes)
}

/// Writes the given root to a file as described by the given options, returning the number of bytes
/// written.
pub fn write_nbt_file<P: AsRef<Path>>(
    path: P,
    root: &NbtRoot,
    options: &WriteOptions,
) -> Result<u64, NbtIoError> {
    let mut writer = BufWriter::with_capacity(options.buffer_size, File::create(path)?);
    let written = write_nbt(&mut writer, root, options.flavor, options.container)?;
    writer.flush()?;
    Ok(written)
}

fn encode<W: Write>(writer: &mut W, root: &NbtRoot, flavor: Flavor) -> Result<(), NbtIoError> {
    if flavor.big_endian {
        Encoder::<BigEndian, _>::new(writer, flavor).write_root(root)
    } else {
        Encoder::<LittleEndian, _>::new(writer, flavor).write_root(root)
    }
}

/// One step of the path from the root to a nested tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathSegment {
    Name(String),
    Index(usize),
}

fn format_path(path: &[PathSegment]) -> String {
    let mut formatted = String::new();
    for segment in path {
        match segment {
            PathSegment::Name(name) => {
                if !formatted.is_empty() {
                    formatted.push('.');
                }
                formatted.push_str(name);
            }
            PathSegment::Index(index) => {
                let _ = write!(formatted, "[{}]", index);
            }
        }
    }
    formatted
}

/// The broad category of an [`NbtIoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The byte stream is structurally invalid.
    Format,
    /// The input ended before a value was fully read.
    EndOfStream,
    /// The container could not be recognized, or detection was requested where it is not possible.
    UnsupportedContainer,
    /// The in-memory tree or root violates an invariant or the rules of the flavor.
    Structure,
    /// The tree is valid in memory but cannot be encoded as-is.
    EncodingConstraint,
    /// Any other I/O failure of the underlying stream.
    Io,
}

/// Describes an error which occurred during the reading or writing of NBT data.
#[derive(Debug)]
pub enum NbtIoError {
    /// A native I/O error.
    StdIo(io::Error),
    /// The input ended before a value could be fully read.
    UnexpectedEof,
    /// An invalid tag ID was encountered.
    InvalidTagId(u8),
    /// The root tag has a kind which is not accepted by the flavor being read.
    InvalidRootTag(u8),
    /// A list declared an element kind which it cannot hold.
    InvalidListType(u8),
    /// An array or list declared a negative length.
    NegativeLength(i32),
    /// Compounds and lists are nested deeper than [`MAX_DEPTH`].
    ExceedsMaxDepth,
    /// A string was not valid in the encoding of the flavor being read.
    InvalidString,
    /// A zlib container header failed validation.
    InvalidContainerHeader(u8, u8),
    /// The first byte of the data does not identify any known container.
    UnrecognizedContainer(u8),
    /// Container detection was requested on a source which cannot be peeked.
    DetectionUnavailable,
    /// Container detection was requested when writing.
    DetectOnWrite,
    /// The tree or root violates a structural invariant.
    Structure(NbtStructureError),
    /// A list has no element kind, so its header cannot be written.
    IndeterminateListType,
    /// A string is longer than the 65535 encoded bytes a length prefix can describe.
    StringTooLong(usize),
    /// An array or list has more elements than a length prefix can describe.
    SequenceTooLong(usize),
    /// An error that occurred at the given path within the tree.
    Context {
        /// The path to the tag being processed, with names separated by dots and list indices in
        /// brackets.
        path: Box<str>,
        /// The underlying error.
        source: Box<NbtIoError>,
    },
}

impl NbtIoError {
    pub(crate) fn with_path(error: NbtIoError, path: Vec<PathSegment>) -> NbtIoError {
        if path.is_empty() {
            return error;
        }

        NbtIoError::Context {
            path: format_path(&path).into_boxed_str(),
            source: Box::new(error),
        }
    }

    /// Returns the error without any path context.
    pub fn root_cause(&self) -> &NbtIoError {
        match self {
            NbtIoError::Context { source, .. } => source.root_cause(),
            error => error,
        }
    }

    /// Returns the path within the tree at which this error occurred, if known.
    pub fn path(&self) -> Option<&str> {
        match self {
            NbtIoError::Context { path, .. } => Some(&**path),
            _ => None,
        }
    }

    /// Returns the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            NbtIoError::StdIo(_) => ErrorCategory::Io,
            NbtIoError::UnexpectedEof => ErrorCategory::EndOfStream,
            NbtIoError::InvalidTagId(_)
            | NbtIoError::InvalidRootTag(_)
            | NbtIoError::InvalidListType(_)
            | NbtIoError::NegativeLength(_)
            | NbtIoError::ExceedsMaxDepth
            | NbtIoError::InvalidString
            | NbtIoError::InvalidContainerHeader(..) => ErrorCategory::Format,
            NbtIoError::UnrecognizedContainer(_)
            | NbtIoError::DetectionUnavailable
            | NbtIoError::DetectOnWrite => ErrorCategory::UnsupportedContainer,
            NbtIoError::Structure(_) => ErrorCategory::Structure,
            NbtIoError::IndeterminateListType
            | NbtIoError::StringTooLong(_)
            | NbtIoError::SequenceTooLong(_) => ErrorCategory::EncodingConstraint,
            NbtIoError::Context { source, .. } => source.category(),
        }
    }
}

impl From<io::Error> for NbtIoError {
    fn from(error: io::Error) -> Self {
        if error.kind() == ErrorKind::UnexpectedEof {
            NbtIoError::UnexpectedEof
        } else {
            NbtIoError::StdIo(error)
        }
    }
}

impl From<NbtStructureError> for NbtIoError {
    fn from(error: NbtStructureError) -> Self {
        NbtIoError::Structure(error)
    }
}

impl Display for NbtIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NbtIoError::StdIo(error) => write!(f, "{}", error),
            NbtIoError::UnexpectedEof => write!(f, "Unexpected end of NBT data"),
            &NbtIoError::InvalidTagId(id) => write!(
                f,
                "Encountered invalid tag ID 0x{:X} during deserialization",
                id
            ),
            &NbtIoError::InvalidRootTag(id) =>
                write!(f, "Tag ID 0x{:X} is not a valid root tag for this flavor", id),
            &NbtIoError::InvalidListType(id) =>
                write!(f, "Non-empty list declared invalid element tag ID 0x{:X}", id),
            &NbtIoError::NegativeLength(len) =>
                write!(f, "Encountered negative sequence length {}", len),
            NbtIoError::ExceedsMaxDepth => write!(
                f,
                "Compounds and lists are nested deeper than the limit of {}",
                MAX_DEPTH
            ),
            NbtIoError::InvalidString => write!(f, "Invalid string encoding"),
            &NbtIoError::InvalidContainerHeader(first, second) => write!(
                f,
                "Invalid zlib header 0x{:02X} 0x{:02X}",
                first, second
            ),
            &NbtIoError::UnrecognizedContainer(byte) => write!(
                f,
                "Unable to detect the container of NBT data starting with 0x{:02X}",
                byte
            ),
            NbtIoError::DetectionUnavailable => write!(
                f,
                "Container detection requires a seekable source; specify the container explicitly"
            ),
            NbtIoError::DetectOnWrite =>
                write!(f, "A concrete container must be chosen when writing NBT data"),
            NbtIoError::Structure(error) => Display::fmt(error, f),
            NbtIoError::IndeterminateListType =>
                write!(f, "Cannot write a list which has no element type"),
            &NbtIoError::StringTooLong(len) => write!(
                f,
                "String of {} bytes exceeds the maximum length of {}",
                len,
                u16::MAX
            ),
            &NbtIoError::SequenceTooLong(len) => write!(
                f,
                "Sequence of {} elements exceeds the maximum length of {}",
                len,
                i32::MAX
            ),
            NbtIoError::Context { path, source } => write!(f, "{} (at \"{}\")", source, path),
        }
    }
}

impl Error for NbtIoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NbtIoError::StdIo(error) => Some(error),
            NbtIoError::Structure(error) => Some(error),
            NbtIoError::Context { source, .. } => Some(&**source),
            _ => None,
        }
    }
}
