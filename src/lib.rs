#![deny(rust_2018_idioms)]
#![warn(missing_debug_implementations, missing_docs)]

/*!
Provides support for encoding and decoding the Named Binary Tag (NBT) format in all of its common
dialects: the big-endian Java edition format used on disk, the unnamed-root variant used in recent
network protocols, and the little-endian Bedrock edition format. Data may be uncompressed or wrapped in
a zlib or gzip container, and the container can be detected automatically.

# Basic Usage

The basic unit of NBT data is the [`NbtTag`]. Larger data structures are represented through a tree of
compounds (insertion-ordered maps) and lists (homogeneous vecs) of NBT tags. A complete document is an
[`NbtRoot`]: a compound or list paired with an optional name.

## Creating NBT Data

```
# use nbt_codec::*;
let mut compound = NbtCompound::new();
compound.insert("foo", 123);
compound.insert("bar", -3.6f32);

let mut list = NbtList::with_capacity(3);
for x in 1i64 ..= 3 {
    list.push(x).unwrap();
}
compound.insert("list", list);

*compound.get_mut::<_, &mut i32>("foo").unwrap() += 1;

assert!(matches!(compound.get::<_, i32>("foo"), Ok(124)));
assert!(compound.get::<_, f64>("bar").is_err());
assert!(compound.get::<_, &NbtTag>("list").is_ok());
```

## Reading and Writing NBT

Every read and write is parameterized by a [`Flavor`], which fixes the byte order, whether the root is
named, whether a list may be the root, and the string encoding, and by an [`io::Container`].

```
# use nbt_codec::*;
use nbt_codec::io::{self, Container};
use std::io::Cursor;

let mut compound = NbtCompound::new();
compound.insert("foo", 123);
compound.insert("bar", -3.6f32);
let root = NbtRoot::named("root-tag", compound);

let mut binary: Vec<u8> = Vec::new();
io::write_nbt(&mut binary, &root, Flavor::DEFAULT, Container::GzCompressed)?;

let (read_root, _) = io::read_nbt(&mut Cursor::new(&binary), Flavor::DEFAULT, Container::GzCompressed)?;
assert_eq!(read_root.name(), Some("root-tag"));
assert_eq!(read_root, root);

// The container can be detected from the data itself
let (detected, _) = io::from_bytes(&binary, Flavor::DEFAULT, Container::Detect)?;
assert_eq!(detected, root);
# Ok::<(), io::NbtIoError>(())
```

# Querying Tags

Generics are used to make the tag querying process as seamless as possible, however this allows for two
types of errors to occur: missing tags (invalid key or index), and tag type mismatches. Thus, methods
that would normally return an [`Option`](Option) in `std` collection equivalents return a
[`Result`](Result) in this crate. Both are reported as an [`NbtStructureError`].

```
# use nbt_codec::*;
use std::convert::TryFrom;

let tag1: NbtTag = vec![1i8, 2, 3].into();
let tag2: NbtTag = "abcde".into();

assert_eq!(Vec::<i8>::try_from(tag1).unwrap(), vec![1i8, 2, 3]);
assert!(i16::try_from(tag2).is_err()); // Type mismatch
```

```
# use nbt_codec::*;
let mut compound = NbtCompound::new();
compound.insert("foo", 123);
compound.insert("bar", -3.6f32);

assert!(compound.get::<_, i32>("fooz").unwrap_err().is_missing());
assert!(compound.get::<_, i32>("bar").unwrap_err().is_type_mismatch());
```

# Lists

Every element of an [`NbtList`] has the same kind. The first element pushed fixes the element kind, and
pushing a tag of any other kind afterwards fails without modifying the list.

```
# use nbt_codec::*;
let mut list = NbtList::new();
list.push("abc").unwrap();
list.push("ijk").unwrap();
assert!(list.push(5i32).is_err());

let mut iter = list.iter_map::<&str>();
assert!(matches!(iter.next(), Some(Ok("abc"))));
assert!(matches!(iter.next(), Some(Ok("ijk"))));
assert!(iter.next().is_none());
```

The specialized array tags hold `i8`, `i32` and `i64` vecs directly, so vecs of these types convert into
[`NbtTag`]s without going through a list.

```
# use nbt_codec::*;
let mut compound = NbtCompound::new();
compound.insert("array", vec![10i32, 20, 30]);

compound.get_mut::<_, &mut [i32]>("array")
    .unwrap()
    .iter_mut()
    .for_each(|x| *x /= 10);

assert_eq!(compound.get::<_, &[i32]>("array").unwrap(), [1i32, 2, 3].as_ref());
```

# Selective Reading

Large documents can be read partially by passing a [`io::Selector`], which decides for each compound
child whether it is materialized. Declined children are still consumed from the stream. See
[`io::read_nbt_selective`].
*/

/// Reading and writing complete NBT documents, container handling, and the errors produced along the way.
pub mod io;
mod error;
mod flavor;
mod named;
mod raw;
mod read;
mod tag;
mod write;

pub use error::*;
pub use flavor::Flavor;
pub use named::*;
pub use tag::*;
