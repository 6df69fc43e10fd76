#![allow(dead_code)]

use nbt_codec::{Flavor, NbtCompound, NbtList, NbtRoot, NbtTag, TagKind};
use once_cell::sync::Lazy;
use rand::{distributions::Alphanumeric, rngs::StdRng, Rng};

/// The classic minimal document: a compound named "hello world" holding a single string.
pub const HELLO_WORLD: &[u8] = &[
    0x0A, 0x00, 0x0B, b'h', b'e', b'l', b'l', b'o', b' ', b'w', b'o', b'r', b'l', b'd', 0x08, 0x00,
    0x04, b'n', b'a', b'm', b'e', 0x00, 0x09, b'B', b'a', b'n', b'a', b'n', b'r', b'a', b'm', b'a',
    0x00,
];

pub const BIG_TEST_NAME: &str = "Level";
pub const BYTE_ARRAY_TEST: &str = "byteArrayTest (the first 1000 values of (n*n*255+n*7)%100, \
                                   starting with n=0 (0, 62, 34, 16, 8, ...))";
pub static BIG_TEST_VALIDATE: Lazy<NbtCompound> = Lazy::new(|| {
    let mut level = NbtCompound::new();

    let mut nested_test = NbtCompound::new();
    let mut egg = NbtCompound::new();
    egg.insert("name", "Eggbert");
    egg.insert("value", 0.5f32);
    let mut ham = NbtCompound::new();
    ham.insert("name", "Hampus");
    ham.insert("value", 0.75f32);
    nested_test.insert("egg", egg);
    nested_test.insert("ham", ham);
    level.insert("nested compound test", nested_test);

    level.insert("intTest", 2147483647i32);
    level.insert("byteTest", 127i8);
    level.insert(
        "stringTest",
        "HELLO WORLD THIS IS A TEST STRING \u{C5}\u{C4}\u{D6}!",
    );
    level.insert(
        "listTest (long)",
        NbtList::from(vec![11i64, 12, 13, 14, 15]),
    );
    level.insert("doubleTest", 0.49312871321823148f64);
    level.insert("floatTest", 0.49823147058486938f32);
    level.insert("longTest", 9223372036854775807i64);

    let mut compound0 = NbtCompound::new();
    compound0.insert("created-on", 1264099775885i64);
    compound0.insert("name", "Compound tag #0");
    let mut compound1 = NbtCompound::new();
    compound1.insert("created-on", 1264099775885i64);
    compound1.insert("name", "Compound tag #1");
    level.insert(
        "listTest (compound)",
        NbtList::from(vec![compound0, compound1]),
    );

    let mut bytes = Vec::new();
    for n in 0 .. 1000 {
        bytes.push(((n * n * 255 + n * 7) % 100) as i8);
    }
    level.insert(BYTE_ARRAY_TEST, bytes);

    level.insert("shortTest", 32767i16);
    level.insert("intArrayTest", vec![i32::MIN, -1, 0, 1, i32::MAX]);
    level.insert("longArrayTest", vec![i64::MIN, 0, i64::MAX]);
    level.insert("emptyList", NbtList::of_kind(TagKind::End));
    level.insert("unicode test", "a\u{E9}\u{65E5}\u{10401}\0");

    level
});

pub fn big_test_root() -> NbtRoot {
    NbtRoot::named(BIG_TEST_NAME, BIG_TEST_VALIDATE.clone())
}

/// Builds a random compound tree with at most the given nesting depth. Floating point values are drawn
/// from arbitrary bit patterns, NaNs and infinities included.
pub fn random_compound(rng: &mut StdRng, depth: usize) -> NbtCompound {
    let len = rng.gen_range(0 .. 8);
    let mut compound = NbtCompound::with_capacity(len);
    for _ in 0 .. len {
        let name = random_string(rng);
        let kind = random_kind(rng, depth);
        compound.insert(name, random_tag(rng, kind, depth));
    }
    compound
}

fn random_string(rng: &mut StdRng) -> String {
    let len = rng.gen_range(0 .. 12);
    (&mut *rng)
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn random_kind(rng: &mut StdRng, depth: usize) -> TagKind {
    // Containers are only picked while there is depth left to nest them
    let max = if depth == 0 { 8 } else { 12 };
    match rng.gen_range(0 .. max) {
        0 => TagKind::Byte,
        1 => TagKind::Short,
        2 => TagKind::Int,
        3 => TagKind::Long,
        4 => TagKind::Float,
        5 => TagKind::Double,
        6 => TagKind::String,
        7 => TagKind::ByteArray,
        8 => TagKind::IntArray,
        9 => TagKind::LongArray,
        10 => TagKind::List,
        _ => TagKind::Compound,
    }
}

fn random_tag(rng: &mut StdRng, kind: TagKind, depth: usize) -> NbtTag {
    match kind {
        TagKind::Byte => NbtTag::Byte(rng.gen()),
        TagKind::Short => NbtTag::Short(rng.gen()),
        TagKind::Int => NbtTag::Int(rng.gen()),
        TagKind::Long => NbtTag::Long(rng.gen()),
        TagKind::Float => NbtTag::Float(f32::from_bits(rng.gen())),
        TagKind::Double => NbtTag::Double(f64::from_bits(rng.gen())),
        TagKind::String => NbtTag::String(random_string(rng)),
        TagKind::ByteArray => {
            let len = rng.gen_range(0 .. 32);
            NbtTag::ByteArray((0 .. len).map(|_| rng.gen()).collect())
        }
        TagKind::IntArray => {
            let len = rng.gen_range(0 .. 16);
            NbtTag::IntArray((0 .. len).map(|_| rng.gen()).collect())
        }
        TagKind::LongArray => {
            let len = rng.gen_range(0 .. 16);
            NbtTag::LongArray((0 .. len).map(|_| rng.gen()).collect())
        }
        TagKind::List => {
            let element_kind = random_kind(rng, depth - 1);
            let len = rng.gen_range(0 .. 6);
            let mut list = NbtList::of_kind(element_kind);
            for _ in 0 .. len {
                list.push(random_tag(rng, element_kind, depth - 1))
                    .expect("elements share the list's kind");
            }
            NbtTag::List(list)
        }
        TagKind::Compound => NbtTag::Compound(random_compound(rng, depth - 1)),
        TagKind::End => unreachable!("End is never generated"),
    }
}

/// An uncompressed named root compound whose child `name` is a list nested `lists` levels deep, ending
/// in an empty byte list. A `trailer` child follows it.
pub fn nested_lists_document(name: &str, lists: usize) -> Vec<u8> {
    let mut bytes = vec![0x0A, 0x00, 0x00, 0x09];
    bytes.extend_from_slice(&(name.len() as u16).to_be_bytes());
    bytes.extend_from_slice(name.as_bytes());
    for _ in 1 .. lists {
        bytes.extend_from_slice(&[0x09, 0x00, 0x00, 0x00, 0x01]);
    }
    bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(&[0x01, 0x00, 0x07]);
    bytes.extend_from_slice(b"trailer");
    bytes.extend_from_slice(&[0x01, 0x00]);
    bytes
}

/// Every flavor preset shipped with the crate, paired with a root which is valid under it.
pub fn roots_for_each_flavor(compound: &NbtCompound) -> Vec<(Flavor, NbtRoot)> {
    [
        Flavor::DEFAULT,
        Flavor::LENIENT,
        Flavor::JAVA_NETWORK,
        Flavor::BEDROCK,
    ]
    .iter()
    .map(|&flavor| {
        let root = NbtRoot::for_flavor(flavor, compound.clone())
            .expect("compound roots are valid under every flavor");
        (flavor, root)
    })
    .collect()
}
