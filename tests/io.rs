mod assets;
use assets::*;
use flate2::Compression;
use nbt_codec::{
    io::{
        self,
        Container,
        ErrorCategory,
        NbtIoError,
        ReadOptions,
        SelectAll,
        WriteOptions,
        MAX_DEPTH,
    },
    Flavor,
    NbtCompound,
    NbtList,
    NbtRoot,
    TagKind,
};
use rand::{rngs::StdRng, SeedableRng};
use std::io::{Cursor, Read};

#[test]
fn hello_world() {
    let (root, read) = io::from_bytes(HELLO_WORLD, Flavor::DEFAULT, Container::Detect).unwrap();

    assert_eq!(read, HELLO_WORLD.len() as u64);
    assert_eq!(root.name(), Some("hello world"));
    let compound = root.as_compound().unwrap();
    assert_eq!(compound.len(), 1);
    assert_eq!(compound.get::<_, &str>("name").unwrap(), "Bananrama");

    let written = io::to_bytes(&root, Flavor::DEFAULT, Container::Uncompressed).unwrap();
    assert_eq!(written, HELLO_WORLD);
}

#[test]
fn single_int_child_decodes() {
    let bytes = [
        0x0A, 0x00, 0x00, 0x03, 0x00, 0x03, 0x76, 0x61, 0x6C, 0x00, 0x00, 0x00, 0x2A, 0x00,
    ];
    let (root, read) = io::from_bytes(&bytes, Flavor::DEFAULT, Container::Detect).unwrap();

    let mut compound = NbtCompound::new();
    compound.insert("val", 42i32);
    assert_eq!(root, NbtRoot::named("", compound));
    assert_eq!(read, bytes.len() as u64);
}

#[test]
fn big_test_every_container() {
    let root = big_test_root();

    for &container in &[
        Container::Uncompressed,
        Container::ZlibCompressed,
        Container::ZlibCompressedWith(Compression::best()),
        Container::GzCompressed,
        Container::GzCompressedWith(Compression::fast()),
    ] {
        let bytes = io::to_bytes(&root, Flavor::DEFAULT, container).unwrap();

        let (explicit, _) = io::read_nbt(&mut Cursor::new(&bytes), Flavor::DEFAULT, container).unwrap();
        assert_eq!(explicit, root, "explicit {:?}", container);

        let (detected, _) = io::from_bytes(&bytes, Flavor::DEFAULT, Container::Detect).unwrap();
        assert_eq!(detected, root, "detected {:?}", container);
    }
}

#[test]
fn reencoding_is_byte_identical() {
    let bytes = io::to_bytes(&big_test_root(), Flavor::DEFAULT, Container::Uncompressed).unwrap();
    let (root, read) = io::from_bytes(&bytes, Flavor::DEFAULT, Container::Uncompressed).unwrap();
    assert_eq!(read, bytes.len() as u64);

    let rewritten = io::to_bytes(&root, Flavor::DEFAULT, Container::Uncompressed).unwrap();
    assert_eq!(rewritten, bytes);
}

#[test]
fn insertion_order_is_written_back() {
    let root = big_test_root();
    let bytes = io::to_bytes(&root, Flavor::DEFAULT, Container::Uncompressed).unwrap();
    let (decoded, _) = io::from_bytes(&bytes, Flavor::DEFAULT, Container::Uncompressed).unwrap();

    let expected: Vec<&str> = root.as_compound().unwrap().iter().map(|(name, _)| name).collect();
    let actual: Vec<&str> = decoded.as_compound().unwrap().iter().map(|(name, _)| name).collect();
    assert_eq!(actual, expected);
}

#[test]
fn every_flavor_round_trips() {
    for (flavor, root) in roots_for_each_flavor(&BIG_TEST_VALIDATE) {
        let bytes = io::to_bytes(&root, flavor, Container::Uncompressed).unwrap();
        let (decoded, read) = io::from_bytes(&bytes, flavor, Container::Uncompressed).unwrap();

        assert_eq!(read, bytes.len() as u64, "{}", flavor.name);
        assert_eq!(decoded, root, "{}", flavor.name);
    }
}

#[test]
fn unnamed_root_layout() {
    let mut compound = NbtCompound::new();
    compound.insert("b", 1i8);
    let root = NbtRoot::unnamed(compound);

    let bytes = io::to_bytes(&root, Flavor::JAVA_NETWORK, Container::Uncompressed).unwrap();
    assert_eq!(bytes, [0x0A, 0x01, 0x00, 0x01, b'b', 0x01, 0x00]);

    let (decoded, _) = io::from_bytes(&bytes, Flavor::JAVA_NETWORK, Container::Detect).unwrap();
    assert_eq!(decoded.name(), None);
    assert_eq!(decoded, root);
}

#[test]
fn little_endian_layout() {
    let (root, _) = io::from_bytes(HELLO_WORLD, Flavor::DEFAULT, Container::Uncompressed).unwrap();
    let bytes = io::to_bytes(&root, Flavor::BEDROCK, Container::Uncompressed).unwrap();

    assert_eq!(bytes.len(), HELLO_WORLD.len());
    assert_eq!(&bytes[.. 3], &[0x0A, 0x0B, 0x00]);

    // Big-endian data misread as little-endian declares an 11 * 256 byte root name
    let error = io::from_bytes(HELLO_WORLD, Flavor::BEDROCK, Container::Uncompressed).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::EndOfStream);

    let (decoded, _) = io::from_bytes(&bytes, Flavor::BEDROCK, Container::Uncompressed).unwrap();
    assert_eq!(decoded, root);
}

#[test]
fn list_roots_follow_the_flavor() {
    let list = NbtList::from(vec![1i16, 2, 3]);
    let root = NbtRoot::for_flavor(Flavor::LENIENT, list).unwrap();

    let error = io::to_bytes(&root, Flavor::DEFAULT, Container::Uncompressed).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Structure);

    let bytes = io::to_bytes(&root, Flavor::LENIENT, Container::Uncompressed).unwrap();
    assert_eq!(bytes[0], TagKind::List.id());

    let error = io::from_bytes(&bytes, Flavor::DEFAULT, Container::Detect).unwrap_err();
    assert!(matches!(error, NbtIoError::InvalidRootTag(0x09)));

    let (decoded, _) = io::from_bytes(&bytes, Flavor::LENIENT, Container::Detect).unwrap();
    assert_eq!(decoded.as_list().unwrap().get::<i16>(2).unwrap(), 3);
}

#[test]
fn duplicate_names_keep_the_last_value() {
    let bytes = [
        0x0A, 0x00, 0x00, // root
        0x03, 0x00, 0x01, b'a', 0x00, 0x00, 0x00, 0x01, // a = 1
        0x03, 0x00, 0x01, b'b', 0x00, 0x00, 0x00, 0x02, // b = 2
        0x03, 0x00, 0x01, b'a', 0x00, 0x00, 0x00, 0x03, // a = 3
        0x00,
    ];
    let (root, _) = io::from_bytes(&bytes, Flavor::DEFAULT, Container::Uncompressed).unwrap();
    let compound = root.as_compound().unwrap();

    assert_eq!(compound.len(), 2);
    assert_eq!(compound.get::<_, i32>("a").unwrap(), 3);
    let names: Vec<&str> = compound.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["a", "b"]);
}

#[test]
fn selective_read_consumes_the_whole_document() {
    let mut bytes = io::to_bytes(&big_test_root(), Flavor::DEFAULT, Container::Uncompressed).unwrap();
    let document_len = bytes.len() as u64;
    bytes.extend_from_slice(&[0xDE, 0xAD]);

    let skipped = [BYTE_ARRAY_TEST, "listTest (compound)", "egg", "stringTest"];
    let mut seen = Vec::new();
    let mut cursor = Cursor::new(&bytes);
    let (partial, read) = io::read_nbt_selective(
        &mut cursor,
        Flavor::DEFAULT,
        Container::Uncompressed,
        |kind: TagKind, name: &str| {
            seen.push((kind, name.to_owned()));
            !skipped.iter().any(|skip| *skip == name)
        },
    )
    .unwrap();

    assert_eq!(read, document_len);
    assert_eq!(cursor.position(), document_len);
    let mut trailer = Vec::new();
    cursor.read_to_end(&mut trailer).unwrap();
    assert_eq!(trailer, [0xDE, 0xAD]);

    let mut expected = BIG_TEST_VALIDATE.clone();
    for name in skipped.iter() {
        expected.remove(*name);
    }
    expected
        .get_mut::<_, &mut NbtCompound>("nested compound test")
        .unwrap()
        .remove("egg");
    assert_eq!(partial.as_compound().unwrap(), &expected);

    // Children of skipped compounds and lists are never offered to the selector
    assert!(seen.contains(&(TagKind::ByteArray, BYTE_ARRAY_TEST.to_owned())));
    assert!(seen.contains(&(TagKind::Compound, "ham".to_owned())));
    assert!(!seen.iter().any(|(_, name)| name == "created-on"));
    assert_eq!(seen.iter().filter(|(_, name)| name == "name").count(), 1);
}

#[test]
fn skipping_everything_matches_a_full_read() {
    let bytes = io::to_bytes(&big_test_root(), Flavor::BEDROCK, Container::GzCompressed).unwrap();

    let (full, _) = io::read_nbt_selective(
        &mut Cursor::new(&bytes),
        Flavor::BEDROCK,
        Container::GzCompressed,
        SelectAll,
    )
    .unwrap();
    assert_eq!(full.as_compound().unwrap(), &*BIG_TEST_VALIDATE);

    let (empty, _) = io::read_nbt_selective(
        &mut Cursor::new(&bytes),
        Flavor::BEDROCK,
        Container::GzCompressed,
        |_: TagKind, _: &str| false,
    )
    .unwrap();
    assert_eq!(empty.name(), Some(BIG_TEST_NAME));
    assert!(empty.as_compound().unwrap().is_empty());
}

#[test]
fn container_detection() {
    let error = io::from_bytes(&[0xFF, 0x00], Flavor::DEFAULT, Container::Detect).unwrap_err();
    assert!(matches!(error, NbtIoError::UnrecognizedContainer(0xFF)));
    assert_eq!(error.category(), ErrorCategory::UnsupportedContainer);

    let error = io::from_bytes(&[], Flavor::DEFAULT, Container::Detect).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::EndOfStream);

    let error = io::from_bytes(&[0x78, 0x00, 0x00], Flavor::DEFAULT, Container::Detect).unwrap_err();
    assert!(matches!(error, NbtIoError::InvalidContainerHeader(0x78, 0x00)));
}

#[test]
fn detection_needs_a_seekable_source() {
    let mut reader = HELLO_WORLD;
    let error = io::read_nbt(&mut reader, Flavor::DEFAULT, Container::Detect).unwrap_err();
    assert!(matches!(error, NbtIoError::DetectionUnavailable));

    let root = big_test_root();
    let mut bytes = Vec::new();
    let error = io::write_nbt(&mut bytes, &root, Flavor::DEFAULT, Container::Detect).unwrap_err();
    assert!(matches!(error, NbtIoError::DetectOnWrite));
    assert!(bytes.is_empty());
}

#[test]
fn truncation_is_end_of_stream() {
    for len in 0 .. HELLO_WORLD.len() {
        let error = io::from_bytes(&HELLO_WORLD[.. len], Flavor::DEFAULT, Container::Uncompressed)
            .unwrap_err();
        assert_eq!(error.category(), ErrorCategory::EndOfStream, "prefix of {}", len);
    }

    let bytes = io::to_bytes(&big_test_root(), Flavor::DEFAULT, Container::GzCompressed).unwrap();
    let error = io::from_bytes(&bytes[.. bytes.len() / 2], Flavor::DEFAULT, Container::Detect)
        .unwrap_err();
    assert_eq!(error.category(), ErrorCategory::EndOfStream);
}

#[test]
fn hostile_lengths_fail_cleanly() {
    let bytes = [
        0x0A, 0x00, 0x00, 0x07, 0x00, 0x01, b'x', 0x7F, 0xFF, 0xFF, 0xFF, 0x01, 0x02,
    ];
    let error = io::from_bytes(&bytes, Flavor::DEFAULT, Container::Uncompressed).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::EndOfStream);
    assert_eq!(error.path(), Some("x"));
}

#[test]
fn deep_nesting_fails_cleanly() {
    let error = io::from_bytes(
        &nested_lists_document("l", 20_000),
        Flavor::DEFAULT,
        Container::Uncompressed,
    )
    .unwrap_err();
    assert!(matches!(error.root_cause(), NbtIoError::ExceedsMaxDepth));
    assert_eq!(error.category(), ErrorCategory::Format);

    // The root compound counts as the first level
    let bytes = nested_lists_document("l", MAX_DEPTH - 1);
    let (root, _) = io::from_bytes(&bytes, Flavor::DEFAULT, Container::Uncompressed).unwrap();
    assert_eq!(root.as_compound().unwrap().get::<_, i8>("trailer").unwrap(), 1);

    let bytes = nested_lists_document("l", MAX_DEPTH);
    assert!(io::from_bytes(&bytes, Flavor::DEFAULT, Container::Uncompressed).is_err());
}

#[test]
fn deep_nesting_fails_cleanly_when_skipped() {
    let skip_deep = |_: TagKind, name: &str| name != "deep";

    let bytes = nested_lists_document("deep", 20_000);
    let error = io::read_nbt_selective(
        &mut Cursor::new(&bytes),
        Flavor::DEFAULT,
        Container::Uncompressed,
        skip_deep,
    )
    .unwrap_err();
    assert!(matches!(error.root_cause(), NbtIoError::ExceedsMaxDepth));

    let bytes = nested_lists_document("deep", MAX_DEPTH - 1);
    let (root, read) = io::read_nbt_selective(
        &mut Cursor::new(&bytes),
        Flavor::DEFAULT,
        Container::Uncompressed,
        skip_deep,
    )
    .unwrap();
    let compound = root.as_compound().unwrap();
    assert_eq!(compound.len(), 1);
    assert!(compound.contains_key("trailer"));
    assert_eq!(read, bytes.len() as u64);
}

#[test]
fn nan_round_trips() {
    let mut compound = NbtCompound::new();
    compound.insert("f", f32::NAN);
    compound.insert("d", f64::from_bits(0x7FF0_0000_0000_0001));
    compound.insert("z", -0.0f64);
    compound.insert("list", NbtList::from(vec![f32::NAN, f32::INFINITY]));

    for (flavor, root) in roots_for_each_flavor(&compound) {
        let bytes = io::to_bytes(&root, flavor, Container::Uncompressed).unwrap();
        let (decoded, _) = io::from_bytes(&bytes, flavor, Container::Uncompressed).unwrap();
        assert_eq!(decoded, root, "{}", flavor.name);

        let rewritten = io::to_bytes(&decoded, flavor, Container::Uncompressed).unwrap();
        assert_eq!(rewritten, bytes, "{}", flavor.name);
    }
}

#[test]
fn gzip_checksum_is_verified_on_request() {
    let mut bytes = io::to_bytes(&big_test_root(), Flavor::DEFAULT, Container::GzCompressed).unwrap();
    let crc = bytes.len() - 8;
    bytes[crc] ^= 0xFF;

    let lax = ReadOptions {
        container: Container::GzCompressed,
        ..ReadOptions::default()
    };
    assert!(io::read_nbt_with(&mut Cursor::new(&bytes), &lax, SelectAll).is_ok());

    let strict = ReadOptions {
        verify_checksum: true,
        ..lax
    };
    assert!(io::read_nbt_with(&mut Cursor::new(&bytes), &strict, SelectAll).is_err());
}

#[test]
fn root_name_only() {
    let bytes = io::to_bytes(&big_test_root(), Flavor::DEFAULT, Container::ZlibCompressed).unwrap();
    let name = io::read_root_name(&mut Cursor::new(&bytes), Flavor::DEFAULT, Container::ZlibCompressed)
        .unwrap();
    assert_eq!(name.as_deref(), Some(BIG_TEST_NAME));

    let unnamed = NbtRoot::unnamed(NbtCompound::new());
    let bytes = io::to_bytes(&unnamed, Flavor::JAVA_NETWORK, Container::Uncompressed).unwrap();
    let name = io::read_root_name(&mut Cursor::new(&bytes), Flavor::JAVA_NETWORK, Container::Uncompressed)
        .unwrap();
    assert_eq!(name, None);
}

#[test]
fn oversized_strings_are_rejected() {
    let mut compound = NbtCompound::new();
    compound.insert("long", "x".repeat(u16::MAX as usize + 1));
    let root = NbtRoot::named("", compound);

    let error = io::to_bytes(&root, Flavor::DEFAULT, Container::Uncompressed).unwrap_err();
    assert!(matches!(error.root_cause(), NbtIoError::StringTooLong(65536)));
    assert_eq!(error.category(), ErrorCategory::EncodingConstraint);
    assert_eq!(error.path(), Some("long"));
}

#[test]
fn random_trees_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x4E42_5443);

    for _ in 0 .. 64 {
        let compound = random_compound(&mut rng, 4);
        for (flavor, root) in roots_for_each_flavor(&compound) {
            let bytes = io::to_bytes(&root, flavor, Container::Uncompressed).unwrap();
            let (decoded, read) = io::from_bytes(&bytes, flavor, Container::Detect).unwrap();

            assert_eq!(read, bytes.len() as u64);
            assert_eq!(decoded, root, "{}", flavor.name);
        }
    }
}

#[test]
fn files() {
    let path = std::env::temp_dir().join(format!("nbt_codec_files_{}.nbt", std::process::id()));
    let root = big_test_root();

    let written = io::write_nbt_file(&path, &root, &WriteOptions::default()).unwrap();
    assert!(written > 0);

    let read = io::read_nbt_file(&path, &ReadOptions {
        verify_checksum: true,
        ..ReadOptions::default()
    });
    std::fs::remove_file(&path).unwrap();
    assert_eq!(read.unwrap(), root);
}
