#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for writing and re-reading resource archives
//!
//! Builds archives with `ResourceFileWriter`, parses them back with
//! `ResourceFile` and checks chunk contents, alignment and directory fields.

use lgres_formats::writer::payload_length;
use lgres_formats::{
    ContentType, DirectoryEntry, ResError, ResourceFile, ResourceFileWriter, ResourceFlags,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

struct Resource {
    id: u16,
    flags: ResourceFlags,
    content_type: ContentType,
    chunks: Vec<Vec<u8>>,
}

fn write_archive(resources: &[Resource]) -> Vec<u8> {
    let mut writer = ResourceFileWriter::new("integration").expect("Should create writer");
    for resource in resources {
        let entry = DirectoryEntry::unpacked(
            resource.id,
            resource.flags,
            payload_length(resource.flags, &resource.chunks) as u32,
            resource.content_type,
        );
        writer
            .add_resource(&entry, &resource.chunks)
            .expect("Should add resource");
    }
    writer.finish().expect("Should finish archive")
}

fn resource_strategy() -> impl Strategy<Value = (bool, Vec<Vec<u8>>)> {
    prop_oneof![
        proptest::collection::vec(any::<u8>(), 0..64).prop_map(|chunk| (false, vec![chunk])),
        proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..32), 1..6)
            .prop_map(|chunks| (true, chunks)),
    ]
}

proptest! {
    #[test]
    fn written_chunks_read_back_unchanged(
        specs in proptest::collection::vec(resource_strategy(), 0..12),
    ) {
        let resources: Vec<Resource> = specs
            .into_iter()
            .enumerate()
            .map(|(i, (compound, chunks))| Resource {
                id: 3 + i as u16,
                flags: if compound {
                    ResourceFlags::new(ResourceFlags::COMPOUND)
                } else {
                    ResourceFlags::default()
                },
                content_type: ContentType::from_byte(i as u8),
                chunks,
            })
            .collect();

        let data = write_archive(&resources);
        let file = ResourceFile::parse(&data).unwrap();
        prop_assert_eq!(file.len(), resources.len());

        for (info, resource) in file.resources().iter().zip(&resources) {
            prop_assert_eq!(info.data_offset % 4, 0);
            prop_assert_eq!(info.entry.id, resource.id);
            prop_assert_eq!(info.entry.length_packed, info.entry.length_unpacked);
            prop_assert_eq!(info.entry.content_type, resource.content_type);

            let blocks = file.blocks(resource.id).unwrap();
            prop_assert_eq!(&blocks, &resource.chunks);

            for (index, chunk) in resource.chunks.iter().enumerate() {
                prop_assert_eq!(&file.block(resource.id, index as u16).unwrap(), chunk);
            }
        }
    }
}

#[test]
fn compound_block_out_of_range_reports_count() {
    let data = write_archive(&[Resource {
        id: 40,
        flags: ResourceFlags::new(ResourceFlags::COMPOUND),
        content_type: ContentType::Font,
        chunks: vec![vec![1, 2], vec![3]],
    }]);
    let file = ResourceFile::parse(&data).unwrap();

    let err = file.block(40, 5).unwrap_err();
    assert!(matches!(err, ResError::BlockIndex { index: 5, count: 2 }));
    assert!(err.to_string().contains("only 2 blocks"));
}

#[test]
fn directory_sits_after_payloads() {
    let data = write_archive(&[
        Resource {
            id: 3,
            flags: ResourceFlags::default(),
            content_type: ContentType::String,
            chunks: vec![b"abcde".to_vec()],
        },
        Resource {
            id: 4,
            flags: ResourceFlags::default(),
            content_type: ContentType::String,
            chunks: vec![b"xy".to_vec()],
        },
    ]);

    // 128 header + 8 (5 padded) + 4 (2 padded)
    let directory_offset = u32::from_le_bytes(data[124..128].try_into().unwrap());
    assert_eq!(directory_offset, 140);
    assert_eq!(&data[133..136], &[0, 0, 0]);
    assert_eq!(data.len(), 140 + 6 + 2 * 10);

    let file = ResourceFile::parse(&data).unwrap();
    assert_eq!(file.directory().entry_count, 2);
    assert_eq!(file.directory().data_offset, 128);
}
