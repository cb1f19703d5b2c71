//! Resolved resource table and the cross-archive merge policy.
//!
//! Archives are folded in processing order; later archives take precedence.
//! Merging happens per chunk: a non-empty incoming chunk replaces the stored
//! one, an empty incoming chunk keeps it. The incoming resource decides the
//! number of chunks.
//!
//! Ids below [`RESERVED_ID_LIMIT`] are structural and never merged.

use std::collections::HashMap;

use lgres_formats::utils::U24_MAX;
use lgres_formats::writer::payload_length;
use lgres_formats::{
    ContentType, DirectoryEntry, ResError, ResourceFileWriter, ResourceFlags,
};
use tracing::{info, warn};

use crate::extract::ExtractedResource;

/// Ids `0..RESERVED_ID_LIMIT` are skipped
pub const RESERVED_ID_LIMIT: u16 = 3;

/// A resource after merging, always stored unpacked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    /// Resource id
    pub id: u16,
    /// Content type of the most recent input
    pub content_type: ContentType,
    /// Flags of the most recent input, Packed cleared
    pub flags: ResourceFlags,
    /// Merged chunks
    pub chunks: Vec<Vec<u8>>,
    /// Payload length, including the block table for compound resources
    pub length: usize,
}

impl ResolvedResource {
    fn new(
        id: u16,
        content_type: ContentType,
        flags: ResourceFlags,
        chunks: Vec<Vec<u8>>,
    ) -> Self {
        let mut resource = Self {
            id,
            content_type,
            flags,
            chunks,
            length: 0,
        };
        resource.recompute_length();
        resource
    }

    fn recompute_length(&mut self) {
        self.length = payload_length(self.flags, &self.chunks);
    }

    /// Directory entry for the merged payload
    pub fn directory_entry(&self) -> Result<DirectoryEntry, ResError> {
        if self.length > U24_MAX as usize {
            return Err(ResError::LengthOverflow {
                id: self.id,
                length: self.length,
            });
        }
        Ok(DirectoryEntry::unpacked(
            self.id,
            self.flags,
            self.length as u32,
            self.content_type,
        ))
    }
}

/// Outcome of folding one archive into the table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Ids seen for the first time
    pub added: usize,
    /// Ids that already existed
    pub patched: usize,
    /// Chunks replaced in existing resources
    pub patched_chunks: usize,
    /// Reserved ids that were ignored
    pub skipped: usize,
}

/// Resolved resources keyed by id, in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct ResourceTable {
    resources: Vec<ResolvedResource>,
    index: HashMap<u16, usize>,
}

impl ResourceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resolved resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resolved resource for `id`
    pub fn get(&self, id: u16) -> Option<&ResolvedResource> {
        self.index.get(&id).map(|&i| &self.resources[i])
    }

    /// Resolved resources in table order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedResource> {
        self.resources.iter()
    }

    /// Fold one archive's resources into the table
    ///
    /// `source` names the archive in diagnostics.
    pub fn ingest<I>(&mut self, source: &str, resources: I) -> IngestSummary
    where
        I: IntoIterator<Item = ExtractedResource>,
    {
        let mut summary = IngestSummary::default();

        for ExtractedResource { entry, mut chunks } in resources {
            let id = entry.id;
            if id < RESERVED_ID_LIMIT {
                warn!("{source}: skipping reserved resource {id}");
                summary.skipped += 1;
                continue;
            }

            let mut flags = entry.flags;
            if flags.is_packed() {
                warn!("{source}/{id:04X}: packed resource will be stored unpacked");
                flags.clear(ResourceFlags::PACKED);
            }

            let Some(&position) = self.index.get(&id) else {
                info!("{source}: adding {id:04X} type {}", entry.content_type);
                self.index.insert(id, self.resources.len());
                self.resources
                    .push(ResolvedResource::new(id, entry.content_type, flags, chunks));
                summary.added += 1;
                continue;
            };

            let existing = &mut self.resources[position];
            if existing.content_type != entry.content_type {
                warn!(
                    "{source}/{id:04X}: content types do not match, old {} new {}; using new",
                    existing.content_type, entry.content_type
                );
            }

            for (i, chunk) in chunks.iter_mut().enumerate() {
                if chunk.is_empty() {
                    if let Some(old) = existing.chunks.get_mut(i) {
                        *chunk = std::mem::take(old);
                    }
                } else {
                    info!("{source}: patching {id:04X}/{i} type {}", entry.content_type);
                    summary.patched_chunks += 1;
                }
            }

            existing.content_type = entry.content_type;
            existing.flags = flags;
            existing.chunks = chunks;
            existing.recompute_length();
            summary.patched += 1;
        }

        summary
    }

    /// Write every resolved resource into a new archive
    pub fn serialize(&self, comment: &str) -> Result<Vec<u8>, ResError> {
        let mut writer = ResourceFileWriter::new(comment)?;
        for resource in &self.resources {
            writer.add_resource(&resource.directory_entry()?, &resource.chunks)?;
        }
        writer.finish()
    }
}
