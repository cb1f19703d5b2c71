//! Decoding every resource of one archive.

use lgres_formats::{DirectoryEntry, ResourceFile};

use crate::table::RESERVED_ID_LIMIT;

/// One resource of an input archive with its decoded blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedResource {
    /// Directory entry as stored in the input
    pub entry: DirectoryEntry,
    /// Decoded blocks, one for simple resources; empty for reserved ids
    pub chunks: Vec<Vec<u8>>,
}

impl ExtractedResource {
    /// Whether the id is structural and never merged
    pub const fn is_reserved(&self) -> bool {
        self.entry.id < RESERVED_ID_LIMIT
    }
}

/// Parse `data` and decode every resource in directory order.
///
/// Reserved ids are listed with their entry only; their payloads are never
/// decoded. The returned resources own their bytes, so `data` can be dropped
/// afterwards.
pub fn extract_resources(data: &[u8]) -> lgres_formats::Result<Vec<ExtractedResource>> {
    let file = ResourceFile::parse(data)?;
    file.resources()
        .iter()
        .map(|info| {
            let id = info.entry.id;
            let chunks = if id < RESERVED_ID_LIMIT {
                Vec::new()
            } else {
                file.blocks(id)?
            };
            Ok(ExtractedResource {
                entry: info.entry,
                chunks,
            })
        })
        .collect()
}
