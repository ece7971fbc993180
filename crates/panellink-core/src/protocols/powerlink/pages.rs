//! Paged message reassembly.
//!
//! Long responses arrive as a sequence of PAGED_RESPONSE frames followed by a
//! final RESPONSE frame. The store keeps the structural pages for the one
//! in-flight command, then folds every page's chunks into a single logical
//! response: chunks sharing an index are concatenated in page order with
//! their lengths summed.
//!
//! The `DEVICE_TYPES` (`0x1F`) firmware sends page `0xFF` for every page of a
//! sequence instead of real page numbers; the caller substitutes
//! `highest_seen + 1` before storing (see [`PageStore::next_page_number`]).
//! That workaround is kept as-is; downstream consumers rely on it.

use std::collections::BTreeMap;

use tracing::debug;

use super::parser::{Chunk, StructuredResponse};

/// Accumulator for one in-flight multi-page response. Owned by a single
/// decode orchestrator; only one command's sequence is tracked at a time.
#[derive(Debug, Default)]
pub struct PageStore {
    command: Option<u8>,
    pages: BTreeMap<u8, StructuredResponse>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when an in-progress sequence (a stored page 1) exists for
    /// `command`.
    pub fn has_active(&self, command: u8) -> bool {
        self.command == Some(command) && self.pages.contains_key(&1)
    }

    /// Effective page number for a page claiming to be `0xFF` inside a paged
    /// sequence: one past the highest page stored so far.
    pub fn next_page_number(&self, command: u8) -> u8 {
        if self.command != Some(command) {
            return 1;
        }
        self.pages
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0)
            .saturating_add(1)
    }

    /// Store one page. Page 1 starts a fresh sequence, discarding anything
    /// previously accumulated (an abandoned sequence).
    pub fn add_page(&mut self, command: u8, page_no: u8, response: StructuredResponse) {
        if page_no == 1 {
            self.reset();
        }
        debug!(command, page_no, "storing page");
        self.command = Some(command);
        self.pages.insert(page_no, response);
    }

    /// Merge the terminal frame with all stored pages and fold their chunks
    /// into one response. The store is cleared afterwards.
    pub fn reassemble(&mut self, command: u8, terminal: StructuredResponse) -> StructuredResponse {
        self.add_page(command, terminal.page, terminal.clone());
        let chunks = fold_chunks(self.pages.values());
        debug!(command, pages = self.pages.len(), "reassembled paged response");
        self.reset();
        StructuredResponse { chunks, ..terminal }
    }

    pub fn reset(&mut self) {
        self.command = None;
        self.pages.clear();
    }
}

fn fold_chunks<'a, I>(pages: I) -> Vec<Chunk>
where
    I: Iterator<Item = &'a StructuredResponse>,
{
    let mut merged: Vec<Chunk> = Vec::new();
    for page in pages {
        for chunk in &page.chunks {
            match merged.iter_mut().find(|c| c.index() == chunk.index()) {
                Some(existing) => existing.absorb(chunk),
                None => merged.push(chunk.clone()),
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::PageStore;
    use crate::protocols::powerlink::parser::{Chunk, DataChunk, StructuredResponse};
    use crate::protocols::powerlink::tables::MessageType;

    fn page(message_type: MessageType, page_no: u8, chunks: Vec<Chunk>) -> StructuredResponse {
        StructuredResponse {
            message_type,
            command: 0x2A,
            declared_length: 0,
            page: page_no,
            params: None,
            chunks,
            counter: 0,
        }
    }

    fn chunk(index: u8, bytes: &[u8]) -> Chunk {
        Chunk::Data(DataChunk {
            data_type: 8,
            index,
            length: bytes.len() as u16,
            elements: bytes.iter().map(|b| vec![*b]).collect(),
        })
    }

    #[test]
    fn merges_same_index_across_pages() {
        let mut store = PageStore::new();
        store.add_page(
            0x2A,
            1,
            page(MessageType::PagedResponse, 1, vec![chunk(3, &[1, 2])]),
        );
        store.add_page(
            0x2A,
            2,
            page(MessageType::PagedResponse, 2, vec![chunk(3, &[3])]),
        );

        let merged = store.reassemble(
            0x2A,
            page(MessageType::Response, 0xFF, vec![chunk(3, &[4])]),
        );

        assert_eq!(merged.chunks.len(), 1);
        let data = merged.chunks[0].data();
        assert_eq!(data.length, 4);
        assert_eq!(data.flat(), vec![1, 2, 3, 4]);
        assert!(!store.has_active(0x2A));
    }

    #[test]
    fn distinct_indices_pass_through() {
        let mut store = PageStore::new();
        store.add_page(
            0x2A,
            1,
            page(MessageType::PagedResponse, 1, vec![chunk(3, &[1])]),
        );

        let merged = store.reassemble(
            0x2A,
            page(MessageType::Response, 0xFF, vec![chunk(5, &[9])]),
        );

        assert_eq!(merged.chunks.len(), 2);
        assert_eq!(merged.chunks[0].index(), 3);
        assert_eq!(merged.chunks[1].index(), 5);
    }

    #[test]
    fn page_one_resets_abandoned_sequence() {
        let mut store = PageStore::new();
        store.add_page(
            0x17,
            1,
            page(MessageType::PagedResponse, 1, vec![chunk(3, &[7, 7])]),
        );
        // New sequence for a different command abandons the old one.
        store.add_page(
            0x2A,
            1,
            page(MessageType::PagedResponse, 1, vec![chunk(3, &[1])]),
        );
        assert!(!store.has_active(0x17));
        assert!(store.has_active(0x2A));

        let merged = store.reassemble(
            0x2A,
            page(MessageType::Response, 0xFF, vec![chunk(3, &[2])]),
        );
        assert_eq!(merged.chunks[0].data().flat(), vec![1, 2]);
    }

    #[test]
    fn next_page_number_counts_from_highest_seen() {
        let mut store = PageStore::new();
        assert_eq!(store.next_page_number(0x1F), 1);
        store.add_page(
            0x1F,
            1,
            page(MessageType::PagedResponse, 0xFF, vec![chunk(3, &[1])]),
        );
        assert_eq!(store.next_page_number(0x1F), 2);
        store.add_page(
            0x1F,
            2,
            page(MessageType::PagedResponse, 0xFF, vec![chunk(3, &[2])]),
        );
        assert_eq!(store.next_page_number(0x1F), 3);
        // A different command starts from scratch.
        assert_eq!(store.next_page_number(0x2A), 1);
    }

    #[test]
    fn single_frame_equals_paged_split() {
        // Reassembly merge law: one frame with the whole payload must equal
        // the same payload split across pages.
        let whole = page(MessageType::Response, 0xFF, vec![chunk(3, &[1, 2, 3, 4])]);

        let mut store = PageStore::new();
        store.add_page(
            0x2A,
            1,
            page(MessageType::PagedResponse, 1, vec![chunk(3, &[1, 2])]),
        );
        let merged = store.reassemble(
            0x2A,
            page(MessageType::Response, 0xFF, vec![chunk(3, &[3, 4])]),
        );

        assert_eq!(merged.chunks, whole.chunks);
    }
}
