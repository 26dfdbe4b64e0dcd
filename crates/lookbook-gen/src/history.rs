//! Linear undo/redo history of generation results
//!
//! Pushing after an undo discards the undone batches; no redo branches are
//! kept.

use lookbook_core::DataUrl;

/// One produced image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Index of the batch item that produced it
    pub item_index: usize,
    /// The finalized prompt sent for this item
    pub prompt: String,
    /// Displayable, downloadable image
    pub image: DataUrl,
}

/// The images produced by one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationBatch {
    pub images: Vec<GeneratedImage>,
}

impl GenerationBatch {
    pub fn new(images: Vec<GeneratedImage>) -> Self {
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Sequence of batches with a movable cursor.
///
/// The cursor is `None` exactly when the history is empty, and otherwise
/// points at a stored batch.
#[derive(Debug, Default)]
pub struct HistoryStore {
    batches: Vec<GenerationBatch>,
    cursor: Option<usize>,
}

static EMPTY_BATCH: GenerationBatch = GenerationBatch { images: Vec::new() };

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything after the cursor, append `batch`, and move onto it
    pub fn push(&mut self, batch: GenerationBatch) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.batches.truncate(keep);
        self.batches.push(batch);
        self.cursor = Some(self.batches.len() - 1);
    }

    /// The batch at the cursor, or an empty batch before the first push
    pub fn current(&self) -> &GenerationBatch {
        self.cursor
            .and_then(|c| self.batches.get(c))
            .unwrap_or(&EMPTY_BATCH)
    }

    /// Step back one batch. No-op (returns `None`) at the first batch.
    pub fn undo(&mut self) -> Option<&GenerationBatch> {
        if !self.can_undo() {
            return None;
        }
        self.cursor = self.cursor.map(|c| c - 1);
        Some(self.current())
    }

    /// Step forward one batch. No-op (returns `None`) at the last batch.
    pub fn redo(&mut self) -> Option<&GenerationBatch> {
        if !self.can_redo() {
            return None;
        }
        self.cursor = self.cursor.map(|c| c + 1);
        Some(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.batches.len())
    }

    /// Forget every batch (mode switch)
    pub fn reset(&mut self) {
        self.batches.clear();
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
