//! Pagination cursor: incremental reveal of an ordered sequence in fixed-size chunks.

/// Default number of items revealed per chunk.
pub const DEFAULT_PAGE_SIZE: usize = 40;

/// A cursor over an owned sequence.
///
/// Invariant: `0 <= position <= len`. Each [`next_chunk`](Self::next_chunk)
/// returns `items[position..min(position + page_size, len)]` and advances.
#[derive(Debug, Clone)]
pub struct PageCursor<T> {
    items: Vec<T>,
    position: usize,
    page_size: usize,
}

impl<T> PageCursor<T> {
    /// A page size of zero is treated as one.
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            position: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn with_default_page_size(items: Vec<T>) -> Self {
        Self::new(items, DEFAULT_PAGE_SIZE)
    }

    /// Replace the sequence and rewind.
    pub fn reset(&mut self, items: Vec<T>) {
        self.items = items;
        self.position = 0;
    }

    /// Reveal the next chunk; empty once exhausted.
    pub fn next_chunk(&mut self) -> &[T] {
        let start = self.position;
        let end = start.saturating_add(self.page_size).min(self.items.len());
        self.position = end;
        &self.items[start..end]
    }

    pub fn has_more(&self) -> bool {
        self.position < self.items.len()
    }

    /// Number of items revealed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Everything revealed so far.
    pub fn revealed(&self) -> &[T] {
        &self.items[..self.position]
    }

    /// The whole underlying sequence, revealed or not.
    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T> Default for PageCursor<T> {
    fn default() -> Self {
        Self::with_default_page_size(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_in_chunks_until_exhausted() {
        let mut c = PageCursor::new((0..95).collect::<Vec<_>>(), 40);
        assert_eq!(c.next_chunk().len(), 40);
        assert_eq!(c.position(), 40);
        assert_eq!(c.next_chunk().len(), 40);
        assert!(c.has_more());
        let last = c.next_chunk().to_vec();
        assert_eq!(last, (80..95).collect::<Vec<_>>());
        assert!(!c.has_more());
        assert!(c.next_chunk().is_empty());
        assert_eq!(c.position(), 95);
        assert_eq!(c.revealed().len(), 95);
    }

    #[test]
    fn empty_sequence_has_nothing() {
        let mut c: PageCursor<u8> = PageCursor::default();
        assert!(!c.has_more());
        assert!(c.next_chunk().is_empty());
        assert_eq!(c.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn zero_page_size_is_coerced() {
        let mut c = PageCursor::new(vec![1, 2], 0);
        assert_eq!(c.page_size(), 1);
        assert_eq!(c.next_chunk(), &[1]);
    }

    #[test]
    fn huge_page_size_reveals_everything_once() {
        let mut c = PageCursor::new(vec![1, 2, 3], usize::MAX);
        assert_eq!(c.next_chunk(), &[1, 2, 3]);
        assert!(!c.has_more());
        assert!(c.next_chunk().is_empty());
        assert!(c.next_chunk().is_empty());
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn reset_rewinds() {
        let mut c = PageCursor::new(vec![1, 2, 3], 2);
        c.next_chunk();
        c.reset(vec![7, 8, 9]);
        assert_eq!(c.position(), 0);
        assert_eq!(c.next_chunk(), &[7, 8]);
    }
}
