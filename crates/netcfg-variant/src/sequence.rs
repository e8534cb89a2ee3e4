//! Owned element buffers grown in fixed-size chunks.

use crate::errors::AllocationError;

/// Sequences reserve capacity in multiples of this many elements.
pub const ARRAY_CHUNK: usize = 32;

/// Smallest multiple of [`ARRAY_CHUNK`] able to hold `len` elements, or
/// `None` if that overflows `usize`.
#[must_use]
pub const fn chunked_capacity(len: usize) -> Option<usize> {
    len.checked_next_multiple_of(ARRAY_CHUNK)
}

/// Growable buffer backing the array kinds of [`crate::Value`].
///
/// Only the first `len()` elements exist; spare capacity is never exposed.
/// Growth reports [`AllocationError`] instead of aborting the process.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sequence<T> {
    items: Vec<T>,
}

impl<T> Sequence<T> {
    /// Empty sequence without any allocation.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Copies `data` into a freshly allocated sequence.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError`] when the buffer cannot be reserved.
    pub fn from_slice(data: &[T]) -> Result<Self, AllocationError>
    where
        T: Clone,
    {
        let mut sequence = Self::new();
        sequence.reserve(data.len())?;
        sequence.items.extend_from_slice(data);
        Ok(sequence)
    }

    /// Appends one element, growing by a whole chunk when full.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError`] when the buffer cannot grow.
    pub fn push(&mut self, item: T) -> Result<(), AllocationError> {
        self.reserve(1)?;
        self.items.push(item);
        Ok(())
    }

    fn reserve(&mut self, additional: usize) -> Result<(), AllocationError> {
        let len = self.items.len();
        let wanted = len
            .checked_add(additional)
            .ok_or_else(|| AllocationError::overflow(usize::MAX))?;
        if wanted <= self.items.capacity() {
            return Ok(());
        }
        let target = chunked_capacity(wanted).ok_or_else(|| AllocationError::overflow(wanted))?;
        self.items
            .try_reserve_exact(target - len)
            .map_err(|source| AllocationError {
                elements: target,
                source: Some(source),
            })
    }

    /// Number of initialised elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sequence holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reserved element capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// The initialised elements.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterates over the initialised elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
