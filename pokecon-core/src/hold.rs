//! Inputs that stay asserted across session calls.

use crate::input::Input;

/// Upper bound on simultaneously held inputs.
pub const MAX_HELD: usize = 32;

/// Ordered set of held inputs, at most one of them a touch.
#[derive(Clone, Debug, Default)]
pub struct HoldSet {
    items: heapless::Vec<Input, MAX_HELD>,
}

impl HoldSet {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: heapless::Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, input: &Input) -> bool {
        self.items.contains(input)
    }

    #[inline]
    #[must_use]
    pub fn has_touch(&self) -> bool {
        self.items.iter().any(Input::is_touch)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Input> {
        self.items.iter()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Input] {
        &self.items
    }

    /// Append an input. A touch replaces any held touch.
    ///
    /// Hands the input back if the set is full.
    pub(crate) fn push(&mut self, input: Input) -> Result<(), Input> {
        if input.is_touch() {
            self.evict_touch();
        }
        self.items.push(input)
    }

    /// Drop `input` from the set. Any touch input drops the held touch.
    ///
    /// Returns whether something was removed.
    pub(crate) fn remove(&mut self, input: &Input) -> bool {
        if input.is_touch() {
            return self.evict_touch();
        }
        match self.items.iter().position(|held| held == input) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop the held touch, if any.
    pub(crate) fn evict_touch(&mut self) -> bool {
        let before = self.items.len();
        self.items.retain(|held| !held.is_touch());
        self.items.len() != before
    }

    /// Empty the set, returning its previous contents.
    pub(crate) fn take(&mut self) -> Self {
        core::mem::take(self)
    }
}

impl<'a> IntoIterator for &'a HoldSet {
    type Item = &'a Input;
    type IntoIter = core::slice::Iter<'a, Input>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
