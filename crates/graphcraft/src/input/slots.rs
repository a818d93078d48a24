//! Auto-growing cell sequences
//!
//! A [`SlotList`] always ends with an empty cell once its last cell has been
//! filled, so a form always offers one more place to type.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::GraphError;

/// Result of editing one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotUpdate {
    /// True when the edit appended a new trailing empty cell
    pub grew: bool,
}

/// Ordered sequence of text cells with auto-grow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SlotList {
    cells: Vec<String>,
}

impl SlotList {
    /// A list holding a single empty cell
    pub fn new() -> Self {
        Self {
            cells: vec![String::new()],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: every constructor leaves at least one cell and edits never remove one
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Raw cell contents, untrimmed
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Set a cell, appending an empty cell when the last one gets content
    pub fn update(&mut self, index: usize, value: impl Into<String>) -> Result<SlotUpdate, GraphError> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(GraphError::SlotOutOfRange { index, len })?;
        *cell = value.into();

        let grew = index == len - 1 && !cell.trim().is_empty();
        if grew {
            self.cells.push(String::new());
            trace!(index, len = self.cells.len(), "Slot list grew");
        }
        Ok(SlotUpdate { grew })
    }

    /// Re-apply a cell's current value, as a submit keystroke does
    pub fn submit(&mut self, index: usize) -> Result<SlotUpdate, GraphError> {
        let value = self
            .get(index)
            .ok_or(GraphError::SlotOutOfRange {
                index,
                len: self.cells.len(),
            })?
            .to_string();
        self.update(index, value)
    }

    /// Non-blank cells as `(index, trimmed value)`
    pub fn filled(&self) -> impl Iterator<Item = (usize, &str)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (i, cell.trim()))
            .filter(|(_, cell)| !cell.is_empty())
    }

    fn ensure_trailing_slot(&mut self) {
        if self.cells.last().map_or(true, |cell| !cell.trim().is_empty()) {
            self.cells.push(String::new());
        }
    }
}

impl Default for SlotList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<String>> for SlotList {
    fn from(cells: Vec<String>) -> Self {
        let mut list = Self { cells };
        list.ensure_trailing_slot();
        list
    }
}

impl From<SlotList> for Vec<String> {
    fn from(list: SlotList) -> Self {
        list.cells
    }
}

impl<S: Into<String>> FromIterator<S> for SlotList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        iter.into_iter().map(Into::into).collect::<Vec<String>>().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_list_has_one_empty_slot() {
        let list = SlotList::new();
        assert_eq!(list.cells(), &[String::new()]);
    }

    #[test]
    fn test_filling_last_slot_grows_by_one() {
        let mut list = SlotList::new();
        let update = list.update(0, "A").unwrap();
        assert!(update.grew);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1), Some(""));
    }

    #[test]
    fn test_whitespace_does_not_grow() {
        let mut list = SlotList::new();
        assert!(!list.update(0, "   ").unwrap().grew);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_editing_inner_slot_does_not_grow() {
        let mut list: SlotList = ["A", "B"].into_iter().collect();
        assert_eq!(list.len(), 3);
        assert!(!list.update(0, "C").unwrap().grew);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_clearing_cell_keeps_length() {
        let mut list: SlotList = ["A"].into_iter().collect();
        list.update(0, "").unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_submit_is_idempotent() {
        let mut list = SlotList::new();
        list.update(0, "A").unwrap();
        let snapshot = list.clone();
        assert!(!list.submit(0).unwrap().grew);
        assert_eq!(list, snapshot);
    }

    #[test]
    fn test_never_empty() {
        assert!(!SlotList::new().is_empty());
        assert!(!SlotList::from(Vec::new()).is_empty());
        assert!(!std::iter::empty::<&str>().collect::<SlotList>().is_empty());
    }

    #[test]
    fn test_out_of_range() {
        let mut list = SlotList::new();
        assert!(matches!(
            list.update(3, "x"),
            Err(GraphError::SlotOutOfRange { index: 3, len: 1 })
        ));
        assert!(list.submit(1).is_err());
    }

    #[test]
    fn test_filled_trims_and_skips_blank() {
        let list: SlotList = vec!["  X  ".to_string(), "".to_string(), "Y".to_string()].into();
        let filled: Vec<_> = list.filled().collect();
        assert_eq!(filled, vec![(0, "X"), (2, "Y")]);
    }

    #[test]
    fn test_deserialize_restores_trailing_slot() {
        let list: SlotList = serde_json::from_str(r#"["A", "B"]"#).unwrap();
        assert_eq!(list.len(), 3);
        let empty: SlotList = serde_json::from_str("[]").unwrap();
        assert_eq!(empty.len(), 1);
        assert!(!empty.is_empty());
    }
}
