//! Data models for alloc-book.
//!
//! - `BookConfig` - The persisted state: page totals and pinned lecture counts
//! - `Allocation` - The derived per-lecture page counts shown to the user

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Persisted allocation state for one textbook.
///
/// `page_list` has one entry per lecture; `None` marks a lecture whose page
/// count is derived instead of pinned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookConfig {
    /// Leading pages excluded from every lecture
    pub prefaces: i64,

    /// Total number of pages in the textbook, prefaces included
    pub total_pages: i64,

    /// Pinned page count per lecture
    #[serde(rename = "page_list")]
    pub confirmed: Vec<Option<i64>>,
}

impl BookConfig {
    /// Create a config with every lecture unpinned.
    pub fn new(total_pages: i64, lectures: usize, prefaces: i64) -> Result<Self> {
        let config = Self {
            prefaces,
            total_pages,
            confirmed: vec![None; lectures],
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the value ranges a config file must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.total_pages <= 0 {
            return Err(Error::InvalidConfig(format!(
                "total_pages must be positive, got {}",
                self.total_pages
            )));
        }
        if self.prefaces < 0 {
            return Err(Error::InvalidConfig(format!(
                "prefaces must not be negative, got {}",
                self.prefaces
            )));
        }
        if self.confirmed.is_empty() {
            return Err(Error::InvalidConfig(
                "page_list must contain at least one lecture".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of lectures.
    pub fn lectures(&self) -> usize {
        self.confirmed.len()
    }

    /// Pages available to lectures once prefaces are removed.
    pub fn available_pages(&self) -> i64 {
        self.total_pages - self.prefaces
    }

    /// Sum of every pinned page count.
    pub fn pinned_pages(&self) -> Result<i64> {
        checked_sum(self.confirmed.iter().flatten().copied())
    }

    /// Whether lecture `index` (0-based) has a pinned count.
    pub fn is_pinned(&self, index: usize) -> bool {
        matches!(self.confirmed.get(index), Some(Some(_)))
    }

    /// Map a 1-based lecture number typed by the user to an index.
    pub fn lecture_index(&self, number: usize) -> Result<usize> {
        if number == 0 || number > self.lectures() {
            return Err(Error::InvalidArgument(format!(
                "lecture {} is out of range (1-{})",
                number,
                self.lectures()
            )));
        }
        Ok(number - 1)
    }
}

/// Derived page count per lecture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub pages: Vec<i64>,
}

impl Allocation {
    /// Page count of lecture `index`.
    pub fn get(&self, index: usize) -> i64 {
        self.pages[index]
    }

    /// Sum of the counts of all lectures before `index`.
    pub fn pages_before(&self, index: usize) -> Result<i64> {
        checked_sum(self.pages[..index].iter().copied())
    }

    /// Sum of every lecture's count.
    pub fn total(&self) -> Result<i64> {
        checked_sum(self.pages.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Sum page counts, failing instead of wrapping on overflow.
pub(crate) fn checked_sum(pages: impl IntoIterator<Item = i64>) -> Result<i64> {
    pages
        .into_iter()
        .try_fold(0i64, |acc, pages| acc.checked_add(pages))
        .ok_or(Error::PageOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_is_unpinned() {
        let config = BookConfig::new(100, 4, 10).unwrap();
        assert_eq!(config.confirmed, vec![None; 4]);
        assert_eq!(config.available_pages(), 90);
        assert_eq!(config.pinned_pages().unwrap(), 0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            BookConfig::new(0, 4, 0),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            BookConfig::new(100, 4, -1),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            BookConfig::new(100, 0, 0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_lecture_index_bounds() {
        let config = BookConfig::new(100, 4, 10).unwrap();
        assert_eq!(config.lecture_index(1).unwrap(), 0);
        assert_eq!(config.lecture_index(4).unwrap(), 3);
        assert!(matches!(
            config.lecture_index(0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            config.lecture_index(5),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_pinned_pages_overflow() {
        let mut config = BookConfig::new(100, 2, 0).unwrap();
        config.confirmed = vec![Some(i64::MAX), Some(1)];
        assert!(matches!(config.pinned_pages(), Err(Error::PageOverflow)));
    }

    #[test]
    fn test_serialized_field_names() {
        let mut config = BookConfig::new(100, 2, 10).unwrap();
        config.confirmed[1] = Some(30);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["prefaces"], 10);
        assert_eq!(json["total_pages"], 100);
        assert_eq!(json["page_list"], serde_json::json!([null, 30]));
    }
}
