//! Enumerations and field types for tasks.
//!
//! This module defines the closed value sets a task is classified by
//! (category, priority) and the view controls used to project the task
//! list (category filter, sort key).

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The area of life a task belongs to.
///
/// Persisted with the capitalised names used by the browser widget
/// (`"Work"`, `"Personal"`, `"Urgent"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    #[serde(alias = "work")]
    Work,
    #[serde(alias = "personal")]
    Personal,
    #[serde(alias = "urgent")]
    Urgent,
}

impl Category {
    #[cfg(test)]
    pub const ALL: [Category; 3] = [Category::Work, Category::Personal, Category::Urgent];

    /// The next category in selector order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Category::Work => Category::Personal,
            Category::Personal => Category::Urgent,
            Category::Urgent => Category::Work,
        }
    }

    /// The previous category in selector order, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            Category::Work => Category::Urgent,
            Category::Personal => Category::Work,
            Category::Urgent => Category::Personal,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Urgent => "Urgent",
        })
    }
}

/// Task importance. Sorts High first, then Medium, then Low.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    #[serde(alias = "high")]
    High,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

impl Priority {
    #[cfg(test)]
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort rank: High = 1, Medium = 2, Low = 3.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Priority::High => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::High,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Priority::High => Priority::Low,
            Priority::Medium => Priority::High,
            Priority::Low => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        })
    }
}

/// Category filter applied to the task list view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryFilter {
    #[default]
    #[serde(alias = "All")]
    All,
    #[serde(alias = "Work")]
    Work,
    #[serde(alias = "Personal")]
    Personal,
    #[serde(alias = "Urgent")]
    Urgent,
}

impl CategoryFilter {
    /// Whether a task of the given category passes this filter.
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Work => category == Category::Work,
            CategoryFilter::Personal => category == Category::Personal,
            CategoryFilter::Urgent => category == Category::Urgent,
        }
    }

    /// All -> Work -> Personal -> Urgent -> All.
    pub fn cycle(self) -> Self {
        match self {
            CategoryFilter::All => CategoryFilter::Work,
            CategoryFilter::Work => CategoryFilter::Personal,
            CategoryFilter::Personal => CategoryFilter::Urgent,
            CategoryFilter::Urgent => CategoryFilter::All,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.pad("All"),
            CategoryFilter::Work => fmt::Display::fmt(&Category::Work, f),
            CategoryFilter::Personal => fmt::Display::fmt(&Category::Personal, f),
            CategoryFilter::Urgent => fmt::Display::fmt(&Category::Urgent, f),
        }
    }
}

/// Available sorting options for the task list view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Priority,
    Date,
}

impl SortKey {
    /// Flip between priority and date ordering.
    pub fn toggle(self) -> Self {
        match self {
            SortKey::Priority => SortKey::Date,
            SortKey::Date => SortKey::Priority,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            SortKey::Priority => "Priority",
            SortKey::Date => "Date",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn test_filter_cycle_returns_to_all() {
        let mut f = CategoryFilter::All;
        for _ in 0..4 {
            f = f.cycle();
        }
        assert_eq!(f, CategoryFilter::All);
        assert!(CategoryFilter::All.matches(Category::Urgent));
        assert!(!CategoryFilter::Work.matches(Category::Personal));
    }

    #[test]
    fn test_selector_next_prev_are_inverse() {
        for c in Category::ALL {
            assert_eq!(c.next().prev(), c);
        }
        for p in Priority::ALL {
            assert_eq!(p.next().prev(), p);
        }
    }

    #[test]
    fn test_category_serialises_with_widget_names() {
        assert_eq!(serde_json::to_string(&Category::Personal).unwrap(), "\"Personal\"");
        let p: Priority = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(p, Priority::High);
    }

    #[test]
    fn test_sort_toggle() {
        assert_eq!(SortKey::Priority.toggle(), SortKey::Date);
        assert_eq!(SortKey::Date.toggle(), SortKey::Priority);
    }
}
