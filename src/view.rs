//! Derived views of the task list.
//!
//! The view is a pure function of the task list, a category filter and a
//! sort key. Renderers call it on every draw; nothing is cached.

use std::cmp::Ordering;

use crate::fields::{CategoryFilter, SortKey};
use crate::task::Task;

/// Filter `tasks` by category and order the result by `sort`.
///
/// Sorting is stable. Under [`SortKey::Date`], tasks whose due date is
/// missing or not a valid date come after every dated task.
pub fn derive_view<'a>(tasks: &'a [Task], filter: CategoryFilter, sort: SortKey) -> Vec<&'a Task> {
    let mut view: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t.category)).collect();
    match sort {
        SortKey::Priority => view.sort_by_key(|t| t.priority.rank()),
        SortKey::Date => view.sort_by(|a, b| compare_due(a, b)),
    }
    view
}

fn compare_due(a: &Task, b: &Task) -> Ordering {
    match (a.due(), b.due()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Category, Priority};
    use crate::task::TaskId;

    fn task(id: &str, category: Category, priority: Priority, due: &str) -> Task {
        Task {
            id: TaskId::from(id),
            text: id.to_string(),
            category,
            priority,
            due_date: due.to_string(),
            completed: false,
        }
    }

    fn ids(view: &[&Task]) -> Vec<String> {
        view.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn test_priority_sort() {
        let tasks = vec![
            task("low", Category::Work, Priority::Low, ""),
            task("high", Category::Work, Priority::High, ""),
            task("medium", Category::Work, Priority::Medium, ""),
        ];
        let view = derive_view(&tasks, CategoryFilter::All, SortKey::Priority);
        let priorities: Vec<Priority> = view.iter().map(|t| t.priority).collect();
        assert_eq!(priorities, vec![Priority::High, Priority::Medium, Priority::Low]);
    }

    #[test]
    fn test_priority_sort_is_stable() {
        let tasks = vec![
            task("a", Category::Work, Priority::Low, ""),
            task("b", Category::Work, Priority::High, ""),
            task("c", Category::Personal, Priority::Low, ""),
            task("d", Category::Urgent, Priority::High, ""),
        ];
        let view = derive_view(&tasks, CategoryFilter::All, SortKey::Priority);
        assert_eq!(ids(&view), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_filter_is_ordered_sublist() {
        let tasks = vec![
            task("w1", Category::Work, Priority::Medium, ""),
            task("p1", Category::Personal, Priority::Medium, ""),
            task("w2", Category::Work, Priority::Medium, ""),
            task("u1", Category::Urgent, Priority::Medium, ""),
        ];
        let view = derive_view(&tasks, CategoryFilter::Work, SortKey::Priority);
        assert!(view.iter().all(|t| t.category == Category::Work));
        assert_eq!(ids(&view), vec!["w1", "w2"]);

        let all = derive_view(&tasks, CategoryFilter::All, SortKey::Priority);
        assert_eq!(all.len(), tasks.len());
    }

    #[test]
    fn test_date_sort_puts_missing_and_invalid_last() {
        let tasks = vec![
            task("none", Category::Work, Priority::Medium, ""),
            task("late", Category::Work, Priority::Medium, "2024-09-01"),
            task("bogus", Category::Work, Priority::Medium, "someday"),
            task("early", Category::Work, Priority::Medium, "2024-01-15"),
        ];
        let view = derive_view(&tasks, CategoryFilter::All, SortKey::Date);
        assert_eq!(ids(&view), vec!["early", "late", "none", "bogus"]);
    }

    #[test]
    fn test_derive_view_is_idempotent() {
        let tasks = vec![
            task("a", Category::Urgent, Priority::Low, "2024-03-01"),
            task("b", Category::Urgent, Priority::High, ""),
            task("c", Category::Work, Priority::Medium, "2024-02-01"),
        ];
        for sort in [SortKey::Priority, SortKey::Date] {
            let first = derive_view(&tasks, CategoryFilter::Urgent, sort);
            let second = derive_view(&tasks, CategoryFilter::Urgent, sort);
            assert_eq!(first, second);
        }
    }
}
