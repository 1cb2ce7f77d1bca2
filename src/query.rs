//! Filtering, ordering and lookup over a loaded collection.

use crate::types::{Config, Priority, SortField, SortOrder, Todo};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Listing filter built with chained setters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    /// Include completed todos
    pub show_all: bool,
    /// Case-insensitive category match
    pub category: Option<String>,
    pub priority: Option<Priority>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter for `list`: completed todos appear only with `--all` or
    /// when `show_completed` is turned on in the config.
    pub fn for_listing(show_all: bool, config: &Config) -> Self {
        Self::new().show_all(show_all || config.show_completed)
    }

    pub fn show_all(mut self, show_all: bool) -> Self {
        self.show_all = show_all;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Whether a single todo passes the filter.
    pub fn matches(&self, todo: &Todo) -> bool {
        if !self.show_all && todo.completed {
            return false;
        }
        if let Some(category) = &self.category
            && !todo.category.eq_ignore_ascii_case(category)
        {
            return false;
        }
        self.priority.is_none_or(|p| todo.priority == p)
    }

    /// Keep the todos that pass, preserving order.
    pub fn apply(&self, todos: Vec<Todo>) -> Vec<Todo> {
        todos.into_iter().filter(|t| self.matches(t)).collect()
    }
}

/// Default listing order: open first, then by priority, then oldest first.
pub fn sort_for_display(todos: &mut [Todo]) {
    todos.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Order by a configured field. Undated todos sort after dated ones
/// regardless of direction.
pub fn sort_by_config(todos: &mut [Todo], field: SortField, order: SortOrder) {
    let directed = |ordering: Ordering| match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    };

    todos.sort_by(|a, b| match field {
        SortField::CreatedAt => directed(a.created_at.cmp(&b.created_at)),
        SortField::Priority => directed(b.priority.rank().cmp(&a.priority.rank())),
        SortField::Title => directed(a.title.to_lowercase().cmp(&b.title.to_lowercase())),
        SortField::DueDate => match (&a.due_date, &b.due_date) {
            (Some(x), Some(y)) => directed(x.cmp(y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    });
}

/// Outcome of resolving a shortened id.
#[derive(Debug, Clone, PartialEq)]
pub enum PrefixMatch {
    None,
    One(Todo),
    /// Number of todos sharing the prefix
    Many(usize),
}

/// Find the todo whose id starts with `prefix`.
pub fn resolve_prefix(todos: &[Todo], prefix: &str) -> PrefixMatch {
    let mut matching = todos.iter().filter(|t| t.id.starts_with(prefix));
    match (matching.next(), matching.count()) {
        (None, _) => PrefixMatch::None,
        (Some(todo), 0) => PrefixMatch::One(todo.clone()),
        (Some(_), rest) => PrefixMatch::Many(rest + 1),
    }
}

/// Summary counts over a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    /// Incomplete todos, by priority
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub overdue: usize,
    /// Incomplete todos per non-empty category, largest first
    pub categories: Vec<(String, usize)>,
}

impl Stats {
    pub fn from_todos(todos: &[Todo]) -> Self {
        let mut stats = Stats {
            total: todos.len(),
            ..Default::default()
        };
        let mut categories: HashMap<&str, usize> = HashMap::new();

        for todo in todos {
            if todo.completed {
                stats.completed += 1;
                continue;
            }

            stats.active += 1;
            match todo.priority {
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
            if todo.is_overdue() {
                stats.overdue += 1;
            }
            if !todo.category.is_empty() {
                *categories.entry(todo.category.as_str()).or_default() += 1;
            }
        }

        let mut categories: Vec<(String, usize)> =
            categories.into_iter().map(|(name, count)| (name.to_string(), count)).collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats.categories = categories;

        stats
    }

    /// Completed share as a percentage; 0 for an empty collection.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}
