//! Builder pattern API for adding todos.

use crate::storage::TodoStorage;
use crate::types::{Priority, Todo, parse_iso_datetime};
use eyre::{Context, Result};

/// Builder for adding todos with a fluent API.
///
/// # Example
///
/// ```no_run
/// use todocli::{Priority, StorageBuilderExt, TodoStorage};
///
/// let storage = TodoStorage::open_default();
/// let todo = storage
///     .build("Renew passport")
///     .priority(Priority::High)
///     .category("admin")
///     .due_date("2030-05-01")
///     .create()?;
/// # Ok::<(), eyre::Report>(())
/// ```
pub struct TodoBuilder<'a> {
    storage: &'a TodoStorage,
    todo: Todo,
}

impl<'a> TodoBuilder<'a> {
    /// Create a new builder with the given title.
    pub fn new(storage: &'a TodoStorage, title: impl Into<String>) -> Self {
        Self {
            storage,
            todo: Todo::new(title),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.todo.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.todo.priority = priority;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.todo.category = category.into();
        self
    }

    /// Set the due date (`YYYY-MM-DD`, or a full ISO datetime).
    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.todo.due_date = Some(due_date.into());
        self
    }

    /// The todo as built so far, without persisting it.
    pub fn into_todo(self) -> Todo {
        self.todo
    }

    /// Check the due date and append the todo to storage.
    pub fn create(self) -> Result<Todo> {
        if let Some(due) = &self.todo.due_date
            && parse_iso_datetime(due).is_none()
        {
            eyre::bail!("Invalid due date '{}': use YYYY-MM-DD", due);
        }

        self.storage.add(self.todo.clone()).context("Failed to add todo")?;
        Ok(self.todo)
    }
}

/// Extension trait to add builder method to TodoStorage.
pub trait StorageBuilderExt {
    /// Start building a new todo with the given title.
    fn build(&self, title: impl Into<String>) -> TodoBuilder<'_>;
}

impl StorageBuilderExt for TodoStorage {
    fn build(&self, title: impl Into<String>) -> TodoBuilder<'_> {
        TodoBuilder::new(self, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_storage() -> (TempDir, TodoStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = TodoStorage::new(temp_dir.path().join("todos.json"));
        (temp_dir, storage)
    }

    #[test]
    fn test_builder_basic() {
        let (_temp_dir, storage) = setup_test_storage();

        let todo = storage.build("Test task").create().unwrap();

        assert_eq!(todo.title, "Test task");
        assert_eq!(todo.priority, Priority::Medium);
        assert!(todo.description.is_empty());
        assert!(todo.due_date.is_none());
        assert_eq!(storage.get(&todo.id).unwrap(), Some(todo));
    }

    #[test]
    fn test_builder_with_all_fields() {
        let (_temp_dir, storage) = setup_test_storage();

        let todo = storage
            .build("Complex task")
            .description("A detailed description")
            .priority(Priority::High)
            .category("work")
            .due_date("2031-01-15")
            .create()
            .unwrap();

        assert_eq!(todo.description, "A detailed description");
        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.category, "work");
        assert_eq!(todo.due_date.as_deref(), Some("2031-01-15"));
    }

    #[test]
    fn test_builder_rejects_bad_due_date() {
        let (_temp_dir, storage) = setup_test_storage();

        let result = storage.build("Task").due_date("31/01/2031").create();

        assert!(result.is_err());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_into_todo_does_not_persist() {
        let (_temp_dir, storage) = setup_test_storage();

        let todo = storage.build("Draft").category("ideas").into_todo();

        assert_eq!(todo.category, "ideas");
        assert!(storage.load().unwrap().is_empty());
    }
}
