//! Shared test infrastructure for todocli integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;
use todocli::{Priority, StorageBuilderExt, Todo, TodoStorage};

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub storage: TodoStorage,
}

impl TestEnv {
    /// Create a new test environment with storage at `<tmp>/todos.json`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = TodoStorage::new(temp_dir.path().join("todos.json"));
        Self { temp_dir, storage }
    }

    /// Path of the items file.
    pub fn data_path(&self) -> PathBuf {
        self.storage.path().to_path_buf()
    }

    /// Add a todo with default priority.
    pub fn add_todo(&self, title: &str) -> Todo {
        self.storage.build(title).create().expect("Failed to add todo")
    }

    /// Add a todo with specified priority.
    pub fn add_todo_with_priority(&self, title: &str, priority: Priority) -> Todo {
        self.storage
            .build(title)
            .priority(priority)
            .create()
            .expect("Failed to add todo")
    }

    /// Add a todo with a category.
    pub fn add_todo_with_category(&self, title: &str, category: &str) -> Todo {
        self.storage
            .build(title)
            .category(category)
            .create()
            .expect("Failed to add todo")
    }

    /// Mark a stored todo completed.
    pub fn complete(&self, todo: &Todo) -> Todo {
        let mut todo = todo.clone();
        todo.mark_completed();
        assert!(self.storage.update(&todo).expect("Failed to update todo"));
        todo
    }

    /// Get all todos count.
    pub fn total_count(&self) -> usize {
        self.storage.list().expect("Failed to list todos").len()
    }

    /// Get completed todos count.
    pub fn completed_count(&self) -> usize {
        self.storage
            .list()
            .expect("Failed to list todos")
            .iter()
            .filter(|t| t.completed)
            .count()
    }

    /// Ids in stored order.
    pub fn ids(&self) -> Vec<String> {
        self.storage
            .list()
            .expect("Failed to list todos")
            .into_iter()
            .map(|t| t.id)
            .collect()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
