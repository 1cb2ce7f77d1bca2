//! todocli: a todo list persisted as a JSON file.
//!
//! The library holds the item model, whole-file storage for todos and
//! config, and pure helpers for filtering and summarising a collection.
//! It performs no terminal I/O.
//!
//! # Example
//!
//! ```no_run
//! use todocli::{Priority, StorageBuilderExt, TodoStorage};
//!
//! let storage = TodoStorage::new("/tmp/todos.json");
//!
//! let todo = storage.build("Buy milk").priority(Priority::High).create().unwrap();
//!
//! let mut done = storage.get(&todo.id).unwrap().unwrap();
//! done.mark_completed();
//! assert!(storage.update(&done).unwrap());
//!
//! assert_eq!(storage.clear_completed().unwrap(), 1);
//! assert!(storage.list().unwrap().is_empty());
//! ```

mod builder;
mod query;
mod storage;
mod types;

// Re-export public API
pub use builder::{StorageBuilderExt, TodoBuilder};
pub use query::{Filter, PrefixMatch, Stats, resolve_prefix, sort_by_config, sort_for_display};
pub use storage::{ConfigStorage, TodoStorage, expand_home};
pub use types::{
    Config, DEFAULT_CONFIG_FILE, DEFAULT_DATA_FILE, ModelError, Priority, SortField, SortOrder, Todo, now_timestamp,
    parse_iso_datetime,
};
