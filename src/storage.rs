//! Storage layer: whole-file JSON persistence for todos and config.

use crate::types::{Config, DEFAULT_CONFIG_FILE, DEFAULT_DATA_FILE, Todo};
use eyre::{Context, Result};
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Suffix appended to the file name of a corrupt items file.
const BACKUP_SUFFIX: &str = ".bak";

/// Suffix of the scratch file written before the rename.
const TEMP_SUFFIX: &str = ".tmp";

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let tmp_path = sibling_path(path, TEMP_SUFFIX);
    let result = fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))
        .and_then(|()| fs::rename(&tmp_path, path).with_context(|| format!("Failed to replace {}", path.display())));

    if result.is_err()
        && let Err(e) = fs::remove_file(&tmp_path)
        && e.kind() != ErrorKind::NotFound
    {
        log::warn!("Failed to remove {}: {}", tmp_path.display(), e);
    }
    result
}

/// Read a file, mapping a missing file to `None`.
fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Parse the items file contents into todos.
fn parse_todos(bytes: &[u8]) -> Result<Vec<Todo>> {
    let values: Vec<Value> = serde_json::from_slice(bytes).context("Items file is not a JSON array")?;
    values
        .into_iter()
        .map(|value| Todo::from_value(value).map_err(eyre::Report::new))
        .collect()
}

/// Persistent collection of todos in a single JSON file.
///
/// Each operation reads the whole file, changes it in memory and writes
/// it back. Nothing is cached between calls.
pub struct TodoStorage {
    path: PathBuf,
}

impl TodoStorage {
    /// Storage backed by the given file. No I/O happens here.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: expand_home(path),
        }
    }

    /// Storage at `~/.todocli/todos.json`.
    pub fn open_default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }

    /// The resolved items file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a corrupt items file is moved to.
    pub fn backup_path(&self) -> PathBuf {
        sibling_path(&self.path, BACKUP_SUFFIX)
    }

    /// Load every todo.
    ///
    /// A missing file yields an empty list. A file that cannot be parsed
    /// is moved to the backup path and also yields an empty list; if the
    /// move fails the error is returned and the file is left in place.
    pub fn load(&self) -> Result<Vec<Todo>> {
        let Some(bytes) = read_if_exists(&self.path)? else {
            return Ok(Vec::new());
        };

        match parse_todos(&bytes) {
            Ok(todos) => {
                log::debug!("Loaded {} todo(s) from {}", todos.len(), self.path.display());
                Ok(todos)
            }
            Err(e) => {
                self.back_up_corrupt_file(&e)?;
                Ok(Vec::new())
            }
        }
    }

    /// Alias for `load`, in stored order.
    pub fn list(&self) -> Result<Vec<Todo>> {
        self.load()
    }

    fn back_up_corrupt_file(&self, cause: &eyre::Report) -> Result<()> {
        let backup = self.backup_path();
        log::warn!(
            "Items file {} is corrupt ({:#}), moving it to {}",
            self.path.display(),
            cause,
            backup.display()
        );

        // rename does not replace an existing target everywhere
        if let Err(e) = fs::remove_file(&backup)
            && e.kind() != ErrorKind::NotFound
        {
            log::warn!("Failed to remove old backup {}: {}", backup.display(), e);
        }
        fs::rename(&self.path, &backup).context("Failed to back up corrupt items file")
    }

    /// Replace the file contents with `todos`.
    pub fn save(&self, todos: &[Todo]) -> Result<()> {
        let values: Vec<Value> = todos.iter().map(Todo::to_value).collect();
        let json = serde_json::to_string_pretty(&values).context("Failed to serialize todos")?;
        write_atomic(&self.path, &json)?;
        log::debug!("Saved {} todo(s) to {}", todos.len(), self.path.display());
        Ok(())
    }

    /// Append a todo.
    pub fn add(&self, todo: Todo) -> Result<()> {
        let mut todos = self.load()?;
        log::info!("Adding todo {}", todo.id);
        todos.push(todo);
        self.save(&todos)
    }

    /// Find a todo by exact id.
    pub fn get(&self, id: &str) -> Result<Option<Todo>> {
        Ok(self.load()?.into_iter().find(|t| t.id == id))
    }

    /// Replace the stored todo with the same id, keeping its position.
    ///
    /// Returns `false` without writing when no todo matches.
    pub fn update(&self, todo: &Todo) -> Result<bool> {
        let mut todos = self.load()?;
        let Some(slot) = todos.iter_mut().find(|t| t.id == todo.id) else {
            return Ok(false);
        };
        *slot = todo.clone();
        self.save(&todos)?;
        log::info!("Updated todo {}", todo.id);
        Ok(true)
    }

    /// Remove the todo with this id. Returns whether one was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut todos = self.load()?;
        let Some(index) = todos.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        todos.remove(index);
        self.save(&todos)?;
        log::info!("Deleted todo {}", id);
        Ok(true)
    }

    /// Drop every completed todo. Returns how many were removed.
    pub fn clear_completed(&self) -> Result<usize> {
        let mut todos = self.load()?;
        let before = todos.len();
        todos.retain(|t| !t.completed);
        self.save(&todos)?;

        let removed = before - todos.len();
        log::info!("Cleared {} completed todo(s)", removed);
        Ok(removed)
    }
}

/// Persistent application config in a single JSON file.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: expand_home(path),
        }
    }

    /// Storage at `~/.todocli/config.json`.
    pub fn open_default() -> Self {
        Self::new(DEFAULT_CONFIG_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(&self) -> Config {
        let bytes = match read_if_exists(&self.path) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Config::default(),
            Err(e) => {
                log::warn!("{:#}, using default config", e);
                return Config::default();
            }
        };

        serde_json::from_slice::<Value>(&bytes)
            .map_err(eyre::Report::new)
            .and_then(|value| Config::from_value(value).map_err(eyre::Report::new))
            .unwrap_or_else(|e| {
                log::warn!("Invalid config file {} ({}), using defaults", self.path.display(), e);
                Config::default()
            })
    }

    /// Replace the config file.
    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(&config.to_value()).context("Failed to serialize config")?;
        write_atomic(&self.path, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;
    use tempfile::TempDir;

    fn setup_test_storage() -> (TempDir, TodoStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = TodoStorage::new(temp_dir.path().join("todos.json"));
        (temp_dir, storage)
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home("~/.todocli/todos.json"), home.join(".todocli/todos.json"));
        assert_eq!(expand_home("~"), home);
        assert_eq!(expand_home("/tmp/todos.json"), PathBuf::from("/tmp/todos.json"));
        assert_eq!(expand_home("relative/~x"), PathBuf::from("relative/~x"));
    }

    #[test]
    fn test_sibling_paths() {
        let (_temp_dir, storage) = setup_test_storage();
        assert_eq!(storage.backup_path().file_name().unwrap(), "todos.json.bak");
        assert_eq!(sibling_path(Path::new("data.txt"), TEMP_SUFFIX), PathBuf::from("data.txt.tmp"));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_temp_dir, storage) = setup_test_storage();
        assert!(storage.load().unwrap().is_empty());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let storage = TodoStorage::new(temp_dir.path().join("nested/deeper/todos.json"));

        storage.save(&[Todo::new("Task")]).unwrap();

        assert!(storage.path().exists());
        assert!(!sibling_path(storage.path(), TEMP_SUFFIX).exists());
        assert_eq!(storage.load().unwrap().len(), 1);
    }

    #[test]
    fn test_save_uses_two_space_indent() {
        let (_temp_dir, storage) = setup_test_storage();
        storage.save(&[Todo::new("Task")]).unwrap();

        let text = fs::read_to_string(storage.path()).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\""));
        assert!(text.contains("\"priority\": \"medium\""));
        assert!(text.contains("\"due_date\": null"));
    }

    #[test]
    fn test_corrupt_file_backed_up() {
        let (_temp_dir, storage) = setup_test_storage();
        fs::write(storage.path(), b"{ not json").unwrap();

        assert!(storage.load().unwrap().is_empty());
        assert!(!storage.path().exists());
        assert_eq!(fs::read(storage.backup_path()).unwrap(), b"{ not json");
    }

    #[test]
    fn test_invalid_priority_counts_as_corruption() {
        let (_temp_dir, storage) = setup_test_storage();
        let contents = r#"[{"id": "a", "title": "x", "priority": "urgent"}]"#;
        fs::write(storage.path(), contents).unwrap();

        assert!(storage.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(storage.backup_path()).unwrap(), contents);
    }

    #[test]
    fn test_add_get_update_delete() {
        let (_temp_dir, storage) = setup_test_storage();

        let mut todo = Todo::new("Task");
        todo.priority = Priority::High;
        storage.add(todo.clone()).unwrap();
        assert_eq!(storage.get(&todo.id).unwrap(), Some(todo.clone()));

        todo.mark_completed();
        assert!(storage.update(&todo).unwrap());
        assert!(storage.get(&todo.id).unwrap().unwrap().completed);

        assert!(storage.delete(&todo.id).unwrap());
        assert!(storage.get(&todo.id).unwrap().is_none());
        assert!(!storage.delete(&todo.id).unwrap());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("todos.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("occupant"), "x").unwrap();

        assert!(write_atomic(&target, "[]").is_err());
        assert!(!sibling_path(&target, TEMP_SUFFIX).exists());
    }

    #[test]
    fn test_update_missing_does_not_write() {
        let (_temp_dir, storage) = setup_test_storage();

        assert!(!storage.update(&Todo::new("Ghost")).unwrap());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_config_storage_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("config.json"));

        assert_eq!(storage.load(), Config::default());

        let mut config = Config::default();
        config.default_priority = Priority::Low;
        config.show_completed = true;
        storage.save(&config).unwrap();

        assert_eq!(storage.load(), config);
    }

    #[test]
    fn test_config_storage_bad_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ broken").unwrap();

        let storage = ConfigStorage::new(&path);
        assert_eq!(storage.load(), Config::default());
        // config files are never moved aside
        assert!(path.exists());
    }
}
