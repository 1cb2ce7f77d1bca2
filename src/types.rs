//! Core data types for the todo list.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Default location of the items file.
pub const DEFAULT_DATA_FILE: &str = "~/.todocli/todos.json";

/// Default location of the config file.
pub const DEFAULT_CONFIG_FILE: &str = "~/.todocli/config.json";

/// Task priority levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All priorities, highest first.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// The serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Display ordering: high sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ModelError::InvalidPriority(other.to_string())),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

/// A single task record.
///
/// Missing keys and `null` values both take the field default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Random UUID, fixed at creation
    #[serde(default = "new_id", deserialize_with = "null_as_new_id")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,

    /// Empty means uncategorized
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    /// ISO date (`YYYY-MM-DD`) or datetime
    #[serde(default)]
    pub due_date: Option<String>,

    #[serde(default = "now_timestamp", deserialize_with = "null_as_now")]
    pub created_at: String,

    /// Set by `mark_completed`, cleared by `mark_incomplete`
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Generate a fresh item id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current local time as an ISO-8601 string with microseconds.
pub fn now_timestamp() -> String {
    Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_new_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(new_id))
}

fn null_as_now<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(now_timestamp))
}

/// Parse an ISO date or datetime. Bare dates resolve to midnight.
pub fn parse_iso_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

impl Todo {
    /// Create an incomplete todo with default fields.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: String::new(),
            completed: false,
            priority: Priority::default(),
            category: String::new(),
            due_date: None,
            created_at: now_timestamp(),
            completed_at: None,
        }
    }

    /// Plain key-value form with every field present.
    pub fn to_value(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "completed": self.completed,
            "priority": self.priority.as_str(),
            "category": self.category,
            "due_date": self.due_date,
            "created_at": self.created_at,
            "completed_at": self.completed_at,
        })
    }

    /// Build a todo from a key-value mapping. Missing keys take their
    /// defaults, unknown keys are ignored.
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        if let Some(raw) = value.get("priority").and_then(Value::as_str) {
            raw.parse::<Priority>()?;
        }
        serde_json::from_value(value).map_err(|e| ModelError::Malformed(e.to_string()))
    }

    /// Mark complete and stamp `completed_at`.
    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.completed_at = Some(now_timestamp());
    }

    /// Reopen and clear `completed_at`.
    pub fn mark_incomplete(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }

    /// Whether the due date has passed on an incomplete todo.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Local::now().naive_local())
    }

    /// `is_overdue` against an explicit reference time.
    pub fn is_overdue_at(&self, now: NaiveDateTime) -> bool {
        if self.completed {
            return false;
        }
        self.due_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .and_then(parse_iso_datetime)
            .is_some_and(|due| due < now)
    }
}

/// Field used to order listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Priority,
    DueDate,
    Title,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Priority => "priority",
            SortField::DueDate => "due_date",
            SortField::Title => "title",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(SortField::CreatedAt),
            "priority" => Ok(SortField::Priority),
            "due_date" => Ok(SortField::DueDate),
            "title" => Ok(SortField::Title),
            other => Err(ModelError::InvalidValue {
                key: "sort_by".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ModelError::InvalidValue {
                key: "sort_order".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Application settings, stored as one JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Items file; `~` is expanded when opened
    pub data_file: String,
    pub default_priority: Priority,
    pub show_completed: bool,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
            default_priority: Priority::Medium,
            show_completed: false,
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }
}

impl Config {
    /// Keys accepted by `set`, in file order.
    pub const KEYS: [&'static str; 5] = ["data_file", "default_priority", "show_completed", "sort_by", "sort_order"];

    pub fn to_value(&self) -> Value {
        json!({
            "data_file": self.data_file,
            "default_priority": self.default_priority.as_str(),
            "show_completed": self.show_completed,
            "sort_by": self.sort_by.as_str(),
            "sort_order": self.sort_order.as_str(),
        })
    }

    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        if let Some(raw) = value.get("default_priority").and_then(Value::as_str) {
            raw.parse::<Priority>()?;
        }
        serde_json::from_value(value).map_err(|e| ModelError::Malformed(e.to_string()))
    }

    /// Current value of a key, rendered as text.
    pub fn get(&self, key: &str) -> Result<String, ModelError> {
        match key {
            "data_file" => Ok(self.data_file.clone()),
            "default_priority" => Ok(self.default_priority.to_string()),
            "show_completed" => Ok(self.show_completed.to_string()),
            "sort_by" => Ok(self.sort_by.to_string()),
            "sort_order" => Ok(self.sort_order.to_string()),
            other => Err(ModelError::UnknownKey(other.to_string())),
        }
    }

    /// Update a single key from its text form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ModelError> {
        match key {
            "data_file" => self.data_file = value.to_string(),
            "default_priority" => self.default_priority = value.parse()?,
            "show_completed" => {
                self.show_completed = value.parse().map_err(|_| ModelError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                })?
            }
            "sort_by" => self.sort_by = value.parse()?,
            "sort_order" => self.sort_order = value.parse()?,
            other => return Err(ModelError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

/// Errors raised while building model values.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    InvalidPriority(String),
    Malformed(String),
    UnknownKey(String),
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidPriority(value) => {
                write!(f, "invalid priority '{}': must be low, medium or high", value)
            }
            ModelError::Malformed(reason) => write!(f, "malformed record: {}", reason),
            ModelError::UnknownKey(key) => write!(f, "unknown config key '{}'", key),
            ModelError::InvalidValue { key, value } => write!(f, "invalid value '{}' for '{}'", value, key),
        }
    }
}

impl std::error::Error for ModelError {}
