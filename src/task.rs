// Data model for tasks and task drafts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Format accepted by the date input control
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Task identifier, a millisecond timestamp issued by `IdGenerator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(TaskId)
            .map_err(|e| format!("invalid task id '{}': {}", s, e))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Alta")]
    High,
    #[default]
    #[serde(rename = "Media")]
    Medium,
    #[serde(rename = "Baja")]
    Low,
}

impl Priority {
    /// Name used in the persisted representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "Alta",
            Priority::Medium => "Media",
            Priority::Low => "Baja",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alta" | "high" => Ok(Priority::High),
            "media" | "medium" => Ok(Priority::Medium),
            "baja" | "low" => Ok(Priority::Low),
            _ => Err(format!("unknown priority '{}' (expected Alta, Media or Baja)", s)),
        }
    }
}

/// A single to-do item, as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_completed: bool,
    /// Always false: delete removes the record instead of flagging it.
    /// Kept so stored data keeps the same shape.
    #[serde(default)]
    pub is_deleted: bool,
}

impl Task {
    /// Build a new pending task from a draft
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            priority: draft.priority,
            is_completed: false,
            is_deleted: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.is_completed && !self.is_deleted
    }

    /// Editable fields of this task
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: self.due_date.clone(),
            priority: self.priority,
        }
    }

    /// Overwrite the editable fields, leaving id and status untouched
    pub fn apply_draft(&mut self, draft: TaskDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.due_date = draft.due_date;
        self.priority = draft.priority;
    }

    /// Due date as a calendar date, if it is one
    pub fn due_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.due_date.trim(), DUE_DATE_FORMAT).ok()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_pending() && self.due_date_parsed().is_some_and(|due| due < today)
    }
}

/// Unsaved field values for a task being created or edited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = due_date.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set one field from its textual form
    ///
    /// Title, description and due date are taken verbatim. Priority must be
    /// one of the known names.
    pub fn set_field(&mut self, field: DraftField, value: &str) -> Result<(), String> {
        match field {
            DraftField::Title => self.title = value.to_string(),
            DraftField::Description => self.description = value.to_string(),
            DraftField::DueDate => self.due_date = value.to_string(),
            DraftField::Priority => self.priority = value.parse()?,
        }
        Ok(())
    }

    /// The only rule checked anywhere: title must not be empty
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    Title,
    Description,
    DueDate,
    Priority,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Title => "title",
            DraftField::Description => "description",
            DraftField::DueDate => "dueDate",
            DraftField::Priority => "priority",
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(DraftField::Title),
            "description" => Ok(DraftField::Description),
            "dueDate" | "due_date" | "due" => Ok(DraftField::DueDate),
            "priority" => Ok(DraftField::Priority),
            _ => Err(format!("unknown draft field '{}'", s)),
        }
    }
}

/// Rejection of a draft on create or commit-edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    TitleRequired,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::TitleRequired => write!(f, "Title is required."),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Issues unique millisecond-timestamp ids
///
/// Ids increase strictly until the counter reaches `i64::MAX`; after that the
/// highest id not currently in use is handed out.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Start above every id already present
    pub fn seeded<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let last = tasks.into_iter().map(|t| t.id.0).max().unwrap_or(0);
        Self { last }
    }

    /// Next id; `in_use` reports ids held by tasks currently in the store
    pub fn next_id(&mut self, in_use: impl Fn(TaskId) -> bool) -> TaskId {
        self.next_at(now_ms(), in_use)
    }

    /// Next id given the current clock reading
    pub fn next_at(&mut self, now: i64, in_use: impl Fn(TaskId) -> bool) -> TaskId {
        if let Some(above) = self.last.checked_add(1) {
            let id = now.max(above);
            self.last = id;
            return TaskId(id);
        }

        // Counter exhausted: every id above `last` is taken, so search downward
        (i64::MIN..=i64::MAX)
            .rev()
            .map(TaskId)
            .find(|id| !in_use(*id))
            .unwrap_or(TaskId(i64::MIN))
    }
}

/// Current time in milliseconds since the Unix epoch
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
