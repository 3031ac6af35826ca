// Task store: lifecycle transitions over a persisted task sequence

use crate::codec;
use crate::filter::StatusFilter;
use crate::storage::Storage;
use crate::task::{DraftField, IdGenerator, Task, TaskDraft, TaskId};
use eyre::{Result, eyre};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Which draft a field update goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftTarget {
    Create,
    Edit,
}

/// An in-progress edit of one stored task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: TaskId,
    pub draft: TaskDraft,
}

/// What the presentation layer renders after each call
#[derive(Debug)]
pub struct BoardView<'a> {
    pub pending: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
    pub draft_target: DraftTarget,
    pub draft: &'a TaskDraft,
    pub editing: Option<TaskId>,
}

/// In-memory task list kept in sync with one storage slot
///
/// Every mutation rewrites the whole slot with the full sequence.
pub struct TaskStore<S: Storage> {
    storage: S,
    key: String,
    tasks: Vec<Task>,
    create_draft: TaskDraft,
    edit: Option<EditSession>,
    ids: IdGenerator,
}

impl<S: Storage> TaskStore<S> {
    /// Load tasks from the default `"tasks"` slot
    pub fn load(storage: S) -> Self {
        Self::load_with_key(storage, codec::DEFAULT_KEY)
    }

    /// Load tasks from the given slot; missing or unreadable data means no tasks
    pub fn load_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let loaded = codec::read_tasks(&storage, &key);

        let mut seen = HashSet::new();
        let mut tasks = Vec::with_capacity(loaded.len());
        for task in loaded {
            if seen.insert(task.id) {
                tasks.push(task);
            } else {
                warn!(key = %key, id = %task.id, "Dropping task with duplicate id");
            }
        }

        info!(key = %key, count = tasks.len(), "Loaded tasks");

        let ids = IdGenerator::seeded(&tasks);
        Self {
            storage,
            key,
            tasks,
            create_draft: TaskDraft::default(),
            edit: None,
            ids,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Append a new pending task built from `draft`
    ///
    /// Fails with `ValidationError::TitleRequired` when the title is empty;
    /// nothing is stored or written in that case.
    pub fn create(&mut self, draft: TaskDraft) -> Result<TaskId> {
        draft.validate()?;

        let tasks = &self.tasks;
        let id = self.ids.next_id(|id| tasks.iter().any(|t| t.id == id));
        self.tasks.push(Task::from_draft(id, draft));
        debug!(%id, "Created task");

        self.persist()?;
        Ok(id)
    }

    pub fn create_draft(&self) -> &TaskDraft {
        &self.create_draft
    }

    /// Create a task from the store's own create-draft, then clear it
    pub fn submit_create_draft(&mut self) -> Result<TaskId> {
        let id = self.create(self.create_draft.clone())?;
        self.create_draft = TaskDraft::default();
        Ok(id)
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Start editing the task with `id`
    ///
    /// Returns false and leaves any current session alone if no such task exists.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        let Some(task) = self.get(id) else {
            debug!(%id, "begin_edit: no such task");
            return false;
        };

        let draft = task.to_draft();
        self.edit = Some(EditSession { id, draft });
        debug!(%id, "Editing task");
        true
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn editing_id(&self) -> Option<TaskId> {
        self.edit.as_ref().map(|s| s.id)
    }

    /// The edit draft while editing, the create-draft otherwise
    pub fn active_target(&self) -> DraftTarget {
        if self.edit.is_some() {
            DraftTarget::Edit
        } else {
            DraftTarget::Create
        }
    }

    pub fn active_draft(&self) -> &TaskDraft {
        match &self.edit {
            Some(session) => &session.draft,
            None => &self.create_draft,
        }
    }

    /// Set one field of the selected draft, without validation
    ///
    /// Returns false when `target` is `Edit` and no edit is in progress.
    pub fn update_draft_field(&mut self, target: DraftTarget, field: DraftField, value: &str) -> Result<bool> {
        let draft = match target {
            DraftTarget::Create => &mut self.create_draft,
            DraftTarget::Edit => match self.edit.as_mut() {
                Some(session) => &mut session.draft,
                None => return Ok(false),
            },
        };

        draft
            .set_field(field, value)
            .map_err(|e| eyre!("Cannot set {}: {}", field, e))?;
        Ok(true)
    }

    /// Write the edit draft back to its task and close the session
    ///
    /// An empty title fails with `ValidationError::TitleRequired` and keeps the
    /// session open. Returns `None` when nothing was being edited or the task
    /// has been deleted since the edit began.
    pub fn commit_edit(&mut self) -> Result<Option<TaskId>> {
        let Some(session) = self.edit.as_ref() else {
            return Ok(None);
        };
        session.draft.validate()?;

        let Some(EditSession { id, draft }) = self.edit.take() else {
            return Ok(None);
        };

        let updated = match self.position(id) {
            Some(index) => {
                self.tasks[index].apply_draft(draft);
                debug!(%id, "Committed edit");
                Some(id)
            }
            None => {
                warn!(%id, "Edited task no longer exists, discarding edit");
                None
            }
        };

        self.persist()?;
        Ok(updated)
    }

    /// Abandon the current edit; returns whether one was open
    pub fn cancel_edit(&mut self) -> bool {
        self.edit.take().is_some()
    }

    // ========================================================================
    // Status transitions
    // ========================================================================

    /// Mark a task completed; returns whether it exists
    pub fn complete(&mut self, id: TaskId) -> Result<bool> {
        self.set_completed(id, true)
    }

    /// Move a completed task back to pending; returns whether it exists
    pub fn restore(&mut self, id: TaskId) -> Result<bool> {
        self.set_completed(id, false)
    }

    fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<bool> {
        let found = match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.is_completed = completed;
                true
            }
            None => false,
        };
        debug!(%id, completed, found, "Set completion");

        self.persist()?;
        Ok(found)
    }

    /// Remove a task whatever its status; returns whether it existed
    pub fn delete(&mut self, id: TaskId) -> Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let found = self.tasks.len() < before;
        debug!(%id, found, "Deleted task");

        self.persist()?;
        Ok(found)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn filtered(&self, filter: StatusFilter) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| filter.matches(t))
    }

    pub fn pending_tasks(&self) -> Vec<&Task> {
        self.filtered(StatusFilter::Pending).collect()
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.filtered(StatusFilter::Completed).collect()
    }

    pub fn view(&self) -> BoardView<'_> {
        BoardView {
            pending: self.pending_tasks(),
            completed: self.completed_tasks(),
            draft_target: self.active_target(),
            draft: self.active_draft(),
            editing: self.editing_id(),
        }
    }

    fn persist(&mut self) -> Result<()> {
        codec::write_tasks(&mut self.storage, &self.key, &self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use crate::task::{Priority, ValidationError};
    use tempfile::TempDir;

    fn buy_milk() -> TaskDraft {
        TaskDraft::new("Buy milk")
            .with_due_date("2024-01-01")
            .with_priority(Priority::High)
    }

    fn is_title_required(err: &eyre::Report) -> bool {
        err.downcast_ref::<ValidationError>() == Some(&ValidationError::TitleRequired)
    }

    fn stored(store: &TaskStore<MemoryStorage>) -> Vec<Task> {
        codec::read_tasks(store.storage(), codec::DEFAULT_KEY)
    }

    #[test]
    fn test_load_empty_storage() {
        let store = TaskStore::load(MemoryStorage::new());
        assert!(store.is_empty());
        assert_eq!(store.key(), "tasks");
        assert!(store.editing_id().is_none());
    }

    #[test]
    fn test_load_unparsable_storage() {
        let mut storage = MemoryStorage::new();
        storage.set_item("tasks", "not json").unwrap();

        let store = TaskStore::load(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item("tasks", r#"[{"id":7,"title":"first"},{"id":7,"title":"second"},{"id":8,"title":"third"}]"#)
            .unwrap();

        let store = TaskStore::load(storage);
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "third"]);
    }

    #[test]
    fn test_create_appends_pending_task() {
        let mut store = TaskStore::load(MemoryStorage::new());

        let id = store.create(buy_milk()).unwrap();

        assert_eq!(store.len(), 1);
        let task = store.get(id).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.due_date, "2024-01-01");
        assert_eq!(task.priority, Priority::High);
        assert!(!task.is_completed);
        assert!(!task.is_deleted);
        assert_eq!(stored(&store), store.tasks());
    }

    #[test]
    fn test_create_empty_title_fails() {
        let mut store = TaskStore::load(MemoryStorage::new());

        let err = store.create(TaskDraft::default()).unwrap_err();

        assert!(is_title_required(&err));
        assert!(store.is_empty());
        assert!(store.storage().get_item("tasks").unwrap().is_none());
    }

    #[test]
    fn test_create_ids_unique() {
        let mut store = TaskStore::load(MemoryStorage::new());

        let ids: Vec<TaskId> = (0..50)
            .map(|i| store.create(TaskDraft::new(format!("task {}", i))).unwrap())
            .collect();

        let unique: HashSet<TaskId> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 50);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ids_stay_unique_after_reload() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let first = store.create(TaskDraft::new("a")).unwrap();

        let mut store = TaskStore::load(store.into_storage());
        let second = store.create(TaskDraft::new("b")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_create_after_max_id_stays_unique() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item("tasks", r#"[{"id":9223372036854775807,"title":"far future"}]"#)
            .unwrap();
        let mut store = TaskStore::load(storage);

        let first = store.create(TaskDraft::new("new")).unwrap();
        let second = store.create(TaskDraft::new("newer")).unwrap();

        let ids: HashSet<TaskId> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 3);
        assert_ne!(first, TaskId(i64::MAX));
        assert_ne!(second, first);
        assert_eq!(stored(&store).len(), 3);
    }

    #[test]
    fn test_submit_create_draft_resets_draft() {
        let mut store = TaskStore::load(MemoryStorage::new());
        store
            .update_draft_field(DraftTarget::Create, DraftField::Title, "Water plants")
            .unwrap();
        store
            .update_draft_field(DraftTarget::Create, DraftField::Priority, "Baja")
            .unwrap();

        let id = store.submit_create_draft().unwrap();

        assert_eq!(store.get(id).unwrap().title, "Water plants");
        assert_eq!(store.get(id).unwrap().priority, Priority::Low);
        assert_eq!(store.create_draft(), &TaskDraft::default());
    }

    #[test]
    fn test_submit_create_draft_keeps_draft_on_failure() {
        let mut store = TaskStore::load(MemoryStorage::new());
        store
            .update_draft_field(DraftTarget::Create, DraftField::Description, "no title yet")
            .unwrap();

        let err = store.submit_create_draft().unwrap_err();

        assert!(is_title_required(&err));
        assert_eq!(store.create_draft().description, "no title yet");
        assert!(store.is_empty());
    }

    #[test]
    fn test_buy_milk_lifecycle() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.create(buy_milk()).unwrap();

        let ids = |tasks: Vec<&Task>| tasks.iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(store.pending_tasks()), vec![id]);
        assert!(store.completed_tasks().is_empty());

        assert!(store.complete(id).unwrap());
        assert!(store.pending_tasks().is_empty());
        assert_eq!(ids(store.completed_tasks()), vec![id]);

        assert!(store.restore(id).unwrap());
        assert_eq!(ids(store.pending_tasks()), vec![id]);
        assert!(store.completed_tasks().is_empty());

        assert!(store.delete(id).unwrap());
        assert!(store.pending_tasks().is_empty());
        assert!(store.completed_tasks().is_empty());
        assert!(stored(&store).is_empty());
    }

    #[test]
    fn test_complete_restore_keeps_fields() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.create(buy_milk().with_description("2 litres")).unwrap();
        let before = store.get(id).unwrap().clone();

        store.complete(id).unwrap();
        assert!(store.get(id).unwrap().is_completed);
        assert!(stored(&store)[0].is_completed);

        store.restore(id).unwrap();
        assert_eq!(store.get(id).unwrap(), &before);
    }

    #[test]
    fn test_missing_id_is_noop() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.create(buy_milk()).unwrap();
        let before = store.tasks().to_vec();
        let missing = TaskId(id.0 + 1000);

        assert!(!store.complete(missing).unwrap());
        assert!(!store.restore(missing).unwrap());
        assert!(!store.delete(missing).unwrap());
        assert!(!store.begin_edit(missing));

        assert_eq!(store.tasks(), before.as_slice());
        assert!(store.editing_id().is_none());
    }

    #[test]
    fn test_delete_removes_from_any_state() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let a = store.create(TaskDraft::new("a")).unwrap();
        let b = store.create(TaskDraft::new("b")).unwrap();
        let c = store.create(TaskDraft::new("c")).unwrap();
        store.complete(b).unwrap();

        assert!(store.delete(b).unwrap());
        assert_eq!(store.len(), 2);
        assert!(store.get(b).is_none());

        assert!(store.delete(a).unwrap());
        let remaining: Vec<TaskId> = store.tasks().iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![c]);
        assert_eq!(stored(&store), store.tasks());
    }

    #[test]
    fn test_edit_priority_scenario() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.create(buy_milk()).unwrap();
        let before = store.get(id).unwrap().clone();

        assert!(store.begin_edit(id));
        assert_eq!(store.active_target(), DraftTarget::Edit);
        assert!(
            store
                .update_draft_field(DraftTarget::Edit, DraftField::Priority, "Baja")
                .unwrap()
        );

        // Stored task untouched until commit
        assert_eq!(store.get(id).unwrap().priority, Priority::High);

        assert_eq!(store.commit_edit().unwrap(), Some(id));

        let after = store.get(id).unwrap();
        assert_eq!(after.priority, Priority::Low);
        assert_eq!(after.title, before.title);
        assert_eq!(after.description, before.description);
        assert_eq!(after.due_date, before.due_date);
        assert_eq!(after.is_completed, before.is_completed);
        assert!(store.editing_id().is_none());
        assert_eq!(store.active_target(), DraftTarget::Create);
        assert_eq!(stored(&store)[0].priority, Priority::Low);
    }

    #[test]
    fn test_commit_edit_empty_title_fails() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.create(buy_milk()).unwrap();

        store.begin_edit(id);
        store
            .update_draft_field(DraftTarget::Edit, DraftField::Title, "")
            .unwrap();

        let err = store.commit_edit().unwrap_err();
        assert!(is_title_required(&err));
        assert_eq!(store.get(id).unwrap().title, "Buy milk");
        assert_eq!(store.editing_id(), Some(id));
        assert_eq!(stored(&store)[0].title, "Buy milk");
    }

    #[test]
    fn test_commit_without_session() {
        let mut store = TaskStore::load(MemoryStorage::new());
        assert_eq!(store.commit_edit().unwrap(), None);
    }

    #[test]
    fn test_commit_after_task_deleted() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.create(buy_milk()).unwrap();

        store.begin_edit(id);
        store.delete(id).unwrap();

        assert_eq!(store.commit_edit().unwrap(), None);
        assert!(store.is_empty());
        assert!(store.editing_id().is_none());
    }

    #[test]
    fn test_commit_keeps_completion_changed_during_edit() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.create(buy_milk()).unwrap();

        store.begin_edit(id);
        store.complete(id).unwrap();
        store
            .update_draft_field(DraftTarget::Edit, DraftField::Title, "Buy bread")
            .unwrap();
        store.commit_edit().unwrap();

        let task = store.get(id).unwrap();
        assert_eq!(task.title, "Buy bread");
        assert!(task.is_completed);
    }

    #[test]
    fn test_drafts_are_independent() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let id = store.create(buy_milk()).unwrap();

        store
            .update_draft_field(DraftTarget::Create, DraftField::Title, "New one")
            .unwrap();
        store.begin_edit(id);
        store
            .update_draft_field(DraftTarget::Edit, DraftField::Title, "Edited")
            .unwrap();

        assert_eq!(store.create_draft().title, "New one");
        assert_eq!(store.edit_session().unwrap().draft.title, "Edited");
        assert_eq!(store.active_draft().title, "Edited");

        assert!(store.cancel_edit());
        assert!(!store.cancel_edit());
        assert_eq!(store.active_draft().title, "New one");
        assert_eq!(store.get(id).unwrap().title, "Buy milk");
    }

    #[test]
    fn test_update_edit_draft_without_session() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let updated = store
            .update_draft_field(DraftTarget::Edit, DraftField::Title, "x")
            .unwrap();
        assert!(!updated);
        assert_eq!(store.create_draft(), &TaskDraft::default());
    }

    #[test]
    fn test_update_draft_unknown_priority() {
        let mut store = TaskStore::load(MemoryStorage::new());
        assert!(
            store
                .update_draft_field(DraftTarget::Create, DraftField::Priority, "Urgente")
                .is_err()
        );
        assert_eq!(store.create_draft().priority, Priority::Medium);
    }

    #[test]
    fn test_begin_edit_switches_session() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let a = store.create(TaskDraft::new("a")).unwrap();
        let b = store.create(TaskDraft::new("b")).unwrap();

        store.begin_edit(a);
        store.begin_edit(b);
        assert_eq!(store.editing_id(), Some(b));
        assert_eq!(store.active_draft().title, "b");

        // Unknown id leaves the current session alone
        store.begin_edit(TaskId(b.0 + 1000));
        assert_eq!(store.editing_id(), Some(b));
    }

    #[test]
    fn test_view() {
        let mut store = TaskStore::load(MemoryStorage::new());
        let a = store.create(TaskDraft::new("a")).unwrap();
        let b = store.create(TaskDraft::new("b")).unwrap();
        store.complete(a).unwrap();
        store.begin_edit(b);

        let view = store.view();
        assert_eq!(view.pending.len(), 1);
        assert_eq!(view.pending[0].id, b);
        assert_eq!(view.completed.len(), 1);
        assert_eq!(view.completed[0].id, a);
        assert_eq!(view.draft_target, DraftTarget::Edit);
        assert_eq!(view.draft.title, "b");
        assert_eq!(view.editing, Some(b));
    }

    #[test]
    fn test_round_trip_through_storage() {
        let mut store = TaskStore::load(MemoryStorage::new());
        store.create(buy_milk()).unwrap();
        let done = store.create(TaskDraft::new("Pay rent").with_description("before the 5th")).unwrap();
        store.create(TaskDraft::new("Call mom").with_priority(Priority::Low)).unwrap();
        store.complete(done).unwrap();
        let expected = store.tasks().to_vec();

        let reloaded = TaskStore::load(store.into_storage());
        assert_eq!(reloaded.tasks(), expected.as_slice());
    }

    #[test]
    fn test_custom_key() {
        let mut store = TaskStore::load_with_key(MemoryStorage::new(), "work");
        store.create(TaskDraft::new("Review PR")).unwrap();

        let storage = store.into_storage();
        assert!(storage.get_item("tasks").unwrap().is_none());
        assert_eq!(codec::read_tasks(&storage, "work").len(), 1);
    }

    #[test]
    fn test_file_backed_store_persists() {
        let temp = TempDir::new().unwrap();
        let id = {
            let mut store = TaskStore::load(FileStorage::open(temp.path()).unwrap());
            let id = store.create(buy_milk()).unwrap();
            store.complete(id).unwrap();
            id
        };

        let store = TaskStore::load(FileStorage::open(temp.path()).unwrap());
        assert_eq!(store.len(), 1);
        assert!(store.get(id).unwrap().is_completed);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn priority() -> impl Strategy<Value = Priority> {
            prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
        }

        fn draft() -> impl Strategy<Value = TaskDraft> {
            ("\\PC{0,12}", "\\PC{0,20}", "[0-9-]{0,10}", priority()).prop_map(
                |(title, description, due_date, priority)| TaskDraft {
                    title,
                    description,
                    due_date,
                    priority,
                },
            )
        }

        fn store_with(drafts: &[TaskDraft], completed_mask: &[bool]) -> TaskStore<MemoryStorage> {
            let mut store = TaskStore::load(MemoryStorage::new());
            for (i, draft) in drafts.iter().enumerate() {
                let Ok(id) = store.create(draft.clone()) else {
                    continue;
                };
                if completed_mask.get(i).copied().unwrap_or(false) {
                    store.complete(id).unwrap();
                }
            }
            store
        }

        proptest! {
            #[test]
            fn prop_create_grows_by_one(drafts in prop::collection::vec(draft(), 0..8), next in draft()) {
                let mut store = store_with(&drafts, &[]);
                let before = store.len();

                match store.create(next.clone()) {
                    Ok(id) => {
                        prop_assert!(!next.title.is_empty());
                        prop_assert_eq!(store.len(), before + 1);
                        prop_assert!(!store.get(id).unwrap().is_completed);
                    }
                    Err(err) => {
                        prop_assert!(next.title.is_empty());
                        prop_assert!(is_title_required(&err));
                        prop_assert_eq!(store.len(), before);
                    }
                }
            }

            #[test]
            fn prop_pending_and_completed_partition_store(
                drafts in prop::collection::vec(draft(), 0..12),
                mask in prop::collection::vec(any::<bool>(), 0..12)
            ) {
                let store = store_with(&drafts, &mask);
                let pending: HashSet<TaskId> = store.pending_tasks().iter().map(|t| t.id).collect();
                let completed: HashSet<TaskId> = store.completed_tasks().iter().map(|t| t.id).collect();
                let all: HashSet<TaskId> = store.tasks().iter().map(|t| t.id).collect();

                prop_assert!(pending.is_disjoint(&completed));
                prop_assert_eq!(pending.union(&completed).copied().collect::<HashSet<_>>(), all);
            }

            #[test]
            fn prop_complete_then_restore_is_identity(drafts in prop::collection::vec(draft(), 1..8), pick in any::<prop::sample::Index>()) {
                let mut store = store_with(&drafts, &[]);
                prop_assume!(!store.is_empty());
                let id = store.tasks()[pick.index(store.len())].id;
                let before = store.get(id).unwrap().clone();

                store.complete(id).unwrap();
                store.restore(id).unwrap();

                prop_assert_eq!(store.get(id).unwrap(), &before);
            }

            #[test]
            fn prop_delete_removes_exactly_one(
                drafts in prop::collection::vec(draft(), 1..8),
                mask in prop::collection::vec(any::<bool>(), 0..8),
                pick in any::<prop::sample::Index>()
            ) {
                let mut store = store_with(&drafts, &mask);
                prop_assume!(!store.is_empty());
                let id = store.tasks()[pick.index(store.len())].id;
                let before = store.len();

                prop_assert!(store.delete(id).unwrap());

                prop_assert_eq!(store.len(), before - 1);
                prop_assert!(store.pending_tasks().iter().all(|t| t.id != id));
                prop_assert!(store.completed_tasks().iter().all(|t| t.id != id));
            }

            #[test]
            fn prop_reload_reproduces_sequence(
                drafts in prop::collection::vec(draft(), 0..10),
                mask in prop::collection::vec(any::<bool>(), 0..10)
            ) {
                let store = store_with(&drafts, &mask);
                let expected = store.tasks().to_vec();

                let reloaded = TaskStore::load(store.into_storage());
                prop_assert_eq!(reloaded.tasks(), expected.as_slice());
            }
        }
    }
}
