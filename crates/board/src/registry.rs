//! Per-project column registry.
//!
//! Every project has its own ordered list of column names. Until a project's
//! layout is first changed it shows the default set; after that the stored
//! list is authoritative. The registry holds no state of its own: each
//! operation loads the layout from the store, changes it, and saves it back.

use corkboard_config::ColumnsConfig;
use corkboard_protocol::{Column, ProjectId, default_column_names};
use tracing::{debug, instrument};

use crate::error::{BoardError, Result};
use crate::store::{ColumnStore, column_key};

/// Ordered, per-project column lists backed by a [`ColumnStore`].
///
/// # Examples
///
/// ```
/// use corkboard_board::ColumnRegistry;
/// use corkboard_board::store::MemoryColumnStore;
///
/// # fn example() -> corkboard_board::Result<()> {
/// let registry = ColumnRegistry::new(MemoryColumnStore::new());
///
/// registry.add_column(1, "Blocked")?;
/// assert_eq!(registry.column_names(1)?.last().map(String::as_str), Some("Blocked"));
///
/// // Other projects are unaffected.
/// assert_eq!(registry.column_names(2)?.len(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ColumnRegistry<S> {
    store: S,
    defaults: Vec<String>,
}

impl<S: ColumnStore> ColumnRegistry<S> {
    /// Creates a registry using the built-in default columns.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_defaults(store, default_column_names())
    }

    /// Creates a registry that starts projects with `defaults`.
    #[must_use]
    pub fn with_defaults(store: S, defaults: Vec<String>) -> Self {
        Self { store, defaults }
    }

    /// Creates a registry using the configured default columns.
    #[must_use]
    pub fn from_config(store: S, config: &ColumnsConfig) -> Self {
        Self::with_defaults(store, config.defaults.clone())
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the column names of a project, in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored layout exists but cannot be read.
    pub fn column_names(&self, project_id: ProjectId) -> Result<Vec<String>> {
        let stored = self.store.load(&column_key(project_id))?;
        Ok(stored.unwrap_or_else(|| self.defaults.clone()))
    }

    /// Returns the columns of a project with their positions.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored layout exists but cannot be read.
    pub fn list_columns(&self, project_id: ProjectId) -> Result<Vec<Column>> {
        Ok(Column::from_names(self.column_names(project_id)?))
    }

    /// Appends a column to a project.
    ///
    /// Surrounding whitespace is trimmed. Names are compared exactly, so
    /// `Done` and `done` are different columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidColumnName`] for a blank name and
    /// [`BoardError::DuplicateColumn`] if the project already has a column
    /// with that name. The layout is unchanged in both cases.
    #[instrument(skip(self))]
    pub fn add_column(&self, project_id: ProjectId, name: &str) -> Result<Column> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BoardError::InvalidColumnName);
        }

        let mut names = self.column_names(project_id)?;
        if names.iter().any(|existing| existing == name) {
            return Err(BoardError::DuplicateColumn(name.to_string()));
        }

        names.push(name.to_string());
        self.persist(project_id, &names)?;
        debug!(order = names.len() - 1, "column added");
        Ok(Column::new(name, names.len() - 1))
    }

    /// Removes a column from a project.
    ///
    /// Tasks are not consulted here; callers decide what may be removed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] if the project has no such
    /// column.
    #[instrument(skip(self))]
    pub fn remove_column(&self, project_id: ProjectId, name: &str) -> Result<()> {
        let mut names = self.column_names(project_id)?;
        let index = names
            .iter()
            .position(|existing| existing == name)
            .ok_or_else(|| BoardError::ColumnNotFound(name.to_string()))?;

        names.remove(index);
        self.persist(project_id, &names)?;
        debug!("column removed");
        Ok(())
    }

    /// Moves `moved` to the position `target` currently occupies.
    ///
    /// The column is taken out of the list and reinserted at the target's
    /// former index, so dragging right places it after the target and
    /// dragging left places it before.
    ///
    /// Returns `false` without saving anything when the two names are equal
    /// or either is not a column of the project.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout cannot be loaded or saved.
    ///
    /// # Examples
    ///
    /// ```
    /// use corkboard_board::ColumnRegistry;
    /// use corkboard_board::store::MemoryColumnStore;
    ///
    /// # fn example() -> corkboard_board::Result<()> {
    /// let registry = ColumnRegistry::new(MemoryColumnStore::new());
    ///
    /// assert!(registry.reorder_column(1, "Completed", "To Do")?);
    /// assert_eq!(
    ///     registry.column_names(1)?,
    ///     ["Completed", "To Do", "Work In Progress", "Under Review"]
    /// );
    /// assert!(!registry.reorder_column(1, "To Do", "To Do")?);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub fn reorder_column(&self, project_id: ProjectId, moved: &str, target: &str) -> Result<bool> {
        if moved == target {
            return Ok(false);
        }

        let mut names = self.column_names(project_id)?;
        let from = names.iter().position(|name| name == moved);
        let to = names.iter().position(|name| name == target);
        let (Some(from), Some(to)) = (from, to) else {
            debug!("reorder ignored, column missing");
            return Ok(false);
        };

        let column = names.remove(from);
        names.insert(to, column);
        self.persist(project_id, &names)?;
        debug!(from, to, "column reordered");
        Ok(true)
    }

    /// Forgets a project's layout so it shows the defaults again.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored layout cannot be removed.
    #[instrument(skip(self))]
    pub fn reset(&self, project_id: ProjectId) -> Result<()> {
        self.store.remove(&column_key(project_id))?;
        Ok(())
    }

    fn persist(&self, project_id: ProjectId, names: &[String]) -> Result<()> {
        self.store.save(&column_key(project_id), names)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::store::{FileColumnStore, MemoryColumnStore};

    fn registry() -> ColumnRegistry<MemoryColumnStore> {
        ColumnRegistry::new(MemoryColumnStore::new())
    }

    #[test]
    fn unknown_project_gets_defaults() {
        let registry = registry();
        let columns = registry.list_columns(9).unwrap();

        assert_eq!(columns.len(), 4);
        assert_eq!(columns[0], Column::new("To Do", 0));
        assert_eq!(columns[3], Column::new("Completed", 3));
        assert!(registry.store().load("statuses-9").unwrap().is_none());
    }

    #[test]
    fn configured_defaults_are_used() {
        let config = ColumnsConfig {
            defaults: vec!["Backlog".to_string(), "Done".to_string()],
            store_dir: None,
        };
        let registry = ColumnRegistry::from_config(MemoryColumnStore::new(), &config);
        assert_eq!(registry.column_names(1).unwrap(), ["Backlog", "Done"]);
    }

    #[test]
    fn add_appends_and_persists() {
        let registry = registry();

        let column = registry.add_column(1, "  Blocked ").unwrap();
        assert_eq!(column, Column::new("Blocked", 4));
        assert_eq!(
            registry.store().load("statuses-1").unwrap().unwrap().last().unwrap(),
            "Blocked"
        );
    }

    #[test]
    fn add_rejects_duplicate_without_change() {
        let registry = registry();
        registry.add_column(1, "Blocked").unwrap();
        let before = registry.column_names(1).unwrap();

        let err = registry.add_column(1, "Blocked").unwrap_err();
        assert!(matches!(err, BoardError::DuplicateColumn(ref name) if name == "Blocked"));
        assert_eq!(registry.column_names(1).unwrap(), before);

        // Case matters.
        registry.add_column(1, "blocked").unwrap();
    }

    #[test]
    fn add_rejects_blank_names() {
        let registry = registry();
        assert!(matches!(
            registry.add_column(1, ""),
            Err(BoardError::InvalidColumnName)
        ));
        assert!(matches!(
            registry.add_column(1, "   "),
            Err(BoardError::InvalidColumnName)
        ));
        assert!(registry.store().load("statuses-1").unwrap().is_none());
    }

    #[test]
    fn remove_column() {
        let registry = registry();
        registry.remove_column(1, "Under Review").unwrap();
        assert_eq!(
            registry.column_names(1).unwrap(),
            ["To Do", "Work In Progress", "Completed"]
        );

        assert!(matches!(
            registry.remove_column(1, "Under Review"),
            Err(BoardError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn reorder_right_places_after_target() {
        let registry = registry();
        assert!(registry.reorder_column(1, "To Do", "Under Review").unwrap());
        assert_eq!(
            registry.column_names(1).unwrap(),
            ["Work In Progress", "Under Review", "To Do", "Completed"]
        );
    }

    #[test]
    fn reorder_noops_do_not_persist() {
        let registry = registry();
        assert!(!registry.reorder_column(1, "To Do", "To Do").unwrap());
        assert!(!registry.reorder_column(1, "Nope", "To Do").unwrap());
        assert!(!registry.reorder_column(1, "To Do", "Nope").unwrap());
        assert!(registry.store().load("statuses-1").unwrap().is_none());
    }

    #[test]
    fn projects_are_isolated() {
        let registry = registry();
        registry.add_column(1, "Blocked").unwrap();
        registry.remove_column(2, "To Do").unwrap();

        assert_eq!(registry.column_names(1).unwrap().len(), 5);
        assert_eq!(registry.column_names(2).unwrap().len(), 3);
        assert_eq!(registry.column_names(3).unwrap().len(), 4);
    }

    #[test]
    fn reset_restores_defaults() {
        let registry = registry();
        registry.add_column(1, "Blocked").unwrap();
        registry.reset(1).unwrap();
        assert_eq!(registry.column_names(1).unwrap(), default_column_names());
    }

    #[test]
    fn layout_survives_new_registry_over_same_directory() {
        let temp = TempDir::new().unwrap();
        let first = ColumnRegistry::new(FileColumnStore::with_path(temp.path()).unwrap());
        first.add_column(5, "Blocked").unwrap();
        first.reorder_column(5, "Blocked", "To Do").unwrap();
        let expected = first.column_names(5).unwrap();

        let second = ColumnRegistry::new(FileColumnStore::with_path(temp.path()).unwrap());
        assert_eq!(second.column_names(5).unwrap(), expected);
        assert_eq!(expected[0], "Blocked");
    }

    fn arb_layout() -> impl Strategy<Value = Vec<String>> {
        prop::collection::hash_set("[A-Za-z]{1,8}", 1..8)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>())
    }

    proptest! {
        #[test]
        fn reorder_is_a_permutation(layout in arb_layout(), a in any::<prop::sample::Index>(), b in any::<prop::sample::Index>()) {
            let registry = ColumnRegistry::with_defaults(MemoryColumnStore::new(), layout.clone());
            let moved = a.get(&layout).clone();
            let target = b.get(&layout).clone();

            let changed = registry.reorder_column(1, &moved, &target).unwrap();
            let after = registry.column_names(1).unwrap();

            prop_assert_eq!(changed, moved != target);
            prop_assert_eq!(after.len(), layout.len());
            let mut sorted_before = layout.clone();
            let mut sorted_after = after.clone();
            sorted_before.sort();
            sorted_after.sort();
            prop_assert_eq!(sorted_before, sorted_after);

            let target_index = layout.iter().position(|n| *n == target).unwrap();
            prop_assert_eq!(&after[target_index], &moved);
        }
    }
}
