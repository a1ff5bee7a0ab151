//! Task placement.
//!
//! A task belongs to the column whose name equals its status. Tasks with no
//! status, or a status that names no column of the project, are collected
//! in an `unassigned` group so that grouping never drops a task.

use std::collections::HashMap;

use corkboard_protocol::{Column, Task};

/// Returns the tasks in `column`, in their original order.
///
/// # Examples
///
/// ```
/// use corkboard_board::placement::tasks_by_column;
/// use corkboard_protocol::Task;
///
/// let tasks = vec![
///     Task::new(1, 1, "a").with_status("To Do"),
///     Task::new(2, 1, "b").with_status("Completed"),
///     Task::new(3, 1, "c").with_status("To Do"),
/// ];
/// let ids: Vec<_> = tasks_by_column(&tasks, "To Do").iter().map(|t| t.id).collect();
/// assert_eq!(ids, [1, 3]);
/// ```
#[must_use]
pub fn tasks_by_column<'a>(tasks: &'a [Task], column: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|task| task.is_in(column)).collect()
}

/// Tasks grouped by column.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<'a> {
    groups: Vec<(&'a Column, Vec<&'a Task>)>,
    unassigned: Vec<&'a Task>,
}

impl<'a> Placement<'a> {
    /// Returns the groups in column order.
    #[must_use]
    pub fn groups(&self) -> &[(&'a Column, Vec<&'a Task>)] {
        &self.groups
    }

    /// Returns the tasks of one column, or `None` if it is not a column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[&'a Task]> {
        self.groups
            .iter()
            .find(|(column, _)| column.name() == name)
            .map(|(_, tasks)| tasks.as_slice())
    }

    /// Returns tasks that fit no column.
    #[must_use]
    pub fn unassigned(&self) -> &[&'a Task] {
        &self.unassigned
    }

    /// Returns `(column name, task count)` pairs in column order.
    #[must_use]
    pub fn counts(&self) -> Vec<(&'a str, usize)> {
        self.groups
            .iter()
            .map(|(column, tasks)| (column.name(), tasks.len()))
            .collect()
    }

    /// Returns the number of placed tasks, unassigned ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|(_, tasks)| tasks.len()).sum::<usize>() + self.unassigned.len()
    }

    /// Returns `true` if there are no tasks at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups tasks by column in a single pass.
///
/// Every task lands in exactly one group, and each group keeps the input
/// order.
#[must_use]
pub fn group_by_column<'a>(tasks: &'a [Task], columns: &'a [Column]) -> Placement<'a> {
    let index: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| (column.name(), i))
        .collect();

    let mut groups: Vec<(&Column, Vec<&Task>)> =
        columns.iter().map(|column| (column, Vec::new())).collect();
    let mut unassigned = Vec::new();

    for task in tasks {
        match task.status.as_deref().and_then(|status| index.get(status)) {
            Some(&i) => groups[i].1.push(task),
            None => unassigned.push(task),
        }
    }

    Placement { groups, unassigned }
}

/// Returns `(column name, task count)` pairs in column order.
#[must_use]
pub fn column_counts<'a>(tasks: &'a [Task], columns: &'a [Column]) -> Vec<(&'a str, usize)> {
    group_by_column(tasks, columns).counts()
}
