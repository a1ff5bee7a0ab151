//! Demo data for trying the board without a task service.
//!
//! The demo project has five tasks spread over the default columns, with
//! two people trading author and assignee roles.
//!
//! # Examples
//!
//! ```
//! use corkboard_protocol::dummy::demo_tasks;
//!
//! let tasks = demo_tasks(1);
//! assert_eq!(tasks.len(), 5);
//! assert!(tasks.iter().all(|t| t.project_id == 1));
//! ```

use chrono::{TimeZone, Utc};

use crate::task::{Comments, Priority, ProjectId, Task, TaskId, User};

/// Internal helper to cut the boilerplate of filling in demo tasks.
struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    fn new(id: TaskId, project_id: ProjectId, title: &str) -> Self {
        Self {
            task: Task::new(id, project_id, title),
        }
    }

    fn status(mut self, status: &str) -> Self {
        self.task.status = Some(status.to_string());
        self
    }

    fn priority(mut self, priority: Priority) -> Self {
        self.task.priority = Some(priority);
        self
    }

    fn tags(mut self, tags: &str) -> Self {
        self.task.tags = Some(tags.to_string());
        self
    }

    fn points(mut self, points: i64) -> Self {
        self.task.points = Some(points);
        self
    }

    fn note(mut self, note: &str) -> Self {
        self.task.comments = Some(Comments::Text(note.to_string()));
        self
    }

    fn description(mut self, description: &str) -> Self {
        self.task.description = Some(description.to_string());
        self
    }

    fn build(mut self) -> Task {
        let day = Utc.with_ymd_and_hms(2025, 8, 20, 0, 0, 0).single();
        self.task.start_date = day;
        self.task.due_date = day;
        self.task.assignee = Some(person(101, "Alice"));
        self.task.author = Some(person(201, "Bob"));
        self.task.assigned_user_id = Some(101);
        self.task.author_user_id = Some(201);
        self.task
    }
}

fn person(user_id: i64, username: &str) -> User {
    User {
        user_id: Some(user_id),
        username: username.to_string(),
        email: format!("{}@example.com", username.to_lowercase()),
        ..User::default()
    }
}

/// Generates the demo task set for `project_id`.
///
/// - **To Do**: 1 task
/// - **Work In Progress**: 1 task
/// - **Under Review**: 1 task
/// - **Completed**: 2 tasks
#[must_use]
pub fn demo_tasks(project_id: ProjectId) -> Vec<Task> {
    vec![
        TaskBuilder::new(1, project_id, "Provision staging network")
            .status("To Do")
            .priority(Priority::Urgent)
            .tags("Network")
            .points(0)
            .note("very good")
            .description("Subnets, firewall rules and the VPN gateway for staging.")
            .build(),
        TaskBuilder::new(2, project_id, "Roll out deployment pipeline")
            .status("Work In Progress")
            .priority(Priority::High)
            .tags("Deployment")
            .points(1)
            .note("fix the rollback step")
            .description("Build, test and promote on every merge to main.")
            .build(),
        TaskBuilder::new(3, project_id, "Load-balancer health checks")
            .status("Under Review")
            .priority(Priority::Medium)
            .tags("Network")
            .points(2)
            .note("timeouts look too short")
            .description("Probe every backend and drain failing ones.")
            .build(),
        TaskBuilder::new(4, project_id, "Developer onboarding guide")
            .status("Completed")
            .priority(Priority::Low)
            .tags("Development")
            .points(3)
            .note("ok nice")
            .description("Local setup, conventions and review etiquette.")
            .build(),
        TaskBuilder::new(5, project_id, "Rotate VPN certificates")
            .status("Completed")
            .priority(Priority::Urgent)
            .tags("Network , Security")
            .points(4)
            .note("let's see it")
            .description("Replace the certificates expiring this quarter.")
            .build(),
    ]
}
