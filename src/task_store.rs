use rusqlite::{Connection, OptionalExtension, params};

use crate::database::DatabaseError;
use crate::done_store::DoneStore;
use crate::models::{Task, TaskInput, TaskWithCompletion};

/// Task rows, read and written through a borrowed connection (normally the
/// transaction opened for the current request).
pub struct TaskStore<'a> {
    conn: &'a Connection,
}

impl<'a> TaskStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Helper function to map a row to a Task
    fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            due_date: row.get(2)?,
        })
    }

    /// Insert a task and return it with its generated id
    pub fn create(&self, input: &TaskInput) -> Result<Task, DatabaseError> {
        self.conn.execute(
            "INSERT INTO tasks (title, due_date) VALUES (?1, ?2)",
            params![input.title, input.due_date],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(task_id = id, "Inserted task");

        Ok(Task {
            id,
            title: input.title.clone(),
            due_date: input.due_date,
        })
    }

    /// Get a single task by ID, `None` if there is no such row
    pub fn get(&self, id: i64) -> Result<Option<Task>, DatabaseError> {
        let task = self
            .conn
            .query_row(
                "SELECT id, title, due_date FROM tasks WHERE id = ?1",
                params![id],
                Self::row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// Every task with `done` derived from the presence of a matching dones row.
    /// Tasks without a marker are reported with `done = false`, never dropped.
    pub fn list_with_completion(&self) -> Result<Vec<TaskWithCompletion>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT tasks.id, tasks.title, dones.id IS NOT NULL AS done
             FROM tasks LEFT OUTER JOIN dones ON dones.id = tasks.id
             ORDER BY tasks.id ASC",
        )?;
        let tasks = stmt
            .query_map([], |row| {
                Ok(TaskWithCompletion {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    done: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Overwrite the title and due date of an already fetched task
    pub fn update(&self, input: &TaskInput, original: Task) -> Result<Task, DatabaseError> {
        self.conn.execute(
            "UPDATE tasks SET title = ?1, due_date = ?2 WHERE id = ?3",
            params![input.title, input.due_date, original.id],
        )?;
        tracing::debug!(task_id = original.id, "Updated task");

        Ok(Task {
            title: input.title.clone(),
            due_date: input.due_date,
            ..original
        })
    }

    /// Delete a task together with its done marker.
    ///
    /// The marker is removed explicitly before the task row; the foreign key
    /// cascade is a second line, not the mechanism relied on here.
    pub fn delete(&self, original: Task) -> Result<(), DatabaseError> {
        let dones = DoneStore::new(self.conn);
        if let Some(done) = dones.get(original.id)? {
            dones.delete(done)?;
        }

        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![original.id])?;
        tracing::debug!(task_id = original.id, "Deleted task");
        Ok(())
    }
}
