//! Task and completion operations for [`SqliteStore`].

use chrono::Utc;
use rusqlite::{Connection, Row, params};
use tracing::debug;

use rpglife_core::model::{NewTask, Task, TaskCompletion};

use crate::error::{Result, StorageError};
use crate::sqlite::categories::get_category_on_conn;
use crate::sqlite::codec::{format_datetime, get_datetime, get_tier, not_found_as};
use crate::sqlite::store::SqliteStore;

// ---------------------------------------------------------------------------
// Column list and row scanning
// ---------------------------------------------------------------------------

/// Task columns joined with their category, in scan order.
const TASK_COLUMNS: &str = r#"
    t.id, t.user_id, t.category_id, t.name, t.description, t.difficulty,
    t.is_recurring, t.is_active, t.created_at,
    COALESCE(c.name, ''), COALESCE(c.icon, '')
"#;

const TASK_FROM: &str = "tasks t LEFT JOIN categories c ON c.id = t.category_id";

fn scan_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        difficulty: get_tier(row, 5)?,
        is_recurring: row.get(6)?,
        is_active: row.get(7)?,
        created_at: get_datetime(row, 8)?,
        category_name: row.get(9)?,
        category_icon: row.get(10)?,
    })
}

fn scan_completion(row: &Row<'_>) -> rusqlite::Result<TaskCompletion> {
    Ok(TaskCompletion {
        id: row.get(0)?,
        task_id: row.get(1)?,
        user_id: row.get(2)?,
        points_earned: row.get(3)?,
        completed_at: get_datetime(row, 4)?,
        task_name: row.get(5)?,
    })
}

// ---------------------------------------------------------------------------
// Connection-level helpers (shared with Transaction)
// ---------------------------------------------------------------------------

pub(crate) fn get_task_on_conn(conn: &Connection, task_id: i64) -> Result<Task> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM {TASK_FROM} WHERE t.id = ?1"),
        params![task_id],
        scan_task,
    )
    .map_err(not_found_as("task", task_id))
}

pub(crate) fn create_task_on_conn(conn: &Connection, new: &NewTask) -> Result<Task> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(StorageError::validation("task name must not be empty"));
    }

    let category = get_category_on_conn(conn, new.category_id)?;
    if !category.is_default && category.user_id != Some(new.user_id) {
        return Err(StorageError::not_found("category", new.category_id));
    }

    conn.execute(
        "INSERT INTO tasks
            (user_id, category_id, name, description, difficulty, is_recurring, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
        params![
            new.user_id,
            new.category_id,
            name,
            new.description.trim(),
            i64::from(new.difficulty),
            new.is_recurring,
            format_datetime(&Utc::now()),
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(id, user_id = new.user_id, "created task");
    get_task_on_conn(conn, id)
}

pub(crate) fn list_active_tasks_on_conn(conn: &Connection, user_id: i64) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM {TASK_FROM}
         WHERE t.user_id = ?1 AND t.is_active = 1
         ORDER BY t.created_at DESC, t.id DESC"
    ))?;
    let tasks = stmt
        .query_map(params![user_id], scan_task)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

pub(crate) fn count_active_tasks_on_conn(conn: &Connection, user_id: i64) -> Result<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE user_id = ?1 AND is_active = 1",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(usize::try_from(n).unwrap_or(0))
}

pub(crate) fn deactivate_task_on_conn(conn: &Connection, task_id: i64) -> Result<()> {
    let affected = conn.execute(
        "UPDATE tasks SET is_active = 0 WHERE id = ?1",
        params![task_id],
    )?;
    if affected == 0 {
        return Err(StorageError::not_found("task", task_id));
    }
    Ok(())
}

pub(crate) fn delete_task_on_conn(conn: &Connection, user_id: i64, task_id: i64) -> Result<()> {
    let affected = conn.execute(
        "UPDATE tasks SET is_active = 0 WHERE id = ?1 AND user_id = ?2 AND is_active = 1",
        params![task_id, user_id],
    )?;
    if affected == 0 {
        return Err(StorageError::not_found("task", task_id));
    }
    debug!(task_id, user_id, "deleted task");
    Ok(())
}

pub(crate) fn insert_completion_on_conn(
    conn: &Connection,
    task_id: i64,
    user_id: i64,
    points_earned: i64,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO task_completions (task_id, user_id, points_earned, completed_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![task_id, user_id, points_earned, format_datetime(&Utc::now())],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn list_completions_on_conn(
    conn: &Connection,
    user_id: i64,
    limit: usize,
) -> Result<Vec<TaskCompletion>> {
    let mut stmt = conn.prepare(
        "SELECT tc.id, tc.task_id, tc.user_id, tc.points_earned, tc.completed_at,
                COALESCE(t.name, '')
         FROM task_completions tc
         LEFT JOIN tasks t ON t.id = tc.task_id
         WHERE tc.user_id = ?1
         ORDER BY tc.completed_at DESC, tc.id DESC
         LIMIT ?2",
    )?;
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let completions = stmt
        .query_map(params![user_id, limit], scan_completion)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(completions)
}

// ---------------------------------------------------------------------------
// SqliteStore methods
// ---------------------------------------------------------------------------

impl SqliteStore {
    pub fn get_task_impl(&self, task_id: i64) -> Result<Task> {
        let conn = self.lock_conn()?;
        get_task_on_conn(&conn, task_id)
    }

    pub fn list_active_tasks_impl(&self, user_id: i64) -> Result<Vec<Task>> {
        let conn = self.lock_conn()?;
        list_active_tasks_on_conn(&conn, user_id)
    }

    pub fn count_active_tasks_impl(&self, user_id: i64) -> Result<usize> {
        let conn = self.lock_conn()?;
        count_active_tasks_on_conn(&conn, user_id)
    }

    pub fn delete_task_impl(&self, user_id: i64, task_id: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        delete_task_on_conn(&conn, user_id, task_id)
    }

    pub fn list_completions_impl(&self, user_id: i64, limit: usize) -> Result<Vec<TaskCompletion>> {
        let conn = self.lock_conn()?;
        list_completions_on_conn(&conn, user_id, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::categories::list_categories_on_conn;
    use crate::sqlite::users::create_user_on_conn;
    use pretty_assertions::assert_eq;
    use rpglife_core::tier::Tier;

    fn new_task(user_id: i64, category_id: i64, name: &str) -> NewTask {
        NewTask {
            user_id,
            category_id,
            name: name.into(),
            description: String::new(),
            difficulty: Tier::new(3).unwrap(),
            is_recurring: false,
        }
    }

    fn setup(conn: &Connection) -> (i64, i64) {
        let user = create_user_on_conn(conn, "ada").unwrap();
        let category = list_categories_on_conn(conn, user.id).unwrap().remove(0);
        (user.id, category.id)
    }

    #[test]
    fn create_and_list() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let (user_id, category_id) = setup(&conn);

        let task = create_task_on_conn(&conn, &new_task(user_id, category_id, "Run 5k")).unwrap();
        assert_eq!(task.difficulty.get(), 3);
        assert!(task.is_active);
        assert_eq!(task.category_name, "Chores");
        assert_eq!(task.category_icon, "🏠");

        let active = list_active_tasks_on_conn(&conn, user_id).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(count_active_tasks_on_conn(&conn, user_id).unwrap(), 1);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let (user_id, _) = setup(&conn);

        let err = create_task_on_conn(&conn, &new_task(user_id, 9_999, "Run")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_is_soft_and_owner_only() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let (user_id, category_id) = setup(&conn);
        let other = create_user_on_conn(&conn, "bob").unwrap();
        let task = create_task_on_conn(&conn, &new_task(user_id, category_id, "Read")).unwrap();

        assert!(delete_task_on_conn(&conn, other.id, task.id).unwrap_err().is_not_found());

        delete_task_on_conn(&conn, user_id, task.id).unwrap();
        assert_eq!(count_active_tasks_on_conn(&conn, user_id).unwrap(), 0);

        let kept = get_task_on_conn(&conn, task.id).unwrap();
        assert!(!kept.is_active);

        assert!(delete_task_on_conn(&conn, user_id, task.id).unwrap_err().is_not_found());
    }

    #[test]
    fn completions_newest_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let (user_id, category_id) = setup(&conn);
        let task = create_task_on_conn(&conn, &new_task(user_id, category_id, "Read")).unwrap();

        let first = insert_completion_on_conn(&conn, task.id, user_id, 50).unwrap();
        let second = insert_completion_on_conn(&conn, task.id, user_id, 55).unwrap();

        let list = list_completions_on_conn(&conn, user_id, 10).unwrap();
        assert_eq!(list.iter().map(|c| c.id).collect::<Vec<_>>(), vec![second, first]);
        assert_eq!(list[0].task_name, "Read");

        assert_eq!(list_completions_on_conn(&conn, user_id, 1).unwrap().len(), 1);
    }
}
