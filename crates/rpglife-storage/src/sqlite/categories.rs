//! Category operations for [`SqliteStore`].

use rusqlite::{Connection, Row, params};

use rpglife_core::model::Category;

use crate::error::{Result, StorageError};
use crate::sqlite::codec::not_found_as;
use crate::sqlite::store::SqliteStore;
use crate::traits::NewCategory;

/// Icon used when a custom category is created without one.
pub const DEFAULT_CATEGORY_ICON: &str = "📋";

/// Color used when a custom category is created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#4A90D9";

const CATEGORY_COLUMNS: &str = "id, user_id, name, icon, color, is_default";

fn scan_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        icon: row.get(3)?,
        color: row.get(4)?,
        is_default: row.get(5)?,
    })
}

// ---------------------------------------------------------------------------
// Connection-level helpers (shared with Transaction)
// ---------------------------------------------------------------------------

pub(crate) fn get_category_on_conn(conn: &Connection, category_id: i64) -> Result<Category> {
    conn.query_row(
        &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
        params![category_id],
        scan_category,
    )
    .map_err(not_found_as("category", category_id))
}

pub(crate) fn list_categories_on_conn(conn: &Connection, user_id: i64) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories
         WHERE is_default = 1 OR user_id = ?1
         ORDER BY is_default DESC, name"
    ))?;
    let categories = stmt
        .query_map(params![user_id], scan_category)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(categories)
}

pub(crate) fn create_category_on_conn(conn: &Connection, new: &NewCategory) -> Result<Category> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(StorageError::validation("category name must not be empty"));
    }

    let clash: i64 = conn.query_row(
        "SELECT COUNT(*) FROM categories
         WHERE (is_default = 1 OR user_id = ?1) AND name = ?2 COLLATE NOCASE",
        params![new.user_id, name],
        |row| row.get(0),
    )?;
    if clash > 0 {
        return Err(StorageError::AlreadyExists {
            entity: "category".into(),
            id: name.into(),
        });
    }

    let icon = if new.icon.trim().is_empty() {
        DEFAULT_CATEGORY_ICON
    } else {
        new.icon.trim()
    };
    let color = if new.color.trim().is_empty() {
        DEFAULT_CATEGORY_COLOR
    } else {
        new.color.trim()
    };

    conn.execute(
        "INSERT INTO categories (user_id, name, icon, color, is_default)
         VALUES (?1, ?2, ?3, ?4, 0)",
        params![new.user_id, name, icon, color],
    )?;
    get_category_on_conn(conn, conn.last_insert_rowid())
}

pub(crate) fn delete_category_on_conn(
    conn: &Connection,
    user_id: i64,
    category_id: i64,
) -> Result<()> {
    let category = get_category_on_conn(conn, category_id)?;
    if category.is_default {
        return Err(StorageError::validation(format!(
            "cannot delete default category {:?}",
            category.name
        )));
    }
    if category.user_id != Some(user_id) {
        return Err(StorageError::not_found("category", category_id));
    }

    let tasks: i64 = conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE category_id = ?1",
        params![category_id],
        |row| row.get(0),
    )?;
    if tasks > 0 {
        return Err(StorageError::validation(format!(
            "category {:?} still has {tasks} task(s)",
            category.name
        )));
    }

    conn.execute("DELETE FROM categories WHERE id = ?1", params![category_id])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// SqliteStore methods
// ---------------------------------------------------------------------------

impl SqliteStore {
    pub fn get_category_impl(&self, category_id: i64) -> Result<Category> {
        let conn = self.lock_conn()?;
        get_category_on_conn(&conn, category_id)
    }

    pub fn list_categories_impl(&self, user_id: i64) -> Result<Vec<Category>> {
        let conn = self.lock_conn()?;
        list_categories_on_conn(&conn, user_id)
    }

    pub fn delete_category_impl(&self, user_id: i64, category_id: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        delete_category_on_conn(&conn, user_id, category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::users::create_user_on_conn;
    use pretty_assertions::assert_eq;

    fn new_category(user_id: i64, name: &str) -> NewCategory {
        NewCategory {
            user_id,
            name: name.into(),
            icon: String::new(),
            color: String::new(),
        }
    }

    #[test]
    fn defaults_come_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let user = create_user_on_conn(&conn, "ada").unwrap();

        let custom = create_category_on_conn(&conn, &new_category(user.id, "Garden")).unwrap();
        assert_eq!(custom.icon, DEFAULT_CATEGORY_ICON);
        assert_eq!(custom.color, DEFAULT_CATEGORY_COLOR);
        assert!(!custom.is_default);

        let all = list_categories_on_conn(&conn, user.id).unwrap();
        assert_eq!(all.len(), 7);
        assert!(all[..6].iter().all(|c| c.is_default));
        assert_eq!(all[0].name, "Chores");
        assert_eq!(all[6].name, "Garden");
    }

    #[test]
    fn custom_categories_are_private() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let ada = create_user_on_conn(&conn, "ada").unwrap();
        let bob = create_user_on_conn(&conn, "bob").unwrap();

        create_category_on_conn(&conn, &new_category(ada.id, "Garden")).unwrap();
        assert_eq!(list_categories_on_conn(&conn, bob.id).unwrap().len(), 6);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        let conn = store.lock_conn().unwrap();
        let user = create_user_on_conn(&conn, "ada").unwrap();

        let err = create_category_on_conn(&conn, &new_category(user.id, "work")).unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));
    }

    #[test]
    fn defaults_cannot_be_deleted() {
        let store = SqliteStore::open_in_memory().unwrap();
        let user = store.create_user_impl("ada").unwrap();
        let work = store
            .list_categories_impl(user.id)
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Work")
            .unwrap();

        let err = store.delete_category_impl(user.id, work.id).unwrap_err();
        assert!(matches!(err, StorageError::Validation { .. }));
    }

    #[test]
    fn delete_own_empty_category() {
        let store = SqliteStore::open_in_memory().unwrap();
        let user = store.create_user_impl("ada").unwrap();
        let garden = {
            let conn = store.lock_conn().unwrap();
            create_category_on_conn(&conn, &new_category(user.id, "Garden")).unwrap()
        };

        store.delete_category_impl(user.id, garden.id).unwrap();
        assert!(store.get_category_impl(garden.id).unwrap_err().is_not_found());
    }
}
