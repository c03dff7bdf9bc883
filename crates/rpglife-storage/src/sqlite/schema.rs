//! DDL statements and seed data for the SQLite schema.
//!
//! Timestamps are stored as TEXT in ISO 8601 format. Booleans are stored as
//! INTEGER (0/1). The point ledger is append-only: nothing in the crate
//! issues UPDATE or DELETE against `point_transactions`.

/// Current schema version. Bumped whenever the DDL changes.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Core DDL statements executed during `init_schema`.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    // -- Users ---------------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        username   TEXT UNIQUE NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_stats (
        user_id              INTEGER PRIMARY KEY,
        total_xp             INTEGER NOT NULL DEFAULT 0 CHECK(total_xp >= 0),
        level                INTEGER NOT NULL DEFAULT 1 CHECK(level >= 1),
        available_points     INTEGER NOT NULL DEFAULT 0 CHECK(available_points >= 0),
        current_streak       INTEGER NOT NULL DEFAULT 0,
        longest_streak       INTEGER NOT NULL DEFAULT 0,
        last_completion_date TEXT,
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    // -- Categories ----------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id    INTEGER,
        name       TEXT NOT NULL,
        icon       TEXT NOT NULL DEFAULT '📋',
        color      TEXT NOT NULL DEFAULT '#4A90D9',
        is_default INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    // -- Tasks ---------------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id      INTEGER NOT NULL,
        category_id  INTEGER NOT NULL,
        name         TEXT NOT NULL,
        description  TEXT NOT NULL DEFAULT '',
        difficulty   INTEGER NOT NULL DEFAULT 1 CHECK(difficulty BETWEEN 1 AND 5),
        is_recurring INTEGER NOT NULL DEFAULT 0,
        is_active    INTEGER NOT NULL DEFAULT 1,
        created_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        FOREIGN KEY (user_id) REFERENCES users(id),
        FOREIGN KEY (category_id) REFERENCES categories(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_user_active ON tasks(user_id, is_active)",
    r#"
    CREATE TABLE IF NOT EXISTS task_completions (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        task_id       INTEGER NOT NULL,
        user_id       INTEGER NOT NULL,
        points_earned INTEGER NOT NULL,
        completed_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        FOREIGN KEY (task_id) REFERENCES tasks(id),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_completions_user ON task_completions(user_id, completed_at)",
    // -- Rewards -------------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS rewards (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id     INTEGER NOT NULL,
        name        TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        value       INTEGER NOT NULL DEFAULT 1 CHECK(value BETWEEN 1 AND 5),
        point_cost  INTEGER NOT NULL,
        is_archived INTEGER NOT NULL DEFAULT 0,
        created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reward_redemptions (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        reward_id    INTEGER NOT NULL,
        user_id      INTEGER NOT NULL,
        points_spent INTEGER NOT NULL,
        redeemed_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        FOREIGN KEY (reward_id) REFERENCES rewards(id),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_redemptions_user ON reward_redemptions(user_id)",
    // -- Achievements --------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS achievements (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        name              TEXT UNIQUE NOT NULL,
        description       TEXT NOT NULL,
        achievement_group TEXT NOT NULL,
        icon              TEXT NOT NULL DEFAULT '🏆',
        requirement_type  TEXT NOT NULL,
        requirement_value INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_achievements (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id        INTEGER NOT NULL,
        achievement_id INTEGER NOT NULL,
        unlocked_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        FOREIGN KEY (user_id) REFERENCES users(id),
        FOREIGN KEY (achievement_id) REFERENCES achievements(id),
        UNIQUE(user_id, achievement_id)
    )
    "#,
    // -- Point ledger --------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS point_transactions (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id          INTEGER NOT NULL,
        amount           INTEGER NOT NULL,
        transaction_type TEXT NOT NULL
            CHECK(transaction_type IN ('earned', 'spent_xp', 'spent_reward')),
        reference_id     INTEGER,
        created_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_point_tx_user_type ON point_transactions(user_id, transaction_type)",
    // -- Metadata table ------------------------------------------------------
    r#"
    CREATE TABLE IF NOT EXISTS metadata (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
];

/// Shared categories every user sees: `(name, icon, color)`.
pub const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Health & Fitness", "💪", "#E74C3C"),
    ("Learning", "📚", "#3498DB"),
    ("Work", "💼", "#2ECC71"),
    ("Chores", "🏠", "#F39C12"),
    ("Creative", "🎨", "#9B59B6"),
    ("Social", "👥", "#1ABC9C"),
];
