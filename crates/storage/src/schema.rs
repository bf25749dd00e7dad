//! Versioned, idempotent schema migrations.
//!
//! Every step is recorded in `schema_migrations` once applied and skipped on
//! later runs. The actions themselves are also safe to repeat, so a store
//! created by an older build (tables present, bookkeeping table absent) is
//! upgraded in place without losing rows.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::error::{Result, StorageError};

/// Categories seeded on first initialization.
pub const SEED_CATEGORIES: &[&str] = &[
    "100m Run",
    "200m Run",
    "Long Jump",
    "Javelin Throw",
    "Swimming",
    "Badminton",
    "Football",
    "Basketball",
    "Taekwondo",
    "Go",
];

#[derive(Debug, Clone, Copy)]
pub enum StepAction {
    /// Idempotent DDL (`IF NOT EXISTS`).
    Execute(&'static str),
    /// Adds a nullable date column when missing, then fills NULLs with today.
    AddDateColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Fills an empty `category` table; an existing list is left untouched.
    SeedCategories(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct MigrationStep {
    pub version: i64,
    pub name: &'static str,
    pub action: StepAction,
}

pub const MIGRATIONS: &[MigrationStep] = &[
    MigrationStep {
        version: 1,
        name: "create_school",
        action: StepAction::Execute(
            r#"
            CREATE TABLE IF NOT EXISTS school (
                id   INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )
            "#,
        ),
    },
    MigrationStep {
        version: 2,
        name: "create_category",
        action: StepAction::Execute(
            r#"
            CREATE TABLE IF NOT EXISTS category (
                id   INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            )
            "#,
        ),
    },
    MigrationStep {
        version: 3,
        name: "create_participant",
        action: StepAction::Execute(
            r#"
            CREATE TABLE IF NOT EXISTS participant (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name       TEXT NOT NULL,
                last_name        TEXT NOT NULL,
                school_id        INTEGER NOT NULL REFERENCES school(id),
                category_id      INTEGER NOT NULL REFERENCES category(id),
                competition_date TEXT
            )
            "#,
        ),
    },
    MigrationStep {
        version: 4,
        name: "create_result",
        action: StepAction::Execute(
            r#"
            CREATE TABLE IF NOT EXISTS result (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                participant_id INTEGER NOT NULL REFERENCES participant(id),
                rank           INTEGER NOT NULL,
                score          REAL,
                note           TEXT NOT NULL DEFAULT '',
                event_date     TEXT
            )
            "#,
        ),
    },
    MigrationStep {
        version: 5,
        name: "participant_competition_date",
        action: StepAction::AddDateColumn {
            table: "participant",
            column: "competition_date",
        },
    },
    MigrationStep {
        version: 6,
        name: "result_event_date",
        action: StepAction::AddDateColumn {
            table: "result",
            column: "event_date",
        },
    },
    MigrationStep {
        version: 7,
        name: "uq_participant_unique",
        action: StepAction::Execute(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS uq_participant_unique
            ON participant(first_name, last_name, school_id, category_id, competition_date)
            "#,
        ),
    },
    MigrationStep {
        version: 8,
        name: "idx_participant_date",
        action: StepAction::Execute(
            "CREATE INDEX IF NOT EXISTS idx_participant_date ON participant(competition_date)",
        ),
    },
    MigrationStep {
        version: 9,
        name: "idx_result_date",
        action: StepAction::Execute(
            "CREATE INDEX IF NOT EXISTS idx_result_date ON result(event_date)",
        ),
    },
    MigrationStep {
        version: 10,
        name: "idx_participant_cat",
        action: StepAction::Execute(
            "CREATE INDEX IF NOT EXISTS idx_participant_cat ON participant(category_id)",
        ),
    },
    MigrationStep {
        version: 11,
        name: "idx_participant_school",
        action: StepAction::Execute(
            "CREATE INDEX IF NOT EXISTS idx_participant_school ON participant(school_id)",
        ),
    },
    MigrationStep {
        version: 12,
        name: "seed_categories",
        action: StepAction::SeedCategories(SEED_CATEGORIES),
    },
];

/// Outcome of a migration run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<&'static str>,
    pub skipped: usize,
}

pub async fn run(pool: &SqlitePool) -> Result<MigrationReport> {
    run_steps(pool, MIGRATIONS).await
}

pub async fn run_steps(pool: &SqlitePool, steps: &[MigrationStep]) -> Result<MigrationReport> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    let mut report = MigrationReport::default();

    for step in steps {
        let recorded: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE version = ?)",
        )
        .bind(step.version)
        .fetch_one(pool)
        .await?;

        if recorded {
            report.skipped += 1;
            continue;
        }

        let mut tx = pool.begin().await?;
        apply(&mut tx, step)
            .await
            .map_err(|source| StorageError::Migration {
                step: step.name,
                source,
            })?;
        tx.commit().await?;

        tracing::info!(version = step.version, step = step.name, "Applied migration step");
        report.applied.push(step.name);
    }

    Ok(report)
}

async fn apply(
    tx: &mut Transaction<'_, Sqlite>,
    step: &MigrationStep,
) -> std::result::Result<(), sqlx::Error> {
    match step.action {
        StepAction::Execute(sql) => {
            sqlx::query(sql).execute(&mut **tx).await?;
        }
        StepAction::AddDateColumn { table, column } => {
            if !column_exists(&mut **tx, table, column).await? {
                sqlx::query(&format!("ALTER TABLE {table} ADD COLUMN {column} TEXT"))
                    .execute(&mut **tx)
                    .await?;
            }
            sqlx::query(&format!(
                "UPDATE {table} SET {column} = DATE('now') WHERE {column} IS NULL"
            ))
            .execute(&mut **tx)
            .await?;
        }
        StepAction::SeedCategories(names) => {
            let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category")
                .fetch_one(&mut **tx)
                .await?;
            if existing > 0 {
                tracing::info!(existing, "Category list already present, not seeding");
            } else {
                for name in names {
                    sqlx::query("INSERT INTO category (name) VALUES (?)")
                        .bind(*name)
                        .execute(&mut **tx)
                        .await?;
                }
            }
        }
    }

    sqlx::query("INSERT INTO schema_migrations (version, name) VALUES (?, ?)")
        .bind(step.version)
        .bind(step.name)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

pub async fn column_exists(
    conn: &mut SqliteConnection,
    table: &str,
    column: &str,
) -> std::result::Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pragma_table_info(?) WHERE name = ?)")
        .bind(table)
        .bind(column)
        .fetch_one(conn)
        .await
}
