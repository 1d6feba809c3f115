use crate::date;
use crate::error::HamsterError;
use crate::repository::fact_repository::FactRepository;
use crate::repository::SharedSqliteConnection;
use crate::types::Fact;
use chrono::{DateTime, Local};
use log::debug;
use rusqlite::{params, Row};

/// Extended result code of a violated unique constraint
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// SQL statement to create the `fact` table.
const CREATE_FACT_TABLE_SQL: &str = r"
    CREATE TABLE IF NOT EXISTS fact (
        id integer primary key not null,
        name varchar(255) not null,
        category varchar(255),
        description varchar(1024),
        tags varchar(1024) not null default '',
        start_time datetime not null,
        end_time datetime,
        redmine_issue_id integer,
        redmine_activity_id integer
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_single_active_fact ON fact ((end_time IS NULL)) WHERE end_time IS NULL;
";

const SELECT_FACT_SQL: &str = r"
    SELECT id, name, category, description, tags, start_time, end_time, redmine_issue_id, redmine_activity_id
    FROM fact";

/// Creates the `fact` table in the database.
pub fn create_fact_table(connection: &SharedSqliteConnection) -> Result<(), HamsterError> {
    let conn = connection.lock().map_err(|_| HamsterError::LockPoisoned)?;
    conn.execute_batch(CREATE_FACT_TABLE_SQL)?;
    Ok(())
}

pub struct SqliteFactRepository {
    connection: SharedSqliteConnection,
}

impl SqliteFactRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Fact> {
        let tags: String = row.get(4)?;
        Ok(Fact {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            category: row.get(2)?,
            description: row.get(3)?,
            tags: tags
                .split(',')
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
                .collect(),
            start_time: row.get(5)?,
            end_time: row.get(6)?,
            redmine_issue_id: row.get(7)?,
            redmine_activity_id: row.get(8)?,
        })
    }
}

impl FactRepository for SqliteFactRepository {
    fn add_fact(&self, fact: &Fact) -> Result<i64, HamsterError> {
        debug!("Adding fact {}", fact);
        let conn = self
            .connection
            .lock()
            .map_err(|_| HamsterError::LockPoisoned)?;
        let result = conn.query_row(
            r"INSERT INTO fact (name, category, description, tags, start_time, end_time, redmine_issue_id, redmine_activity_id)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?)
              RETURNING id",
            params![
                fact.name,
                fact.category,
                fact.description,
                fact.tags.join(","),
                fact.start_time,
                fact.end_time,
                fact.redmine_issue_id,
                fact.redmine_activity_id,
            ],
            |row| row.get(0),
        );

        match result {
            Ok(id) => Ok(id),
            Err(rusqlite::Error::SqliteFailure(error, _))
                if error.extended_code == SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(HamsterError::ActiveFactExists)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_todays_facts(&self) -> Result<Vec<Fact>, HamsterError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HamsterError::LockPoisoned)?;
        let mut stmt = conn.prepare(&format!(
            "{SELECT_FACT_SQL} WHERE start_time >= ?1 OR end_time IS NULL ORDER BY start_time, id"
        ))?;
        let facts = stmt
            .query_map(params![date::start_of_today()], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(facts)
    }

    fn find_active_fact(&self) -> Result<Option<Fact>, HamsterError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HamsterError::LockPoisoned)?;

        match conn.query_row(
            &format!("{SELECT_FACT_SQL} WHERE end_time IS NULL"),
            [],
            Self::map_row,
        ) {
            Ok(fact) => Ok(Some(fact)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn stop_tracking(&self, end_time: DateTime<Local>) -> Result<Fact, HamsterError> {
        let mut fact = self.find_active_fact()?.ok_or(HamsterError::NoActiveFact)?;
        if end_time < fact.start_time {
            return Err(HamsterError::BadInput(format!(
                "End time {} is before the start time {}",
                end_time.format("%Y-%m-%d %H:%M"),
                fact.start_time.format("%Y-%m-%d %H:%M")
            )));
        }

        let conn = self
            .connection
            .lock()
            .map_err(|_| HamsterError::LockPoisoned)?;
        conn.execute(
            "UPDATE fact SET end_time = ?1 WHERE id = ?2 AND end_time IS NULL",
            params![end_time, fact.id],
        )?;
        fact.end_time = Some(end_time);
        debug!("Stopped fact {:?}", fact.id);
        Ok(fact)
    }
}
