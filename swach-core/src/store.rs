//! Generic table store: the dashboard's view of the hosted relational
//! backend. Rows are JSON documents; operations are single-shot with no
//! retry. Authorization scoping happens in the command layer, not here.

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("row decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("row for table '{0}' is not a JSON object")]
    NotAnObject(String),
    #[error("unsupported filter value for column '{0}'")]
    UnsupportedFilter(String),
}

/// Equality predicate against one column of a row document.
#[derive(Clone, Debug)]
pub struct Filter {
    pub column: String,
    pub value: serde_json::Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

#[derive(Clone)]
pub struct TableStore {
    db_path: Arc<PathBuf>,
}

impl TableStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db_path = PathBuf::from(path);
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            CREATE TABLE IF NOT EXISTS rows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tbl TEXT NOT NULL,
                doc TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_rows_tbl ON rows(tbl);
            ",
        )?;

        Ok(Self {
            db_path: Arc::new(db_path),
        })
    }

    pub fn fetch(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        let conn = Connection::open(&*self.db_path)?;

        let mut sql = String::from("SELECT doc FROM rows WHERE tbl = ?1");
        for (i, filter) in filters.iter().enumerate() {
            sql.push_str(&format!(
                " AND json_extract(doc, '$.{}') = ?{}",
                filter.column,
                i + 2
            ));
        }
        if let Some(order) = order {
            sql.push_str(&format!(
                " ORDER BY json_extract(doc, '$.{}') {}",
                order.column,
                if order.ascending { "ASC" } else { "DESC" }
            ));
        } else {
            sql.push_str(" ORDER BY id ASC");
        }

        let mut stmt = conn.prepare(&sql)?;
        let mut binds: Vec<rusqlite::types::Value> =
            vec![rusqlite::types::Value::Text(table.to_string())];
        for filter in filters {
            binds.push(bind_value(&filter.column, &filter.value)?);
        }

        let rows = stmt.query_map(rusqlite::params_from_iter(binds), |row| {
            row.get::<_, String>(0)
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(serde_json::from_str(&row?)?);
        }
        Ok(out)
    }

    /// `fetch` decoded into a typed row.
    pub fn fetch_as<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<T>, StoreError> {
        self.fetch(table, filters, order)?
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }

    pub fn insert(&self, table: &str, row: &serde_json::Value) -> Result<(), StoreError> {
        if !row.is_object() {
            return Err(StoreError::NotAnObject(table.to_string()));
        }
        let conn = Connection::open(&*self.db_path)?;
        conn.execute(
            "INSERT INTO rows (tbl, doc) VALUES (?1, ?2)",
            params![table, serde_json::to_string(row)?],
        )?;
        Ok(())
    }

    /// Merges the fields of `patch` into every row matching `filters`.
    /// Returns the number of rows touched.
    pub fn update(
        &self,
        table: &str,
        patch: &serde_json::Value,
        filters: &[Filter],
    ) -> Result<usize, StoreError> {
        let patch_obj = patch
            .as_object()
            .ok_or_else(|| StoreError::NotAnObject(table.to_string()))?;

        let mut conn = Connection::open(&*self.db_path)?;
        let tx = conn.transaction()?;
        let matched = matching_rows(&tx, table, filters)?;
        let count = matched.len();

        for (rowid, mut doc) in matched {
            if let Some(obj) = doc.as_object_mut() {
                for (key, value) in patch_obj {
                    obj.insert(key.clone(), value.clone());
                }
            }
            tx.execute(
                "UPDATE rows SET doc = ?1 WHERE id = ?2",
                params![serde_json::to_string(&doc)?, rowid],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }

    /// Insert-or-merge keyed on `conflict_columns`: if exactly those column
    /// values already exist in the table, the new fields are merged into the
    /// existing row; otherwise a fresh row is inserted. This is what keeps
    /// (user_id, module_id) progress rows unique.
    pub fn upsert(
        &self,
        table: &str,
        row: &serde_json::Value,
        conflict_columns: &[&str],
    ) -> Result<(), StoreError> {
        let row_obj = row
            .as_object()
            .ok_or_else(|| StoreError::NotAnObject(table.to_string()))?;

        let mut filters = Vec::new();
        for column in conflict_columns {
            let value = row_obj
                .get(*column)
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            filters.push(Filter::eq(*column, value));
        }

        let mut conn = Connection::open(&*self.db_path)?;
        let tx = conn.transaction()?;
        let matched = matching_rows(&tx, table, &filters)?;

        match matched.into_iter().next() {
            Some((rowid, mut doc)) => {
                if let Some(obj) = doc.as_object_mut() {
                    for (key, value) in row_obj {
                        obj.insert(key.clone(), value.clone());
                    }
                }
                tx.execute(
                    "UPDATE rows SET doc = ?1 WHERE id = ?2",
                    params![serde_json::to_string(&doc)?, rowid],
                )?;
            }
            None => {
                tx.execute(
                    "INSERT INTO rows (tbl, doc) VALUES (?1, ?2)",
                    params![table, serde_json::to_string(row)?],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

fn matching_rows(
    conn: &Connection,
    table: &str,
    filters: &[Filter],
) -> Result<Vec<(i64, serde_json::Value)>, StoreError> {
    let mut sql = String::from("SELECT id, doc FROM rows WHERE tbl = ?1");
    for (i, filter) in filters.iter().enumerate() {
        sql.push_str(&format!(
            " AND json_extract(doc, '$.{}') = ?{}",
            filter.column,
            i + 2
        ));
    }
    sql.push_str(" ORDER BY id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let mut binds: Vec<rusqlite::types::Value> =
        vec![rusqlite::types::Value::Text(table.to_string())];
    for filter in filters {
        binds.push(bind_value(&filter.column, &filter.value)?);
    }

    let rows = stmt.query_map(rusqlite::params_from_iter(binds), |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (rowid, doc) = row?;
        out.push((rowid, serde_json::from_str(&doc)?));
    }
    Ok(out)
}

fn bind_value(
    column: &str,
    value: &serde_json::Value,
) -> Result<rusqlite::types::Value, StoreError> {
    match value {
        serde_json::Value::Null => Ok(rusqlite::types::Value::Null),
        serde_json::Value::Bool(b) => Ok(rusqlite::types::Value::Integer(i64::from(*b))),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(rusqlite::types::Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(rusqlite::types::Value::Real(f))
            } else {
                Err(StoreError::UnsupportedFilter(column.to_string()))
            }
        }
        serde_json::Value::String(s) => Ok(rusqlite::types::Value::Text(s.clone())),
        _ => Err(StoreError::UnsupportedFilter(column.to_string())),
    }
}
