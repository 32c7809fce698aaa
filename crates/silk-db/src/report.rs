//! Tabular reports built from raw read-only SQL.
//!
//! The report carries data only: column labels, rows, and an optional
//! total over one numeric column. Layout is left to whoever renders it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use silk_core::ShopError;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Column, Executor, Row, SqlitePool, TypeInfo, ValueRef};
use tracing::{instrument, warn};

use crate::db_error;

/// Query behind the stock report. Column aliases become report headers.
pub const STOCK_REPORT_SQL: &str =
    r#"SELECT id AS "ID", name AS "Name", image AS "Image url", price AS "Price" FROM items"#;

/// A generated report
#[derive(Debug, Clone, Serialize)]
pub struct StockReport {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    pub generated_at: DateTime<Utc>,
}

/// The "Stock details" report over every catalog item, totalled by price.
pub async fn stock_report(pool: &SqlitePool) -> Result<StockReport, ShopError> {
    run_report(pool, "Stock details", STOCK_REPORT_SQL, Some("Price")).await
}

/// Run a read-only query and collect the result as a report.
///
/// The query runs on a connection with `PRAGMA query_only` set, so trailing
/// statements that write fail instead of touching the store.
///
/// # Errors
///
/// Returns `ShopError::InvalidRequest` if `sql` is not a SELECT, or if
/// `total_column` does not name a result column. A write smuggled into
/// `sql` surfaces as `ShopError::Database`.
#[instrument(skip(pool))]
pub async fn run_report(
    pool: &SqlitePool,
    title: &str,
    sql: &str,
    total_column: Option<&str>,
) -> Result<StockReport, ShopError> {
    if !sql.trim_start().to_ascii_lowercase().starts_with("select") {
        return Err(ShopError::InvalidRequest(
            "reports only accept SELECT statements".to_string(),
        ));
    }

    let mut conn = pool.acquire().await.map_err(db_error)?;
    sqlx::query("PRAGMA query_only = ON")
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    let fetched = fetch_read_only(&mut conn, sql).await;

    if let Err(e) = sqlx::query("PRAGMA query_only = OFF")
        .execute(&mut *conn)
        .await
    {
        warn!("Closing report connection stuck in query_only: {}", e);
        let _ = conn.close().await;
        return Err(db_error(e));
    }

    let (columns, result) = fetched.map_err(db_error)?;

    let mut rows = Vec::with_capacity(result.len());
    for row in &result {
        let mut values = Vec::with_capacity(columns.len());
        for index in 0..row.columns().len() {
            values.push(cell_value(row, index)?);
        }
        rows.push(values);
    }

    let total = match total_column {
        Some(name) => {
            let index = columns.iter().position(|c| c == name).ok_or_else(|| {
                ShopError::InvalidRequest(format!("no column named {name} in report"))
            })?;
            Some(
                rows.iter()
                    .filter_map(|r| r.get(index).and_then(Value::as_f64))
                    .sum(),
            )
        }
        None => None,
    };

    Ok(StockReport {
        title: title.to_string(),
        columns,
        rows,
        total_column: total_column.map(String::from),
        total,
        generated_at: Utc::now(),
    })
}

/// Column labels come from the prepared statement, so an empty result
/// still has headers.
async fn fetch_read_only(
    conn: &mut SqliteConnection,
    sql: &str,
) -> Result<(Vec<String>, Vec<SqliteRow>), sqlx::Error> {
    let columns = (&mut *conn)
        .describe(sql)
        .await?
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let rows = sqlx::query(sql).fetch_all(&mut *conn).await?;
    Ok((columns, rows))
}

fn cell_value(row: &SqliteRow, index: usize) -> Result<Value, ShopError> {
    let raw = row.try_get_raw(index).map_err(db_error)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let type_name = raw.type_info().name().to_string();
    let value = match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get::<i64, _>(index).map_err(db_error)?),
        "REAL" => Value::from(row.try_get::<f64, _>(index).map_err(db_error)?),
        "TEXT" => Value::from(row.try_get::<String, _>(index).map_err(db_error)?),
        _ => Value::Null,
    };
    Ok(value)
}
