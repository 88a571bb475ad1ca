use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use namefind_common::record::{Gender, NameRecord};

// ── Schema ────────────────────────────────────────────────────────────────────

pub fn open(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("opening {}", db_path.display()))?;
    conn.execute_batch(include_str!("schema.sql"))
        .context("initialising schema")?;
    Ok(conn)
}

// ── Insert ────────────────────────────────────────────────────────────────────

const INSERT_SQL: &str =
    "INSERT INTO records (name, alt_names, age, gender, case_type, case_fir, location, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// Insert one record. Values are always bound, never interpolated.
pub fn insert_record(conn: &Connection, record: &NameRecord) -> Result<i64> {
    let alt_names = serde_json::to_string(&record.alternate_names)?;
    conn.execute(
        INSERT_SQL,
        params![
            record.name,
            alt_names,
            record.age,
            record.gender.as_str(),
            record.case_type,
            record.case_fir,
            record.location,
            chrono::Utc::now().timestamp(),
        ],
    )
    .with_context(|| format!("inserting record {:?}", record.name))?;
    Ok(conn.last_insert_rowid())
}

/// Insert a batch in one transaction.
pub fn insert_records(conn: &Connection, records: &[NameRecord]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let now = chrono::Utc::now().timestamp();
    {
        let mut stmt = tx.prepare_cached(INSERT_SQL)?;
        for record in records {
            let alt_names = serde_json::to_string(&record.alternate_names)?;
            stmt.execute(params![
                record.name,
                alt_names,
                record.age,
                record.gender.as_str(),
                record.case_type,
                record.case_fir,
                record.location,
                now,
            ])
            .with_context(|| format!("inserting record {:?}", record.name))?;
        }
    }
    tx.commit()?;
    Ok(records.len())
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// All records in insertion order. This order is the ranking tie-break.
pub fn load_records(conn: &Connection) -> Result<Vec<NameRecord>> {
    let mut stmt = conn.prepare(
        "SELECT name, alt_names, age, gender, case_type, case_fir, location
         FROM records ORDER BY id",
    )?;
    let rows = stmt
        .query_map([], row_to_record)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<NameRecord> {
    let alt_names: String = row.get(1)?;
    let gender: String = row.get(3)?;
    Ok(NameRecord {
        name: row.get(0)?,
        // A corrupt alt_names cell only loses the alternates, not the record.
        alternate_names: serde_json::from_str(&alt_names).unwrap_or_default(),
        age: row.get(2)?,
        gender: Gender::parse(&gender),
        case_type: row.get(4)?,
        case_fir: row.get(5)?,
        location: row.get(6)?,
    })
}

pub fn count_records(conn: &Connection) -> Result<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
    Ok(n as usize)
}
