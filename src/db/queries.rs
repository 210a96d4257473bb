use super::models::{IndexRow, IndexStats, MidiRecord};
use super::{Database, Result};
use rusqlite::{OptionalExtension, params};

impl Database {
    /// Insert a row, or replace the existing row with the same name.
    /// The old row is discarded entirely (the unique constraint resolves
    /// conflicts with REPLACE), so error rows never keep stale analysis.
    pub fn upsert_record(&self, r: &MidiRecord) -> Result<()> {
        let noteset = r.noteset.as_ref().map(serde_json::to_string).transpose()?;
        self.conn.execute(
            "INSERT INTO midis (name, keys, notecount, noteset, errors)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![r.name, r.keys, r.notecount, noteset, r.errors],
        )?;
        Ok(())
    }

    /// Every distinct grouping label, sorted. Error rows carry no label and
    /// do not appear here.
    pub fn distinct_groupings(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT keys FROM midis WHERE keys IS NOT NULL ORDER BY keys",
        )?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// All rows sorted by grouping label (then name), so each group's rows
    /// are contiguous.
    pub fn rows_ordered_by_grouping(&self) -> Result<Vec<IndexRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, errors, keys, noteset, notecount
             FROM midis ORDER BY keys, name",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(IndexRow {
                    name: row.get(0)?,
                    errors: row.get(1)?,
                    keys: row.get(2)?,
                    noteset: row.get(3)?,
                    notecount: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Look up a single file's row, decoding the stored noteset.
    pub fn get_record(&self, name: &str) -> Result<Option<MidiRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT name, keys, notecount, noteset, errors FROM midis WHERE name = ?1",
                params![name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<String>>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((name, keys, notecount, noteset, errors)) = row else {
            return Ok(None);
        };
        let noteset = noteset.as_deref().map(parse_noteset).transpose()?;
        Ok(Some(MidiRecord { name, keys, noteset, notecount, errors }))
    }

    pub fn stats(&self) -> Result<IndexStats> {
        let total_files: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM midis",
            [],
            |row| row.get(0),
        )?;

        let error_files: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM midis WHERE errors IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        let mut group_stmt = self.conn.prepare(
            "SELECT keys, COUNT(*) FROM midis
             WHERE keys IS NOT NULL
             GROUP BY keys ORDER BY keys",
        )?;
        let groupings: Vec<(String, i64)> = group_stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(IndexStats {
            total_files,
            analyzed_files: total_files - error_files,
            error_files,
            groupings,
        })
    }
}

/// Decode a stored noteset. Besides JSON, accepts the single-quoted list
/// form (`['C', 'E']`) written by older indexes.
pub fn parse_noteset(text: &str) -> Result<Vec<String>> {
    match serde_json::from_str::<Vec<String>>(text) {
        Ok(notes) => Ok(notes),
        Err(e) => serde_json::from_str::<Vec<String>>(&text.replace('\'', "\""))
            .map_err(|_| e.into()),
    }
}
