use crate::error::Result;
use rusqlite::{params, Connection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: i64,
    pub filename: String,
    pub imported_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub filename: String,
    pub row_number: i64,
    pub raw_text: String,
    pub imported_at: i64,
}

pub struct SourceFilesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> SourceFilesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Every import run registers its file anew; provenance rows point at
    /// the run that produced them.
    pub fn register(&self, now_utc: i64, filename: &str) -> Result<SourceFile> {
        self.conn.execute(
            "INSERT INTO source_files (filename, imported_at) VALUES (?1, ?2);",
            params![filename, now_utc],
        )?;
        Ok(SourceFile {
            id: self.conn.last_insert_rowid(),
            filename: filename.to_string(),
            imported_at: now_utc,
        })
    }

    pub fn link(
        &self,
        person_id: i64,
        source_file_id: i64,
        row_number: i64,
        raw_text: &str,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO people_sources (person_id, source_file_id, row_number, raw_text)
             VALUES (?1, ?2, ?3, ?4);",
            params![person_id, source_file_id, row_number, raw_text],
        )?;
        Ok(())
    }

    pub fn provenance_for(&self, person_id: i64) -> Result<Vec<Provenance>> {
        let mut stmt = self.conn.prepare(
            "SELECT sf.filename, ps.row_number, ps.raw_text, sf.imported_at
             FROM people_sources ps
             JOIN source_files sf ON ps.source_file_id = sf.id
             WHERE ps.person_id = ?1
             ORDER BY sf.imported_at, ps.row_number;",
        )?;
        let rows = stmt.query_map(params![person_id], |row| {
            Ok(Provenance {
                filename: row.get(0)?,
                row_number: row.get(1)?,
                raw_text: row.get(2)?,
                imported_at: row.get(3)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
