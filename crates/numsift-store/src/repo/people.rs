use crate::error::{Result, StoreError};
use numsift_core::MobileNumber;
use rusqlite::{params, Connection, OptionalExtension, Row};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: i64,
    pub phone: MobileNumber,
    pub city_id: Option<i64>,
    pub created_at: i64,
}

/// One line of a city export: a stored person joined against provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub phone: MobileNumber,
    pub city: String,
    pub filename: Option<String>,
    pub row_number: Option<i64>,
    pub imported_at: Option<i64>,
}

pub struct PeopleRepo<'a> {
    conn: &'a Connection,
}

impl<'a> PeopleRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Upsert keyed on (phone, city). Returns the row plus whether it was
    /// freshly created; re-importing the same number is a no-op.
    pub fn record(
        &self,
        now_utc: i64,
        phone: &MobileNumber,
        city_id: Option<i64>,
    ) -> Result<(Person, bool)> {
        let tx = self.conn.unchecked_transaction()?;
        let existing: Option<(i64, i64)> = tx
            .query_row(
                "SELECT id, created_at FROM people
                 WHERE phone = ?1 AND IFNULL(city_id, 0) = IFNULL(?2, 0)
                 LIMIT 1;",
                params![phone.as_str(), city_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        if let Some((id, created_at)) = existing {
            tx.commit()?;
            return Ok((
                Person {
                    id,
                    phone: phone.clone(),
                    city_id,
                    created_at,
                },
                false,
            ));
        }

        tx.execute(
            "INSERT INTO people (phone, city_id, created_at) VALUES (?1, ?2, ?3);",
            params![phone.as_str(), city_id, now_utc],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok((
            Person {
                id,
                phone: phone.clone(),
                city_id,
                created_at: now_utc,
            },
            true,
        ))
    }

    pub fn get(&self, id: i64) -> Result<Option<Person>> {
        let person = self
            .conn
            .query_row(
                "SELECT id, phone, city_id, created_at FROM people WHERE id = ?1;",
                params![id],
                person_from_row,
            )
            .optional()?;
        person.map(into_person).transpose()
    }

    pub fn list_by_city(&self, city_id: i64) -> Result<Vec<Person>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, phone, city_id, created_at FROM people
             WHERE city_id = ?1 ORDER BY phone;",
        )?;
        let rows = stmt.query_map(params![city_id], person_from_row)?;
        let mut people = Vec::new();
        for row in rows {
            people.push(into_person(row?)?);
        }
        Ok(people)
    }

    pub fn count(&self) -> Result<i64> {
        let count =
            self.conn
                .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Everyone recorded for a city, joined with where they came from.
    pub fn export_rows(&self, city_id: i64) -> Result<Vec<ExportRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT p.phone, c.name, sf.filename, ps.row_number, sf.imported_at
             FROM people p
             JOIN cities c ON p.city_id = c.id
             LEFT JOIN people_sources ps ON ps.person_id = p.id
             LEFT JOIN source_files sf ON ps.source_file_id = sf.id
             WHERE p.city_id = ?1
             ORDER BY p.phone, sf.filename, ps.row_number;",
        )?;
        let rows = stmt.query_map(params![city_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, Option<i64>>(4)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (phone, city, filename, row_number, imported_at) = row?;
            out.push(ExportRow {
                phone: parse_phone(phone)?,
                city,
                filename,
                row_number,
                imported_at,
            });
        }
        Ok(out)
    }
}

type RawPerson = (i64, String, Option<i64>, i64);

fn person_from_row(row: &Row<'_>) -> rusqlite::Result<RawPerson> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_person(raw: RawPerson) -> Result<Person> {
    let (id, phone, city_id, created_at) = raw;
    Ok(Person {
        id,
        phone: parse_phone(phone)?,
        city_id,
        created_at,
    })
}

fn parse_phone(raw: String) -> Result<MobileNumber> {
    MobileNumber::new(&raw).map_err(StoreError::Core)
}
