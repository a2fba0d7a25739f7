use crate::error::{Result, StoreError};
use rusqlite::{params, Connection, OptionalExtension};

// ASCII-only normalization keeps SQLite and Rust matching consistent.
fn normalize_city_key(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityCount {
    pub city: City,
    pub people: i64,
}

pub struct CitiesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> CitiesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Look up a city by name (case-insensitive), creating it on first
    /// sight. The original casing of the first spelling wins.
    pub fn get_or_create(&self, now_utc: i64, raw_name: &str) -> Result<City> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidCityName(raw_name.to_string()));
        }

        if let Some(city) = self.get_by_name(name)? {
            return Ok(city);
        }

        self.conn.execute(
            "INSERT INTO cities (name, name_norm, created_at) VALUES (?1, ?2, ?3);",
            params![name, normalize_city_key(name), now_utc],
        )?;
        Ok(City {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            created_at: now_utc,
        })
    }

    pub fn get_by_name(&self, raw_name: &str) -> Result<Option<City>> {
        let city = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM cities WHERE name_norm = ?1 LIMIT 1;",
                params![normalize_city_key(raw_name)],
                |row| {
                    Ok(City {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(city)
    }

    pub fn list_with_counts(&self) -> Result<Vec<CityCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.name, c.created_at, COUNT(p.id)
             FROM cities c
             LEFT JOIN people p ON p.city_id = c.id
             GROUP BY c.id
             ORDER BY c.name COLLATE NOCASE;",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CityCount {
                city: City {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                },
                people: row.get(3)?,
            })
        })?;
        let mut cities = Vec::new();
        for row in rows {
            cities.push(row?);
        }
        Ok(cities)
    }
}
