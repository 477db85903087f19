//! Beer record service.
//!
//! [`BeerService`] maps the five catalogue operations onto single SQL
//! statements against the `beer` table and maps rows back into [`Beer`]
//! values. It owns no state besides the injected [`Storage`]; every call
//! borrows one connection, runs one statement, and gives the connection
//! back before returning.

use beerstore_db::{ConnectionError, Storage};
use beerstore_types::{Beer, BeerStyle, BeerType};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use thiserror::Error;

/// Errors that can occur during beer operations.
#[derive(Debug, Error)]
pub enum BeerError {
    /// No connection could be obtained from storage.
    #[error("storage connection unavailable: {0}")]
    Connection(#[from] ConnectionError),
    /// No beer exists with the given id.
    #[error("beer not found: {0}")]
    NotFound(i64),
    /// The statement failed, including constraint violations and rows that
    /// do not map to a valid `Beer`.
    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),
}

const SELECT_COLUMNS: &str = "SELECT id, name, type, style FROM beer";

/// CRUD service over the `beer` table.
#[derive(Debug, Clone)]
pub struct BeerService<S> {
    storage: S,
}

impl<S: Storage> BeerService<S> {
    /// Wraps an already-open storage handle. The schema must already exist.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Inserts a new beer.
    ///
    /// The id is taken from `beer` as-is. An id that is already stored is
    /// rejected by the database and surfaces as [`BeerError::Storage`].
    pub fn store(&self, beer: &Beer) -> Result<(), BeerError> {
        let conn = self.storage.connection()?;
        conn.execute(
            "INSERT INTO beer (id, name, type, style) VALUES (?1, ?2, ?3, ?4)",
            params![
                beer.id,
                beer.name,
                beer.beer_type.as_i64(),
                beer.style.as_i64()
            ],
        )?;
        tracing::debug!(beer_id = beer.id, "stored beer");
        Ok(())
    }

    /// Retrieves a beer by id.
    pub fn get(&self, id: i64) -> Result<Beer, BeerError> {
        let conn = self.storage.connection()?;
        let beer = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                map_row_to_beer,
            )
            .optional()?;
        beer.ok_or(BeerError::NotFound(id))
    }

    /// Lists every stored beer.
    ///
    /// Rows come back in whatever order SQLite produces; no sort order is
    /// promised. An empty table yields an empty vector.
    pub fn get_all(&self) -> Result<Vec<Beer>, BeerError> {
        let conn = self.storage.connection()?;
        let mut stmt = conn.prepare(SELECT_COLUMNS)?;

        let rows = stmt.query_map([], map_row_to_beer)?;
        let mut beers = Vec::new();
        for row in rows {
            beers.push(row?);
        }
        tracing::debug!(count = beers.len(), "listed beers");
        Ok(beers)
    }

    /// Replaces name, type, and style of the beer with `beer.id`.
    ///
    /// Updating an id that is not stored changes nothing and still
    /// succeeds.
    pub fn update(&self, beer: &Beer) -> Result<(), BeerError> {
        let conn = self.storage.connection()?;
        let count = conn.execute(
            "UPDATE beer SET name = ?1, type = ?2, style = ?3 WHERE id = ?4",
            params![
                beer.name,
                beer.beer_type.as_i64(),
                beer.style.as_i64(),
                beer.id
            ],
        )?;
        if count == 0 {
            tracing::debug!(beer_id = beer.id, "update matched no beer");
        } else {
            tracing::debug!(beer_id = beer.id, "updated beer");
        }
        Ok(())
    }

    /// Deletes the beer with `id`.
    ///
    /// Removing an id that is not stored is not an error.
    pub fn remove(&self, id: i64) -> Result<(), BeerError> {
        let conn = self.storage.connection()?;
        let count = conn.execute("DELETE FROM beer WHERE id = ?1", [id])?;
        if count == 0 {
            tracing::debug!(beer_id = id, "remove matched no beer");
        } else {
            tracing::debug!(beer_id = id, "removed beer");
        }
        Ok(())
    }
}

fn map_row_to_beer(row: &Row) -> rusqlite::Result<Beer> {
    let type_code: i64 = row.get(2)?;
    let beer_type = BeerType::from_i64(type_code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Integer,
            format!("unknown beer type code: {type_code}").into(),
        )
    })?;

    let style_code: i64 = row.get(3)?;
    let style = BeerStyle::from_i64(style_code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Integer,
            format!("unknown beer style code: {style_code}").into(),
        )
    })?;

    Ok(Beer {
        id: row.get(0)?,
        name: row.get(1)?,
        beer_type,
        style,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use beerstore_db::init_schema;
    use rusqlite::Connection;
    use std::sync::{Arc, Mutex};
    use std::thread;

    fn setup_service() -> BeerService<Mutex<Connection>> {
        let conn = Connection::open_in_memory().expect("failed to open in-memory db");
        init_schema(&conn).expect("failed to create schema");
        BeerService::new(Mutex::new(conn))
    }

    fn sample_beer(id: i64, name: &str) -> Beer {
        Beer {
            id,
            name: name.to_string(),
            beer_type: BeerType::Lager,
            style: BeerStyle::Pale,
        }
    }

    #[test]
    fn test_beer_lifecycle() {
        let service = setup_service();

        // Store
        service
            .store(&sample_beer(1, "Heineken"))
            .expect("store failed");

        // Get
        let saved = service.get(1).expect("get failed");
        assert_eq!(saved, sample_beer(1, "Heineken"));

        // Update
        service
            .update(&sample_beer(1, "Heineken_new"))
            .expect("update failed");
        let updated = service.get(1).expect("get updated failed");
        assert_eq!(updated.name, "Heineken_new");

        // Remove
        service.remove(1).expect("remove failed");
        match service.get(1) {
            Err(BeerError::NotFound(id)) => assert_eq!(id, 1),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_store_duplicate_id() {
        let service = setup_service();
        service
            .store(&sample_beer(7, "Guinness"))
            .expect("first store failed");

        let err = service
            .store(&sample_beer(7, "Another"))
            .expect_err("duplicate id should fail");
        match err {
            BeerError::Storage(e) => assert_eq!(
                e.sqlite_error_code(),
                Some(rusqlite::ErrorCode::ConstraintViolation)
            ),
            other => panic!("unexpected error type: {other:?}"),
        }

        // The original row is untouched.
        assert_eq!(service.get(7).expect("get failed").name, "Guinness");
    }

    #[test]
    fn test_update_replaces_type_and_style() {
        let service = setup_service();
        service
            .store(&sample_beer(3, "Mystery"))
            .expect("store failed");

        let replacement = Beer {
            id: 3,
            name: "Mystery Stout".to_string(),
            beer_type: BeerType::Stout,
            style: BeerStyle::Dark,
        };
        service.update(&replacement).expect("update failed");
        assert_eq!(service.get(3).expect("get failed"), replacement);
    }

    #[test]
    fn test_get_all_empty() {
        let service = setup_service();
        let beers = service.get_all().expect("get_all failed");
        assert!(beers.is_empty());
    }

    #[test]
    fn test_get_all_returns_every_beer() {
        let service = setup_service();
        for id in 1..=3 {
            service
                .store(&sample_beer(id, &format!("Heineken{id}")))
                .expect("store failed");
        }

        let mut beers = service.get_all().expect("get_all failed");
        assert_eq!(beers.len(), 3);
        beers.sort_by_key(|b| b.id);
        for (i, beer) in beers.iter().enumerate() {
            let id = i as i64 + 1;
            assert_eq!(*beer, sample_beer(id, &format!("Heineken{id}")));
        }
    }

    #[test]
    fn test_get_nonexistent() {
        let service = setup_service();
        let err = service.get(42).expect_err("missing beer should fail");
        assert!(matches!(err, BeerError::NotFound(42)));
    }

    #[test]
    fn test_update_nonexistent_is_silent() {
        let service = setup_service();
        service
            .update(&sample_beer(99, "Ghost"))
            .expect("zero-row update should succeed");
        assert!(matches!(service.get(99), Err(BeerError::NotFound(99))));
        assert!(service.get_all().expect("get_all failed").is_empty());
    }

    #[test]
    fn test_remove_nonexistent_is_silent() {
        let service = setup_service();
        service
            .store(&sample_beer(1, "Heineken"))
            .expect("store failed");
        service.remove(2).expect("zero-row remove should succeed");
        assert_eq!(service.get_all().expect("get_all failed").len(), 1);
    }

    #[test]
    fn test_unknown_codes_surface_as_storage_error() {
        let conn = Connection::open_in_memory().expect("failed to open in-memory db");
        init_schema(&conn).expect("failed to create schema");
        conn.execute(
            "INSERT INTO beer (id, name, type, style) VALUES (1, 'Odd', 42, 6)",
            [],
        )
        .expect("raw insert failed");
        conn.execute(
            "INSERT INTO beer (id, name, type, style) VALUES (2, 'Odder', 2, 0)",
            [],
        )
        .expect("raw insert failed");
        let service = BeerService::new(Mutex::new(conn));

        assert!(matches!(
            service.get(1),
            Err(BeerError::Storage(rusqlite::Error::FromSqlConversionFailure(
                2, ..
            )))
        ));
        assert!(matches!(
            service.get(2),
            Err(BeerError::Storage(rusqlite::Error::FromSqlConversionFailure(
                3, ..
            )))
        ));
        assert!(matches!(service.get_all(), Err(BeerError::Storage(_))));
    }

    #[test]
    fn test_missing_table_is_storage_error() {
        let conn = Connection::open_in_memory().expect("failed to open in-memory db");
        let service = BeerService::new(Mutex::new(conn));

        assert!(matches!(
            service.store(&sample_beer(1, "Heineken")),
            Err(BeerError::Storage(_))
        ));
        assert!(matches!(service.get(1), Err(BeerError::Storage(_))));
        assert!(matches!(service.get_all(), Err(BeerError::Storage(_))));
        assert!(matches!(
            service.update(&sample_beer(1, "Heineken")),
            Err(BeerError::Storage(_))
        ));
        assert!(matches!(service.remove(1), Err(BeerError::Storage(_))));
    }

    #[test]
    fn test_poisoned_storage_is_connection_error() {
        let conn = Connection::open_in_memory().expect("failed to open in-memory db");
        init_schema(&conn).expect("failed to create schema");
        let storage = Arc::new(Mutex::new(conn));

        let holder = Arc::clone(&storage);
        let _ = thread::spawn(move || {
            let _guard = holder.lock().expect("first lock");
            panic!("poison the connection lock");
        })
        .join();

        let service = BeerService::new(storage);
        assert!(matches!(
            service.store(&sample_beer(1, "Heineken")),
            Err(BeerError::Connection(ConnectionError::Poisoned))
        ));
        assert!(matches!(
            service.get(1),
            Err(BeerError::Connection(ConnectionError::Poisoned))
        ));
        assert!(matches!(
            service.get_all(),
            Err(BeerError::Connection(ConnectionError::Poisoned))
        ));
        assert!(matches!(
            service.update(&sample_beer(1, "Heineken_new")),
            Err(BeerError::Connection(ConnectionError::Poisoned))
        ));
        assert!(matches!(
            service.remove(1),
            Err(BeerError::Connection(ConnectionError::Poisoned))
        ));
    }

    #[test]
    fn test_borrowed_storage() {
        let conn = Connection::open_in_memory().expect("failed to open in-memory db");
        init_schema(&conn).expect("failed to create schema");
        let storage = Mutex::new(conn);

        BeerService::new(&storage)
            .store(&sample_beer(5, "Brahma"))
            .expect("store failed");
        let beer = BeerService::new(&storage).get(5).expect("get failed");
        assert_eq!(beer.name, "Brahma");
    }
}
