//! In-process table store implementing [`TableTransport`].
//!
//! Mirrors the remote semantics the services depend on: ids are assigned on
//! create, `PATCH`-style updates merge fields (`null` clears a field), and
//! unknown ids fail with a 404. Every call is counted, and failures can be
//! injected per table or after a number of successful calls.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;

use folio_core::RecordId;

use super::types::{DeletedRecord, Fields, Record};
use super::{TableTransport, TransportError};

const RECORD_ID_PREFIX: &str = "rec";
const RECORD_ID_LEN: usize = 14;

/// In-memory tabular store.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    tables: Mutex<BTreeMap<String, Vec<Record>>>,
    calls: AtomicUsize,
    faults: Mutex<Faults>,
}

#[derive(Debug, Default)]
struct Faults {
    unavailable: HashSet<String>,
    /// Successful calls left before every call fails.
    budget: Option<usize>,
}

impl MemoryTransport {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing call counting and fault injection.
    pub fn seed(&self, table: &str, fields: Fields) -> Record {
        let record = new_record(fields);
        self.tables()
            .entry(table.to_owned())
            .or_default()
            .push(record.clone());
        record
    }

    /// Snapshot of a table's records.
    #[must_use]
    pub fn records(&self, table: &str) -> Vec<Record> {
        self.tables().get(table).cloned().unwrap_or_default()
    }

    /// Number of transport calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every call against `table` fail with a 503, or restore it.
    pub fn set_unavailable(&self, table: &str, unavailable: bool) {
        let mut faults = self.faults();
        if unavailable {
            faults.unavailable.insert(table.to_owned());
        } else {
            faults.unavailable.remove(table);
        }
    }

    /// Let `successes` more calls through, then fail every call with a 500.
    pub fn fail_after(&self, successes: usize) {
        self.faults().budget = Some(successes);
    }

    /// Count the call and apply injected faults.
    fn enter(&self, table: &str) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut faults = self.faults();

        if faults.unavailable.contains(table) {
            return Err(TransportError::Api {
                status: 503,
                message: format!("Table {table} is unavailable"),
            });
        }

        match &mut faults.budget {
            Some(0) => Err(TransportError::Api {
                status: 500,
                message: "Injected failure".to_string(),
            }),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn tables(&self) -> MutexGuard<'_, BTreeMap<String, Vec<Record>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TableTransport for MemoryTransport {
    async fn list(&self, table: &str) -> Result<Vec<Record>, TransportError> {
        self.enter(table)?;
        Ok(self.records(table))
    }

    async fn create(&self, table: &str, fields: Fields) -> Result<Record, TransportError> {
        self.enter(table)?;
        let record = new_record(strip_nulls(fields));
        self.tables()
            .entry(table.to_owned())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        table: &str,
        id: &RecordId,
        fields: Fields,
    ) -> Result<Record, TransportError> {
        self.enter(table)?;
        let mut tables = self.tables();
        let record = tables
            .get_mut(table)
            .and_then(|records| records.iter_mut().find(|r| &r.id == id))
            .ok_or_else(|| not_found(id))?;

        for (key, value) in fields {
            if value.is_null() {
                record.fields.remove(&key);
            } else {
                record.fields.insert(key, value);
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, table: &str, id: &RecordId) -> Result<DeletedRecord, TransportError> {
        self.enter(table)?;
        let mut tables = self.tables();
        let records = tables.get_mut(table).ok_or_else(|| not_found(id))?;
        let position = records
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| not_found(id))?;
        records.remove(position);

        Ok(DeletedRecord {
            id: id.clone(),
            deleted: true,
        })
    }
}

fn new_record(fields: Fields) -> Record {
    Record {
        id: generate_id(),
        created_time: Some(Utc::now()),
        fields,
    }
}

#[allow(clippy::expect_used)]
fn generate_id() -> RecordId {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RECORD_ID_LEN)
        .map(char::from)
        .collect();
    RecordId::parse(&format!("{RECORD_ID_PREFIX}{suffix}")).expect("generated id is non-empty")
}

fn strip_nulls(fields: Fields) -> Fields {
    fields.into_iter().filter(|(_, v)| !v.is_null()).collect()
}

fn not_found(id: &RecordId) -> TransportError {
    TransportError::Api {
        status: 404,
        message: format!("Could not find record {id}"),
    }
}
