//! In-memory record stores.
//!
//! Every store is an ordered list keyed by a stable [`Uuid`]. Positional
//! access is layered on top for callers that address rows the way they are
//! displayed; a removal shifts the position of every later row, while ids
//! never change.

use uuid::Uuid;

use crate::capacity::lookup_story_points;
use crate::error::{PlannerError, Result};
use crate::models::{default_story_point_mapping, Configuration, Resource, StoryPointMappingRow};

/// A record with a stable identity.
pub trait Record: Clone {
    fn id(&self) -> Uuid;

    /// Replace the identity, used when a caller supplies a full replacement record.
    fn set_id(&mut self, id: Uuid);

    /// Error reported when `id` is not in the store.
    fn not_found(id: Uuid) -> PlannerError;
}

impl Record for Configuration {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn not_found(id: Uuid) -> PlannerError {
        PlannerError::ConfigNotFound(id)
    }
}

impl Record for StoryPointMappingRow {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn not_found(id: Uuid) -> PlannerError {
        PlannerError::MappingRowNotFound(id)
    }
}

impl Record for Resource {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn not_found(id: Uuid) -> PlannerError {
        PlannerError::ResourceNotFound(id)
    }
}

/// Ordered list of records in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStore<T> {
    records: Vec<T>,
}

pub type ConfigStore = RecordStore<Configuration>;
pub type ResourceStore = RecordStore<Resource>;
pub type StoryPointMapping = RecordStore<StoryPointMappingRow>;

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<T>) -> Self {
        Self { records }
    }

    pub fn list(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn get_at(&self, index: usize) -> Result<&T> {
        self.records
            .get(index)
            .ok_or(PlannerError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Append a record and return its id.
    pub fn add(&mut self, record: T) -> Uuid {
        let id = record.id();
        self.records.push(record);
        id
    }

    /// Replace the record with `id`. The replacement keeps that id.
    pub fn update(&mut self, id: Uuid, mut record: T) -> Result<&T> {
        let index = self.position(id).ok_or_else(|| T::not_found(id))?;
        record.set_id(id);
        self.records[index] = record;
        Ok(&self.records[index])
    }

    pub fn update_at(&mut self, index: usize, record: T) -> Result<&T> {
        let id = self.get_at(index)?.id();
        self.update(id, record)
    }

    pub fn remove(&mut self, id: Uuid) -> Result<T> {
        let index = self.position(id).ok_or_else(|| T::not_found(id))?;
        Ok(self.records.remove(index))
    }

    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        let id = self.get_at(index)?.id();
        self.remove(id)
    }
}

impl RecordStore<StoryPointMappingRow> {
    /// The default ten-row table.
    pub fn with_defaults() -> Self {
        Self::from_records(default_story_point_mapping())
    }

    /// Append an empty `0 → 0` row for the user to fill in.
    pub fn add_row(&mut self) -> Uuid {
        self.add(StoryPointMappingRow::new(0, 0))
    }

    pub fn lookup(&self, man_days: i64) -> i64 {
        lookup_story_points(&self.records, man_days)
    }

    pub fn reset(&mut self) {
        self.records = default_story_point_mapping();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConfigurationInput;

    fn config(location: &str) -> Configuration {
        Configuration::new(
            Uuid::new_v4(),
            ConfigurationInput {
                work_location: location.to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_remove_at_shifts_positions() {
        let mut store = ConfigStore::new();
        store.add(config("Pune"));
        store.add(config("Austin"));

        let removed = store.remove_at(0).unwrap();
        assert_eq!(removed.work_location, "Pune");
        assert_eq!(store.get_at(0).unwrap().work_location, "Austin");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_keeps_id_and_position() {
        let mut store = ConfigStore::new();
        let first = store.add(config("Pune"));
        store.add(config("Austin"));

        let updated = store.update(first, config("Chennai")).unwrap();
        assert_eq!(updated.id, first);
        assert_eq!(store.get_at(0).unwrap().work_location, "Chennai");
        assert_eq!(store.position(first), Some(0));
    }

    #[test]
    fn test_id_survives_earlier_removal() {
        let mut store = ConfigStore::new();
        store.add(config("Pune"));
        let austin = store.add(config("Austin"));

        store.remove_at(0).unwrap();
        assert_eq!(store.get(austin).unwrap().work_location, "Austin");
    }

    #[test]
    fn test_out_of_range_and_missing_ids_are_errors() {
        let mut store = ConfigStore::new();
        assert!(matches!(
            store.get_at(0),
            Err(PlannerError::IndexOutOfRange { index: 0, len: 0 })
        ));
        assert!(matches!(
            store.remove(Uuid::nil()),
            Err(PlannerError::ConfigNotFound(_))
        ));
        assert!(store.update_at(3, config("Pune")).is_err());
    }

    #[test]
    fn test_mapping_rows() {
        let mut mapping = StoryPointMapping::with_defaults();
        assert_eq!(mapping.lookup(9), 8);
        assert_eq!(mapping.lookup(11), 0);

        let id = mapping.add_row();
        assert_eq!(mapping.len(), 11);
        mapping.update(id, StoryPointMappingRow::new(11, 13)).unwrap();
        assert_eq!(mapping.lookup(11), 13);

        mapping.reset();
        assert_eq!(mapping.len(), 10);
        assert_eq!(mapping.lookup(11), 0);
    }
}
