use crate::error::LoadError;
use crate::types::FileRecord;
use std::collections::HashSet;
use tracing::debug;

/// Authoritative in-memory set of file records, kept in load order.
#[derive(Debug, Clone, Default)]
pub struct FileCollection {
    records: Vec<FileRecord>,
}

fn validate(records: &[FileRecord]) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for record in records {
        if record.id.trim().is_empty() {
            return Err(LoadError::MalformedRecord {
                id: record.id.clone(),
                reason: "missing id".to_string(),
            });
        }
        if record.filename.is_empty() {
            return Err(LoadError::MalformedRecord {
                id: record.id.clone(),
                reason: "missing filename".to_string(),
            });
        }
        if !seen.insert(record.id.as_str()) {
            return Err(LoadError::DuplicateId(record.id.clone()));
        }
    }
    Ok(())
}

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot replace. Prior contents survive if validation fails.
    pub fn load(&mut self, records: Vec<FileRecord>) -> Result<(), LoadError> {
        validate(&records)?;
        debug!(count = records.len(), "collection replaced");
        self.records = records;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<FileRecord> {
        let index = self.records.iter().position(|record| record.id == id)?;
        Some(self.records.remove(index))
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn all(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&FileRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
