// Table Board - free tables of a table-mode unit

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

pub type TableId = u32;

/// A free table waiting to be handed to a party
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub seats: u32,
    pub note: Option<String>,
    pub created_at: i64, // epoch ms
}

impl Table {
    /// Label written into the ticket's assigned resource
    pub fn label(&self) -> String {
        match self.note.as_deref().map(str::trim) {
            Some(note) if !note.is_empty() => note.to_string(),
            _ => format!("Table {} ({} seats)", self.id, self.seats),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableBoard {
    last_id: TableId,
    free: Vec<Table>,
}

impl TableBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a free table; ids start at 1 and are never reused
    pub fn register(&mut self, seats: u32, note: Option<String>, now_millis: i64) -> Result<Table> {
        if seats == 0 {
            return Err(DomainError::ValidationError("seats must be greater than zero".to_string()));
        }

        self.last_id += 1;
        let table = Table {
            id: self.last_id,
            seats,
            note: note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_at: now_millis,
        };
        self.free.push(table.clone());
        Ok(table)
    }

    pub fn free_tables(&self) -> &[Table] {
        &self.free
    }

    pub fn find(&self, id: TableId) -> Option<&Table> {
        self.free.iter().find(|table| table.id == id)
    }

    /// Remove a table from the free list
    pub fn take(&mut self, id: TableId) -> Option<Table> {
        let idx = self.free.iter().position(|table| table.id == id)?;
        Some(self.free.remove(idx))
    }
}
