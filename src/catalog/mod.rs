//! Query catalog for taxi-glance.
//!
//! The catalog is a fixed list of named analyses. Each analysis has one
//! translation per SQL dialect; a [`QueryRegistry`] is the read-only view of
//! the catalog in the dialect of the configured backend.

mod queries;

use serde::{Deserialize, Serialize};

use crate::error::{GlanceError, Result};

/// SQL dialects the catalog is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// SingleStore / MySQL dialect over the `yellow_tripdata_pl_new` table.
    SingleStore,
    /// Druid SQL over the `trips_xaa` datasource.
    Druid,
}

/// A named query ready to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDefinition {
    /// Display name, unique within a registry.
    pub name: String,
    /// SQL text sent to the backend verbatim.
    pub sql: String,
    /// Prose shown next to the result.
    pub explanation: String,
}

/// Immutable mapping from query name to definition, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct QueryRegistry {
    definitions: Vec<QueryDefinition>,
}

impl QueryRegistry {
    /// Builds a registry from definitions.
    ///
    /// Later duplicates of a name are ignored so lookups stay unambiguous.
    pub fn new(definitions: impl IntoIterator<Item = QueryDefinition>) -> Self {
        let mut unique: Vec<QueryDefinition> = Vec::new();
        for definition in definitions {
            if !unique.iter().any(|d| d.name == definition.name) {
                unique.push(definition);
            }
        }
        Self { definitions: unique }
    }

    /// Builds the registry for a dialect from the built-in taxi catalog.
    ///
    /// Analyses without a translation for the dialect are left out.
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::new(queries::CATALOG.iter().filter_map(|entry| {
            entry.translation(dialect).map(|t| QueryDefinition {
                name: entry.name.to_string(),
                sql: t.sql.to_string(),
                explanation: t.explanation.to_string(),
            })
        }))
    }

    /// Looks up a query by name.
    pub fn get(&self, name: &str) -> Result<&QueryDefinition> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| GlanceError::invalid_selection(name))
    }

    /// Returns true if the registry knows the name.
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name == name)
    }

    /// Query names in catalog order.
    pub fn keys(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }

    /// All definitions in catalog order.
    pub fn definitions(&self) -> &[QueryDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
