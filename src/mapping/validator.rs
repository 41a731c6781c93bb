//! Mapping validation: identity columns, foreign key targets and relation keys.

use super::{ColumnType, EntityMapping};
use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};

pub fn validate(mappings: &[&EntityMapping]) -> Result<(), ConfigError> {
    let mut by_table: HashMap<&str, &EntityMapping> = HashMap::new();
    for m in mappings {
        if by_table.insert(m.table, m).is_some() {
            return Err(ConfigError::DuplicateTable(m.table.to_string()));
        }
    }

    for m in mappings {
        let identities: Vec<&str> = m
            .columns
            .iter()
            .filter(|c| c.column_type == ColumnType::Identity)
            .map(|c| c.name)
            .collect();
        if identities != [m.id_column] {
            return Err(ConfigError::InvalidIdentity {
                table: m.table.to_string(),
                column: m.id_column.to_string(),
            });
        }

        let mut seen = HashSet::new();
        for c in m.columns {
            if !seen.insert(c.name) {
                return Err(ConfigError::Validation(format!("duplicate column {}.{}", m.table, c.name)));
            }
            let Some(fk) = c.references else { continue };
            let target = by_table.get(fk.table).ok_or_else(|| ConfigError::MissingReference {
                kind: "table",
                id: fk.table.to_string(),
            })?;
            if target.column(fk.column).is_none() {
                return Err(ConfigError::MissingReference {
                    kind: "column",
                    id: format!("{}.{}", fk.table, fk.column),
                });
            }
        }

        for rel in m.relations {
            if m.column(rel.name).is_some() {
                return Err(ConfigError::Validation(format!(
                    "relation {}.{} collides with a column",
                    m.table, rel.name
                )));
            }
            if m.column(rel.our_key).is_none() {
                return Err(ConfigError::MissingReference {
                    kind: "column",
                    id: format!("{}.{}", m.table, rel.our_key),
                });
            }
            let related = (rel.related)();
            if !by_table.contains_key(related.table) {
                return Err(ConfigError::MissingReference {
                    kind: "table",
                    id: related.table.to_string(),
                });
            }
            if related.column(rel.their_key).is_none() {
                return Err(ConfigError::MissingReference {
                    kind: "column",
                    id: format!("{}.{}", related.table, rel.their_key),
                });
            }
        }
    }

    Ok(())
}
