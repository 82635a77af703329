//! Interaction matrix tables
//!
//! A table set is declarative data: one JSON document holding a version and
//! a two-level map per layer (outer key → inner key → code). It is validated
//! once when loaded and never mutated afterwards. The process-wide default
//! set lives behind `TableRegistry` and can be swapped as a whole.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::error::TableError;
use crate::types::{InteractionCode, Layer};
use crate::{CODE_SCORE_MAX, CODE_SCORE_MIN};

/// Built-in table document, compiled into the binary
const BUILTIN_TABLES: &str = include_str!("../../tables/destiny_matrix.json");

/// outer key → inner key → code
pub type LayerTable = BTreeMap<String, BTreeMap<String, InteractionCode>>;

#[derive(Debug, Serialize, Deserialize)]
struct TableDocument {
    version: String,
    layers: BTreeMap<Layer, LayerTable>,
}

/// Validated, immutable set of interaction tables
#[derive(Debug, Clone)]
pub struct TableSet {
    version: String,
    digest: [u8; 32],
    layers: BTreeMap<Layer, LayerTable>,
}

impl TableSet {
    /// The compiled-in table set
    pub fn builtin() -> Result<Self, TableError> {
        Self::from_json_str(BUILTIN_TABLES)
    }

    /// Parse and validate a table document
    pub fn from_json_str(json: &str) -> Result<Self, TableError> {
        let doc: TableDocument = serde_json::from_str(json)?;
        Self::from_layers(doc.version, doc.layers)
    }

    /// Read, parse and validate a table document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate in-memory layers (fixture tables in tests use this)
    pub fn from_layers(
        version: impl Into<String>,
        layers: BTreeMap<Layer, LayerTable>,
    ) -> Result<Self, TableError> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(TableError::MissingVersion);
        }
        validate_layers(&layers)?;

        let doc = TableDocument { version, layers };
        let canonical = serde_json::to_vec(&doc)?;
        let digest: [u8; 32] = Sha256::digest(&canonical).into();

        let tables = Self {
            version: doc.version,
            digest,
            layers: doc.layers,
        };
        debug!(
            version = %tables.version,
            entries = tables.entry_count(),
            digest = %tables.digest_hex(),
            "interaction tables validated"
        );
        Ok(tables)
    }

    /// Cell for (key_a, key_b) in `layer`. Absence is a neutral outcome.
    pub fn lookup(&self, layer: Layer, key_a: &str, key_b: &str) -> Option<&InteractionCode> {
        self.layers.get(&layer)?.get(key_a)?.get(key_b)
    }

    pub fn layer(&self, layer: Layer) -> Option<&LayerTable> {
        self.layers.get(&layer)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    pub fn digest_hex(&self) -> String {
        self.digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Total number of cells across all layers
    pub fn entry_count(&self) -> usize {
        self.layers
            .values()
            .flat_map(|table| table.values())
            .map(|row| row.len())
            .sum()
    }
}

/// Reject any cell that breaks the content invariants
fn validate_layers(layers: &BTreeMap<Layer, LayerTable>) -> Result<(), TableError> {
    for (layer, table) in layers {
        for (key_a, row) in table {
            for (key_b, code) in row {
                if !(CODE_SCORE_MIN..=CODE_SCORE_MAX).contains(&code.score) {
                    return Err(TableError::ScoreOutOfScale {
                        layer: *layer,
                        key_a: key_a.clone(),
                        key_b: key_b.clone(),
                        score: code.score,
                    });
                }
                if !code.level.accepts(code.score) {
                    return Err(TableError::LevelScoreMismatch {
                        layer: *layer,
                        key_a: key_a.clone(),
                        key_b: key_b.clone(),
                        level: code.level.to_string(),
                        score: code.score,
                    });
                }
                if code.color != code.level.color() {
                    return Err(TableError::LevelColorMismatch {
                        layer: *layer,
                        key_a: key_a.clone(),
                        key_b: key_b.clone(),
                        level: code.level.to_string(),
                        color: code.color.to_string(),
                        expected: code.level.color().to_string(),
                    });
                }
                if let Some(locale) = code.keyword.missing_locale() {
                    return Err(TableError::MissingLocale {
                        layer: *layer,
                        key_a: key_a.clone(),
                        key_b: key_b.clone(),
                        locale,
                    });
                }
            }
        }
    }
    Ok(())
}

// =============================================================================
// PROCESS-WIDE TABLE SET
// =============================================================================

lazy_static! {
    // A built-in set that fails validation must stop the process before it
    // serves a single request.
    static ref REGISTRY: RwLock<Arc<TableSet>> = RwLock::new(Arc::new(
        TableSet::builtin().expect("built-in interaction tables failed validation")
    ));
}

/// Read-only process-wide table set with an explicit whole-set reload
pub struct TableRegistry;

impl TableRegistry {
    /// Snapshot of the active set. Holders keep using it across reloads.
    pub fn current() -> Arc<TableSet> {
        REGISTRY
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the active set atomically, returning the previous snapshot
    pub fn reload(tables: TableSet) -> Arc<TableSet> {
        let next = Arc::new(tables);
        let mut guard = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
        if guard.version() == next.version() && guard.digest() != next.digest() {
            warn!(version = %next.version(), "reloaded tables reuse a version with different content");
        }
        info!(from = %guard.version(), to = %next.version(), "interaction tables reloaded");
        std::mem::replace(&mut *guard, next)
    }
}
