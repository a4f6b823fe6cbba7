use anyhow::Result;
use cr_config::{Config, MediaConfig};
use cr_core::{AliasTable, RatingCode, UnitId, Viewer};
use cr_redact::{RedactionInfo, Redactor};
use cr_storage::{RatingBackend, RatingStore, SqliteBackend, StorageError};

use crate::{MarkerEmitter, MediaGate, RenderSession};

/// Process-wide rating service.
///
/// Built once at startup and shared by reference; the alias table and the
/// rating cache live as long as the engine does.
pub struct RatingEngine<B> {
    table: AliasTable,
    store: RatingStore<B>,
    redactor: Redactor,
    media: MediaConfig,
    strict: bool,
}

impl<B: RatingBackend> RatingEngine<B> {
    pub fn new(config: &Config, backend: B) -> Result<Self> {
        let table = config.alias_table()?;
        let redactor = Redactor::new(&table)?;
        Ok(Self {
            table,
            store: RatingStore::new(backend),
            redactor,
            media: config.media.clone(),
            strict: config.storage.strict_errors,
        })
    }

    pub fn table(&self) -> &AliasTable {
        &self.table
    }

    pub fn store(&self) -> &RatingStore<B> {
        &self.store
    }

    pub fn classify(&self, text: &str) -> Option<RatingCode> {
        self.table.classify(text)
    }

    /// Current rating of `unit`, honoring the configured error strictness
    pub async fn rating(&self, unit: UnitId) -> std::result::Result<Option<RatingCode>, StorageError> {
        if self.strict {
            self.store.try_get_rating(unit).await
        } else {
            Ok(self.store.get_rating(unit).await)
        }
    }

    pub fn emitter(&self) -> MarkerEmitter<'_, B> {
        MarkerEmitter::new(&self.table, &self.store, self.strict)
    }

    /// Start the first pass for `unit`
    pub fn session(&self, unit: UnitId) -> RenderSession<'_, B> {
        RenderSession::new(self.emitter(), unit)
    }

    pub fn gate(&self) -> MediaGate<'_, B> {
        MediaGate::new(&self.store, &self.media, self.strict)
    }

    /// Final pass over a fully rendered document
    pub fn redact(&self, text: &str, viewer: &Viewer) -> String {
        self.redactor.redact(text, viewer)
    }

    pub fn redact_with_report(&self, text: &str, viewer: &Viewer) -> (String, Vec<RedactionInfo>) {
        self.redactor.redact_with_report(text, viewer)
    }
}

impl RatingEngine<SqliteBackend> {
    /// Engine over the SQLite database named in `config`
    pub async fn open(config: &Config) -> Result<Self> {
        let backend = SqliteBackend::new(config.storage.database_path.clone()).await?;
        Self::new(config, backend)
    }
}
