//! A catalog session: the cached listing plus the user actions on it.
//!
//! The session owns its store and is the only writer in the application.
//! Actions run one at a time (`&mut self`), and every successful write is
//! followed by a refresh so the cached listing matches the store.

use koleksi_core::{CollectionItem, ImagePayload, ItemFilter, ItemForm, ItemId, MAX_IMAGE_BYTES};
use koleksi_db::{CatalogStore, StoreError};
use koleksi_import::{EXPORT_FILE_NAME, LogProgress, export_catalog, import_catalog};

use crate::confirm::Confirm;
use crate::error::CatalogError;
use crate::notice::Notice;
use crate::settings::AppSettings;

const DELETE_QUESTION: &str = "Permanently delete this collection entry?";

/// An export ready to be handed to the user as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct CatalogSession<S> {
    store: S,
    /// Newest first.
    items: Vec<CollectionItem>,
    max_image_bytes: usize,
    export_file_name: String,
}

impl<S: CatalogStore> CatalogSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            items: Vec::new(),
            max_image_bytes: MAX_IMAGE_BYTES,
            export_file_name: EXPORT_FILE_NAME.to_string(),
        }
    }

    pub fn with_settings(store: S, settings: &AppSettings) -> Self {
        Self {
            max_image_bytes: settings.intake.max_image_bytes,
            export_file_name: settings.export.file_name.clone(),
            ..Self::new(store)
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The listing as of the last refresh, newest first.
    pub fn items(&self) -> &[CollectionItem] {
        &self.items
    }

    pub fn find(&self, id: ItemId) -> Option<&CollectionItem> {
        self.items.iter().find(|item| item.id == Some(id))
    }

    /// Reload the listing from the store.
    pub async fn refresh(&mut self) -> Result<&[CollectionItem], CatalogError> {
        let mut items = self.store.list().await.map_err(CatalogError::Load)?;
        items.reverse();
        self.items = items;
        Ok(&self.items)
    }

    /// Entries of the cached listing that pass `filter`, newest first.
    pub fn visible(&self, filter: &ItemFilter) -> Vec<CollectionItem> {
        filter.apply(&self.items)
    }

    /// A form pre-filled from entry `id`, or `None` if it is not listed.
    pub fn begin_edit(&self, id: ItemId) -> Option<ItemForm> {
        self.find(id).map(ItemForm::from_item)
    }

    /// Put an uploaded image into `form`, enforcing the size limit.
    pub fn attach_image(
        &self,
        form: &mut ItemForm,
        mime: &str,
        bytes: &[u8],
    ) -> Result<(), CatalogError> {
        let payload = ImagePayload::from_bytes(mime, bytes, self.max_image_bytes)?;
        form.image = payload.into_data_uri();
        Ok(())
    }

    /// Save `form` as a new entry, or over entry `editing` when given.
    ///
    /// Validation failures leave both the form and the store untouched.
    pub async fn submit(
        &mut self,
        form: &ItemForm,
        editing: Option<ItemId>,
    ) -> Result<Notice, CatalogError> {
        let item = form.submit()?;
        let notice = match editing {
            Some(id) => {
                self.store
                    .update(id, &item)
                    .await
                    .map_err(CatalogError::Save)?;
                log::info!("Updated collection entry {}", id);
                Notice::info("Collection updated!")
            }
            None => {
                let id = self.store.add(&item).await.map_err(CatalogError::Save)?;
                log::info!("Saved collection entry {}", id);
                Notice::info("Collection saved!")
            }
        };
        self.refresh().await?;
        Ok(notice)
    }

    /// Ask for confirmation, then delete entry `id`.
    ///
    /// Returns `None` when the user declines. An entry that is already gone
    /// counts as deleted.
    pub async fn delete<C: Confirm>(
        &mut self,
        id: ItemId,
        confirmer: &C,
    ) -> Result<Option<Notice>, CatalogError> {
        if !confirmer.confirm(DELETE_QUESTION).await {
            log::debug!("Delete of entry {} declined", id);
            return Ok(None);
        }
        match self.store.delete(id).await {
            Ok(()) => log::info!("Deleted collection entry {}", id),
            Err(StoreError::NotFound(_)) => {
                log::debug!("Entry {} was already deleted", id);
            }
            Err(e) => return Err(CatalogError::Delete(e)),
        }
        self.refresh().await?;
        Ok(Some(Notice::info("Collection deleted.")))
    }

    /// Snapshot the whole catalog as a downloadable JSON file.
    pub async fn export(&self) -> Result<(ExportFile, Notice), CatalogError> {
        let bytes = export_catalog(&self.store).await?;
        let file = ExportFile {
            file_name: self.export_file_name.clone(),
            bytes,
        };
        Ok((file, Notice::info("Data exported!")))
    }

    /// Replace the whole catalog with a previously exported snapshot.
    ///
    /// On failure the catalog and the cached listing are unchanged.
    pub async fn import(&mut self, bytes: &[u8]) -> Result<Notice, CatalogError> {
        let stats = import_catalog(&self.store, bytes, Some(&LogProgress)).await?;
        self.refresh().await?;
        Ok(Notice::info(format!(
            "Data imported! {} entries loaded.",
            stats.total_records
        )))
    }
}
