use std::time::Duration;

use chrono::Utc;

use crate::{
    core::{
        errors::{ItemListError, ItemListResult},
        models::{EditDraft, Item, ItemFields, ItemPatch},
        remote,
    },
    storage::r#trait::DocumentStore,
};

/// Local mirror of one collection plus the inline edit state.
///
/// Every mutating handler awaits the store first and touches local state only
/// after the store confirmed, so a failed call leaves nothing half-applied.
pub struct ItemListView<S: DocumentStore> {
    store: S,
    collection: String,
    timeout: Option<Duration>,
    items: Vec<Item>,
    new_item_input: String,
    draft: Option<EditDraft>,
}

impl<S: DocumentStore> ItemListView<S> {
    pub fn new(store: S, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            timeout: None,
            items: Vec::new(),
            new_item_input: String::new(),
            draft: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn new_item_input(&self) -> &str {
        &self.new_item_input
    }

    pub fn set_new_item_input(&mut self, value: impl Into<String>) {
        self.new_item_input = value.into();
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    pub async fn load(&mut self) -> ItemListResult<()> {
        let documents = remote::call(self.timeout, "list_all", self.store.list_all(&self.collection))
            .await
            .inspect_err(|err| {
                tracing::error!(collection = %self.collection, error = %err, "failed to load items");
            })?;

        self.items = documents.into_iter().map(Item::from_document).collect();
        Ok(())
    }

    pub async fn submit_new_item(&mut self) -> ItemListResult<Option<Item>> {
        let name = self.new_item_input.clone();
        self.create(name).await
    }

    pub async fn create(&mut self, name: impl Into<String>) -> ItemListResult<Option<Item>> {
        let name = name.into();
        if name.trim().is_empty() {
            return Ok(None);
        }

        let fields = ItemFields::new(name, Utc::now());
        let payload = fields.to_fields()?;
        let id = remote::call(self.timeout, "create", self.store.create(&self.collection, &payload))
            .await
            .inspect_err(|err| {
                tracing::error!(collection = %self.collection, error = %err, "failed to add item");
            })?;

        let item = Item::from_fields(id, fields);
        self.items.push(item.clone());
        self.new_item_input.clear();
        Ok(Some(item))
    }

    pub async fn update(&mut self, id: &str, name: impl Into<String>) -> ItemListResult<bool> {
        let name = name.into();
        if name.trim().is_empty() {
            return Ok(false);
        }

        let patch = ItemPatch {
            name,
            date_updated: Utc::now(),
        };
        let payload = patch.to_fields()?;
        remote::call(self.timeout, "update", self.store.update(&self.collection, id, &payload))
            .await
            .inspect_err(|err| {
                tracing::error!(collection = %self.collection, id, error = %err, "failed to update item");
            })?;

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.name = patch.name;
            item.date_updated = Some(patch.date_updated);
        }
        self.draft = None;
        Ok(true)
    }

    pub async fn delete(&mut self, id: &str) -> ItemListResult<()> {
        remote::call(self.timeout, "delete", self.store.delete(&self.collection, id))
            .await
            .inspect_err(|err| {
                tracing::error!(collection = %self.collection, id, error = %err, "failed to delete item");
            })?;

        self.items.retain(|item| item.id != id);
        if self.draft.as_ref().is_some_and(|draft| draft.id == id) {
            self.draft = None;
        }
        Ok(())
    }

    pub fn begin_edit(&mut self, id: &str) -> bool {
        let Some(item) = self.find(id) else {
            return false;
        };
        self.draft = Some(EditDraft {
            id: item.id.clone(),
            name: item.name.clone(),
        });
        true
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) -> bool {
        match self.draft.as_mut() {
            Some(draft) => {
                draft.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.draft = None;
    }

    pub async fn save_edit(&mut self) -> ItemListResult<bool> {
        let Some(draft) = self.draft.clone() else {
            return Ok(false);
        };
        self.update(&draft.id, draft.name).await
    }

    pub fn resolve_id(&self, input: &str) -> ItemListResult<String> {
        if let Some(item) = self.find(input) {
            return Ok(item.id.clone());
        }

        let mut matches = self
            .items
            .iter()
            .filter(|item| !input.is_empty() && item.id.starts_with(input))
            .map(|item| item.id.clone());

        let Some(first) = matches.next() else {
            return Err(ItemListError::NotFound);
        };

        if matches.next().is_some() {
            return Err(ItemListError::Config("ambiguous item id prefix".to_owned()));
        }

        Ok(first)
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.new_item_input.clear();
        self.draft = None;
    }
}
