//! Actions a connector asks the catalog to perform.

use crate::item::SourceItem;

/// A change to apply to the catalog during synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemAction {
    /// Create the item, or replace it if an item with the same id exists.
    Upsert(SourceItem),
    /// Remove the item with this id.
    Delete(String),
}

impl ItemAction {
    pub fn upsert(item: impl Into<SourceItem>) -> Self {
        ItemAction::Upsert(item.into())
    }

    pub fn delete(item_id: impl Into<String>) -> Self {
        ItemAction::Delete(item_id.into())
    }

    /// The upserted item, if any
    pub fn item(&self) -> Option<&SourceItem> {
        match self {
            ItemAction::Upsert(item) => Some(item),
            ItemAction::Delete(_) => None,
        }
    }

    /// Id of the item the action targets
    pub fn item_id(&self) -> &str {
        match self {
            ItemAction::Upsert(item) => item.id(),
            ItemAction::Delete(id) => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ItemAction::Upsert(_) => "upsert",
            ItemAction::Delete(_) => "delete",
        }
    }
}
