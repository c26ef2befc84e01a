//! Custom items: connector-defined item kinds classified by a code.

use super::{ItemBase, ItemBuilder, ItemParts};
use crate::validation;
use crate::ConnectorResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceCustomItem {
    base: ItemBase,
    code: String,
}

impl SourceCustomItem {
    pub fn builder() -> ItemBuilder<CustomItemParts> {
        ItemBuilder::from_parts(CustomItemParts::default())
    }

    pub fn base(&self) -> &ItemBase {
        &self.base
    }

    /// Classification code of the custom item type
    pub fn code(&self) -> &str {
        &self.code
    }
}

#[derive(Debug, Clone, Default)]
pub struct CustomItemParts {
    code: Option<String>,
}

impl ItemBuilder<CustomItemParts> {
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.parts.code = Some(code.into());
        self
    }
}

impl ItemParts for CustomItemParts {
    type Output = SourceCustomItem;

    fn finish(self, base: ItemBase) -> ConnectorResult<SourceCustomItem> {
        let code = validation::required_non_empty("code", self.code)?;
        Ok(SourceCustomItem { base, code })
    }
}
