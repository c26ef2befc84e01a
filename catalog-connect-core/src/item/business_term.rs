//! Business terms: glossary entries with no data of their own.

use super::{ItemBase, ItemBuilder, ItemParts};
use crate::ConnectorResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceBusinessTerm {
    base: ItemBase,
}

impl SourceBusinessTerm {
    pub fn builder() -> ItemBuilder<BusinessTermParts> {
        ItemBuilder::from_parts(BusinessTermParts)
    }

    pub fn base(&self) -> &ItemBase {
        &self.base
    }
}

#[derive(Debug, Clone, Default)]
pub struct BusinessTermParts;

impl ItemParts for BusinessTermParts {
    type Output = SourceBusinessTerm;

    fn finish(self, base: ItemBase) -> ConnectorResult<SourceBusinessTerm> {
        Ok(SourceBusinessTerm { base })
    }
}
