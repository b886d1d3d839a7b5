use kernel::interface::query::TitleQuery;
use kernel::interface::update::TitleModifier;
use kernel::prelude::entity::{SelectLimit, SelectOffset, Title, TitleId};
use kernel::KernelError;

use crate::database::inmemory::{duplicated, missing, InMemoryTransaction};

pub struct InMemoryTitleRepository;

#[async_trait::async_trait]
impl TitleQuery for InMemoryTitleRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &TitleId,
    ) -> error_stack::Result<Option<Title>, KernelError> {
        Ok(con.working.titles.get(id).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Title>, KernelError> {
        let mut titles = con.working.titles.values().collect::<Vec<_>>();
        titles.sort_by_key(|title| *title.id().as_ref());
        let limit = usize::try_from(*limit.as_ref()).unwrap_or_default();
        let offset = usize::try_from(*offset.as_ref()).unwrap_or_default();
        Ok(titles
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl TitleModifier for InMemoryTitleRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        title: &Title,
    ) -> error_stack::Result<(), KernelError> {
        if con.working.titles.contains_key(title.id()) {
            return Err(duplicated("title", title.id().as_ref()));
        }
        con.working.titles.insert(title.id().clone(), title.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        title: &Title,
    ) -> error_stack::Result<(), KernelError> {
        let stored = con
            .working
            .titles
            .get_mut(title.id())
            .ok_or_else(|| missing("title", title.id().as_ref()))?;
        *stored = title.clone();
        Ok(())
    }
}
