use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{SelectLimit, SelectOffset, Title, TitleId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait TitleQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Loads the whole aggregate (copies and reservations) for modification.
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &TitleId,
    ) -> error_stack::Result<Option<Title>, KernelError>;
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Title>, KernelError>;
}

pub trait DependOnTitleQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type TitleQuery: TitleQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn title_query(&self) -> &Self::TitleQuery;
}
