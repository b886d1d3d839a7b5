use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::Title;
use crate::KernelError;

#[async_trait::async_trait]
pub trait TitleModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        title: &Title,
    ) -> error_stack::Result<(), KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        title: &Title,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnTitleModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type TitleModifier: TitleModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn title_modifier(&self) -> &Self::TitleModifier;
}
