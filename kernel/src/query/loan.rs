use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Loan, LoanId, MemberId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait LoanQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &LoanId,
    ) -> error_stack::Result<Option<Loan>, KernelError>;
    async fn find_by_member_id(
        &self,
        con: &mut Self::Transaction,
        member_id: &MemberId,
    ) -> error_stack::Result<Vec<Loan>, KernelError>;
}

pub trait DependOnLoanQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type LoanQuery: LoanQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn loan_query(&self) -> &Self::LoanQuery;
}
