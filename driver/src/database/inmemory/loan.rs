use kernel::interface::query::LoanQuery;
use kernel::interface::update::LoanModifier;
use kernel::prelude::entity::{Loan, LoanId, MemberId};
use kernel::KernelError;

use crate::database::inmemory::{duplicated, missing, InMemoryTransaction};

pub struct InMemoryLoanRepository;

#[async_trait::async_trait]
impl LoanQuery for InMemoryLoanRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &LoanId,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        Ok(con.working.loans.get(id).cloned())
    }

    async fn find_by_member_id(
        &self,
        con: &mut InMemoryTransaction,
        member_id: &MemberId,
    ) -> error_stack::Result<Vec<Loan>, KernelError> {
        let mut loans = con
            .working
            .loans
            .values()
            .filter(|loan| loan.member_id() == member_id)
            .cloned()
            .collect::<Vec<_>>();
        loans.sort_by(|a, b| {
            (a.loaned_at().as_ref(), a.id().as_ref()).cmp(&(b.loaned_at().as_ref(), b.id().as_ref()))
        });
        Ok(loans)
    }
}

#[async_trait::async_trait]
impl LoanModifier for InMemoryLoanRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        loan: &Loan,
    ) -> error_stack::Result<(), KernelError> {
        if con.working.loans.contains_key(loan.id()) {
            return Err(duplicated("loan", loan.id().as_ref()));
        }
        con.working.loans.insert(loan.id().clone(), loan.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        loan: &Loan,
    ) -> error_stack::Result<(), KernelError> {
        let stored = con
            .working
            .loans
            .get_mut(loan.id())
            .ok_or_else(|| missing("loan", loan.id().as_ref()))?;
        *stored = loan.clone();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::LoanQuery;
    use kernel::interface::update::LoanModifier;
    use kernel::prelude::entity::{
        CopyId, DueDate, Loan, LoanId, LoanedAt, MemberId, TitleId,
    };
    use time::macros::datetime;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::database::{InMemoryDatabase, InMemoryLoanRepository};

    fn loan(member_id: &MemberId, loaned_at: OffsetDateTime) -> Loan {
        Loan::start(
            LoanId::new(Uuid::new_v4()),
            member_id.clone(),
            CopyId::generate(),
            TitleId::new(Uuid::new_v4()),
            LoanedAt::new(loaned_at),
            DueDate::new(loaned_at + time::Duration::days(7)),
        )
    }

    #[tokio::test]
    async fn member_loans_come_back_oldest_first() {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await.unwrap();
        let member_id = MemberId::new(Uuid::new_v4());
        let late = loan(&member_id, datetime!(2025-03-02 10:00 UTC));
        let early = loan(&member_id, datetime!(2025-03-01 10:00 UTC));
        let stranger = loan(
            &MemberId::new(Uuid::new_v4()),
            datetime!(2025-02-01 10:00 UTC),
        );
        for loan in [&late, &early, &stranger] {
            InMemoryLoanRepository.create(&mut con, loan).await.unwrap();
        }

        let loans = InMemoryLoanRepository
            .find_by_member_id(&mut con, &member_id)
            .await
            .unwrap();
        assert_eq!(loans, vec![early, late]);
    }
}
