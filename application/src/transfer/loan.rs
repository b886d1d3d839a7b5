use kernel::prelude::entity::{DestructLoan, Loan};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct LoanDto {
    pub id: Uuid,
    pub member_id: Uuid,
    pub copy_id: Uuid,
    pub title_id: Uuid,
    pub loaned_at: OffsetDateTime,
    pub due_date: OffsetDateTime,
    pub returned_at: Option<OffsetDateTime>,
}

impl From<Loan> for LoanDto {
    fn from(value: Loan) -> Self {
        let DestructLoan {
            id,
            member_id,
            copy_id,
            title_id,
            loaned_at,
            due_date,
            returned_at,
        } = value.into_destruct();
        Self {
            id: *id.as_ref(),
            member_id: *member_id.as_ref(),
            copy_id: *copy_id.as_ref(),
            title_id: *title_id.as_ref(),
            loaned_at: *loaned_at.as_ref(),
            due_date: *due_date.as_ref(),
            returned_at: returned_at.map(|returned_at| *returned_at.as_ref()),
        }
    }
}

pub struct LendDto {
    pub member_id: Uuid,
    pub title_id: Uuid,
    pub copy_id: Option<Uuid>,
}

pub struct ReturnLoanDto {
    pub id: Uuid,
}

pub struct ExtendLoanDto {
    pub id: Uuid,
}

pub struct GetLoanDto {
    pub id: Uuid,
}

pub struct GetMemberLoansDto {
    pub member_id: Uuid,
}
