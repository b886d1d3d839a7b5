use crate::database::postgres::PostgresTransaction;
use crate::error::{ConvertError, DriverError, SqlxResultExt};
use error_stack::Report;
use kernel::interface::query::LoanQuery;
use kernel::interface::update::LoanModifier;
use kernel::prelude::entity::{
    CopyId, DueDate, Loan, LoanId, LoanedAt, MemberId, ReturnedAt, TitleId,
};
use kernel::KernelError;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

pub struct PostgresLoanRepository;

#[async_trait::async_trait]
impl LoanQuery for PostgresLoanRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &LoanId,
    ) -> error_stack::Result<Option<Loan>, KernelError> {
        PgLoanInternal::find_by_id(con, id).await.convert_error()
    }

    async fn find_by_member_id(
        &self,
        con: &mut PostgresTransaction,
        member_id: &MemberId,
    ) -> error_stack::Result<Vec<Loan>, KernelError> {
        PgLoanInternal::find_by_member_id(con, member_id)
            .await
            .convert_error()
    }
}

#[async_trait::async_trait]
impl LoanModifier for PostgresLoanRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        loan: &Loan,
    ) -> error_stack::Result<(), KernelError> {
        PgLoanInternal::create(con, loan).await.convert_error()
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        loan: &Loan,
    ) -> error_stack::Result<(), KernelError> {
        PgLoanInternal::update(con, loan).await.convert_error()
    }
}

#[derive(sqlx::FromRow)]
struct LoanRow {
    id: Uuid,
    member_id: Uuid,
    copy_id: Uuid,
    title_id: Uuid,
    loaned_at: OffsetDateTime,
    due_date: OffsetDateTime,
    returned_at: Option<OffsetDateTime>,
}

impl From<LoanRow> for Loan {
    fn from(value: LoanRow) -> Self {
        Loan::new(
            LoanId::new(value.id),
            MemberId::new(value.member_id),
            CopyId::new(value.copy_id),
            TitleId::new(value.title_id),
            LoanedAt::new(value.loaned_at),
            DueDate::new(value.due_date),
            value.returned_at.map(ReturnedAt::new),
        )
    }
}

pub(in crate::database) struct PgLoanInternal;

impl PgLoanInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &LoanId,
    ) -> Result<Option<Loan>, Report<DriverError>> {
        let row = sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            SELECT
                id,
                member_id,
                copy_id,
                title_id,
                loaned_at,
                due_date,
                returned_at
            FROM
                loans
            WHERE
                id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .classify()?;
        Ok(row.map(Loan::from))
    }

    async fn find_by_member_id(
        con: &mut PgConnection,
        member_id: &MemberId,
    ) -> Result<Vec<Loan>, Report<DriverError>> {
        let rows = sqlx::query_as::<_, LoanRow>(
            // language=postgresql
            r#"
            SELECT
                id,
                member_id,
                copy_id,
                title_id,
                loaned_at,
                due_date,
                returned_at
            FROM
                loans
            WHERE
                member_id = $1
            ORDER BY
                loaned_at, id
            "#,
        )
        .bind(member_id.as_ref())
        .fetch_all(con)
        .await
        .classify()?;
        Ok(rows.into_iter().map(Loan::from).collect())
    }

    async fn create(con: &mut PgConnection, loan: &Loan) -> Result<(), Report<DriverError>> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO loans (id, member_id, copy_id, title_id, loaned_at, due_date, returned_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(loan.id().as_ref())
        .bind(loan.member_id().as_ref())
        .bind(loan.copy_id().as_ref())
        .bind(loan.title_id().as_ref())
        .bind(loan.loaned_at().as_ref())
        .bind(loan.due_date().as_ref())
        .bind(loan.returned_at().as_ref().map(|v| *v.as_ref()))
        .execute(con)
        .await
        .classify()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, loan: &Loan) -> Result<(), Report<DriverError>> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE loans
            SET due_date = $2, returned_at = $3
            WHERE id = $1
            "#,
        )
        .bind(loan.id().as_ref())
        .bind(loan.due_date().as_ref())
        .bind(loan.returned_at().as_ref().map(|v| *v.as_ref()))
        .execute(con)
        .await
        .classify()?;
        Ok(())
    }
}
