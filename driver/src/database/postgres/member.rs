use crate::database::postgres::PostgresTransaction;
use crate::error::{ConvertError, DriverError, SqlxResultExt};
use error_stack::{Report, ResultExt};
use kernel::interface::query::MemberQuery;
use kernel::interface::update::MemberModifier;
use kernel::prelude::entity::{Member, MemberId, MemberName, MemberStatus, Penalty};
use kernel::KernelError;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

pub struct PostgresMemberRepository;

#[async_trait::async_trait]
impl MemberQuery for PostgresMemberRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &MemberId,
    ) -> error_stack::Result<Option<Member>, KernelError> {
        PgMemberInternal::find_by_id(con, id).await.convert_error()
    }
}

#[async_trait::async_trait]
impl MemberModifier for PostgresMemberRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        member: &Member,
    ) -> error_stack::Result<(), KernelError> {
        PgMemberInternal::create(con, member).await.convert_error()
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        member: &Member,
    ) -> error_stack::Result<(), KernelError> {
        PgMemberInternal::update(con, member).await.convert_error()
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    name: String,
    status: String,
    penalty_starts_at: Option<OffsetDateTime>,
    penalty_ends_at: Option<OffsetDateTime>,
    penalty_reason: Option<String>,
}

impl TryFrom<MemberRow> for Member {
    type Error = Report<DriverError>;
    fn try_from(value: MemberRow) -> Result<Self, Self::Error> {
        let status = MemberStatus::parse(&value.status).ok_or_else(|| {
            Report::new(DriverError::Conversion)
                .attach_printable(format!("unknown member status {}", value.status))
        })?;
        let penalty = match (
            value.penalty_starts_at,
            value.penalty_ends_at,
            value.penalty_reason,
        ) {
            (Some(starts_at), Some(ends_at), Some(reason)) => {
                Some(Penalty::new(starts_at, ends_at, reason))
            }
            (None, None, None) => None,
            _ => {
                return Err(Report::new(DriverError::Conversion)
                    .attach_printable(format!("member {} has a partial penalty", value.id)))
            }
        };
        let name = MemberName::new(value.name).change_context(DriverError::Conversion)?;
        Ok(Member::new(MemberId::new(value.id), name, status, penalty))
    }
}

pub(in crate::database) struct PgMemberInternal;

impl PgMemberInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &MemberId,
    ) -> Result<Option<Member>, Report<DriverError>> {
        let row = sqlx::query_as::<_, MemberRow>(
            // language=postgresql
            r#"
            SELECT
                id,
                name,
                status,
                penalty_starts_at,
                penalty_ends_at,
                penalty_reason
            FROM
                members
            WHERE
                id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .classify()?;
        row.map(Member::try_from).transpose()
    }

    async fn create(con: &mut PgConnection, member: &Member) -> Result<(), Report<DriverError>> {
        let penalty = member.penalty().as_ref();
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO members (id, name, status, penalty_starts_at, penalty_ends_at, penalty_reason)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(member.id().as_ref())
        .bind(member.name().as_ref())
        .bind(member.status().as_str())
        .bind(penalty.map(|penalty| *penalty.starts_at()))
        .bind(penalty.map(|penalty| *penalty.ends_at()))
        .bind(penalty.map(|penalty| penalty.reason().clone()))
        .execute(con)
        .await
        .classify()?;
        Ok(())
    }

    async fn update(con: &mut PgConnection, member: &Member) -> Result<(), Report<DriverError>> {
        let penalty = member.penalty().as_ref();
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE members
            SET name = $2, status = $3, penalty_starts_at = $4, penalty_ends_at = $5, penalty_reason = $6
            WHERE id = $1
            "#,
        )
        .bind(member.id().as_ref())
        .bind(member.name().as_ref())
        .bind(member.status().as_str())
        .bind(penalty.map(|penalty| *penalty.starts_at()))
        .bind(penalty.map(|penalty| *penalty.ends_at()))
        .bind(penalty.map(|penalty| penalty.reason().clone()))
        .execute(con)
        .await
        .classify()?;
        Ok(())
    }
}
