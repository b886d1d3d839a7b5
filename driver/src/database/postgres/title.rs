use crate::database::postgres::PostgresTransaction;
use crate::error::{ConvertError, DriverError, SqlxResultExt};
use error_stack::{Report, ResultExt};
use kernel::interface::query::TitleQuery;
use kernel::interface::update::TitleModifier;
use kernel::prelude::entity::{
    BookCopy, CopyCollection, CopyId, CopyStatus, HoldUntil, MemberId, Reservation,
    ReservationId, ReservationQueue, ReservationStatus, ReservedAt, SelectLimit, SelectOffset,
    Title, TitleAuthor, TitleId, TitleName, EXPIRED, HOLD_READY, LOAN_COMPLETE, QUEUED,
};
use kernel::KernelError;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

/// Stores a title across `titles`, `copies` and `reservations`. Copies and
/// reservations are never deleted, so writes are upserts.
pub struct PostgresTitleRepository;

#[async_trait::async_trait]
impl TitleQuery for PostgresTitleRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &TitleId,
    ) -> error_stack::Result<Option<Title>, KernelError> {
        PgTitleInternal::find_by_id(con, id).await.convert_error()
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Title>, KernelError> {
        PgTitleInternal::find_all(con, limit, offset)
            .await
            .convert_error()
    }
}

#[async_trait::async_trait]
impl TitleModifier for PostgresTitleRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        title: &Title,
    ) -> error_stack::Result<(), KernelError> {
        PgTitleInternal::create(con, title).await.convert_error()
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        title: &Title,
    ) -> error_stack::Result<(), KernelError> {
        PgTitleInternal::update(con, title).await.convert_error()
    }
}

#[derive(sqlx::FromRow)]
struct TitleRow {
    id: Uuid,
    name: String,
    author: String,
}

#[derive(sqlx::FromRow)]
struct CopyRow {
    id: Uuid,
    title_id: Uuid,
    status: String,
}

impl TryFrom<CopyRow> for BookCopy {
    type Error = Report<DriverError>;
    fn try_from(value: CopyRow) -> Result<Self, Self::Error> {
        let status = CopyStatus::parse(&value.status).ok_or_else(|| {
            Report::new(DriverError::Conversion)
                .attach_printable(format!("unknown copy status {}", value.status))
        })?;
        Ok(BookCopy::new(
            CopyId::new(value.id),
            TitleId::new(value.title_id),
            status,
        ))
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    title_id: Uuid,
    id: i64,
    member_id: Uuid,
    status: String,
    reserved_at: OffsetDateTime,
    held_copy_id: Option<Uuid>,
    hold_until: Option<OffsetDateTime>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = Report<DriverError>;
    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let status = match (value.status.as_str(), value.held_copy_id, value.hold_until) {
            (QUEUED, None, None) => ReservationStatus::Queued,
            (HOLD_READY, Some(copy_id), Some(hold_until)) => ReservationStatus::HoldReady {
                copy_id: CopyId::new(copy_id),
                hold_until: HoldUntil::new(hold_until),
            },
            (LOAN_COMPLETE, None, None) => ReservationStatus::LoanComplete,
            (EXPIRED, None, None) => ReservationStatus::Expired,
            (status, _, _) => {
                return Err(Report::new(DriverError::Conversion).attach_printable(format!(
                    "reservation {} of title {} has inconsistent status {status}",
                    value.id, value.title_id
                )))
            }
        };
        Ok(Reservation::new(
            ReservationId::new(value.id),
            TitleId::new(value.title_id),
            MemberId::new(value.member_id),
            status,
            ReservedAt::new(value.reserved_at),
        ))
    }
}

pub(in crate::database) struct PgTitleInternal;

impl PgTitleInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &TitleId,
    ) -> Result<Option<Title>, Report<DriverError>> {
        let row = sqlx::query_as::<_, TitleRow>(
            // language=postgresql
            r#"
            SELECT
                id,
                name,
                author
            FROM
                titles
            WHERE
                id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(&mut *con)
        .await
        .classify()?;
        match row {
            Some(row) => Ok(Some(Self::assemble(con, row).await?)),
            None => Ok(None),
        }
    }

    async fn find_all(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> Result<Vec<Title>, Report<DriverError>> {
        let rows = sqlx::query_as::<_, TitleRow>(
            // language=postgresql
            r#"
            SELECT
                id,
                name,
                author
            FROM
                titles
            ORDER BY
                id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(&mut *con)
        .await
        .classify()?;

        let mut titles = Vec::with_capacity(rows.len());
        for row in rows {
            titles.push(Self::assemble(con, row).await?);
        }
        Ok(titles)
    }

    async fn assemble(con: &mut PgConnection, row: TitleRow) -> Result<Title, Report<DriverError>> {
        let copies = sqlx::query_as::<_, CopyRow>(
            // language=postgresql
            r#"
            SELECT
                id,
                title_id,
                status
            FROM
                copies
            WHERE
                title_id = $1
            ORDER BY
                position
            "#,
        )
        .bind(row.id)
        .fetch_all(&mut *con)
        .await
        .classify()?
        .into_iter()
        .map(BookCopy::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        let reservations = sqlx::query_as::<_, ReservationRow>(
            // language=postgresql
            r#"
            SELECT
                title_id,
                id,
                member_id,
                status,
                reserved_at,
                held_copy_id,
                hold_until
            FROM
                reservations
            WHERE
                title_id = $1
            "#,
        )
        .bind(row.id)
        .fetch_all(&mut *con)
        .await
        .classify()?
        .into_iter()
        .map(Reservation::try_from)
        .collect::<Result<Vec<_>, _>>()?;

        let name = TitleName::new(row.name).change_context(DriverError::Conversion)?;
        let author = TitleAuthor::new(row.author).change_context(DriverError::Conversion)?;
        Ok(Title::new(
            TitleId::new(row.id),
            name,
            author,
            CopyCollection::new(copies),
            ReservationQueue::new(reservations),
        ))
    }

    async fn create(con: &mut PgConnection, title: &Title) -> Result<(), Report<DriverError>> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO titles (id, name, author)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(title.id().as_ref())
        .bind(title.name().as_ref())
        .bind(title.author().as_ref())
        .execute(&mut *con)
        .await
        .classify()?;
        Self::save_children(con, title).await
    }

    async fn update(con: &mut PgConnection, title: &Title) -> Result<(), Report<DriverError>> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE titles
            SET name = $2, author = $3
            WHERE id = $1
            "#,
        )
        .bind(title.id().as_ref())
        .bind(title.name().as_ref())
        .bind(title.author().as_ref())
        .execute(&mut *con)
        .await
        .classify()?;
        Self::save_children(con, title).await
    }

    /// Writes copies and reservations in one statement each. Rows that did
    /// not change are left alone, and reservations that reached a terminal
    /// state are never rewritten.
    async fn save_children(con: &mut PgConnection, title: &Title) -> Result<(), Report<DriverError>> {
        let mut copy_ids = Vec::with_capacity(title.copies().len());
        let mut positions = Vec::with_capacity(title.copies().len());
        let mut copy_statuses = Vec::with_capacity(title.copies().len());
        for (position, copy) in title.copies().iter().enumerate() {
            let position = i32::try_from(position)
                .change_context_lazy(|| DriverError::Conversion)
                .attach_printable("too many copies for one title")?;
            copy_ids.push(*copy.id().as_ref());
            positions.push(position);
            copy_statuses.push(copy.status().as_str());
        }
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO copies (id, title_id, position, status)
            SELECT id, $1, position, status
            FROM UNNEST($2::uuid[], $3::integer[], $4::text[]) AS input (id, position, status)
            ON CONFLICT (id) DO UPDATE
            SET status = excluded.status
            WHERE copies.status IS DISTINCT FROM excluded.status
            "#,
        )
        .bind(title.id().as_ref())
        .bind(copy_ids)
        .bind(positions)
        .bind(copy_statuses)
        .execute(&mut *con)
        .await
        .classify()?;

        let reservations = title.reservations();
        let mut ids = Vec::with_capacity(reservations.len());
        let mut member_ids = Vec::with_capacity(reservations.len());
        let mut statuses = Vec::with_capacity(reservations.len());
        let mut reserved_at = Vec::with_capacity(reservations.len());
        let mut held_copy_ids = Vec::with_capacity(reservations.len());
        let mut hold_until = Vec::with_capacity(reservations.len());
        for reservation in reservations.iter() {
            ids.push(*reservation.id().as_ref());
            member_ids.push(*reservation.member_id().as_ref());
            statuses.push(reservation.status().name());
            reserved_at.push(*reservation.reserved_at().as_ref());
            held_copy_ids.push(reservation.held_copy_id().map(|copy_id| *copy_id.as_ref()));
            hold_until.push(reservation.hold_until().map(|until| *until.as_ref()));
        }
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO reservations (title_id, id, member_id, status, reserved_at, held_copy_id, hold_until)
            SELECT $1, id, member_id, status, reserved_at, held_copy_id, hold_until
            FROM UNNEST($2::bigint[], $3::uuid[], $4::text[], $5::timestamptz[], $6::uuid[], $7::timestamptz[])
                AS input (id, member_id, status, reserved_at, held_copy_id, hold_until)
            ON CONFLICT (title_id, id) DO UPDATE
            SET status = excluded.status, held_copy_id = excluded.held_copy_id, hold_until = excluded.hold_until
            WHERE reservations.status IN ('queued', 'hold_ready')
              AND reservations.status IS DISTINCT FROM excluded.status
            "#,
        )
        .bind(title.id().as_ref())
        .bind(ids)
        .bind(member_ids)
        .bind(statuses)
        .bind(reserved_at)
        .bind(held_copy_ids)
        .bind(hold_until)
        .execute(&mut *con)
        .await
        .classify()?;
        Ok(())
    }
}
