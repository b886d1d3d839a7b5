use error_stack::Report;
use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnMemberQuery, DependOnTitleQuery, MemberQuery, TitleQuery};
use kernel::interface::update::{
    DependOnMemberModifier, DependOnTitleModifier, MemberModifier, TitleModifier,
};
use kernel::prelude::entity::{MemberId, TitleId};
use kernel::prelude::policy::{DependOnReservationPolicy, ReservationPolicy};
use kernel::KernelError;

use crate::service::require;
use crate::transfer::{GetReservationsDto, ReservationDto, ReserveDto};

/// Queues a member for a title whose copies are all out.
#[async_trait::async_trait]
pub trait ReserveService:
    'static
    + Sync
    + Send
    + DependOnMemberQuery
    + DependOnMemberModifier
    + DependOnTitleQuery
    + DependOnTitleModifier
    + DependOnClock
    + DependOnReservationPolicy
{
    async fn reserve(&self, dto: ReserveDto) -> error_stack::Result<ReservationDto, KernelError> {
        let now = self.clock().now();
        let mut connection = self.database_connection().transact().await?;

        let member_id = MemberId::new(dto.member_id);
        let mut member = require(
            self.member_query()
                .find_by_id(&mut connection, &member_id)
                .await?,
            "member",
            dto.member_id,
        )?;
        let had_penalty = member.has_penalty();
        member.release_penalty_if_expired(&now);
        if !member.can_borrow() {
            return Err(Report::new(KernelError::InvalidState)
                .attach_printable(format!("member {} is suspended", dto.member_id)));
        }

        let mut title = require(
            self.title_query()
                .find_by_id(&mut connection, &TitleId::new(dto.title_id))
                .await?,
            "title",
            dto.title_id,
        )?;
        let policy = self.reservation_policy();
        title.assign_hold_if_reservation_exists(&policy.hold_duration(), &now)?;

        if !title.try_reserve(&member_id, policy, &now)? {
            return Err(Report::new(KernelError::InvalidState).attach_printable(format!(
                "member {} cannot reserve title {}: a copy is on the shelf, the member is already waiting or the queue is full",
                dto.member_id, dto.title_id
            )));
        }
        let reservation = title
            .reservations()
            .iter()
            .find(|reservation| reservation.same_member(&member_id) && reservation.is_queued())
            .cloned()
            .ok_or_else(|| {
                Report::new(KernelError::Internal)
                    .attach_printable("admitted reservation is missing from the queue")
            })?;

        self.title_modifier().update(&mut connection, &title).await?;
        if had_penalty != member.has_penalty() {
            self.member_modifier().update(&mut connection, &member).await?;
        }
        connection.commit().await?;

        tracing::info!(
            title_id = %dto.title_id,
            member_id = %dto.member_id,
            reservation_id = reservation.id().as_ref(),
            "reserved title"
        );
        Ok(ReservationDto::from(reservation))
    }
}

impl<T> ReserveService for T where
    T: DependOnMemberQuery
        + DependOnMemberModifier
        + DependOnTitleQuery
        + DependOnTitleModifier
        + DependOnClock
        + DependOnReservationPolicy
{
}

#[async_trait::async_trait]
pub trait GetReservationService: 'static + Sync + Send + DependOnTitleQuery {
    async fn get_reservations(
        &self,
        dto: GetReservationsDto,
    ) -> error_stack::Result<Vec<ReservationDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let title = require(
            self.title_query()
                .find_by_id(&mut connection, &TitleId::new(dto.title_id))
                .await?,
            "title",
            dto.title_id,
        )?;
        Ok(title
            .reservations()
            .iter()
            .cloned()
            .map(ReservationDto::from)
            .collect())
    }
}

impl<T> GetReservationService for T where T: DependOnTitleQuery {}
