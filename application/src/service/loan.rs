use error_stack::Report;
use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnLoanQuery, DependOnMemberQuery, DependOnTitleQuery, LoanQuery, MemberQuery,
    TitleQuery,
};
use kernel::interface::update::{
    DependOnLoanModifier, DependOnMemberModifier, DependOnTitleModifier, LoanModifier,
    MemberModifier, TitleModifier,
};
use kernel::prelude::entity::{
    CopyId, Loan, LoanId, LoanedAt, MemberId, Penalty, TitleId,
};
use kernel::prelude::policy::{
    DependOnLoanPolicy, DependOnReservationPolicy, LoanPolicy, ReservationPolicy,
};
use kernel::KernelError;
use uuid::Uuid;

use crate::service::require;
use crate::transfer::{
    ExtendLoanDto, GetLoanDto, GetMemberLoansDto, LendDto, LoanDto, ReturnLoanDto,
};

/// Lends a copy of a title to a member.
///
/// Expired holds are reclaimed before a copy is picked, so a member whose hold
/// has lapsed competes for the shelf like everybody else. Without an explicit
/// `copy_id` the member collects their own hold first, otherwise the loan
/// policy picks an available copy.
#[async_trait::async_trait]
pub trait LendService:
    'static
    + Sync
    + Send
    + DependOnMemberQuery
    + DependOnMemberModifier
    + DependOnTitleQuery
    + DependOnTitleModifier
    + DependOnLoanModifier
    + DependOnClock
    + DependOnLoanPolicy
    + DependOnReservationPolicy
{
    async fn lend(&self, dto: LendDto) -> error_stack::Result<LoanDto, KernelError> {
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
        title.assign_hold_if_reservation_exists(
            &self.reservation_policy().hold_duration(),
            &now,
        )?;

        let requested = dto.copy_id.map(CopyId::new);
        let copy_id = title.checkout(&member_id, requested.as_ref(), self.loan_policy(), &now)?;
        // A hold the member gave up by taking another copy passes down the queue.
        title.assign_hold_if_reservation_exists(
            &self.reservation_policy().hold_duration(),
            &now,
        )?;

        let loaned_at = LoanedAt::new(now);
        let due_date = self.loan_policy().initial_due_date(&loaned_at)?;
        let loan = Loan::start(
            LoanId::new(Uuid::new_v4()),
            member_id,
            copy_id,
            title.id().clone(),
            loaned_at,
            due_date,
        );

        self.title_modifier().update(&mut connection, &title).await?;
        if had_penalty != member.has_penalty() {
            self.member_modifier().update(&mut connection, &member).await?;
        }
        self.loan_modifier().create(&mut connection, &loan).await?;
        connection.commit().await?;

        tracing::info!(
            loan_id = %loan.id().as_ref(),
            member_id = %dto.member_id,
            copy_id = %loan.copy_id().as_ref(),
            "lent copy"
        );
        Ok(LoanDto::from(loan))
    }
}

impl<T> LendService for T where
    T: DependOnMemberQuery
        + DependOnMemberModifier
        + DependOnTitleQuery
        + DependOnTitleModifier
        + DependOnLoanModifier
        + DependOnClock
        + DependOnLoanPolicy
        + DependOnReservationPolicy
{
}

/// Closes a loan. The returned copy is offered to the head of the title's
/// queue, and a late return suspends the member for as many days as the loan
/// was overdue.
#[async_trait::async_trait]
pub trait ReturnService:
    'static
    + Sync
    + Send
    + DependOnLoanQuery
    + DependOnLoanModifier
    + DependOnTitleQuery
    + DependOnTitleModifier
    + DependOnMemberQuery
    + DependOnMemberModifier
    + DependOnClock
    + DependOnReservationPolicy
{
    async fn return_loan(&self, dto: ReturnLoanDto) -> error_stack::Result<LoanDto, KernelError> {
        let now = self.clock().now();
        let mut connection = self.database_connection().transact().await?;

        let mut loan = require(
            self.loan_query()
                .find_by_id(&mut connection, &LoanId::new(dto.id))
                .await?,
            "loan",
            dto.id,
        )?;
        if !loan.is_active() {
            tracing::debug!(loan_id = %dto.id, "loan was already returned");
            connection.roll_back().await?;
            return Ok(LoanDto::from(loan));
        }

        // Must be measured before the loan is closed.
        let overdue_days = loan
            .is_overdue(&now)
            .then(|| loan.due_date().overdue_days(&now));

        // Rows are locked member first, then title, as in lending and reserving.
        let mut member = require(
            self.member_query()
                .find_by_id(&mut connection, loan.member_id())
                .await?,
            "member",
            loan.member_id().as_ref(),
        )?;
        let mut title = require(
            self.title_query()
                .find_by_id(&mut connection, loan.title_id())
                .await?,
            "title",
            loan.title_id().as_ref(),
        )?;
        loan.return_book(&now, &mut title, false)?;
        let held_for = title.assign_hold_if_reservation_exists(
            &self.reservation_policy().hold_duration(),
            &now,
        )?;

        if let Some(days) = overdue_days {
            member.apply_penalty(Penalty::for_overdue(&now, days));
            self.member_modifier().update(&mut connection, &member).await?;
            tracing::info!(
                member_id = %loan.member_id().as_ref(),
                days,
                "suspended member for overdue return"
            );
        }

        self.loan_modifier().update(&mut connection, &loan).await?;
        self.title_modifier().update(&mut connection, &title).await?;
        connection.commit().await?;

        tracing::info!(loan_id = %dto.id, holds = held_for.len(), "returned loan");
        Ok(LoanDto::from(loan))
    }
}

impl<T> ReturnService for T where
    T: DependOnLoanQuery
        + DependOnLoanModifier
        + DependOnTitleQuery
        + DependOnTitleModifier
        + DependOnMemberQuery
        + DependOnMemberModifier
        + DependOnClock
        + DependOnReservationPolicy
{
}

#[async_trait::async_trait]
pub trait ExtendService:
    'static
    + Sync
    + Send
    + DependOnLoanQuery
    + DependOnLoanModifier
    + DependOnTitleQuery
    + DependOnTitleModifier
    + DependOnClock
    + DependOnLoanPolicy
    + DependOnReservationPolicy
{
    async fn extend_loan(&self, dto: ExtendLoanDto) -> error_stack::Result<LoanDto, KernelError> {
        let now = self.clock().now();
        let mut connection = self.database_connection().transact().await?;

        let mut loan = require(
            self.loan_query()
                .find_by_id(&mut connection, &LoanId::new(dto.id))
                .await?,
            "loan",
            dto.id,
        )?;
        let mut title = require(
            self.title_query()
                .find_by_id(&mut connection, loan.title_id())
                .await?,
            "title",
            loan.title_id().as_ref(),
        )?;

        // A lapsed hold must not keep blocking the extension.
        let released = title.release_expired_holds(&now);
        let held_for = title.assign_hold_if_reservation_exists(
            &self.reservation_policy().hold_duration(),
            &now,
        )?;
        let has_reservation = title.has_active_reservation_by_other_member(loan.member_id());
        let due_date = self.loan_policy().extended_due_date(loan.due_date())?;
        loan.extend(&now, has_reservation, due_date)?;

        self.loan_modifier().update(&mut connection, &loan).await?;
        if !released.is_empty() || !held_for.is_empty() {
            self.title_modifier().update(&mut connection, &title).await?;
        }
        connection.commit().await?;

        tracing::info!(loan_id = %dto.id, due_date = %loan.due_date().as_ref(), "extended loan");
        Ok(LoanDto::from(loan))
    }
}

impl<T> ExtendService for T where
    T: DependOnLoanQuery
        + DependOnLoanModifier
        + DependOnTitleQuery
        + DependOnTitleModifier
        + DependOnClock
        + DependOnLoanPolicy
        + DependOnReservationPolicy
{
}

#[async_trait::async_trait]
pub trait GetLoanService: 'static + Sync + Send + DependOnLoanQuery + DependOnMemberQuery {
    async fn get_loan(&self, dto: GetLoanDto) -> error_stack::Result<LoanDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let loan = require(
            self.loan_query()
                .find_by_id(&mut connection, &LoanId::new(dto.id))
                .await?,
            "loan",
            dto.id,
        )?;
        Ok(LoanDto::from(loan))
    }

    async fn get_loans_of_member(
        &self,
        dto: GetMemberLoansDto,
    ) -> error_stack::Result<Vec<LoanDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let member_id = MemberId::new(dto.member_id);
        require(
            self.member_query()
                .find_by_id(&mut connection, &member_id)
                .await?,
            "member",
            dto.member_id,
        )?;
        let loans = self
            .loan_query()
            .find_by_member_id(&mut connection, &member_id)
            .await?;
        Ok(loans.into_iter().map(LoanDto::from).collect())
    }
}

impl<T> GetLoanService for T where T: DependOnLoanQuery + DependOnMemberQuery {}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::{CopyStatus, MemberStatus, ReservationPhase};
    use kernel::KernelError;
    use time::Duration;
    use uuid::Uuid;

    use crate::service::test_module::TestModule;
    use crate::service::{
        ExtendService, GetLoanService, GetMemberService, GetTitleService, LendService,
        RegisterMemberService, RegisterTitleService, ReserveService, ReturnService,
    };
    use crate::transfer::{
        ExtendLoanDto, GetLoanDto, GetMemberDto, GetMemberLoansDto, GetTitleDto, LendDto,
        RegisterMemberDto, RegisterTitleDto, ReserveDto, ReturnLoanDto,
    };

    async fn title(module: &TestModule, count: i32) -> Uuid {
        module
            .register_title(RegisterTitleDto {
                name: "Hyperion".to_string(),
                author: "Dan Simmons".to_string(),
                initial_count: count,
            })
            .await
            .unwrap()
    }

    async fn member(module: &TestModule, name: &str) -> Uuid {
        module
            .register_member(RegisterMemberDto {
                name: name.to_string(),
            })
            .await
            .unwrap()
    }

    fn lend_dto(member_id: Uuid, title_id: Uuid) -> LendDto {
        LendDto {
            member_id,
            title_id,
            copy_id: None,
        }
    }

    fn assert_error(error: error_stack::Report<KernelError>, expected: KernelError) {
        assert_eq!(
            std::mem::discriminant(error.current_context()),
            std::mem::discriminant(&expected)
        );
    }

    #[tokio::test]
    async fn lend_sets_due_date_from_policy() {
        let module = TestModule::new();
        let title_id = title(&module, 1).await;
        let member_id = member(&module, "ada").await;

        let loan = module.lend(lend_dto(member_id, title_id)).await.unwrap();
        assert_eq!(loan.loaned_at, module.now());
        assert_eq!(loan.due_date, module.now() + Duration::days(7));
        assert!(loan.returned_at.is_none());

        let found = module.get_loan(GetLoanDto { id: loan.id }).await.unwrap();
        assert_eq!(found.copy_id, loan.copy_id);

        let title = module.get_title(GetTitleDto { id: title_id }).await.unwrap();
        assert_eq!(title.copies[0].status, CopyStatus::Loaned);
    }

    #[tokio::test]
    async fn lend_without_available_copy_fails() {
        let module = TestModule::new();
        let title_id = title(&module, 1).await;
        let first = member(&module, "first").await;
        let second = member(&module, "second").await;
        module.lend(lend_dto(first, title_id)).await.unwrap();

        let error = module.lend(lend_dto(second, title_id)).await.unwrap_err();
        assert_error(error, KernelError::InvalidState);
    }

    #[tokio::test]
    async fn early_return_holds_copy_for_queue_head() {
        let module = TestModule::new();
        let title_id = title(&module, 1).await;
        let a = member(&module, "a").await;
        let b = member(&module, "b").await;
        let c = member(&module, "c").await;

        let loan = module.lend(lend_dto(a, title_id)).await.unwrap();
        module
            .reserve(ReserveDto {
                member_id: b,
                title_id,
            })
            .await
            .unwrap();

        module.advance(Duration::days(2));
        let returned = module
            .return_loan(ReturnLoanDto { id: loan.id })
            .await
            .unwrap();
        assert_eq!(returned.returned_at, Some(module.now()));

        let title = module.get_title(GetTitleDto { id: title_id }).await.unwrap();
        assert_eq!(title.copies[0].status, CopyStatus::OnHold);
        let hold = &title.reservations[0];
        assert_eq!(hold.member_id, b);
        assert_eq!(hold.status, ReservationPhase::HoldReady);
        assert_eq!(hold.held_copy_id, Some(loan.copy_id));
        assert_eq!(hold.hold_until, Some(module.now() + Duration::hours(72)));

        let error = module.lend(lend_dto(c, title_id)).await.unwrap_err();
        assert_error(error, KernelError::InvalidState);

        let collected = module.lend(lend_dto(b, title_id)).await.unwrap();
        assert_eq!(collected.copy_id, loan.copy_id);
        let title = module.get_title(GetTitleDto { id: title_id }).await.unwrap();
        assert_eq!(title.copies[0].status, CopyStatus::Loaned);
        assert_eq!(title.reservations[0].status, ReservationPhase::LoanComplete);
    }

    #[tokio::test]
    async fn held_copy_requested_by_id_is_refused_to_others() {
        let module = TestModule::new();
        let title_id = title(&module, 1).await;
        let a = member(&module, "a").await;
        let b = member(&module, "b").await;
        let c = member(&module, "c").await;
        let loan = module.lend(lend_dto(a, title_id)).await.unwrap();
        module
            .reserve(ReserveDto {
                member_id: b,
                title_id,
            })
            .await
            .unwrap();
        module
            .return_loan(ReturnLoanDto { id: loan.id })
            .await
            .unwrap();

        let error = module
            .lend(LendDto {
                member_id: c,
                title_id,
                copy_id: Some(loan.copy_id),
            })
            .await
            .unwrap_err();
        assert_error(error, KernelError::InvalidState);
    }

    #[tokio::test]
    async fn late_return_suspends_member() {
        let module = TestModule::new();
        let title_id = title(&module, 1).await;
        let member_id = member(&module, "late").await;
        let loan = module.lend(lend_dto(member_id, title_id)).await.unwrap();

        module.advance(Duration::days(9));
        module
            .return_loan(ReturnLoanDto { id: loan.id })
            .await
            .unwrap();

        let view = module
            .get_member(GetMemberDto { id: member_id })
            .await
            .unwrap();
        assert_eq!(view.status, MemberStatus::Suspended);
        let penalty = view.penalty.unwrap();
        assert_eq!(penalty.ends_at, module.now() + Duration::days(2));
        assert_eq!(penalty.reason, "overdue by 2 days");

        let error = module.lend(lend_dto(member_id, title_id)).await.unwrap_err();
        assert_error(error, KernelError::InvalidState);

        module.advance(Duration::days(2));
        module.lend(lend_dto(member_id, title_id)).await.unwrap();
        let view = module
            .get_member(GetMemberDto { id: member_id })
            .await
            .unwrap();
        assert_eq!(view.status, MemberStatus::Active);
        assert!(view.penalty.is_none());
    }

    #[tokio::test]
    async fn returning_twice_changes_nothing() {
        let module = TestModule::new();
        let title_id = title(&module, 1).await;
        let member_id = member(&module, "twice").await;
        let loan = module.lend(lend_dto(member_id, title_id)).await.unwrap();

        let first = module
            .return_loan(ReturnLoanDto { id: loan.id })
            .await
            .unwrap();
        module.advance(Duration::days(30));
        let second = module
            .return_loan(ReturnLoanDto { id: loan.id })
            .await
            .unwrap();
        assert_eq!(first.returned_at, second.returned_at);

        let view = module
            .get_member(GetMemberDto { id: member_id })
            .await
            .unwrap();
        assert!(view.penalty.is_none());
    }

    #[tokio::test]
    async fn extension_moves_due_date() {
        let module = TestModule::new();
        let title_id = title(&module, 1).await;
        let member_id = member(&module, "ext").await;
        let loan = module.lend(lend_dto(member_id, title_id)).await.unwrap();

        let extended = module
            .extend_loan(ExtendLoanDto { id: loan.id })
            .await
            .unwrap();
        assert_eq!(extended.due_date, loan.due_date + Duration::days(7));
    }

    #[tokio::test]
    async fn extension_is_blocked_by_other_members_only() {
        let module = TestModule::new();
        let title_id = title(&module, 1).await;
        let holder = member(&module, "holder").await;
        let other = member(&module, "other").await;
        let loan = module.lend(lend_dto(holder, title_id)).await.unwrap();

        module
            .reserve(ReserveDto {
                member_id: holder,
                title_id,
            })
            .await
            .unwrap();
        module
            .extend_loan(ExtendLoanDto { id: loan.id })
            .await
            .unwrap();

        module
            .reserve(ReserveDto {
                member_id: other,
                title_id,
            })
            .await
            .unwrap();
        let error = module
            .extend_loan(ExtendLoanDto { id: loan.id })
            .await
            .unwrap_err();
        assert_error(error, KernelError::InvalidState);
    }

    #[tokio::test]
    async fn extension_persists_lapsed_holds() {
        let module = TestModule::new();
        let title_id = title(&module, 2).await;
        let a = member(&module, "a").await;
        let b = member(&module, "b").await;
        let waiting = member(&module, "waiting").await;
        let first = module.lend(lend_dto(a, title_id)).await.unwrap();
        let second = module.lend(lend_dto(b, title_id)).await.unwrap();
        module
            .reserve(ReserveDto {
                member_id: waiting,
                title_id,
            })
            .await
            .unwrap();
        module
            .return_loan(ReturnLoanDto { id: first.id })
            .await
            .unwrap();

        module.advance(Duration::days(4));
        module
            .extend_loan(ExtendLoanDto { id: second.id })
            .await
            .unwrap();

        let title = module.get_title(GetTitleDto { id: title_id }).await.unwrap();
        let released = title
            .copies
            .iter()
            .find(|copy| copy.id == first.copy_id)
            .unwrap();
        assert_eq!(released.status, CopyStatus::Available);
        assert_eq!(title.reservations[0].status, ReservationPhase::Expired);
    }

    #[tokio::test]
    async fn borrowing_another_copy_gives_up_own_hold() {
        let module = TestModule::new();
        let title_id = title(&module, 2).await;
        let a = member(&module, "a").await;
        let b = member(&module, "b").await;
        let waiting = member(&module, "waiting").await;
        let first = module.lend(lend_dto(a, title_id)).await.unwrap();
        let second = module.lend(lend_dto(b, title_id)).await.unwrap();
        module
            .reserve(ReserveDto {
                member_id: waiting,
                title_id,
            })
            .await
            .unwrap();
        module
            .return_loan(ReturnLoanDto { id: first.id })
            .await
            .unwrap();
        module
            .return_loan(ReturnLoanDto { id: second.id })
            .await
            .unwrap();

        let loan = module
            .lend(LendDto {
                member_id: waiting,
                title_id,
                copy_id: Some(second.copy_id),
            })
            .await
            .unwrap();
        assert_eq!(loan.copy_id, second.copy_id);

        let title = module.get_title(GetTitleDto { id: title_id }).await.unwrap();
        assert_eq!(title.reservations[0].status, ReservationPhase::LoanComplete);
        let freed = title
            .copies
            .iter()
            .find(|copy| copy.id == first.copy_id)
            .unwrap();
        assert_eq!(freed.status, CopyStatus::Available);

        module.lend(lend_dto(a, title_id)).await.unwrap();
    }

    #[tokio::test]
    async fn overdue_loan_cannot_be_extended() {
        let module = TestModule::new();
        let title_id = title(&module, 1).await;
        let member_id = member(&module, "late").await;
        let loan = module.lend(lend_dto(member_id, title_id)).await.unwrap();

        module.advance(Duration::days(8));
        let error = module
            .extend_loan(ExtendLoanDto { id: loan.id })
            .await
            .unwrap_err();
        assert_error(error, KernelError::InvalidState);

        let unchanged = module.get_loan(GetLoanDto { id: loan.id }).await.unwrap();
        assert_eq!(unchanged.due_date, loan.due_date);
    }

    #[tokio::test]
    async fn member_loans_are_listed() {
        let module = TestModule::new();
        let title_id = title(&module, 2).await;
        let member_id = member(&module, "reader").await;
        module.lend(lend_dto(member_id, title_id)).await.unwrap();
        module.lend(lend_dto(member_id, title_id)).await.unwrap();

        let loans = module
            .get_loans_of_member(GetMemberLoansDto { member_id })
            .await
            .unwrap();
        assert_eq!(loans.len(), 2);
        assert_ne!(loans[0].copy_id, loans[1].copy_id);

        let error = module
            .get_loans_of_member(GetMemberLoansDto {
                member_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert_error(error, KernelError::NotFound);
    }
}
