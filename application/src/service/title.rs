use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnTitleQuery, TitleQuery};
use kernel::interface::update::{DependOnTitleModifier, TitleModifier};
use kernel::prelude::entity::{SelectLimit, SelectOffset, Title, TitleAuthor, TitleId, TitleName};
use kernel::prelude::policy::{DependOnReservationPolicy, ReservationPolicy};
use kernel::KernelError;
use uuid::Uuid;

use crate::service::require;
use crate::transfer::{
    AddCopiesDto, GetTitleDto, GetTitlesDto, RegisterTitleDto, SweepHoldsDto, SweepResultDto,
    TitleDto,
};

#[async_trait::async_trait]
pub trait RegisterTitleService: 'static + Sync + Send + DependOnTitleModifier {
    async fn register_title(&self, dto: RegisterTitleDto) -> error_stack::Result<Uuid, KernelError> {
        let id = Uuid::new_v4();
        let title = Title::register(
            TitleId::new(id),
            TitleName::new(dto.name)?,
            TitleAuthor::new(dto.author)?,
            dto.initial_count,
        )?;

        let mut connection = self.database_connection().transact().await?;
        self.title_modifier().create(&mut connection, &title).await?;
        connection.commit().await?;

        tracing::info!(title_id = %id, copies = dto.initial_count, "registered title");
        Ok(id)
    }
}

impl<T> RegisterTitleService for T where T: DependOnTitleModifier {}

/// Adds stock to a title. New copies go straight to the queue when members
/// are waiting.
#[async_trait::async_trait]
pub trait AddCopiesService:
    'static
    + Sync
    + Send
    + DependOnTitleQuery
    + DependOnTitleModifier
    + DependOnClock
    + DependOnReservationPolicy
{
    async fn add_copies(&self, dto: AddCopiesDto) -> error_stack::Result<TitleDto, KernelError> {
        let now = self.clock().now();
        let mut connection = self.database_connection().transact().await?;
        let title_id = TitleId::new(dto.title_id);
        let mut title = require(
            self.title_query()
                .find_by_id(&mut connection, &title_id)
                .await?,
            "title",
            dto.title_id,
        )?;

        title.add_copies(dto.count)?;
        let held_for =
            title.assign_hold_if_reservation_exists(&self.reservation_policy().hold_duration(), &now)?;

        self.title_modifier().update(&mut connection, &title).await?;
        connection.commit().await?;

        tracing::info!(
            title_id = %dto.title_id,
            added = dto.count,
            holds = held_for.len(),
            "added copies"
        );
        Ok(TitleDto::from(title))
    }
}

impl<T> AddCopiesService for T where
    T: DependOnTitleQuery + DependOnTitleModifier + DependOnClock + DependOnReservationPolicy
{
}

#[async_trait::async_trait]
pub trait GetTitleService: 'static + Sync + Send + DependOnTitleQuery {
    async fn get_title(&self, dto: GetTitleDto) -> error_stack::Result<TitleDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let title = require(
            self.title_query()
                .find_by_id(&mut connection, &TitleId::new(dto.id))
                .await?,
            "title",
            dto.id,
        )?;
        Ok(TitleDto::from(title))
    }

    async fn get_titles(&self, dto: GetTitlesDto) -> error_stack::Result<Vec<TitleDto>, KernelError> {
        let limit = dto.limit.map(SelectLimit::new).unwrap_or_default();
        let offset = dto.offset.map(SelectOffset::new).unwrap_or_default();
        let mut connection = self.database_connection().transact().await?;
        let titles = self
            .title_query()
            .find_all(&mut connection, &limit, &offset)
            .await?;
        Ok(titles.into_iter().map(TitleDto::from).collect())
    }
}

impl<T> GetTitleService for T where T: DependOnTitleQuery {}

/// Reclaims expired holds of a title and hands the freed copies to the next
/// members in line.
#[async_trait::async_trait]
pub trait SweepHoldService:
    'static
    + Sync
    + Send
    + DependOnTitleQuery
    + DependOnTitleModifier
    + DependOnClock
    + DependOnReservationPolicy
{
    async fn sweep_holds(&self, dto: SweepHoldsDto) -> error_stack::Result<SweepResultDto, KernelError> {
        let now = self.clock().now();
        let mut connection = self.database_connection().transact().await?;
        let mut title = require(
            self.title_query()
                .find_by_id(&mut connection, &TitleId::new(dto.title_id))
                .await?,
            "title",
            dto.title_id,
        )?;

        let released = title.release_expired_holds(&now);
        let held_for =
            title.assign_hold_if_reservation_exists(&self.reservation_policy().hold_duration(), &now)?;

        if released.is_empty() && held_for.is_empty() {
            tracing::debug!(title_id = %dto.title_id, "nothing to sweep");
            connection.roll_back().await?;
        } else {
            self.title_modifier().update(&mut connection, &title).await?;
            connection.commit().await?;
            tracing::info!(
                title_id = %dto.title_id,
                released = released.len(),
                holds = held_for.len(),
                "swept holds"
            );
        }

        Ok(SweepResultDto {
            released_copies: released.iter().map(|copy_id| *copy_id.as_ref()).collect(),
            new_holds: held_for.iter().map(|id| *id.as_ref()).collect(),
        })
    }
}

impl<T> SweepHoldService for T where
    T: DependOnTitleQuery + DependOnTitleModifier + DependOnClock + DependOnReservationPolicy
{
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::{CopyStatus, ReservationPhase};
    use kernel::KernelError;
    use time::Duration;

    use crate::service::test_module::TestModule;
    use crate::service::{
        AddCopiesService, GetTitleService, LendService, RegisterMemberService,
        RegisterTitleService, ReserveService, SweepHoldService,
    };
    use crate::transfer::{
        AddCopiesDto, GetTitleDto, GetTitlesDto, LendDto, RegisterMemberDto, RegisterTitleDto,
        ReserveDto, SweepHoldsDto,
    };

    async fn register(module: &TestModule, count: i32) -> uuid::Uuid {
        module
            .register_title(RegisterTitleDto {
                name: "Snow Crash".to_string(),
                author: "Neal Stephenson".to_string(),
                initial_count: count,
            })
            .await
            .unwrap()
    }

    async fn member(module: &TestModule, name: &str) -> uuid::Uuid {
        module
            .register_member(RegisterMemberDto {
                name: name.to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn registered_title_can_be_read_back() {
        let module = TestModule::new();
        let id = register(&module, 3).await;

        let title = module.get_title(GetTitleDto { id }).await.unwrap();
        assert_eq!(title.name, "Snow Crash");
        assert_eq!(title.copies.len(), 3);
        assert!(title
            .copies
            .iter()
            .all(|copy| copy.status == CopyStatus::Available));
    }

    #[tokio::test]
    async fn invalid_registration_is_rejected() {
        let module = TestModule::new();
        let error = module
            .register_title(RegisterTitleDto {
                name: " ".to_string(),
                author: "Anyone".to_string(),
                initial_count: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Validation));

        let error = module
            .register_title(RegisterTitleDto {
                name: "Title".to_string(),
                author: "Anyone".to_string(),
                initial_count: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Validation));
    }

    #[tokio::test]
    async fn missing_title_is_not_found() {
        let module = TestModule::new();
        let error = module
            .get_title(GetTitleDto {
                id: uuid::Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::NotFound));
    }

    #[tokio::test]
    async fn listing_is_paged() {
        let module = TestModule::new();
        for _ in 0..3 {
            register(&module, 1).await;
        }
        let page = module
            .get_titles(GetTitlesDto {
                limit: Some(2),
                offset: None,
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 2);

        let rest = module
            .get_titles(GetTitlesDto {
                limit: Some(2),
                offset: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
    }

    #[tokio::test]
    async fn added_copy_goes_to_waiting_member() {
        let module = TestModule::new();
        let title_id = register(&module, 1).await;
        let reader = member(&module, "reader").await;
        let waiter = member(&module, "waiter").await;
        module
            .lend(LendDto {
                member_id: reader,
                title_id,
                copy_id: None,
            })
            .await
            .unwrap();
        module
            .reserve(ReserveDto {
                member_id: waiter,
                title_id,
            })
            .await
            .unwrap();

        let title = module
            .add_copies(AddCopiesDto { title_id, count: 2 })
            .await
            .unwrap();
        assert_eq!(title.copies.len(), 3);
        let on_hold = title
            .copies
            .iter()
            .filter(|copy| copy.status == CopyStatus::OnHold)
            .count();
        assert_eq!(on_hold, 1);
        assert_eq!(title.reservations[0].status, ReservationPhase::HoldReady);
    }

    #[tokio::test]
    async fn sweep_passes_expired_hold_to_next_member() {
        let module = TestModule::new();
        let title_id = register(&module, 1).await;
        let reader = member(&module, "reader").await;
        let first = member(&module, "first").await;
        let second = member(&module, "second").await;
        module
            .lend(LendDto {
                member_id: reader,
                title_id,
                copy_id: None,
            })
            .await
            .unwrap();
        for member_id in [first, second] {
            module
                .reserve(ReserveDto {
                    member_id,
                    title_id,
                })
                .await
                .unwrap();
        }
        module.add_copies(AddCopiesDto { title_id, count: 1 }).await.unwrap();

        let nothing = module.sweep_holds(SweepHoldsDto { title_id }).await.unwrap();
        assert!(nothing.released_copies.is_empty());
        assert!(nothing.new_holds.is_empty());

        module.advance(Duration::days(4));
        let swept = module.sweep_holds(SweepHoldsDto { title_id }).await.unwrap();
        assert_eq!(swept.released_copies.len(), 1);
        assert_eq!(swept.new_holds.len(), 1);

        let title = module.get_title(GetTitleDto { id: title_id }).await.unwrap();
        let second_reservation = title
            .reservations
            .iter()
            .find(|reservation| reservation.member_id == second)
            .unwrap();
        assert_eq!(second_reservation.status, ReservationPhase::HoldReady);
        assert_eq!(
            second_reservation.held_copy_id.as_ref(),
            swept.released_copies.first()
        );
    }
}
