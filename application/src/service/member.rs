use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnMemberQuery, MemberQuery};
use kernel::interface::update::{DependOnMemberModifier, MemberModifier};
use kernel::prelude::entity::{Member, MemberId, MemberName};
use kernel::KernelError;
use uuid::Uuid;

use crate::service::require;
use crate::transfer::{GetMemberDto, MemberDto, RegisterMemberDto};

#[async_trait::async_trait]
pub trait RegisterMemberService: 'static + Sync + Send + DependOnMemberModifier {
    async fn register_member(&self, dto: RegisterMemberDto) -> error_stack::Result<Uuid, KernelError> {
        let id = Uuid::new_v4();
        let member = Member::create(MemberId::new(id), MemberName::new(dto.name)?);

        let mut connection = self.database_connection().transact().await?;
        self.member_modifier().create(&mut connection, &member).await?;
        connection.commit().await?;

        tracing::info!(member_id = %id, "registered member");
        Ok(id)
    }
}

impl<T> RegisterMemberService for T where T: DependOnMemberModifier {}

#[async_trait::async_trait]
pub trait GetMemberService: 'static + Sync + Send + DependOnMemberQuery + DependOnClock {
    /// The returned view has an elapsed penalty already lifted; the stored
    /// record is cleared on the member's next lend or reservation.
    async fn get_member(&self, dto: GetMemberDto) -> error_stack::Result<MemberDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let mut member = require(
            self.member_query()
                .find_by_id(&mut connection, &MemberId::new(dto.id))
                .await?,
            "member",
            dto.id,
        )?;
        member.release_penalty_if_expired(&self.clock().now());
        Ok(MemberDto::from(member))
    }
}

impl<T> GetMemberService for T where T: DependOnMemberQuery + DependOnClock {}
