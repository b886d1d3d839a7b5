use kernel::interface::query::MemberQuery;
use kernel::interface::update::MemberModifier;
use kernel::prelude::entity::{Member, MemberId};
use kernel::KernelError;

use crate::database::inmemory::{duplicated, missing, InMemoryTransaction};

pub struct InMemoryMemberRepository;

#[async_trait::async_trait]
impl MemberQuery for InMemoryMemberRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &MemberId,
    ) -> error_stack::Result<Option<Member>, KernelError> {
        Ok(con.working.members.get(id).cloned())
    }
}

#[async_trait::async_trait]
impl MemberModifier for InMemoryMemberRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        member: &Member,
    ) -> error_stack::Result<(), KernelError> {
        if con.working.members.contains_key(member.id()) {
            return Err(duplicated("member", member.id().as_ref()));
        }
        con.working
            .members
            .insert(member.id().clone(), member.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        member: &Member,
    ) -> error_stack::Result<(), KernelError> {
        let stored = con
            .working
            .members
            .get_mut(member.id())
            .ok_or_else(|| missing("member", member.id().as_ref()))?;
        *stored = member.clone();
        Ok(())
    }
}
