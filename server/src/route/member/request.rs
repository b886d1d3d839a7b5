use crate::controller::Intake;
use application::transfer::{GetMemberDto, GetMemberLoansDto, RegisterMemberDto};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    name: String,
}

#[derive(Debug)]
pub struct GetRequest {
    id: Uuid,
}

impl GetRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetLoansRequest {
    member_id: Uuid,
}

impl GetLoansRequest {
    pub fn new(member_id: Uuid) -> Self {
        Self { member_id }
    }
}

pub struct Transformer;

impl Intake<CreateRequest> for Transformer {
    type To = RegisterMemberDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        RegisterMemberDto { name: input.name }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetMemberDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetMemberDto { id: input.id }
    }
}

impl Intake<GetLoansRequest> for Transformer {
    type To = GetMemberLoansDto;
    fn emit(&self, input: GetLoansRequest) -> Self::To {
        GetMemberLoansDto {
            member_id: input.member_id,
        }
    }
}
