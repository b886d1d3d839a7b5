use crate::controller::Intake;
use application::transfer::{ExtendLoanDto, GetLoanDto, LendDto, ReturnLoanDto};
use serde::Deserialize;
use uuid::Uuid;

/// `copy_id` names a specific copy, usually the one held for the member.
#[derive(Debug, Deserialize)]
pub struct LendRequest {
    member_id: Uuid,
    title_id: Uuid,
    #[serde(default)]
    copy_id: Option<Uuid>,
}

#[derive(Debug)]
pub struct GetRequest(Uuid);

#[derive(Debug)]
pub struct ReturnRequest(Uuid);

#[derive(Debug)]
pub struct ExtendRequest(Uuid);

impl GetRequest {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl ReturnRequest {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl ExtendRequest {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

pub struct Transformer;

impl Intake<LendRequest> for Transformer {
    type To = LendDto;
    fn emit(&self, input: LendRequest) -> Self::To {
        LendDto {
            member_id: input.member_id,
            title_id: input.title_id,
            copy_id: input.copy_id,
        }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetLoanDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetLoanDto { id: input.0 }
    }
}

impl Intake<ReturnRequest> for Transformer {
    type To = ReturnLoanDto;
    fn emit(&self, input: ReturnRequest) -> Self::To {
        ReturnLoanDto { id: input.0 }
    }
}

impl Intake<ExtendRequest> for Transformer {
    type To = ExtendLoanDto;
    fn emit(&self, input: ExtendRequest) -> Self::To {
        ExtendLoanDto { id: input.0 }
    }
}
