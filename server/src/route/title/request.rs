use crate::controller::Intake;
use application::transfer::{
    AddCopiesDto, GetTitleDto, GetTitlesDto, RegisterTitleDto, SweepHoldsDto,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    name: String,
    author: String,
    initial_count: i32,
}

#[derive(Debug, Deserialize)]
pub struct AddCopiesRequest {
    count: i32,
}

// Missing values fall back to the kernel's paging defaults.
#[derive(Debug, Deserialize)]
pub struct GetAllRequest {
    limit: Option<i64>,
    offset: Option<i64>,
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
pub struct SweepRequest {
    id: Uuid,
}

impl SweepRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct Transformer;

impl Intake<CreateRequest> for Transformer {
    type To = RegisterTitleDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        RegisterTitleDto {
            name: input.name,
            author: input.author,
            initial_count: input.initial_count,
        }
    }
}

impl Intake<(Uuid, AddCopiesRequest)> for Transformer {
    type To = AddCopiesDto;
    fn emit(&self, input: (Uuid, AddCopiesRequest)) -> Self::To {
        let (title_id, input) = input;
        AddCopiesDto {
            title_id,
            count: input.count,
        }
    }
}

impl Intake<GetAllRequest> for Transformer {
    type To = GetTitlesDto;
    fn emit(&self, input: GetAllRequest) -> Self::To {
        GetTitlesDto {
            limit: input.limit,
            offset: input.offset,
        }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetTitleDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetTitleDto { id: input.id }
    }
}

impl Intake<SweepRequest> for Transformer {
    type To = SweepHoldsDto;
    fn emit(&self, input: SweepRequest) -> Self::To {
        SweepHoldsDto { title_id: input.id }
    }
}
