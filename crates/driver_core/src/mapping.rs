//! Storage-to-transport mapping.
//!
//! Conversions are plain field copies. Identity always comes from the
//! caller of `from_dto`, never from the DTO body.

use crate::model::driver::{Driver, UNASSIGNED_ID};
use crate::model::dto::{DriverCreateDto, DriverDto};
use crate::repo::entity::{Entity, EntityId};

/// Converts an entity to and from its transport shapes.
pub trait DtoMapping: Entity {
    type Dto;
    type CreateDto;

    fn to_dto(&self) -> Self::Dto;
    fn from_dto(id: EntityId, dto: &Self::Dto) -> Self;
    fn from_create_dto(dto: &Self::CreateDto) -> Self;
}

impl DtoMapping for Driver {
    type Dto = DriverDto;
    type CreateDto = DriverCreateDto;

    fn to_dto(&self) -> DriverDto {
        DriverDto {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
        }
    }

    fn from_dto(id: EntityId, dto: &DriverDto) -> Self {
        Self {
            id,
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            email: dto.email.clone(),
            phone_number: dto.phone_number.clone(),
        }
    }

    fn from_create_dto(dto: &DriverCreateDto) -> Self {
        Self {
            id: UNASSIGNED_ID,
            first_name: dto.first_name.clone(),
            last_name: dto.last_name.clone(),
            email: dto.email.clone(),
            phone_number: dto.phone_number.clone(),
        }
    }
}
