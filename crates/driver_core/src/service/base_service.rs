//! Generic entity service.
//!
//! # Responsibility
//! - Expose CRUD over transport DTOs for any mapped entity.
//! - Delegate persistence to a `BaseRepository`.
//!
//! # Invariants
//! - Repository errors are returned unchanged after being logged.
//! - On update, the identity argument overrides any identity in the DTO.

use crate::mapping::DtoMapping;
use crate::repo::base_repo::{BaseRepository, RepoResult};
use crate::repo::entity::{Entity, EntityId};
use log::error;
use std::marker::PhantomData;

/// CRUD use-cases expressed in transport shapes.
///
/// `C` is the creation payload, `D` the full DTO.
pub trait BaseService<C, D> {
    fn create(&self, create_dto: &C) -> RepoResult<EntityId>;
    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<D>>;
    fn get_all(&self, page_number: i64, page_size: i64) -> RepoResult<Vec<D>>;
    fn update(&self, id: EntityId, dto: &D) -> RepoResult<()>;
    fn delete(&self, id: EntityId) -> RepoResult<()>;
}

/// `BaseService` implementation for any entity with a DTO mapping.
pub struct EntityService<E, R> {
    repo: R,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, R: BaseRepository<E>> EntityService<E, R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            _entity: PhantomData,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }
}

impl<E, R> BaseService<E::CreateDto, E::Dto> for EntityService<E, R>
where
    E: DtoMapping,
    R: BaseRepository<E>,
{
    fn create(&self, create_dto: &E::CreateDto) -> RepoResult<EntityId> {
        let entity = E::from_create_dto(create_dto);
        log_failure::<E, _>("service_create", self.repo.create(&entity))
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<E::Dto>> {
        let found = log_failure::<E, _>("service_get_by_id", self.repo.get_by_id(id))?;
        Ok(found.as_ref().map(E::to_dto))
    }

    fn get_all(&self, page_number: i64, page_size: i64) -> RepoResult<Vec<E::Dto>> {
        let entities = log_failure::<E, _>(
            "service_get_all",
            self.repo.get_all(page_number, page_size),
        )?;
        Ok(entities.iter().map(E::to_dto).collect())
    }

    fn update(&self, id: EntityId, dto: &E::Dto) -> RepoResult<()> {
        let entity = E::from_dto(id, dto);
        log_failure::<E, _>("service_update", self.repo.update(&entity))
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        log_failure::<E, _>("service_delete", self.repo.delete(id))
    }
}

/// Logs a failed result with service context and hands it back untouched.
pub(crate) fn log_failure<E: Entity, T>(event: &str, result: RepoResult<T>) -> RepoResult<T> {
    if let Err(err) = &result {
        error!(
            "event={event} module=service status=error entity={} error={err}",
            E::NAME
        );
    }
    result
}
