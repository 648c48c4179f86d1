//! Driver use-case service.
//!
//! # Responsibility
//! - Provide driver CRUD over DTOs via the generic entity service.
//! - Generate synthetic drivers for bulk seeding.
//! - Alphabetize names by raw character value.
//!
//! # Invariants
//! - One random generator per service, guarded by a mutex; never reseeded.
//! - Generated drivers follow: 5-letter first name, 7-letter last name,
//!   `{5 letters}@example.com`, `555-{4 digits}`.

use crate::mapping::DtoMapping;
use crate::model::driver::Driver;
use crate::model::dto::{DriverCreateDto, DriverDto};
use crate::repo::base_repo::RepoResult;
use crate::repo::driver_repo::DriverRepository;
use crate::repo::entity::EntityId;
use crate::service::base_service::{log_failure, BaseService, EntityService};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const FIRST_NAME_LEN: usize = 5;
const LAST_NAME_LEN: usize = 7;
const EMAIL_LOCAL_LEN: usize = 5;
const PHONE_SUFFIX_LEN: usize = 4;
pub const RANDOM_EMAIL_DOMAIN: &str = "example.com";
pub const RANDOM_PHONE_PREFIX: &str = "555-";

/// Driver service: generic CRUD plus driver extensions.
pub struct DriverService<R: DriverRepository> {
    base: EntityService<Driver, R>,
    rng: Mutex<StdRng>,
}

impl<R: DriverRepository> DriverService<R> {
    /// Creates a service with an OS-seeded random generator.
    pub fn new(repo: R) -> Self {
        Self::with_rng(repo, StdRng::from_os_rng())
    }

    /// Creates a service whose synthetic data is reproducible.
    pub fn with_seed(repo: R, seed: u64) -> Self {
        Self::with_rng(repo, StdRng::seed_from_u64(seed))
    }

    fn with_rng(repo: R, rng: StdRng) -> Self {
        Self {
            base: EntityService::new(repo),
            rng: Mutex::new(rng),
        }
    }

    /// Generates `count` synthetic drivers and persists them as one batch.
    ///
    /// Returns the number of drivers written. Generated values are not
    /// checked for uniqueness.
    pub fn insert_random(&self, count: usize) -> RepoResult<usize> {
        let drivers = self.generate_random_drivers(count);
        log_failure::<Driver, _>(
            "service_insert_random",
            self.base.repo().insert_many(&drivers),
        )?;
        info!("event=service_insert_random module=service status=ok count={count}");
        Ok(count)
    }

    /// Builds `count` unsaved drivers from the shared generator.
    pub fn generate_random_drivers(&self, count: usize) -> Vec<Driver> {
        // A poisoned lock still holds a usable generator.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..count)
            .map(|_| {
                Driver::new(
                    random_string(&mut *rng, LETTERS, FIRST_NAME_LEN),
                    random_string(&mut *rng, LETTERS, LAST_NAME_LEN),
                    format!(
                        "{}@{RANDOM_EMAIL_DOMAIN}",
                        random_string(&mut *rng, LETTERS, EMAIL_LOCAL_LEN)
                    ),
                    format!(
                        "{RANDOM_PHONE_PREFIX}{}",
                        random_string(&mut *rng, DIGITS, PHONE_SUFFIX_LEN)
                    ),
                )
            })
            .collect()
    }

    /// All drivers ordered by first name then last name.
    pub fn list_alphabetized(&self) -> RepoResult<Vec<DriverDto>> {
        let drivers = log_failure::<Driver, _>(
            "service_list_alphabetized",
            self.base.repo().list_alphabetized(),
        )?;
        Ok(drivers.iter().map(Driver::to_dto).collect())
    }

    /// See [`alphabetize_name`].
    pub fn alphabetize_name(&self, name: &str) -> String {
        alphabetize_name(name)
    }
}

impl<R: DriverRepository> BaseService<DriverCreateDto, DriverDto> for DriverService<R> {
    fn create(&self, create_dto: &DriverCreateDto) -> RepoResult<EntityId> {
        self.base.create(create_dto)
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<DriverDto>> {
        self.base.get_by_id(id)
    }

    fn get_all(&self, page_number: i64, page_size: i64) -> RepoResult<Vec<DriverDto>> {
        self.base.get_all(page_number, page_size)
    }

    fn update(&self, id: EntityId, dto: &DriverDto) -> RepoResult<()> {
        self.base.update(id, dto)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        self.base.delete(id)
    }
}

/// Sorts the characters of `name` by code point, ascending.
///
/// Case-sensitive and not locale-aware: `"John"` becomes `"Jhno"`.
pub fn alphabetize_name(name: &str) -> String {
    let mut chars = name.chars().collect::<Vec<_>>();
    chars.sort();
    chars.into_iter().collect()
}

fn random_string(rng: &mut impl Rng, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{alphabetize_name, random_string, DIGITS, LETTERS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn alphabetize_name_sorts_by_code_point() {
        assert_eq!(alphabetize_name("John"), "Jhno");
        assert_eq!(alphabetize_name("dcba"), "abcd");
        assert_eq!(alphabetize_name(""), "");
    }

    #[test]
    fn alphabetize_name_is_case_sensitive_and_keeps_duplicates() {
        assert_eq!(alphabetize_name("banana"), "aaabnn");
        assert_eq!(alphabetize_name("bA a"), " Aab");
        assert_eq!(alphabetize_name("éa"), "aé");
    }

    #[test]
    fn random_string_draws_only_from_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        let letters = random_string(&mut rng, LETTERS, 32);
        assert_eq!(letters.len(), 32);
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));

        let digits = random_string(&mut rng, DIGITS, 4);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }
}
