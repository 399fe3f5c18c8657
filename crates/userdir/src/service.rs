//! User directory orchestration: enrichment on create, pass-through reads
//! and writes.

use crate::error::DirectoryResult;
use crate::model::{NewUser, Pagination, UserFilter, UserRecord};
use crate::provider::InferenceProvider;
use crate::reducer::choose_best_label;
use crate::store::UserRepository;
use tracing::{info, instrument, warn};

/// Creates, lists, updates and deletes users.
pub struct UserService<R, P> {
    repo: R,
    provider: P,
}

impl<R, P> UserService<R, P>
where
    R: UserRepository,
    P: InferenceProvider,
{
    pub fn new(repo: R, provider: P) -> Self {
        Self { repo, provider }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Enrich `user` with inferred country, age and gender, then store it.
    ///
    /// The three inference calls run concurrently. If any of them fails the
    /// whole creation fails and nothing is stored.
    #[instrument(skip(self, user), fields(name = %user.name))]
    pub async fn create(&self, user: NewUser) -> DirectoryResult<UserRecord> {
        let (countries, age, gender) = tokio::try_join!(
            self.provider.countries(&user.name),
            self.provider.age(&user.name),
            self.provider.gender(&user.name),
        )
        .inspect_err(|e| warn!(error = %e, "enrichment failed"))?;

        let mut record = UserRecord {
            id: 0,
            name: Some(user.name),
            surname: Some(user.surname),
            patronymic: user.patronymic,
            age,
            gender,
            country: choose_best_label(&countries),
        };
        record.id = self.repo.insert(&record).await?;

        info!(
            id = record.id,
            country = ?record.country,
            age = ?record.age,
            gender = ?record.gender,
            "user created"
        );
        Ok(record)
    }

    pub async fn list(
        &self,
        page: Pagination,
        filter: &UserFilter,
    ) -> DirectoryResult<Vec<UserRecord>> {
        self.repo.list(page, filter).await
    }

    pub async fn get(&self, id: i32) -> DirectoryResult<UserRecord> {
        self.repo.get(id).await
    }

    #[instrument(skip(self, record), fields(id = record.id))]
    pub async fn update(&self, record: &UserRecord) -> DirectoryResult<()> {
        self.repo.update(record).await?;
        info!("user updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> DirectoryResult<()> {
        self.repo.delete(id).await?;
        info!("user deleted");
        Ok(())
    }
}
