//! Persistence of user records.
//!
//! [`UserRepository`] is the seam the orchestrator depends on;
//! [`PgUserRepository`] implements it on a `deadpool-postgres` pool with
//! statements from [`UserStatements`]. Every write runs in its own
//! transaction and is rolled back before an error is returned.

use crate::compiler::UserStatements;
use crate::error::{DirectoryError, DirectoryResult};
use crate::model::{Pagination, UserFilter, UserRecord};
use crate::sql::CompiledStatement;
use deadpool_postgres::Pool;
use std::future::Future;
use tracing::debug;

/// Storage operations on user records.
pub trait UserRepository: Send + Sync {
    /// Page through records matching `filter`.
    fn list(
        &self,
        page: Pagination,
        filter: &UserFilter,
    ) -> impl Future<Output = DirectoryResult<Vec<UserRecord>>> + Send;

    /// Fetch one record by id.
    fn get(&self, id: i32) -> impl Future<Output = DirectoryResult<UserRecord>> + Send;

    /// Store a record and return its generated id. `record.id` is ignored.
    fn insert(&self, record: &UserRecord) -> impl Future<Output = DirectoryResult<i32>> + Send;

    /// Apply the present attributes of `record` to the row `record.id`.
    fn update(&self, record: &UserRecord) -> impl Future<Output = DirectoryResult<()>> + Send;

    /// Remove the row `id`.
    fn delete(&self, id: i32) -> impl Future<Output = DirectoryResult<()>> + Send;
}

/// [`UserRepository`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool,
    statements: UserStatements,
}

impl PgUserRepository {
    pub fn new(pool: Pool, statements: UserStatements) -> Self {
        Self { pool, statements }
    }

    pub fn statements(&self) -> &UserStatements {
        &self.statements
    }
}

fn log_statement(op: &str, stmt: &CompiledStatement) {
    debug!(
        target: "userdir.sql",
        op,
        sql = stmt.text(),
        params = stmt.args().len(),
        "executing statement"
    );
}

fn require_affected(affected: u64, id: i32) -> DirectoryResult<()> {
    if affected == 0 {
        return Err(DirectoryError::not_found(format!("user {id}")));
    }
    Ok(())
}

impl UserRepository for PgUserRepository {
    async fn list(
        &self,
        page: Pagination,
        filter: &UserFilter,
    ) -> DirectoryResult<Vec<UserRecord>> {
        let stmt = self.statements.select(&page, filter);
        log_statement("list", &stmt);

        let client = self.pool.get().await?;
        stmt.fetch_all_as(&client).await
    }

    async fn get(&self, id: i32) -> DirectoryResult<UserRecord> {
        let stmt = self.statements.select_by_id(id);
        log_statement("get", &stmt);

        let client = self.pool.get().await?;
        stmt.fetch_opt_as(&client)
            .await?
            .ok_or_else(|| DirectoryError::not_found(format!("user {id}")))
    }

    async fn insert(&self, record: &UserRecord) -> DirectoryResult<i32> {
        let stmt = self.statements.insert(record);
        log_statement("insert", &stmt);

        let mut client = self.pool.get().await?;
        crate::transaction!(&mut client, tx, { stmt.fetch_one_as::<i32>(&tx).await })
    }

    async fn update(&self, record: &UserRecord) -> DirectoryResult<()> {
        let stmt = self.statements.update(record)?;
        log_statement("update", &stmt);

        let mut client = self.pool.get().await?;
        let affected = crate::transaction!(&mut client, tx, { stmt.execute(&tx).await })?;
        require_affected(affected, record.id)
    }

    async fn delete(&self, id: i32) -> DirectoryResult<()> {
        let stmt = self.statements.delete(id);
        log_statement("delete", &stmt);

        let mut client = self.pool.get().await?;
        let affected = crate::transaction!(&mut client, tx, { stmt.execute(&tx).await })?;
        require_affected(affected, id)
    }
}
