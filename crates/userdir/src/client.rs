//! Statement-execution capability.
//!
//! [`GenericClient`] unifies direct connections, pooled connections and
//! transactions, so repository code can run the same compiled statement
//! inside or outside a transaction.

use crate::error::{DirectoryError, DirectoryResult};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A trait that unifies database clients and transactions.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = DirectoryResult<Vec<Row>>> + Send;

    /// Execute a query and return the **first** row.
    ///
    /// Returns `DirectoryError::NotFound` if no rows are returned.
    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = DirectoryResult<Row>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            rows.into_iter()
                .next()
                .ok_or_else(|| DirectoryError::not_found("Expected one row, got none"))
        }
    }

    /// Execute a query and return the first row, if any.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = DirectoryResult<Option<Row>>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = DirectoryResult<u64>> + Send;
}

impl GenericClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DirectoryResult<Vec<Row>> {
        tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(DirectoryError::Query)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DirectoryResult<u64> {
        tokio_postgres::Client::execute(self, sql, params)
            .await
            .map_err(DirectoryError::Query)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DirectoryResult<Vec<Row>> {
        tokio_postgres::Transaction::query(self, sql, params)
            .await
            .map_err(DirectoryError::Query)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DirectoryResult<u64> {
        tokio_postgres::Transaction::execute(self, sql, params)
            .await
            .map_err(DirectoryError::Query)
    }
}

// ===== deadpool-postgres support =====

impl GenericClient for deadpool_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DirectoryResult<Vec<Row>> {
        // Delegate to the deref target (ClientWrapper / tokio_postgres::Client).
        GenericClient::query(&***self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DirectoryResult<u64> {
        GenericClient::execute(&***self, sql, params).await
    }
}

impl GenericClient for deadpool_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DirectoryResult<Vec<Row>> {
        GenericClient::query(&**self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> DirectoryResult<u64> {
        GenericClient::execute(&**self, sql, params).await
    }
}
