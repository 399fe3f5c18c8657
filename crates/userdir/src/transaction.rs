//! Scoped transactions for write statements.
//!
//! # Example
//!
//! ```ignore
//! use userdir::{DirectoryResult, UserStatements};
//!
//! # async fn demo(pool: &deadpool_postgres::Pool) -> DirectoryResult<()> {
//! let statements = UserStatements::default();
//! let mut client = pool.get().await?;
//!
//! let affected = userdir::transaction!(&mut client, tx, {
//!     statements.delete(42).execute(&tx).await
//! })?;
//! # Ok(()) }
//! ```

/// Runs the given block inside a database transaction.
///
/// - Begins a transaction via `$client.transaction().await`.
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)` before the error is returned.
///
/// The block must evaluate to `userdir::DirectoryResult<T>`.
#[macro_export]
macro_rules! transaction {
    ($client:expr, $tx:ident, $body:block) => {{
        let $tx = ($client)
            .transaction()
            .await
            .map_err($crate::DirectoryError::Query)?;

        let __userdir_tx_body_result = async { $body }.await;
        match __userdir_tx_body_result {
            Ok(value) => {
                $tx.commit()
                    .await
                    .map_err($crate::DirectoryError::Query)?;
                Ok(value)
            }
            Err(error) => match $tx.rollback().await {
                Ok(()) => Err(error),
                Err(rollback_err) => Err($crate::DirectoryError::Other(format!(
                    "{error} (rollback failed: {rollback_err})"
                ))),
            },
        }
    }};
}
