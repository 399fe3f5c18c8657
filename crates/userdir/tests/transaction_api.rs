//! Compile-only checks for running compiled statements through the
//! execution capability and the transaction macro.

#![allow(dead_code)]

use userdir::{DirectoryResult, Pagination, UserFilter, UserRecord, UserStatements};

async fn _delete_in_transaction_compiles(
    client: &mut tokio_postgres::Client,
) -> DirectoryResult<u64> {
    let statements = UserStatements::default();
    userdir::transaction!(client, tx, { statements.delete(1).execute(&tx).await })
}

async fn _update_in_pooled_transaction_compiles(
    client: &mut deadpool_postgres::Client,
) -> DirectoryResult<u64> {
    let statements = UserStatements::default();
    let mut record = UserRecord::for_id(1);
    record.country = Some("FR".to_string());
    let stmt = statements.update(&record)?;
    userdir::transaction!(client, tx, { stmt.execute(&tx).await })
}

async fn _select_on_plain_client_compiles(
    client: &tokio_postgres::Client,
) -> DirectoryResult<Vec<UserRecord>> {
    UserStatements::default()
        .select(&Pagination::new(10, 0), &UserFilter::new())
        .fetch_all_as(client)
        .await
}
