//! Round trip against a real database.
//!
//! Runs only when `DATABASE_URL` is set (a `.env` file is honoured).

use userdir::{
    DatabaseConfig, DirectoryError, DirectoryResult, Gender, Pagination, PgUserRepository, Sql,
    UserFilter, UserRecord, UserRepository, UserStatements, create_pool,
};

const TABLE: &str = "userdir_live_users";

fn database_url() -> Option<String> {
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").ok()
}

#[tokio::test]
async fn crud_round_trip() -> Result<(), DirectoryError> {
    let Some(url) = database_url() else {
        eprintln!("DATABASE_URL not set; skipping");
        return Ok(());
    };

    // One connection so the temporary table is visible to every statement.
    let pool = create_pool(&DatabaseConfig {
        url,
        max_pool_size: 1,
        table: TABLE.to_string(),
    })?;
    {
        let client = pool.get().await?;
        client
            .batch_execute(&format!(
                "CREATE TEMP TABLE IF NOT EXISTS {TABLE} (
                    id serial PRIMARY KEY,
                    name text,
                    surname text,
                    patronymic text,
                    age integer,
                    gender text,
                    country text
                )"
            ))
            .await?;
    }

    let statements = UserStatements::new(TABLE)?;
    let repo = PgUserRepository::new(pool.clone(), statements.clone());

    let id = repo
        .insert(&UserRecord {
            id: 0,
            name: Some("Dmitriy".into()),
            surname: Some("Ushakov".into()),
            patronymic: None,
            age: Some(0),
            gender: Some(Gender::Male),
            country: Some("RU".into()),
        })
        .await?;

    let found = repo
        .list(Pagination::new(10, 0), &UserFilter::new().with_age(0))
        .await?;
    assert!(found.iter().any(|u| u.id == id));

    let mut change = UserRecord::for_id(id);
    change.country = Some("UA".into());
    repo.update(&change).await?;
    assert_eq!(repo.get(id).await?.country.as_deref(), Some("UA"));

    assert!(repo.update(&UserRecord::for_id(id)).await.unwrap_err().is_malformed_update());

    // A failure after the insert rolls the insert back.
    let failed: DirectoryResult<u64> = {
        let mut client = pool.get().await?;
        let insert = statements.insert(&UserRecord {
            name: Some("Rolledback".into()),
            ..UserRecord::for_id(0)
        });
        let broken = Sql::new(format!("UPDATE {TABLE} SET no_such_column = 1")).into_statement();
        userdir::transaction!(&mut client, tx, {
            insert.fetch_one_as::<i32>(&tx).await?;
            broken.execute(&tx).await
        })
    };
    assert!(matches!(failed, Err(DirectoryError::Query(_))), "{failed:?}");
    let leftover = repo
        .list(Pagination::new(10, 0), &UserFilter::new().with_name("Rolledback"))
        .await?;
    assert!(leftover.is_empty());

    repo.delete(id).await?;
    assert!(repo.delete(id).await.unwrap_err().is_not_found());
    Ok(())
}
