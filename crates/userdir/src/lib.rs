//! # userdir
//!
//! Core of a user-directory service on PostgreSQL.
//!
//! ## Features
//!
//! - **Parameterized statements**: filters and partial updates compile to
//!   `$1, $2, ...` statements; values never reach the SQL text
//! - **Explicit absence**: every optional attribute is an `Option`, so an
//!   age of `0` is filterable and assignable
//! - **Safe defaults**: an UPDATE with nothing to SET is rejected
//! - **Enrichment**: new users get country, age and gender from a
//!   name-inference provider, with the country picked by argmax
//! - **Transaction-friendly**: every write runs in its own transaction
//!
//! ## Statement compiler
//!
//! ```ignore
//! use userdir::{Pagination, UserFilter, UserStatements};
//!
//! let statements = UserStatements::new("users")?;
//! let stmt = statements.select(&Pagination::new(10, 0), &UserFilter::new().with_name("Ana"));
//! assert_eq!(
//!     stmt.text(),
//!     "SELECT id, name, surname, patronymic, age, gender, country FROM users \
//!      WHERE 1=1 AND name = $1 LIMIT $2 OFFSET $3"
//! );
//! ```
//!
//! ## Service
//!
//! ```ignore
//! use userdir::{DirectoryConfig, HttpInferenceProvider, NewUser, PgUserRepository, UserService};
//!
//! let config = DirectoryConfig::load("userdir.toml")?;
//! let pool = userdir::create_pool(&config.database)?;
//! let repo = PgUserRepository::new(pool, userdir::UserStatements::new(&config.database.table)?);
//! let service = UserService::new(repo, HttpInferenceProvider::new(&config.inference)?);
//!
//! let user = service.create(NewUser::new("Dmitriy", "Ushakov")).await?;
//! ```

pub mod client;
pub mod compiler;
pub mod config;
pub mod error;
pub mod model;
pub mod pool;
pub mod provider;
pub mod reducer;
pub mod row;
pub mod service;
pub mod sql;
pub mod store;
pub mod transaction;

pub use client::GenericClient;
pub use compiler::{DEFAULT_TABLE, USER_COLUMNS, UserStatements};
pub use config::{DatabaseConfig, DirectoryConfig, InferenceConfig};
pub use error::{DirectoryError, DirectoryResult};
pub use model::{Gender, NewUser, Pagination, UserFilter, UserRecord};
pub use pool::create_pool;
pub use provider::{HttpInferenceProvider, InferenceProvider};
pub use reducer::{CandidateGuess, choose_best, choose_best_label};
pub use row::{FromRow, RowExt};
pub use service::UserService;
pub use sql::{CompiledStatement, Ident, Sql, Value};
pub use store::{PgUserRepository, UserRepository};
