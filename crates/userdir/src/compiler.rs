//! Statement compiler for the users table.
//!
//! [`UserStatements`] turns filters, pagination and partial records into
//! [`CompiledStatement`]s. Compilation is pure: identical inputs always give
//! byte-identical text and arguments, and no caller-supplied value ever ends
//! up in the statement text.
//!
//! Attribute order is fixed per statement kind:
//!
//! - `SELECT` predicates: name, surname, patronymic, age, gender, country,
//!   then `LIMIT`, `OFFSET`.
//! - `UPDATE` assignments: name, surname, patronymic, country, gender, age,
//!   then the `id` in `WHERE`.

use crate::error::{DirectoryError, DirectoryResult};
use crate::model::{Pagination, UserFilter, UserRecord};
use crate::sql::{CompiledStatement, Ident, Sql, Value};

/// Columns returned by every read, in [`UserRecord`] field order.
pub const USER_COLUMNS: &str = "id, name, surname, patronymic, age, gender, country";

/// Table used when none is configured.
pub const DEFAULT_TABLE: &str = "users";

/// Compiler bound to one users table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStatements {
    table: Ident,
}

impl Default for UserStatements {
    fn default() -> Self {
        Self {
            table: Ident(DEFAULT_TABLE.to_string()),
        }
    }
}

impl UserStatements {
    /// Bind the compiler to `table` (optionally schema-qualified).
    pub fn new(table: &str) -> DirectoryResult<Self> {
        Ok(Self {
            table: Ident::parse(table)?,
        })
    }

    pub fn table(&self) -> &str {
        self.table.as_str()
    }

    /// `SELECT ... WHERE 1=1 [AND col = $k ...] LIMIT $n OFFSET $n+1`
    pub fn select(&self, page: &Pagination, filter: &UserFilter) -> CompiledStatement {
        let mut q = self.select_base();
        q.push(" WHERE 1=1");
        for (column, value) in filter_predicates(filter) {
            q.push(" AND ").push(column).push(" = ").push_bind(value);
        }
        q.limit_offset(i64::from(page.limit), i64::from(page.offset));
        q.into_statement()
    }

    /// `SELECT ... WHERE id = $1`
    pub fn select_by_id(&self, id: i32) -> CompiledStatement {
        let mut q = self.select_base();
        q.push(" WHERE id = ").push_bind(id);
        q.into_statement()
    }

    /// `UPDATE <t> SET col = $1, ... WHERE id = $k`
    ///
    /// Fails with [`DirectoryError::MalformedUpdate`] when `record` has no
    /// present attribute, before any statement text is produced.
    pub fn update(&self, record: &UserRecord) -> DirectoryResult<CompiledStatement> {
        let assignments = update_assignments(record);
        if assignments.is_empty() {
            return Err(DirectoryError::MalformedUpdate { id: record.id });
        }

        let mut q = Sql::new("UPDATE ");
        q.push_ident(&self.table).push(" SET ");
        for (i, (column, value)) in assignments.into_iter().enumerate() {
            if i > 0 {
                q.push(", ");
            }
            q.push(column).push(" = ").push_bind(value);
        }
        q.push(" WHERE id = ").push_bind(record.id);
        Ok(q.into_statement())
    }

    /// `INSERT INTO <t> (...) VALUES (...) RETURNING id`
    ///
    /// `record.id` is ignored; absent attributes are stored as `NULL`.
    pub fn insert(&self, record: &UserRecord) -> CompiledStatement {
        let values = [
            Value::from(record.name.as_deref()),
            Value::from(record.surname.as_deref()),
            Value::from(record.patronymic.as_deref()),
            Value::from(record.age),
            Value::from(record.country.as_deref()),
            Value::from(record.gender.map(|g| g.as_str())),
        ];

        let mut q = Sql::new("INSERT INTO ");
        q.push_ident(&self.table)
            .push(" (name, surname, patronymic, age, country, gender) VALUES (")
            .push_bind_list(values)
            .push(") RETURNING id");
        q.into_statement()
    }

    /// `DELETE FROM <t> WHERE id = $1`
    pub fn delete(&self, id: i32) -> CompiledStatement {
        let mut q = Sql::new("DELETE FROM ");
        q.push_ident(&self.table).push(" WHERE id = ").push_bind(id);
        q.into_statement()
    }

    fn select_base(&self) -> Sql {
        let mut q = Sql::new("SELECT ");
        q.push(USER_COLUMNS).push(" FROM ").push_ident(&self.table);
        q
    }
}

fn filter_predicates(filter: &UserFilter) -> Vec<(&'static str, Value)> {
    [
        ("name", filter.name().map(Value::from)),
        ("surname", filter.surname().map(Value::from)),
        ("patronymic", filter.patronymic().map(Value::from)),
        ("age", filter.age().map(Value::from)),
        ("gender", filter.gender().map(|g| Value::from(g.as_str()))),
        ("country", filter.country().map(Value::from)),
    ]
    .into_iter()
    .filter_map(|(column, value)| value.map(|v| (column, v)))
    .collect()
}

fn update_assignments(record: &UserRecord) -> Vec<(&'static str, Value)> {
    [
        ("name", record.name.as_deref().map(Value::from)),
        ("surname", record.surname.as_deref().map(Value::from)),
        ("patronymic", record.patronymic.as_deref().map(Value::from)),
        ("country", record.country.as_deref().map(Value::from)),
        ("gender", record.gender.map(|g| Value::from(g.as_str()))),
        ("age", record.age.map(Value::from)),
    ]
    .into_iter()
    .filter_map(|(column, value)| value.map(|v| (column, v)))
    .collect()
}

#[cfg(test)]
mod tests;
