//! Parameter-safe statement assembly.
//!
//! `Sql` keeps SQL text fragments and bound values apart and only renders
//! `$1, $2, ...` when the statement is finished, numbering each placeholder by
//! the position of its value in the argument list.
//!
//! ```ignore
//! use userdir::sql::Sql;
//!
//! let mut q = Sql::new("SELECT id FROM users WHERE 1=1");
//! q.push(" AND name = ").push_bind("Ana");
//! q.limit_offset(10, 0);
//!
//! let stmt = q.into_statement();
//! assert_eq!(stmt.text(), "SELECT id FROM users WHERE 1=1 AND name = $1 LIMIT $2 OFFSET $3");
//! ```

use crate::client::GenericClient;
use crate::error::{DirectoryError, DirectoryResult};
use crate::row::FromRow;
use bytes::BytesMut;
use std::error::Error;
use std::fmt::Write;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A bound statement argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Absent value bound as SQL `NULL`.
    Null,
    Text(String),
    Int(i32),
    BigInt(i64),
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            // Per-variant check: `accepts` below is the union of all variants.
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => v.to_sql_checked(ty, out),
            Value::BigInt(v) => v.to_sql_checked(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        <String as ToSql>::accepts(ty) || <i32 as ToSql>::accepts(ty) || <i64 as ToSql>::accepts(ty)
    }

    to_sql_checked!();
}

#[derive(Debug, Clone)]
enum SqlPart {
    Raw(String),
    Param,
}

/// A parameter-safe dynamic SQL builder.
#[derive(Debug, Clone)]
pub struct Sql {
    parts: Vec<SqlPart>,
    args: Vec<Value>,
}

impl Sql {
    /// Create a new builder with an initial SQL fragment.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        Self {
            parts: vec![SqlPart::Raw(initial_sql.into())],
            args: Vec::new(),
        }
    }

    /// Append raw SQL (no parameters).
    ///
    /// Only static text and validated identifiers belong here; values go
    /// through [`Sql::push_bind`].
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a parameter placeholder and bind its value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.parts.push(SqlPart::Param);
        self.args.push(value.into());
        self
    }

    /// Append a comma-separated list of placeholders and bind all values.
    ///
    /// An empty list renders `NULL` so the surrounding statement stays valid.
    pub fn push_bind_list<V: Into<Value>>(
        &mut self,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let mut iter = values.into_iter();
        let Some(first) = iter.next() else {
            return self.push("NULL");
        };

        self.push_bind(first);
        for v in iter {
            self.push(", ");
            self.push_bind(v);
        }
        self
    }

    /// Append a validated SQL identifier.
    pub fn push_ident(&mut self, ident: &Ident) -> &mut Self {
        self.push(ident.as_str())
    }

    /// Append `LIMIT $n OFFSET $m` with bound parameters.
    pub fn limit_offset(&mut self, limit: i64, offset: i64) -> &mut Self {
        self.push(" LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset)
    }

    /// Render SQL with `$1, $2, ...` placeholders.
    pub fn to_sql(&self) -> String {
        let mut out = String::new();
        let mut idx: usize = 0;

        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Param => {
                    idx += 1;
                    let _ = write!(&mut out, "${}", idx);
                }
            }
        }
        out
    }

    /// Finish the builder into a statement ready for binding.
    pub fn into_statement(self) -> CompiledStatement {
        let text = self.to_sql();
        CompiledStatement {
            text,
            args: self.args,
        }
    }
}

/// A SQL identifier (table or column) checked against
/// `[A-Za-z_][A-Za-z0-9_]*`, optionally schema-qualified with `.`.
///
/// Postgres cannot bind identifiers as parameters, so they are the only
/// non-static text that reaches a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident(pub(crate) String);

impl Ident {
    pub fn parse(ident: &str) -> DirectoryResult<Self> {
        if ident.is_empty() {
            return Err(DirectoryError::validation("Identifier cannot be empty"));
        }

        for seg in ident.split('.') {
            let mut chars = seg.chars();
            let valid = match chars.next() {
                Some(first) if first == '_' || first.is_ascii_alphabetic() => {
                    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
                }
                _ => false,
            };
            if !valid {
                return Err(DirectoryError::validation(format!(
                    "invalid identifier '{}'",
                    ident
                )));
            }
        }

        Ok(Self(ident.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Statement text plus its ordered arguments.
///
/// `args[k - 1]` binds to placeholder `$k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStatement {
    text: String,
    args: Vec<Value>,
}

impl CompiledStatement {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.iter().map(|a| a as &(dyn ToSql + Sync)).collect()
    }

    /// Execute the statement and return all rows mapped to `T`.
    pub async fn fetch_all_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> DirectoryResult<Vec<T>> {
        let rows = conn.query(&self.text, &self.params_ref()).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the statement and return exactly one row mapped to `T`.
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> DirectoryResult<T> {
        let row = conn.query_one(&self.text, &self.params_ref()).await?;
        T::from_row(&row)
    }

    /// Execute the statement and return at most one row mapped to `T`.
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> DirectoryResult<Option<T>> {
        let row = conn.query_opt(&self.text, &self.params_ref()).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute the statement and return affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> DirectoryResult<u64> {
        conn.execute(&self.text, &self.params_ref()).await
    }
}
