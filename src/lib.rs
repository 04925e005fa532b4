//! # pgtable — declarative PostgreSQL table definitions
//!
//! Declare tables as typed field collections and compile them to
//! `CREATE TYPE` / `CREATE TABLE` statements with PostgreSQL constraint
//! syntax.
//!
//! ## Quick Example
//!
//! ```rust
//! use pgtable::prelude::*;
//!
//! # fn main() -> SchemaResult<()> {
//! let users = Table::new("users")
//!     .field("id", Column::serial(8)?)
//!     .field("email", Column::varchar(255).not_null().unique())
//!     .field("level", Column::integer(2)?.pg_default(0));
//!
//! let sql = users.create_table()?;
//! assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS users ("));
//! # Ok(())
//! # }
//! ```
//!
//! Columns carry their constraints (`NOT NULL`, `CHECK`, `DEFAULT`,
//! `UNIQUE`, `PRIMARY KEY`, generated columns); constraints spanning
//! several columns are declared per column with a shared group id and
//! folded into one table-level clause at compile time. Enum-typed columns
//! need their `CREATE TYPE` statement executed first — fetch it with
//! [`table::Table::create_types`].

pub mod column;
pub mod constraint;
pub mod engine;
pub mod error;
pub mod table;
pub mod types;
pub mod value;

pub mod prelude {
    pub use crate::column::{Check, Column, Field, ForeignKey, Generated, OnAction, ToSql};
    pub use crate::constraint::ConstraintGroup;
    pub use crate::engine::SchemaDb;
    pub use crate::error::{SchemaError, SchemaResult};
    pub use crate::table::Table;
    pub use crate::types::{
        ColumnType, GeometricKind, IndexMethod, IntSize, NetworkKind, PartitionMethod, PgEnum,
    };
    pub use crate::value::Literal;
}
