//! Column descriptors and single-column SQL rendering.
//!
//! A [`Column`] carries one field's type and constraint attributes and
//! renders itself to the column fragment of a `CREATE TABLE` statement.
//! Constraints that span several columns (grouped uniqueness, grouped
//! foreign keys, partition keys) are only tagged here; the table compiler
//! folds them into whole-table clauses.

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::types::{ColumnType, GeometricKind, IndexMethod, NetworkKind, PartitionMethod, PgEnum};
use crate::value::Literal;

/// Trait for rendering schema nodes to SQL text.
pub trait ToSql {
    /// Convert this node to a SQL string.
    fn to_sql(&self) -> String;
}

/// Referential action for `ON DELETE` / `ON UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnAction {
    Restrict,
    Cascade,
    /// The default; never emitted.
    #[default]
    NoAction,
    SetNull,
    SetDefault,
}

impl OnAction {
    /// SQL keywords for the action.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            OnAction::Restrict => "RESTRICT",
            OnAction::Cascade => "CASCADE",
            OnAction::NoAction => "NO ACTION",
            OnAction::SetNull => "SET NULL",
            OnAction::SetDefault => "SET DEFAULT",
        }
    }
}

/// A check constraint. The SQL form is emitted into the column definition;
/// the local form runs on the application side only and never reaches DDL.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    Sql(String),
    Local(fn(&Literal) -> bool),
}

/// A generated-column rule. The SQL form is emitted as
/// `GENERATED ALWAYS AS (…) STORED`; the local form computes the value on
/// the application side from the columns named in `generated_args`.
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    Sql(String),
    Local(fn(&[Literal]) -> Literal),
}

/// One column of a table: its SQL type plus constraint attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name; bound from the field key at declaration time when not
    /// set explicitly, and never rewritten afterwards.
    pub name: String,
    /// SQL type. Absent only for foreign keys, which defer their type to
    /// the referenced column.
    pub ty: Option<ColumnType>,
    /// Application-side default; never emitted into DDL.
    pub default: Option<Literal>,
    /// Database-side default, emitted as `DEFAULT …`.
    pub pg_default: Option<Literal>,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    /// Columns sharing an id form one multi-column `UNIQUE (…)` clause.
    pub unique_group: Option<i32>,
    /// Only meaningful together with `unique`.
    pub null_not_distinct: bool,
    pub check: Option<Check>,
    pub generated: Option<Generated>,
    /// Column names passed to a local generation rule.
    pub generated_args: Vec<String>,
    /// Exclusion-constraint index method. Carried as declared metadata;
    /// not part of the emitted table statement.
    pub exclude: Option<IndexMethod>,
    /// Operator for the exclusion constraint.
    pub exclude_op: String,
    /// Columns sharing a method form the table's partition key.
    pub partition: Option<PartitionMethod>,
}

impl Column {
    /// A column of the given type, with every constraint at its default.
    pub fn new(ty: ColumnType) -> Self {
        let mut col = Self::untyped();
        col.ty = Some(ty);
        col
    }

    pub(crate) fn untyped() -> Self {
        Self {
            name: String::new(),
            ty: None,
            default: None,
            pg_default: None,
            nullable: true,
            primary_key: false,
            unique: false,
            unique_group: None,
            null_not_distinct: false,
            check: None,
            generated: None,
            generated_args: Vec::new(),
            exclude: None,
            exclude_op: "=".to_string(),
            partition: None,
        }
    }

    /// Integer column of the given byte width (2, 4 or 8).
    pub fn integer(size: u8) -> SchemaResult<Self> {
        Ok(Self::new(ColumnType::integer(size, false)?))
    }

    /// Auto-incrementing integer column of the given byte width.
    pub fn serial(size: u8) -> SchemaResult<Self> {
        Ok(Self::new(ColumnType::integer(size, true)?))
    }

    /// DECIMAL column with optional precision and scale.
    pub fn decimal(precision: Option<u32>, scale: Option<u32>) -> SchemaResult<Self> {
        Ok(Self::new(ColumnType::decimal(precision, scale)?))
    }

    /// CHAR column of the given length.
    pub fn char(length: u32) -> Self {
        Self::new(ColumnType::char(length))
    }

    /// VARCHAR column of the given maximum length.
    pub fn varchar(length: u32) -> Self {
        Self::new(ColumnType::varchar(length))
    }

    /// TEXT column.
    pub fn text() -> Self {
        Self::new(ColumnType::Text)
    }

    /// BOOLEAN column.
    pub fn boolean() -> Self {
        Self::new(ColumnType::Boolean)
    }

    /// UUID column.
    pub fn uuid() -> Self {
        Self::new(ColumnType::Uuid)
    }

    /// DATE column.
    pub fn date() -> Self {
        Self::new(ColumnType::Date)
    }

    /// TIME column with `precision` fractional-second digits.
    pub fn time(precision: u8, with_timezone: bool) -> SchemaResult<Self> {
        Ok(Self::new(ColumnType::time(precision, with_timezone)?))
    }

    /// TIMESTAMP column with `precision` fractional-second digits.
    pub fn timestamp(precision: u8, with_timezone: bool) -> SchemaResult<Self> {
        Ok(Self::new(ColumnType::timestamp(precision, with_timezone)?))
    }

    /// JSON column.
    pub fn json() -> Self {
        Self::new(ColumnType::Json)
    }

    /// Network address column.
    pub fn network(kind: NetworkKind) -> Self {
        Self::new(ColumnType::Network(kind))
    }

    /// Geometric column.
    pub fn geometric(kind: GeometricKind) -> Self {
        Self::new(ColumnType::Geometric(kind))
    }

    /// Range column with the given range type name.
    pub fn range(name: impl Into<String>) -> Self {
        Self::new(ColumnType::range(name))
    }

    /// Column of a named enum type.
    pub fn enumeration(ty: PgEnum) -> Self {
        Self::new(ColumnType::Enum(ty))
    }

    /// Array column over an element type, one `dims` entry per dimension
    /// (0 = unbounded).
    pub fn array(unit: ColumnType, dims: impl Into<Vec<u32>>) -> Self {
        Self::new(ColumnType::array(unit, dims))
    }

    /// Set the column name explicitly, instead of binding it from the
    /// field key at declaration time.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the application-side default. Not emitted into DDL.
    pub fn default(mut self, value: impl Into<Literal>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the database-side default, emitted as `DEFAULT …`.
    pub fn pg_default(mut self, value: impl Into<Literal>) -> Self {
        self.pg_default = Some(value.into());
        self
    }

    /// Mark the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark the column as (part of) the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Add a single-column UNIQUE constraint.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Put the column into a multi-column unique group. Columns sharing an
    /// id are emitted as one `UNIQUE (…)` clause at the table level.
    pub fn unique_group(mut self, id: i32) -> Self {
        self.unique_group = Some(id);
        self
    }

    /// Render `NULLS NOT DISTINCT` after UNIQUE.
    pub fn nulls_not_distinct(mut self) -> Self {
        self.null_not_distinct = true;
        self
    }

    /// Add a check constraint emitted as `CHECK (…)`.
    pub fn check(mut self, expr: impl Into<String>) -> Self {
        self.check = Some(Check::Sql(expr.into()));
        self
    }

    /// Add an application-side check; never emitted into DDL.
    pub fn check_local(mut self, predicate: fn(&Literal) -> bool) -> Self {
        self.check = Some(Check::Local(predicate));
        self
    }

    /// Make this a stored generated column with the given SQL expression.
    pub fn generated(mut self, expr: impl Into<String>) -> Self {
        self.generated = Some(Generated::Sql(expr.into()));
        self
    }

    /// Compute the value on the application side from the named columns;
    /// never emitted into DDL.
    pub fn generated_local<S: Into<String>>(
        mut self,
        rule: fn(&[Literal]) -> Literal,
        args: impl IntoIterator<Item = S>,
    ) -> Self {
        self.generated = Some(Generated::Local(rule));
        self.generated_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Declare an exclusion constraint using the given index method.
    pub fn exclude(mut self, method: IndexMethod) -> Self {
        self.exclude = Some(method);
        self
    }

    /// Operator for the exclusion constraint (default `=`).
    pub fn exclude_op(mut self, op: impl Into<String>) -> Self {
        self.exclude_op = op.into();
        self
    }

    /// Make the column part of the table's partition key.
    pub fn partition(mut self, method: PartitionMethod) -> Self {
        self.partition = Some(method);
        self
    }

    /// Bind the field key as the column name, unless a name was already
    /// supplied explicitly.
    pub(crate) fn bind_name(&mut self, name: &str) {
        if self.name.is_empty() {
            self.name = name.to_string();
        }
    }

    /// The column's type for composition into an array element.
    pub fn element_type(&self) -> SchemaResult<ColumnType> {
        self.ty.clone().ok_or_else(|| {
            SchemaError::unresolved(format!("column {} has no SQL type token", self.name))
        })
    }
}

impl ToSql for Column {
    fn to_sql(&self) -> String {
        // A serial column is rendered bare: the type implies NOT NULL and
        // a sequence-backed default, so every other clause is suppressed.
        if let Some(ty) = &self.ty {
            if ty.auto_increments() {
                return format!("{} {}", self.name, ty.token());
            }
        }

        let mut parts = vec![self.name.clone()];
        if let Some(ty) = &self.ty {
            parts.push(ty.token());
        }
        if !self.nullable {
            parts.push("NOT NULL".to_string());
        }
        if let Some(Check::Sql(expr)) = &self.check {
            parts.push(format!("CHECK ({})", expr));
        }
        if let Some(value) = &self.pg_default {
            parts.push(format!("DEFAULT {}", value));
        }
        if let Some(Generated::Sql(expr)) = &self.generated {
            parts.push(format!("GENERATED ALWAYS AS ({}) STORED", expr));
        }
        if self.unique && self.unique_group.is_none() {
            parts.push("UNIQUE".to_string());
            if self.null_not_distinct {
                parts.push("NULLS NOT DISTINCT".to_string());
            }
        }
        if self.primary_key {
            parts.push("PRIMARY KEY".to_string());
        }
        parts.join(" ")
    }
}

/// A foreign-key column: a base column (untyped, the type lives on the
/// referenced column) plus the reference target and actions.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub base: Column,
    /// Referenced table name.
    pub to: String,
    /// Referenced column name.
    pub column: String,
    pub on_delete: OnAction,
    pub on_update: OnAction,
    /// Columns sharing an id form one `FOREIGN KEY (…) REFERENCES …`
    /// clause at the table level; grouped members suppress their inline
    /// reference clause.
    pub group: Option<i32>,
}

impl ForeignKey {
    /// A foreign key referencing the given table.
    pub fn to(table: impl Into<String>) -> Self {
        Self {
            base: Column::untyped(),
            to: table.into(),
            column: String::new(),
            on_delete: OnAction::NoAction,
            on_update: OnAction::NoAction,
            group: None,
        }
    }

    /// Set the column name explicitly.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.base.name = name.into();
        self
    }

    /// Set the referenced column name.
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.column = name.into();
        self
    }

    pub fn on_delete(mut self, action: OnAction) -> Self {
        self.on_delete = action;
        self
    }

    pub fn on_update(mut self, action: OnAction) -> Self {
        self.on_update = action;
        self
    }

    /// Put the column into a multi-column foreign-key group.
    pub fn group(mut self, id: i32) -> Self {
        self.group = Some(id);
        self
    }

    /// Mark the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.base.nullable = false;
        self
    }

    /// Mark the column as (part of) the primary key.
    pub fn primary_key(mut self) -> Self {
        self.base.primary_key = true;
        self
    }

    /// Add a check constraint emitted as `CHECK (…)`.
    pub fn check(mut self, expr: impl Into<String>) -> Self {
        self.base.check = Some(Check::Sql(expr.into()));
        self
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.base.name
    }
}

impl ToSql for ForeignKey {
    fn to_sql(&self) -> String {
        // Grouped members render only the base constraint; the table
        // compiler emits the reference clause once per group.
        if self.group.is_some() {
            return self.base.to_sql();
        }
        let mut parts = vec![self.base.to_sql(), format!("REFERENCE {}", self.to)];
        if !self.column.is_empty() {
            parts.push(format!("({})", self.column));
        }
        if self.on_delete != OnAction::NoAction {
            parts.push(format!("ON DELETE {}", self.on_delete.as_sql()));
        }
        if self.on_update != OnAction::NoAction {
            parts.push(format!("ON UPDATE {}", self.on_update.as_sql()));
        }
        parts.join(" ")
    }
}

/// A table field: a plain column or a foreign key.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Column(Column),
    ForeignKey(ForeignKey),
}

impl Field {
    /// The underlying column carrying the shared constraint attributes.
    pub fn base(&self) -> &Column {
        match self {
            Field::Column(col) => col,
            Field::ForeignKey(fk) => &fk.base,
        }
    }

    pub(crate) fn base_mut(&mut self) -> &mut Column {
        match self {
            Field::Column(col) => col,
            Field::ForeignKey(fk) => &mut fk.base,
        }
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.base().name
    }

    /// The foreign key, when this field is one.
    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        match self {
            Field::Column(_) => None,
            Field::ForeignKey(fk) => Some(fk),
        }
    }
}

impl ToSql for Field {
    fn to_sql(&self) -> String {
        match self {
            Field::Column(col) => col.to_sql(),
            Field::ForeignKey(fk) => fk.to_sql(),
        }
    }
}

impl From<Column> for Field {
    fn from(col: Column) -> Self {
        Field::Column(col)
    }
}

impl From<ForeignKey> for Field {
    fn from(fk: ForeignKey) -> Self {
        Field::ForeignKey(fk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_render() {
        let col = Column::integer(2).unwrap().named("integer").pg_default(0);
        assert_eq!(col.to_sql(), "integer SMALLINT DEFAULT 0");
    }

    #[test]
    fn test_serial_suppresses_other_clauses() {
        let col = Column::serial(2)
            .unwrap()
            .named("integer")
            .pg_default(0)
            .check("integer != 0");
        assert_eq!(col.to_sql(), "integer SMALLSERIAL");
    }

    #[test]
    fn test_char_render() {
        assert_eq!(Column::char(10).named("char").to_sql(), "char CHAR(10)");
        assert_eq!(
            Column::varchar(10).named("varchar").to_sql(),
            "varchar VARCHAR(10)"
        );
        assert_eq!(Column::text().named("text").to_sql(), "text TEXT");
    }

    #[test]
    fn test_decimal_render() {
        let col = Column::decimal(Some(5), Some(3))
            .unwrap()
            .named("decimal")
            .not_null()
            .nulls_not_distinct();
        assert_eq!(col.to_sql(), "decimal DECIMAL(5,3) NOT NULL");

        let col = col.unique();
        assert_eq!(
            col.to_sql(),
            "decimal DECIMAL(5,3) NOT NULL UNIQUE NULLS NOT DISTINCT"
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let col = Column::varchar(20)
            .named("name")
            .not_null()
            .check("length(name) > 0")
            .pg_default("test")
            .unique();
        let first = col.to_sql();
        assert_eq!(col.to_sql(), first);
    }

    #[test]
    fn test_clause_order() {
        let col = Column::integer(4)
            .unwrap()
            .named("n")
            .not_null()
            .check("n > 0")
            .pg_default(1)
            .generated("m / 2")
            .unique()
            .primary_key();
        assert_eq!(
            col.to_sql(),
            "n INTEGER NOT NULL CHECK (n > 0) DEFAULT 1 \
             GENERATED ALWAYS AS (m / 2) STORED UNIQUE PRIMARY KEY"
        );
    }

    #[test]
    fn test_grouped_unique_not_rendered_inline() {
        let col = Column::varchar(20).named("name").unique().unique_group(1);
        assert_eq!(col.to_sql(), "name VARCHAR(20)");
    }

    #[test]
    fn test_local_check_and_generated_are_inert() {
        let col = Column::integer(4)
            .unwrap()
            .named("n")
            .check_local(|v| matches!(v, Literal::Int(n) if *n > 0))
            .generated_local(|args| args[0].clone(), ["m"]);
        assert_eq!(col.to_sql(), "n INTEGER");
    }

    #[test]
    fn test_host_default_not_emitted() {
        let col = Column::varchar(20).named("name").default("test");
        assert_eq!(col.to_sql(), "name VARCHAR(20)");
    }

    #[test]
    fn test_exclude_metadata_not_rendered() {
        let col = Column::integer(4)
            .unwrap()
            .named("n")
            .exclude(IndexMethod::Gist)
            .exclude_op("&&");
        assert_eq!(col.to_sql(), "n INTEGER");
    }

    #[test]
    fn test_json_default_render() {
        let col = Column::json().named("data").pg_default(json!({"a": 1}));
        assert_eq!(col.to_sql(), r#"data JSON DEFAULT '{"a": 1}'::json"#);
    }

    #[test]
    fn test_enum_default_renders_member_value() {
        let num = crate::types::PgEnum::new("Num", [("ONE", 1), ("TWO", 2)]).unwrap();
        let first = num.member("ONE").unwrap().clone();
        let col = Column::enumeration(num).named("num").pg_default(first);
        assert_eq!(col.to_sql(), "num Num DEFAULT 1");
    }

    #[test]
    fn test_foreign_key_inline_render() {
        let fk = ForeignKey::to("model")
            .named("foreign_key")
            .column("_id")
            .on_delete(OnAction::Cascade);
        assert_eq!(fk.to_sql(), "foreign_key REFERENCE model (_id) ON DELETE CASCADE");
    }

    #[test]
    fn test_foreign_key_without_column_or_actions() {
        let fk = ForeignKey::to("users").named("user_id");
        assert_eq!(fk.to_sql(), "user_id REFERENCE users");
    }

    #[test]
    fn test_grouped_foreign_key_renders_base_only() {
        let fk = ForeignKey::to("model")
            .named("id2")
            .column("id")
            .on_delete(OnAction::Cascade)
            .check("id > 0")
            .group(0);
        assert_eq!(fk.to_sql(), "id2 CHECK (id > 0)");
    }

    #[test]
    fn test_foreign_key_element_type_unresolvable() {
        let fk = ForeignKey::to("model").named("id2");
        assert!(matches!(
            fk.base.element_type(),
            Err(SchemaError::UnresolvedType(_))
        ));
    }
}
