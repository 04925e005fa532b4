//! Table declarations and `CREATE TABLE` compilation.
//!
//! A [`Table`] is an ordered set of named fields, built once through the
//! builder and immutable afterwards. Compilation walks the fields in
//! declaration order, renders each single-column fragment, folds grouped
//! constraints into whole-table clauses and assembles the statement text.

use crate::column::{Field, ToSql};
use crate::constraint::ConstraintGroup;
use crate::error::SchemaResult;

/// An ordered, named field set compiled to one `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: String,
    name: String,
    fields: Vec<(String, Field)>,
}

impl Table {
    /// Declare a table with the given name in the `public` schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: "public".to_string(),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Declare a table named after a type, converting camel case to snake
    /// case (`MyModel` → `my_model`).
    pub fn from_type_name(type_name: &str) -> Self {
        Self::new(snake_case(type_name))
    }

    /// Put the table into a schema other than `public`.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Declare a field. The key binds the column name when none was set
    /// explicitly; redeclaring an existing key replaces the field in place.
    pub fn field(mut self, key: &str, field: impl Into<Field>) -> Self {
        let mut field = field.into();
        field.base_mut().bind_name(key);
        match self.fields.iter_mut().find(|(seen, _)| seen.as_str() == key) {
            Some((_, slot)) => *slot = field,
            None => self.fields.push((key.to_string(), field)),
        }
        self
    }

    /// Merge a base table's fields ahead of this table's own. A key
    /// declared on both keeps the base position but the derived field
    /// wins; remaining base fields keep their relative order.
    pub fn inherit(mut self, base: &Table) -> Self {
        let mut merged: Vec<(String, Field)> = Vec::with_capacity(base.fields.len());
        for (key, field) in &base.fields {
            match self.fields.iter().position(|(seen, _)| seen == key) {
                Some(i) => merged.push(self.fields.remove(i)),
                None => merged.push((key.clone(), field.clone())),
            }
        }
        merged.append(&mut self.fields);
        self.fields = merged;
        self
    }

    /// The table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The schema name.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// The declared fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().map(|(_, field)| field)
    }

    /// Look up a field by its declaration key.
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(seen, _)| seen == key)
            .map(|(_, field)| field)
    }

    /// `schema.table`, with the prefix omitted for the default schema.
    pub fn qualified_name(&self) -> String {
        if self.schema != "public" {
            format!("{}.{}", self.schema, self.name)
        } else {
            self.name.clone()
        }
    }

    /// The `CREATE TYPE` statements required by this table's enum-typed
    /// columns (array elements included), in declaration order and
    /// deduplicated by type name. The caller executes these before the
    /// table statement.
    pub fn create_types(&self) -> Vec<String> {
        let mut seen: Vec<&str> = Vec::new();
        let mut statements = Vec::new();
        for field in self.fields() {
            if let Some(e) = field.base().ty.as_ref().and_then(|ty| ty.enum_type()) {
                if !seen.contains(&e.name()) {
                    seen.push(e.name());
                    statements.push(e.create_type());
                }
            }
        }
        statements
    }

    /// Compile the `CREATE TABLE` statement.
    ///
    /// Columns render in declaration order, followed by the grouped
    /// clauses (primary key, unique groups, foreign-key groups); a
    /// partition key goes after the closing parenthesis. Enum types are
    /// not created here — see [`Table::create_types`].
    pub fn create_table(&self) -> SchemaResult<String> {
        let mut lines: Vec<String> = self.fields().map(|field| field.to_sql()).collect();
        let mut partition = None;
        for group in ConstraintGroup::collect(self.fields()) {
            let clause = group.to_sql()?;
            if group.is_partition() {
                partition = Some(clause);
            } else {
                lines.push(clause);
            }
        }
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
            self.qualified_name(),
            lines.join(",\n  ")
        );
        if let Some(clause) = partition {
            sql.push(' ');
            sql.push_str(&clause);
        }
        Ok(sql)
    }
}

/// Convert a camel-case type name to a snake-case table name.
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_lowercase());
    }
    for c in chars {
        if c.is_uppercase() {
            out.push('_');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{Column, ForeignKey, OnAction};
    use crate::error::SchemaError;
    use crate::types::{PartitionMethod, PgEnum};

    #[test]
    fn test_snake_case_names() {
        assert_eq!(snake_case("MyModel"), "my_model");
        assert_eq!(snake_case("Model"), "model");
        assert_eq!(snake_case("HTTPLog"), "h_t_t_p_log");
        assert_eq!(Table::from_type_name("DemoModel").name(), "demo_model");
    }

    #[test]
    fn test_field_key_binds_column_name() {
        let table = Table::new("t")
            .field("id", Column::integer(4).unwrap())
            .field("renamed", Column::text().named("actual"));
        assert_eq!(table.get("id").unwrap().name(), "id");
        assert_eq!(table.get("renamed").unwrap().name(), "actual");
    }

    #[test]
    fn test_create_table_basic() {
        let table = Table::new("demo_model")
            .field("id", Column::integer(4).unwrap())
            .field("name", Column::varchar(20).not_null());
        assert_eq!(
            table.create_table().unwrap(),
            "CREATE TABLE IF NOT EXISTS demo_model (\n  \
             id INTEGER,\n  \
             name VARCHAR(20) NOT NULL\n)"
        );
    }

    #[test]
    fn test_schema_prefix_only_outside_public() {
        let table = Table::new("t").field("id", Column::integer(4).unwrap());
        assert!(table
            .create_table()
            .unwrap()
            .starts_with("CREATE TABLE IF NOT EXISTS t ("));

        let table = Table::new("t")
            .schema("test")
            .field("id", Column::integer(4).unwrap());
        assert!(table
            .create_table()
            .unwrap()
            .starts_with("CREATE TABLE IF NOT EXISTS test.t ("));
    }

    #[test]
    fn test_create_table_groups_and_partition() {
        let table = Table::new("my_model")
            .schema("test")
            .field(
                "id",
                Column::integer(8)
                    .unwrap()
                    .not_null()
                    .primary_key()
                    .partition(PartitionMethod::Hash),
            )
            .field("name", Column::varchar(20).unique_group(1))
            .field("name_en", Column::varchar(20).unique_group(1));
        assert_eq!(
            table.create_table().unwrap(),
            "CREATE TABLE IF NOT EXISTS test.my_model (\n  \
             id BIGINT NOT NULL PRIMARY KEY,\n  \
             name VARCHAR(20),\n  \
             name_en VARCHAR(20),\n  \
             PRIMARY KEY (id),\n  \
             UNIQUE (name,name_en)\n\
             ) PARTITION BY HASH (id)"
        );
    }

    #[test]
    fn test_grouped_foreign_keys_emit_single_clause() {
        let table = Table::new("lines")
            .field("qty", Column::integer(4).unwrap())
            .field(
                "order_id",
                ForeignKey::to("orders")
                    .column("id")
                    .on_delete(OnAction::Cascade)
                    .group(0),
            )
            .field(
                "order_no",
                ForeignKey::to("orders")
                    .column("no")
                    .on_delete(OnAction::Cascade)
                    .group(0),
            );
        let sql = table.create_table().unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS lines (\n  \
             qty INTEGER,\n  \
             order_id,\n  \
             order_no,\n  \
             FOREIGN KEY (order_id,order_no) REFERENCES orders (id,no) ON DELETE CASCADE\n)"
        );
        assert_eq!(sql.matches("FOREIGN KEY").count(), 1);
    }

    #[test]
    fn test_grouped_foreign_keys_with_mixed_actions_fail() {
        let table = Table::new("lines")
            .field(
                "order_id",
                ForeignKey::to("orders").column("id").on_delete(OnAction::Cascade).group(0),
            )
            .field(
                "order_no",
                ForeignKey::to("orders").column("no").on_delete(OnAction::SetNull).group(0),
            );
        assert!(matches!(
            table.create_table().unwrap_err(),
            SchemaError::Consistency { attribute: "on delete" }
        ));
    }

    #[test]
    fn test_inherit_merges_base_first_and_derived_wins() {
        let base = Table::new("base")
            .field("id", Column::integer(4).unwrap().primary_key())
            .field("created", Column::date());
        let derived = Table::new("derived")
            .field("id", Column::integer(8).unwrap().primary_key())
            .field("name", Column::text())
            .inherit(&base);

        let names: Vec<&str> = derived.fields().map(|f| f.name()).collect();
        assert_eq!(names, ["id", "created", "name"]);
        // the derived declaration overrides the base one
        assert_eq!(derived.get("id").unwrap().to_sql(), "id BIGINT PRIMARY KEY");
    }

    #[test]
    fn test_create_types_deduplicates() {
        let num = PgEnum::new("Num", [("ONE", 1), ("TWO", 2)]).unwrap();
        let table = Table::new("t")
            .field("a", Column::enumeration(num.clone()))
            .field("b", Column::enumeration(num.clone()))
            .field(
                "c",
                Column::array(crate::types::ColumnType::Enum(num), vec![0]),
            );
        assert_eq!(table.create_types(), ["CREATE TYPE Num AS ENUM (1,2)"]);
    }

    #[test]
    fn test_compile_is_pure() {
        let table = Table::new("t").field("id", Column::integer(4).unwrap().primary_key());
        assert_eq!(table.create_table().unwrap(), table.create_table().unwrap());
    }
}
