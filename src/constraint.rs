//! Multi-column constraint grouping.
//!
//! Columns tagged with a shared group id (primary key flag, unique-group
//! id, foreign-key group id, partition method) are folded into one
//! whole-table SQL clause each. Grouped attributes that must agree across
//! members (referenced table, referential actions, partition method) are
//! validated here, at compile time.

use crate::column::{Field, ForeignKey, OnAction};
use crate::error::{SchemaError, SchemaResult};

/// One whole-table clause folded from several columns.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintGroup<'a> {
    /// `PRIMARY KEY (…)` over every column marked as primary key.
    PrimaryKey { columns: Vec<&'a str> },
    /// `UNIQUE (…)` over the columns sharing a unique-group id.
    Unique { id: i32, columns: Vec<&'a str> },
    /// `FOREIGN KEY (…) REFERENCES …` over the foreign keys sharing a
    /// group id.
    ForeignKeyGroup {
        id: i32,
        members: Vec<&'a ForeignKey>,
    },
    /// `PARTITION BY …`, appended after the closing parenthesis of the
    /// column list rather than inside it.
    Partition { members: Vec<&'a Field> },
}

impl<'a> ConstraintGroup<'a> {
    /// Fold an ordered field list into grouped clauses, in fixed emission
    /// order: primary key, unique groups (first-seen id order), foreign-key
    /// groups (first-seen id order), partition key.
    pub fn collect(fields: impl IntoIterator<Item = &'a Field>) -> Vec<ConstraintGroup<'a>> {
        let mut primary: Vec<&str> = Vec::new();
        let mut uniques: Vec<(i32, Vec<&str>)> = Vec::new();
        let mut foreigns: Vec<(i32, Vec<&ForeignKey>)> = Vec::new();
        let mut partition: Vec<&Field> = Vec::new();

        for field in fields {
            let base = field.base();
            if base.primary_key {
                primary.push(base.name.as_str());
            }
            if let Some(id) = base.unique_group {
                match uniques.iter_mut().find(|(seen, _)| *seen == id) {
                    Some((_, columns)) => columns.push(base.name.as_str()),
                    None => uniques.push((id, vec![base.name.as_str()])),
                }
            }
            if let Some(fk) = field.foreign_key() {
                if let Some(id) = fk.group {
                    match foreigns.iter_mut().find(|(seen, _)| *seen == id) {
                        Some((_, members)) => members.push(fk),
                        None => foreigns.push((id, vec![fk])),
                    }
                }
            }
            if base.partition.is_some() {
                partition.push(field);
            }
        }

        let mut groups = Vec::new();
        if !primary.is_empty() {
            groups.push(ConstraintGroup::PrimaryKey { columns: primary });
        }
        for (id, columns) in uniques {
            groups.push(ConstraintGroup::Unique { id, columns });
        }
        for (id, members) in foreigns {
            groups.push(ConstraintGroup::ForeignKeyGroup { id, members });
        }
        if !partition.is_empty() {
            groups.push(ConstraintGroup::Partition { members: partition });
        }
        groups
    }

    /// Whether this clause belongs after the closing parenthesis.
    pub fn is_partition(&self) -> bool {
        matches!(self, ConstraintGroup::Partition { .. })
    }

    /// Render the group's SQL clause, validating that the attributes the
    /// members must share actually agree.
    pub fn to_sql(&self) -> SchemaResult<String> {
        match self {
            ConstraintGroup::PrimaryKey { columns } => {
                Ok(format!("PRIMARY KEY ({})", columns.join(",")))
            }
            ConstraintGroup::Unique { columns, .. } => {
                Ok(format!("UNIQUE ({})", columns.join(",")))
            }
            ConstraintGroup::ForeignKeyGroup { members, .. } => {
                let table = same_for_all(members.iter().map(|fk| &fk.to), "foreign table")?;
                let locals: Vec<&str> = members.iter().map(|fk| fk.name()).collect();
                let remotes: Vec<&str> = members.iter().map(|fk| fk.column.as_str()).collect();
                let mut sql = format!(
                    "FOREIGN KEY ({}) REFERENCES {} ({})",
                    locals.join(","),
                    table,
                    remotes.join(",")
                );
                let on_delete = same_for_all(members.iter().map(|fk| &fk.on_delete), "on delete")?;
                if *on_delete != OnAction::NoAction {
                    sql.push_str(&format!(" ON DELETE {}", on_delete.as_sql()));
                }
                let on_update = same_for_all(members.iter().map(|fk| &fk.on_update), "on update")?;
                if *on_update != OnAction::NoAction {
                    sql.push_str(&format!(" ON UPDATE {}", on_update.as_sql()));
                }
                Ok(sql)
            }
            ConstraintGroup::Partition { members } => {
                let method = same_for_all(
                    members.iter().filter_map(|f| f.base().partition.as_ref()),
                    "partition method",
                )?;
                let columns: Vec<&str> = members.iter().map(|f| f.name()).collect();
                Ok(format!(
                    "PARTITION BY {} ({})",
                    method.as_sql(),
                    columns.join(",")
                ))
            }
        }
    }
}

/// Reduce an attribute over group members, requiring every member to carry
/// the same value.
fn same_for_all<'a, T: PartialEq>(
    values: impl IntoIterator<Item = &'a T>,
    attribute: &'static str,
) -> SchemaResult<&'a T> {
    let mut iter = values.into_iter();
    let first = iter.next().ok_or(SchemaError::Consistency { attribute })?;
    for value in iter {
        if value != first {
            return Err(SchemaError::Consistency { attribute });
        }
    }
    Ok(first)
}
