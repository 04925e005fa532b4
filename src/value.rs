//! SQL literal values.
//!
//! A [`Literal`] is the value side of a column: the application-side
//! `default` and the emitted `DEFAULT …` clause both carry one. Rendering
//! follows each type's PostgreSQL literal syntax.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A literal value, rendered into DDL text by its `Display` impl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// Exact numeric
    Decimal(Decimal),
    /// String, quoted on output
    Text(String),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Timestamp without time zone
    Timestamp(NaiveDateTime),
    /// Timestamp with time zone
    TimestampTz(DateTime<Utc>),
    /// UUID value
    Uuid(Uuid),
    /// JSON document, serialized and cast `::json` on output
    Json(serde_json::Value),
    /// Verbatim SQL expression (e.g. `now()`), emitted as-is
    Expr(String),
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::Decimal(n) => write!(f, "{}", n),
            Literal::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Date(d) => write!(f, "'{}'", d.format("%Y-%m-%d")),
            Literal::Time(t) => write!(f, "'{}'", t.format("%H:%M:%S%.f")),
            Literal::Timestamp(ts) => write!(f, "'{}'", ts.format("%Y-%m-%d %H:%M:%S%.f")),
            Literal::TimestampTz(ts) => write!(f, "'{}'", ts.format("%Y-%m-%d %H:%M:%S%.f%:z")),
            Literal::Uuid(u) => write!(f, "'{}'", u),
            Literal::Json(v) => {
                let mut text = String::new();
                write_json(v, &mut text);
                write!(f, "'{}'::json", text.replace('\'', "''"))
            }
            Literal::Expr(s) => write!(f, "{}", s),
        }
    }
}

/// Serialize a JSON value with `", "` item and `": "` key separators,
/// preserving object key order, so the emitted default matches the
/// document as declared.
fn write_json(value: &serde_json::Value, out: &mut String) {
    match value {
        serde_json::Value::Null => out.push_str("null"),
        serde_json::Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        serde_json::Value::Number(n) => out.push_str(&n.to_string()),
        serde_json::Value::String(s) => write_json_string(s, out),
        serde_json::Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_json(item, out);
            }
            out.push(']');
        }
        serde_json::Value::Object(entries) => {
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_json_string(key, out);
                out.push_str(": ");
                write_json(item, out);
            }
            out.push('}');
        }
    }
}

fn write_json_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Int(n as i64)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Float(n)
    }
}

impl From<Decimal> for Literal {
    fn from(n: Decimal) -> Self {
        Literal::Decimal(n)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Text(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Text(s)
    }
}

impl From<NaiveDate> for Literal {
    fn from(d: NaiveDate) -> Self {
        Literal::Date(d)
    }
}

impl From<NaiveTime> for Literal {
    fn from(t: NaiveTime) -> Self {
        Literal::Time(t)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(ts: NaiveDateTime) -> Self {
        Literal::Timestamp(ts)
    }
}

impl From<DateTime<Utc>> for Literal {
    fn from(ts: DateTime<Utc>) -> Self {
        Literal::TimestampTz(ts)
    }
}

impl From<Uuid> for Literal {
    fn from(u: Uuid) -> Self {
        Literal::Uuid(u)
    }
}

impl From<serde_json::Value> for Literal {
    fn from(v: serde_json::Value) -> Self {
        Literal::Json(v)
    }
}
