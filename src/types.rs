//! Column types and their SQL tokens.
//!
//! Every supported PostgreSQL type is a [`ColumnType`] variant. Parameters
//! are validated by the smart constructors, so a constructed value always
//! renders a well-formed token; [`ColumnType::token`] is the only place
//! where types become SQL strings.

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::value::Literal;

/// Storage width of an integer column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntSize {
    /// 2 bytes (SMALLINT / SMALLSERIAL)
    Two,
    /// 4 bytes (INTEGER / SERIAL)
    Four,
    /// 8 bytes (BIGINT / BIGSERIAL)
    Eight,
}

impl IntSize {
    /// Parse a byte width into a size, rejecting anything but 2, 4 or 8.
    pub fn from_bytes(bytes: u8) -> SchemaResult<Self> {
        match bytes {
            2 => Ok(IntSize::Two),
            4 => Ok(IntSize::Four),
            8 => Ok(IntSize::Eight),
            _ => Err(SchemaError::configuration("size must be 2, 4 or 8")),
        }
    }
}

/// Index method for exclusion constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexMethod {
    Btree,
    Hash,
    Gist,
    Spgist,
    Gin,
    Brin,
}

impl IndexMethod {
    /// SQL name of the method.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            IndexMethod::Btree => "btree",
            IndexMethod::Hash => "hash",
            IndexMethod::Gist => "gist",
            IndexMethod::Spgist => "spgist",
            IndexMethod::Gin => "gin",
            IndexMethod::Brin => "brin",
        }
    }
}

/// Table partitioning method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionMethod {
    Range,
    List,
    Hash,
}

impl PartitionMethod {
    /// SQL keyword for the method.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            PartitionMethod::Range => "RANGE",
            PartitionMethod::List => "LIST",
            PartitionMethod::Hash => "HASH",
        }
    }
}

/// Network address types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkKind {
    /// Host address (INET)
    Inet,
    /// Network address (CIDR)
    Cidr,
    /// 6-byte MAC address (MACADDR)
    MacAddr,
    /// 8-byte MAC address (MACADDR8)
    MacAddr8,
}

impl NetworkKind {
    const fn token(&self) -> &'static str {
        match self {
            NetworkKind::Inet => "INET",
            NetworkKind::Cidr => "CIDR",
            NetworkKind::MacAddr => "MACADDR",
            NetworkKind::MacAddr8 => "MACADDR8",
        }
    }
}

/// Geometric types. Open and closed paths share the PATH token; the
/// distinction lives in the value syntax, not the column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometricKind {
    Point,
    Line,
    LineSeg,
    Box,
    OpenPath,
    ClosedPath,
    Polygon,
    Circle,
}

impl GeometricKind {
    const fn token(&self) -> &'static str {
        match self {
            GeometricKind::Point => "POINT",
            GeometricKind::Line => "LINE",
            GeometricKind::LineSeg => "LSEG",
            GeometricKind::Box => "BOX",
            GeometricKind::OpenPath | GeometricKind::ClosedPath => "PATH",
            GeometricKind::Polygon => "POLYGON",
            GeometricKind::Circle => "CIRCLE",
        }
    }
}

/// A named enumerated type, created with `CREATE TYPE … AS ENUM`.
///
/// Columns using the enum carry its name as their type token; the
/// `CREATE TYPE` statement must be executed before any table that uses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PgEnum {
    name: String,
    members: Vec<(String, Literal)>,
}

impl PgEnum {
    /// Define an enum type with an ordered `(label, value)` member list.
    pub fn new<L, V>(
        name: impl Into<String>,
        members: impl IntoIterator<Item = (L, V)>,
    ) -> SchemaResult<Self>
    where
        L: Into<String>,
        V: Into<Literal>,
    {
        let members: Vec<(String, Literal)> = members
            .into_iter()
            .map(|(label, value)| (label.into(), value.into()))
            .collect();
        if members.is_empty() {
            return Err(SchemaError::configuration("enum must have at least one member"));
        }
        Ok(Self {
            name: name.into(),
            members,
        })
    }

    /// The SQL type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered member list.
    pub fn members(&self) -> &[(String, Literal)] {
        &self.members
    }

    /// Look up a member's value by label.
    pub fn member(&self, label: &str) -> Option<&Literal> {
        self.members
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value)
    }

    /// Generate the `CREATE TYPE` statement for this enum.
    pub fn create_type(&self) -> String {
        let values: Vec<String> = self.members.iter().map(|(_, v)| v.to_string()).collect();
        format!("CREATE TYPE {} AS ENUM ({})", self.name, values.join(","))
    }
}

/// A column's SQL type.
///
/// Use the constructors rather than the variants directly; they validate
/// parameters up front so rendering never fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnType {
    /// SMALLINT / INTEGER / BIGINT, or the SERIAL family when auto-incrementing
    Integer { size: IntSize, auto_increment: bool },
    /// DECIMAL with optional precision and scale
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    /// Fixed-length CHAR(n)
    Char { length: u32 },
    /// Variable-length VARCHAR(n)
    VarChar { length: u32 },
    /// Unlimited-length TEXT
    Text,
    /// BOOLEAN
    Boolean,
    /// UUID
    Uuid,
    /// DATE
    Date,
    /// TIME with fractional-second digits, optionally WITH TIME ZONE
    Time { precision: u8, with_timezone: bool },
    /// TIMESTAMP with fractional-second digits, optionally WITH TIME ZONE
    Timestamp { precision: u8, with_timezone: bool },
    /// JSON document
    Json,
    /// Network address types
    Network(NetworkKind),
    /// Geometric types
    Geometric(GeometricKind),
    /// A range type, named explicitly (built-in and custom ranges share
    /// one representation, e.g. `int4range` or a user-defined range)
    Range(String),
    /// A named enumerated type
    Enum(PgEnum),
    /// An array over an element type, one entry per dimension (0 = unbounded)
    Array {
        unit: Box<ColumnType>,
        dims: Vec<u32>,
    },
}

impl ColumnType {
    /// Integer type of the given byte width; the SERIAL family when
    /// `auto_increment` is set.
    pub fn integer(size: u8, auto_increment: bool) -> SchemaResult<Self> {
        Ok(ColumnType::Integer {
            size: IntSize::from_bytes(size)?,
            auto_increment,
        })
    }

    /// DECIMAL with optional precision (total digits, must be positive
    /// when given) and scale (digits after the point).
    pub fn decimal(precision: Option<u32>, scale: Option<u32>) -> SchemaResult<Self> {
        if precision == Some(0) {
            return Err(SchemaError::configuration("precision must be positive"));
        }
        Ok(ColumnType::Decimal { precision, scale })
    }

    /// CHAR of the given length. Length bounds are left to the database.
    pub fn char(length: u32) -> Self {
        ColumnType::Char { length }
    }

    /// VARCHAR of the given maximum length.
    pub fn varchar(length: u32) -> Self {
        ColumnType::VarChar { length }
    }

    /// TIME with `precision` fractional-second digits (0..=6).
    pub fn time(precision: u8, with_timezone: bool) -> SchemaResult<Self> {
        if precision > 6 {
            return Err(SchemaError::configuration("p must be between 0 and 6"));
        }
        Ok(ColumnType::Time {
            precision,
            with_timezone,
        })
    }

    /// TIMESTAMP with `precision` fractional-second digits (0..=6).
    pub fn timestamp(precision: u8, with_timezone: bool) -> SchemaResult<Self> {
        if precision > 6 {
            return Err(SchemaError::configuration("p must be between 0 and 6"));
        }
        Ok(ColumnType::Timestamp {
            precision,
            with_timezone,
        })
    }

    /// A range type with the given SQL type name.
    pub fn range(name: impl Into<String>) -> Self {
        ColumnType::Range(name.into())
    }

    /// An array over `unit`, with one `dims` entry per dimension
    /// (0 = unbounded). An empty list declares a single unbounded dimension.
    pub fn array(unit: ColumnType, dims: impl Into<Vec<u32>>) -> Self {
        let mut dims = dims.into();
        if dims.is_empty() {
            dims.push(0);
        }
        ColumnType::Array {
            unit: Box::new(unit),
            dims,
        }
    }

    /// Whether this type auto-increments (the SERIAL family). Such a column
    /// renders only its name and token, suppressing every other clause.
    pub const fn auto_increments(&self) -> bool {
        matches!(
            self,
            ColumnType::Integer {
                auto_increment: true,
                ..
            }
        )
    }

    /// The enum type used by this column type, looking through array
    /// dimensions to the element type.
    pub fn enum_type(&self) -> Option<&PgEnum> {
        match self {
            ColumnType::Enum(e) => Some(e),
            ColumnType::Array { unit, .. } => unit.enum_type(),
            _ => None,
        }
    }

    /// The SQL type token.
    pub fn token(&self) -> String {
        match self {
            ColumnType::Integer {
                size,
                auto_increment,
            } => match (size, auto_increment) {
                (IntSize::Two, false) => "SMALLINT".to_string(),
                (IntSize::Two, true) => "SMALLSERIAL".to_string(),
                (IntSize::Four, false) => "INTEGER".to_string(),
                (IntSize::Four, true) => "SERIAL".to_string(),
                (IntSize::Eight, false) => "BIGINT".to_string(),
                (IntSize::Eight, true) => "BIGSERIAL".to_string(),
            },
            ColumnType::Decimal { precision, scale } => {
                let mut token = String::from("DECIMAL");
                // scale 0 suppresses the parameter list entirely
                if *scale == Some(0) {
                    return token;
                }
                let mut terms = String::new();
                if let Some(p) = precision {
                    terms.push_str(&p.to_string());
                }
                if let Some(s) = scale {
                    terms.push_str(&format!(",{}", s));
                }
                if !terms.is_empty() {
                    token.push_str(&format!("({})", terms));
                }
                token
            }
            ColumnType::Char { length } => format!("CHAR({})", length),
            ColumnType::VarChar { length } => format!("VARCHAR({})", length),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Boolean => "BOOLEAN".to_string(),
            ColumnType::Uuid => "UUID".to_string(),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Time {
                precision,
                with_timezone,
            } => {
                let mut token = String::from("TIME");
                if *precision > 0 {
                    token.push_str(&format!("({})", precision));
                }
                if *with_timezone {
                    token.push_str(" WITH TIME ZONE");
                }
                token
            }
            ColumnType::Timestamp {
                precision,
                with_timezone,
            } => {
                let mut token = String::from("TIMESTAMP");
                if *precision > 0 {
                    token.push_str(&format!("({})", precision));
                }
                if *with_timezone {
                    token.push_str(" WITH TIME ZONE");
                }
                token
            }
            ColumnType::Json => "JSON".to_string(),
            ColumnType::Network(kind) => kind.token().to_string(),
            ColumnType::Geometric(kind) => kind.token().to_string(),
            ColumnType::Range(name) => name.clone(),
            ColumnType::Enum(e) => e.name().to_string(),
            ColumnType::Array { unit, dims } => {
                let mut token = unit.token();
                for dim in dims {
                    if *dim == 0 {
                        token.push_str("[]");
                    } else {
                        token.push_str(&format!("[{}]", dim));
                    }
                }
                token
            }
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}
