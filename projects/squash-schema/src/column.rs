use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Column {
    pub ty: ColumnType,
    pub name: String,
    pub unsigned: bool,
    pub nullable: bool,
    pub unique: bool,
    /// Default expression, kept exactly as written in the migration.
    pub default: Option<String>,
    /// Extra constructor arguments after the name, e.g. `100` or `8, 2`.
    pub parameters: Option<String>,
}

impl Column {
    pub fn new(ty: ColumnType, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
            unsigned: false,
            nullable: false,
            unique: false,
            default: None,
            parameters: None,
        }
    }

    /// A structural pseudo-column is tracked under its own type name.
    pub fn structural(ty: ColumnType) -> Self {
        let name = ty.as_str().to_string();
        Self::new(ty, name)
    }

    pub fn is_structural(&self) -> bool {
        self.ty.is_structural()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnType {
    String,
    Char,
    Text,
    MediumText,
    LongText,
    Integer,
    TinyInteger,
    SmallInteger,
    MediumInteger,
    BigInteger,
    UnsignedInteger,
    UnsignedTinyInteger,
    UnsignedSmallInteger,
    UnsignedMediumInteger,
    UnsignedBigInteger,
    Increments,
    TinyIncrements,
    SmallIncrements,
    MediumIncrements,
    BigIncrements,
    Float,
    Double,
    Decimal,
    Boolean,
    Date,
    DateTime,
    DateTimeTz,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Year,
    Binary,
    Json,
    Jsonb,
    Uuid,
    IpAddress,
    MacAddress,
    Enum,
    Morphs,
    NullableMorphs,
    ForeignId,
    Timestamps,
    NullableTimestamps,
    TimestampsTz,
    SoftDeletes,
    SoftDeletesTz,
    RememberToken,
    /// A SQL type with no builder counterpart, lower-cased.
    Other(String),
}

impl ColumnType {
    /// Maps a column builder call name to its type. Structural shorthands
    /// are included; constraint calls are not.
    pub fn from_call(name: &str) -> Option<Self> {
        let ty = match name {
            "string" => Self::String,
            "char" => Self::Char,
            "text" => Self::Text,
            "mediumText" => Self::MediumText,
            "longText" => Self::LongText,
            "integer" => Self::Integer,
            "tinyInteger" => Self::TinyInteger,
            "smallInteger" => Self::SmallInteger,
            "mediumInteger" => Self::MediumInteger,
            "bigInteger" => Self::BigInteger,
            "unsignedInteger" => Self::UnsignedInteger,
            "unsignedTinyInteger" => Self::UnsignedTinyInteger,
            "unsignedSmallInteger" => Self::UnsignedSmallInteger,
            "unsignedMediumInteger" => Self::UnsignedMediumInteger,
            "unsignedBigInteger" => Self::UnsignedBigInteger,
            "increments" => Self::Increments,
            "tinyIncrements" => Self::TinyIncrements,
            "smallIncrements" => Self::SmallIncrements,
            "mediumIncrements" => Self::MediumIncrements,
            "bigIncrements" | "id" => Self::BigIncrements,
            "float" => Self::Float,
            "double" => Self::Double,
            "decimal" => Self::Decimal,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "dateTime" | "datetime" => Self::DateTime,
            "dateTimeTz" => Self::DateTimeTz,
            "time" => Self::Time,
            "timeTz" => Self::TimeTz,
            "timestamp" => Self::Timestamp,
            "timestampTz" => Self::TimestampTz,
            "year" => Self::Year,
            "binary" => Self::Binary,
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "uuid" => Self::Uuid,
            "ipAddress" => Self::IpAddress,
            "macAddress" => Self::MacAddress,
            "enum" => Self::Enum,
            "morphs" => Self::Morphs,
            "nullableMorphs" => Self::NullableMorphs,
            "foreignId" => Self::ForeignId,
            "timestamps" => Self::Timestamps,
            "nullableTimestamps" => Self::NullableTimestamps,
            "timestampsTz" => Self::TimestampsTz,
            "softDeletes" => Self::SoftDeletes,
            "softDeletesTz" => Self::SoftDeletesTz,
            "rememberToken" => Self::RememberToken,
            _ => return None,
        };
        Some(ty)
    }

    /// Maps a lower-cased SQL type token to the builder vocabulary.
    pub fn from_sql(sql_type: &str) -> Self {
        let sql_type = sql_type.to_lowercase();
        match sql_type.as_str() {
            "char" | "varchar" => Self::String,
            "bigint" | "biginteger" => Self::BigInteger,
            "int" | "integer" => Self::Integer,
            "smallint" | "smallinteger" => Self::SmallInteger,
            "blob" => Self::Binary,
            other => Self::from_call(other).unwrap_or_else(|| Self::Other(sql_type.clone())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Char => "char",
            Self::Text => "text",
            Self::MediumText => "mediumText",
            Self::LongText => "longText",
            Self::Integer => "integer",
            Self::TinyInteger => "tinyInteger",
            Self::SmallInteger => "smallInteger",
            Self::MediumInteger => "mediumInteger",
            Self::BigInteger => "bigInteger",
            Self::UnsignedInteger => "unsignedInteger",
            Self::UnsignedTinyInteger => "unsignedTinyInteger",
            Self::UnsignedSmallInteger => "unsignedSmallInteger",
            Self::UnsignedMediumInteger => "unsignedMediumInteger",
            Self::UnsignedBigInteger => "unsignedBigInteger",
            Self::Increments => "increments",
            Self::TinyIncrements => "tinyIncrements",
            Self::SmallIncrements => "smallIncrements",
            Self::MediumIncrements => "mediumIncrements",
            Self::BigIncrements => "bigIncrements",
            Self::Float => "float",
            Self::Double => "double",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::DateTimeTz => "dateTimeTz",
            Self::Time => "time",
            Self::TimeTz => "timeTz",
            Self::Timestamp => "timestamp",
            Self::TimestampTz => "timestampTz",
            Self::Year => "year",
            Self::Binary => "binary",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::Uuid => "uuid",
            Self::IpAddress => "ipAddress",
            Self::MacAddress => "macAddress",
            Self::Enum => "enum",
            Self::Morphs => "morphs",
            Self::NullableMorphs => "nullableMorphs",
            Self::ForeignId => "foreignId",
            Self::Timestamps => "timestamps",
            Self::NullableTimestamps => "nullableTimestamps",
            Self::TimestampsTz => "timestampsTz",
            Self::SoftDeletes => "softDeletes",
            Self::SoftDeletesTz => "softDeletesTz",
            Self::RememberToken => "rememberToken",
            Self::Other(name) => name,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Timestamps
                | Self::NullableTimestamps
                | Self::TimestampsTz
                | Self::SoftDeletes
                | Self::SoftDeletesTz
                | Self::RememberToken
        )
    }

    /// Increments columns are their table's primary key already.
    pub fn is_increments(&self) -> bool {
        matches!(
            self,
            Self::Increments
                | Self::TinyIncrements
                | Self::SmallIncrements
                | Self::MediumIncrements
                | Self::BigIncrements
        )
    }

    /// `AUTO_INCREMENT` on an integer column turns it into an increments column.
    pub fn auto_incremented(self) -> Self {
        match self {
            Self::Integer => Self::Increments,
            Self::BigInteger => Self::BigIncrements,
            other => other,
        }
    }

    /// Whether a SQL `type(params)` list carries over as builder parameters.
    /// Integer display widths do not: the builder's second argument there
    /// means something else.
    pub fn takes_sql_parameters(&self) -> bool {
        matches!(self, Self::String | Self::Char | Self::Float | Self::Double | Self::Decimal)
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
