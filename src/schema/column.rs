use crate::Value;
use std::fmt::{Display, Formatter};

/// Portable column types.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColumnType {
    BigInt,
    Integer,
    SmallInt,
    String,
    Text,
    Boolean,
    Float,
    DateTime,
    Binary,
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::BigInt => "BIGINT",
                Self::Integer => "INTEGER",
                Self::SmallInt => "SMALLINT",
                Self::String => "VARCHAR",
                Self::Text => "TEXT",
                Self::Boolean => "BOOLEAN",
                Self::Float => "DOUBLE PRECISION",
                Self::DateTime => "DATETIME",
                Self::Binary => "BLOB",
            }
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    r#type: ColumnType,
    length: Option<usize>,
    notnull: bool,
    default: Value,
}

impl Column {
    pub fn new<S: AsRef<str>>(name: S, r#type: ColumnType) -> Self {
        Self {
            name: name.as_ref().to_string(),
            r#type,
            length: None,
            notnull: false,
            default: Value::NULL,
        }
    }

    /// Starts a column definition; chain the `set_*` methods to refine it.
    pub fn builder<S: AsRef<str>>(name: S, r#type: ColumnType) -> Self {
        Self::new(name, r#type)
    }

    pub fn set_notnull(mut self, notnull: bool) -> Self {
        self.notnull = notnull;
        self
    }

    pub fn set_length(mut self, length: Option<usize>) -> Self {
        self.length = length;
        self
    }

    pub fn set_default<V: Into<Value>>(mut self, default: V) -> Self {
        self.default = default.into();
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_type(&self) -> ColumnType {
        self.r#type
    }

    pub fn is_notnull(&self) -> bool {
        self.notnull
    }

    pub fn get_default(&self) -> &Value {
        &self.default
    }

    pub(super) fn get_declaration_sql(&self) -> String {
        let mut declaration = format!("{} {}", self.name, self.r#type);
        if self.r#type == ColumnType::String {
            declaration.push_str(&format!("({})", self.length.unwrap_or(255)));
        }

        if self.notnull {
            declaration.push_str(" NOT NULL");
        }

        match &self.default {
            Value::NULL => {}
            Value::String(s) => declaration.push_str(&format!(" DEFAULT '{}'", s.replace('\'', "''"))),
            Value::Boolean(b) => declaration.push_str(if *b { " DEFAULT 1" } else { " DEFAULT 0" }),
            value => declaration.push_str(&format!(" DEFAULT {}", value)),
        }

        declaration
    }
}
