use crate::error::{AlumnadoResult, MissingFieldsSnafu};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de, de::DeserializeOwned};
use snafu::ensure;
use sqlx::{FromRow, postgres::PgRow};
use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

pub mod attendance;
pub mod grade;
pub mod postgres;
pub mod student;

pub type Id = i32;

/// A single bindable column value. `None` is written as SQL `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(Option<String>),
    Int(Option<i32>),
    Float(Option<f64>),
    Date(Option<NaiveDate>),
}

impl ColumnValue {
    /// Absent, empty or zero.
    #[allow(clippy::float_cmp)]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(v) => v.as_deref().is_none_or(str::is_empty),
            Self::Int(v) => v.is_none_or(|n| n == 0),
            Self::Float(v) => v.is_none_or(|n| n == 0.0 || n.is_nan()),
            Self::Date(v) => v.is_none(),
        }
    }
}

/// Deserializes an optional value where an empty string means absent, e.g. `?id_curso=`.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => raw.parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

pub trait Columns {
    fn columns(&self) -> Vec<(&'static str, ColumnValue)>;
}

/// Query-string filter for resources that can't be filtered.
#[derive(Debug, Default, Deserialize)]
pub struct NoFilter {}

impl Columns for NoFilter {
    fn columns(&self) -> Vec<(&'static str, ColumnValue)> {
        vec![]
    }
}

/// Client-facing text for every outcome of every operation on a resource.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub list_failed: &'static str,
    pub get_failed: &'static str,
    pub create_failed: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
    pub not_found: &'static str,
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
}

/// One table exposed over HTTP.
///
/// `SELECT` is the full read projection including any joined display columns, aliased so that
/// `QUALIFIED_ID` and filter columns resolve against it. `Payload::columns` lists every mutable
/// column, so inserts and updates always write all of them.
pub trait Resource: Send + Sync + 'static {
    type Record: Serialize + for<'r> FromRow<'r, PgRow> + Debug + Send + Unpin;
    type Payload: Columns + Serialize + DeserializeOwned + Debug + Send + Sync;
    type Filter: Columns + DeserializeOwned + Default + Debug + Send + Sync;

    const PATH: &'static str;
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    const SELECT: &'static str;
    const QUALIFIED_ID: &'static str;
    const ORDER_BY: Option<&'static str> = None;
    const REQUIRED: &'static [&'static str];
    const MESSAGES: Messages;

    fn missing_fields(payload: &Self::Payload) -> Vec<&'static str> {
        payload
            .columns()
            .into_iter()
            .filter(|(column, value)| Self::REQUIRED.contains(column) && value.is_blank())
            .map(|(column, _)| column)
            .collect()
    }

    fn validate(payload: &Self::Payload) -> AlumnadoResult<()> {
        let fields = Self::missing_fields(payload);
        ensure!(fields.is_empty(), MissingFieldsSnafu { fields });
        Ok(())
    }
}

/// Storage for a [`Resource`]. Each method maps to exactly one statement.
#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    async fn list(&self, filter: &R::Filter) -> sqlx::Result<Vec<R::Record>>;
    async fn get(&self, id: Id) -> sqlx::Result<Option<R::Record>>;
    async fn insert(&self, payload: &R::Payload) -> sqlx::Result<Id>;
    /// Returns the affected-row count.
    async fn update(&self, id: Id, payload: &R::Payload) -> sqlx::Result<u64>;
    /// Returns the affected-row count.
    async fn delete(&self, id: Id) -> sqlx::Result<u64>;
}
