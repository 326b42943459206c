use crate::{
    config::DbConfig,
    data::{ColumnValue, Columns, Id, Repository, Resource},
    error::{AlumnadoResult, MigrateSnafu, OpenDatabaseSnafu},
};
use async_trait::async_trait;
use snafu::ResultExt;
use sqlx::{Pool, Postgres, QueryBuilder, postgres::PgPoolOptions};

/// [`Repository`] for every [`Resource`], backed by a Postgres pool.
#[derive(Clone, Debug)]
pub struct PgRepository {
    pool: Pool<Postgres>,
}

impl PgRepository {
    pub async fn new(options: PgPoolOptions, config: &DbConfig) -> AlumnadoResult<Self> {
        let pool = options
            .connect(&config.get_db_path())
            .await
            .context(OpenDatabaseSnafu)?;

        sqlx::migrate!().run(&pool).await.context(MigrateSnafu)?;

        Ok(Self { pool })
    }

    pub async fn sensible_shutdown(&self) {
        self.pool.close().await;
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: ColumnValue) {
    match value {
        ColumnValue::Text(v) => builder.push_bind(v),
        ColumnValue::Int(v) => builder.push_bind(v),
        ColumnValue::Float(v) => builder.push_bind(v),
        ColumnValue::Date(v) => builder.push_bind(v),
    };
}

/// `col_a = $1 <separator> col_b = $2 ...`
fn push_assignments(
    builder: &mut QueryBuilder<'_, Postgres>,
    columns: Vec<(&'static str, ColumnValue)>,
    separator: &str,
) {
    for (i, (column, value)) in columns.into_iter().enumerate() {
        if i > 0 {
            builder.push(separator);
        }
        builder.push(column).push(" = ");
        push_value(builder, value);
    }
}

fn select_by_id<R: Resource>(id: Id) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(R::SELECT);
    builder
        .push(" WHERE ")
        .push(R::QUALIFIED_ID)
        .push(" = ")
        .push_bind(id);
    builder
}

fn select_filtered<R: Resource>(filter: &R::Filter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(R::SELECT);

    let conditions = filter.columns();
    if !conditions.is_empty() {
        builder.push(" WHERE ");
        push_assignments(&mut builder, conditions, " AND ");
    }
    if let Some(order_by) = R::ORDER_BY {
        builder.push(" ORDER BY ").push(order_by);
    }

    builder
}

fn insert_statement<R: Resource>(payload: &R::Payload) -> QueryBuilder<'static, Postgres> {
    let columns = payload.columns();
    let mut builder = QueryBuilder::new(format!("INSERT INTO {} (", R::TABLE));

    let mut names = builder.separated(", ");
    for (column, _) in &columns {
        names.push(*column);
    }

    builder.push(") VALUES (");
    for (i, (_, value)) in columns.into_iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        push_value(&mut builder, value);
    }
    builder.push(") RETURNING ").push(R::ID_COLUMN);

    builder
}

fn update_statement<R: Resource>(id: Id, payload: &R::Payload) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("UPDATE {} SET ", R::TABLE));
    push_assignments(&mut builder, payload.columns(), ", ");
    builder
        .push(" WHERE ")
        .push(R::ID_COLUMN)
        .push(" = ")
        .push_bind(id);
    builder
}

fn delete_statement<R: Resource>(id: Id) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("DELETE FROM {} WHERE ", R::TABLE));
    builder.push(R::ID_COLUMN).push(" = ").push_bind(id);
    builder
}

#[async_trait]
impl<R: Resource> Repository<R> for PgRepository {
    async fn list(&self, filter: &R::Filter) -> sqlx::Result<Vec<R::Record>> {
        select_filtered::<R>(filter)
            .build_query_as::<R::Record>()
            .fetch_all(&self.pool)
            .await
    }

    async fn get(&self, id: Id) -> sqlx::Result<Option<R::Record>> {
        select_by_id::<R>(id)
            .build_query_as::<R::Record>()
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert(&self, payload: &R::Payload) -> sqlx::Result<Id> {
        insert_statement::<R>(payload)
            .build_query_scalar::<Id>()
            .fetch_one(&self.pool)
            .await
    }

    async fn update(&self, id: Id, payload: &R::Payload) -> sqlx::Result<u64> {
        Ok(update_statement::<R>(id, payload)
            .build()
            .execute(&self.pool)
            .await?
            .rows_affected())
    }

    async fn delete(&self, id: Id) -> sqlx::Result<u64> {
        Ok(delete_statement::<R>(id)
            .build()
            .execute(&self.pool)
            .await?
            .rows_affected())
    }
}
