use crate::{
    data::{Id, Repository, Resource},
    error::{
        AlumnadoResult, InvalidBodySnafu, InvalidIdSnafu, InvalidQuerySnafu, MakeQuerySnafu,
        NotFoundSnafu,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Serialize;
use snafu::{OptionExt, ResultExt, ensure};
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct Confirmation {
    pub message: &'static str,
}

/// Body of a 201: the confirmation, the new id under its column name, and the stored fields.
#[derive(Debug, Serialize)]
pub struct Created<P> {
    pub message: &'static str,
    #[serde(flatten)]
    pub id: BTreeMap<&'static str, Id>,
    #[serde(flatten)]
    pub payload: P,
}

pub async fn list<R, S>(
    State(state): State<AppState<S>>,
    filter: Result<Query<R::Filter>, QueryRejection>,
) -> AlumnadoResult<Json<Vec<R::Record>>>
where
    R: Resource,
    S: Repository<R>,
{
    let Query(filter) = filter.context(InvalidQuerySnafu)?;

    let records = state.list(&filter).await.context(MakeQuerySnafu {
        message: R::MESSAGES.list_failed,
    })?;

    Ok(Json(records))
}

pub async fn get_one<R, S>(
    State(state): State<AppState<S>>,
    id: Result<Path<Id>, PathRejection>,
) -> AlumnadoResult<Json<R::Record>>
where
    R: Resource,
    S: Repository<R>,
{
    let Path(id) = id.context(InvalidIdSnafu)?;

    let record = state
        .get(id)
        .await
        .context(MakeQuerySnafu {
            message: R::MESSAGES.get_failed,
        })?
        .context(NotFoundSnafu {
            message: R::MESSAGES.not_found,
        })?;

    Ok(Json(record))
}

pub async fn create<R, S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<R::Payload>, JsonRejection>,
) -> AlumnadoResult<(StatusCode, Json<Created<R::Payload>>)>
where
    R: Resource,
    S: Repository<R>,
{
    let Json(payload) = payload.context(InvalidBodySnafu)?;
    R::validate(&payload)?;

    let id = state.insert(&payload).await.context(MakeQuerySnafu {
        message: R::MESSAGES.create_failed,
    })?;
    debug!(table = R::TABLE, id, "Inserted row");

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: R::MESSAGES.created,
            id: BTreeMap::from([(R::ID_COLUMN, id)]),
            payload,
        }),
    ))
}

pub async fn replace<R, S>(
    State(state): State<AppState<S>>,
    id: Result<Path<Id>, PathRejection>,
    payload: Result<Json<R::Payload>, JsonRejection>,
) -> AlumnadoResult<Json<Confirmation>>
where
    R: Resource,
    S: Repository<R>,
{
    let Path(id) = id.context(InvalidIdSnafu)?;
    let Json(payload) = payload.context(InvalidBodySnafu)?;
    R::validate(&payload)?;

    let affected = state.update(id, &payload).await.context(MakeQuerySnafu {
        message: R::MESSAGES.update_failed,
    })?;
    ensure!(
        affected > 0,
        NotFoundSnafu {
            message: R::MESSAGES.not_found
        }
    );
    debug!(table = R::TABLE, id, "Replaced row");

    Ok(Json(Confirmation {
        message: R::MESSAGES.updated,
    }))
}

pub async fn remove<R, S>(
    State(state): State<AppState<S>>,
    id: Result<Path<Id>, PathRejection>,
) -> AlumnadoResult<Json<Confirmation>>
where
    R: Resource,
    S: Repository<R>,
{
    let Path(id) = id.context(InvalidIdSnafu)?;

    let affected = state.delete(id).await.context(MakeQuerySnafu {
        message: R::MESSAGES.delete_failed,
    })?;
    ensure!(
        affected > 0,
        NotFoundSnafu {
            message: R::MESSAGES.not_found
        }
    );
    debug!(table = R::TABLE, id, "Deleted row");

    Ok(Json(Confirmation {
        message: R::MESSAGES.deleted,
    }))
}
