use crate::{
    data::{Repository, Resource, attendance::Attendance, grade::Grade, student::Student},
    state::AppState,
};
use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod resource;

pub fn router<S>(state: AppState<S>) -> Router
where
    S: Repository<Student> + Repository<Attendance> + Repository<Grade> + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(resource_routes::<Student, S>())
        .merge(resource_routes::<Attendance, S>())
        .merge(resource_routes::<Grade, S>())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn resource_routes<R, S>() -> Router<AppState<S>>
where
    R: Resource,
    S: Repository<R> + 'static,
{
    Router::new()
        .route(
            R::PATH,
            get(resource::list::<R, S>).post(resource::create::<R, S>),
        )
        .route(
            &format!("{}/{{id}}", R::PATH),
            get(resource::get_one::<R, S>)
                .put(resource::replace::<R, S>)
                .delete(resource::remove::<R, S>),
        )
}
