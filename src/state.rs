use std::{ops::Deref, sync::Arc};

/// Shared handler state. `S` is the repository every resource is stored in.
#[derive(Debug)]
pub struct AppState<S> {
    repository: Arc<S>,
}

impl<S> AppState<S> {
    pub fn new(repository: S) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }
}

// manual impl so `S` itself needn't be `Clone`
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<S> Deref for AppState<S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        &self.repository
    }
}
