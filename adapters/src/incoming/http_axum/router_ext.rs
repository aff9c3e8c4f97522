use axum::{Router, middleware};
use axum_login::AuthManagerLayer;
use tower_sessions_redis_store::{RedisStore, fred::prelude::Client};

use crate::incoming::http_axum::{
    auth::backend::AuthBackend, middleware::request_id::request_id_middleware,
};

pub trait RouterExt<State> {
    fn with_request_id(self) -> Self;
    fn with_auth(self, layer: AuthManagerLayer<AuthBackend, RedisStore<Client>>) -> Self;
}

impl<State> RouterExt<State> for Router<State>
where
    State: Clone + Send + Sync + 'static,
{
    fn with_request_id(self) -> Self {
        self.layer(middleware::from_fn(request_id_middleware))
    }

    fn with_auth(self, layer: AuthManagerLayer<AuthBackend, RedisStore<Client>>) -> Self {
        self.layer(layer)
    }
}
