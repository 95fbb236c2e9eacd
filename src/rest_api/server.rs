//! # REST API HTTP Server
//!
//! Axum routes for the `/cards` collection. Cards are addressed through the
//! query string: `user` names the owner, `cardID` the local id.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::card::Card;
use crate::service::{CardService, ServiceResult};
use crate::store::RecordStore;

use super::errors::{RestError, RestResult};
use super::query::CardQuery;

/// REST API server state
pub struct RestServer<S: RecordStore + ?Sized> {
    service: CardService<S>,
}

impl<S: RecordStore + ?Sized + 'static> RestServer<S> {
    pub fn new(service: CardService<S>) -> Self {
        Self { service }
    }

    /// Build the Axum router
    pub fn router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route(
                "/cards",
                get(get_handler::<S>)
                    .post(create_handler::<S>)
                    .patch(update_handler::<S>)
                    .delete(delete_handler::<S>),
            )
            .with_state(state)
    }

    /// Runs a service call on the blocking pool; store writes fsync.
    async fn run<T, F>(&self, op: F) -> RestResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&CardService<S>) -> ServiceResult<T> + Send + 'static,
    {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || op(&service))
            .await
            .map_err(|e| RestError::Internal(e.to_string()))?
            .map_err(RestError::from)
    }
}

/// Shared state type
type ServerState<S> = Arc<RestServer<S>>;

/// List an owner's cards, or fetch one when `cardID` is given.
///
/// Both forms answer with an array; an empty result is a 404.
async fn get_handler<S: RecordStore + ?Sized + 'static>(
    State(server): State<ServerState<S>>,
    Query(query): Query<CardQuery>,
) -> Result<Json<Vec<Card>>, RestError> {
    let owner = query.require_owner()?.to_string();

    let cards = match query.local_id()? {
        Some(local_id) => {
            let found = server
                .run(move |service| service.get(&owner, local_id))
                .await;
            match found {
                Ok(card) => vec![card],
                Err(RestError::Service(err)) if err.is_not_found() => Vec::new(),
                Err(err) => return Err(err),
            }
        }
        None => server.run(move |service| service.list(&owner)).await?,
    };

    if cards.is_empty() {
        return Err(RestError::NotFound);
    }
    Ok(Json(cards))
}

/// Create a card from the JSON body
async fn create_handler<S: RecordStore + ?Sized + 'static>(
    State(server): State<ServerState<S>>,
    Query(query): Query<CardQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Card>), RestError> {
    let owner = query.owner().map(str::to_string);

    // Without an owner the body is never looked at.
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) if owner.is_some() => return Err(rejection.into()),
        Err(_) => Value::Null,
    };

    let card = server
        .run(move |service| service.create(owner.as_deref(), &body))
        .await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// Apply a partial update from the JSON body
async fn update_handler<S: RecordStore + ?Sized + 'static>(
    State(server): State<ServerState<S>>,
    Query(query): Query<CardQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Card>, RestError> {
    let owner = query.require_owner()?.to_string();
    let local_id = query.require_local_id()?;
    let Json(patch) = body?;

    let card = server
        .run(move |service| service.update(&owner, local_id, &patch))
        .await?;
    Ok(Json(card))
}

/// Delete a card, answering with the removed record
async fn delete_handler<S: RecordStore + ?Sized + 'static>(
    State(server): State<ServerState<S>>,
    Query(query): Query<CardQuery>,
) -> Result<Json<Card>, RestError> {
    let owner = query.require_owner()?.to_string();
    let local_id = query.require_local_id()?;

    let card = server
        .run(move |service| service.delete(&owner, local_id))
        .await?;
    Ok(Json(card))
}
