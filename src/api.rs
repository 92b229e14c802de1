//! Request handlers for the `/applications` resource.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/applications` | 200, JSON array, optionally filtered by query string |
//! | GET | `/applications/{id}` | 200, JSON object; 404 if absent |
//! | POST | `/applications` | 200, full JSON array including the new record |
//! | PUT | `/applications/{id}` | 200, full JSON array; unchanged if `id` is absent |
//! | DELETE | `/applications/{id}` | 200, full JSON array after removal |
//!
//! Create and update take JSON or YAML bodies, picked by `Content-Type`.
//! Each handler holds the store lock from before decoding until the
//! response list has been copied out.

use std::sync::Arc;

use crate::codec;
use crate::error::Error;
use crate::filter::Query;
use crate::method::Method;
use crate::model::Application;
use crate::request::Request;
use crate::response::Json;
use crate::router::Router;
use crate::store::Store;

type Reply<T> = Result<Json<T>, Error>;

/// The full route table over `store`.
pub fn routes(store: Arc<Store>) -> Router<Store> {
    Router::with_state(store)
        .on(Method::Get,    "/applications",      list)
        .on(Method::Get,    "/applications/{id}", get)
        .on(Method::Post,   "/applications",      create)
        .on(Method::Put,    "/applications/{id}", update)
        .on(Method::Delete, "/applications/{id}", delete)
}

async fn list(store: Arc<Store>, req: Request) -> Reply<Vec<Application>> {
    let query = req.query().map(Query::parse).unwrap_or_default();
    Ok(Json(store.filter(&query)))
}

async fn get(store: Arc<Store>, req: Request) -> Reply<Application> {
    store.get(id(&req)).map(Json)
}

async fn create(store: Arc<Store>, req: Request) -> Reply<Vec<Application>> {
    let mut records = store.lock();
    let candidate = codec::decode(req.body(), req.content_type())?;
    records.create(candidate).map(Json)
}

/// An absent id answers with the current list before the body is even
/// looked at, so a bad payload aimed at a missing record still gets 200.
async fn update(store: Arc<Store>, req: Request) -> Reply<Vec<Application>> {
    let id = id(&req);
    let mut records = store.lock();
    if !records.contains(id) {
        return Ok(Json(records.list()));
    }
    let candidate = codec::decode(req.body(), req.content_type())?;
    records.replace(id, candidate).map(Json)
}

async fn delete(store: Arc<Store>, req: Request) -> Reply<Vec<Application>> {
    Ok(Json(store.remove(id(&req))))
}

/// Routes with an `{id}` segment always carry the param.
fn id(req: &Request) -> &str {
    req.param("id").unwrap_or_default()
}
