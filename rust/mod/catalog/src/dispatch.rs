//! Request dispatch: path to resource, resource to controller.

use std::fmt;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use tracing::debug;

use catalog_core::{Principal, ServiceError, api_key_from_headers};
use catalog_sql::SQLStore;

use crate::controller::{Controller, Reply, parse_id};
use crate::gateway::{AddonGateway, CategoryGateway, Gateway, PlanGateway};

/// Everything the dispatcher needs to know about one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// URI path only; the query string is not part of routing.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Set by the API-key middleware once the caller is authenticated.
    pub principal: Option<Principal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Category,
    Plan,
    Addon,
}

impl ResourceKind {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "category" => Some(Self::Category),
            "plan" => Some(Self::Plan),
            "addon" => Some(Self::Addon),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Plan => "plan",
            Self::Addon => "addon",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `/{resource}[/{parentId}][/{id}]` path. Ids are kept raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route<'a> {
    pub resource: ResourceKind,
    /// Owning category; always set for plans and addons, never for categories.
    pub parent: Option<&'a str>,
    pub item: Option<&'a str>,
}

/// Split a path into a [`Route`].
///
/// Empty segments are skipped, so a trailing or doubled slash changes
/// nothing. An unknown resource, a child resource without its category,
/// or too many segments is [`ServiceError::RouteNotFound`].
pub fn parse_route(path: &str) -> Result<Route<'_>, ServiceError> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    let resource = segments
        .next()
        .and_then(ResourceKind::from_segment)
        .ok_or(ServiceError::RouteNotFound)?;

    let route = match resource {
        ResourceKind::Category => Route {
            resource,
            parent: None,
            item: segments.next(),
        },
        ResourceKind::Plan | ResourceKind::Addon => Route {
            resource,
            parent: Some(segments.next().ok_or(ServiceError::RouteNotFound)?),
            item: segments.next(),
        },
    };

    if segments.next().is_some() {
        return Err(ServiceError::RouteNotFound);
    }
    Ok(route)
}

/// Builds the gateway and controller for each request over a borrowed store.
pub struct Dispatcher<'a> {
    sql: &'a dyn SQLStore,
}

impl<'a> Dispatcher<'a> {
    pub fn new(sql: &'a dyn SQLStore) -> Self {
        Self { sql }
    }

    pub fn dispatch(&self, ctx: &RequestContext) -> Result<Reply, ServiceError> {
        let caller = caller(ctx)?;
        let route = parse_route(&ctx.path)?;
        debug!(
            "dispatch {} {} -> {} for {}",
            ctx.method, ctx.path, route.resource, caller.username
        );

        match route.resource {
            ResourceKind::Category => Controller::new(CategoryGateway::new(self.sql)).process_request(
                &ctx.method,
                &(),
                route.item,
                &ctx.body,
            ),
            ResourceKind::Plan => {
                let category = parent_id(route.parent)?;
                Controller::new(PlanGateway::new(self.sql)).process_request(
                    &ctx.method,
                    &category,
                    route.item,
                    &ctx.body,
                )
            }
            ResourceKind::Addon => {
                let category = parent_id(route.parent)?;
                Controller::new(AddonGateway::new(self.sql)).process_request(
                    &ctx.method,
                    &category,
                    route.item,
                    &ctx.body,
                )
            }
        }
    }
}

/// The authenticated caller. A context that never passed the API-key
/// middleware is refused the same way the middleware would refuse it.
fn caller(ctx: &RequestContext) -> Result<&Principal, ServiceError> {
    match &ctx.principal {
        Some(principal) => Ok(principal),
        None => {
            api_key_from_headers(&ctx.headers)?;
            Err(ServiceError::Unauthorized("Invalid API key".into()))
        }
    }
}

/// A parent id that is not a number names a category that cannot exist.
fn parent_id(raw: Option<&str>) -> Result<i64, ServiceError> {
    let raw = raw.ok_or(ServiceError::RouteNotFound)?;
    parse_id(raw).ok_or_else(|| ServiceError::NotFound(CategoryGateway::not_found_message(&(), raw)))
}
