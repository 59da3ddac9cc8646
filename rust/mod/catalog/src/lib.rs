//! Catalog module: categories and the plans and addons they own.
//!
//! # Resources
//!
//! - **Category**: `/category[/{id}]`
//! - **Plan**: `/plan/{categoryId}[/{id}]`, ordinal ids scoped per category
//! - **Addon**: `/addon/{categoryId}[/{id}]`, same shape as plans
//!
//! Every request must carry an `X-API-Key` header that matches a row of
//! `tbl_apikeys`.
//!
//! # Usage
//!
//! ```ignore
//! use catalog::CatalogModule;
//!
//! let module = CatalogModule::new(sql, auth)?;
//! let router = module.routes();
//! ```

pub mod api;
pub mod auth;
pub mod controller;
pub mod dispatch;
pub mod field;
pub mod gateway;
pub mod model;
pub mod schema;
pub mod update;
pub mod validate;


use std::sync::Arc;

use axum::Router;

use catalog_core::{Authenticator, Module, ServiceError};
use catalog_sql::SQLStore;

pub use crate::api::AppState;
pub use crate::auth::ApiKeyAuthenticator;
pub use crate::dispatch::{Dispatcher, RequestContext};

/// Catalog module implementing the Module trait.
pub struct CatalogModule {
    state: AppState,
}

impl CatalogModule {
    /// Create the module, creating its tables if they do not exist.
    pub fn new(sql: Arc<dyn SQLStore>, auth: Arc<dyn Authenticator>) -> Result<Self, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Self {
            state: AppState { sql, auth },
        })
    }

    /// Create the module with the store-backed API-key authenticator.
    pub fn with_api_keys(sql: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        let auth = Arc::new(ApiKeyAuthenticator::new(sql.clone()));
        Self::new(sql, auth)
    }
}

impl Module for CatalogModule {
    fn name(&self) -> &str {
        "catalog"
    }

    fn routes(&self) -> Router {
        api::build_router(self.state.clone())
    }
}
