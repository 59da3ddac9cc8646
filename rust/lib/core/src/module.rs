use axum::Router;

/// A service module that contributes HTTP routes.
///
/// The binary entry point collects every module, logs its name and merges
/// its routes into the top-level Router behind the API-key middleware.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Return the module's routes. They are merged at the root, not nested,
    /// because resource paths start directly at `/{resource}`.
    fn routes(&self) -> Router;
}
