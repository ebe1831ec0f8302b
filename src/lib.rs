use config::Config;
use store::Store;

pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod store;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: Config,
}
