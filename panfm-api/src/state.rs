use panfm_core::PostgresStore;

#[derive(Clone)]
pub struct AppState {
    pub store: PostgresStore,
}
