// src/state.rs
use sqlx::SqlitePool;

// Estado raiz da aplicação: tudo o que os handlers partilham vive aqui,
// nunca em variáveis de módulo.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}
