//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{BookRepository, MemberRepository};
use crate::infrastructure::config::CirculationConfig;
use crate::infrastructure::{SeaOrmBookRepository, SeaOrmMemberRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection, used directly by the circulation/label services
    db: DatabaseConnection,
    /// Circulation desk constants
    pub circulation: CirculationConfig,
    /// Member directory repository
    pub member_repo: Arc<dyn MemberRepository>,
    /// Book catalog repository
    pub book_repo: Arc<dyn BookRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, circulation: CirculationConfig) -> Self {
        let member_repo = Arc::new(SeaOrmMemberRepository::new(db.clone()));
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));

        Self {
            db,
            circulation,
            member_repo,
            book_repo,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AsRef<DatabaseConnection> for AppState {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Allow handlers to extract the connection or the desk constants directly
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for CirculationConfig {
    fn from_ref(state: &AppState) -> Self {
        state.circulation.clone()
    }
}
