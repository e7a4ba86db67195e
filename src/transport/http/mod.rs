pub mod router;
pub mod types;
pub mod views;
pub mod handlers {
    pub mod books;
    pub mod common;
    pub mod health;
    pub mod transfer;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
