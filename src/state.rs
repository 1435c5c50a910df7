use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{repo::PgUserRepo, repo::UserRepo, CredentialStore, JwtKeys};
use crate::bookings::{BookingRepo, PgBookingRepo};
use crate::config::JwtConfig;
use crate::hotels::{Hotel, HotelRepo, PgHotelRepo};
use crate::memory::MemoryStore;
use crate::users::ProfileService;

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<JwtKeys>,
    pub credentials: CredentialStore,
    pub profiles: ProfileService,
    pub bookings: Arc<dyn BookingRepo>,
    pub hotels: Arc<dyn HotelRepo>,
}

impl AppState {
    pub fn from_parts(
        jwt: &JwtConfig,
        users: Arc<dyn UserRepo>,
        bookings: Arc<dyn BookingRepo>,
        hotels: Arc<dyn HotelRepo>,
    ) -> Self {
        let credentials = CredentialStore::new(users.clone());
        Self {
            keys: JwtKeys::shared(jwt),
            profiles: ProfileService::new(users, credentials.clone()),
            credentials,
            bookings,
            hotels,
        }
    }

    /// Postgres-backed state; the pool is shared by all three repos.
    pub fn postgres(jwt: &JwtConfig, db: PgPool) -> Self {
        Self::from_parts(
            jwt,
            Arc::new(PgUserRepo::new(db.clone())),
            Arc::new(PgBookingRepo::new(db.clone())),
            Arc::new(PgHotelRepo::new(db)),
        )
    }

    pub fn in_memory(jwt: &JwtConfig, hotels: impl IntoIterator<Item = Hotel>) -> Self {
        let store = Arc::new(MemoryStore::with_hotels(hotels));
        Self::from_parts(jwt, store.clone(), store.clone(), store)
    }

    pub fn fake() -> Self {
        let jwt = JwtConfig {
            secret: "test".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
        };
        let hotels = [Hotel {
            hotel_id: 1,
            name: "Harbour View".into(),
            location: Some("Lisbon".into()),
            description: None,
            image_url: None,
        }];
        Self::in_memory(&jwt, hotels)
    }
}
