//! In-process store with the same semantics as the Postgres repos: unique
//! emails, hotel foreign keys, and owner-scoped booking writes. Backs the
//! test suites.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::auth::repo::UserRepo;
use crate::auth::repo_types::{NewUser, User, UserChanges};
use crate::bookings::{Booking, BookingDraft, BookingRepo};
use crate::error::StoreError;
use crate::hotels::{Hotel, HotelRepo};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    hotels: BTreeMap<i32, Hotel>,
    bookings: BTreeMap<i32, Booking>,
    next_user_id: i32,
    next_booking_id: i32,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.user_id) != except)
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hotels(hotels: impl IntoIterator<Item = Hotel>) -> Self {
        let tables = Tables {
            hotels: hotels.into_iter().map(|h| (h.hotel_id, h)).collect(),
            ..Default::default()
        };
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&user_id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, None) {
            return Err(StoreError::Duplicate("email"));
        }
        tables.next_user_id += 1;
        let row = User {
            user_id: tables.next_user_id,
            email: user.email,
            password_hash: user.password_hash,
            phone_number: user.phone_number,
            profile_picture: user.profile_picture,
        };
        tables.users.insert(row.user_id, row.clone());
        debug!(user_id = row.user_id, "user saved to memory storage");
        Ok(row)
    }

    async fn update(
        &self,
        user_id: i32,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(user_id)) {
                return Err(StoreError::Duplicate("email"));
            }
        }
        let Some(user) = tables.users.get_mut(&user_id) else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(phone) = changes.phone_number {
            user.phone_number = Some(phone);
        }
        if let Some(picture) = changes.profile_picture {
            user.profile_picture = Some(picture);
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl HotelRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Hotel>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.hotels.values().cloned().collect())
    }

    async fn find_by_id(&self, hotel_id: i32) -> Result<Option<Hotel>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.hotels.get(&hotel_id).cloned())
    }
}

#[async_trait]
impl BookingRepo for MemoryStore {
    async fn create(&self, owner_id: i32, draft: BookingDraft) -> Result<Booking, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner_id) {
            return Err(StoreError::MissingReference("user"));
        }
        if !tables.hotels.contains_key(&draft.hotel_id) {
            return Err(StoreError::MissingReference("hotel"));
        }
        tables.next_booking_id += 1;
        let now = OffsetDateTime::now_utc();
        let booking = Booking {
            booking_id: tables.next_booking_id,
            user_id: owner_id,
            hotel_id: draft.hotel_id,
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_time: now,
            updated_time: now,
        };
        tables.bookings.insert(booking.booking_id, booking.clone());
        Ok(booking)
    }

    async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<Booking>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .values()
            .filter(|b| b.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update_if_owned(
        &self,
        booking_id: i32,
        owner_id: i32,
        draft: BookingDraft,
    ) -> Result<Option<Booking>, StoreError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .bookings
            .get(&booking_id)
            .is_some_and(|b| b.user_id == owner_id);
        if !owned {
            trace!(booking_id, owner_id, "no owned booking to update");
            return Ok(None);
        }
        if !tables.hotels.contains_key(&draft.hotel_id) {
            return Err(StoreError::MissingReference("hotel"));
        }
        let Some(booking) = tables.bookings.get_mut(&booking_id) else {
            return Ok(None);
        };
        booking.hotel_id = draft.hotel_id;
        booking.start_date = draft.start_date;
        booking.end_date = draft.end_date;
        booking.updated_time = OffsetDateTime::now_utc().max(booking.updated_time);
        Ok(Some(booking.clone()))
    }

    async fn delete_if_owned(&self, booking_id: i32, owner_id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let owned = tables
            .bookings
            .get(&booking_id)
            .is_some_and(|b| b.user_id == owner_id);
        if owned {
            tables.bookings.remove(&booking_id);
        }
        Ok(owned)
    }
}
