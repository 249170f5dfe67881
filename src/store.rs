// Booking records backend: a table-style store with rows keyed by booking
// id, per-id updates and per-user selects ordered newest-first.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

use crate::model::{Booking, BookingStatus};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("booking not found")]
    NotFound,

    #[error("storage backend error: {0}")]
    Backend(String),
}

// Row contents for a new reservation. Id and creation timestamp are
// assigned by the store on insert.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: String,
    pub hotel_id: i64,
    pub hotel_name: String,
    pub hotel_image: String,
    pub hotel_city: String,
    pub hotel_country: String,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
    pub status: BookingStatus,
}

// Per-id partial update, restricted to the columns edit and cancel touch.
// The captured price and the contact fields have no update path.
#[derive(Debug, Clone, Default)]
pub struct BookingChanges {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: Option<u32>,
    pub status: Option<BookingStatus>,
}

#[async_trait]
pub trait BookingStore: Send + Sync + 'static {
    async fn insert(&self, row: NewBooking) -> Result<Booking, StoreError>;

    async fn update(&self, id: &str, changes: BookingChanges) -> Result<Booking, StoreError>;

    async fn by_id(&self, id: &str) -> Result<Option<Booking>, StoreError>;

    // All bookings belonging to one user, most recently created first.
    async fn for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError>;
}

struct Row {
    // Insertion sequence keeps newest-first ordering total even when two
    // rows share a creation timestamp.
    seq: u64,
    booking: Booking,
}

// In-memory booking table used by tests and local development.
#[derive(Default)]
pub struct InMemoryBookingTable {
    rows: DashMap<String, Row>,
    next_seq: AtomicU64,
}

impl InMemoryBookingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingTable {
    async fn insert(&self, row: NewBooking) -> Result<Booking, StoreError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let id = format!("bk-{}-{:04x}", seq, rand::random::<u16>());

        let booking = Booking {
            id: id.clone(),
            user_id: row.user_id,
            hotel_id: row.hotel_id,
            hotel_name: row.hotel_name,
            hotel_image: row.hotel_image,
            hotel_city: row.hotel_city,
            hotel_country: row.hotel_country,
            guest_name: row.guest_name,
            guest_email: row.guest_email,
            guest_phone: row.guest_phone,
            check_in: row.check_in,
            check_out: row.check_out,
            guests: row.guests,
            total_price: row.total_price,
            status: row.status,
            created_at: Utc::now(),
        };

        self.rows.insert(
            id,
            Row {
                seq,
                booking: booking.clone(),
            },
        );
        tracing::info!(booking_id = %booking.id, user_id = %booking.user_id, "booking stored");

        Ok(booking)
    }

    async fn update(&self, id: &str, changes: BookingChanges) -> Result<Booking, StoreError> {
        let mut row = self.rows.get_mut(id).ok_or(StoreError::NotFound)?;

        if let Some(check_in) = changes.check_in {
            row.booking.check_in = check_in;
        }
        if let Some(check_out) = changes.check_out {
            row.booking.check_out = check_out;
        }
        if let Some(guests) = changes.guests {
            row.booking.guests = guests;
        }
        if let Some(status) = changes.status {
            row.booking.status = status;
        }

        Ok(row.booking.clone())
    }

    async fn by_id(&self, id: &str) -> Result<Option<Booking>, StoreError> {
        Ok(self.rows.get(id).map(|row| row.booking.clone()))
    }

    async fn for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let mut rows: Vec<(u64, Booking)> = self
            .rows
            .iter()
            .filter(|entry| entry.booking.user_id == user_id)
            .map(|entry| (entry.seq, entry.booking.clone()))
            .collect();

        rows.sort_by(|a, b| {
            b.1.created_at
                .cmp(&a.1.created_at)
                .then(b.0.cmp(&a.0))
        });

        Ok(rows.into_iter().map(|(_, booking)| booking).collect())
    }
}

// Failure-injecting wrapper so backend outages can be exercised without a
// real one.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    pub struct FlakyBookingTable {
        inner: InMemoryBookingTable,
        fail_next: AtomicUsize,
    }

    impl FlakyBookingTable {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fail_next_requests(&self, count: usize) {
            self.fail_next.store(count, Ordering::SeqCst);
        }

        fn check_failure(&self) -> Result<(), StoreError> {
            let remaining = self.fail_next.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_next.store(remaining - 1, Ordering::SeqCst);
                return Err(StoreError::Backend("storage unavailable".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl BookingStore for FlakyBookingTable {
        async fn insert(&self, row: NewBooking) -> Result<Booking, StoreError> {
            self.check_failure()?;
            self.inner.insert(row).await
        }

        async fn update(&self, id: &str, changes: BookingChanges) -> Result<Booking, StoreError> {
            self.check_failure()?;
            self.inner.update(id, changes).await
        }

        async fn by_id(&self, id: &str) -> Result<Option<Booking>, StoreError> {
            self.check_failure()?;
            self.inner.by_id(id).await
        }

        async fn for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
            self.check_failure()?;
            self.inner.for_user(user_id).await
        }
    }
}
