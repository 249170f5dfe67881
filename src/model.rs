// Shared domain types for the hotel catalog, sessions and booking records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// Hotel record as served by the catalog. Immutable from the client's side;
// only the backend catalog mutates these.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Hotel {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub description: String,
    pub rating: f32,
    // Nightly rate.
    pub price: f64,
    pub image: String,
    pub amenities: Vec<String>,
    pub city: String,
    pub country: String,
}

// Query descriptor for a hotel search. No identity, discarded after each
// search; unset fields are omitted from the request entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub city: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: Option<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl SearchFilters {
    // Query keys the catalog service expects. Only present filters are
    // emitted, dates as ISO yyyy-MM-dd.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(city) = &self.city {
            pairs.push(("city", city.clone()));
        }
        if let Some(check_in) = self.check_in {
            pairs.push(("checkIn", check_in.format("%Y-%m-%d").to_string()));
        }
        if let Some(check_out) = self.check_out {
            pairs.push(("checkOut", check_out.format("%Y-%m-%d").to_string()));
        }
        if let Some(guests) = self.guests {
            pairs.push(("guests", guests.to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.to_query_pairs().is_empty()
    }
}

// Lifecycle stage of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

// A persisted reservation row. Created only through the booking workflow;
// never deleted, only status-transitioned.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub hotel_id: i64,
    // Display fields denormalized at booking time so the list renders
    // without a catalog round-trip.
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
    pub created_at: DateTime<Utc>,
}

impl Booking {
    // Edit and cancel are only offered while the booking is confirmed.
    pub fn is_modifiable(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

// Booking creation payload for the catalog's REST path.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub hotel_id: i64,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
}

// Booking as echoed back by the catalog service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogBooking {
    #[serde(default)]
    pub id: Option<i64>,
    pub hotel_id: i64,
    #[serde(default)]
    pub hotel_name: Option<String>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub total_price: f64,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// Contact profile used to prefill booking forms. The email is fixed by the
// identity provider at registration; only name and phone are editable.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

// The observable identity of an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}
