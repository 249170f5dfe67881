// Booking workflow: stay selection through confirmation, plus listing,
// editing and cancelling a user's existing reservations.

use chrono::{NaiveDate, Utc};
use thiserror::Error;

use crate::model::{Booking, BookingStatus, Hotel};
use crate::pricing;
use crate::profile::ProfileStore;
use crate::session::Session;
use crate::store::{BookingChanges, BookingStore, NewBooking, StoreError};

#[derive(Error, Debug)]
pub enum WorkflowError {
    // Precondition redirect, never rendered as an error banner.
    #[error("sign in required")]
    AuthRequired,

    #[error("check-out must be after check-in")]
    InvalidStay,

    #[error("missing required contact field: {0}")]
    MissingContact(&'static str),

    #[error("a submission is already pending")]
    SubmissionPending,

    #[error("booking already submitted")]
    AlreadySubmitted,

    #[error("booking can no longer be modified")]
    NotModifiable,

    #[error("booking not found")]
    NotFound,

    #[error("persistence error: {0}")]
    Persistence(StoreError),
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => WorkflowError::NotFound,
            other => WorkflowError::Persistence(other),
        }
    }
}

// Loading/loaded/empty/error rendering states, expressed once here instead
// of in every view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Loaded(T),
    Empty,
    Error(String),
}

// Check-in/check-out dates and party size for a prospective stay.
#[derive(Debug, Clone, PartialEq)]
pub struct StaySelection {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: u32,
}

impl Default for StaySelection {
    fn default() -> Self {
        Self {
            check_in: None,
            check_out: None,
            guests: 1,
        }
    }
}

impl StaySelection {
    // Both dates present and check-out strictly after check-in.
    pub fn has_valid_range(&self) -> bool {
        matches!((self.check_in, self.check_out), (Some(start), Some(end)) if start < end)
    }

    pub fn nights(&self) -> i64 {
        pricing::nights(self.check_in, self.check_out)
    }
}

// Guest contact details on the review form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl GuestContact {
    // All three fields are required before submission.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.email.trim().is_empty() {
            Some("email")
        } else if self.phone.trim().is_empty() {
            Some("phone")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingStage {
    SelectingStay,
    Reviewing,
    Submitting,
    Confirmed(Booking),
    Failed(String),
}

// One booking attempt for one hotel, from stay selection to a persisted
// reservation. Form state survives a failed submission so the user can
// retry without re-entering anything.
pub struct BookingFlow {
    hotel: Hotel,
    stay: StaySelection,
    contact: GuestContact,
    stage: BookingStage,
    today: NaiveDate,
}

impl BookingFlow {
    pub fn new(hotel: Hotel) -> Self {
        Self::starting_on(hotel, Utc::now().date_naive())
    }

    // `today` anchors the no-past-check-in rule.
    pub fn starting_on(hotel: Hotel, today: NaiveDate) -> Self {
        Self {
            hotel,
            stay: StaySelection::default(),
            contact: GuestContact::default(),
            stage: BookingStage::SelectingStay,
            today,
        }
    }

    pub fn hotel(&self) -> &Hotel {
        &self.hotel
    }

    pub fn stay(&self) -> &StaySelection {
        &self.stay
    }

    pub fn contact(&self) -> &GuestContact {
        &self.contact
    }

    // Editable on the review form.
    pub fn contact_mut(&mut self) -> &mut GuestContact {
        &mut self.contact
    }

    pub fn stage(&self) -> &BookingStage {
        &self.stage
    }

    pub fn confirmed_booking(&self) -> Option<&Booking> {
        match &self.stage {
            BookingStage::Confirmed(booking) => Some(booking),
            _ => None,
        }
    }

    // Dismissible notice from a failed submission.
    pub fn error_notice(&self) -> Option<&str> {
        match &self.stage {
            BookingStage::Failed(message) => Some(message),
            _ => None,
        }
    }

    // Dates and guests are only adjustable before review.
    pub fn set_check_in(&mut self, date: Option<NaiveDate>) {
        if self.stage == BookingStage::SelectingStay {
            self.stay.check_in = date;
        }
    }

    pub fn set_check_out(&mut self, date: Option<NaiveDate>) {
        if self.stage == BookingStage::SelectingStay {
            self.stay.check_out = date;
        }
    }

    pub fn set_guests(&mut self, guests: u32) {
        if self.stage == BookingStage::SelectingStay {
            self.stay.guests = guests.max(1);
        }
    }

    // Same computation at selection time and on every redisplay; 0 while
    // the range is not bookable.
    pub fn total_price(&self) -> f64 {
        pricing::stay_total(self.hotel.price, self.stay.check_in, self.stay.check_out)
    }

    // Gate for the confirm action. False keeps the action disabled, it is
    // not an error.
    pub fn can_review(&self) -> bool {
        self.stage == BookingStage::SelectingStay
            && self.stay.has_valid_range()
            && self.stay.check_in.map_or(false, |start| start >= self.today)
    }

    // Move to the review step. Requires an authenticated session; contact
    // fields are prefilled from the user's profile when one exists, with
    // the session email as fallback.
    pub async fn begin_review(
        &mut self,
        session: &Session,
        profiles: &dyn ProfileStore,
    ) -> Result<(), WorkflowError> {
        if !self.can_review() {
            return Err(WorkflowError::InvalidStay);
        }
        let user = session.current_user().ok_or(WorkflowError::AuthRequired)?;

        match profiles.get(&user.id).await {
            Ok(Some(profile)) => {
                self.contact.name = profile.full_name;
                self.contact.email = if profile.email.is_empty() {
                    user.email
                } else {
                    profile.email
                };
                self.contact.phone = profile.phone;
            }
            Ok(None) => {
                self.contact.email = user.email;
            }
            Err(err) => {
                // Prefill is best effort; the form stays editable.
                tracing::debug!(error = %err, "profile prefill skipped");
                self.contact.email = user.email;
            }
        }

        self.stage = BookingStage::Reviewing;
        Ok(())
    }

    // Persist the reservation. On success the flow carries the stored
    // booking; on failure the form state is retained and the error is
    // surfaced as a dismissible notice.
    pub async fn submit(
        &mut self,
        session: &Session,
        store: &dyn BookingStore,
    ) -> Result<Booking, WorkflowError> {
        match self.stage {
            BookingStage::Submitting => return Err(WorkflowError::SubmissionPending),
            BookingStage::Confirmed(_) => return Err(WorkflowError::AlreadySubmitted),
            _ => {}
        }

        let user = session.current_user().ok_or(WorkflowError::AuthRequired)?;
        let (check_in, check_out) = match (self.stay.check_in, self.stay.check_out) {
            (Some(start), Some(end)) if start < end => (start, end),
            _ => return Err(WorkflowError::InvalidStay),
        };
        if let Some(field) = self.contact.first_missing_field() {
            return Err(WorkflowError::MissingContact(field));
        }

        let row = NewBooking {
            user_id: user.id,
            hotel_id: self.hotel.id,
            hotel_name: self.hotel.name.clone(),
            hotel_image: self.hotel.image.clone(),
            hotel_city: self.hotel.city.clone(),
            hotel_country: self.hotel.country.clone(),
            guest_name: self.contact.name.clone(),
            guest_email: self.contact.email.clone(),
            guest_phone: self.contact.phone.clone(),
            check_in,
            check_out,
            guests: self.stay.guests,
            total_price: self.total_price(),
            status: BookingStatus::Confirmed,
        };

        self.stage = BookingStage::Submitting;
        match store.insert(row).await {
            Ok(booking) => {
                tracing::info!(booking_id = %booking.id, hotel_id = booking.hotel_id, "booking confirmed");
                self.stage = BookingStage::Confirmed(booking.clone());
                Ok(booking)
            }
            Err(err) => {
                let err = WorkflowError::from(err);
                tracing::warn!(error = %err, "booking submission failed");
                self.stage = BookingStage::Failed(err.to_string());
                Err(err)
            }
        }
    }

    // Dismiss the failure notice and return to the review form.
    pub fn dismiss_notice(&mut self) {
        if matches!(self.stage, BookingStage::Failed(_)) {
            self.stage = BookingStage::Reviewing;
        }
    }
}

// All bookings of the signed-in user, newest first. Fetch errors resolve
// to a renderable error state rather than tearing down the view.
pub async fn my_bookings(
    session: &Session,
    store: &dyn BookingStore,
) -> Result<ViewState<Vec<Booking>>, WorkflowError> {
    let user = session.current_user().ok_or(WorkflowError::AuthRequired)?;

    match store.for_user(&user.id).await {
        Ok(bookings) if bookings.is_empty() => Ok(ViewState::Empty),
        Ok(bookings) => Ok(ViewState::Loaded(bookings)),
        Err(err) => Ok(ViewState::Error(err.to_string())),
    }
}

// First step of the two-step cancellation: capture the intent, to be
// confirmed explicitly by the user.
pub fn open_cancel(session: &Session, booking: &Booking) -> Result<CancelIntent, WorkflowError> {
    let user = session.current_user().ok_or(WorkflowError::AuthRequired)?;
    if booking.user_id != user.id {
        // Someone else's booking is indistinguishable from a missing one.
        return Err(WorkflowError::NotFound);
    }
    if booking.status == BookingStatus::Completed {
        return Err(WorkflowError::NotModifiable);
    }

    Ok(CancelIntent {
        booking_id: booking.id.clone(),
    })
}

pub struct CancelIntent {
    booking_id: String,
}

impl CancelIntent {
    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    // Second step: transition the booking to cancelled. Confirming an
    // already-cancelled booking is an error-free no-op.
    pub async fn confirm(self, store: &dyn BookingStore) -> Result<Booking, WorkflowError> {
        let current = store
            .by_id(&self.booking_id)
            .await?
            .ok_or(WorkflowError::NotFound)?;

        match current.status {
            BookingStatus::Cancelled => Ok(current),
            BookingStatus::Completed => Err(WorkflowError::NotModifiable),
            BookingStatus::Confirmed => {
                let updated = store
                    .update(
                        &self.booking_id,
                        BookingChanges {
                            status: Some(BookingStatus::Cancelled),
                            ..Default::default()
                        },
                    )
                    .await?;
                tracing::info!(booking_id = %updated.id, "booking cancelled");
                Ok(updated)
            }
        }
    }
}

// Date/guest edit of a confirmed booking, pre-populated from the stored
// values. Applying re-validates the range and updates check-in, check-out
// and guest count only; the captured price and contact fields are left
// untouched.
pub fn open_edit(session: &Session, booking: &Booking) -> Result<EditDraft, WorkflowError> {
    let user = session.current_user().ok_or(WorkflowError::AuthRequired)?;
    if booking.user_id != user.id {
        return Err(WorkflowError::NotFound);
    }
    if !booking.is_modifiable() {
        return Err(WorkflowError::NotModifiable);
    }

    Ok(EditDraft {
        booking_id: booking.id.clone(),
        stay: StaySelection {
            check_in: Some(booking.check_in),
            check_out: Some(booking.check_out),
            guests: booking.guests,
        },
    })
}

pub struct EditDraft {
    booking_id: String,
    pub stay: StaySelection,
}

impl EditDraft {
    pub fn booking_id(&self) -> &str {
        &self.booking_id
    }

    pub fn set_guests(&mut self, guests: u32) {
        self.stay.guests = guests.max(1);
    }

    pub fn is_valid(&self) -> bool {
        self.stay.has_valid_range()
    }

    pub async fn apply(self, store: &dyn BookingStore) -> Result<Booking, WorkflowError> {
        if !self.is_valid() {
            return Err(WorkflowError::InvalidStay);
        }

        // The booking may have been cancelled since the draft was opened.
        let current = store
            .by_id(&self.booking_id)
            .await?
            .ok_or(WorkflowError::NotFound)?;
        if !current.is_modifiable() {
            return Err(WorkflowError::NotModifiable);
        }

        let updated = store
            .update(
                &self.booking_id,
                BookingChanges {
                    check_in: self.stay.check_in,
                    check_out: self.stay.check_out,
                    guests: Some(self.stay.guests),
                    status: None,
                },
            )
            .await?;
        tracing::info!(booking_id = %updated.id, "booking rescheduled");
        Ok(updated)
    }
}
