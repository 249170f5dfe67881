// End-to-end booking lifecycle driven through the public API: sign-up,
// stay selection, confirmation, listing, reschedule and cancellation.

use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;

use luxestay::{
    my_bookings, open_cancel, open_edit, BookingFlow, BookingStatus, Hotel, InMemoryBookingTable,
    InMemoryIdentity, InMemoryProfiles, ProfileStore, ProfileUpdate, Session, ViewState,
    WorkflowError,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn seaside_hotel() -> Hotel {
    Hotel {
        id: 7,
        name: "Seaside Retreat".to_string(),
        address: "3 Shore Road".to_string(),
        description: "Rooms above the bay".to_string(),
        rating: 4.6,
        price: 200.0,
        image: "https://img.example.com/seaside.jpg".to_string(),
        amenities: vec!["wifi".to_string(), "breakfast".to_string()],
        city: "Nice".to_string(),
        country: "France".to_string(),
    }
}

fn fresh_client() -> (Session, Arc<InMemoryProfiles>, InMemoryBookingTable) {
    let profiles = Arc::new(InMemoryProfiles::new());
    let session = Session::new(Arc::new(InMemoryIdentity::new()), profiles.clone());
    (session, profiles, InMemoryBookingTable::new())
}

#[tokio::test]
async fn two_night_stay_books_edits_and_cancels() -> Result<()> {
    let (session, profiles, store) = fresh_client();

    let user = session
        .sign_up("jane@example.com", "hunter22", "Jane Doe")
        .await?;
    profiles
        .update(
            &user.id,
            ProfileUpdate {
                full_name: None,
                phone: Some("+33 4 93 00 00 00".to_string()),
            },
        )
        .await?;

    // Two nights at 200/night for two guests.
    let mut flow = BookingFlow::starting_on(seaside_hotel(), date("2024-06-20"));
    flow.set_check_in(Some(date("2024-07-01")));
    flow.set_check_out(Some(date("2024-07-03")));
    flow.set_guests(2);
    assert!(flow.can_review());
    assert_eq!(flow.total_price(), 400.0);

    flow.begin_review(&session, profiles.as_ref()).await?;
    assert_eq!(flow.contact().name, "Jane Doe");
    assert_eq!(flow.contact().phone, "+33 4 93 00 00 00");

    let booking = flow.submit(&session, &store).await?;
    assert_eq!(booking.total_price, 400.0);
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.guests, 2);

    // The new reservation leads the user's list.
    match my_bookings(&session, &store).await? {
        ViewState::Loaded(bookings) => {
            assert_eq!(bookings[0].id, booking.id);
            assert_eq!(bookings[0].hotel_name, "Seaside Retreat");
        }
        other => panic!("expected loaded bookings, got {:?}", other),
    }

    // Reschedule: dates and party size move, the captured price does not.
    let mut draft = open_edit(&session, &booking)?;
    draft.stay.check_in = Some(date("2024-07-05"));
    draft.stay.check_out = Some(date("2024-07-08"));
    draft.set_guests(3);
    let rescheduled = draft.apply(&store).await?;
    assert_eq!(rescheduled.check_in, date("2024-07-05"));
    assert_eq!(rescheduled.check_out, date("2024-07-08"));
    assert_eq!(rescheduled.guests, 3);
    assert_eq!(rescheduled.total_price, 400.0);
    assert_eq!(rescheduled.guest_email, "jane@example.com");

    // Cancel with explicit confirmation; the row survives as cancelled.
    let cancelled = open_cancel(&session, &rescheduled)?.confirm(&store).await?;
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(!cancelled.is_modifiable());

    match my_bookings(&session, &store).await? {
        ViewState::Loaded(bookings) => {
            assert_eq!(bookings.len(), 1);
            assert_eq!(bookings[0].status, BookingStatus::Cancelled);
        }
        other => panic!("expected the cancelled booking, got {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn unauthenticated_booking_attempt_creates_nothing() -> Result<()> {
    let (session, profiles, store) = fresh_client();

    let mut flow = BookingFlow::starting_on(seaside_hotel(), date("2024-06-20"));
    flow.set_check_in(Some(date("2024-07-01")));
    flow.set_check_out(Some(date("2024-07-03")));

    let redirected = flow.begin_review(&session, profiles.as_ref()).await;
    assert!(matches!(redirected, Err(WorkflowError::AuthRequired)));

    let submitted = flow.submit(&session, &store).await;
    assert!(matches!(submitted, Err(WorkflowError::AuthRequired)));
    assert!(store.is_empty());

    Ok(())
}

#[tokio::test]
async fn newest_booking_always_leads_the_list() -> Result<()> {
    let (session, profiles, store) = fresh_client();
    session
        .sign_up("jane@example.com", "hunter22", "Jane Doe")
        .await?;

    let mut ids = Vec::new();
    for offset in 0..3 {
        let mut flow = BookingFlow::starting_on(seaside_hotel(), date("2024-06-20"));
        flow.set_check_in(Some(date(&format!("2024-07-0{}", offset + 1))));
        flow.set_check_out(Some(date(&format!("2024-07-0{}", offset + 2))));
        flow.begin_review(&session, profiles.as_ref()).await?;
        flow.contact_mut().phone = "+33 4 93 00 00 00".to_string();
        ids.push(flow.submit(&session, &store).await?.id);
    }

    match my_bookings(&session, &store).await? {
        ViewState::Loaded(bookings) => {
            let listed: Vec<&str> = bookings.iter().map(|b| b.id.as_str()).collect();
            let expected: Vec<&str> = ids.iter().rev().map(String::as_str).collect();
            assert_eq!(listed, expected);
        }
        other => panic!("expected three bookings, got {:?}", other),
    }

    Ok(())
}
