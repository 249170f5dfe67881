// Main library file for the hotel discovery and booking client core

// One module per component of the booking lifecycle
pub mod catalog;
pub mod model;
pub mod pricing;
pub mod profile;
pub mod session;
pub mod store;
pub mod workflow;

// Re-export key types for convenience
pub use catalog::{CatalogApi, CatalogConfig, FetchError, HotelCatalog};
pub use model::{
    AuthUser, Booking, BookingRequest, BookingStatus, CatalogBooking, Hotel, Profile,
    SearchFilters,
};
pub use profile::{InMemoryProfiles, ProfileError, ProfileStore, ProfileUpdate};
pub use session::{AuthError, IdentityService, InMemoryIdentity, Session};
pub use store::{BookingChanges, BookingStore, InMemoryBookingTable, NewBooking, StoreError};
pub use workflow::{
    my_bookings, open_cancel, open_edit, BookingFlow, BookingStage, CancelIntent, EditDraft,
    GuestContact, StaySelection, ViewState, WorkflowError,
};
