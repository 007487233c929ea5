//! # Daybell Providers
//! Event sources: Google Calendar for events, Google People for birthdays.

pub mod credentials;
pub mod google_calendar;
pub mod google_contacts;
mod http;

use std::sync::Arc;

use daybell_core::config::DaybellConfig;
use daybell_core::traits::{ContactsProvider, CredentialProvider, EventProvider};

pub use credentials::{GoogleCredentials, TokenSnapshot};
pub use google_calendar::GoogleCalendarProvider;
pub use google_contacts::GoogleContactsProvider;

/// Calendar source from configuration.
pub fn create_event_provider(
    config: &DaybellConfig,
    credentials: Arc<dyn CredentialProvider>,
) -> Arc<dyn EventProvider> {
    Arc::new(GoogleCalendarProvider::new(&config.calendar, credentials))
}

/// Contacts source from configuration, `None` when disabled.
pub fn create_contacts_provider(
    config: &DaybellConfig,
    credentials: Arc<dyn CredentialProvider>,
) -> Option<Arc<dyn ContactsProvider>> {
    if !config.contacts.enabled {
        tracing::info!("Contacts source disabled, birthdays come from the calendar only");
        return None;
    }
    Some(Arc::new(GoogleContactsProvider::new(&config.contacts, credentials)))
}
