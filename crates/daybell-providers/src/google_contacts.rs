//! Google People provider: contacts that have a birthday on record.

use std::sync::Arc;

use async_trait::async_trait;
use daybell_core::config::ContactsConfig;
use daybell_core::error::{DaybellError, Result};
use daybell_core::traits::{ContactsProvider, CredentialProvider};
use daybell_core::types::{BirthDate, ContactBirthday};
use serde::Deserialize;

use crate::http::send_json;

const SOURCE: &str = "google-contacts";
const MAX_PAGES: usize = 50;

pub struct GoogleContactsProvider {
    api_base: String,
    page_size: u32,
    client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionsPage {
    #[serde(default)]
    connections: Vec<Person>,
    next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Person {
    names: Vec<PersonName>,
    birthdays: Vec<PersonBirthday>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonName {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PersonBirthday {
    date: Option<PartialDate>,
}

/// `google.type.Date`; any part may be 0 or missing.
#[derive(Debug, Deserialize)]
struct PartialDate {
    month: Option<u32>,
    day: Option<u32>,
}

impl GoogleContactsProvider {
    pub fn new(config: &ContactsConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            page_size: config.page_size.clamp(1, 1000),
            client: reqwest::Client::new(),
            credentials,
        }
    }

    async fn token(&self) -> Result<String> {
        self.credentials
            .access_token()
            .await
            .map_err(|e| DaybellError::from_source(SOURCE, e))
    }

    /// Display name of the authenticated account.
    pub async fn profile_name(&self) -> Result<Option<String>> {
        let token = self.token().await?;
        let person: Person = send_json(
            SOURCE,
            self.client
                .get(format!("{}/people/me", self.api_base))
                .bearer_auth(token)
                .query(&[("personFields", "names")]),
        )
        .await?;
        Ok(first_name(&person))
    }
}

#[async_trait]
impl ContactsProvider for GoogleContactsProvider {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn fetch_birthday_contacts(&self) -> Result<Vec<ContactBirthday>> {
        let token = self.token().await?;
        let page_size = self.page_size.to_string();

        let mut contacts = Vec::new();
        let mut seen = 0usize;
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut request = self
                .client
                .get(format!("{}/people/me/connections", self.api_base))
                .bearer_auth(&token)
                .query(&[
                    ("personFields", "names,birthdays"),
                    ("pageSize", page_size.as_str()),
                ]);
            if let Some(ref pt) = page_token {
                request = request.query(&[("pageToken", pt.as_str())]);
            }

            let page: ConnectionsPage = send_json(SOURCE, request).await?;
            seen += page.connections.len();
            contacts.extend(page.connections.into_iter().filter_map(into_contact_birthday));

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        if page_token.is_some() {
            tracing::warn!("{SOURCE}: stopped after {MAX_PAGES} pages");
        }

        tracing::debug!("{SOURCE}: {} of {seen} contacts have a birthday", contacts.len());
        Ok(contacts)
    }
}

fn first_name(person: &Person) -> Option<String> {
    person
        .names
        .iter()
        .find_map(|n| n.display_name.clone())
        .filter(|n| !n.trim().is_empty())
}

/// Contacts without a usable month/day are dropped.
fn into_contact_birthday(person: Person) -> Option<ContactBirthday> {
    let birth_dates: Vec<BirthDate> = person
        .birthdays
        .iter()
        .filter_map(|b| b.date.as_ref())
        .filter_map(|d| match (d.month, d.day) {
            (Some(month @ 1..=12), Some(day @ 1..=31)) => Some(BirthDate::new(month, day)),
            _ => None,
        })
        .collect();

    if birth_dates.is_empty() {
        return None;
    }

    Some(ContactBirthday {
        display_name: first_name(&person),
        birth_dates,
    })
}
