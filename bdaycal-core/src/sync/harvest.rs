//! Contact harvesting: address book → birthday events.

use tracing::{debug, info, warn};

use crate::contact::{Contact, parse_contacts};
use crate::dav::{DavClient, VCF_EXT};
use crate::error::BdayResult;
use crate::event::{BirthdayEvent, birthday_events};
use crate::sync::report::{Reporter, SyncEvent};

/// Settings controlling which events are generated.
#[derive(Debug, Clone, Copy)]
pub struct HarvestOptions {
    /// First target year, normally the current one.
    pub first_year: i32,
    /// Number of consecutive target years.
    pub years: u32,
    /// Report contacts that have no birthday.
    pub show_skipped: bool,
}

/// Download every contact card and build birthday events from them.
///
/// Listing and download failures abort the harvest. Problems with a single
/// card or contact are reported and skipped.
pub async fn harvest(
    client: &DavClient,
    contacts_url: &str,
    options: &HarvestOptions,
    reporter: &mut dyn Reporter,
) -> BdayResult<Vec<BirthdayEvent>> {
    let files = client.list(contacts_url, VCF_EXT).await?;
    info!("Harvesting {} contact files", files.len());

    let mut events = Vec::new();
    for file in &files {
        let content = client.get(contacts_url, file).await?;

        for parsed in parse_contacts(&content) {
            match parsed {
                Ok(contact) => events.extend(contact_events(&contact, options, reporter)),
                Err(e) => {
                    warn!("Skipping malformed card in {}: {}", file, e);
                    reporter.report(SyncEvent::MalformedCard {
                        file: file.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    info!("Generated {} birthday events", events.len());
    Ok(events)
}

fn contact_events(
    contact: &Contact,
    options: &HarvestOptions,
    reporter: &mut dyn Reporter,
) -> Vec<BirthdayEvent> {
    let birthday = match contact.birthday() {
        None => {
            debug!("No birthday for {}", contact.name);
            if options.show_skipped {
                reporter.report(SyncEvent::Skipped {
                    name: contact.name.clone(),
                });
            }
            return Vec::new();
        }
        Some(Err(e)) => {
            warn!("{}: {}", e, contact.name);
            reporter.report(SyncEvent::InvalidBirthday {
                name: contact.name.clone(),
                reason: e.to_string(),
            });
            return Vec::new();
        }
        Some(Ok(birthday)) => birthday,
    };

    reporter.report(SyncEvent::BirthdayFound {
        name: contact.name.clone(),
        date: birthday.date(),
    });

    let generated = contact.uuid().and_then(|uid| {
        birthday_events(
            &contact.name,
            uid,
            &birthday,
            options.first_year,
            options.years,
        )
    });

    generated.unwrap_or_else(|e| {
        warn!("{}: {}", e, contact.name);
        reporter.report(SyncEvent::InvalidContact {
            name: contact.name.clone(),
            reason: e.to_string(),
        });
        Vec::new()
    })
}
