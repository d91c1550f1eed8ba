//! Birthday events derived from contacts.

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use crate::birthday::Birthday;
use crate::error::{BdayError, BdayResult};

/// One all-day occurrence of a contact's birthday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayEvent {
    uid: Uuid,
    summary: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl BirthdayEvent {
    /// Build the occurrence of `birthday` in `year` for the contact `name`
    /// whose UID is `contact_uid`.
    pub fn for_year(
        name: &str,
        contact_uid: Uuid,
        birthday: &Birthday,
        year: i32,
    ) -> BdayResult<Self> {
        let start = birthday
            .occurrence(year)
            .ok_or_else(|| BdayError::InvalidBirthday(format!("{} in {}", birthday.date(), year)))?;
        let end = start
            .checked_add_days(Days::new(1))
            .ok_or_else(|| BdayError::InvalidBirthday(start.to_string()))?;

        Ok(BirthdayEvent {
            uid: derive_uid(contact_uid, year)?,
            summary: summary(name, birthday.age_in(year)),
            start,
            end,
        })
    }

    pub fn uid(&self) -> Uuid {
        self.uid
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end date, always the day after [`start`](Self::start).
    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Events for `years` consecutive years starting at `first_year`.
pub fn birthday_events(
    name: &str,
    contact_uid: Uuid,
    birthday: &Birthday,
    first_year: i32,
    years: u32,
) -> BdayResult<Vec<BirthdayEvent>> {
    (0..years)
        .map(|offset| {
            let year = i32::try_from(offset)
                .ok()
                .and_then(|offset| first_year.checked_add(offset))
                .ok_or_else(|| BdayError::InvalidBirthday(format!("year offset {}", offset)))?;
            BirthdayEvent::for_year(name, contact_uid, birthday, year)
        })
        .collect()
}

/// Offset the numeric value of a contact UID by `year`.
///
/// The same contact and year always produce the same event UID, so a rerun
/// recreates identical resources.
pub fn derive_uid(contact_uid: Uuid, year: i32) -> BdayResult<Uuid> {
    let overflow = || BdayError::UidOverflow {
        uid: contact_uid.to_string(),
        year,
    };
    let offset = u128::try_from(year).map_err(|_| overflow())?;
    contact_uid
        .as_u128()
        .checked_add(offset)
        .map(Uuid::from_u128)
        .ok_or_else(overflow)
}

fn summary(name: &str, age: Option<i64>) -> String {
    match age {
        Some(age) if age != 0 => format!("{} ({} years)", name, age),
        _ => name.to_string(),
    }
}
