//! ICS file generation.

use icalendar::{Calendar, Component, Property, ValueType};

use crate::event::BirthdayEvent;

/// Product identifier written into every generated calendar.
pub const PRODID: &str = "-//bdaycal//Birthday Calendar//EN";

/// Generate .ics content for a single birthday event.
///
/// The event is wrapped in its own VCALENDAR. Every line, including the
/// last, ends with CRLF.
pub fn generate_ics(event: &BirthdayEvent) -> String {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid().to_string());
    ics_event.summary(event.summary());

    // DTSTAMP is required by RFC 5545
    let dtstamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    add_date_property(&mut ics_event, "DTSTART", event.start());
    add_date_property(&mut ics_event, "DTEND", event.end());

    cal.push(ics_event.done());
    let cal = cal.done();

    normalize(&cal.to_string())
}

/// Add an all-day date property (`NAME;VALUE=DATE:YYYYMMDD`).
fn add_date_property(ics_event: &mut icalendar::Event, name: &str, date: chrono::NaiveDate) {
    let mut prop = Property::new(name, date.format("%Y%m%d").to_string());
    prop.append_parameter(ValueType::Date);
    ics_event.append_property(prop);
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Terminate every line with CRLF, whatever the input used
fn normalize(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::birthday::Birthday;
    use uuid::Uuid;

    fn make_test_event() -> BirthdayEvent {
        let uid = Uuid::parse_str("2a0d4c8e-1b7f-4d3e-9c55-7f0a8b6e4d21").unwrap();
        let bday = Birthday::parse("1815-12-10").unwrap();
        BirthdayEvent::for_year("Ada Lovelace", uid, &bday, 2026).unwrap()
    }

    #[test]
    fn test_generate_ics_all_day_event_has_value_date() {
        let ics = generate_ics(&make_test_event());

        assert!(
            ics.contains("DTSTART;VALUE=DATE:20261210"),
            "DTSTART should have VALUE=DATE parameter. ICS:\n{}",
            ics
        );
        assert!(
            ics.contains("DTEND;VALUE=DATE:20261211"),
            "DTEND should have VALUE=DATE parameter. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn test_generate_ics_single_event_with_derived_uid() {
        let event = make_test_event();
        let ics = generate_ics(&event);

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        let uid_lines: Vec<_> = ics.lines().filter(|l| l.starts_with("UID:")).collect();
        assert_eq!(uid_lines, vec![format!("UID:{}", event.uid())]);
        assert!(ics.contains("SUMMARY:Ada Lovelace (211 years)"));
        assert!(ics.contains(&format!("PRODID:{}", PRODID)));
        assert!(!ics.contains("CALSCALE"));
    }

    #[test]
    fn test_generate_ics_uses_crlf() {
        let ics = generate_ics(&make_test_event());

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
        assert_eq!(
            ics.matches('\n').count(),
            ics.matches("\r\n").count(),
            "every LF should be preceded by CR. ICS:\n{}",
            ics
        );
    }
}
