//! Departure counting over system notices.

use tracing::debug;

use crate::parser::header_segment;
use crate::registry::AuthorRegistry;

/// Marker that identifies a departure notice.
pub const DEPARTURE_MARKER: &str = " left";

/// Name of the participant who left, if `entry` is a departure notice.
pub fn departed_name(entry: &str) -> Option<&str> {
    let segment = header_segment(entry)?;
    let end = segment.find(DEPARTURE_MARKER)?;
    Some(segment[..end].trim())
}

/// Increment the departure count of every registered author named in a
/// departure notice. Returns how many departures were recorded.
///
/// Names that never posted a message are skipped.
pub fn count_departures<'a, I>(system_entries: I, registry: &mut AuthorRegistry) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let mut recorded = 0;
    for entry in system_entries {
        if !entry.contains(DEPARTURE_MARKER) {
            continue;
        }
        let Some(name) = departed_name(entry) else {
            continue;
        };
        match registry.find(name) {
            Ok(id) => {
                registry.get_mut(id).record_departure();
                recorded += 1;
            }
            Err(e) => debug!("Ignoring departure notice: {}", e),
        }
    }
    recorded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AuthorRegistry {
        AuthorRegistry::build([
            "2023-01-05, 10:00 AM - Alice: hi",
            "2023-01-05, 10:01 AM - Bob: hey",
        ])
    }

    #[test]
    fn test_departed_name() {
        assert_eq!(departed_name("2023-01-05, 11:00 AM - Bob left"), Some("Bob"));
        assert_eq!(departed_name("2023-01-05, 11:00 AM - Bob joined"), None);
        assert_eq!(departed_name("no separator left"), None);
        assert_eq!(
            departed_name("2023-01-05, 11:00 AM - Alice changed the subject to \"Bob - left\""),
            None
        );
    }

    #[test]
    fn test_count_departures_increments_author() {
        let mut reg = registry();
        let recorded = count_departures(
            [
                "2023-01-05, 11:00 AM - Bob left",
                "2023-01-06, 11:00 AM - Bob left",
                "2023-01-06, 11:05 AM - Alice added Bob",
            ],
            &mut reg,
        );
        assert_eq!(recorded, 2);
        let bob = reg.find("Bob").unwrap();
        assert_eq!(reg.get(bob).departure_count(), 2);
        let alice = reg.find("Alice").unwrap();
        assert_eq!(reg.get(alice).departure_count(), 0);
    }

    #[test]
    fn test_count_departures_unknown_name_is_ignored() {
        let mut reg = registry();
        let recorded = count_departures(["2023-01-05, 11:00 AM - Lurker left"], &mut reg);
        assert_eq!(recorded, 0);
        assert_eq!(reg.len(), 2);
        assert!(reg.find("Lurker").is_err());
    }
}
