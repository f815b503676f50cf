/*!
Identifier generation for new entities.
*/

use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random part appended to the time component
pub const RANDOM_SUFFIX_LEN: usize = 11;

static LAST_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Generate a new entity identifier
///
/// The identifier is the current time in milliseconds since the Unix epoch,
/// rendered in base 36, followed by a random base-36 suffix. The time
/// component never goes backwards within a process, even if the wall clock
/// does, and the suffix separates ids minted within the same millisecond.
///
/// # Example
/// ```rust
/// use myfit_core::generate_id;
///
/// let a = generate_id();
/// let b = generate_id();
/// assert_ne!(a, b);
/// ```
pub fn generate_id() -> String {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
    let previous = LAST_MILLIS.fetch_max(now, Ordering::Relaxed);
    let millis = previous.max(now);

    let mut id = to_base36(millis);
    let mut rng = rand::thread_rng();
    for _ in 0..RANDOM_SUFFIX_LEN {
        id.push(BASE36_DIGITS[rng.gen_range(0..36)] as char);
    }
    id
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Only ASCII digits were pushed
    String::from_utf8(digits).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_704_067_200_000), "lqu5m2o0");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_generated_id_shape() {
        let id = generate_id();
        assert!(id.len() > RANDOM_SUFFIX_LEN);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_time_component_is_monotonic() {
        let first = generate_id();
        let second = generate_id();

        let time_of = |id: &str| id[..id.len() - RANDOM_SUFFIX_LEN].to_string();
        let (a, b) = (time_of(&first), time_of(&second));
        // Same width for the foreseeable future, so lexical order is numeric order
        assert_eq!(a.len(), b.len());
        assert!(a <= b);
    }
}
