use chrono::Utc;
use rand::Rng;

const PREFIX: &str = "CICADA";
const BASE36_DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
// 7 base-36 digits of entropy, matching the suffix length of the original
// code format.
const SUFFIX_SPACE: u64 = 36u64.pow(7);

fn to_base36(mut value: u64) -> String {
    let mut buf = [0u8; 13];
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = BASE36_DIGITS[(value % 36) as usize];
        value /= 36;
        if value == 0 {
            break;
        }
    }
    String::from_utf8_lossy(&buf[i..]).into_owned()
}

/// `CICADA-<base36 millis>-<base36 random>`. Unique by convention, enforced
/// by the unique index on `ticket_number` at the store layer.
pub fn generate() -> String {
    let timestamp = Utc::now().timestamp_millis().max(0) as u64;
    let suffix: u64 = rand::thread_rng().gen_range(0..SUFFIX_SPACE);
    format!("{}-{}-{}", PREFIX, to_base36(timestamp), to_base36(suffix))
}

/// Shape check (`^CICADA-[A-Z0-9]+-[A-Z0-9]+$`) for manual or scanned input,
/// before any store lookup.
pub fn is_valid(code: &str) -> bool {
    let mut parts = code.split('-');
    if parts.next() != Some(PREFIX) {
        return false;
    }
    let (Some(ts), Some(suffix), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let ok = |s: &str| {
        !s.is_empty() && s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    };
    ok(ts) && ok(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_numbers_are_valid() {
        for _ in 0..100 {
            let number = generate();
            assert!(is_valid(&number), "generated invalid number: {}", number);
            assert!(number.starts_with("CICADA-"));
        }
    }

    #[test]
    fn generated_numbers_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(generate()));
        }
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(!is_valid(""));
        assert!(!is_valid("CICADA"));
        assert!(!is_valid("CICADA-ABC"));
        assert!(!is_valid("CICADA-ABC-"));
        assert!(!is_valid("CICADA--XYZ"));
        assert!(!is_valid("CICADA-abc-xyz"));
        assert!(!is_valid("cicada-ABC-XYZ"));
        assert!(!is_valid("CICADA-ABC-XYZ-EXTRA"));
        assert!(!is_valid("TICKET-ABC-XYZ"));
        assert!(!is_valid("CICADA-AB C-XYZ"));
    }

    #[test]
    fn accepts_well_formed_input() {
        assert!(is_valid("CICADA-MDHX2K1A-4F9ZQ21"));
        assert!(is_valid("CICADA-0-0"));
    }

    #[test]
    fn base36_round_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36), "100");
    }
}
