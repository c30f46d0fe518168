//! Pseudo-GUID generation for records created without an id.
//!
//! Ids are 36 characters in 8-4-4-4-12 lowercase hex groups. They are unique
//! enough for client-local keys but carry no cryptographic guarantee.

use rand::Rng;

/// Length of a generated id, separators included.
pub const GUID_LEN: usize = 36;

/// Four random hex digits.
///
/// A random value in `[0x10000, 0x1ffff)` always formats to five hex digits
/// with a leading `1`; dropping that digit leaves exactly four. The upper
/// bound is exclusive, so `ffff` is never produced.
fn four_hex_digits<R: Rng + ?Sized>(rng: &mut R) -> String {
    let value: u32 = rng.gen_range(0x10000..0x1ffff);
    let hex = format!("{:x}", value);
    hex[1..].to_string()
}

/// Generate a pseudo-GUID using the given random source.
pub fn guid_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut out = String::with_capacity(GUID_LEN);
    for (i, groups) in [2usize, 1, 1, 1, 3].into_iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        for _ in 0..groups {
            out.push_str(&four_hex_digits(rng));
        }
    }
    out
}

/// Generate a pseudo-GUID from the thread-local RNG.
pub fn guid() -> String {
    guid_with(&mut rand::thread_rng())
}

/// Check that a string has the 8-4-4-4-12 hex group shape produced by [`guid`].
pub fn is_guid(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    s.len() == GUID_LEN
        && groups.iter().map(|g| g.len()).eq([8, 4, 4, 4, 12])
        && groups
            .iter()
            .all(|g| g.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_guid_shape() {
        for _ in 0..100 {
            let id = guid();
            assert_eq!(id.len(), GUID_LEN);
            assert!(is_guid(&id), "bad guid: {}", id);
        }
    }

    #[test]
    fn test_guids_differ() {
        assert_ne!(guid(), guid());
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let a = guid_with(&mut StdRng::seed_from_u64(7));
        let b = guid_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_four_hex_digits_keeps_leading_zeros() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert_eq!(four_hex_digits(&mut rng).len(), 4);
        }
    }

    #[test]
    fn test_four_hex_digits_excludes_ffff() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200_000 {
            assert_ne!(four_hex_digits(&mut rng), "ffff");
        }
    }

    #[test]
    fn test_is_guid_rejects() {
        assert!(!is_guid(""));
        assert!(!is_guid("0000000-0000-0000-0000-0000000000000"));
        assert!(!is_guid("0000000g-0000-0000-0000-000000000000"));
        assert!(!is_guid("00000000-0000-0000-0000-00000000000A"));
        assert!(is_guid("00000000-0000-0000-0000-000000000000"));
    }
}
