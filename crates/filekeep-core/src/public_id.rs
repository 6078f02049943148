//! Public identifier generation.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of generated public identifiers.
pub const PUBLIC_ID_LEN: usize = 12;

/// Generate a new public identifier: `PUBLIC_ID_LEN` alphanumeric
/// characters sampled from the thread-local CSPRNG.
///
/// Generation itself never fails and keeps no state; the upload pipeline
/// still verifies non-existence against the metadata repository before
/// committing an identifier.
pub fn generate_public_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(PUBLIC_ID_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_public_id_length_and_charset() {
        let id = generate_public_id();
        assert_eq!(id.len(), PUBLIC_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_public_ids_are_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_public_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
