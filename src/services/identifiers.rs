use chrono::Utc;
use rand::Rng;

/// Generate a Medical Record Number: MRN-YYYYMMDD-NNNN.
///
/// The suffix is random, so uniqueness is enforced by the database
/// constraint plus the retry loop in the patient store, not here.
pub fn generate_mrn() -> String {
    format!("MRN-{}-{:04}", Utc::now().format("%Y%m%d"), random_suffix())
}

/// Generate a prescription number: RX-YYYYMMDD-NNNN
pub fn generate_rx_number() -> String {
    format!("RX-{}-{:04}", Utc::now().format("%Y%m%d"), random_suffix())
}

fn random_suffix() -> u32 {
    rand::rng().random_range(1000..10000)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_identifier_shape(value: &str, prefix: &str) {
        let parts: Vec<&str> = value.split('-').collect();
        assert_eq!(parts.len(), 3, "expected three segments in {value}");
        assert_eq!(parts[0], prefix);
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn mrn_matches_expected_pattern() {
        assert_identifier_shape(&generate_mrn(), "MRN");
    }

    #[test]
    fn rx_number_matches_expected_pattern() {
        assert_identifier_shape(&generate_rx_number(), "RX");
    }
}
