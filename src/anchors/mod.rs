pub mod xml;

pub use xml::parse_root_anchors;

use crate::dnssec::TrustAnchorDigest;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// A parsed trust anchor publication: the zone it anchors and its
/// KeyDigest entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchorFile {
    pub zone: String,
    pub digests: Vec<TrustAnchorDigest>,
}

impl TrustAnchorFile {
    /// The digests whose validity window contains `now`, in publication
    /// order. Each anchor's disposition is logged.
    pub fn valid_digests(&self, now: DateTime<Utc>) -> Vec<TrustAnchorDigest> {
        let mut valid = Vec::new();
        for digest in &self.digests {
            if let Some(from) = &digest.valid_from {
                if now < from.with_timezone(&Utc) {
                    warn!(key_tag = digest.key_tag, id = %digest.id, "trust anchor not yet valid");
                    continue;
                }
            }
            if let Some(until) = &digest.valid_until {
                if now > until.with_timezone(&Utc) {
                    warn!(key_tag = digest.key_tag, id = %digest.id, "trust anchor expired");
                    continue;
                }
            }
            info!(key_tag = digest.key_tag, id = %digest.id, "trust anchor valid");
            valid.push(digest.clone());
        }
        valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn file() -> TrustAnchorFile {
        let mut expired =
            TrustAnchorDigest::new("Kjqmt7v", 19036, 8, 2, "AA".repeat(32)).unwrap();
        expired.valid_from =
            Some(DateTime::parse_from_rfc3339("2010-07-15T00:00:00+00:00").unwrap());
        expired.valid_until =
            Some(DateTime::parse_from_rfc3339("2019-01-11T00:00:00+00:00").unwrap());

        let mut current =
            TrustAnchorDigest::new("Klajeyz", 20326, 8, 2, "BB".repeat(32)).unwrap();
        current.valid_from =
            Some(DateTime::parse_from_rfc3339("2017-02-02T00:00:00+00:00").unwrap());

        TrustAnchorFile {
            zone: ".".into(),
            digests: vec![expired, current],
        }
    }

    #[test]
    fn test_valid_digests_filters_by_window() {
        let f = file();
        let t = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap();

        // Both windows open in 2018
        assert_eq!(f.valid_digests(t(2018, 6, 1)).len(), 2);

        // Only the unbounded-until anchor remains in 2020
        let v = f.valid_digests(t(2020, 6, 1));
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].key_tag, 20326);

        // Neither is valid before 2010
        assert!(f.valid_digests(t(2009, 1, 1)).is_empty());
    }
}
