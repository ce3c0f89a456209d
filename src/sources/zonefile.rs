use crate::dnssec::DnskeyRecord;
use crate::error::{AnchorError, Result};
use tracing::{debug, warn};

/// Scan zone file text for DNSKEY records owned by `owner`.
///
/// Only single-line records are considered, which is how the root zone
/// publishes its DNSKEY RRset. Comment lines, records of other types,
/// and lines with unparsable RDATA are skipped.
pub fn extract_dnskeys(zone_text: &str, owner: &str) -> Vec<DnskeyRecord> {
    let mut keys = Vec::new();

    for (number, line) in zone_text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        // owner ttl IN DNSKEY flags protocol algorithm key...
        let Some(position) = tokens.iter().position(|t| *t == "DNSKEY") else {
            continue;
        };
        if position == 0 || tokens[position - 1] != "IN" || tokens[0] != owner {
            continue;
        }

        let rdata = tokens[position + 1..].join(" ");
        match DnskeyRecord::from_rdata_text(&rdata) {
            Ok(record) => keys.push(record),
            Err(e) => warn!(line = number + 1, "skipping DNSKEY line: {e}"),
        }
    }

    keys
}

/// Download a zone file and extract the DNSKEY records of `owner`
pub async fn fetch_dnskeys_zonefile(
    client: &reqwest::Client,
    url: &str,
    owner: &str,
) -> Result<Vec<DnskeyRecord>> {
    debug!(url = %url, "fetching zone file");

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(AnchorError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    let text = response.text().await?;
    Ok(extract_dnskeys(&text, owner))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONE: &str = "\
; root zone excerpt
.\t172800\tIN\tSOA\ta.root-servers.net. nstld.verisign-grs.com. 1 1800 900 604800 86400
.\t172800\tIN\tDNSKEY\t256 3 8 AwEAAb8zVdcz
.\t172800\tIN\tDNSKEY\t257 3 8 AwEAAagAIKlV
.\t172800\tIN\tNS\ta.root-servers.net.
com.\t172800\tIN\tDNSKEY\t257 3 8 AwEAAcfOtherZone
.\t172800\tIN\tDNSKEY\tbroken line here
";

    #[test]
    fn test_extract_root_dnskeys() {
        let keys = extract_dnskeys(ZONE, ".");
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].flags, 256);
        assert_eq!(keys[1].flags, 257);
        assert!(keys[1].is_ksk());
    }

    #[test]
    fn test_other_owner_excluded() {
        let keys = extract_dnskeys(ZONE, "com.");
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].public_key, "AwEAAcfOtherZone");
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_dnskeys("", ".").is_empty());
        assert!(extract_dnskeys("; only comments\n", ".").is_empty());
    }
}
