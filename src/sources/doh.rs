use crate::dnssec::DnskeyRecord;
use crate::error::{AnchorError, Result};
use serde::Deserialize;
use tracing::{debug, warn};

/// DNSKEY resource record type number
const RR_TYPE_DNSKEY: u16 = 48;

/// JSON body of a DNS-over-HTTPS resolver response (RFC 8427 style,
/// as served by dns.google)
#[derive(Debug, Deserialize)]
pub struct DohResponse {
    #[serde(rename = "Status")]
    pub status: u32,
    #[serde(rename = "Answer", default)]
    pub answer: Vec<DohAnswer>,
}

#[derive(Debug, Deserialize)]
pub struct DohAnswer {
    pub name: String,
    #[serde(rename = "type")]
    pub rr_type: u16,
    #[serde(rename = "TTL", default)]
    pub ttl: u32,
    pub data: String,
}

impl DohResponse {
    /// Extract the DNSKEY records from the answer section. Entries with
    /// unparsable RDATA are skipped with a warning.
    pub fn dnskeys(&self) -> Vec<DnskeyRecord> {
        let mut keys = Vec::new();
        for answer in &self.answer {
            if answer.rr_type != RR_TYPE_DNSKEY {
                continue;
            }
            match DnskeyRecord::from_rdata_text(&answer.data) {
                Ok(record) => keys.push(record),
                Err(e) => warn!(name = %answer.name, "skipping DNSKEY answer: {e}"),
            }
        }
        keys
    }
}

/// Query a DoH JSON resolver for the DNSKEY RRset of a zone
pub async fn fetch_dnskeys_doh(
    client: &reqwest::Client,
    resolver_url: &str,
    zone: &str,
) -> Result<Vec<DnskeyRecord>> {
    let url = format!("{resolver_url}?name={zone}&type=DNSKEY");
    debug!(url = %url, "querying DoH resolver");

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(AnchorError::HttpStatus {
            url,
            status: response.status().as_u16(),
        });
    }

    let body: DohResponse = response.json().await?;
    if body.status != 0 {
        return Err(AnchorError::Resolver(format!(
            "DoH resolver returned DNS rcode {}",
            body.status
        )));
    }

    Ok(body.dnskeys())
}
