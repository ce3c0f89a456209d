use crate::anchors::parse_root_anchors;
use crate::dnssec::constants::ROOT_OWNER_WIRE;
use crate::dnssec::{DigestType, DnskeyRecord, find_matching_keys};
use crate::error::{AnchorError, Result};
use crate::output;
use crate::sources::{fetch_dnskeys_doh, fetch_dnskeys_zonefile};
use chrono::{Local, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

pub const URL_ROOT_ANCHORS: &str = "https://data.iana.org/root-anchors/root-anchors.xml";
pub const URL_ROOT_ANCHORS_SIGNATURE: &str = "https://data.iana.org/root-anchors/root-anchors.p7s";
pub const URL_ROOT_ZONE: &str = "https://www.internic.net/domain/root.zone";
pub const URL_RESOLVER_API: &str = "https://dns.google/resolve";

pub const TRUST_ANCHOR_FILENAME: &str = "root-anchors.xml";
pub const SIGNATURE_FILENAME: &str = "root-anchors.p7s";
pub const ICANN_CA_FILENAME: &str = "icanncacert.pem";
pub const DNSKEY_RECORD_FILENAME: &str = "ksk-as-dnskey.txt";
pub const DS_RECORD_FILENAME: &str = "ksk-as-ds.txt";

/// The ICANN Root CA that signs the trust anchor publication. Built in
/// so the chain of trust does not depend on the transport: even without
/// HTTPS authentication the anchors are cryptographically validated.
pub const ICANN_ROOT_CA_CERT: &str = "\
-----BEGIN CERTIFICATE-----
MIIDdzCCAl+gAwIBAgIBATANBgkqhkiG9w0BAQsFADBdMQ4wDAYDVQQKEwVJQ0FO
TjEmMCQGA1UECxMdSUNBTk4gQ2VydGlmaWNhdGlvbiBBdXRob3JpdHkxFjAUBgNV
BAMTDUlDQU5OIFJvb3QgQ0ExCzAJBgNVBAYTAlVTMB4XDTA5MTIyMzA0MTkxMloX
DTI5MTIxODA0MTkxMlowXTEOMAwGA1UEChMFSUNBTk4xJjAkBgNVBAsTHUlDQU5O
IENlcnRpZmljYXRpb24gQXV0aG9yaXR5MRYwFAYDVQQDEw1JQ0FOTiBSb290IENB
MQswCQYDVQQGEwJVUzCCASIwDQYJKoZIhvcNAQEBBQADggEPADCCAQoCggEBAKDb
cLhPNNqc1NB+u+oVvOnJESofYS9qub0/PXagmgr37pNublVThIzyLPGCJ8gPms9S
G1TaKNIsMI7d+5IgMy3WyPEOECGIcfqEIktdR1YWfJufXcMReZwU4v/AdKzdOdfg
ONiwc6r70duEr1IiqPbVm5T05l1e6D+HkAvHGnf1LtOPGs4CHQdpIUcy2kauAEy2
paKcOcHASvbTHK7TbbvHGPB+7faAztABLoneErruEcumetcNfPMIjXKdv1V1E3C7
MSJKy+jAqqQJqjZoQGB0necZgUMiUv7JK1IPQRM2CXJllcyJrm9WFxY0c1KjBO29
iIKK69fcglKcBuFShUECAwEAAaNCMEAwDwYDVR0TAQH/BAUwAwEB/zAOBgNVHQ8B
Af8EBAMCAf4wHQYDVR0OBBYEFLpS6UmDJIZSL8eZzfyNa2kITcBQMA0GCSqGSIb3
DQEBCwUAA4IBAQAP8emCogqHny2UYFqywEuhLys7R9UKmYY4suzGO4nkbgfPFMfH
6M+Zj6owwxlwueZt1j/IaCayoKU3QsrYYoDRolpILh+FPwx7wseUEV8ZKpWsoDoD
2JFbLg2cfB8u/OlE4RYmcxxFSmXBg0yQ8/IoQt/bxOcEEhhiQ168H2yE5rxJMt9h
15nu5JBSewrCkYqYYmaxyOC3WrVGfHZxVI7MpIFcGdvSb2a1uyuua8l0BKgk3ujF
0/wsHNeP22qNyVO+XVBzrM8fk8BSUFuiT/6tZTYXRtEt5aKQZgXbKU5dUF3jT9qg
j/Br5BZw3X/zd325TvnswzMC1+ljLzHnQGGk
-----END CERTIFICATE-----
";

/// Options for the fetch pipeline
#[derive(Debug, Clone)]
pub struct FetchOpts {
    /// Use this local trust anchor file instead of downloading it
    /// (skips the signature check)
    pub local: Option<PathBuf>,
    /// Directory the artifact files are written to
    pub output_dir: PathBuf,
    /// DoH resolver endpoint for the KSK lookup
    pub resolver_url: String,
}

impl Default for FetchOpts {
    fn default() -> Self {
        Self {
            local: None,
            output_dir: PathBuf::from("."),
            resolver_url: URL_RESOLVER_API.to_string(),
        }
    }
}

/// Build the HTTP client used for all fetches
pub fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .user_agent(concat!("rootanchor/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// GET a URL and return the body, failing on non-2xx status
pub async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(AnchorError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

/// Write a file, renaming any existing one to a dated backup first
pub fn write_with_backup(path: &Path, contents: &[u8]) -> Result<()> {
    if path.exists() {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed");
        let stamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
        let backup = path.with_file_name(format!("backed-up-at-{stamp}-{name}"));
        std::fs::rename(path, &backup)?;
        info!("backed up {} to {}", path.display(), backup.display());
    }
    std::fs::write(path, contents)?;
    info!("saved file {}, length {}", path.display(), contents.len());
    Ok(())
}

/// Verify the detached CMS signature over the trust anchor file by
/// invoking the openssl command line tool
pub async fn verify_detached_signature(content: &Path, signature: &Path, ca: &Path) -> Result<()> {
    let output = Command::new("openssl")
        .arg("smime")
        .arg("-verify")
        .arg("-CAfile")
        .arg(ca)
        .arg("-inform")
        .arg("der")
        .arg("-in")
        .arg(signature)
        .arg("-content")
        .arg(content)
        .output()
        .await
        .map_err(|e| AnchorError::SignatureVerification(format!("could not run openssl: {e}")))?;

    if !output.status.success() {
        return Err(AnchorError::SignatureVerification(format!(
            "openssl exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    info!(
        "validated the signature in {} over {}",
        signature.display(),
        content.display()
    );
    Ok(())
}

/// The full trust anchor fetch pipeline: download (or read) the
/// publication, verify its signature, validity-filter the anchors,
/// fetch the published KSKs, match, and write the DNSKEY/DS artifacts.
pub async fn run(opts: FetchOpts) -> Result<()> {
    let client = http_client()?;
    let out = |name: &str| opts.output_dir.join(name);

    // Step 1: obtain the trust anchor XML
    let anchor_xml = match &opts.local {
        Some(path) => {
            info!("reading local trust anchor file {}", path.display());
            std::fs::read(path)?
        }
        None => fetch_bytes(&client, URL_ROOT_ANCHORS).await?,
    };
    write_with_backup(&out(TRUST_ANCHOR_FILENAME), &anchor_xml)?;

    // Steps 2 and 3: signature fetch and verification, skipped for a
    // local file
    if opts.local.is_none() {
        let signature = fetch_bytes(&client, URL_ROOT_ANCHORS_SIGNATURE).await?;
        write_with_backup(&out(SIGNATURE_FILENAME), &signature)?;
        write_with_backup(&out(ICANN_CA_FILENAME), ICANN_ROOT_CA_CERT.as_bytes())?;
        verify_detached_signature(
            &out(TRUST_ANCHOR_FILENAME),
            &out(SIGNATURE_FILENAME),
            &out(ICANN_CA_FILENAME),
        )
        .await?;
    } else {
        info!("not validating the local trust anchor file");
    }

    // Step 4: extract the key digests
    let xml_text = String::from_utf8(anchor_xml)
        .map_err(|_| AnchorError::InvalidUtf8(TRUST_ANCHOR_FILENAME.to_string()))?;
    let anchor_file = parse_root_anchors(&xml_text)?;

    // Step 5: validity windows
    let valid = anchor_file.valid_digests(Utc::now());
    if valid.is_empty() {
        return Err(AnchorError::NoValidAnchors);
    }
    info!("{} trust anchors after the validity check", valid.len());

    // Step 6: fetch the published KSKs and match them
    let ksks = fetch_ksks(&client, &opts.resolver_url).await?;
    for key in &ksks {
        info!("found KSK {key}");
    }
    let matched = find_matching_keys(&ksks, &valid, ROOT_OWNER_WIRE);
    if matched.is_empty() {
        return Err(AnchorError::NoMatchingKeys);
    }
    info!("{} matched KSKs", matched.len());

    // Step 7: write the matched keys as DNSKEY and DS records
    let mut dnskey_lines = String::new();
    let mut ds_lines = String::new();
    for key in &matched {
        dnskey_lines.push_str(&output::dnskey_line(".", key));
        dnskey_lines.push('\n');
        // DS export always uses SHA-256
        let ds = key.ds(ROOT_OWNER_WIRE, DigestType::Sha256)?;
        info!("the key tag for this KSK is {}", ds.key_tag);
        ds_lines.push_str(&output::ds_line(".", &ds));
        ds_lines.push('\n');
    }
    write_with_backup(&out(DNSKEY_RECORD_FILENAME), dnskey_lines.as_bytes())?;
    write_with_backup(&out(DS_RECORD_FILENAME), ds_lines.as_bytes())?;

    Ok(())
}

/// Fetch root KSKs over DoH, falling back to the root zone file
async fn fetch_ksks(client: &reqwest::Client, resolver_url: &str) -> Result<Vec<DnskeyRecord>> {
    info!("fetching DNSKEY records via DoH");
    let keys = match fetch_dnskeys_doh(client, resolver_url, ".").await {
        Ok(keys) => keys,
        Err(e) => {
            warn!("DoH fetch failed ({e}), falling back to the root zone file");
            fetch_dnskeys_zonefile(client, URL_ROOT_ZONE, ".")
                .await
                .map_err(|e| {
                    warn!("root zone fetch failed: {e}");
                    AnchorError::NoKeySource
                })?
        }
    };

    let ksks: Vec<DnskeyRecord> = keys.into_iter().filter(|k| k.is_ksk()).collect();
    if ksks.is_empty() {
        return Err(AnchorError::NoKeySource);
    }
    Ok(ksks)
}
