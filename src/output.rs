use crate::dnssec::{DnskeyRecord, DsRecord};
use std::fmt::Write;

/// DNSKEY record in presentation format
pub fn dnskey_line(owner: &str, key: &DnskeyRecord) -> String {
    format!("{owner} IN DNSKEY {key}")
}

/// DS record in presentation format
pub fn ds_line(owner: &str, ds: &DsRecord) -> String {
    format!("{owner} IN DS {ds}")
}

fn bind_stanza(header: &str, key_prefix: &str, owner: &str, keys: &[DnskeyRecord]) -> String {
    let mut out = String::new();
    out.push_str(header);
    out.push_str(" {\n");
    for key in keys {
        let _ = writeln!(
            out,
            "  \"{owner}\"{key_prefix} {} {} {} \"{}\";",
            key.flags,
            key.protocol,
            key.algorithm.to_u8(),
            key.public_key
        );
    }
    out.push_str("};");
    out
}

/// Render keys as a BIND `trusted-keys` configuration stanza
pub fn bind_trusted_keys(owner: &str, keys: &[DnskeyRecord]) -> String {
    bind_stanza("trusted-keys", "", owner, keys)
}

/// Render keys as a BIND `managed-keys` configuration stanza
pub fn bind_managed_keys(owner: &str, keys: &[DnskeyRecord]) -> String {
    bind_stanza("managed-keys", " initial-key", owner, keys)
}
