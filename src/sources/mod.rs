pub mod doh;
pub mod zonefile;

pub use doh::fetch_dnskeys_doh;
pub use zonefile::{extract_dnskeys, fetch_dnskeys_zonefile};
