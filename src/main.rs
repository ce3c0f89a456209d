use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use rootanchor::dnssec::{find_matching_keys, name_to_wire};
use rootanchor::error::AnchorError;
use rootanchor::fetch::{self, FetchOpts, URL_RESOLVER_API};
use rootanchor::sources::fetch_dnskeys_doh;
use rootanchor::{anchors, csr, output};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rootanchor", version, about = "DNSSEC trust anchor toolkit")]
struct Cli {
    /// Verbose output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and validate the IANA trust anchor publication and write
    /// the matched root KSKs as DNSKEY and DS record files
    Fetch {
        /// Local trust anchor file to use instead of downloading
        /// (skips the signature check)
        #[arg(long)]
        local: Option<PathBuf>,

        /// Directory the artifact files are written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// DoH resolver endpoint for the KSK lookup
        #[arg(long, default_value = URL_RESOLVER_API)]
        resolver: String,
    },

    /// Render the anchors of a local trust anchor file
    Anchors {
        /// Trust anchor file
        #[arg(long, default_value = "root-anchors.xml")]
        anchors: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Ds)]
        format: OutputFormat,

        /// DoH resolver endpoint for DNSKEY formats
        #[arg(long, default_value = URL_RESOLVER_API)]
        resolver: String,
    },

    /// Convert a CSR with an embedded DS hint into a DNSKEY record
    Csr2dnskey {
        /// DER-encoded PKCS#10 request
        #[arg(long)]
        csr: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Anchors as DS records
    Ds,
    /// Matched keys as DNSKEY records
    Dnskey,
    /// BIND trusted-keys stanza
    TrustedKeys,
    /// BIND managed-keys stanza
    ManagedKeys,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Fetch {
            local,
            output_dir,
            resolver,
        } => {
            fetch::run(FetchOpts {
                local,
                output_dir,
                resolver_url: resolver,
            })
            .await
        }
        Command::Anchors {
            anchors,
            format,
            resolver,
        } => render_anchors(&anchors, format, &resolver).await,
        Command::Csr2dnskey { csr, output } => convert_csr(&csr, output.as_deref()),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn render_anchors(
    path: &std::path::Path,
    format: OutputFormat,
    resolver: &str,
) -> Result<(), AnchorError> {
    let xml = std::fs::read_to_string(path)?;
    let file = anchors::parse_root_anchors(&xml)?;

    let valid = file.valid_digests(Utc::now());
    if valid.is_empty() {
        return Err(AnchorError::NoValidAnchors);
    }

    if let OutputFormat::Ds = format {
        for anchor in &valid {
            println!("{}", output::ds_line(&file.zone, &anchor.to_ds()?));
        }
        return Ok(());
    }

    // The DNSKEY formats need the live key set to match against
    let client = fetch::http_client()?;
    let keys = fetch_dnskeys_doh(&client, resolver, &file.zone).await?;
    let ksks: Vec<_> = keys.into_iter().filter(|k| k.is_ksk()).collect();
    let owner_wire = name_to_wire(&file.zone)?;
    let matched: Vec<_> = find_matching_keys(&ksks, &valid, &owner_wire)
        .into_iter()
        .cloned()
        .collect();
    if matched.is_empty() {
        return Err(AnchorError::NoMatchingKeys);
    }

    match format {
        OutputFormat::Ds => {}
        OutputFormat::Dnskey => {
            for key in &matched {
                println!("{}", output::dnskey_line(&file.zone, key));
            }
        }
        OutputFormat::TrustedKeys => {
            println!("{}", output::bind_trusted_keys(&file.zone, &matched));
        }
        OutputFormat::ManagedKeys => {
            println!("{}", output::bind_managed_keys(&file.zone, &matched));
        }
    }
    Ok(())
}

fn convert_csr(
    path: &std::path::Path,
    output_path: Option<&std::path::Path>,
) -> Result<(), AnchorError> {
    let der = std::fs::read(path)?;
    let converted = csr::convert(&der)?;
    let line = output::dnskey_line(&converted.owner, &converted.dnskey);

    match output_path {
        Some(target) => fetch::write_with_backup(target, format!("{line}\n").as_bytes())?,
        None => println!("{line}"),
    }
    Ok(())
}
