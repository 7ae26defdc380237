// iwinfo test application -- CLI tool for exercising the madwifi backend
// against real hardware.
//
// Usage:
//   iwinfo-test-app ath0 info
//   iwinfo-test-app wifi0 freqlist
//   iwinfo-test-app wifi0 scan
//   iwinfo-test-app --raw ath0 assoc
//   iwinfo-test-app --proc-root /tmp/fakeproc wifi0 country
//   RUST_LOG=iwinfo_madwifi=trace iwinfo-test-app -v ath0 encryption
//
// No generic wireless-extensions backend ships with this workspace, so
// queries the madwifi backend delegates (SSID, BSSID, tx power, noise, and
// the tx-power and scan lists) report "unsupported" here.

use std::fmt::Display;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use iwinfo::madwifi::MadwifiBuilder;
use iwinfo::{
    AssocEntry, Backend, Error, InterfaceName, MacAddr, OpMode, ScanEntry, TxPowerEntry,
    WireRecord, encode_list, find_backend,
};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// iwinfo test application -- queries wireless state from the command line.
#[derive(Parser)]
#[command(name = "iwinfo-test-app", version, about)]
struct Cli {
    /// Interface to query (e.g. wifi0, ath0).
    interface: String,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Proc-fs root the backend reads side channels from.
    #[arg(long, default_value = "/proc")]
    proc_root: PathBuf,

    /// Print list results as the packed records handed to consumers.
    #[arg(long)]
    raw: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether the madwifi backend claims the interface.
    Probe,

    /// Print every scalar value the backend reports.
    Info,

    /// Print associated stations.
    Assoc,

    /// Print the security profile.
    Encryption,

    /// Print supported channels.
    Freqlist,

    /// Print selectable transmit power levels.
    Txpwrlist,

    /// Scan for networks.
    Scan,

    /// Print the active regulatory domain.
    Country,

    /// Print every known regulatory domain.
    Countrylist,
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// Stand-in for the generic wireless-extensions backend.
struct NoFallback;

fn unsupported<T>(what: &str) -> iwinfo::Result<T> {
    Err(Error::Unsupported(format!("{what} needs a wireless-extensions backend")))
}

impl Backend for NoFallback {
    fn name(&self) -> &'static str {
        "none"
    }

    fn probe(&self, _ifname: &InterfaceName) -> bool {
        false
    }

    fn get_mode(&self, _ifname: &InterfaceName) -> iwinfo::Result<OpMode> {
        unsupported("mode")
    }

    fn get_ssid(&self, _ifname: &InterfaceName) -> iwinfo::Result<String> {
        unsupported("SSID")
    }

    fn get_bssid(&self, _ifname: &InterfaceName) -> iwinfo::Result<MacAddr> {
        unsupported("BSSID")
    }

    fn get_channel(&self, _ifname: &InterfaceName) -> iwinfo::Result<u8> {
        unsupported("channel")
    }

    fn get_frequency(&self, _ifname: &InterfaceName) -> iwinfo::Result<u16> {
        unsupported("frequency")
    }

    fn get_txpower(&self, _ifname: &InterfaceName) -> iwinfo::Result<i32> {
        unsupported("tx power")
    }

    fn get_bitrate(&self, _ifname: &InterfaceName) -> iwinfo::Result<i32> {
        unsupported("bitrate")
    }

    fn get_signal(&self, _ifname: &InterfaceName) -> iwinfo::Result<i32> {
        unsupported("signal")
    }

    fn get_noise(&self, _ifname: &InterfaceName) -> iwinfo::Result<i32> {
        unsupported("noise")
    }

    fn get_quality(&self, _ifname: &InterfaceName) -> iwinfo::Result<i32> {
        unsupported("quality")
    }

    fn get_quality_max(&self, _ifname: &InterfaceName) -> iwinfo::Result<i32> {
        unsupported("quality maximum")
    }

    fn get_assoclist(&self, _ifname: &InterfaceName) -> iwinfo::Result<Vec<AssocEntry>> {
        unsupported("association list")
    }

    fn get_txpwrlist(&self, _ifname: &InterfaceName) -> iwinfo::Result<Vec<TxPowerEntry>> {
        unsupported("tx power list")
    }

    fn get_scanlist(&self, _ifname: &InterfaceName) -> iwinfo::Result<Vec<ScanEntry>> {
        unsupported("scan")
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render a scalar result, or why it is unavailable.
fn show<T: Display>(value: iwinfo::Result<T>) -> String {
    match value {
        Ok(v) => v.to_string(),
        Err(Error::Unsupported(_)) => "unsupported".into(),
        Err(e) => format!("unknown ({e})"),
    }
}

/// Print packed records as hex, one record per line.
fn print_raw<T: WireRecord>(records: &[T]) {
    let bytes = encode_list(records);
    for chunk in bytes.chunks(T::SIZE) {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
        println!("{}", hex.join(" "));
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_info(backend: &dyn Backend, ifname: &InterfaceName) -> Result<()> {
    println!("{ifname}");
    println!("  Backend:        {}", backend.name());
    println!("  Mode:           {}", show(backend.get_mode(ifname)));
    println!("  ESSID:          {}", show(backend.get_ssid(ifname)));
    println!("  Access point:   {}", show(backend.get_bssid(ifname)));
    println!("  Channel:        {}", show(backend.get_channel(ifname)));
    println!("  Frequency:      {} MHz", show(backend.get_frequency(ifname)));
    println!("  Tx power:       {} dBm", show(backend.get_txpower(ifname)));
    println!("  Bitrate:        {} kbit/s", show(backend.get_bitrate(ifname)));
    println!("  Signal:         {} dBm", show(backend.get_signal(ifname)));
    println!("  Noise:          {} dBm", show(backend.get_noise(ifname)));
    println!(
        "  Quality:        {}/{}",
        show(backend.get_quality(ifname)),
        show(backend.get_quality_max(ifname))
    );
    println!("  Encryption:     {}", show(backend.get_encryption(ifname)));
    println!("  Country:        {}", show(backend.get_country(ifname)));
    println!("  Multi-BSSID:    {}", show(backend.get_mbssid_support(ifname)));
    Ok(())
}

fn cmd_assoc(backend: &dyn Backend, ifname: &InterfaceName, raw: bool) -> Result<()> {
    let list = backend
        .get_assoclist(ifname)
        .with_context(|| format!("reading association list of {ifname}"))?;
    if raw {
        print_raw(&list);
        return Ok(());
    }
    if list.is_empty() {
        println!("No station connected");
    }
    for e in &list {
        println!("{}  {} dBm / {} dBm", e.mac, e.signal, e.noise);
    }
    Ok(())
}

fn cmd_encryption(backend: &dyn Backend, ifname: &InterfaceName, raw: bool) -> Result<()> {
    let profile = backend
        .get_encryption(ifname)
        .with_context(|| format!("reading encryption of {ifname}"))?;
    if raw {
        print_raw(&[profile]);
        return Ok(());
    }
    println!("Encryption:     {profile}");
    println!("  WPA version:  {}", profile.wpa_version);
    println!(
        "  Auth suite:   {}",
        profile
            .auth_suite
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".into())
    );
    println!("  Pairwise:     {}", profile.pairwise_ciphers);
    println!("  Group:        {}", profile.group_ciphers);
    Ok(())
}

fn cmd_freqlist(backend: &dyn Backend, ifname: &InterfaceName, raw: bool) -> Result<()> {
    let list = backend
        .get_freqlist(ifname)
        .with_context(|| format!("reading frequency list of {ifname}"))?;
    if raw {
        print_raw(&list);
        return Ok(());
    }
    for e in &list {
        println!("Channel {:3}  {:.3} GHz", e.channel, e.mhz as f64 / 1000.0);
    }
    Ok(())
}

fn cmd_txpwrlist(backend: &dyn Backend, ifname: &InterfaceName, raw: bool) -> Result<()> {
    let list = backend
        .get_txpwrlist(ifname)
        .with_context(|| format!("reading tx power list of {ifname}"))?;
    if raw {
        print_raw(&list);
        return Ok(());
    }
    for e in &list {
        println!("{:3} dBm ({:4} mW)", e.dbm, e.mw);
    }
    Ok(())
}

fn cmd_scan(backend: &dyn Backend, ifname: &InterfaceName, raw: bool) -> Result<()> {
    let list = backend
        .get_scanlist(ifname)
        .with_context(|| format!("scanning on {ifname}"))?;
    if raw {
        print_raw(&list);
        return Ok(());
    }
    if list.is_empty() {
        println!("No scan results");
    }
    for (i, e) in list.iter().enumerate() {
        println!("Cell {:02} - Address: {}", i + 1, e.mac);
        println!("          ESSID: \"{}\"", e.ssid);
        println!("          Mode: {}  Channel: {}", e.mode, e.channel);
        println!(
            "          Signal: {} dBm  Quality: {}/{}",
            e.signal, e.quality, e.quality_max
        );
        println!("          Encryption: {}", e.crypto);
    }
    Ok(())
}

fn cmd_country(backend: &dyn Backend, ifname: &InterfaceName) -> Result<()> {
    let code = backend
        .get_country(ifname)
        .with_context(|| format!("reading country of {ifname}"))?;
    println!("{code}");
    Ok(())
}

fn cmd_countrylist(backend: &dyn Backend, ifname: &InterfaceName, raw: bool) -> Result<()> {
    let list = backend.get_countrylist(ifname)?;
    if raw {
        print_raw(&list);
        return Ok(());
    }
    for e in &list {
        println!("{}  {}", e.iso, e.regulatory_code);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ifname = InterfaceName::new(cli.interface.as_str())
        .with_context(|| format!("invalid interface name {:?}", cli.interface))?;

    let madwifi = MadwifiBuilder::new()
        .proc_root(&cli.proc_root)
        .fallback(Box::new(NoFallback))
        .build()
        .context("building madwifi backend")?;
    let backends: Vec<Box<dyn Backend>> = vec![Box::new(madwifi)];

    let claimed = find_backend(&backends, &ifname);
    if let Command::Probe = cli.command {
        match claimed {
            Some(b) => println!("{ifname}: {}", b.name()),
            None => println!("{ifname}: no backend"),
        }
        return Ok(());
    }

    let Some(backend) = claimed else {
        bail!(
            "{ifname} is not a madwifi interface (looked in {})",
            cli.proc_root.display()
        );
    };
    debug!(ifname = %ifname, backend = backend.name(), "dispatching");

    match cli.command {
        Command::Info => cmd_info(backend, &ifname),
        Command::Assoc => cmd_assoc(backend, &ifname, cli.raw),
        Command::Encryption => cmd_encryption(backend, &ifname, cli.raw),
        Command::Freqlist => cmd_freqlist(backend, &ifname, cli.raw),
        Command::Txpwrlist => cmd_txpwrlist(backend, &ifname, cli.raw),
        Command::Scan => cmd_scan(backend, &ifname, cli.raw),
        Command::Country => cmd_country(backend, &ifname),
        Command::Countrylist => cmd_countrylist(backend, &ifname, cli.raw),
        Command::Probe => Ok(()),
    }
}
