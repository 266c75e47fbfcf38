//! Command line definition

use std::path::PathBuf;
use std::time::Duration;

use acmedns_core::types::{
    ClientConfig, MonitorOptions, NameServer, DEFAULT_DNS_SERVER, DEFAULT_STORAGE_PATH,
    PUBLIC_ACME_DNS,
};
use acmedns_core::utils::parse_domain_list;
use clap::{Args, Parser, Subcommand};

const AFTER_HELP: &str = "\
EXAMPLE USAGE:
  Register a new acme-dns account for domain example.org:
    acme-dns-client register -d example.org

  Register a new acme-dns account for domain example.org, allow updates only from 198.51.100.0/24:
    acme-dns-client register -d example.org --allow 198.51.100.0/24

  Check the configuration of example.org and the corresponding acme-dns account:
    acme-dns-client check -d example.org

  Check the configuration of all the domains and acme-dns accounts registered on this machine:
    acme-dns-client check

Without a command, acme-dns-client acts as a Certbot --manual-auth-hook and
publishes the validation token for CERTBOT_DOMAIN.";

const CHECK_AFTER_HELP: &str = "\
EXAMPLE USAGE:
  Check the configuration for all domains configured in the system:
    acme-dns-client check

  Check the configuration for two domains; example.org and test.example.org:
    acme-dns-client check -d 'example.org,test.example.org'";

const REGISTER_AFTER_HELP: &str = "\
EXAMPLE USAGE:
  Register a new acme-dns account for domain example.org, using acme-dns instance at acmedns.example.org:
    acme-dns-client register -d example.org -s https://auth.acmedns.example.org

  Register a new acme-dns account for domain example.org, allow updates only from 198.51.100.0/24:
    acme-dns-client register -d example.org --allow 198.51.100.0/24";

/// acme-dns-client: set up and use acme-dns delegation for ACME DNS-01 validation
#[derive(Parser, Debug)]
#[command(name = "acme-dns-client", version, about, after_help = AFTER_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Acme-dns server instance to use
    #[arg(short = 's', long = "server", global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Location of the acme-dns account storage
    #[arg(long, global = true, default_value = DEFAULT_STORAGE_PATH, value_name = "PATH")]
    pub storage: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the configuration and settings of existing acme-dns accounts
    #[command(after_help = CHECK_AFTER_HELP)]
    Check(CheckArgs),
    /// Register a new acme-dns account for a domain
    #[command(after_help = REGISTER_AFTER_HELP)]
    Register(RegisterArgs),
    /// List all the existing acme-dns accounts and perform simple CNAME checks for them
    List(CommonArgs),
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Verbose output
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Very verbose (DEBUG) output
    #[arg(long = "vv")]
    pub debug: bool,

    /// Fallback DNS server and port to use for lookups
    #[arg(long = "ns", default_value = DEFAULT_DNS_SERVER, value_parser = parse_nameserver)]
    pub dns_server: NameServer,

    /// DNS query timeout in seconds
    #[arg(long, default_value_t = 5, value_name = "SECONDS")]
    pub timeout: u64,
}

impl Default for CommonArgs {
    fn default() -> Self {
        Self {
            verbose: false,
            debug: false,
            dns_server: ClientConfig::default().dns_server,
            timeout: 5,
        }
    }
}

/// Options of commands that may wait for DNS changes.
#[derive(Args, Debug, Clone, Default)]
pub struct MonitorArgs {
    /// Stop waiting for DNS changes after this many seconds (default: wait until interrupted)
    #[arg(long, value_name = "SECONDS")]
    pub deadline: Option<u64>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Comma separated list of domains to check (default: all registered domains)
    #[arg(short = 'd', value_name = "DOMAINS")]
    pub domains: Option<String>,

    /// Fail when a DNS lookup errors for a reason other than a missing record
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub monitor: MonitorArgs,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Target domain name
    #[arg(short = 'd', value_name = "DOMAIN")]
    pub domain: String,

    /// Comma separated allowlist of CIDR masks that are allowed use this acme-dns account. (Default: allow from all)
    #[arg(long = "allow", value_name = "CIDRS")]
    pub allow: Option<String>,

    /// Acknowledgement that this is a dangerous action
    #[arg(long, hide = true)]
    pub dangerous: bool,

    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    pub monitor: MonitorArgs,
}

fn parse_nameserver(value: &str) -> Result<NameServer, String> {
    value.parse().map_err(|e| format!("{e}"))
}

/// Prefix a scheme-less server address with `https://`.
pub fn normalize_server_url(server: &str) -> String {
    let server = server.trim();
    if server.contains("://") {
        server.to_string()
    } else {
        format!("https://{server}")
    }
}

impl Cli {
    /// Assemble the runtime configuration for the selected command.
    pub fn client_config(&self) -> ClientConfig {
        let (common, monitor) = match &self.command {
            Some(Command::Check(args)) => (args.common.clone(), args.monitor.clone()),
            Some(Command::Register(args)) => (args.common.clone(), args.monitor.clone()),
            Some(Command::List(common)) => (common.clone(), MonitorArgs::default()),
            None => (CommonArgs::default(), MonitorArgs::default()),
        };

        let mut config = ClientConfig {
            dns_server: common.dns_server,
            server: self
                .server
                .as_deref()
                .map_or_else(|| PUBLIC_ACME_DNS.to_string(), normalize_server_url),
            storage_path: self.storage.clone(),
            query_timeout: Duration::from_secs(common.timeout),
            monitor: MonitorOptions {
                deadline: monitor.deadline.map(Duration::from_secs),
                ..MonitorOptions::default()
            },
            verbose: common.verbose,
            debug: common.debug,
            ..ClientConfig::default()
        };

        if let Some(Command::Register(args)) = &self.command {
            config.dangerous = args.dangerous;
            config.allow_list = args
                .allow
                .as_deref()
                .map(|allow| allow.split(',').map(|cidr| cidr.trim().to_string()).collect())
                .unwrap_or_default();
        }
        config
    }

    /// Domains requested with `check -d`.
    pub fn requested_domains(args: &CheckArgs) -> Vec<String> {
        args.domains
            .as_deref()
            .map(parse_domain_list)
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("acme-dns-client").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_is_validation_hook() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        let config = cli.client_config();
        assert_eq!(config.server, PUBLIC_ACME_DNS);
        assert_eq!(config.storage_path, PathBuf::from(DEFAULT_STORAGE_PATH));
    }

    #[test]
    fn test_register_flags() {
        let cli = parse(&[
            "register",
            "-d",
            "*.example.org",
            "-s",
            "acme-dns.example.com",
            "--allow",
            "192.168.0.0/24, 10.0.0.0/8",
            "--ns",
            "9.9.9.9:53",
            "--deadline",
            "600",
            "-v",
        ]);
        let config = cli.client_config();
        assert_eq!(config.server, "https://acme-dns.example.com");
        assert_eq!(config.allow_list, vec!["192.168.0.0/24", "10.0.0.0/8"]);
        assert_eq!(config.dns_server.to_string(), "9.9.9.9:53");
        assert_eq!(config.monitor.deadline, Some(Duration::from_secs(600)));
        assert!(config.verbose);
        assert!(!config.dangerous);

        let Some(Command::Register(args)) = cli.command else {
            panic!("expected register");
        };
        assert_eq!(args.domain, "*.example.org");
    }

    #[test]
    fn test_check_domains() {
        let cli = parse(&["check", "-d", "example.org, *.test.example.org", "--vv"]);
        let Some(Command::Check(args)) = &cli.command else {
            panic!("expected check");
        };
        assert_eq!(
            Cli::requested_domains(args),
            vec!["example.org", "test.example.org"]
        );
        assert!(cli.client_config().debug);
        assert!(!args.strict);
    }

    #[test]
    fn test_check_strict_flag() {
        let cli = parse(&["check", "--strict"]);
        let Some(Command::Check(args)) = &cli.command else {
            panic!("expected check");
        };
        assert!(args.strict);
        assert!(Cli::requested_domains(args).is_empty());
    }

    #[test]
    fn test_invalid_nameserver_rejected() {
        let result = Cli::try_parse_from(["acme-dns-client", "list", "--ns", "host:port"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_register_requires_domain() {
        assert!(Cli::try_parse_from(["acme-dns-client", "register"]).is_err());
    }
}
