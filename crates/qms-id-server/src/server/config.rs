use anyhow::{Context, bail};
use chrono::FixedOffset;
use clap::{Parser, ValueEnum};
use qms_id::{FallbackPolicy, PrefixTable};

/// How concurrent issuance is kept duplicate-free.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Serialize read-max-then-persist behind a writer lock.
    Lock,
    /// Rely on the store's uniqueness constraint and retry on conflict.
    Retry,
}

/// What to do with complaint categories the prefix table does not know.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Fallback {
    /// Issue under the default `CCNFS` prefix.
    Default,
    /// Refuse the request.
    Reject,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Runtime configuration for the `qms-id-server` binary.
///
/// Every option can also be supplied through the environment (or a `.env`
/// file), which is how deployments usually configure it.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "qms-id-server",
    version,
    about = "An HTTP service issuing PREFIX-YYYY-MM-NNN record identifiers"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Race-closing strategy used by the issuer.
    ///
    /// Environment variable: `ALLOCATION_STRATEGY`
    #[arg(long, env = "ALLOCATION_STRATEGY", value_enum, default_value_t = Strategy::Lock)]
    pub strategy: Strategy,

    /// Attempts before the retrying issuer gives up on conflicts.
    ///
    /// Only used with `--strategy retry`.
    ///
    /// Environment variable: `MAX_ATTEMPTS`
    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = 8)]
    pub max_attempts: u32,

    /// Fixed UTC offset that decides which month an identifier falls in,
    /// e.g. `+00:00` or `+05:30`. All instances sharing a store must agree on
    /// it.
    ///
    /// Environment variable: `CALENDAR_UTC_OFFSET`
    #[arg(long, env = "CALENDAR_UTC_OFFSET", default_value_t = String::from("+00:00"))]
    pub utc_offset: String,

    /// Policy for unknown complaint categories.
    ///
    /// Environment variable: `CATEGORY_FALLBACK`
    #[arg(long, env = "CATEGORY_FALLBACK", value_enum, default_value_t = Fallback::Default)]
    pub fallback: Fallback,

    /// Capacity of the queue in front of the issuing worker.
    ///
    /// Requests wait here while the worker is busy; a full queue applies
    /// backpressure to HTTP handlers.
    ///
    /// Environment variable: `REQUEST_BUFFER_SIZE`
    #[arg(long, env = "REQUEST_BUFFER_SIZE", default_value_t = 64)]
    pub request_buffer_size: usize,

    /// Seconds to wait for the worker to acknowledge shutdown.
    ///
    /// Environment variable: `SHUTDOWN_TIMEOUT`
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 3)]
    pub shutdown_timeout: u64,

    /// Console log format.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub strategy: Strategy,
    pub max_attempts: u32,
    pub utc_offset: FixedOffset,
    pub fallback: Fallback,
    pub request_buffer_size: usize,
    pub shutdown_timeout: u64,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// The complaint prefix table with the configured fallback policy.
    pub fn prefix_table(&self) -> PrefixTable {
        match self.fallback {
            Fallback::Default => PrefixTable::complaints(),
            Fallback::Reject => PrefixTable::complaints_with(FallbackPolicy::Reject),
        }
    }
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.max_attempts == 0 {
            bail!("MAX_ATTEMPTS must be greater than 0");
        }

        if args.request_buffer_size == 0 {
            bail!("REQUEST_BUFFER_SIZE must be greater than 0");
        }

        let utc_offset: FixedOffset = args
            .utc_offset
            .trim()
            .parse()
            .with_context(|| format!("invalid CALENDAR_UTC_OFFSET '{}'", args.utc_offset))?;

        Ok(Self {
            server_addr: args.server_addr,
            strategy: args.strategy,
            max_attempts: args.max_attempts,
            utc_offset,
            fallback: args.fallback,
            request_buffer_size: args.request_buffer_size,
            shutdown_timeout: args.shutdown_timeout,
            log_format: args.log_format,
        })
    }
}

/// Parses a config with every option given on the command line, using the
/// declared default unless `overrides` sets the flag, so nothing is read from
/// the environment.
#[cfg(test)]
pub(crate) fn parse_with_defaults(overrides: &[&str]) -> anyhow::Result<ServerConfig> {
    use clap::CommandFactory;

    let command = CliArgs::command();
    let mut argv = vec![String::from("qms-id-server")];
    for arg in command.get_arguments() {
        let (Some(long), Some(default)) = (arg.get_long(), arg.get_default_values().first())
        else {
            continue;
        };
        let flag = format!("--{long}");
        if !overrides.contains(&flag.as_str()) {
            argv.push(flag);
            argv.push(default.to_string_lossy().into_owned());
        }
    }
    argv.extend(overrides.iter().map(|s| (*s).to_owned()));

    ServerConfig::try_from(CliArgs::try_parse_from(argv)?)
}
