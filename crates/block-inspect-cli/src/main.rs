//! CLI tool for inspecting the blocks stored in a Thanos-style bucket.

mod config;
mod error;
mod output;

use std::{path::PathBuf, str::FromStr};

use block_inspect_core::{
    CollectPolicy, ColumnSet, OutputMode, ReportOptions, Reporter, TierPolicy, collect,
    format::parse_time_delta,
    report::DEFAULT_SORT_BY,
    source::{BucketLocation, load_descriptors},
};
use chrono::TimeDelta;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{LevelFilter, debug, info};
use snafu::{OptionExt, ResultExt};

use crate::{
    config::{default_config_path, load_config, s3_location},
    error::{
        CliResult, CollectSnafu, ConfigSnafu, InvalidThresholdSnafu, ReportSnafu, SourceSnafu,
    },
    output::{Skipped, print_report, print_skipped},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Skip unreadable descriptors and list them on stderr
    Tolerant,
    /// Abort on the first unreadable descriptor
    Strict,
}

impl From<PolicyArg> for CollectPolicy {
    fn from(v: PolicyArg) -> Self {
        match v {
            PolicyArg::Tolerant => CollectPolicy::Tolerant,
            PolicyArg::Strict => CollectPolicy::Strict,
        }
    }
}

#[derive(Debug, Args)]
struct BucketArgs {
    /// minio-client config file (default: $HOME/.mc/config.json)
    #[arg(long = "config-file")]
    config_file: Option<PathBuf>,

    /// Host alias in the config file
    #[arg(long, default_value = "c01")]
    region: String,

    #[arg(long, default_value = "prometheus")]
    bucket: String,

    /// Endpoint to use instead of the configured one, e.g. localhost:9000
    #[arg(long = "overwrite-url")]
    overwrite_url: Option<String>,

    /// Read descriptors from a local directory laid out like the bucket
    #[arg(long, conflicts_with_all = ["config_file", "overwrite_url"])]
    local: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// Comma-separated column names, highest priority first
    #[arg(long = "sort-by", default_value = DEFAULT_SORT_BY)]
    sort_by: String,

    /// raw or markdown
    #[arg(long, default_value = "markdown")]
    output: String,

    /// Override the subcommand's default failure policy
    #[arg(long = "on-error", value_enum)]
    on_error: Option<PolicyArg>,

    /// Range a raw block needs before downsampling, e.g. 40h
    #[arg(long = "raw-threshold", default_value = "40h")]
    raw_threshold: String,

    /// Range a 5m block needs before downsampling, e.g. 10d
    #[arg(long = "five-minute-threshold", default_value = "10d")]
    five_minute_threshold: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Basic block listing; aborts on the first unreadable descriptor
    Summary {
        #[command(flatten)]
        bucket: BucketArgs,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Extended block listing with downsampling ETA; skips unreadable descriptors
    Inspect {
        #[command(flatten)]
        bucket: BucketArgs,

        #[command(flatten)]
        report: ReportArgs,

        /// Only show blocks whose replica label equals this value
        #[arg(long)]
        replica: Option<String>,
    },
}

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Log listing and download progress (ignores RUST_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

struct RunArgs {
    bucket: BucketArgs,
    report: ReportArgs,
    column_set: ColumnSet,
    default_policy: CollectPolicy,
    replica: Option<String>,
}

fn init_logging(verbose: bool) {
    if verbose {
        env_logger::builder().filter_level(LevelFilter::Debug).init();
        info!("Verbose output enabled (ignoring RUST_LOG environment variable)");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }
}

fn parse_threshold(flag: &str, value: &str) -> CliResult<TimeDelta> {
    parse_time_delta(value).context(InvalidThresholdSnafu {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

fn report_options(
    args: &ReportArgs,
    column_set: ColumnSet,
    replica: Option<String>,
) -> CliResult<ReportOptions> {
    let output = OutputMode::from_str(&args.output).context(ConfigSnafu)?;
    let tier_policy = TierPolicy {
        raw_threshold: parse_threshold("raw-threshold", &args.raw_threshold)?,
        five_minute_threshold: parse_threshold(
            "five-minute-threshold",
            &args.five_minute_threshold,
        )?,
    };

    Ok(ReportOptions {
        column_set,
        replica_filter: replica,
        sort_by: args.sort_by.split(',').map(str::to_string).collect(),
        output,
        tier_policy,
    })
}

async fn bucket_location(args: &BucketArgs) -> CliResult<BucketLocation> {
    if let Some(root) = &args.local {
        return Ok(BucketLocation::Local { root: root.clone() });
    }

    let path = match &args.config_file {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    debug!("reading config from {}", path.display());

    let cfg = load_config(&path).await?;
    let host = cfg.host(&args.region)?;
    debug!(
        "config version {}: host {} uses {} (api {}, lookup {})",
        cfg.version, args.region, host.url, host.api, host.lookup
    );
    Ok(BucketLocation::S3(s3_location(
        host,
        &args.bucket,
        args.overwrite_url.as_deref(),
    )))
}

async fn cmd_report(args: RunArgs) -> CliResult<()> {
    // Configuration mistakes surface before any network traffic.
    let options = report_options(&args.report, args.column_set, args.replica)?;
    let reporter = Reporter::new(options).context(ConfigSnafu)?;
    let policy = args
        .report
        .on_error
        .map(CollectPolicy::from)
        .unwrap_or(args.default_policy);

    let location = bucket_location(&args.bucket).await?;
    let location_name = location.to_string();
    let store = location.open().context(SourceSnafu {
        location: location_name.clone(),
    })?;

    let fetched = load_descriptors(store.as_ref(), policy)
        .await
        .context(SourceSnafu {
            location: location_name,
        })?;
    let collection = collect(fetched.descriptors, policy).context(CollectSnafu)?;
    let report = reporter.build(&collection.records).context(ReportSnafu)?;

    print_skipped(&Skipped {
        fetch: &fetched.failures,
        decode: &collection.failures,
    })?;
    print_report(&report)
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Command::Summary { bucket, report } => {
            cmd_report(RunArgs {
                bucket,
                report,
                column_set: ColumnSet::Basic,
                default_policy: CollectPolicy::Strict,
                replica: None,
            })
            .await
        }

        Command::Inspect {
            bucket,
            report,
            replica,
        } => {
            cmd_report(RunArgs {
                bucket,
                report,
                column_set: ColumnSet::Extended,
                default_policy: CollectPolicy::Tolerant,
                replica,
            })
            .await
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
