#[macro_use] extern crate log;

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use dotenv::dotenv;
use simbot_report::{
    request::{DEFAULT_DIFFICULTY, DEFAULT_REGION, DEFAULT_WEEKS},
    FormSubmitHandler, HttpReportSource, ResponseOrdering, SiteConfig, TriggerControl,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use console::{parse_command, Command, CommandError, ConsoleErrors, ConsoleForm, Printout, HELP};
use logging::LogOptions;

mod console;
mod logging;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fetch a SimBot guild report into the terminal or a file.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Region where the guild exists.
    #[arg(long, default_value = DEFAULT_REGION)]
    region: String,
    /// Number of weeks of historical logs to average.
    #[arg(long, default_value = DEFAULT_WEEKS)]
    weeks: String,
    /// Raid difficulty to filter logs by.
    #[arg(long, default_value = DEFAULT_DIFFICULTY)]
    difficulty: String,
    /// Name of the guild to be simmed.
    #[arg(long, default_value = "")]
    guild: String,
    /// Realm where the guild exists.
    #[arg(long, default_value = "")]
    realm: String,

    /// Url of the SimBot site, `all_sims/` is resolved relative to it.
    #[arg(long, env = "SIMBOT_BASE_URL")]
    base_url: Option<String>,
    /// Yaml site config, see `configs/simbot.yaml`.
    #[arg(long, env = "SIMBOT_CONFIG")]
    config: Option<PathBuf>,
    /// Request timeout in seconds. Waits forever if not set.
    #[arg(long)]
    timeout: Option<u64>,
    /// Ignore responses that arrive after a newer submit's response.
    #[arg(long)]
    latest_trigger: bool,

    /// Write the report to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Read commands from stdin and submit as often as you like.
    #[arg(long, short)]
    interactive: bool,

    /// Log spec used when `RUST_LOG` is not set.
    #[arg(long, default_value = "debug")]
    log_level: String,
    /// Save logs to file.
    #[arg(long)]
    write_logs: bool,
    /// Keep one log file per run instead of overwriting `simbot.log`.
    #[arg(long)]
    persist_logs: bool,
    /// Directory for log files.
    #[arg(long, default_value = "logs")]
    log_path: PathBuf,
}

fn site_config(args: &Args) -> anyhow::Result<SiteConfig> {
    let mut config = match &args.config {
        Some(path) => SiteConfig::load(path)?,
        None => SiteConfig::default(),
    };
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url)?;
    }
    if let Some(secs) = args.timeout {
        config.timeout = Some(Duration::from_secs(secs));
    }
    if args.latest_trigger {
        config.ordering = ResponseOrdering::LatestTrigger;
    }
    Ok(config)
}

async fn interactive(form: &ConsoleForm, handler: &Arc<FormSubmitHandler>) -> anyhow::Result<()> {
    let submit = TriggerControl::new();
    let bound = handler.bind(&submit);

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Command::Set(field, value)) => form.set(field, value),
            Ok(Command::Submit) => {
                submit.click();
            }
            Ok(Command::Show) => println!("{}", form.describe()),
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Quit) => break,
            Err(CommandError::Empty) => {}
            Err(err) => eprintln!("{}", err),
        }
    }

    submit.close();
    debug!("Waiting for pending reports");
    bound.await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok(); // load (additional) environment variables from `.env` file in working directory.
    let args = Args::parse();

    logging::init_logging(&LogOptions {
        spec: args.log_level.clone(),
        write_logs: args.write_logs,
        persist_logs: args.persist_logs,
        directory: args.log_path.clone(),
    })?;
    info!("This is SimBot {}", VERSION);

    let config = site_config(&args)?;
    let source = HttpReportSource::new(&config)?;
    info!("Guild reports come from {}", source.endpoint());

    let form = ConsoleForm::default();
    form.region.set(args.region.as_str());
    form.weeks.set(args.weeks.as_str());
    form.difficulty.set(args.difficulty.as_str());
    form.guild.set(args.guild.as_str());
    form.realm.set(args.realm.as_str());

    let errors = ConsoleErrors::default();
    let printout = match &args.output {
        Some(path) => Printout::File {
            path: path.clone(),
            errors: errors.clone(),
        },
        None => Printout::Stdout,
    };
    let handler = Arc::new(
        FormSubmitHandler::new(form.report_form(), printout, source)
            .with_ordering(config.ordering)
            .with_error_display(errors.clone()),
    );

    if args.interactive {
        interactive(&form, &handler).await?;
    } else {
        handler.on_trigger().await?;
    }

    info!("SimBot finished");
    if errors.count() > 0 {
        anyhow::bail!("{} guild report(s) failed to arrive or be written", errors.count());
    }
    Ok(())
}
