use clap::{Parser, Subcommand, ValueEnum};
use equipflow::application::dispatch::BackgroundExecutor;
use equipflow::application::gateway::RequestGateway;
use equipflow::application::service::EquipmentService;
use equipflow::config::AppConfig;
use equipflow::domain::employee::EmployeeId;
use equipflow::domain::ports::ActivityLogHandle;
use equipflow::infrastructure::activity::{ConsoleActivityLog, MemoryActivityLog, TeeActivityLog};
use equipflow::infrastructure::http::ReqwestTransport;
use equipflow::infrastructure::scanner::PromptScanner;
use equipflow::interfaces::csv::report_writer::ReportWriter;
use equipflow::interfaces::terminal::{Terminal, render_history};
use equipflow::logging::init_logging;
use miette::{IntoDiagnostic, Result, miette};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::Mutex;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the booking service (overrides the config file)
    #[arg(long, env = "EQUIPFLOW_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Increase diagnostic output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session: log in with your badge, borrow and return equipment
    Shell,
    /// Check that the booking service is reachable
    Probe,
    /// List equipment available for checkout
    Inventory {
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Show the booking history of an employee
    History {
        employee_id: String,
        /// Only bookings that have not been returned
        #[arg(long)]
        open: bool,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path).into_diagnostic()?,
        None => AppConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url).validate().into_diagnostic()?;
    }
    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled");
    }

    let transport = ReqwestTransport::new(&config).into_diagnostic()?;
    let gateway = RequestGateway::new(Box::new(transport), &config);
    let input = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin())));
    let scanner = PromptScanner::new(input.clone()).with_prompt("📷 Scan your badge: ");

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let memory = Arc::new(MemoryActivityLog::with_capacity(config.activity_log_capacity));
            let console: ActivityLogHandle = Arc::new(ConsoleActivityLog::stdout());
            let recent: ActivityLogHandle = memory.clone();
            let log: ActivityLogHandle = Arc::new(TeeActivityLog::new(vec![console, recent]));
            let service = Arc::new(EquipmentService::new(gateway, Box::new(scanner), log));

            let mut terminal = Terminal::new(
                service,
                BackgroundExecutor::current(),
                memory,
                input,
                io::stdout(),
            );
            terminal.run().await.into_diagnostic()?;
        }
        Commands::Probe => {
            let service = one_shot(gateway, scanner);
            if !service.probe().await {
                return Err(miette!("booking service at {} is not reachable", config.base_url));
            }
        }
        Commands::Inventory { format } => {
            let service = one_shot(gateway, scanner);
            let items = service.fetch_available().await.into_diagnostic()?;
            match format {
                Format::Csv => ReportWriter::new(io::stdout().lock())
                    .write_items(&items)
                    .into_diagnostic()?,
                Format::Text if items.is_empty() => println!("No equipment available for checkout"),
                Format::Text => items.iter().for_each(|item| println!("{}", item.label())),
            }
        }
        Commands::History {
            employee_id,
            open,
            format,
        } => {
            let service = one_shot(gateway, scanner);
            let mut history = service
                .fetch_history(&EmployeeId::new(employee_id))
                .await
                .into_diagnostic()?;
            if open {
                history.retain(|booking| booking.is_open());
            }
            match format {
                Format::Csv => ReportWriter::new(io::stdout().lock())
                    .write_bookings(&history)
                    .into_diagnostic()?,
                Format::Text => render_history(&history)
                    .iter()
                    .for_each(|line| println!("{}", line)),
            }
        }
    }

    Ok(())
}

/// Service for non-interactive commands; activity goes to stderr so stdout
/// stays machine-readable.
fn one_shot<R>(gateway: RequestGateway, scanner: PromptScanner<R>) -> EquipmentService
where
    R: tokio::io::AsyncBufRead + Unpin + Send + 'static,
{
    let log: ActivityLogHandle = Arc::new(ConsoleActivityLog::new(io::stderr()));
    EquipmentService::new(gateway, Box::new(scanner), log)
}
