use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

use parabank_e2e::driver::web::{BrowserType, WebDriver, WebDriverConfig};
use parabank_e2e::driver::BrowserPage;
use parabank_e2e::utils::config::HarnessConfig;
use parabank_e2e::utils::readiness::{self, ReadinessProbe};
use parabank_e2e::{report, runner};

#[derive(Parser)]
#[command(name = "parabank-e2e")]
#[command(version = "0.1.0")]
#[command(about = "End-to-end registration check for ParaBank", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the registration scenario and write reports
    Run {
        /// YAML config with selectors, timeouts and report options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for reports and screenshots
        #[arg(short, long)]
        reports_dir: Option<PathBuf>,

        /// Override the landing page URL
        #[arg(long)]
        base_url: Option<String>,

        /// Browser engine (chromium, firefox, webkit)
        #[arg(short, long)]
        browser: Option<String>,

        /// Show the browser window
        #[arg(long, default_value = "false")]
        headed: bool,

        /// Also write junit.xml
        #[arg(long, default_value = "false")]
        junit: bool,

        /// Randomize customer details
        #[arg(long, default_value = "false")]
        fake_data: bool,
    },

    /// Wait for <base>/health, then run a command
    Probe {
        #[arg(long, default_value = readiness::DEFAULT_BASE_URL)]
        base_url: String,

        #[arg(long, default_value = "10")]
        attempts: u32,

        /// Seconds between attempts
        #[arg(long, default_value = "2")]
        interval_secs: u64,

        /// Command to run once the app answers
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },

    /// Generate report from test results
    Report {
        /// Path to test results JSON
        results: PathBuf,

        /// Output format (json, html, junit)
        #[arg(short, long, default_value = "html")]
        format: String,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let code = match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            1
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Run {
            config,
            reports_dir,
            base_url,
            browser,
            headed,
            junit,
            fake_data,
        } => {
            let mut config = HarnessConfig::load(config.as_deref())?;
            if let Some(dir) = reports_dir {
                config.reports_dir = dir;
            }
            if let Some(url) = base_url {
                config.scenario.base_url = url;
            }
            if let Some(name) = browser {
                config.browser = name;
            }
            if headed {
                config.headless = false;
            }
            config.junit |= junit;
            config.fake_data |= fake_data;

            println!(
                "{} Running registration against: {}",
                "▶".green().bold(),
                config.scenario.base_url.cyan()
            );
            println!("  Browser: {}", config.browser.cyan());
            println!(
                "  Reports: {}",
                config.reports_dir.display().to_string().cyan()
            );

            let launched = WebDriver::new(WebDriverConfig {
                browser_type: BrowserType::from_name(&config.browser),
                headless: config.headless,
                ..WebDriverConfig::default()
            })
            .await
            .map(|driver| Box::new(driver) as Box<dyn BrowserPage>);

            let outcome = runner::run_scenario(&config, launched).await;
            Ok(outcome.exit_code())
        }

        Commands::Probe {
            base_url,
            attempts,
            interval_secs,
            command,
        } => {
            let probe = ReadinessProbe::new(&base_url)
                .attempts(attempts)
                .interval(Duration::from_secs(interval_secs));
            readiness::probe_then_run(&probe, &command).await
        }

        Commands::Report {
            results,
            format,
            output,
        } => {
            println!(
                "{} Generating {} report from: {}",
                "📊".to_string().blue(),
                format.cyan(),
                results.display()
            );
            report::render_from_file(&results, &format, output.as_deref())?;
            Ok(0)
        }
    }
}
