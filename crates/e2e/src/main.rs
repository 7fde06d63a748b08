//! todomvc-e2e: run the TodoMVC scenarios against a live app or the model

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use todomvc_e2e::app::AppProbe;
use todomvc_e2e::config::Browser;
use todomvc_e2e::playwright::dump_script;
use todomvc_e2e::runner::select;
use todomvc_e2e::suite::todomvc_suite;
use todomvc_e2e::{HarnessConfig, ModelExecutor, PlaywrightHandle, Scenario, TestRunner};

#[derive(Parser, Debug)]
#[command(name = "todomvc-e2e")]
#[command(about = "Browser-driven E2E scenarios for TodoMVC")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// URL of the application under test
    #[arg(long, env = "TODOMVC_BASE_URL")]
    base_url: Option<String>,

    /// Wait budget for each action and assertion, in milliseconds
    #[arg(long, env = "TODOMVC_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long)]
    browser: Option<Browser>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Directory of extra YAML scenarios
    #[arg(short, long)]
    scenarios: Option<PathBuf>,

    /// Run only scenarios with this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only the scenario with this name
    #[arg(short, long)]
    name: Option<String>,

    /// Replay scenarios on the in-memory model instead of a browser
    #[arg(long)]
    dry_run: bool,

    /// List matching scenarios and exit
    #[arg(long)]
    list: bool,

    /// Write generated Playwright scripts to this directory and exit
    #[arg(long)]
    emit_scripts: Option<PathBuf>,

    /// Do not wait for the application to answer HTTP first
    #[arg(long)]
    skip_probe: bool,

    /// Output directory for results
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };

    match rt.block_on(async_main(args)) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

fn init_logging(args: &Args) {
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if args.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

fn load_config(args: &Args) -> anyhow::Result<HarnessConfig> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::from_file(path)?,
        None => HarnessConfig::default(),
    };

    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(browser) = args.browser {
        config.browser = browser;
    }
    if args.headed {
        config.headless = false;
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn async_main(args: Args) -> anyhow::Result<bool> {
    let config = load_config(&args)?;

    let mut scenarios = todomvc_suite();
    if let Some(dir) = &args.scenarios {
        let extra = Scenario::load_all(dir)?;
        info!("Loaded {} scenario(s) from {}", extra.len(), dir.display());
        scenarios.extend(extra);
    }

    let selected: Vec<Scenario> = select(&scenarios, args.name.as_deref(), args.tag.as_deref())
        .into_iter()
        .cloned()
        .collect();

    if selected.is_empty() {
        warn!("No scenario matches the given name/tag");
        return Ok(false);
    }

    if args.list {
        for scenario in &selected {
            println!("{}\t[{}]\t{} step(s)", scenario.name, scenario.tags.join(","), scenario.steps.len());
        }
        return Ok(true);
    }

    if let Some(dir) = &args.emit_scripts {
        let handle = PlaywrightHandle::offline(config.clone())?;
        for scenario in &selected {
            let path = dump_script(&handle, scenario, dir)?;
            info!("Wrote {}", path.display());
        }
        return Ok(true);
    }

    let runner = if args.dry_run {
        TestRunner::new(Box::new(ModelExecutor), config.output_dir.clone())
    } else {
        if !args.skip_probe {
            AppProbe::new(&config).wait_until_reachable().await?;
        }
        let handle = PlaywrightHandle::new(config.clone())?;
        TestRunner::new(Box::new(handle), config.output_dir.clone())
    };

    let results = runner.run_scenarios(&selected).await;
    runner.write_results(&results)?;

    Ok(results.all_passed())
}
