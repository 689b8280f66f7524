use clap::Parser as ClapParser;
use std::fs;
use std::path::PathBuf;
use std::process;
use telegram_typings_creator::checker;
use telegram_typings_creator::fetcher::Fetcher;
use telegram_typings_creator::{render, Config, Lang, Parser, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser, Debug)]
#[command(name = "telegram-typings")]
#[command(about = "Generate typings from the Telegram Bot API reference page")]
struct Cli {
    /// TOML file with source and targets (stock targets if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page to fetch
    #[arg(long)]
    url: Option<String>,

    /// Local copy of the page, used instead of fetching when present
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Only generate these targets
    #[arg(short, long, value_enum)]
    target: Vec<Lang>,

    /// Do not run the syntax checker over generated files
    #[arg(long)]
    skip_check: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => (),
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}

/// Returns false when the syntax checker reported errors.
fn run(cli: Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(url) = cli.url {
        config.source.url = url;
    }

    if cli.cache.is_some() {
        config.source.cache = cli.cache;
    }

    let config = config.only(&cli.target);
    let html = Fetcher::new(config.source.url.clone(), config.source.cache.clone()).fetch()?;

    info!("Parse types from html");
    let types = Parser::new(html).parse()?;
    info!("Successfully parsed {} types", types.len());

    let mut checked = vec![];

    for target in &config.targets {
        info!("Create {:?} code in '{}'", target.lang, target.path.display());

        let code = render(target, &types);

        if let Some(parent) = target.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&target.path, code)?;

        if target.check_syntax && target.lang == Lang::TypeScript && !cli.skip_check {
            checked.push(target.path.clone());
        }
    }

    if checked.is_empty() {
        return Ok(true);
    }

    let diagnostics = checker::check_typescript(&checked)?;

    for diagnostic in &diagnostics {
        error!("{}", diagnostic);
    }

    Ok(diagnostics.is_empty())
}
