use anyhow::Result;
use clap::Parser;
use log::{error, info};
use screenwatch_cv::{ScreenCapture, Scanner, TemplateLoader};

mod cli;
mod notifier;

use cli::Cli;
use notifier::SoundNotifier;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    let mut notifier = SoundNotifier::open(&config.alert_sound)?;
    let templates = TemplateLoader::new(&config.template_root)
        .with_config(config.template_config.clone())
        .load_all()?;
    let root = config.template_root.clone();

    let mut scanner = Scanner::new(config, templates, ScreenCapture::new());
    info!(
        "Loaded {} templates from {:?}",
        scanner.templates().len(),
        root
    );

    if cli.once {
        let alerts = scanner.tick(&mut notifier)?;
        info!("Single scan raised {} alerts", alerts.len());
        return Ok(());
    }

    scanner.run(&mut notifier)
}
