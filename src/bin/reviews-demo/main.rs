use restaurant_reviews::config::{Config, OutputFormat};

mod walkthrough;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_ansi(true)
        .with_file(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let registry = walkthrough::populate()?;

    match config.output {
        OutputFormat::Text => walkthrough::report(&registry)?,
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&registry)?),
    }

    Ok(())
}
