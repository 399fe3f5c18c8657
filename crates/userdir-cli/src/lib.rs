mod cli;

use anyhow::Context;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use userdir::{
    DirectoryConfig, HttpInferenceProvider, PgUserRepository, UserService, UserStatements,
};

type Service = UserService<PgUserRepository, HttpInferenceProvider>;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    if let cli::Command::Help(topic) = cmd {
        cli::print_help(topic);
        return Ok(());
    }

    let _ = dotenvy::dotenv();
    init_logging();

    match cmd {
        cli::Command::Help(_) => Ok(()),
        cli::Command::List(args) => {
            let service = build_service(&args.config)?;
            let users = service.list(args.page, &args.filter).await?;
            println!("{}", serde_json::to_string_pretty(&users)?);
            Ok(())
        }
        cli::Command::Create(args) => {
            let service = build_service(&args.config)?;
            let user = service.create(args.user).await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
            Ok(())
        }
        cli::Command::Update(args) => {
            let service = build_service(&args.config)?;
            service.update(&args.record).await?;
            let user = service.get(args.record.id).await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
            Ok(())
        }
        cli::Command::Delete(args) => {
            let service = build_service(&args.config)?;
            service.delete(args.id).await?;
            println!("deleted user {}", args.id);
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_service(config_path: &Path) -> anyhow::Result<Service> {
    let config = DirectoryConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let statements = UserStatements::new(&config.database.table)?;
    let pool = userdir::create_pool(&config.database)?;
    let provider = HttpInferenceProvider::new(&config.inference)?;

    tracing::info!(table = statements.table(), "userdir configured");
    Ok(UserService::new(
        PgUserRepository::new(pool, statements),
        provider,
    ))
}
