use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use booknook::cli::{Cli, Command, FavoritesCommand};
use booknook::commands::{self, Session};
use booknook::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    match try_main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn try_main() -> anyhow::Result<ExitCode> {
    booknook::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let config = Config::from_env()
        .context("load config")?
        .with_overrides(&cli)?;
    tracing::debug!(?config, "resolved config");

    let mut session = Session::open(config).await.context("open session")?;
    let mut stdout = std::io::stdout().lock();

    let outcome = match cli.command {
        Command::Search(args) => commands::search(&session, args, &mut stdout)
            .await
            .context("search")?,
        Command::Show(args) => commands::show(&mut session, args, &mut stdout)
            .await
            .context("show")?,
        Command::Favorites {
            command: FavoritesCommand::List(args),
        } => commands::favorites_list(&session, args, &mut stdout).context("favorites list")?,
        Command::Favorites {
            command: FavoritesCommand::Add(args),
        } => commands::favorites_add(&mut session, args, &mut stdout)
            .await
            .context("favorites add")?,
        Command::Favorites {
            command: FavoritesCommand::Remove(args),
        } => commands::favorites_remove(&mut session, args, &mut stdout)
            .await
            .context("favorites remove")?,
        Command::Cover(args) => commands::cover(&session, args, &mut stdout)
            .await
            .context("cover")?,
        Command::Shell => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            booknook::shell::run(&mut session, stdin, &mut stdout)
                .await
                .context("shell")?;
            commands::Outcome::Rendered
        }
    };

    Ok(outcome.exit_code())
}
