//! `lemon` - CLI for littlelemon
//!
//! Browses the Little Lemon menu and manages the signed-in guest's session
//! from the terminal.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use littlelemon::app::{self, AppContext, Launch};
use littlelemon::cli::{
    Cli, Command, ConfigCommand, LaunchCommand, MenuCommand, OnboardCommand, ProfileCommand,
};
use littlelemon::menu::{FilterSelection, MenuItem};
use littlelemon::viewmodel::{BootstrapOutcome, MenuViewModel, PersistStatus};
use littlelemon::{init_logging, Config, Error};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Config commands must work even when the config file is broken.
    if let Command::Config(config_cmd) = cli.command {
        return handle_config(cli.config, config_cmd);
    }

    let config = Config::load_from(cli.config.clone())?;
    let ctx = AppContext::open(config)?;

    let result = match cli.command {
        Command::Launch(cmd) => handle_launch(&ctx, &cmd),
        Command::Menu(cmd) => handle_menu(&ctx, &cmd).await,
        Command::Onboard(cmd) => handle_onboard(&ctx, &cmd),
        Command::Profile(cmd) => handle_profile(&ctx, cmd),
        Command::Logout => handle_logout(&ctx),
        Command::Config(_) => Ok(()),
    };

    finish(result, ctx.close())
}

/// The command's own error wins over a failure to close the stores.
fn finish(result: anyhow::Result<()>, closed: littlelemon::Result<()>) -> anyhow::Result<()> {
    if let (Err(_), Err(close_err)) = (&result, &closed) {
        eprintln!("Error closing databases: {close_err}");
    }
    result?;
    closed?;
    Ok(())
}

fn handle_launch(ctx: &AppContext, cmd: &LaunchCommand) -> anyhow::Result<()> {
    let Launch {
        route,
        tab,
        first_time,
    } = ctx.launch();

    if cmd.json {
        let launch = serde_json::json!({
            "route": format!("{route:?}"),
            "tab": format!("{tab:?}"),
            "first_time": first_time,
        });
        println!("{}", serde_json::to_string_pretty(&launch)?);
    } else {
        println!("Route: {route:?}");
        println!("Tab:   {tab:?}");
        if first_time {
            println!("Welcome! This is your first launch since signing in.");
        }
    }
    Ok(())
}

async fn handle_menu(ctx: &AppContext, cmd: &MenuCommand) -> anyhow::Result<()> {
    let view = ctx.menu_view()?;

    match view.bootstrap().await {
        BootstrapOutcome::Remote {
            persist: PersistStatus::Failed,
            ..
        } => eprintln!("Warning: the menu could not be saved for offline use."),
        BootstrapOutcome::Local { .. }
        | BootstrapOutcome::Remote { .. }
        | BootstrapOutcome::Unavailable => {}
    }

    if cmd.is_narrowed() {
        view.set_search_query(cmd.search.clone().unwrap_or_default())
            .await;
        view.set_filters(FilterSelection::from_categories(&cmd.categories()))
            .await;
    }

    print_menu(ctx, &view, cmd.json)
}

fn print_menu(ctx: &AppContext, view: &MenuViewModel, json: bool) -> anyhow::Result<()> {
    let items = view.items();
    let image_base = &ctx.config().feed.image_base_url;

    if json {
        let rows: Vec<_> = items
            .iter()
            .map(|item| {
                serde_json::json!({
                    "name": item.name,
                    "price": item.formatted_price(),
                    "description": item.description,
                    "category": item.category,
                    "image_url": item.image_url(image_base),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if let Some(message) = view.empty_state_message() {
        println!("{message}");
        return Ok(());
    }
    for item in &items {
        print_item(item);
    }
    Ok(())
}

fn print_item(item: &MenuItem) {
    println!(
        "{:<28} ${:>7}  {}",
        item.name,
        item.formatted_price(),
        item.category.label()
    );
    if !item.description.is_empty() {
        println!("    {}", item.description);
    }
}

fn handle_onboard(ctx: &AppContext, cmd: &OnboardCommand) -> anyhow::Result<()> {
    let profile = app::onboard(ctx.session(), &cmd.first_name, &cmd.email)
        .context("Error completing onboarding")?;
    println!("Welcome, {}!", profile.first_name);
    Ok(())
}

fn handle_profile(ctx: &AppContext, cmd: ProfileCommand) -> anyhow::Result<()> {
    let mut profile = ctx
        .session()
        .load_profile()
        .context("Error loading profile data")?
        .ok_or(Error::ProfileMissing)
        .context("Run `lemon onboard` first")?;

    match cmd {
        ProfileCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!("Profile ({})", profile.initials());
                println!("=============");
                println!("  First name:        {}", profile.first_name);
                println!("  Last name:         {}", profile.last_name);
                println!("  Email:             {}", profile.profile_email);
                println!("  Phone:             {}", profile.phone_number);
                println!(
                    "  Image:             {}",
                    profile.profile_image.as_deref().unwrap_or("(none)")
                );
                println!();
                println!("[Notifications]");
                println!("  Order status:      {}", profile.order_status);
                println!("  Password changes:  {}", profile.password_changes);
                println!("  Special offers:    {}", profile.special_offers);
                println!("  Newsletter:        {}", profile.news_letters);
            }
        }
        ProfileCommand::Update(update) => {
            update.apply(&mut profile);
            app::update_profile(ctx.session(), &profile).context("Error saving profile data")?;
            println!("Profile saved.");
        }
    }
    Ok(())
}

fn handle_logout(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.session()
        .clear_session()
        .context("Error clearing session")?;
    println!("Logged out.");
    Ok(())
}

fn handle_config(path: Option<std::path::PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Menu database:      {}", config.database_path().display());
                println!("  Session database:   {}", config.session_path().display());
                println!();
                println!("[Feed]");
                println!("  URL:                {}", config.feed.url);
                println!("  Image base URL:     {}", config.feed.image_base_url);
                match config.feed_timeout() {
                    Some(timeout) => println!("  Timeout:            {}s", timeout.as_secs()),
                    None => println!("  Timeout:            none"),
                }
                println!();
                println!("[Search]");
                println!("  Debounce (ms):      {}", config.search.debounce_ms);
            }
        }
        ConfigCommand::Path => {
            println!(
                "{}",
                path.unwrap_or_else(Config::default_config_path).display()
            );
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_prefers_command_error() {
        let err = finish(
            Err(anyhow::anyhow!("Error saving profile data")),
            Err(Error::internal("menu store is still in use")),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Error saving profile data");
    }

    #[test]
    fn test_finish_reports_close_error() {
        let err = finish(Ok(()), Err(Error::internal("menu store is still in use"))).unwrap_err();
        assert!(err.to_string().contains("still in use"));
    }

    #[test]
    fn test_finish_ok() {
        assert!(finish(Ok(()), Ok(())).is_ok());
    }
}
