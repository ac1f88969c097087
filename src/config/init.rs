use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, BackendConfig, Config, DEFAULT_REFRESH_INTERVAL};
use crate::credentials::{ENV_ACCESS_TOKEN_VAR, ENV_ANON_KEY_VAR};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    Ok(parse_yes_no(&input, default_yes))
}

fn parse_yes_no(input: &str, default_yes: bool) -> bool {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        default_yes
    } else {
        input == "y" || input == "yes"
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Will Win / Should Win setup");
    println!("===========================");
    println!();

    // 1. Backend
    println!("Your league host shares a project URL and a public API key.");
    let url = loop {
        let input = prompt("Project URL (e.g. https://abcd.supabase.co): ")?;
        match crate::backend::client::parse_base_url(&input) {
            Ok(_) => break input,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    println!();
    println!(
        "The API key can live in the config file or in {}.",
        ENV_ANON_KEY_VAR
    );
    let anon_key = if prompt_yes_no("Store the API key in the config file?", false)? {
        let key = prompt("API key: ")?;
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    } else {
        None
    };

    // 2. Identity
    println!();
    println!("Your user id is the id of your profile. Saving picks also needs an");
    println!("access token, read from {} or asked for when needed.", ENV_ACCESS_TOKEN_VAR);
    let user_id = prompt("User id (blank to skip): ")?;

    // 3. Refresh
    println!();
    let auto_refresh_interval = loop {
        let input = prompt_with_default("TUI refresh interval", DEFAULT_REFRESH_INTERVAL)?;
        let candidate = Config {
            auto_refresh_interval: input.clone(),
            ..Config::default()
        };
        match candidate.refresh_interval() {
            Ok(_) => break input,
            Err(e) => println!("  Invalid: {:#}. Try again.", e),
        }
    };

    // 4. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    // Check if file already exists
    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 5. Write config
    let config = Config {
        backend: BackendConfig {
            url: Some(url),
            anon_key,
        },
        user_id: if user_id.is_empty() { None } else { Some(user_id) },
        auto_refresh_interval,
        ballot: None,
    };

    save_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `will-win` to see your ballot, or `will-win tui` to start picking.");

    Ok(())
}
