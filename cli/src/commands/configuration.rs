use std::process::exit;

use hamster::config;

use crate::cli::{ConfigCommand, UpdateConfiguration};

fn list() {
    println!(
        "Configuration file {}:\n",
        config::configuration_file().to_string_lossy()
    );

    match config::load() {
        Ok(config) => match config::application_config_to_string(&config) {
            Ok(toml_as_string) => println!("{toml_as_string}"),
            Err(e) => eprintln!("ERROR: Unable to format the configuration: {e}"),
        },
        Err(_) => {
            println!("Config file does not exist or is empty. Use 'hamster config update' to create it");
        }
    }
}

fn update(settings: UpdateConfiguration) {
    let mut app_config = match config::load_or_default() {
        Ok(ac) => ac,
        Err(e) => {
            eprintln!(
                "ERROR: Unable to load configuration file {}, reason:{}",
                config::configuration_file().to_string_lossy(),
                e
            );
            exit(4);
        }
    };
    if let Some(url) = settings.url {
        app_config.redmine.url = url;
    }
    if let Some(api_key) = settings.api_key {
        app_config.redmine.api_key = api_key;
    }
    if settings.enable {
        app_config.redmine.integration_enabled = true;
    }
    if settings.disable {
        app_config.redmine.integration_enabled = false;
    }
    if let Some(database) = settings.database {
        app_config.application_data.database = database;
    }
    if let Err(e) = config::save(&app_config) {
        eprintln!(
            "ERROR: Unable to save configuration file {}: {e}",
            config::configuration_file().to_string_lossy()
        );
        exit(4);
    }
    println!(
        "Configuration saved to {}",
        config::configuration_file().to_string_lossy()
    );
}

pub fn execute(cmd: ConfigCommand) {
    match cmd {
        ConfigCommand::List => list(),
        ConfigCommand::Update(settings) => update(settings),
        ConfigCommand::Remove => match config::remove() {
            Ok(()) => {
                println!(
                    "Configuration file {} removed",
                    config::configuration_file().to_string_lossy()
                );
            }
            Err(e) => {
                println!(
                    "ERROR:Unable to remove configuration file {} : {}",
                    config::configuration_file().to_string_lossy(),
                    e
                );
            }
        },
    }
}
