use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use iris_client::config::DEFAULT_ORIGIN;
use iris_client::{view, ClientConfig, Controller, Field, Measurements, Mode, PredictionClient, Tab};

#[derive(Parser, Debug)]
#[command(name = "iris-client", about = "Iris species prediction client")]
struct Cli {
    /// development or production; defaults to the build profile
    #[arg(long, env = "IRIS_ENV")]
    env: Option<Mode>,

    /// Origin the production `/api` path is joined onto
    #[arg(long, env = "IRIS_ORIGIN")]
    origin: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one set of measurements and print the result
    Predict {
        sepal_length: String,
        sepal_width: String,
        petal_length: String,
        petal_width: String,
    },
    /// Check that the prediction service is up
    Health,
    /// Interactive session with history
    Shell,
}

impl Cli {
    fn config(&self) -> ClientConfig {
        ClientConfig::new(
            self.env.unwrap_or_else(Mode::from_build),
            self.origin.clone().unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
        )
    }
}

#[actix_rt::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let client = PredictionClient::new(&config);
    info!("{} mode, prediction service at {}", config.mode, client.base_url());

    match cli.command {
        Command::Predict {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        } => {
            let mut controller = Controller::new();
            let raw = [sepal_length, sepal_width, petal_length, petal_width];
            for (field, value) in Field::ALL.into_iter().zip(raw.iter()) {
                controller.update_field(field, value);
            }
            controller.submit(&client).await?;
            if let Some(err) = controller.error() {
                bail!("{}", err);
            }
            print!("{}", view::render(&controller));
        }
        Command::Health => {
            let health = client
                .health()
                .await
                .with_context(|| format!("health check against {} failed", client.base_url()))?;
            println!("{}", health.status);
        }
        Command::Shell => shell(&client).await?,
    }
    Ok(())
}

const HELP: &str = "\
commands:
  set <field> <value>   edit a measurement (sepal_length, sepal_width, petal_length, petal_width)
  show                  redraw the active tab
  submit                send the measurements
  tab predict|history   switch tab
  history               show the history tab
  json                  dump history as JSON
  help                  this text
  quit                  leave";

async fn shell(client: &PredictionClient) -> Result<()> {
    let mut controller = Controller::with_form(Measurements::default());
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", HELP);
    print!("{}", view::render(&controller));

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            continue;
        };

        match cmd {
            "set" => {
                let (Some(key), value) = (words.next(), words.next()) else {
                    println!("usage: set <field> <value>");
                    continue;
                };
                match key.parse::<Field>() {
                    Ok(field) => {
                        controller.update_field(field, value.unwrap_or(""));
                        controller.set_tab(Tab::Predict);
                        print!("{}", view::render(&controller));
                    }
                    Err(e) => println!("{}", e),
                }
            }
            "submit" => {
                controller.set_tab(Tab::Predict);
                controller.submit(client).await?;
                print!("{}", view::render(&controller));
            }
            "tab" => match words.next() {
                Some("predict") => {
                    controller.set_tab(Tab::Predict);
                    print!("{}", view::render(&controller));
                }
                Some("history") => {
                    controller.set_tab(Tab::History);
                    print!("{}", view::render(&controller));
                }
                _ => println!("usage: tab predict|history"),
            },
            "history" => {
                controller.set_tab(Tab::History);
                print!("{}", view::render(&controller));
            }
            "show" => print!("{}", view::render(&controller)),
            "json" => {
                let records: Vec<_> = controller.history().iter().collect();
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            other => println!("unknown command `{}`, try `help`", other),
        }
    }
    Ok(())
}
