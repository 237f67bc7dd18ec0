use clap::{Arg, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

use flem::config::Config;
use flem::fix_flow::{FixFlow, FlowOptions};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays clean for the prompt.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("flem")
        .about("Fix the last executed command using GPT")
        .long_about(
            "flem reads the most recent command from your bash history, \
             asks a language model for a corrected version, and offers to \
             run the fix in your shell",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Print the fixed command without executing it")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("set-api-key")
                .long("set-api-key")
                .help("Set the OpenAI API key")
                .value_name("API_KEY")
                .num_args(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Show configuration information")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // Handle configuration commands
    if let Some(api_key) = matches.get_one::<String>("set-api-key") {
        let mut config = Config::load()?;
        config.set_api_key(api_key.clone())?;
        println!("✅ API key saved successfully");
        return Ok(());
    }

    if matches.get_flag("config") {
        Config::show_config_info()?;
        return Ok(());
    }

    let options = FlowOptions {
        verbose: matches.get_flag("verbose"),
        dry_run: matches.get_flag("dry-run"),
    };

    info!("Starting flem with {:?}", options);

    let config = Config::load()?;
    let flow = FixFlow::new(options);
    let code = flow.run(&config).await?;

    // The one place the process exits with the flow's code.
    std::process::exit(code);
}
