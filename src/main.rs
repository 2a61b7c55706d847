use clap::{Args, Parser, Subcommand, ValueEnum};
use genstudio::logger::{self, LogLevel, LoggerConfig};
use genstudio::{Config, EditMode, ImagePayload, Studio, Workbench};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "genstudio")]
#[command(about = "Enhance prompts, generate images and edit photos with Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Credential file (defaults to the user config directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored API key
    #[command(subcommand)]
    Key(KeyCommand),

    #[command(flatten)]
    Action(ActionCommand),
}

#[derive(Subcommand)]
enum ActionCommand {
    /// Rewrite a prompt with more visual detail
    Enhance {
        /// The prompt to enhance
        prompt: String,
    },

    /// Generate a new image from a prompt
    Generate(OutputArgs),

    /// Change the clothing or background of an existing image
    Edit {
        #[command(flatten)]
        output: OutputArgs,

        /// Image to edit: a PNG, JPEG or WebP file, or a data URI
        #[arg(short, long)]
        input: String,

        /// What to change
        #[arg(short, long, value_enum)]
        mode: EditModeArg,
    },
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Save an API key and verify it can initialize a client
    Set {
        /// Google AI Studio API key
        key: String,
    },
    /// Remove the stored API key
    Clear,
    /// Show whether an API key is stored
    Status,
}

#[derive(Args)]
struct OutputArgs {
    /// The text prompt
    prompt: String,

    /// Write the image here instead of printing a data URI. The extension
    /// is added from the image type when missing.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EditModeArg {
    ChangeCloth,
    ChangeBackground,
}

impl From<EditModeArg> for EditMode {
    fn from(arg: EditModeArg) -> Self {
        match arg {
            EditModeArg::ChangeCloth => EditMode::ChangeCloth,
            EditModeArg::ChangeBackground => EditMode::ChangeBackground,
        }
    }
}

const SETUP_PROMPT: &str = "No API key configured. Get one from https://aistudio.google.com/app/apikey and run `genstudio key set <KEY>`.";

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    let log_config = match (cli.log_json, cli.verbose) {
        (true, verbose) => {
            let config = LoggerConfig::production();
            let level = if verbose {
                LogLevel::Debug
            } else {
                config.min_level
            };
            config.with_level(level)
        }
        (false, true) => LoggerConfig::development(),
        (false, false) => LoggerConfig::new(),
    };
    logger::init_with_config(log_config)?;

    let mut config = Config::from_env();
    if let Some(path) = cli.store {
        config = config.with_credentials_path(path);
    }
    let mut studio = Studio::from_config(config)?;

    match cli.command {
        Commands::Key(command) => run_key_command(&mut studio, command),
        Commands::Action(action) => {
            if !studio.restore()? {
                eprintln!("{}", SETUP_PROMPT);
                return Ok(ExitCode::from(2));
            }
            run_action(&studio, action).await
        }
    }
}

async fn run_action(
    studio: &Studio,
    action: ActionCommand,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let workbench = Workbench::new();

    match action {
        ActionCommand::Enhance { prompt } => {
            workbench.set_prompt(prompt);
            let _timer = logger::timer("enhance");
            workbench.enhance(studio.gateway()).await?;

            let state = workbench.snapshot();
            if let Some(error) = state.error {
                eprintln!("Error: {}", error);
                return Ok(ExitCode::FAILURE);
            }
            println!("{}", state.prompt);
            Ok(ExitCode::SUCCESS)
        }
        ActionCommand::Generate(output) => {
            workbench.set_prompt(output.prompt);
            let _timer = logger::timer("generate");
            workbench
                .submit(studio.gateway(), EditMode::Generate)
                .await?;
            finish_image(&workbench, output.output)
        }
        ActionCommand::Edit {
            output,
            input,
            mode,
        } => {
            workbench.set_prompt(output.prompt);
            workbench.set_input_image(Some(load_input(&input)?));
            let _timer = logger::timer("edit");
            workbench.submit(studio.gateway(), mode.into()).await?;
            finish_image(&workbench, output.output)
        }
    }
}

fn load_input(input: &str) -> genstudio::Result<ImagePayload> {
    if input.starts_with("data:") {
        ImagePayload::from_data_uri(input)
    } else {
        ImagePayload::from_file(input)
    }
}

fn run_key_command(
    studio: &mut Studio,
    command: KeyCommand,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        KeyCommand::Set { key } => {
            studio.save(&key)?;
            println!("API key saved.");
        }
        KeyCommand::Clear => {
            studio.clear()?;
            println!("API key cleared.");
        }
        KeyCommand::Status => {
            if studio.restore()? {
                println!("API key configured.");
            } else {
                println!("{}", SETUP_PROMPT);
                return Ok(ExitCode::from(2));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn finish_image(
    workbench: &Workbench,
    output: Option<PathBuf>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let state = workbench.snapshot();
    if let Some(error) = state.error {
        eprintln!("Error: {}", error);
        return Ok(ExitCode::FAILURE);
    }

    let Some(image) = state.output_image else {
        eprintln!("Error: no image was returned");
        return Ok(ExitCode::FAILURE);
    };

    match output {
        Some(mut path) => {
            if path.extension().is_none() {
                path.set_extension(image.extension());
            }
            image.save(&path)?;
            println!("Saved {} to {}", image.mime_type, path.display());
        }
        None => println!("{}", image.to_data_uri()),
    }
    Ok(ExitCode::SUCCESS)
}
