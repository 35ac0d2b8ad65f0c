// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use roteiro::app_config::{self, Config};
use roteiro::app_controller::Controller;
use roteiro::editor::{idea_segments, IdeaSegment};
use roteiro::errors::RecognitionError;
use roteiro::file_utils::{FileManager, STDIO_PATH};
use roteiro::language_utils;
use roteiro::script::{organize_translated, DialogueField, ScriptView};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliView {
    Full,
    Scenes,
    Dialogues,
}

impl From<CliView> for ScriptView {
    fn from(view: CliView) -> Self {
        match view {
            CliView::Full => ScriptView::Full,
            CliView::Scenes => ScriptView::Scenes,
            CliView::Dialogues => ScriptView::Dialogues,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliField {
    Character,
    Line,
}

impl From<CliField> for DialogueField {
    fn from(field: CliField) -> Self {
        match field {
            CliField::Character => DialogueField::Character,
            CliField::Line => DialogueField::Line,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VoiceSetting {
    On,
    Off,
    Status,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print or write the script in one of its text views
    Export {
        /// Which view to render
        #[arg(short, long, value_enum, default_value = "full")]
        view: CliView,

        /// Output file ('-' for stdout)
        #[arg(short, long, default_value = STDIO_PATH)]
        output: PathBuf,
    },

    /// Replace all scenes with a parsed full-script file ('-' for stdin)
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Translate the dialogues through the translation service
    Translate {
        /// Output file ('-' for stdout)
        #[arg(short, long, default_value = STDIO_PATH)]
        output: PathBuf,

        /// Group the translated lines by character
        #[arg(long)]
        organize: bool,

        /// Only output the spoken lines, without scene numbers or names
        #[arg(long)]
        spoken_only: bool,
    },

    /// Group an already translated dialogues file by character
    Organize {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Scene operations (indexes are 1-based)
    #[command(subcommand)]
    Scene(SceneCommand),

    /// Dialogue operations (indexes are 1-based)
    #[command(subcommand)]
    Dialogue(DialogueCommand),

    /// Show the notes, or replace them with TEXT
    Notes {
        text: Option<String>,
    },

    /// Idea list operations
    #[command(subcommand)]
    Idea(IdeaCommand),

    /// Counter operations
    #[command(subcommand)]
    Counter(CounterCommand),

    /// Save the current script under NAME
    Save {
        name: String,
    },

    /// List saved scripts
    Scripts,

    /// Replace the current script with a saved one
    Load {
        /// 1-based position in the saved-script list
        index: usize,
    },

    /// Delete a saved script
    DeleteScript {
        /// 1-based position in the saved-script list
        index: usize,
    },

    /// Clear scenes, notes and counter
    Clear,

    /// Turn the voice buttons on or off, or show the current setting
    Voice {
        #[arg(value_enum)]
        setting: VoiceSetting,
    },

    /// Show scene, dialogue and storage counts
    Stats,

    /// Generate shell completions for roteiro
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum SceneCommand {
    /// Add an empty scene at the end, or next to another one
    Add {
        /// Insert above this scene
        #[arg(long, conflicts_with = "below")]
        above: Option<usize>,

        /// Insert below this scene
        #[arg(long)]
        below: Option<usize>,

        /// Action line for the new scene
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a scene
    Delete { index: usize },
    /// Replace a scene's action line
    Content { index: usize, text: String },
    /// Move a scene one position
    Move {
        index: usize,
        #[arg(value_enum)]
        direction: Direction,
    },
}

#[derive(Subcommand, Debug)]
enum DialogueCommand {
    /// Append a dialogue to a scene
    Add {
        scene: usize,
        #[arg(long)]
        character: Option<String>,
        #[arg(long)]
        line: Option<String>,
    },
    /// Replace a dialogue field
    Set {
        scene: usize,
        dialogue: usize,
        #[arg(value_enum)]
        field: CliField,
        value: String,
    },
    /// Delete a dialogue
    Delete { scene: usize, dialogue: usize },
}

#[derive(Subcommand, Debug)]
enum IdeaCommand {
    /// Add an idea
    Add { text: String },
    /// List ideas, links highlighted
    List,
    /// Delete an idea
    Delete { index: usize },
}

#[derive(Subcommand, Debug)]
enum CounterCommand {
    /// Add one
    Inc,
    /// Back to zero
    Reset,
    /// Print the value
    Show,
    /// Simulate a button press held for the given time
    Press {
        #[arg(long, default_value_t = 0)]
        held_ms: u64,
    },
}

/// Roteiro - screenplay editor
///
/// Write scenes and dialogues, export them as a flat script and translate
/// the dialogues.
#[derive(Parser, Debug)]
#[command(name = "roteiro")]
#[command(version)]
#[command(about = "Screenplay editor with script export and dialogue translation")]
#[command(long_about = "Roteiro keeps a screenplay as numbered scenes with dialogues in a local store.

EXAMPLES:
    roteiro scene add --content \"EXT. PRAIA\"  # Add a scene
    roteiro dialogue add 1 --character ana --line \"Chegamos.\"
    roteiro export --view dialogues             # Print the dialogues only
    roteiro import roteiro.txt                  # Replace scenes from a script file
    roteiro translate --organize -o es.txt      # Translate and group by character
    roteiro completions bash > roteiro.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger; the ceiling stays at Trace, `set_max_level` filters
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "roteiro", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    let config = load_config(Path::new(&cli.config), cli.log_level)?;

    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let mut controller = Controller::open(config)?;
    run_command(&mut controller, cli.command).await
}

// @loads: Config file, writing a default one when missing
fn load_config(path: &Path, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if path.exists() {
        Config::from_file(path).context("Configuration validation failed")?
    } else {
        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        config
    };

    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    Ok(config)
}

fn scene_id_at(controller: &Controller, index: usize) -> Result<String> {
    index
        .checked_sub(1)
        .and_then(|i| controller.editor().scenes().get(i))
        .map(|scene| scene.id.clone())
        .ok_or_else(|| anyhow!("No scene {}", index))
}

fn dialogue_id_at(controller: &Controller, scene: usize, dialogue: usize) -> Result<(String, String)> {
    let scene_id = scene_id_at(controller, scene)?;
    let dialogue_id = controller
        .editor()
        .state()
        .scene(&scene_id)
        .and_then(|s| dialogue.checked_sub(1).and_then(|i| s.dialogues.get(i)))
        .map(|d| d.id.clone())
        .ok_or_else(|| anyhow!("No dialogue {} in scene {}", dialogue, scene))?;
    Ok((scene_id, dialogue_id))
}

fn zero_based(index: usize, what: &str) -> Result<usize> {
    index.checked_sub(1).ok_or_else(|| anyhow!("{} indexes start at 1", what))
}

async fn run_command(controller: &mut Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Export { view, output } => {
            let text = controller.editor().render(view.into());
            FileManager::write_to_file(&output, &text)?;
        }

        Commands::Import { file } => {
            let text = FileManager::read_to_string(&file)?;
            controller.replace_from_full_script(&text);
            let stats = controller.editor().stats();
            info!("Imported {} scenes with {} dialogues", stats.scenes, stats.dialogues);
        }

        Commands::Translate { output, organize, spoken_only } => {
            let translation = &controller.config().translation;
            info!(
                "Translating dialogues from {} to {}",
                language_utils::get_language_name(&translation.source_language)?,
                language_utils::get_language_name(&translation.target_language)?
            );

            let progress_bar = ProgressBar::new(0);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {eta}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            progress_bar.set_style(style.progress_chars("█▓▒░"));

            let pb = progress_bar.clone();
            let stats = controller
                .translate_dialogues_with_progress(move |done, total| {
                    pb.set_length(total as u64);
                    pb.set_position(done as u64);
                })
                .await;
            progress_bar.finish_and_clear();
            info!("{}", stats.summary());

            if organize {
                controller.translated_mut().organize();
            }
            let view = controller.translated();
            let text = if spoken_only { view.spoken_lines() } else { view.text().to_string() };
            FileManager::write_to_file(&output, &text)?;
        }

        Commands::Organize { file } => {
            let text = FileManager::read_to_string(&file)?;
            print!("{}", organize_translated(&text));
        }

        Commands::Scene(command) => run_scene_command(controller, command)?,
        Commands::Dialogue(command) => run_dialogue_command(controller, command)?,

        Commands::Notes { text } => match text {
            Some(text) => controller.editor_mut().set_notes(text),
            None => println!("{}", controller.editor().state().notes),
        },

        Commands::Idea(command) => match command {
            IdeaCommand::Add { text } => {
                if !controller.editor_mut().add_idea(&text) {
                    warn!("Empty idea ignored");
                }
            }
            IdeaCommand::List => {
                for (i, idea) in controller.editor().state().ideas.iter().enumerate() {
                    let rendered: String = idea_segments(idea)
                        .into_iter()
                        .map(|segment| match segment {
                            IdeaSegment::Text(text) => text.to_string(),
                            IdeaSegment::Link(url) => format!("\x1B[4;34m{}\x1B[0m", url),
                        })
                        .collect();
                    println!("{}. {}", i + 1, rendered);
                }
            }
            IdeaCommand::Delete { index } => {
                let index = zero_based(index, "Idea")?;
                controller
                    .editor_mut()
                    .delete_idea(index)
                    .ok_or_else(|| anyhow!("No idea {}", index + 1))?;
            }
        },

        Commands::Counter(command) => {
            let editor = controller.editor_mut();
            match command {
                CounterCommand::Inc => {
                    editor.increment_counter();
                }
                CounterCommand::Reset => editor.reset_counter(),
                CounterCommand::Show => {}
                CounterCommand::Press { held_ms } => {
                    editor.press_counter(Duration::from_millis(held_ms));
                }
            }
            println!("{}", controller.editor().state().counter);
        }

        Commands::Save { name } => {
            controller.editor_mut().save_script(&name)?;
            info!("Script saved as {}", name.trim());
        }

        Commands::Scripts => {
            for (i, script) in controller.editor().state().saved_scripts.iter().enumerate() {
                println!(
                    "{}. {} ({} scenes, saved {})",
                    i + 1,
                    script.name,
                    script.data.scenes.len(),
                    script.data.saved_at
                );
            }
        }

        Commands::Load { index } => {
            controller.load_script(zero_based(index, "Script")?)?;
            info!("Script {} loaded", index);
        }

        Commands::DeleteScript { index } => {
            let removed = controller.editor_mut().delete_script(zero_based(index, "Script")?)?;
            info!("Deleted saved script {}", removed.name);
        }

        Commands::Clear => {
            controller.clear_script();
            info!("Script cleared");
        }

        Commands::Voice { setting } => match setting {
            VoiceSetting::On => controller.set_voice_buttons_enabled(true).await,
            VoiceSetting::Off => controller.set_voice_buttons_enabled(false).await,
            VoiceSetting::Status => {
                let enabled = controller.sync_voice_preference().await;
                println!("{}", if enabled { "on" } else { "off" });
                if !controller.recognition().is_supported() {
                    warn!("{}", RecognitionError::Unsupported);
                }
            }
        },

        Commands::Stats => {
            let stats = controller.editor().stats();
            let state = controller.editor().state();
            println!("Scenes: {}", stats.scenes);
            println!("Dialogues: {}", stats.dialogues);
            println!("Ideas: {}", state.ideas.len());
            println!("Saved scripts: {}", state.saved_scripts.len());
            println!("{}", controller.repository().stats()?);
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn run_scene_command(controller: &mut Controller, command: SceneCommand) -> Result<()> {
    match command {
        SceneCommand::Add { above, below, content } => {
            let editor = controller.editor_mut();
            let scene_id = match (above, below) {
                (Some(index), _) => editor.insert_scene_above(zero_based(index, "Scene")?),
                (None, Some(index)) => editor.insert_scene_below(zero_based(index, "Scene")?),
                (None, None) => editor.add_scene(),
            };
            if let Some(content) = content {
                editor.set_scene_content(&scene_id, content);
            }
            let position = editor.scenes().iter().position(|s| s.id == scene_id).unwrap_or(0);
            println!("{}", position + 1);
        }
        SceneCommand::Delete { index } => {
            let scene_id = scene_id_at(controller, index)?;
            controller.delete_scene(&scene_id);
        }
        SceneCommand::Content { index, text } => {
            let scene_id = scene_id_at(controller, index)?;
            controller.editor_mut().set_scene_content(&scene_id, text);
        }
        SceneCommand::Move { index, direction } => {
            let index = zero_based(index, "Scene")?;
            let moved = match direction {
                Direction::Up => controller.editor_mut().move_scene_up(index),
                Direction::Down => controller.editor_mut().move_scene_down(index),
            };
            if !moved {
                warn!("Scene {} cannot move {:?}", index + 1, direction);
            }
        }
    }
    Ok(())
}

fn run_dialogue_command(controller: &mut Controller, command: DialogueCommand) -> Result<()> {
    match command {
        DialogueCommand::Add { scene, character, line } => {
            let scene_id = scene_id_at(controller, scene)?;
            let editor = controller.editor_mut();
            let dialogue_id = editor
                .add_dialogue(&scene_id)
                .ok_or_else(|| anyhow!("No scene {}", scene))?;
            if let Some(character) = character {
                editor.set_dialogue_field(&scene_id, &dialogue_id, DialogueField::Character, &character);
            }
            if let Some(line) = line {
                editor.set_dialogue_field(&scene_id, &dialogue_id, DialogueField::Line, &line);
            }
        }
        DialogueCommand::Set { scene, dialogue, field, value } => {
            let (scene_id, dialogue_id) = dialogue_id_at(controller, scene, dialogue)?;
            controller
                .editor_mut()
                .set_dialogue_field(&scene_id, &dialogue_id, field.into(), &value);
        }
        DialogueCommand::Delete { scene, dialogue } => {
            let (scene_id, dialogue_id) = dialogue_id_at(controller, scene, dialogue)?;
            controller.delete_dialogue(&scene_id, &dialogue_id);
        }
    }
    Ok(())
}
