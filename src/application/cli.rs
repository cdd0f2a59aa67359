use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::parse_tags;
use crate::domain::models::InitOutcome;
use crate::domain::models::NewSession;
use crate::domain::models::NewStep;
use crate::domain::models::SessionPatch;
use crate::domain::models::StepPatch;
use crate::domain::models::StorageName;
use crate::domain::services::flow_map;
use crate::domain::services::AppState;
use crate::domain::services::WorkflowStorage;
use crate::domain::services::STORAGE_KEY;
use crate::infrastructure::seeds::SeedManager;
use crate::infrastructure::storage::StorageManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn workflow_storage() -> Result<WorkflowStorage> {
    let storage = StorageManager::from_config()?;
    return Ok(WorkflowStorage::new(storage));
}

/// Every data command starts here, so the store is always initialized
/// before it is read or mutated.
async fn load_app_state() -> Result<AppState> {
    let seed = SeedManager::get(&Config::get(ConfigKey::Seed));
    let (app_state, outcome) = AppState::new(workflow_storage()?, &seed).await?;

    match outcome {
        InitOutcome::AlreadyInitialized => {}
        InitOutcome::Seeded(session_id) => {
            eprintln!("Initialized storage with sample session {session_id}");
        }
        InitOutcome::Empty => {
            eprintln!(
                "Could not load seed data from {}, started with empty storage",
                seed.describe()
            );
        }
    }

    return Ok(app_state);
}

fn print_sessions_list(app_state: &AppState) {
    if app_state.sessions.is_empty() {
        println!("There are no sessions available. You should create your first one!");
        return;
    }

    for session in app_state.sessions.iter() {
        let is_current = app_state.current_session_id.as_deref() == Some(&session.session_id);
        let line = flow_map::format_session_line(session, is_current);
        if is_current {
            println!("{}", Paint::green(line).bold());
        } else {
            println!("{line}");
        }
    }
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!("Config file already exists at {config_file_path_str}"));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes()).await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn get_string(matches: &ArgMatches, id: &str) -> Option<String> {
    return matches.get_one::<String>(id).map(|e| return e.to_string());
}

fn new_step_from_matches(matches: &ArgMatches) -> NewStep {
    return NewStep {
        actor: get_string(matches, "actor").unwrap_or_default(),
        skill: get_string(matches, "skill"),
        tool: get_string(matches, "tool").unwrap_or_default(),
        input_label: get_string(matches, "input").unwrap_or_default(),
        output_label: get_string(matches, "output").unwrap_or_default(),
        summary: get_string(matches, "summary"),
        tags: get_string(matches, "tags").and_then(|e| return parse_tags(&e)),
    };
}

fn step_patch_from_matches(matches: &ArgMatches) -> StepPatch {
    let mut skill = get_string(matches, "skill").map(Some);
    if matches.get_flag("no-skill") {
        skill = Some(None);
    }

    return StepPatch {
        actor: get_string(matches, "actor"),
        skill,
        tool: get_string(matches, "tool"),
        input_label: get_string(matches, "input"),
        output_label: get_string(matches, "output"),
        summary: get_string(matches, "summary"),
        tags: get_string(matches, "tags").map(|e| return parse_tags(&e).unwrap_or_default()),
    };
}

fn select_session_interactive(app_state: &mut AppState) -> Result<()> {
    if app_state.sessions.is_empty() {
        println!("There are no sessions available. You should create your first one!");
        return Ok(());
    }

    let session_options = app_state
        .sessions
        .iter()
        .map(|session| {
            let is_current = app_state.current_session_id.as_deref() == Some(&session.session_id);
            return flow_map::format_session_line(session, is_current);
        })
        .collect::<Vec<String>>();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which session would you like to open?")
        .default(0)
        .items(&session_options)
        .interact_opt()?;

    if let Some(idx) = selection {
        let session_id = app_state.sessions[idx].session_id.to_string();
        app_state.select_session(Some(&session_id))?;
        println!("Selected session {session_id}");
    }

    return Ok(());
}

async fn run_sessions(matches: &ArgMatches) -> Result<()> {
    let mut app_state = load_app_state().await?;

    match matches.subcommand() {
        Some(("list", _)) => {
            print_sessions_list(&app_state);
        }
        Some(("show", show_matches)) => {
            let session_id = app_state.resolve_session_id(
                show_matches
                    .get_one::<String>("session-id")
                    .map(|e| return e.as_str()),
            )?;
            if let Some(session) = app_state.session(&session_id) {
                println!("{}", flow_map::render_session(session));
            }
        }
        Some(("create", create_matches)) => {
            let session_id = app_state.add_session(NewSession {
                title: get_string(create_matches, "title").unwrap_or_default(),
                description: get_string(create_matches, "description"),
            })?;
            println!("Created session {session_id}");
        }
        Some(("update", update_matches)) => {
            let patch = SessionPatch {
                title: get_string(update_matches, "title"),
                description: get_string(update_matches, "description"),
            };
            if patch.is_empty() {
                bail!("Nothing to update. Pass --title and/or --description");
            }

            let session_id = app_state.resolve_session_id(
                update_matches
                    .get_one::<String>("session-id")
                    .map(|e| return e.as_str()),
            )?;
            app_state.update_session(&session_id, patch)?;
            println!("Updated session {session_id}");
        }
        Some(("delete", delete_matches)) => {
            let session_id = app_state.resolve_session_id(
                delete_matches
                    .get_one::<String>("session-id")
                    .map(|e| return e.as_str()),
            )?;
            app_state.delete_session(&session_id)?;
            println!("Deleted session {session_id}");
        }
        Some(("duplicate", duplicate_matches)) => {
            let session_id = app_state.resolve_session_id(
                duplicate_matches
                    .get_one::<String>("session-id")
                    .map(|e| return e.as_str()),
            )?;
            let copy_id = app_state.duplicate_session(&session_id)?;
            println!("Duplicated session {session_id} as {copy_id}");
        }
        Some(("select", select_matches)) => {
            if select_matches.get_flag("none") {
                app_state.select_session(None)?;
                println!("Cleared the current session");
            } else if let Some(prefix) = select_matches.get_one::<String>("session-id") {
                let session_id = app_state.resolve_session_id(Some(prefix))?;
                app_state.select_session(Some(&session_id))?;
                println!("Selected session {session_id}");
            } else {
                select_session_interactive(&mut app_state)?;
            }
        }
        _ => {
            subcommand_sessions().print_long_help()?;
        }
    }

    return Ok(());
}

async fn run_steps(matches: &ArgMatches) -> Result<()> {
    let (name, step_matches) = match matches.subcommand() {
        Some(res) => res,
        None => {
            subcommand_steps().print_long_help()?;
            return Ok(());
        }
    };

    let mut app_state = load_app_state().await?;
    let session_id = app_state.resolve_session_id(
        step_matches
            .get_one::<String>("session-id")
            .map(|e| return e.as_str()),
    )?;

    if name == "add" {
        let step_id = app_state.add_step(&session_id, new_step_from_matches(step_matches))?;
        if let Some(step) = app_state
            .session(&session_id)
            .and_then(|session| return session.step(&step_id))
        {
            println!("Added step {} at position {}", step.id, step.order);
        }
        return Ok(());
    }

    let prefix = match step_matches.get_one::<String>("step-id") {
        Some(prefix) => prefix,
        None => bail!("A step id is required"),
    };
    let step_id = app_state.resolve_step_id(&session_id, prefix)?;

    match name {
        "show" => {
            if let Some(step) = app_state
                .session(&session_id)
                .and_then(|session| return session.step(&step_id))
            {
                println!("{}", flow_map::render_step_detail(step));
            }
        }
        "update" => {
            let patch = step_patch_from_matches(step_matches);
            if patch.is_empty() {
                bail!("Nothing to update. Pass at least one step field");
            }
            app_state.update_step(&session_id, &step_id, patch)?;
            println!("Updated step {step_id}");
        }
        "delete" => {
            app_state.delete_step(&session_id, &step_id)?;
            println!("Deleted step {step_id}");
        }
        "move-left" => {
            if app_state.move_step_left(&session_id, &step_id)? {
                println!("Moved step {step_id} left");
            } else {
                println!("Step {step_id} is already first");
            }
        }
        _ => {
            subcommand_steps().print_long_help()?;
        }
    }

    return Ok(());
}

fn arg_session_id(help: &'static str) -> Arg {
    return Arg::new("session-id")
        .short('i')
        .long("id")
        .help(help)
        .num_args(1);
}

fn arg_step_session() -> Arg {
    return Arg::new("session-id")
        .short('s')
        .long("session")
        .help("Session ID or unique prefix. Defaults to the current session.")
        .num_args(1);
}

fn arg_step_id() -> Arg {
    return Arg::new("step-id")
        .short('i')
        .long("id")
        .help("Step ID or unique prefix.")
        .num_args(1)
        .required(true);
}

fn args_step_fields(cmd: Command, required: bool) -> Command {
    return cmd
        .arg(
            Arg::new("actor")
                .long("actor")
                .help("Actor, coach or role performing the step.")
                .num_args(1)
                .required(required),
        )
        .arg(
            Arg::new("tool")
                .long("tool")
                .help("Execution tool or environment.")
                .num_args(1)
                .required(required),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .help("One line description of the input.")
                .num_args(1)
                .required(required),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .help("One line description of the output.")
                .num_args(1)
                .required(required),
        )
        .arg(
            Arg::new("skill")
                .long("skill")
                .help("Skill used for the step, if any.")
                .num_args(1),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .help("Brief description of the action.")
                .num_args(1),
        )
        .arg(
            Arg::new("tags")
                .long("tags")
                .help("Comma separated tags.")
                .num_args(1),
        );
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for stepmap")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running stepmap with environment variable RUST_LOG=stepmap")
        )
        .subcommand(
            Command::new("data-path").about("Output path to the stored workflow document when using file storage.")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_sessions() -> Command {
    return Command::new("sessions")
        .about("Manage workflow sessions.")
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List all sessions, newest first. The current session is marked with '*'."))
        .subcommand(
            Command::new("show")
                .about("Show a session and its flow map. Defaults to the current session.")
                .arg(arg_session_id("Session ID or unique prefix.")),
        )
        .subcommand(
            Command::new("create")
                .about("Create a new session and make it current.")
                .arg(
                    Arg::new("title")
                        .short('t')
                        .long("title")
                        .help("Session title.")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("description")
                        .short('d')
                        .long("description")
                        .help("Session description.")
                        .num_args(1),
                ),
        )
        .subcommand(
            Command::new("update")
                .about("Update a session's title or description. Defaults to the current session.")
                .arg(arg_session_id("Session ID or unique prefix."))
                .arg(
                    Arg::new("title")
                        .short('t')
                        .long("title")
                        .help("New session title.")
                        .num_args(1),
                )
                .arg(
                    Arg::new("description")
                        .short('d')
                        .long("description")
                        .help("New session description. Pass an empty string to clear it.")
                        .num_args(1),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a session and all of its steps.")
                .arg(arg_session_id("Session ID or unique prefix.").required(true)),
        )
        .subcommand(
            Command::new("duplicate")
                .about("Copy a session with fresh ids and make the copy current.")
                .arg(arg_session_id("Session ID or unique prefix.").required(true)),
        )
        .subcommand(
            Command::new("select")
                .about("Select the current session. Omit passing any session ID to load an interactive selection.")
                .arg(arg_session_id("Session ID or unique prefix."))
                .arg(
                    Arg::new("none")
                        .long("none")
                        .help("Clear the current session.")
                        .action(ArgAction::SetTrue),
                )
                .group(ArgGroup::new("select-args").args(["session-id", "none"])),
        );
}

fn subcommand_steps() -> Command {
    return Command::new("steps")
        .about("Manage the steps of a session.")
        .arg_required_else_help(true)
        .subcommand(args_step_fields(
            Command::new("add")
                .about("Append a step after the last one.")
                .arg(arg_step_session()),
            true,
        ))
        .subcommand(
            Command::new("show")
                .about("Show a step's details.")
                .arg(arg_step_session())
                .arg(arg_step_id()),
        )
        .subcommand(
            args_step_fields(
                Command::new("update")
                    .about("Update a step's fields. Order and timestamp never change.")
                    .arg(arg_step_session())
                    .arg(arg_step_id()),
                false,
            )
            .arg(
                Arg::new("no-skill")
                    .long("no-skill")
                    .help("Clear the step's skill.")
                    .action(ArgAction::SetTrue)
                    .conflicts_with("skill"),
            ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a step and renumber the rest.")
                .arg(arg_step_session())
                .arg(arg_step_id()),
        )
        .subcommand(
            Command::new("move-left")
                .about("Swap a step with the one before it.")
                .arg(arg_step_session())
                .arg(arg_step_id()),
        );
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("stepmap")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .subcommand(Command::new("init").about("Initialize storage from the seed source. Does nothing when data already exists."))
        .subcommand(Command::new("reset").about("Remove the stored workflow document. The next command seeds it again."))
        .subcommand(subcommand_sessions())
        .subcommand(subcommand_steps())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("STEPMAP_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::DataDir.to_string())
                .long(ConfigKey::DataDir.to_string())
                .env("STEPMAP_DATA_DIR")
                .num_args(1)
                .help(format!("Directory holding the workflow document. [default: {}]", Config::default(ConfigKey::DataDir)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Seed.to_string())
                .long(ConfigKey::Seed.to_string())
                .env("STEPMAP_SEED")
                .num_args(1)
                .help(format!("Where the first session comes from when storage is empty: \"embedded\", \"none\", a file path or an http(s) URL. [default: {}]", Config::default(ConfigKey::Seed)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Storage.to_string())
                .long(ConfigKey::Storage.to_string())
                .env("STEPMAP_STORAGE")
                .num_args(1)
                .help(format!("Storage backend for the workflow document. [default: {}]", Config::default(ConfigKey::Storage)))
                .value_parser(PossibleValuesParser::new(StorageName::VARIANTS))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::StorageQuota.to_string())
                .long(ConfigKey::StorageQuota.to_string())
                .env("STEPMAP_STORAGE_QUOTA")
                .num_args(1)
                .help(format!("Maximum size in bytes of the stored workflow document. 0 disables the limit. [default: {}]", Config::default(ConfigKey::StorageQuota)))
                .global(true),
        );
}

pub async fn parse() -> Result<()> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => match debug_matches.subcommand() {
            Some(("log-path", _)) => {
                println!("{}", Config::log_dir().join("debug.log").display());
            }
            Some(("data-path", data_matches)) => {
                Config::load(build(), vec![&matches, debug_matches, data_matches]).await?;
                let data_path = path::PathBuf::from(Config::get(ConfigKey::DataDir))
                    .join(format!("{STORAGE_KEY}.json"));
                println!("{}", data_path.display());
            }
            Some(("enum-config", _)) => {
                println!("{}", ConfigKey::VARIANTS.join("\n"));
            }
            _ => {
                subcommand_debug().print_long_help()?;
            }
        },
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
            }
            _ => {
                subcommand_config().print_long_help()?;
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
        }
        Some(("init", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let app_state = load_app_state().await?;
            match app_state.current_session() {
                Some(session) => println!("{}", flow_map::format_session_line(session, true)),
                None => println!("Storage is ready with {} sessions", app_state.sessions.len()),
            }
        }
        Some(("reset", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            workflow_storage()?.clear()?;
            println!("Removed stored workflow data");
        }
        Some(("sessions", subcmd_matches)) => {
            let mut arg_matches = vec![&matches, subcmd_matches];
            if let Some((_, nested)) = subcmd_matches.subcommand() {
                arg_matches.push(nested);
            }
            Config::load(build(), arg_matches).await?;
            run_sessions(subcmd_matches).await?;
        }
        Some(("steps", subcmd_matches)) => {
            let mut arg_matches = vec![&matches, subcmd_matches];
            if let Some((_, nested)) = subcmd_matches.subcommand() {
                arg_matches.push(nested);
            }
            Config::load(build(), arg_matches).await?;
            run_steps(subcmd_matches).await?;
        }
        _ => {
            build().print_long_help()?;
        }
    }

    return Ok(());
}
