//! Headless desktop shell (`desktop_shell`).
//!
//! Loads the app manifest, then launches apps or opens files the way desktop icons do and prints
//! the resulting window stack.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
    rc::Rc,
};

use desktop_app_contract::{AppId, LaunchOptions, WindowManager};
use desktop_runtime::{
    builtin_module_source,
    universal::OPTION_CURRENT_PATH,
    AppLauncher, DesktopWindowManager, LaunchItem, LaunchOutcome, ModalNoticeBoard, OpenDispatch,
    ShellConfig, ShellState, UniversalLauncher,
};
use futures::executor::block_on;
use platform_host::{ConfigLoader, FsFileContentSource, FsManifestSource};
use serde_json::Value;

const DEFAULT_CONFIG: &str = "shell.toml";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Apps,
    Launch { app_id: AppId, options: LaunchOptions },
    Open { item: LaunchItem, options: LaunchOptions },
}

#[derive(Debug, Clone, PartialEq)]
struct Invocation {
    config_path: Option<PathBuf>,
    command: Command,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || matches!(args[0].as_str(), "help" | "--help" | "-h") {
        print_usage();
        return ExitCode::from(2);
    }

    let result = parse_args(&args).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    eprintln!(
        "Usage: desktop_shell [--config FILE] <command> [args]\n\
         \n\
         Commands:\n\
           apps                          List apps from the manifest\n\
           launch <app-id> [key=value]   Launch an app with options\n\
           open <path-or-item>           Open a file, a folder (trailing /), or a JSON item\n"
    );
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut config_path = None;
    let mut rest = args;
    if let Some(first) = rest.first() {
        if first == "--config" {
            let path = rest
                .get(1)
                .ok_or_else(|| "--config requires a path".to_string())?;
            config_path = Some(PathBuf::from(path));
            rest = &rest[2..];
        }
    }

    let (cmd, tail) = rest
        .split_first()
        .ok_or_else(|| "missing command".to_string())?;
    let command = match cmd.as_str() {
        "apps" => Command::Apps,
        "launch" => {
            let (raw_id, pairs) = tail
                .split_first()
                .ok_or_else(|| "launch requires an app id".to_string())?;
            Command::Launch {
                app_id: AppId::new(raw_id.as_str())?,
                options: parse_options(pairs)?,
            }
        }
        "open" => {
            let target = tail
                .first()
                .ok_or_else(|| "open requires a path or item".to_string())?;
            let (item, options) = parse_open_target(target)?;
            Command::Open { item, options }
        }
        other => return Err(format!("unknown command: {other}")),
    };

    Ok(Invocation {
        config_path,
        command,
    })
}

/// Parses `key=value` pairs. Values that are valid JSON keep their type; others are strings.
fn parse_options(pairs: &[String]) -> Result<LaunchOptions, String> {
    let mut options = LaunchOptions::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got `{pair}`"))?;
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::from(raw));
        options.insert(key, value);
    }
    Ok(options)
}

fn parse_open_target(target: &str) -> Result<(LaunchItem, LaunchOptions), String> {
    if target.starts_with('{') || target.starts_with('"') {
        let value: Value =
            serde_json::from_str(target).map_err(|err| format!("invalid launch item: {err}"))?;
        return Ok((LaunchItem::from_value(&value)?, LaunchOptions::new()));
    }

    if let Some(folder) = target.strip_suffix('/') {
        return Ok((
            LaunchItem::Folder {
                name: folder.to_string(),
            },
            LaunchOptions::new(),
        ));
    }

    let (current, name) = match target.rsplit_once('/') {
        Some((current, name)) => (current, name),
        None => ("", target),
    };
    if name.is_empty() {
        return Err(format!("`{target}` does not name a file"));
    }
    let mut options = LaunchOptions::new();
    if !current.is_empty() {
        options.insert(OPTION_CURRENT_PATH, current);
    }
    Ok((
        LaunchItem::File {
            name: name.to_string(),
        },
        options,
    ))
}

/// Loads `--config` when given, otherwise `shell.toml` in the working directory if present.
fn load_config(config_path: Option<&Path>) -> Result<ShellConfig, String> {
    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG));
    let loader = ConfigLoader::<ShellConfig>::new(path);
    let loaded = match config_path {
        Some(_) => loader.load().map(Some),
        None => loader.load_optional(),
    };
    let Some(mut config) = loaded.map_err(|err| err.to_string())? else {
        return Ok(ShellConfig::default());
    };

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    if config.manifest_path.is_relative() {
        config.manifest_path = base.join(&config.manifest_path);
    }
    if config.content_root.is_relative() {
        config.content_root = base.join(&config.content_root);
    }
    Ok(config)
}

fn run(invocation: Invocation) -> Result<(), String> {
    let config = load_config(invocation.config_path.as_deref())?;
    let state = Rc::new(ShellState::from_config(
        &config,
        Rc::new(FsManifestSource::new(config.manifest_path.clone())),
        Rc::new(builtin_module_source()),
    ));
    block_on(state.load_catalog()).map_err(|err| err.to_string())?;

    let window_manager = Rc::new(DesktopWindowManager::new());
    let launcher = AppLauncher::new(
        Rc::clone(&state),
        window_manager.clone(),
        Rc::new(ModalNoticeBoard::new()),
        OpenDispatch::new(config.open_route_table()),
    );

    match invocation.command {
        Command::Apps => {
            for descriptor in state.catalog.all().iter() {
                let status = if descriptor.available {
                    ""
                } else {
                    " (coming soon)"
                };
                println!("{:<8}{}{status}", descriptor.id.as_str(), descriptor.name);
            }
            return Ok(());
        }
        Command::Launch { app_id, options } => {
            let outcome = block_on(launcher.launch_app(&app_id, options));
            print_outcome(&outcome);
            if let LaunchOutcome::Failed(err) = outcome {
                return Err(err.to_string());
            }
        }
        Command::Open { item, options } => {
            let universal = UniversalLauncher::new(
                launcher.clone(),
                Rc::new(FsFileContentSource::new(config.content_root.clone())),
            );
            if !block_on(universal.launch(&item, options)) {
                return Err(format!("could not open {item:?}"));
            }
        }
    }

    print_windows(window_manager.as_ref());
    Ok(())
}

fn print_outcome(outcome: &LaunchOutcome) {
    match outcome {
        LaunchOutcome::Focused {
            window_id,
            forwarded,
        } => println!("focused {window_id} (options forwarded: {forwarded})"),
        LaunchOutcome::Launched {
            window_id: Some(window_id),
        } => println!("launched in {window_id}"),
        LaunchOutcome::Launched { window_id: None } => println!("launched without a window"),
        LaunchOutcome::Unavailable => println!("app is not available yet"),
        LaunchOutcome::Failed(_) => {}
    }
}

fn print_windows(window_manager: &dyn WindowManager) {
    for window in window_manager.windows() {
        let focus = if window.is_focused { "*" } else { " " };
        println!("{focus} {} [{}] {}", window.id, window.z_index, window.title);
        for line in window.content.lines() {
            println!("    {line}");
        }
        if !window.footer_text.is_empty() {
            println!("    -- {}", window.footer_text);
        }
    }
}
