mod support;

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::{
    AppCapability, LaunchOptions, OpenRequest, WindowManager, OPTION_CONTENT, OPTION_FILE_NAME,
    OPTION_PATH,
};
use desktop_runtime::{builtin_module_source, LaunchError, LaunchOutcome, LoadError};
use futures::{
    executor::{block_on, LocalPool},
    task::LocalSpawnExt,
};
use platform_host::StaticModuleSource;
use pretty_assertions::assert_eq;
use support::{app, scripted_module, GatedModuleSource, Script, Shell, WmCall};

fn weather_shell(script: Script) -> (Shell, StaticModuleSource, Rc<support::AppLog>) {
    let source = StaticModuleSource::new();
    let (module, log) = scripted_module("app4", "WeatherApp", false, script);
    source.register_module(app("app4"), module);
    let shell = Shell::with_source(Rc::new(source.clone()));
    (shell, source, log)
}

fn launched_window(outcome: &LaunchOutcome) -> desktop_app_contract::WindowId {
    match outcome {
        LaunchOutcome::Launched {
            window_id: Some(window_id),
        } => *window_id,
        other => panic!("expected a fresh launch with a window, got {other:?}"),
    }
}

#[test]
fn overlapping_launches_create_a_single_instance() {
    let source = StaticModuleSource::new();
    let (module, log) = scripted_module("app4", "WeatherApp", false, Script::default());
    source.register_module(app("app4"), module);
    let (gated, release) = GatedModuleSource::new(source.clone());
    let shell = Shell::with_source(Rc::new(gated));

    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let mut pool = LocalPool::new();
    for _ in 0..3 {
        let launcher = shell.launcher.clone();
        let outcomes = outcomes.clone();
        pool.spawner()
            .spawn_local(async move {
                let outcome = launcher.launch_app(&app("app4"), LaunchOptions::new()).await;
                outcomes.borrow_mut().push(outcome);
            })
            .expect("spawn launch");
    }

    pool.run_until_stalled();
    assert_eq!(shell.instance_count("app4"), 0);
    assert!(outcomes.borrow().is_empty());

    release.send(()).expect("release module load");
    pool.run();

    let outcomes = outcomes.borrow();
    let (launched, focused): (Vec<_>, Vec<_>) = outcomes
        .iter()
        .cloned()
        .partition(|outcome| matches!(outcome, LaunchOutcome::Launched { .. }));
    assert_eq!(launched.len(), 1);
    let window_id = launched_window(&launched[0]);
    assert_eq!(
        focused,
        vec![
            LaunchOutcome::Focused {
                window_id,
                forwarded: false,
            };
            2
        ]
    );
    assert_eq!(shell.instance_count("app4"), 1);
    assert_eq!(log.built.get(), 1);
    assert_eq!(log.inits.get(), 1);
    assert_eq!(source.executions(&app("app4")), 1);
    assert_eq!(shell.window_manager.windows_for_app(&app("app4")).len(), 1);
}

#[test]
fn relaunch_focuses_instead_of_duplicating() {
    let (shell, source, log) = weather_shell(Script::default());
    let first = block_on(shell.launcher.launch_app(&app("app4"), LaunchOptions::new()));
    let window_id = launched_window(&first);

    shell.window_manager.clear_calls();
    let second = block_on(shell.launcher.launch_app(&app("app4"), LaunchOptions::new()));

    assert_eq!(
        second,
        LaunchOutcome::Focused {
            window_id,
            forwarded: false,
        }
    );
    assert_eq!(shell.window_manager.calls(), vec![WmCall::Focus(window_id)]);
    assert_eq!(source.executions(&app("app4")), 1);
    assert_eq!(log.built.get(), 1);
    assert_eq!(log.inits.get(), 1);
    assert_eq!(log.opens.borrow().len(), 1);
}

#[test]
fn relaunch_restores_a_minimized_window() {
    let (shell, _, log) = weather_shell(Script::default());
    let window_id = launched_window(&block_on(
        shell.launcher.launch_app(&app("app4"), LaunchOptions::new()),
    ));
    shell.window_manager.minimize_window(window_id);

    shell.window_manager.clear_calls();
    block_on(shell.launcher.launch_app(&app("app4"), LaunchOptions::new()));

    assert_eq!(
        shell.window_manager.focus_and_restore_calls(),
        vec![WmCall::Restore(window_id)]
    );
    assert!(!shell
        .window_manager
        .window(window_id)
        .expect("window")
        .is_minimized);
    assert_eq!(log.inits.get(), 1);
}

#[test]
fn window_that_vanished_without_callback_triggers_a_fresh_launch() {
    let (shell, source, log) = weather_shell(Script::default());
    let stale = launched_window(&block_on(
        shell.launcher.launch_app(&app("app4"), LaunchOptions::new()),
    ));

    shell.window_manager.close_silently(stale);
    assert_eq!(shell.instance_count("app4"), 1);

    let outcome = block_on(shell.launcher.launch_app(&app("app4"), LaunchOptions::new()));
    let fresh = launched_window(&outcome);

    assert_ne!(fresh, stale);
    assert!(!shell
        .window_manager
        .calls()
        .iter()
        .any(|call| matches!(call, WmCall::Focus(id) | WmCall::Restore(id) if *id == stale)));
    assert_eq!(log.built.get(), 2);
    assert_eq!(log.inits.get(), 2);
    assert_eq!(log.opens.borrow().len(), 2);
    assert_eq!(source.executions(&app("app4")), 1);
    assert_eq!(shell.instance_count("app4"), 1);
}

#[test]
fn window_owned_by_untracking_app_is_adopted_by_scan() {
    let script = Script {
        tracks_window: false,
        ..Script::default()
    };
    let (shell, _, log) = weather_shell(script);
    let window_id = launched_window(&block_on(
        shell.launcher.launch_app(&app("app4"), LaunchOptions::new()),
    ));

    assert_eq!(
        shell
            .launcher
            .state()
            .instances
            .get(&app("app4"))
            .expect("instance")
            .window_id,
        Some(window_id)
    );

    shell.window_manager.close_window(window_id);
    assert_eq!(shell.instance_count("app4"), 0);

    block_on(shell.launcher.launch_app(&app("app4"), LaunchOptions::new()));
    assert_eq!(log.built.get(), 2);
}

#[test]
fn closing_a_window_evicts_and_next_launch_reuses_cached_module() {
    let (shell, source, log) = weather_shell(Script::default());
    let window_id = launched_window(&block_on(
        shell.launcher.launch_app(&app("app4"), LaunchOptions::new()),
    ));

    shell.window_manager.close_window(window_id);
    assert_eq!(shell.instance_count("app4"), 0);

    let outcome = block_on(shell.launcher.launch_app(&app("app4"), LaunchOptions::new()));
    assert!(matches!(outcome, LaunchOutcome::Launched { .. }));
    assert_eq!(source.executions(&app("app4")), 1);
    assert_eq!(log.built.get(), 2);
}

#[test]
fn unavailable_app_shows_notice_and_never_loads() {
    let source = StaticModuleSource::new();
    let (module, log) = scripted_module("app7", "ScaffoldApp", false, Script::default());
    source.register_module(app("app7"), module);
    let shell = Shell::with_source(Rc::new(source.clone()));

    for expected_notices in 1..=2 {
        let outcome = block_on(shell.launcher.launch_app(&app("app7"), LaunchOptions::new()));
        assert_eq!(outcome, LaunchOutcome::Unavailable);
        assert_eq!(shell.notices.presented_count(), expected_notices);
    }

    let notice = shell.notices.current().expect("notice open");
    assert_eq!(notice.app_name, "Scaffold");
    assert_eq!(source.executions(&app("app7")), 0);
    assert!(shell.launcher.state().modules.cached(&app("app7")).is_none());
    assert_eq!(log.built.get(), 0);
    assert_eq!(shell.instance_count("app7"), 0);
}

#[test]
fn failed_init_is_not_registered_and_not_retried() {
    let script = Script {
        fail_init: true,
        ..Script::default()
    };
    let (shell, _, log) = weather_shell(script);

    let outcome = block_on(shell.launcher.launch_app(&app("app4"), LaunchOptions::new()));
    assert_eq!(
        outcome,
        LaunchOutcome::Failed(LaunchError::InitializationFailure {
            app_id: app("app4"),
            reason: "init refused".to_string(),
        })
    );
    assert_eq!(log.inits.get(), 1);
    assert!(log.opens.borrow().is_empty());
    assert_eq!(shell.instance_count("app4"), 0);
}

#[test]
fn missing_entry_point_fails_without_touching_the_registry() {
    let source = StaticModuleSource::new();
    let (module, _) = scripted_module("app4", "ForecastApp", false, Script::default());
    source.register_module(app("app4"), module);
    let shell = Shell::with_source(Rc::new(source));

    let outcome = block_on(shell.launcher.launch_app(&app("app4"), LaunchOptions::new()));
    assert_eq!(
        outcome,
        LaunchOutcome::Failed(LaunchError::Load(LoadError::EntryPointMissing {
            app_id: app("app4"),
            entry_point: "WeatherApp".to_string(),
        }))
    );
    assert!(shell.launcher.state().instances.is_empty());
}

#[test]
fn notes_options_route_to_the_same_instance() {
    let source = StaticModuleSource::new();
    let script = Script {
        capabilities: &[AppCapability::FileOpenable],
        ..Script::default()
    };
    let (module, log) = scripted_module("app3", "NotesApp", true, script);
    source.register_module(app("app3"), module);
    let shell = Shell::with_source(Rc::new(source));

    let todo = |content: &str| {
        LaunchOptions::new()
            .with(OPTION_FILE_NAME, "todo.txt")
            .with(OPTION_CONTENT, content)
    };
    let first = block_on(shell.launcher.launch_app(&app("app3"), todo("buy milk")));
    let window_id = launched_window(&first);
    let second = block_on(shell.launcher.launch_app(&app("app3"), todo("updated")));

    assert_eq!(
        second,
        LaunchOutcome::Focused {
            window_id,
            forwarded: true,
        }
    );
    assert_eq!(log.built.get(), 1);
    assert_eq!(
        *log.opens.borrow(),
        vec![
            OpenRequest::File {
                file_name: Some("todo.txt".to_string()),
                content: Some("buy milk".to_string()),
            },
            OpenRequest::File {
                file_name: Some("todo.txt".to_string()),
                content: Some("updated".to_string()),
            },
        ]
    );
}

#[test]
fn builtin_notes_window_reflects_updated_content() {
    let shell = Shell::with_source(Rc::new(builtin_module_source()));
    let todo = |content: &str| {
        LaunchOptions::new()
            .with(OPTION_FILE_NAME, "todo.txt")
            .with(OPTION_CONTENT, content)
    };

    let window_id = launched_window(&block_on(
        shell.launcher.launch_app(&app("app3"), todo("buy milk")),
    ));
    let window = shell.window_manager.window(window_id).expect("notes window");
    assert_eq!(window.title, "todo.txt");
    assert_eq!(window.content, "buy milk");

    block_on(shell.launcher.launch_app(&app("app3"), todo("updated")));
    let window = shell.window_manager.window(window_id).expect("notes window");
    assert_eq!(window.content, "updated");
    assert_eq!(window.footer_text, "Words: 1 | Characters: 7");
    assert_eq!(shell.window_manager.windows_for_app(&app("app3")).len(), 1);
    assert_eq!(shell.instance_count("app3"), 1);
}

#[test]
fn files_app_lists_the_catalog_at_home() {
    let shell = Shell::with_source(Rc::new(builtin_module_source()));

    let window_id = launched_window(&block_on(
        shell.launcher.launch_app(&app("app1"), LaunchOptions::new()),
    ));
    let window = shell.window_manager.window(window_id).expect("files window");
    assert_eq!(window.title, "Files");
    assert_eq!(
        window.content,
        "Location: Home\nFiles\nNotes\nWeather\nPrism\nScaffold"
    );
    assert_eq!(window.footer_text, "5 items");

    block_on(shell.launcher.launch_app(
        &app("app1"),
        LaunchOptions::new().with(OPTION_PATH, "Documents"),
    ));
    let window = shell.window_manager.window(window_id).expect("files window");
    assert_eq!(window.content, "Location: Documents");
    assert_eq!(window.footer_text, "Empty folder");
}

#[test]
fn continuation_options_are_dropped_for_apps_without_the_capability() {
    let (shell, _, log) = weather_shell(Script::default());
    let window_id = launched_window(&block_on(
        shell.launcher.launch_app(&app("app4"), LaunchOptions::new()),
    ));

    let outcome = block_on(shell.launcher.launch_app(
        &app("app4"),
        LaunchOptions::new().with(OPTION_PATH, "/home"),
    ));
    assert_eq!(
        outcome,
        LaunchOutcome::Focused {
            window_id,
            forwarded: false,
        }
    );
    assert!(log.navigations.borrow().is_empty());
    assert_eq!(log.opens.borrow().len(), 1);
}

#[test]
fn navigable_app_receives_forwarded_paths() {
    let source = StaticModuleSource::new();
    let script = Script {
        capabilities: &[AppCapability::Navigable],
        ..Script::default()
    };
    let (module, log) = scripted_module("app1", "FilesApp", false, script);
    source.register_module(app("app1"), module);
    let shell = Shell::with_source(Rc::new(source));

    block_on(shell.launcher.launch_app(
        &app("app1"),
        LaunchOptions::new().with(OPTION_PATH, "Documents"),
    ));
    let outcome = block_on(shell.launcher.launch_app(
        &app("app1"),
        LaunchOptions::new().with(OPTION_PATH, "Music"),
    ));

    assert!(matches!(
        outcome,
        LaunchOutcome::Focused {
            forwarded: true,
            ..
        }
    ));
    assert_eq!(*log.navigations.borrow(), vec!["Music".to_string()]);
    assert_eq!(
        *log.opens.borrow(),
        vec![OpenRequest::Path {
            path: "Documents".to_string()
        }]
    );
}
