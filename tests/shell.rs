//! Terminal shell tests

mod helper;

use std::time::Duration;

use helper::{MockRegistry, PendingRegistry, create_test_sidebar, react_registry};
use npm_install_assistant::mount::MountOutcome;
use npm_install_assistant::shell::{InputMode, Shell};

fn output(shell: Shell<Vec<u8>>) -> String {
    String::from_utf8(shell.into_output()).unwrap()
}

#[tokio::test]
async fn navigation_mounts_sidebar_for_package_page() {
    let (sidebar, _) = create_test_sidebar(react_registry());
    let mut shell = Shell::new(sidebar, Vec::new());

    let outcome = shell.navigate("https://www.npmjs.com/package/react").unwrap();

    assert!(matches!(outcome, MountOutcome::Mounted { ref package_name, .. } if package_name == "react"));
    assert!(shell.sidebar().state().is_loading());

    shell.settle().await.unwrap();

    assert!(shell.sidebar().view().offers("2.0.0"));
    let rendered = output(shell);
    assert!(rendered.contains("Loading versions…"));
    assert!(rendered.contains("$ npm install react"));
}

#[tokio::test]
async fn navigating_to_another_package_remounts() {
    let registry = react_registry().with_versions("@types/node", vec!["20.0.0", "18.0.0"]);
    let (sidebar, _) = create_test_sidebar(registry);
    let mut shell = Shell::new(sidebar, Vec::new());
    shell.navigate("/package/react").unwrap();

    let outcome = shell.navigate("/package/@types/node").unwrap();
    shell.settle().await.unwrap();

    assert!(matches!(
        outcome,
        MountOutcome::Mounted { ref replaced, .. } if replaced.as_deref() == Some("react")
    ));
    assert_eq!(shell.sidebar().view().command, "npm install @types/node");
    assert!(shell.sidebar().view().offers("20.0.0"));
}

#[tokio::test]
async fn same_package_navigation_keeps_selection() {
    let (sidebar, _) = create_test_sidebar(react_registry());
    let mut shell = Shell::new(sidebar, Vec::new());
    shell.navigate("/package/react").unwrap();
    shell.settle().await.unwrap();
    shell
        .handle_line("version 1.0.0", InputMode::Commands)
        .await
        .unwrap();

    let outcome = shell.navigate("/package/react?activeTab=versions").unwrap();

    assert_eq!(outcome, MountOutcome::Unchanged);
    assert_eq!(shell.sidebar().view().command, "npm install react@1.0.0");
}

#[tokio::test]
async fn commands_update_the_sidebar() {
    let (sidebar, clipboard) = create_test_sidebar(react_registry());
    let mut shell = Shell::new(sidebar, Vec::new());
    let input: &[u8] = b"nav /package/react\nwait\nmanager yarn\ndep dev\nbeta\nversion 1.1.0-beta.1\ncopy\nquit\nmanager pnpm\n";

    shell.run(input, InputMode::Commands).await.unwrap();

    assert_eq!(
        shell.sidebar().view().command,
        "yarn add --dev react@1.1.0-beta.1"
    );
    assert_eq!(
        clipboard.contents(),
        vec!["yarn add --dev react@1.1.0-beta.1".to_string()]
    );
}

#[tokio::test]
async fn unknown_version_is_rejected() {
    let (sidebar, _) = create_test_sidebar(react_registry());
    let mut shell = Shell::new(sidebar, Vec::new());
    shell.navigate("/package/react").unwrap();
    shell.settle().await.unwrap();

    shell
        .handle_line("version 9.9.9", InputMode::Commands)
        .await
        .unwrap();

    assert_eq!(shell.sidebar().view().command, "npm install react");
    assert!(output(shell).contains("version `9.9.9` is not offered"));
}

#[tokio::test]
async fn commands_before_navigation_are_refused() {
    let (sidebar, _) = create_test_sidebar(MockRegistry::new());
    let mut shell = Shell::new(sidebar, Vec::new());

    let keep_going = shell
        .handle_line("manager yarn", InputMode::Commands)
        .await
        .unwrap();

    assert!(keep_going);
    assert!(output(shell).contains("no sidebar mounted"));
}

#[tokio::test]
async fn watch_mode_treats_lines_as_locations() {
    let (sidebar, _) = create_test_sidebar(react_registry());
    let mut shell = Shell::new(sidebar, Vec::new());
    let input: &[u8] = b"https://www.npmjs.com/\nhttps://www.npmjs.com/package/react\n";

    shell.run(input, InputMode::Navigation).await.unwrap();

    assert_eq!(shell.sidebar().state().package_name, "react");
    assert!(output(shell).contains("not a package page: https://www.npmjs.com/"));
}

#[tokio::test]
async fn quit_ends_the_session_while_versions_are_loading() {
    let (sidebar, _) = create_test_sidebar(PendingRegistry);
    let mut shell = Shell::new(sidebar, Vec::new());
    let input: &[u8] = b"nav /package/react\nquit\n";

    let finished = tokio::time::timeout(
        Duration::from_secs(2),
        shell.run(input, InputMode::Commands),
    )
    .await;

    assert!(matches!(finished, Ok(Ok(()))));
    assert!(shell.sidebar().state().is_loading());
}

#[tokio::test]
async fn commands_apply_while_versions_are_loading() {
    let (sidebar, clipboard) = create_test_sidebar(PendingRegistry);
    let mut shell = Shell::new(sidebar, Vec::new());
    let input: &[u8] = b"nav /package/react\nmanager pnpm\ndep dev\ncopy\nquit\n";

    tokio::time::timeout(
        Duration::from_secs(2),
        shell.run(input, InputMode::Commands),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(
        clipboard.contents(),
        vec!["pnpm add --save-dev react".to_string()]
    );
    assert!(output(shell).contains("Loading versions…"));
}

#[tokio::test]
async fn navigating_away_from_a_pending_fetch_loads_the_new_package() {
    let registry = react_registry().with_versions("vue", vec!["3.4.0", "2.7.0"]);
    let (sidebar, _) = create_test_sidebar(registry);
    let mut shell = Shell::new(sidebar, Vec::new());
    shell.navigate("/package/react").unwrap();

    shell.navigate("/package/vue").unwrap();
    shell.settle().await.unwrap();

    assert_eq!(shell.sidebar().state().package_name, "vue");
    assert!(shell.sidebar().view().offers("3.4.0"));
    assert!(!shell.sidebar().view().offers("2.0.0"));
}
