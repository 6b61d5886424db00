//! Line-oriented terminal front-end for the sidebar
//!
//! The terminal plays the host page: every navigation mounts a sidebar for
//! the package it points at, and user input arrives as one command per line.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::command::{DependencyType, PackageManager};
use crate::mount::{MountController, MountHost, MountOutcome, Placement};
use crate::sidebar::{Sidebar, SidebarEvent};

pub const HELP: &str = "\
commands:
  manager <npm|yarn|pnpm>   select package manager
  dep <prod|dev>            select dependency type
  version <v>               select version (or `latest`)
  beta                      toggle beta versions
  max <n>                   set max versions shown (1-99)
  settings                  open/close the settings panel
  click <inside|outside>    pointer down relative to the settings panel
  copy                      copy the install command
  nav <url-or-path>         navigate to another package page
  wait                      wait for the versions to finish loading
  show                      print the sidebar
  help                      print this help
  quit                      exit";

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Manager(PackageManager),
    Dependency(DependencyType),
    Version(String),
    ToggleBeta,
    MaxVersions(String),
    Settings,
    Click { inside: bool },
    Copy,
    Navigate(String),
    Wait,
    Show,
    Help,
    Quit,
}

impl ShellCommand {
    /// Sidebar event for commands that act on the sidebar
    pub fn to_event(&self) -> Option<SidebarEvent> {
        match self {
            ShellCommand::Manager(manager) => Some(SidebarEvent::PackageManagerSelected(*manager)),
            ShellCommand::Dependency(dependency_type) => {
                Some(SidebarEvent::DependencyTypeSelected(*dependency_type))
            }
            ShellCommand::Version(version) => Some(SidebarEvent::VersionSelected(version.clone())),
            ShellCommand::ToggleBeta => Some(SidebarEvent::ShowBetaToggled),
            ShellCommand::MaxVersions(raw) => Some(SidebarEvent::MaxVersionsChanged(raw.clone())),
            ShellCommand::Settings => Some(SidebarEvent::SettingsToggled),
            ShellCommand::Click { inside } => Some(SidebarEvent::PointerDown {
                inside_settings: *inside,
            }),
            ShellCommand::Copy => Some(SidebarEvent::CopyRequested),
            ShellCommand::Navigate(_)
            | ShellCommand::Wait
            | ShellCommand::Show
            | ShellCommand::Help
            | ShellCommand::Quit => None,
        }
    }
}

/// Parses one input line; blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let argument = words.next();

    let require = |name: &str| argument.ok_or_else(|| format!("`{name}` needs an argument"));

    let parsed = match command {
        "manager" => ShellCommand::Manager(require(command)?.parse()?),
        "dep" => ShellCommand::Dependency(require(command)?.parse()?),
        "version" => ShellCommand::Version(require(command)?.to_string()),
        "beta" => ShellCommand::ToggleBeta,
        "max" => ShellCommand::MaxVersions(require(command)?.to_string()),
        "settings" => ShellCommand::Settings,
        "click" => match require(command)? {
            "inside" => ShellCommand::Click { inside: true },
            "outside" => ShellCommand::Click { inside: false },
            other => return Err(format!("expected `inside` or `outside`, got `{other}`")),
        },
        "copy" => ShellCommand::Copy,
        "nav" => ShellCommand::Navigate(require(command)?.to_string()),
        "wait" => ShellCommand::Wait,
        "show" => ShellCommand::Show,
        "help" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command `{other}` (try `help`)")),
    };

    Ok(Some(parsed))
}

/// Host "page" of the terminal: a single sidebar region without marker
#[derive(Debug, Default)]
pub struct TerminalHost {
    next_id: u64,
    attached: Option<u64>,
}

impl MountHost for TerminalHost {
    type Container = u64;

    fn insert_container(&mut self, _package_name: &str) -> Option<(u64, Placement)> {
        self.next_id += 1;
        self.attached = Some(self.next_id);
        Some((self.next_id, Placement::Appended))
    }

    fn has_sidebar_region(&self) -> bool {
        true
    }

    fn is_attached(&self, container: &u64) -> bool {
        self.attached == Some(*container)
    }

    fn remove_container(&mut self, container: u64) {
        if self.attached == Some(container) {
            self.attached = None;
        }
    }
}

/// How input lines are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Every line is a command
    Commands,
    /// Every line is a navigation location
    Navigation,
}

pub struct Shell<W: Write> {
    sidebar: Sidebar,
    mount: MountController<u64>,
    host: TerminalHost,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(sidebar: Sidebar, out: W) -> Self {
        Self {
            sidebar,
            mount: MountController::new(),
            host: TerminalHost::default(),
            out,
        }
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn render(&mut self) -> io::Result<()> {
        if self.mount.current_package().is_none() {
            return writeln!(self.out, "(no package page)");
        }
        writeln!(self.out, "{}", self.sidebar.view())
    }

    /// Waits for the outstanding fetch, if any, and redraws the sidebar.
    pub async fn settle(&mut self) -> io::Result<()> {
        self.sidebar.settle().await;
        self.render()
    }

    /// Handles a navigation, mounting a sidebar for the new package when needed.
    ///
    /// The fetch result is applied later by [`Shell::run`], so input keeps
    /// flowing while versions load.
    pub fn navigate(&mut self, location: &str) -> io::Result<MountOutcome> {
        let outcome = self.mount.on_navigation(location, &mut self.host);

        match &outcome {
            MountOutcome::Mounted {
                package_name,
                replaced,
                ..
            } => {
                if replaced.is_some() {
                    self.sidebar.unmount();
                }
                self.sidebar.mount(package_name);
                self.render()?;
            }
            MountOutcome::NotPackagePage => {
                writeln!(self.out, "not a package page: {location}")?;
            }
            MountOutcome::NoSidebarRegion | MountOutcome::Unchanged => {}
        }

        Ok(outcome)
    }

    /// Handles one input line. Returns `false` when the user asked to quit.
    pub async fn handle_line(&mut self, line: &str, mode: InputMode) -> io::Result<bool> {
        if mode == InputMode::Navigation {
            if !line.trim().is_empty() {
                self.navigate(line)?;
            }
            return Ok(true);
        }

        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(true),
            Err(message) => {
                writeln!(self.out, "{message}")?;
                return Ok(true);
            }
        };

        match command {
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Help => writeln!(self.out, "{HELP}")?,
            ShellCommand::Show => self.render()?,
            ShellCommand::Navigate(location) => {
                self.navigate(&location)?;
            }
            ShellCommand::Wait => self.settle().await?,
            command => {
                if self.mount.current_package().is_none() {
                    writeln!(self.out, "no sidebar mounted; use `nav <url-or-path>` first")?;
                    return Ok(true);
                }
                if let ShellCommand::Version(version) = &command
                    && !self.sidebar.view().offers(version)
                {
                    warn!("Version {} is not offered", version);
                    writeln!(self.out, "version `{version}` is not offered")?;
                    return Ok(true);
                }
                if let Some(event) = command.to_event() {
                    self.sidebar.dispatch(event);
                }
                self.render()?;
            }
        }

        Ok(true)
    }

    /// Reads lines until end of input or `quit`, applying sidebar events
    /// (such as the end of the copy feedback) as they arrive.
    pub async fn run<R>(&mut self, input: R, mode: InputMode) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    if !self.handle_line(&line, mode).await? {
                        break;
                    }
                }
                alive = self.sidebar.next_event() => {
                    if alive {
                        self.render()?;
                    }
                }
            }
        }

        Ok(())
    }
}
