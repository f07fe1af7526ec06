/*!
 * Clipboard support for projdump
 *
 * Export documents can be copied to the system clipboard after an export,
 * and an import can read its document straight from the clipboard. The
 * mechanism is picked from whatever clipboard tool the system provides.
 */

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// The clipboard did not hold UTF-8 text
    #[error("Clipboard content is not valid UTF-8")]
    NotText,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Trait for clipboard operations
pub trait Clipboard {
    /// Copy text to the clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;

    /// Read the current clipboard text
    fn paste_from_clipboard(&self) -> Result<String>;
}

/// Available clipboard providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipboardProvider {
    Tmux,
    Xclip,
    Xsel,
    Wayland,
    MacOS,
    /// Windows, natively or through WSL
    Windows,
    Termux,
}

impl ClipboardProvider {
    fn copy_command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Wayland => ("wl-copy", &[]),
            Self::MacOS => ("pbcopy", &[]),
            Self::Windows => ("clip.exe", &[]),
            Self::Termux => ("termux-clipboard-set", &[]),
        }
    }

    fn paste_command(&self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", &["show-buffer"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-out"]),
            Self::Xsel => ("xsel", &["-b", "-o"]),
            Self::Wayland => ("wl-paste", &["--no-newline"]),
            Self::MacOS => ("pbpaste", &[]),
            Self::Windows => ("powershell.exe", &["-NoProfile", "-Command", "Get-Clipboard -Raw"]),
            Self::Termux => ("termux-clipboard-get", &[]),
        }
    }
}

impl Clipboard for ClipboardProvider {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let (cmd, args) = self.copy_command();
        execute_copy_command(cmd, args, text)
    }

    fn paste_from_clipboard(&self) -> Result<String> {
        let (cmd, args) = self.paste_command();
        execute_paste_command(cmd, args)
    }
}

/// Direction of a clipboard operation, used to pick a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Copy,
    Paste,
}

//--------------------------------------------------------------------
// Public API
//--------------------------------------------------------------------

/// Copy text to the clipboard
///
/// # Examples
/// ```no_run
/// use projdump::clipboard::copy_to_clipboard;
///
/// if let Err(e) = copy_to_clipboard("# 📂 Project Export: demo") {
///     eprintln!("Failed to copy to clipboard: {}", e);
/// }
/// ```
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    get_clipboard(Direction::Copy)?.copy_to_clipboard(text)
}

/// Read text from the clipboard
pub fn paste_from_clipboard() -> Result<String> {
    get_clipboard(Direction::Paste)?.paste_from_clipboard()
}

/// Check if a command exists on the system
pub fn command_exists(command: &str) -> bool {
    if let Some(paths) = env::var_os("PATH") {
        if env::split_paths(&paths).any(|dir| Path::new(&dir).join(command).is_file()) {
            return true;
        }
    }

    // Try to run the command with '--version' flag as fallback
    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

//--------------------------------------------------------------------
// Internal Implementation
//--------------------------------------------------------------------

fn get_clipboard(direction: Direction) -> Result<Box<dyn Clipboard>> {
    determine_clipboard_providers(direction)
        .into_iter()
        .next()
        .map(|provider| {
            log::debug!("Using {:?} clipboard provider", provider);
            Box::new(provider) as Box<dyn Clipboard>
        })
        .ok_or(ClipboardError::NoClipboardFound)
}

fn execute_copy_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to spawn {}", cmd)))?;

    let stdin = child.stdin.as_mut().ok_or_else(|| {
        ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
    })?;

    stdin
        .write_all(text.as_bytes())
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to write to {}", cmd)))?;

    let status = child
        .wait()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to wait for {}", cmd)))?;

    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

fn execute_paste_command(cmd: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|_| ClipboardError::CommandFailed(format!("Failed to spawn {}", cmd)))?;

    if !output.status.success() {
        return Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, output.status
        )));
    }

    String::from_utf8(output.stdout).map_err(|_| ClipboardError::NotText)
}

static PLATFORM: OnceLock<&'static str> = OnceLock::new();

fn get_platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                "wsl"
            } else {
                "linux"
            }
        } else if cfg!(target_os = "android") {
            "android"
        } else {
            "unknown"
        }
    })
}

/// Providers usable for `direction`, most preferred first
fn determine_clipboard_providers(direction: Direction) -> Vec<ClipboardProvider> {
    let candidates: &[ClipboardProvider] = match get_platform() {
        "macos" => &[ClipboardProvider::MacOS],
        "windows" | "wsl" => &[ClipboardProvider::Windows],
        "linux" => &[
            ClipboardProvider::Wayland,
            ClipboardProvider::Xsel,
            ClipboardProvider::Xclip,
        ],
        "android" => &[ClipboardProvider::Termux],
        _ => &[],
    };

    let mut providers = Vec::with_capacity(candidates.len() + 1);

    // tmux goes first when a server is reachable
    if command_exists("tmux") && is_tmux_running() {
        providers.push(ClipboardProvider::Tmux);
    }

    providers.extend(candidates.iter().copied().filter(|provider| {
        let (cmd, _) = match direction {
            Direction::Copy => provider.copy_command(),
            Direction::Paste => provider.paste_command(),
        };
        command_exists(cmd)
    }));

    providers
}

fn is_tmux_running() -> bool {
    if env::var("TMUX").is_ok() {
        return true;
    }

    Command::new("tmux")
        .args(["list-buffers"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
