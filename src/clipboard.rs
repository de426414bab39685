use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};

#[cfg(test)]
use mockall::automock;

/// Destination for copied text
#[cfg_attr(test, automock)]
pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<(), String>;
}

/// Native tools first, then OSC 52 when the terminal can take it
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), String> {
        if try_native_clipboard(text) {
            return Ok(());
        }
        let term = std::env::var("TERM").ok();
        let in_tmux = std::env::var("TMUX").is_ok();
        if osc52_supported(term.as_deref(), in_tmux, std::io::stdout().is_terminal())
            && try_osc52_copy(text, in_tmux)
        {
            return Ok(());
        }
        Err("No clipboard tool available".to_string())
    }
}

/// OSC 52 needs an interactive terminal that understands escape sequences
fn osc52_supported(term: Option<&str>, in_tmux: bool, stdout_is_tty: bool) -> bool {
    if !stdout_is_tty {
        return false;
    }
    in_tmux || term.is_some_and(|term| !term.is_empty() && term != "dumb")
}

fn osc52_sequence(text: &str, in_tmux: bool) -> String {
    use base64::Engine;
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    if in_tmux {
        format!("\x1bPtmux;\x1b\x1b]52;c;{}\x07\x1b\\", encoded)
    } else {
        format!("\x1b]52;c;{}\x07", encoded)
    }
}

fn try_osc52_copy(text: &str, in_tmux: bool) -> bool {
    let sequence = osc52_sequence(text, in_tmux);
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(sequence.as_bytes()).is_ok() && stdout.flush().is_ok()
}

fn pipe_to(cmd: &str, args: &[&str], text: &str) -> bool {
    let mut child = match Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(_) => return false,
    };
    let written = child
        .stdin
        .take()
        .map(|mut stdin| stdin.write_all(text.as_bytes()).is_ok())
        .unwrap_or(false);
    written && child.wait().map(|status| status.success()).unwrap_or(false)
}

fn try_native_clipboard(text: &str) -> bool {
    (std::env::var("WAYLAND_DISPLAY").is_ok() && pipe_to("wl-copy", &[], text))
        || pipe_to("xclip", &["-selection", "clipboard"], text)
        || pipe_to("xsel", &["--clipboard", "--input"], text)
        || pipe_to("pbcopy", &[], text)
}
