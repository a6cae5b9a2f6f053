use std::{io::IsTerminal, time::Duration};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use crate::view::session::SessionContext;

#[derive(Debug, Clone, Copy)]
pub struct UiOptions {
    pub json: bool,
    pub quiet: bool,
    pub color: bool,
}

pub fn configure_terminal(color: bool) {
    console::set_colors_enabled(color);
}

pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

pub fn print_header(title: &str, session: &SessionContext, options: UiOptions) {
    if options.quiet || options.json {
        return;
    }

    let state_text = match session.email() {
        Some(email) => format!("[signed in as {email}]"),
        None => "[signed out]".to_owned(),
    };

    println!("itemlist {} {}", env!("CARGO_PKG_VERSION"), state_text);
    println!("---------------------------------------");
    println!("{}", title);
    println!("---------------------------------------");
}

pub fn system(message: &str, options: UiOptions) {
    if options.quiet {
        return;
    }
    if options.json {
        println!("{}", json!({"level":"system", "message": message}));
        return;
    }
    println!("{}", message);
}

pub fn success(message: &str, options: UiOptions) {
    if options.quiet {
        return;
    }
    if options.json {
        println!("{}", json!({"level":"success", "message": message}));
        return;
    }
    println!("✅ {}", style(message).green());
}

pub fn warning(message: &str, options: UiOptions) {
    if options.quiet {
        return;
    }
    if options.json {
        println!("{}", json!({"level":"warning", "message": message}));
        return;
    }
    println!("⚠️ {}", style(message).yellow());
}

pub fn error(message: &str, options: UiOptions) {
    if options.json {
        println!("{}", json!({"level":"error", "message": message}));
        return;
    }
    eprintln!("⛔ {}", style(message).red());
}

/// Spinner shown while a remote call is pending. `None` when output is not
/// meant for a person.
pub fn pending(message: &str, options: UiOptions) -> Option<ProgressBar> {
    if options.json || options.quiet || !is_terminal() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

pub fn done(spinner: Option<ProgressBar>) {
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}

pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::short_id;

    #[test]
    fn short_id_keeps_first_eight_chars() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
