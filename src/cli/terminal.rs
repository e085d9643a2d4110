//! Styling for registry output.
//!
//! Styles are dropped when stdout is not a colour-capable terminal, so piped
//! output (including `--output json`) stays plain.

use owo_colors::{OwoColorize, Style};

fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

fn paint(text: &str, style: Style) -> String {
    if supports_color() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Styles for the kinds of line the registry prints.
pub trait Paint {
    /// A change that was stored, or a clean standing.
    fn stored(&self) -> String;
    /// A suspended licence.
    fn suspended(&self) -> String;
    /// A person's heading in `show`.
    fn heading(&self) -> String;
    /// Labels, column headers and totals.
    fn muted(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Paint for T {
    fn stored(&self) -> String {
        paint(self.as_ref(), Style::new().green())
    }

    fn suspended(&self) -> String {
        paint(self.as_ref(), Style::new().red().bold())
    }

    fn heading(&self) -> String {
        paint(self.as_ref(), Style::new().cyan().bold())
    }

    fn muted(&self) -> String {
        paint(self.as_ref(), Style::new().dimmed())
    }
}
