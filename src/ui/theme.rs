use owo_colors::{OwoColorize, Style};
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Role of a piece of terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Header,
    Success,
    Accent,
    Muted,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Header => Style::new().cyan().bold(),
            Tone::Success => Style::new().green().bold(),
            Tone::Accent => Style::new().magenta(),
            Tone::Muted => Style::new().white().dimmed(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    colored: bool,
}

impl Theme {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Colors only when stdout is a terminal and `NO_COLOR` is unset
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::new(!no_color && console::Term::stdout().is_term())
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if self.colored {
            text.style(tone.style()).to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_theme_leaves_text_untouched() {
        let plain = Theme::new(false);
        assert!(!plain.is_colored());
        assert_eq!(plain.paint(Tone::Header, "StudyDesk"), "StudyDesk");
    }

    #[test]
    fn test_colored_theme_wraps_text() {
        let painted = Theme::new(true).paint(Tone::Success, "ready");
        assert!(painted.contains("ready"));
        assert_ne!(painted, "ready");
    }
}
