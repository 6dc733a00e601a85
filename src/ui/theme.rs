//! Visual theme and styling.

use console::Style;

use crate::env::{DiffLine, LineKind};

/// envpull's visual theme.
#[derive(Debug, Clone)]
pub struct EnvpullTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (yellow).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for informational messages (blue).
    pub info: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for keys only in the remote env (green).
    pub added: Style,
    /// Style for keys only in the local env (red).
    pub removed: Style,
    /// Style for changed keys (yellow).
    pub modified: Style,
    /// Style for contextual hints (dim).
    pub hint: Style,
}

impl Default for EnvpullTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvpullTheme {
    /// Create the colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            info: Style::new().blue(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            added: Style::new().green(),
            removed: Style::new().red(),
            modified: Style::new().yellow(),
            hint: Style::new().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            added: Style::new(),
            removed: Style::new(),
            modified: Style::new(),
            hint: Style::new(),
        }
    }

    /// Pick the colored or plain theme.
    pub fn for_colors(colorize: bool) -> Self {
        if colorize {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in yellow).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format an informational message (blue icon).
    pub fn format_info(&self, msg: &str) -> String {
        format!("{} {}", self.info.apply_to("ℹ"), msg)
    }

    /// Style one rendered diff line by its role.
    pub fn format_diff_line(&self, line: &DiffLine) -> String {
        let style = match line.kind {
            LineKind::Heading => &self.highlight,
            LineKind::Added | LineKind::NewValue => &self.added,
            LineKind::Removed | LineKind::OldValue => &self.removed,
            LineKind::Modified => &self.modified,
            LineKind::Blank => return String::new(),
        };
        format!("{}", style.apply_to(&line.text))
    }
}

/// Check if colors should be enabled.
///
/// `--no-color` and `NO_COLOR` both disable colors; otherwise colors follow
/// whether stdout is a TTY.
pub fn should_use_colors(no_color_flag: bool) -> bool {
    if no_color_flag || crate::shell::no_color_requested() {
        return false;
    }

    console::Term::stdout().is_term()
}
