//! Terminal styles for the annotag CLI.
//!
//! Output code asks for a semantic style (a tag type, an id, an action) rather than a
//! color. `console` drops the escape codes when stdout is not a terminal or when
//! `NO_COLOR` is set, so piped output stays plain.

use console::Style;

pub struct Styles {
    pub tag: Style,
    pub id: Style,
    pub muted: Style,
    pub action: Style,
    pub attribute: Style,
}

pub fn styles() -> Styles {
    Styles {
        tag: Style::new().cyan().bold(),
        id: Style::new().color256(244),
        muted: Style::new().dim(),
        action: Style::new().green(),
        attribute: Style::new().yellow(),
    }
}
