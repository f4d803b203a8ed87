//! The frame drawn around every page: title, top bar, the schedules
//! sidebar when it is shown, and the not-found home control.

use std::fmt;

use horarios_core::navigation::APP_TITLE;
use horarios_core::{NavEntry, ViewState};

use crate::pages::Page;

/// A page inside the layout for its view.
pub struct Screen<'a> {
    view: &'a ViewState,
    page: &'a Page,
}

impl<'a> Screen<'a> {
    pub fn new(view: &'a ViewState, page: &'a Page) -> Self {
        Self { view, page }
    }
}

fn link(entry: &NavEntry) -> String {
    format!("[{}] -> {}", entry.label, entry.path)
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{APP_TITLE}")?;
        let top_bar: Vec<&str> = self.view.top_bar().iter().map(|entry| entry.label).collect();
        writeln!(f, "{}", top_bar.join(" | "))?;
        writeln!(f, "{}", "=".repeat(APP_TITLE.chars().count()))?;

        if let Some(sidebar) = &self.view.sidebar {
            for entry in sidebar {
                let marker = if entry.selected { ">" } else { " " };
                writeln!(f, "{marker} {}", entry.label)?;
            }
            writeln!(f, "{}", "-".repeat(APP_TITLE.chars().count()))?;
        }

        write!(f, "{}", self.page)?;

        if let Some(home) = &self.view.home_link {
            writeln!(f)?;
            writeln!(f, "{}", link(home))?;
        }
        Ok(())
    }
}
