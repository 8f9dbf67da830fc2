//! Plain-text schedule report, laid out in pages.
//!
//! Every line costs [`LINE_HEIGHT`] layout units. A page starts at
//! [`TOP_MARGIN`] and takes lines while they fit under the page height.

use std::fmt;

use anyhow::{Result, bail};

use crate::sim::{ScheduleEntry, SimOutcome};

pub const LINE_HEIGHT: u32 = 10;
pub const TOP_MARGIN: u32 = 10;
pub const DEFAULT_PAGE_HEIGHT: u32 = 280;

// Separates pages in the rendered text
const PAGE_BREAK: char = '\u{c}';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pages: Vec<Page>,
}

pub fn entry_line(entry: &ScheduleEntry) -> String {
    format!(
        "Process {}: Start {} - End {}",
        entry.pid, entry.start_time, entry.finish_time
    )
}

struct Layout {
    page_height: u32,
    y: u32,
    pages: Vec<Page>,
}

impl Layout {
    fn new(page_height: u32) -> Self {
        Self {
            page_height,
            y: TOP_MARGIN,
            pages: vec![Page::default()],
        }
    }

    fn fits(&self) -> bool {
        self.y + LINE_HEIGHT <= self.page_height
    }

    fn place(&mut self, line: String) {
        if !self.fits() {
            self.pages.push(Page::default());
            self.y = TOP_MARGIN;
        }
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
        self.y += LINE_HEIGHT;
    }

    // Vertical gap; never carried onto a fresh page
    fn gap(&mut self) {
        if self.fits() {
            if let Some(page) = self.pages.last_mut() {
                page.lines.push(String::new());
            }
        }
        self.y += LINE_HEIGHT;
    }
}

impl Report {
    /// Lays out `(policy, schedule)` sections in the given order.
    pub fn build<'a, I>(sections: I, page_height: u32) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [ScheduleEntry])>,
    {
        if page_height < TOP_MARGIN + LINE_HEIGHT {
            bail!(
                "page height {page_height} cannot hold a single line (need {})",
                TOP_MARGIN + LINE_HEIGHT
            );
        }

        let mut layout = Layout::new(page_height);
        for (i, (policy, schedule)) in sections.into_iter().enumerate() {
            if i > 0 {
                layout.gap();
            }
            layout.place(format!("{policy} Schedule:"));
            for entry in schedule {
                layout.place(entry_line(entry));
            }
        }

        Ok(Self {
            pages: layout.pages,
        })
    }

    pub fn from_outcomes(outcomes: &[SimOutcome], page_height: u32) -> Result<Self> {
        Self::build(
            outcomes
                .iter()
                .map(|o| (o.policy, o.schedule.as_slice())),
            page_height,
        )
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                writeln!(f, "{PAGE_BREAK}")?;
            }
            for line in &page.lines {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}
