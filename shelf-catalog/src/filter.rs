//! Saved view filters.
//!
//! Filters are view state. Only the references they hold matter here: a
//! filter that names a label or tab must go away when that label or tab is
//! deleted.

use crate::game::{LabelId, TabId};
use crate::types::{FilterMode, GameType, Status, Tag};

/// What a filter compares against.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterMatch {
    #[default]
    Any,
    Label(LabelId),
    Tab(TabId),
    Status(Status),
    Type(GameType),
    Tag(Tag),
    Number(f64),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub mode: FilterMode,
    pub invert: bool,
    pub criteria: FilterMatch,
}

impl Filter {
    pub fn new(mode: FilterMode, criteria: FilterMatch) -> Self {
        Self {
            mode,
            invert: false,
            criteria,
        }
    }

    pub fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }

    pub fn names_label(&self, label: LabelId) -> bool {
        self.criteria == FilterMatch::Label(label)
    }

    pub fn names_tab(&self, tab: TabId) -> bool {
        self.criteria == FilterMatch::Tab(tab)
    }
}
