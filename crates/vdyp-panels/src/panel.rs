//! Panel names, layouts and per-panel state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Input panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelName {
    /// Species composition
    SpeciesInfo,
    /// Site conditions
    SiteInfo,
    /// Stand density
    StandInfo,
    /// Report options
    ReportInfo,
    /// Polygon and layer uploads
    Attachments,
}

impl PanelName {
    /// Every panel
    pub const ALL: [Self; 5] = [
        Self::SpeciesInfo,
        Self::SiteInfo,
        Self::StandInfo,
        Self::ReportInfo,
        Self::Attachments,
    ];

    /// Wire key
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::SpeciesInfo => "speciesInfo",
            Self::SiteInfo => "siteInfo",
            Self::StandInfo => "standInfo",
            Self::ReportInfo => "reportInfo",
            Self::Attachments => "attachments",
        }
    }
}

impl fmt::Display for PanelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Input workflow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputMode {
    /// Stand entered through the four input panels
    #[default]
    InputModelParameters,
    /// Stand supplied as polygon and layer uploads
    FileUpload,
}

impl InputMode {
    /// Panel layout of the workflow
    #[must_use]
    pub fn layout(self) -> PanelLayout {
        match self {
            Self::InputModelParameters => PanelLayout {
                sequence: vec![
                    PanelName::SpeciesInfo,
                    PanelName::SiteInfo,
                    PanelName::StandInfo,
                    PanelName::ReportInfo,
                ],
                terminal: None,
                requires_files: false,
            },
            Self::FileUpload => PanelLayout {
                sequence: vec![PanelName::ReportInfo],
                terminal: Some(PanelName::Attachments),
                requires_files: true,
            },
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InputModelParameters => "input model parameters",
            Self::FileUpload => "file upload",
        })
    }
}

/// Ordered panels of a workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    /// Panels confirmed in order
    pub sequence: Vec<PanelName>,
    /// Panel opened after the last sequential one, outside the run condition
    pub terminal: Option<PanelName>,
    /// Whether running needs both file references
    pub requires_files: bool,
}

impl PanelLayout {
    /// Every panel of the layout, sequence first
    pub fn panels(&self) -> impl Iterator<Item = PanelName> + '_ {
        self.sequence.iter().copied().chain(self.terminal)
    }

    /// Check if the layout has the panel
    #[must_use]
    pub fn contains(&self, panel: PanelName) -> bool {
        self.panels().any(|p| p == panel)
    }

    /// Position in the sequence; the terminal panel sits after the last one
    #[must_use]
    pub fn position(&self, panel: PanelName) -> Option<usize> {
        self.panels().position(|p| p == panel)
    }

    /// Panel that must be confirmed before this one becomes editable
    #[must_use]
    pub fn predecessor(&self, panel: PanelName) -> Option<PanelName> {
        let idx = self.position(panel)?;
        idx.checked_sub(1).and_then(|i| self.panels().nth(i))
    }

    /// Panel opened when this one is confirmed
    #[must_use]
    pub fn successor(&self, panel: PanelName) -> Option<PanelName> {
        let idx = self.position(panel)?;
        self.panels().nth(idx + 1)
    }

    /// Panels after this one
    #[must_use]
    pub fn later(&self, panel: PanelName) -> Vec<PanelName> {
        match self.position(panel) {
            Some(idx) => self.panels().skip(idx + 1).collect(),
            None => Vec::new(),
        }
    }

    /// First panel of the sequence
    #[must_use]
    pub fn first(&self) -> Option<PanelName> {
        self.sequence.first().copied()
    }
}

/// Per-panel flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelState {
    /// Inputs accepted
    pub confirmed: bool,
    /// Inputs may be changed
    pub editable: bool,
    /// Panel expanded
    pub open: bool,
}

impl PanelState {
    /// Closed, unconfirmed, read-only
    pub const LOCKED: Self = Self {
        confirmed: false,
        editable: false,
        open: false,
    };

    /// Open and accepting input
    pub const ACTIVE: Self = Self {
        confirmed: false,
        editable: true,
        open: true,
    };

    /// Confirmed and open, as shown in view mode
    pub const VIEWED: Self = Self {
        confirmed: true,
        editable: false,
        open: true,
    };

    /// Lifecycle status
    #[must_use]
    pub fn status(self) -> PanelStatus {
        if self.confirmed {
            PanelStatus::Confirmed
        } else if self.editable {
            PanelStatus::Active
        } else {
            PanelStatus::Locked
        }
    }
}

/// Panel lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelStatus {
    /// Waiting on its predecessor
    Locked,
    /// Editable and unconfirmed
    Active,
    /// Confirmed and read-only
    Confirmed,
}
