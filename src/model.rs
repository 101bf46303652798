use serde::{Deserialize, Serialize};

/// Coarse time-of-day bucket used to group games for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewingWindow {
    Noon,
    Afternoon,
    Prime,
    Late,
}

impl ViewingWindow {
    /// Display order, earliest kickoff first.
    pub const ALL: [ViewingWindow; 4] = [
        ViewingWindow::Noon,
        ViewingWindow::Afternoon,
        ViewingWindow::Prime,
        ViewingWindow::Late,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewingWindow::Noon => "Noon",
            ViewingWindow::Afternoon => "Afternoon",
            ViewingWindow::Prime => "Prime",
            ViewingWindow::Late => "Late",
        }
    }
}

/// Where a category value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTag {
    #[serde(rename = "CFBD")]
    Cfbd,
    #[serde(rename = "AP")]
    Ap,
    Odds,
    Computed,
}

impl SourceTag {
    pub fn label(self) -> &'static str {
        match self {
            SourceTag::Cfbd => "CFBD",
            SourceTag::Ap => "AP",
            SourceTag::Odds => "Odds",
            SourceTag::Computed => "Computed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub window: ViewingWindow,
    #[serde(rename = "kickoffET")]
    pub kickoff_et: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kickoff_date: Option<String>,
    #[serde(rename = "kickoffISO", default, skip_serializing_if = "Option::is_none")]
    pub kickoff_iso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    pub team_a: String,
    pub team_b: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_a: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_b: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    pub importance: f64,
    pub prospect_density: f64,
    pub watchability: f64,
    pub drama: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance_src: Option<SourceTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prospect_density_src: Option<SourceTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watchability_src: Option<SourceTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drama_src: Option<SourceTag>,
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
}

impl Game {
    pub fn matchup_label(&self) -> String {
        format!(
            "{}{} vs {}{}",
            self.team_a,
            rank_suffix(self.rank_a),
            self.team_b,
            rank_suffix(self.rank_b)
        )
    }
}

fn rank_suffix(rank: Option<u32>) -> String {
    match rank {
        Some(r) => format!(" (#{r})"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlateResponse {
    pub games: Vec<Game>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub demo: bool,
    pub updated_at: String,
}
