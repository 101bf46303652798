use std::collections::VecDeque;

use crate::model::{SlateResponse, ViewingWindow};
use crate::weights::{RankedGame, Weights, WindowPick, group_by_window, rank_games, window_picks};

pub const WEIGHT_STEP: f64 = 5.0;
pub const WEIGHT_MAX: f64 = 100.0;
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Slate,
    Planner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightField {
    Importance,
    Prospect,
    Watchability,
    Drama,
}

impl WeightField {
    pub const ALL: [WeightField; 4] = [
        WeightField::Importance,
        WeightField::Prospect,
        WeightField::Watchability,
        WeightField::Drama,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WeightField::Importance => "Importance",
            WeightField::Prospect => "Prospect Density",
            WeightField::Watchability => "Watchability",
            WeightField::Drama => "Drama",
        }
    }

    fn next(self) -> Self {
        match self {
            WeightField::Importance => WeightField::Prospect,
            WeightField::Prospect => WeightField::Watchability,
            WeightField::Watchability => WeightField::Drama,
            WeightField::Drama => WeightField::Importance,
        }
    }

    fn prev(self) -> Self {
        match self {
            WeightField::Importance => WeightField::Drama,
            WeightField::Prospect => WeightField::Importance,
            WeightField::Watchability => WeightField::Prospect,
            WeightField::Drama => WeightField::Watchability,
        }
    }
}

pub fn weight_value(weights: &Weights, field: WeightField) -> f64 {
    match field {
        WeightField::Importance => weights.importance,
        WeightField::Prospect => weights.prospect,
        WeightField::Watchability => weights.watchability,
        WeightField::Drama => weights.drama,
    }
}

fn weight_mut(weights: &mut Weights, field: WeightField) -> &mut f64 {
    match field {
        WeightField::Importance => &mut weights.importance,
        WeightField::Prospect => &mut weights.prospect,
        WeightField::Watchability => &mut weights.watchability,
        WeightField::Drama => &mut weights.drama,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Refresh,
}

#[derive(Debug, Clone)]
pub enum Delta {
    Loading,
    SetSlate(SlateResponse),
    LoadFailed(String),
    Log(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub weights: Weights,
    pub focus: WeightField,
    pub slate: Option<SlateResponse>,
    pub ranked: Vec<RankedGame>,
    pub selected: usize,
    pub loading: bool,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Slate,
            weights: Weights::default(),
            focus: WeightField::Importance,
            slate: None,
            ranked: Vec::new(),
            selected: 0,
            loading: true,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn is_demo(&self) -> bool {
        self.slate.as_ref().is_some_and(|s| s.demo)
    }

    /// Re-scores and re-sorts against the current weights, keeping the
    /// selected game selected when it survives.
    pub fn rerank(&mut self) {
        let selected_id = self.selected_game().map(|r| r.game.id.clone());
        self.ranked = match &self.slate {
            Some(slate) => rank_games(&slate.games, &self.weights),
            None => Vec::new(),
        };
        self.selected = selected_id
            .and_then(|id| self.ranked.iter().position(|r| r.game.id == id))
            .unwrap_or(0);
    }

    pub fn set_slate(&mut self, slate: SlateResponse) {
        self.slate = Some(slate);
        self.loading = false;
        self.rerank();
    }

    pub fn adjust_focused_weight(&mut self, delta: f64) {
        let value = weight_mut(&mut self.weights, self.focus);
        *value = (*value + delta).clamp(0.0, WEIGHT_MAX);
        self.rerank();
    }

    pub fn focus_next_weight(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev_weight(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn reset_weights(&mut self) {
        self.weights = Weights::default();
        self.rerank();
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Slate => Screen::Planner,
            Screen::Planner => Screen::Slate,
        };
    }

    /// Selection walks games in window display order, matching the slate view.
    pub fn select_next(&mut self) {
        let order = self.display_order();
        if order.is_empty() {
            self.selected = 0;
            return;
        }
        let pos = order.iter().position(|&i| i == self.selected).unwrap_or(0);
        self.selected = order[(pos + 1) % order.len()];
    }

    pub fn select_prev(&mut self) {
        let order = self.display_order();
        if order.is_empty() {
            self.selected = 0;
            return;
        }
        let pos = order.iter().position(|&i| i == self.selected).unwrap_or(0);
        self.selected = order[(pos + order.len() - 1) % order.len()];
    }

    /// Indices into `ranked`, grouped by window in display order.
    pub fn display_order(&self) -> Vec<usize> {
        ViewingWindow::ALL
            .iter()
            .flat_map(|&w| {
                self.ranked
                    .iter()
                    .enumerate()
                    .filter(move |(_, r)| r.game.window == w)
                    .map(|(i, _)| i)
            })
            .collect()
    }

    pub fn selected_game(&self) -> Option<&RankedGame> {
        self.ranked.get(self.selected)
    }

    pub fn by_window(&self) -> Vec<(ViewingWindow, Vec<&RankedGame>)> {
        group_by_window(&self.ranked)
    }

    pub fn picks(&self) -> Vec<WindowPick<'_>> {
        window_picks(&self.ranked)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Loading => state.loading = true,
        Delta::SetSlate(slate) => {
            let msg = if slate.demo {
                format!("[INFO] Demo slate loaded ({} games)", slate.games.len())
            } else {
                format!("[INFO] Live slate loaded ({} games)", slate.games.len())
            };
            state.set_slate(slate);
            state.push_log(msg);
        }
        Delta::LoadFailed(err) => {
            state.loading = false;
            state.push_log(format!("[WARN] Slate load failed: {err}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
