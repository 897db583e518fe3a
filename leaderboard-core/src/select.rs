use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Professional,
    Manager,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    Default,
    SchoolScoped,
}

/// The three mutually exclusive leaderboard sources.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKey {
    Professional,
    School,
    Global,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ViewerContext {
    pub role: Role,
    pub view_mode: ViewMode,
}

/// Maps a viewer context to the single active leaderboard source.
///
/// Rules are evaluated in order, first match wins. Returns `None` when no
/// leaderboard serves the combination. Pure and deterministic, so callers can
/// re-run it on every render without triggering spurious cache resets.
pub fn active_source(ctx: &ViewerContext) -> Option<SourceKey> {
    match (ctx.role, ctx.view_mode) {
        (Role::Professional | Role::Manager, ViewMode::Default) => Some(SourceKey::Professional),
        (Role::Student | Role::Teacher, ViewMode::SchoolScoped) => Some(SourceKey::School),
        (Role::Student | Role::Teacher, ViewMode::Default) => Some(SourceKey::Global),
        _ => None,
    }
}
