use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, PartialEq, Serialize, Display, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Error(String),
    FocusNext,
    FocusPrev,
    Submit,
    Reset,
    AddPhone,
    RemovePhone,
    /// Status line text (submit outcome, hints)
    Status(String),
}
