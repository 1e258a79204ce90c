use serde::{Deserialize, Serialize};

use crate::entities::Route;

/// What became of a point selection once its plan settled.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "route", rename_all = "snake_case")]
pub enum Selection {
    Routed(Route),
    Superseded,
    Empty,
}

impl Selection {
    pub fn route(&self) -> Option<&Route> {
        match self {
            Selection::Routed(route) => Some(route),
            _ => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Selection::Superseded)
    }
}
