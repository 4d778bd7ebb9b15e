//! Ping endpoints: the smallest possible response, served in every style.

use std::sync::{Mutex, PoisonError};

use axum::{
    extract::{Path, State},
    Json,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::http::style::ExecutionStyle;

const ID_SEED: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PongResponse {
    pub id: i32,
    pub name: String,
}

/// Process-wide source of pong ids; deterministic for a given seed.
#[derive(Debug)]
pub struct IdGenerator {
    rng: Mutex<StdRng>,
}

impl IdGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn next_id(&self) -> i32 {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).gen()
    }

    fn pong(&self, name: &str) -> PongResponse {
        PongResponse {
            id: self.next_id(),
            name: name.to_string(),
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(ID_SEED)
    }
}

pub async fn single(
    State(state): State<AppState>,
    Path(style): Path<String>,
) -> Result<Json<PongResponse>, ApiError> {
    let style: ExecutionStyle = style.parse()?;
    let ids = state.ids.clone();
    let pong = style.run(async move { Ok(ids.pong("First")) }).await?;
    Ok(Json(pong))
}

pub async fn list(
    State(state): State<AppState>,
    Path(style): Path<String>,
) -> Result<Json<Vec<PongResponse>>, ApiError> {
    let style: ExecutionStyle = style.parse()?;
    let ids = state.ids.clone();
    let pongs = style
        .run(async move {
            Ok(["First", "Second", "Third"]
                .into_iter()
                .map(|name| ids.pong(name))
                .collect::<Vec<_>>())
        })
        .await?;
    Ok(Json(pongs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let a = IdGenerator::default();
        let b = IdGenerator::new(ID_SEED);
        let seq_a: Vec<_> = (0..5).map(|_| a.next_id()).collect();
        let seq_b: Vec<_> = (0..5).map(|_| b.next_id()).collect();
        assert_eq!(seq_a, seq_b);
    }
}
