//! Write acknowledgments, shaped like the store's own write results.
//!
//! Writes report what happened instead of echoing data back. A write that
//! matched nothing still succeeds with zero counts.

use crate::model::{Id, post::PostMarker};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: Id<PostMarker>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Id<PostMarker>>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl InsertAck {
    #[must_use]
    pub fn new(inserted_id: Id<PostMarker>) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

impl UpdateAck {
    #[must_use]
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

impl DeleteAck {
    #[must_use]
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
