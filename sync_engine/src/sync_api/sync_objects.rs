use serde::{Deserialize, Serialize};

use crate::{
    policy::FieldSelection,
    sync_types::{ProductSnapshot, SyncDirection, SyncField, SyncIntent},
};

//--------------------------------------     SyncRequest       --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub sku: String,
    pub direction: SyncDirection,
    pub selection: FieldSelection,
    /// Replaces the back-office stock figure before reconciling
    pub stock_override: Option<i64>,
    pub dry_run: bool,
}

impl SyncRequest {
    /// A request for the standard field selection.
    pub fn new<S: Into<String>>(sku: S, direction: SyncDirection) -> Self {
        Self { sku: sku.into(), direction, selection: FieldSelection::standard(), stock_override: None, dry_run: false }
    }

    /// Copies the back-office stock figure to the website and nothing else.
    pub fn stock_refresh<S: Into<String>>(sku: S) -> Self {
        Self::new(sku, SyncDirection::ErplyToVoog).with_selection(FieldSelection::new([SyncField::Stock]))
    }

    pub fn with_selection(mut self, selection: FieldSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_stock_override(mut self, stock: Option<i64>) -> Self {
        self.stock_override = stock;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

//--------------------------------------      SyncPlan         --------------------------------------------------------
/// The snapshots a sync was planned from, and the writes it wants to make.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub direction: SyncDirection,
    pub back_office: ProductSnapshot,
    pub website: ProductSnapshot,
    pub intents: Vec<SyncIntent>,
}

impl SyncPlan {
    pub fn sku(&self) -> &str {
        &self.back_office.sku
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

//--------------------------------------     SyncReport        --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedIntent {
    pub intent: SyncIntent,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub sku: String,
    pub direction: SyncDirection,
    pub dry_run: bool,
    pub planned: Vec<SyncIntent>,
    pub applied: Vec<SyncIntent>,
    pub failed: Vec<FailedIntent>,
}

impl SyncReport {
    pub fn new(plan: &SyncPlan, dry_run: bool) -> Self {
        Self {
            sku: plan.sku().to_string(),
            direction: plan.direction,
            dry_run,
            planned: plan.intents.clone(),
            applied: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// True if nothing failed. A dry run always succeeds.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// True if the two systems already agreed
    pub fn is_noop(&self) -> bool {
        self.planned.is_empty()
    }
}
