//! `SyncApi` fetches a product from both systems, asks the [`Reconciler`] what needs to change, and then carries out
//! the writes one at a time.
//!
//! Writes are applied in the order the reconciler produced them. A failed write is logged and recorded in the
//! [`SyncReport`], and the remaining writes still run. Nothing is retried.
use std::fmt::Debug;

use log::*;

use crate::{
    policy::PolicyTable,
    reconciler::Reconciler,
    sync_api::{FailedIntent, SyncError, SyncPlan, SyncReport, SyncRequest},
    sync_types::{ProductSnapshot, SyncIntent, SystemKind},
    traits::{CatalogError, ProductCatalog},
};

pub struct SyncApi<B, W> {
    back_office: B,
    website: W,
    policy: PolicyTable,
}

impl<B, W> Debug for SyncApi<B, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SyncApi")
    }
}

impl<B, W> SyncApi<B, W>
where
    B: ProductCatalog,
    W: ProductCatalog,
{
    /// Creates a new `SyncApi` using the standard policy table. `back_office` must front the back-office system and
    /// `website` the website.
    pub fn new(back_office: B, website: W) -> Self {
        Self { back_office, website, policy: PolicyTable::standard().clone() }
    }

    pub fn with_policy(mut self, policy: PolicyTable) -> Self {
        self.policy = policy;
        self
    }

    pub fn back_office(&self) -> &B {
        &self.back_office
    }

    pub fn website(&self) -> &W {
        &self.website
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    /// Fetches the website product first, so that a product missing from both systems is reported as missing from
    /// the website.
    pub async fn fetch_snapshots(&self, sku: &str) -> Result<(ProductSnapshot, ProductSnapshot), SyncError> {
        let website = self.website.fetch_snapshot(sku).await?;
        debug!("🔁️ [{sku}] {} snapshot: {website:?}", self.website.system());
        let back_office = self.back_office.fetch_snapshot(sku).await?;
        debug!("🔁️ [{sku}] {} snapshot: {back_office:?}", self.back_office.system());
        Ok((back_office, website))
    }

    /// Works out which writes are needed for the request, without making any of them.
    pub async fn plan(&self, request: &SyncRequest) -> Result<SyncPlan, SyncError> {
        let (mut back_office, website) = self.fetch_snapshots(&request.sku).await?;
        if let Some(stock) = request.stock_override {
            info!("🔁️ [{}] Using stock override {stock} instead of {:?}", request.sku, back_office.stock);
            back_office.stock = Some(stock);
        }
        let reconciler = Reconciler::new(&self.policy);
        let intents = reconciler.compute_intents(&back_office, &website, request.direction, &request.selection)?;
        info!("🔁️ [{}] {} change(s) planned ({})", request.sku, intents.len(), request.direction);
        Ok(SyncPlan { direction: request.direction, back_office, website, intents })
    }

    /// Applies every intent in the plan, in order. Failures do not stop the remaining writes.
    pub async fn execute(&self, plan: &SyncPlan) -> SyncReport {
        let mut report = SyncReport::new(plan, false);
        for intent in &plan.intents {
            match self.apply(intent).await {
                Ok(()) => {
                    info!("🔁️ Applied {intent}");
                    report.applied.push(intent.clone());
                },
                Err(e) => {
                    error!("🔁️ Could not apply {intent}. {e}");
                    report.failed.push(FailedIntent { intent: intent.clone(), error: e.to_string() });
                },
            }
        }
        report
    }

    /// Plans the sync and, unless this is a dry run, executes it.
    pub async fn sync_sku(&self, request: &SyncRequest) -> Result<SyncReport, SyncError> {
        let plan = self.plan(request).await?;
        if request.dry_run {
            for intent in &plan.intents {
                info!("🔁️ (dry run) {intent}");
            }
            return Ok(SyncReport::new(&plan, true));
        }
        Ok(self.execute(&plan).await)
    }

    /// Sends a single intent to the catalog for its target system.
    pub async fn apply(&self, intent: &SyncIntent) -> Result<(), CatalogError> {
        match intent.target {
            SystemKind::BackOffice => self.back_office.apply_intent(intent).await,
            SystemKind::Website => self.website.apply_intent(intent).await,
        }
    }
}
