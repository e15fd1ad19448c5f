//! # Reconciler
//!
//! Turns a back-office snapshot and a website snapshot of the same SKU into the list of writes that brings them in
//! line with the [`PolicyTable`]. This is a pure function of its inputs: it never touches the network and applying
//! the intents is somebody else's job (see [`crate::SyncApi`]).
//!
//! For every enabled field the requested [`SyncDirection`] is intersected with the field's [`PolicyDirection`]
//! through a lookup table ([`flow_rule`]). A field whose policy does not allow the requested direction is skipped
//! silently.
//!
//! Stock is special. The website takes an absolute value, but the back-office keeps stock as a ledger of movements,
//! so writes to it are expressed as a registration (delta > 0) or a write-off (delta < 0).
//!
//! When the direction is [`SyncDirection::Both`], two-way fields flow from whichever side was modified last. Ties and
//! unknown modification times favour the back-office. Stock is the exception: product timestamps say nothing about
//! stock movements, so under `both` stock always flows from the back-office ledger unless it has no figure at all.
use std::cmp::Ordering;

use log::*;
use thiserror::Error;

use crate::{
    policy::{FieldPolicy, FieldSelection, PolicyDirection, PolicyError, PolicyTable},
    sync_types::{
        FieldValue,
        ProductSnapshot,
        SyncDirection,
        SyncField,
        SyncIntent,
        SystemKind,
        WriteMechanism,
        WRITE_OFF_REASON_ID,
    },
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("{0}")]
    Policy(#[from] PolicyError),
    #[error("The snapshots cannot be reconciled. {0}")]
    SnapshotMismatch(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Flow {
    from: SystemKind,
    to: SystemKind,
}

const ERPLY_TO_VOOG: Flow = Flow { from: SystemKind::BackOffice, to: SystemKind::Website };
const VOOG_TO_ERPLY: Flow = Flow { from: SystemKind::Website, to: SystemKind::BackOffice };

impl Flow {
    fn reversed(self) -> Self {
        Self { from: self.to, to: self.from }
    }

    /// Returns (source, destination)
    fn pick<'a>(
        &self,
        back_office: &'a ProductSnapshot,
        website: &'a ProductSnapshot,
    ) -> (&'a ProductSnapshot, &'a ProductSnapshot) {
        match self.from {
            SystemKind::BackOffice => (back_office, website),
            SystemKind::Website => (website, back_office),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowRule {
    Fixed(Flow),
    LastWriteWins,
    Skip,
}

fn flow_rule(policy: PolicyDirection, requested: SyncDirection) -> FlowRule {
    use PolicyDirection::*;
    use SyncDirection::*;
    match (policy, requested) {
        (TwoWay, ErplyToVoog) => FlowRule::Fixed(ERPLY_TO_VOOG),
        (TwoWay, VoogToErply) => FlowRule::Fixed(VOOG_TO_ERPLY),
        (TwoWay, Both) => FlowRule::LastWriteWins,
        (BackOfficeToWebsite, ErplyToVoog | Both) => FlowRule::Fixed(ERPLY_TO_VOOG),
        (BackOfficeToWebsite, VoogToErply) => FlowRule::Skip,
        (WebsiteOnly, _) => FlowRule::Skip,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'p> {
    policy: &'p PolicyTable,
}

impl Reconciler<'static> {
    pub fn standard() -> Self {
        Self { policy: PolicyTable::standard() }
    }
}

impl<'p> Reconciler<'p> {
    pub fn new(policy: &'p PolicyTable) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PolicyTable {
        self.policy
    }

    pub fn compute_intents(
        &self,
        back_office: &ProductSnapshot,
        website: &ProductSnapshot,
        direction: SyncDirection,
        selection: &FieldSelection,
    ) -> Result<Vec<SyncIntent>, ReconcileError> {
        check_snapshots(back_office, website)?;
        let mut intents = Vec::new();
        for field in selection.fields() {
            if !selection.is_enabled(field) {
                debug!("🔁️ [{}] {field} is switched off. Skipping.", back_office.sku);
                continue;
            }
            let policy = self.policy.policy_for(field)?;
            let flow = match flow_rule(policy.direction, direction) {
                FlowRule::Skip => {
                    let sku = &back_office.sku;
                    debug!("🔁️ [{sku}] {field} is {} and cannot be synced {direction}.", policy.direction);
                    continue;
                },
                FlowRule::Fixed(flow) => flow,
                FlowRule::LastWriteWins => last_write_wins(field, back_office, website),
            };
            let (source, destination) = flow.pick(back_office, website);
            if let Some(intent) = field_intent(&policy, source, destination) {
                trace!("🔁️ New intent: {intent}");
                intents.push(intent);
            }
        }
        Ok(intents)
    }
}

fn check_snapshots(back_office: &ProductSnapshot, website: &ProductSnapshot) -> Result<(), ReconcileError> {
    if back_office.system != SystemKind::BackOffice {
        return Err(ReconcileError::SnapshotMismatch(format!(
            "Expected a back-office snapshot, but got one from {}",
            back_office.system
        )));
    }
    if website.system != SystemKind::Website {
        return Err(ReconcileError::SnapshotMismatch(format!(
            "Expected a website snapshot, but got one from {}",
            website.system
        )));
    }
    if back_office.sku != website.sku {
        return Err(ReconcileError::SnapshotMismatch(format!(
            "SKUs differ: {} (erply) vs {} (voog)",
            back_office.sku, website.sku
        )));
    }
    Ok(())
}

fn last_write_wins(field: SyncField, back_office: &ProductSnapshot, website: &ProductSnapshot) -> Flow {
    let preferred = match (field, back_office.updated_at, website.updated_at) {
        // Inventory movements do not touch the product's modification time
        (SyncField::Stock, _, _) => ERPLY_TO_VOOG,
        (_, Some(b), Some(w)) if w > b => VOOG_TO_ERPLY,
        _ => ERPLY_TO_VOOG,
    };
    let (source, _) = preferred.pick(back_office, website);
    if source.value_of(field).is_missing() {
        preferred.reversed()
    } else {
        preferred
    }
}

fn field_intent(policy: &FieldPolicy, source: &ProductSnapshot, destination: &ProductSnapshot) -> Option<SyncIntent> {
    let field = policy.field;
    let new_value = source.value_of(field);
    if new_value.is_missing() {
        trace!("🔁️ [{}] {} has no {field} value. Nothing to copy.", source.sku, source.system);
        return None;
    }
    let old_value = destination.value_of(field);
    if new_value == old_value {
        return None;
    }
    if !policy.overwrite && !old_value.is_empty() {
        debug!("🔁️ [{}] {field} on {} is set and may not be overwritten.", destination.sku, destination.system);
        return None;
    }
    if field == SyncField::Stock {
        let new_stock = new_value.as_quantity()?;
        return stock_intent(destination.system, destination.remote_id, &destination.sku, destination.stock, new_stock);
    }
    Some(SyncIntent {
        target: destination.system,
        target_id: destination.remote_id,
        sku: destination.sku.clone(),
        field,
        old_value,
        new_value,
        mechanism: WriteMechanism::Set,
    })
}

/// Builds the intent that moves `target`'s stock from `old` to `new`, or `None` if nothing needs to change.
///
/// Website stock is set absolutely. Back-office stock is adjusted by the signed difference; an unknown current
/// quantity counts as zero. A difference too large for an `i64` produces no intent.
pub fn stock_intent(target: SystemKind, target_id: i64, sku: &str, old: Option<i64>, new: i64) -> Option<SyncIntent> {
    let mechanism = match target {
        SystemKind::Website => {
            if old == Some(new) {
                return None;
            }
            WriteMechanism::Set
        },
        SystemKind::BackOffice => {
            // Both the delta and its negation must fit
            let Some(delta) = new.checked_sub(old.unwrap_or(0)).filter(|d| *d != i64::MIN) else {
                warn!("🔁️ [{sku}] Stock change from {old:?} to {new} is out of range. Skipping.");
                return None;
            };
            match delta.cmp(&0) {
                Ordering::Greater => WriteMechanism::Registration { amount: delta },
                Ordering::Less => WriteMechanism::WriteOff { amount: -delta, reason_id: WRITE_OFF_REASON_ID },
                Ordering::Equal => return None,
            }
        },
    };
    Some(SyncIntent {
        target,
        target_id,
        sku: sku.to_string(),
        field: SyncField::Stock,
        old_value: old.map(FieldValue::Quantity).unwrap_or(FieldValue::Missing),
        new_value: FieldValue::Quantity(new),
        mechanism,
    })
}
