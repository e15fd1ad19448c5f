//! # Field policy table
//!
//! Every field the sync knows about has exactly one [`FieldPolicy`] row, stating which way values may flow and
//! whether an existing destination value may be replaced. The standard table is a compile-time constant (see
//! [`PolicyTable::standard`]) and is never written to after that.
//!
//! | Field                       | Direction                | Overwrite |
//! |-----------------------------|--------------------------|-----------|
//! | stock, status, price        | two-way                  | yes       |
//! | name, sku                   | back-office → website    | yes       |
//! | description, seo, images    | website only             | never     |
//!
//! Price is declared two-way but it is only ever synced when the caller switches it on explicitly; see
//! [`FieldSelection`].
//!
//! The `sku` row never results in a write. Both products are looked up by the same SKU and the reconciler rejects
//! snapshots whose SKUs differ, so the two values always agree. The row is kept so that a selection naming `sku` is
//! valid.
use std::{borrow::Cow, collections::BTreeSet, fmt::Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sync_types::SyncField;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("No sync policy is declared for field '{0}'")]
    UnknownField(String),
    #[error("More than one sync policy was declared for field '{0}'")]
    DuplicatePolicy(SyncField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyDirection {
    TwoWay,
    /// Only ever copied from the back-office to the website
    BackOfficeToWebsite,
    /// Owned by the website. Never written by the sync.
    WebsiteOnly,
}

impl Display for PolicyDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TwoWay => f.write_str("two-way"),
            Self::BackOfficeToWebsite => f.write_str("erply → voog only"),
            Self::WebsiteOnly => f.write_str("voog only"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPolicy {
    pub field: SyncField,
    pub direction: PolicyDirection,
    pub overwrite: bool,
}

impl FieldPolicy {
    pub const fn new(field: SyncField, direction: PolicyDirection, overwrite: bool) -> Self {
        Self { field, direction, overwrite }
    }
}

const STANDARD_POLICIES: [FieldPolicy; 8] = [
    FieldPolicy::new(SyncField::Stock, PolicyDirection::TwoWay, true),
    FieldPolicy::new(SyncField::Price, PolicyDirection::TwoWay, true),
    FieldPolicy::new(SyncField::Status, PolicyDirection::TwoWay, true),
    FieldPolicy::new(SyncField::Name, PolicyDirection::BackOfficeToWebsite, true),
    FieldPolicy::new(SyncField::Sku, PolicyDirection::BackOfficeToWebsite, true),
    FieldPolicy::new(SyncField::Description, PolicyDirection::WebsiteOnly, false),
    FieldPolicy::new(SyncField::Seo, PolicyDirection::WebsiteOnly, false),
    FieldPolicy::new(SyncField::Images, PolicyDirection::WebsiteOnly, false),
];

static STANDARD_TABLE: PolicyTable = PolicyTable { rows: Cow::Borrowed(&STANDARD_POLICIES) };

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    rows: Cow<'static, [FieldPolicy]>,
}

impl PolicyTable {
    /// The policy table the sync runs with.
    pub fn standard() -> &'static PolicyTable {
        &STANDARD_TABLE
    }

    /// Builds a table from explicit rows. Each field may appear at most once; fields that are left out have no
    /// policy and are reported as unknown on lookup.
    pub fn custom(rows: Vec<FieldPolicy>) -> Result<Self, PolicyError> {
        let mut seen = BTreeSet::new();
        for row in &rows {
            if !seen.insert(row.field) {
                return Err(PolicyError::DuplicatePolicy(row.field));
            }
        }
        Ok(Self { rows: Cow::Owned(rows) })
    }

    pub fn policy_for(&self, field: SyncField) -> Result<FieldPolicy, PolicyError> {
        self.rows
            .iter()
            .find(|p| p.field == field)
            .copied()
            .ok_or_else(|| PolicyError::UnknownField(field.to_string()))
    }

    /// All rows, in declaration order
    pub fn rows(&self) -> &[FieldPolicy] {
        &self.rows
    }
}

//--------------------------------------     FieldSelection       -----------------------------------------------------
/// The subset of fields a caller wants synchronized.
///
/// Price has a second switch on top of membership. It is only synced when `price_enabled` is set, even if it is
/// listed in the selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldSelection {
    fields: BTreeSet<SyncField>,
    price_enabled: bool,
}

impl FieldSelection {
    pub fn new<I: IntoIterator<Item = SyncField>>(fields: I) -> Self {
        Self { fields: fields.into_iter().collect(), price_enabled: false }
    }

    /// stock, status, name and sku. Price stays off.
    pub fn standard() -> Self {
        Self::new([SyncField::Stock, SyncField::Status, SyncField::Name, SyncField::Sku])
    }

    pub fn with_price_enabled(mut self, enabled: bool) -> Self {
        self.price_enabled = enabled;
        self
    }

    pub fn price_enabled(&self) -> bool {
        self.price_enabled
    }

    pub fn is_enabled(&self, field: SyncField) -> bool {
        self.fields.contains(&field) && (field != SyncField::Price || self.price_enabled)
    }

    pub fn fields(&self) -> impl Iterator<Item = SyncField> + '_ {
        self.fields.iter().copied()
    }
}
