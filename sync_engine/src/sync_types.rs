//! Data types shared by the policy table, the reconciler and the catalog backends.
//!
//! A [`ProductSnapshot`] is what one system knows about one product at one moment. The reconciler compares two of
//! them (one per system) and emits [`SyncIntent`]s, each describing exactly one write to one system.
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::policy::PolicyError;

/// The reason code Erply expects on stock write-offs generated by the sync.
pub const WRITE_OFF_REASON_ID: u32 = 1;

//--------------------------------------     SystemKind       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SystemKind {
    /// The retail back-office (Erply). Stock is a ledger of movements here.
    #[serde(rename = "erply")]
    BackOffice,
    /// The ecommerce website (Voog).
    #[serde(rename = "voog")]
    Website,
}

impl SystemKind {
    pub fn other(self) -> Self {
        match self {
            Self::BackOffice => Self::Website,
            Self::Website => Self::BackOffice,
        }
    }
}

impl Display for SystemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BackOffice => f.write_str("erply"),
            Self::Website => f.write_str("voog"),
        }
    }
}

//--------------------------------------     SyncField       ----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncField {
    Stock,
    Price,
    Status,
    Name,
    Sku,
    Description,
    Seo,
    Images,
}

impl SyncField {
    pub const ALL: [SyncField; 8] = [
        SyncField::Stock,
        SyncField::Price,
        SyncField::Status,
        SyncField::Name,
        SyncField::Sku,
        SyncField::Description,
        SyncField::Seo,
        SyncField::Images,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Price => "price",
            Self::Status => "status",
            Self::Name => "name",
            Self::Sku => "sku",
            Self::Description => "description",
            Self::Seo => "seo",
            Self::Images => "images",
        }
    }
}

impl Display for SyncField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncField {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .find(|f| f.as_str() == name)
            .copied()
            .ok_or_else(|| PolicyError::UnknownField(s.trim().to_string()))
    }
}

//--------------------------------------     SyncDirection       ------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncDirection {
    ErplyToVoog,
    VoogToErply,
    Both,
}

#[derive(Debug, Clone, Error)]
#[error("Invalid sync direction '{0}'. Expected one of erply-to-voog, voog-to-erply or both")]
pub struct InvalidDirectionError(pub String);

impl FromStr for SyncDirection {
    type Err = InvalidDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "erply-to-voog" => Ok(Self::ErplyToVoog),
            "voog-to-erply" => Ok(Self::VoogToErply),
            "both" => Ok(Self::Both),
            _ => Err(InvalidDirectionError(s.to_string())),
        }
    }
}

impl Display for SyncDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ErplyToVoog => f.write_str("erply-to-voog"),
            Self::VoogToErply => f.write_str("voog-to-erply"),
            Self::Both => f.write_str("both"),
        }
    }
}

//--------------------------------------     ProductStatus       ------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Display for ProductStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("ACTIVE"),
            Self::Inactive => f.write_str("INACTIVE"),
        }
    }
}

//--------------------------------------     FieldValue       ---------------------------------------------------------
/// The value of one synchronized field, as seen by one system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Missing,
    Quantity(i64),
    Price(Decimal),
    Status(ProductStatus),
    Text(String),
    /// Website-owned content the sync never interprets.
    Opaque(Value),
}

impl FieldValue {
    /// True for values that a write may always replace, whatever the overwrite policy says.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Opaque(v) => v.is_null(),
            _ => false,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_quantity(&self) -> Option<i64> {
        match self {
            Self::Quantity(q) => Some(*q),
            _ => None,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => f.write_str("(none)"),
            Self::Quantity(q) => write!(f, "{q}"),
            Self::Price(p) => write!(f, "{p}"),
            Self::Status(s) => write!(f, "{s}"),
            Self::Text(s) => write!(f, "\"{s}\""),
            Self::Opaque(v) => write!(f, "{v}"),
        }
    }
}

//--------------------------------------     ProductSnapshot       ----------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub system: SystemKind,
    /// The product's identifier inside `system`
    pub remote_id: i64,
    pub sku: String,
    pub name: Option<String>,
    /// Resolved absolute quantity. For the back-office this is already aggregated over warehouses.
    pub stock: Option<i64>,
    pub price: Option<Decimal>,
    pub status: Option<ProductStatus>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Website-only content (description, SEO text, images), keyed by field name.
    #[serde(default)]
    pub extras: Map<String, Value>,
}

impl ProductSnapshot {
    pub fn new<S: Into<String>>(system: SystemKind, remote_id: i64, sku: S) -> Self {
        Self {
            system,
            remote_id,
            sku: sku.into(),
            name: None,
            stock: None,
            price: None,
            status: None,
            updated_at: None,
            extras: Map::new(),
        }
    }

    pub fn value_of(&self, field: SyncField) -> FieldValue {
        let value = match field {
            SyncField::Stock => self.stock.map(FieldValue::Quantity),
            SyncField::Price => self.price.map(FieldValue::Price),
            SyncField::Status => self.status.map(FieldValue::Status),
            SyncField::Name => self.name.clone().map(FieldValue::Text),
            SyncField::Sku => Some(FieldValue::Text(self.sku.clone())),
            SyncField::Description | SyncField::Seo | SyncField::Images => {
                self.extras.get(field.as_str()).cloned().map(FieldValue::Opaque)
            },
        };
        value.unwrap_or(FieldValue::Missing)
    }
}

//--------------------------------------     SyncIntent       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteMechanism {
    /// Overwrite the destination value outright
    Set,
    /// Record incoming stock. `amount` is always positive.
    Registration { amount: i64 },
    /// Record a stock loss. `amount` is always positive.
    WriteOff { amount: i64, reason_id: u32 },
}

impl Display for WriteMechanism {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Set => f.write_str("set"),
            Self::Registration { amount } => write!(f, "registration +{amount}"),
            Self::WriteOff { amount, reason_id } => write!(f, "write-off -{amount} (reason {reason_id})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncIntent {
    pub target: SystemKind,
    pub target_id: i64,
    pub sku: String,
    pub field: SyncField,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
    pub mechanism: WriteMechanism,
}

impl SyncIntent {
    /// The signed stock change for ledger-style writes, `None` for absolute sets.
    pub fn delta(&self) -> Option<i64> {
        match self.mechanism {
            WriteMechanism::Set => None,
            WriteMechanism::Registration { amount } => Some(amount),
            WriteMechanism::WriteOff { amount, .. } => Some(-amount),
        }
    }
}

impl Display for SyncIntent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{target} #{id} [{sku}] {field}: {old} → {new} ({mechanism})",
            target = self.target,
            id = self.target_id,
            sku = self.sku,
            field = self.field,
            old = self.old_value,
            new = self.new_value,
            mechanism = self.mechanism
        )
    }
}
