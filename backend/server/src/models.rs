//! # Models
//!
//! Odoo records read by the dashboard and the cards built from them.
//!
//! ## Odoo
//! - `x_elite_delivery`: a tournée, one truck on one date with its drivers and pickings
//! - `stock.picking`: a delivery note (BL) with its planned time window
//! - `hr.employee`: a driver
//!
//! ## Colors
//! Picking colors follow Bootstrap contextual classes, `list-group-item-*` for
//! the row and `text-bg-*` for badges.
use odoo::{Reference, lenient};
use serde::{Deserialize, Serialize};

pub const DELIVERY_MODEL: &str = "x_elite_delivery";
pub const DELIVERY_FIELDS: &[&str] = &[
    "id",
    "x_display",
    "x_date",
    "x_area",
    "x_truck",
    "x_drivers",
    "x_stock_picking_ids",
    "x_status",
];
pub const DELIVERY_ORDER: &str = "x_date asc, x_truck asc, id asc";
pub const DELIVERY_STATUS_FIELD: &str = "x_status";

pub const PICKING_MODEL: &str = "stock.picking";
pub const PICKING_FIELDS: &[&str] = &[
    "id",
    "name",
    "state",
    "partner_id",
    "x_time_from",
    "x_time_to",
    "date_done",
    "x_city",
    "x_customer_confirmation",
];
pub const PICKING_ORDER: &str = "x_time_from asc, id asc";

pub const EMPLOYEE_MODEL: &str = "hr.employee";
pub const EMPLOYEE_FIELDS: &[&str] = &["name"];

#[derive(Deserialize, Debug)]
pub struct Delivery {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub x_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub x_area: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub x_truck: Option<String>,
    #[serde(default)]
    pub x_drivers: Reference,
    #[serde(default, deserialize_with = "lenient::ids")]
    pub x_stock_picking_ids: Vec<i64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub x_status: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Picking {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(default)]
    pub partner_id: Reference,
    #[serde(default, deserialize_with = "lenient::float")]
    pub x_time_from: Option<f64>,
    #[serde(default, deserialize_with = "lenient::float")]
    pub x_time_to: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date_done: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub x_city: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub x_customer_confirmation: bool,
}

#[derive(Deserialize, Debug)]
pub struct Employee {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickingState {
    Draft,
    Waiting,
    Confirmed,
    Assigned,
    Done,
    Cancel,
    Unknown,
}

impl PickingState {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default().to_lowercase().as_str() {
            "draft" => PickingState::Draft,
            "waiting" => PickingState::Waiting,
            "confirmed" => PickingState::Confirmed,
            "assigned" => PickingState::Assigned,
            "done" => PickingState::Done,
            "cancel" => PickingState::Cancel,
            _ => PickingState::Unknown,
        }
    }

    /// Unknown states share the draft color.
    pub fn tone(self) -> Tone {
        match self {
            PickingState::Done => Tone::Success,
            PickingState::Cancel => Tone::Danger,
            PickingState::Assigned => Tone::Info,
            PickingState::Waiting | PickingState::Confirmed => Tone::Warning,
            PickingState::Draft | PickingState::Unknown => Tone::Secondary,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Danger,
    Info,
    Warning,
    Secondary,
}

impl Tone {
    pub fn row_class(self) -> &'static str {
        match self {
            Tone::Success => "list-group-item-success",
            Tone::Danger => "list-group-item-danger",
            Tone::Info => "list-group-item-info",
            Tone::Warning => "list-group-item-warning",
            Tone::Secondary => "list-group-item-secondary",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            Tone::Success => "text-bg-success",
            Tone::Danger => "text-bg-danger",
            Tone::Info => "text-bg-info",
            Tone::Warning => "text-bg-warning",
            Tone::Secondary => "text-bg-secondary",
        }
    }
}

/// A picking as shown inside a card.
#[derive(Clone, Debug, Serialize)]
pub struct PickingLine {
    pub id: i64,
    pub name: Option<String>,
    pub state: Option<String>,
    pub partner_id: Reference,
    pub partner_name: String,
    pub x_time_from: String,
    pub x_time_to: Option<f64>,
    pub date_done: Option<String>,
    pub x_city: Option<String>,
    pub x_customer_confirmation: bool,
    pub row_class: &'static str,
    pub badge_class: &'static str,
    pub time_badge_class: &'static str,
    #[serde(skip)]
    pub lifecycle: PickingState,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProgressKpi {
    pub total: usize,
    pub active: usize,
    pub done: usize,
    pub not_done: usize,
    pub cancel: usize,
    pub pct: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConfirmationKpi {
    pub active: usize,
    pub yes: usize,
    pub no: usize,
    pub pct: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct Card {
    pub id: i64,
    pub date: String,
    pub area: Option<String>,
    pub status: Option<String>,
    pub status_label: String,
    pub truck: String,
    pub drivers: String,
    pub pickings: Vec<PickingLine>,
    pub kpi_progress: ProgressKpi,
    pub kpi_customer_confirmation: ConfirmationKpi,
}
