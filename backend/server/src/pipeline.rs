//! # Aggregation
//!
//! Builds the dashboard cards from Odoo in four reads:
//!
//! 1. Displayed tournées, ordered by date, truck, id
//! 2. Labels of the `x_status` selection
//! 3. Every picking referenced by those tournées, skipped when there are none
//! 4. Drivers stored as raw employee ids, skipped when there are none
//!
//! Any failed read fails the run and nothing gets cached. Odd field values
//! never do: they fall back to empty text or the unknown state.
//!
//! ## Lateness
//! A done picking gets a red time badge when it was validated today (Zurich
//! time) after the end of its time window. Pickings finished on another day
//! keep their state color.
use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Timelike};
use chrono_tz::Tz;
use odoo::{OdooError, Reference, RemoteClient};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{
    format::{hours_to_clock, hours_to_minutes, iso_date_to_display, parse_backend_timestamp},
    models::{
        Card, ConfirmationKpi, DELIVERY_FIELDS, DELIVERY_MODEL, DELIVERY_ORDER,
        DELIVERY_STATUS_FIELD, Delivery, EMPLOYEE_FIELDS, EMPLOYEE_MODEL, Employee,
        PICKING_FIELDS, PICKING_MODEL, PICKING_ORDER, Picking, PickingLine, PickingState,
        ProgressKpi, Tone,
    },
    utils::{decode_records, percentage},
};

pub async fn run_dashboard_aggregation(
    client: &dyn RemoteClient,
    now: DateTime<Tz>,
) -> Result<Vec<Card>, OdooError> {
    let deliveries: Vec<Delivery> = decode_records(
        DELIVERY_MODEL,
        client
            .search_read(
                DELIVERY_MODEL,
                json!([["x_display", "=", true]]),
                DELIVERY_FIELDS,
                DELIVERY_ORDER,
            )
            .await?,
    );

    let status_labels = fetch_status_labels(client).await?;
    let pickings = fetch_pickings(client, &deliveries, now.date_naive()).await?;
    let drivers = fetch_driver_names(client, &deliveries).await?;

    let cards: Vec<Card> = deliveries
        .into_iter()
        .map(|delivery| build_card(delivery, &status_labels, &pickings, &drivers))
        .collect();

    info!(
        "Aggregated {} deliveries with {} pickings",
        cards.len(),
        pickings.len()
    );

    Ok(cards)
}

async fn fetch_status_labels(
    client: &dyn RemoteClient,
) -> Result<HashMap<String, String>, OdooError> {
    let info = client
        .fields_get(DELIVERY_MODEL, &[DELIVERY_STATUS_FIELD], &["selection"])
        .await?;

    Ok(selection_labels(&info, DELIVERY_STATUS_FIELD))
}

/// Reads `[[key, label], ...]` out of a `fields_get` answer.
fn selection_labels(info: &Value, field: &str) -> HashMap<String, String> {
    info.get(field)
        .and_then(|f| f.get("selection"))
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .filter_map(|option| match option.as_array()?.as_slice() {
                    [Value::String(key), Value::String(label)] => {
                        Some((key.clone(), label.clone()))
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

async fn fetch_pickings(
    client: &dyn RemoteClient,
    deliveries: &[Delivery],
    today: NaiveDate,
) -> Result<HashMap<i64, PickingLine>, OdooError> {
    let ids: BTreeSet<i64> = deliveries
        .iter()
        .flat_map(|d| d.x_stock_picking_ids.iter().copied())
        .collect();

    if ids.is_empty() {
        debug!("No pickings referenced, skipping {PICKING_MODEL}");
        return Ok(HashMap::new());
    }

    let pickings: Vec<Picking> = decode_records(
        PICKING_MODEL,
        client
            .search_read(
                PICKING_MODEL,
                json!([["id", "in", ids]]),
                PICKING_FIELDS,
                PICKING_ORDER,
            )
            .await?,
    );

    Ok(pickings
        .into_iter()
        .map(|picking| (picking.id, picking_line(picking, today)))
        .collect())
}

fn picking_line(picking: Picking, today: NaiveDate) -> PickingLine {
    let lifecycle = PickingState::parse(picking.state.as_deref());
    let tone = lifecycle.tone();
    let time_tone = time_tone(&picking, lifecycle, today);

    #[cfg(feature = "verbose")]
    debug!(
        "Picking {} state {:?} tone {:?} time tone {:?}",
        picking.id, lifecycle, tone, time_tone
    );

    PickingLine {
        id: picking.id,
        partner_name: picking.partner_id.label().unwrap_or_default().to_string(),
        x_time_from: hours_to_clock(picking.x_time_from),
        name: picking.name,
        state: picking.state,
        partner_id: picking.partner_id,
        x_time_to: picking.x_time_to,
        date_done: picking.date_done,
        x_city: picking.x_city,
        x_customer_confirmation: picking.x_customer_confirmation,
        row_class: tone.row_class(),
        badge_class: tone.badge_class(),
        time_badge_class: time_tone.badge_class(),
        lifecycle,
    }
}

fn time_tone(picking: &Picking, lifecycle: PickingState, today: NaiveDate) -> Tone {
    let tone = lifecycle.tone();

    if lifecycle != PickingState::Done {
        return tone;
    }

    let done_at = picking.date_done.as_deref().and_then(parse_backend_timestamp);
    let deadline = hours_to_minutes(picking.x_time_to);

    let (Some(done_at), Some(deadline)) = (done_at, deadline) else {
        return tone;
    };

    if done_at.date_naive() != today {
        return tone;
    }

    let done_minutes = i64::from(done_at.hour() * 60 + done_at.minute());
    if done_minutes > deadline {
        Tone::Danger
    } else {
        tone
    }
}

async fn fetch_driver_names(
    client: &dyn RemoteClient,
    deliveries: &[Delivery],
) -> Result<HashMap<i64, String>, OdooError> {
    let ids: Vec<i64> = deliveries
        .iter()
        .flat_map(|d| d.x_drivers.unresolved_ids().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if ids.is_empty() {
        debug!("No unresolved drivers, skipping {EMPLOYEE_MODEL}");
        return Ok(HashMap::new());
    }

    let employees: Vec<Employee> = decode_records(
        EMPLOYEE_MODEL,
        client.read(EMPLOYEE_MODEL, &ids, EMPLOYEE_FIELDS).await?,
    );

    Ok(employees
        .into_iter()
        .map(|e| (e.id, e.name.unwrap_or_default()))
        .collect())
}

fn driver_label(drivers: &Reference, names: &HashMap<i64, String>) -> String {
    match drivers {
        Reference::Resolved { label, .. } => label.clone(),
        Reference::Unresolved(ids) => ids
            .iter()
            .filter_map(|id| names.get(id).filter(|name| !name.is_empty()))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        Reference::Empty => String::new(),
    }
}

fn build_card(
    delivery: Delivery,
    status_labels: &HashMap<String, String>,
    pickings: &HashMap<i64, PickingLine>,
    drivers: &HashMap<i64, String>,
) -> Card {
    let lines: Vec<PickingLine> = delivery
        .x_stock_picking_ids
        .iter()
        .filter_map(|id| pickings.get(id).cloned())
        .collect();

    let status_label = delivery
        .x_status
        .as_ref()
        .map(|code| status_labels.get(code).unwrap_or(code).clone())
        .unwrap_or_default();

    Card {
        id: delivery.id,
        date: iso_date_to_display(delivery.x_date.as_deref().unwrap_or_default()),
        area: delivery.x_area,
        status: delivery.x_status,
        status_label,
        truck: delivery.x_truck.unwrap_or_default(),
        drivers: driver_label(&delivery.x_drivers, drivers),
        kpi_progress: progress_kpi(&lines),
        kpi_customer_confirmation: confirmation_kpi(&lines),
        pickings: lines,
    }
}

/// Cancelled pickings count in `total` but not in `active`.
pub fn progress_kpi(lines: &[PickingLine]) -> ProgressKpi {
    let total = lines.len();
    let count = |state: PickingState| lines.iter().filter(|l| l.lifecycle == state).count();

    let done = count(PickingState::Done);
    let cancel = count(PickingState::Cancel);
    let active = total.saturating_sub(cancel);

    ProgressKpi {
        total,
        active,
        done,
        not_done: active.saturating_sub(done),
        cancel,
        pct: percentage(done, active),
    }
}

pub fn confirmation_kpi(lines: &[PickingLine]) -> ConfirmationKpi {
    let active = lines
        .iter()
        .filter(|l| l.lifecycle != PickingState::Cancel);

    let (count, yes) = active.fold((0, 0), |(count, yes), line| {
        (count + 1, yes + usize::from(line.x_customer_confirmation))
    });

    ConfirmationKpi {
        active: count,
        yes,
        no: count.saturating_sub(yes),
        pct: percentage(yes, count),
    }
}
