//! In-memory Odoo stand-in for pipeline and route tests.
use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use odoo::{OdooError, RemoteClient};
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::models::{DELIVERY_MODEL, EMPLOYEE_MODEL, PICKING_MODEL};

type Call = (String, String, Value, Value);

#[derive(Default)]
pub struct FakeClient {
    responses: HashMap<(String, String), Value>,
    failing: Option<(String, String)>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Three tournées, four pickings plus one dangling id, three drivers.
    pub fn sample() -> Self {
        Self::new()
            .with(
                DELIVERY_MODEL,
                "search_read",
                json!([
                    {
                        "id": 1, "x_display": true, "x_date": "2025-07-15", "x_area": "Lausanne",
                        "x_truck": "T1", "x_drivers": [1, 2], "x_stock_picking_ids": [11, 10, 12],
                        "x_status": "on_the_way"
                    },
                    {
                        "id": 2, "x_display": true, "x_date": "2025-07-15", "x_area": "Genève",
                        "x_truck": false, "x_drivers": [3], "x_stock_picking_ids": [13, 99],
                        "x_status": "unmapped"
                    },
                    {
                        "id": 3, "x_display": true, "x_date": "2025-07-16", "x_area": false,
                        "x_truck": "T2", "x_drivers": false, "x_stock_picking_ids": false,
                        "x_status": false
                    }
                ]),
            )
            .with(
                DELIVERY_MODEL,
                "fields_get",
                json!({
                    "x_status": {
                        "selection": [["open", "Ouvert"], ["full", "Complet"], ["on_the_way", "En route"]]
                    }
                }),
            )
            .with(
                PICKING_MODEL,
                "search_read",
                json!([
                    {
                        "id": 11, "name": "WH/OUT/00011", "state": "assigned", "partner_id": [6, "Café Central"],
                        "x_time_from": 8.5, "x_time_to": 9.0, "date_done": false, "x_city": "Renens",
                        "x_customer_confirmation": false
                    },
                    {
                        "id": 13, "name": "WH/OUT/00013", "state": "waiting", "partner_id": false,
                        "x_time_from": 10.0, "x_time_to": 11.0, "date_done": false, "x_city": false,
                        "x_customer_confirmation": true
                    },
                    {
                        "id": 10, "name": "WH/OUT/00010", "state": "done", "partner_id": [5, "Boulangerie du Lac"],
                        "x_time_from": 13.0, "x_time_to": 14.0, "date_done": "2025-07-15 13:10:00",
                        "x_city": "Morges", "x_customer_confirmation": true
                    },
                    {
                        "id": 12, "name": "WH/OUT/00012", "state": "cancel", "partner_id": [7, "Hôtel du Port"],
                        "x_time_from": 15.0, "x_time_to": 16.0, "date_done": false, "x_city": "Nyon",
                        "x_customer_confirmation": true
                    }
                ]),
            )
            .with(
                EMPLOYEE_MODEL,
                "read",
                json!([
                    { "id": 1, "name": "Alice" },
                    { "id": 2, "name": "Bruno" },
                    { "id": 3, "name": "Chloé" }
                ]),
            )
    }

    pub fn with(mut self, model: &str, method: &str, response: Value) -> Self {
        self.responses
            .insert((model.to_string(), method.to_string()), response);
        self
    }

    pub fn failing_on(mut self, model: &str, method: &str) -> Self {
        self.failing = Some((model.to_string(), method.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, model: &str, method: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|(m, f, _, _)| m == model && f == method)
            .count()
    }
}

#[async_trait]
impl RemoteClient for FakeClient {
    async fn call_kw(
        &self,
        model: &str,
        method: &str,
        args: Value,
        kwargs: Value,
    ) -> Result<Value, OdooError> {
        self.calls
            .lock()
            .push((model.to_string(), method.to_string(), args, kwargs));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self
            .failing
            .as_ref()
            .is_some_and(|(m, f)| m == model && f == method)
        {
            return Err(OdooError::Remote {
                message: format!("{model}.{method} is unavailable"),
                data: Value::Null,
            });
        }

        self.responses
            .get(&(model.to_string(), method.to_string()))
            .cloned()
            .ok_or_else(|| OdooError::Protocol(format!("No fixture for {model}.{method}")))
    }
}
