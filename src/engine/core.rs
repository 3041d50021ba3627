// 6.0 engine/core.rs: main engine. holds the ledger, the order index, and the audit log.

use super::config::EngineConfig;
use crate::events::{Event, EventId, EventPayload};
use crate::ledger::Ledger;
use crate::order::Order;
use crate::types::{OrderId, Timestamp};
use std::collections::HashMap;
use tracing::debug;

/** 6.1: engine struct. all mutable state lives here, behind &mut self */
#[derive(Debug)]
pub struct Engine {
    pub(super) config: EngineConfig,
    pub(super) ledger: Ledger,
    pub(super) orders: HashMap<OrderId, Order>,
    // ids of pending orders, in placement order
    pub(super) open_orders: Vec<OrderId>,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
    pub(super) next_order_id: u64,
    pub(super) current_time: Timestamp,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let ledger = Ledger::new(config.initial_cash);
        Self {
            config,
            ledger,
            orders: HashMap::new(),
            open_orders: Vec::new(),
            events: Vec::new(),
            next_event_id: 1,
            next_order_id: 1,
            current_time: Timestamp::from_millis(0),
        }
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// Pending orders, in placement order.
    pub fn open_orders(&self) -> impl Iterator<Item = &Order> {
        self.open_orders.iter().filter_map(|id| self.orders.get(id))
    }

    pub fn open_order_count(&self) -> usize {
        self.open_orders.len()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;

        debug!("event {}: {:?}", event.id.0, event.payload);

        self.events.push(event);

        if self.events.len() > self.config.max_events {
            let drain_count = self.events.len() - self.config.max_events;
            self.events.drain(0..drain_count);
        }
    }
}
