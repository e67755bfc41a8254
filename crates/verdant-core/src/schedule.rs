//! Rescheduling decisions for calendar items.
//!
//! Moving an item to another day is decided here and applied elsewhere:
//! [`reschedule`] only answers whether a write is needed and what it is. The
//! caller sends the resulting [`UpdateIntent`] to the data layer and updates
//! its own copy once the write is confirmed.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::models::ScheduledItem;

/// A proposed due-date change for a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateIntent {
    pub id: u64,
    pub due_on: Date,
}

/// Decides whether moving `item` to `new_date` needs a write.
///
/// Goals cannot be moved, and dropping an item back on its own day changes
/// nothing; both answer `None`.
///
/// ```rust
/// use jiff::civil::date;
/// use verdant_core::{schedule::reschedule, ItemKind, ScheduledItem};
///
/// let todo = ScheduledItem {
///     id: 4,
///     kind: ItemKind::Todo,
///     name: "Top up soil".to_string(),
///     due: date(2024, 3, 15),
/// };
///
/// assert!(reschedule(&todo, date(2024, 3, 15)).is_none());
/// let intent = reschedule(&todo, date(2024, 3, 18)).unwrap();
/// assert_eq!((intent.id, intent.due_on), (4, date(2024, 3, 18)));
/// ```
pub fn reschedule(item: &ScheduledItem, new_date: Date) -> Option<UpdateIntent> {
    if !item.is_mutable() {
        log::debug!("{:?} {} cannot be rescheduled", item.kind, item.id);
        return None;
    }
    if item.due == new_date {
        return None;
    }
    Some(UpdateIntent {
        id: item.id,
        due_on: new_date,
    })
}

/// The state of an item captured when a drag starts.
///
/// Dropping decides against this snapshot, never against a copy fetched
/// later. Discarding the snapshot cancels the drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSnapshot {
    origin: ScheduledItem,
}

impl DragSnapshot {
    pub fn start(item: &ScheduledItem) -> Self {
        Self {
            origin: item.clone(),
        }
    }

    pub fn origin(&self) -> &ScheduledItem {
        &self.origin
    }

    /// Whether the origin item can be dragged at all.
    pub fn is_draggable(&self) -> bool {
        self.origin.is_mutable()
    }

    /// Ends the drag on `day`.
    pub fn drop_on(self, day: Date) -> Option<UpdateIntent> {
        reschedule(&self.origin, day)
    }
}
