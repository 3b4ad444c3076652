//! Timed one-shot events.
//!
//! The [`Scheduler`] is a bounded table of callbacks with an absolute tick
//! deadline. [`poll_schedule`] runs once per tick and fires every event whose
//! deadline has been reached, then removes it.
//!
//! # Firing rules
//!
//! - An event fires at the first poll with `tick >= deadline`, exactly once.
//! - A deadline already in the past fires on the next poll.
//! - Events due in the same poll fire in table-slot order, not deadline order.
//! - The due set is captured when the poll starts: events scheduled by a
//!   callback are never fired by the same poll, even if already due.
//!
//! # Example
//!
//! ```ignore
//! world.scheduler.schedule(8000, |world, now| {
//!     log::info!("tick {now}: {} entities alive", world.entities.live_count());
//! })?;
//! ```

use log::{error, trace};
use smallvec::SmallVec;

use crate::error::CoreError;
use crate::world::World;

/// Number of event slots.
pub const MAX_SCHEDULED: usize = 256;

/// Callback invoked with the world and the tick it fired on.
pub type EventCallback = Box<dyn FnOnce(&mut World, u64)>;

/// Handle to a scheduled event. Goes stale once the event fired or was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId {
    index: u32,
    generation: u32,
}

impl EventId {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

#[derive(Default)]
struct ScheduledEvent {
    active: bool,
    deadline: u64,
    generation: u32,
    callback: Option<EventCallback>,
}

pub struct Scheduler {
    slots: Vec<ScheduledEvent>,
    capacity: usize,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_capacity(MAX_SCHEDULED)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of events waiting to fire.
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|slot| slot.active).count()
    }

    /// Register `callback` to fire at the first poll with `tick >= deadline`.
    pub fn schedule<F>(&mut self, deadline: u64, callback: F) -> Result<EventId, CoreError>
    where
        F: FnOnce(&mut World, u64) + 'static,
    {
        let index = match self.slots.iter().position(|slot| !slot.active) {
            Some(index) => index,
            None if self.slots.len() < self.capacity => {
                self.slots.push(ScheduledEvent::default());
                self.slots.len() - 1
            }
            None => {
                error!("reached limit of active schedules ({})", self.capacity);
                return Err(CoreError::AtCapacity {
                    table: "scheduler",
                    capacity: self.capacity,
                });
            }
        };
        let slot = &mut self.slots[index];
        slot.active = true;
        slot.deadline = deadline;
        slot.callback = Some(Box::new(callback));
        trace!("scheduled event #{index} for tick {deadline}");
        Ok(EventId {
            index: index as u32,
            generation: slot.generation,
        })
    }

    /// Remove a pending event without firing it. Returns false if it already
    /// fired or was cancelled.
    pub fn cancel(&mut self, id: EventId) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                Self::retire(slot);
                trace!("cancelled event #{}", id.index);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, id: EventId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| slot.active && slot.generation == id.generation)
    }

    fn slot_mut(&mut self, id: EventId) -> Option<&mut ScheduledEvent> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.active && slot.generation == id.generation)
    }

    fn retire(slot: &mut ScheduledEvent) {
        slot.active = false;
        slot.callback = None;
        slot.generation = slot.generation.wrapping_add(1);
    }

    /// Active events due at `tick`, in slot order.
    fn due(&self, tick: u64) -> SmallVec<[EventId; 16]> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active && slot.deadline <= tick)
            .map(|(index, slot)| EventId {
                index: index as u32,
                generation: slot.generation,
            })
            .collect()
    }

    /// Deactivate a due event and hand back its callback.
    fn take(&mut self, id: EventId) -> Option<EventCallback> {
        let slot = self.slot_mut(id)?;
        let callback = slot.callback.take();
        Self::retire(slot);
        callback
    }
}

/// Fire every event due at `tick`. Returns how many fired.
pub fn poll_schedule(world: &mut World, tick: u64) -> usize {
    let due = world.scheduler.due(tick);
    let mut fired = 0;
    for id in due {
        // An earlier callback in this pass may have cancelled it
        let Some(callback) = world.scheduler.take(id) else {
            continue;
        };
        trace!("firing event #{} at tick {tick}", id.index);
        callback(world, tick);
        fired += 1;
    }
    fired
}
