use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::beach_line::ArcId;

pub(crate) type EventId = usize;

/// A sweep event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Event {
    /// The sweep line reaches the site with this index.
    Site { site: usize, x: f64, y: f64 },
    /// The arc collapses into a Voronoi vertex at `center`; `y` is the top of
    /// the circle through the three sites involved.
    Circle { arc: ArcId, center: [f64; 2], y: f64 },
}

impl Event {
    fn key(&self, seq: usize) -> EventKey {
        match *self {
            Event::Site { x, y, .. } => EventKey { y, x, rank: 1, seq },
            Event::Circle { center, y, .. } => EventKey {
                y,
                x: center[0],
                rank: 0,
                seq,
            },
        }
    }
}

/// Processing order: `y`, then `x`, circle events before site events at the
/// same point, then insertion order.
#[derive(Clone, Copy, Debug)]
struct EventKey {
    y: f64,
    x: f64,
    rank: u8,
    seq: usize,
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventKey {}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.x.total_cmp(&other.x))
            .then_with(|| self.rank.cmp(&other.rank))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

struct Slot {
    event: Event,
    live: bool,
}

/// Min-priority queue of sweep events with lazy removal.
pub(crate) struct EventQueue {
    heap: BinaryHeap<Reverse<(EventKey, EventId)>>,
    slots: Vec<Slot>,
    live: usize,
}

impl EventQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            live: 0,
        }
    }

    pub fn insert(&mut self, event: Event) -> EventId {
        let id = self.slots.len();
        self.heap.push(Reverse((event.key(id), id)));
        self.slots.push(Slot { event, live: true });
        self.live += 1;
        id
    }

    /// Cancels a pending event. Unknown, popped or already cancelled ids are ignored.
    pub fn remove_if_present(&mut self, id: EventId) -> bool {
        match self.slots.get_mut(id) {
            Some(slot) if slot.live => {
                slot.live = false;
                self.live -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        while let Some(Reverse((_, id))) = self.heap.pop() {
            let slot = &mut self.slots[id];
            if slot.live {
                slot.live = false;
                self.live -= 1;
                return Some(slot.event);
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}
