//! Priority scheduler for pending interrupt requests.
//!
//! Uses a `BinaryHeap` keyed by `(priority, Reverse(request_id))`: the
//! highest priority pops first, and among equal priorities the request
//! that entered the queue first pops first. Request IDs are minted here on
//! enqueue, so two runs feeding the same requests in the same order always
//! select them in the same order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::device::{DeviceKind, Priority};
use crate::error::SimError;
use crate::interrupt::{InterruptRequest, RequestId, RequestIdGen};

// ── Priority table ────────────────────────────────────────────────────

/// Maps device kinds to their scheduling rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    ranks: BTreeMap<DeviceKind, Priority>,
}

impl PriorityTable {
    /// A table with no ranked kinds at all.
    pub fn empty() -> Self {
        PriorityTable {
            ranks: BTreeMap::new(),
        }
    }

    /// Keyboard 3, printer 2, disk 1.
    pub fn reference() -> Self {
        let ranks = DeviceKind::REFERENCE
            .iter()
            .filter_map(|&kind| Some((kind, kind.reference_priority()?)))
            .collect();
        PriorityTable { ranks }
    }

    /// Set (or replace) the rank for `kind`.
    pub fn set(&mut self, kind: DeviceKind, priority: Priority) {
        self.ranks.insert(kind, priority);
    }

    /// Configured rank, if any.
    pub fn get(&self, kind: DeviceKind) -> Option<Priority> {
        self.ranks.get(&kind).copied()
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self::reference()
    }
}

// ── Queue entry ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Pending {
    priority: Priority,
    id: RequestId,
    request: InterruptRequest,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Pending {}

/// Higher priority first, then lower ID (earlier enqueue) first.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ── Enqueue result ────────────────────────────────────────────────────

/// What the scheduler did with an enqueued request.
#[derive(Debug, Clone, PartialEq)]
pub struct Enqueued {
    pub id: RequestId,
    pub priority: Priority,
    /// Set to `UnknownDeviceKind` when the kind had no configured rank.
    /// The request is queued regardless.
    pub warning: Option<SimError>,
}

// ── Scheduler ─────────────────────────────────────────────────────────

/// Holds every pending interrupt request until it is selected.
///
/// Each request inserted is returned exactly once by `select_next`.
#[derive(Debug, Clone)]
pub struct PriorityScheduler {
    queue: BinaryHeap<Pending>,
    table: PriorityTable,
    id_gen: RequestIdGen,
}

impl PriorityScheduler {
    /// An empty scheduler using the reference ranking.
    pub fn new() -> Self {
        Self::with_table(PriorityTable::reference())
    }

    /// An empty scheduler using a custom ranking.
    pub fn with_table(table: PriorityTable) -> Self {
        PriorityScheduler {
            queue: BinaryHeap::new(),
            table,
            id_gen: RequestIdGen::new(),
        }
    }

    pub fn table(&self) -> &PriorityTable {
        &self.table
    }

    /// Queue a request, stamping it with a fresh `RequestId`.
    ///
    /// Kinds missing from the table are queued at [`Priority::LOWEST`]
    /// with a warning.
    pub fn enqueue(&mut self, mut request: InterruptRequest) -> Enqueued {
        let (priority, warning) = match self.table.get(request.device) {
            Some(priority) => (priority, None),
            None => {
                log::warn!(
                    "interrupt from unranked device {}; queued with lowest priority",
                    request.device
                );
                (Priority::LOWEST, Some(SimError::UnknownDeviceKind(request.device)))
            }
        };

        let id = self.id_gen.next_id();
        request.id = Some(id);
        log::debug!(
            "enqueue {} from {} (priority {}, created {})",
            id,
            request.device,
            priority,
            request.created_at
        );
        self.queue.push(Pending {
            priority,
            id,
            request,
        });

        Enqueued {
            id,
            priority,
            warning,
        }
    }

    /// Returns `true` if any request is waiting.
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Remove and return the highest-priority request.
    ///
    /// Returns `None` when the queue is empty.
    pub fn select_next(&mut self) -> Option<InterruptRequest> {
        let next = self.queue.pop()?;
        log::debug!("select {} from {} ({})", next.id, next.request.device, next.priority);
        Some(next.request)
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drain all requests in selection order.
    pub fn drain_ordered(&mut self) -> Vec<InterruptRequest> {
        let mut out = Vec::with_capacity(self.queue.len());
        while let Some(req) = self.select_next() {
            out.push(req);
        }
        out
    }
}

impl Default for PriorityScheduler {
    fn default() -> Self {
        Self::new()
    }
}
