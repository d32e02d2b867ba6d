//! Contiguous-priority planning for user-orderable containers.
//!
//! Boards (one global list), the statuses of a board and the books of a
//! status are all containers whose children carry a `priority` that must be
//! exactly `0..n-1`. The functions here only compute final orderings; the
//! persistence layer fetches the current order, asks for a plan and writes
//! every priority of the planned sequences inside one transaction.

use serde::{Deserialize, Serialize};

use crate::types::Priority;

// ---------------------------------------------------------------------------
// Move request / outcome types
// ---------------------------------------------------------------------------

/// A drop gesture: move `source_item` (currently in `source_container`)
/// next to `destination_item` inside `destination_container`.
///
/// `destination_item` is `None` when the item was dropped onto an empty
/// container or onto a container's edge drop zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest<Id> {
    pub source_item: Id,
    pub source_container: Id,
    pub destination_item: Option<Id>,
    pub destination_container: Id,
    /// Append to the end of the destination instead of taking the anchor's slot.
    #[serde(default)]
    pub insert_at_end: bool,
}

impl<Id: PartialEq> MoveRequest<Id> {
    /// Whether the item changes parent.
    pub fn is_cross_container(&self) -> bool {
        self.source_container != self.destination_container
    }

    /// Whether the item was dropped onto itself.
    pub fn is_self_drop(&self) -> bool {
        self.destination_item.as_ref() == Some(&self.source_item)
    }
}

/// Why a move was refused. A rejected move writes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    #[error("item was dropped onto itself")]
    SelfDrop,

    #[error("source item is not in the source container")]
    SourceNotFound,

    #[error("destination item is not in the destination container")]
    DestinationNotFound,
}

/// Final orderings produced by [`plan_move`]. An item's new priority is
/// its index in the sequence that contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovePlan<Id> {
    /// The item stayed in its container.
    Within { order: Vec<Id> },
    /// The item changed container; both containers are renumbered.
    Across {
        source: Vec<Id>,
        destination: Vec<Id>,
    },
}

impl<Id: Copy> MovePlan<Id> {
    /// Final order of the destination container (the only container for
    /// an in-place move).
    pub fn destination_order(&self) -> &[Id] {
        match self {
            MovePlan::Within { order } => order,
            MovePlan::Across { destination, .. } => destination,
        }
    }

    /// Final order of the source container, if it differs from the destination.
    pub fn source_order(&self) -> Option<&[Id]> {
        match self {
            MovePlan::Within { .. } => None,
            MovePlan::Across { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Compute the final orderings for a move.
///
/// `source_items` and `destination_items` must be the current children of
/// the two containers sorted by priority. For an in-place move the
/// destination slice is ignored.
///
/// A drop without an anchor puts the item first in the destination, or
/// last when `insert_at_end` is set.
pub fn plan_move<Id: Copy + PartialEq>(
    request: &MoveRequest<Id>,
    source_items: &[Id],
    destination_items: &[Id],
) -> Result<MovePlan<Id>, MoveRejection> {
    if request.is_self_drop() {
        return Err(MoveRejection::SelfDrop);
    }

    let source_index =
        index_of(source_items, request.source_item).ok_or(MoveRejection::SourceNotFound)?;

    if !request.is_cross_container() {
        let anchor_index = match request.destination_item {
            Some(anchor) => {
                Some(index_of(source_items, anchor).ok_or(MoveRejection::DestinationNotFound)?)
            }
            None => None,
        };

        let mut order = source_items.to_vec();
        let item = order.remove(source_index);
        place(&mut order, item, anchor_index, request.insert_at_end);
        return Ok(MovePlan::Within { order });
    }

    let anchor_index = match request.destination_item {
        Some(anchor) => Some(
            index_of(destination_items, anchor).ok_or(MoveRejection::DestinationNotFound)?,
        ),
        None => None,
    };

    let mut source = source_items.to_vec();
    let item = source.remove(source_index);

    let mut destination: Vec<Id> = destination_items
        .iter()
        .copied()
        .filter(|id| *id != item)
        .collect();
    place(&mut destination, item, anchor_index, request.insert_at_end);

    Ok(MovePlan::Across {
        source,
        destination,
    })
}

fn place<Id>(order: &mut Vec<Id>, item: Id, anchor_index: Option<usize>, insert_at_end: bool) {
    if insert_at_end {
        order.push(item);
        return;
    }
    let index = anchor_index.unwrap_or(0).min(order.len());
    order.insert(index, item);
}

fn index_of<Id: PartialEq>(items: &[Id], id: Id) -> Option<usize> {
    items.iter().position(|candidate| *candidate == id)
}

// ---------------------------------------------------------------------------
// Priority helpers
// ---------------------------------------------------------------------------

/// Priority for an item appended to a container that currently holds
/// `count` children.
pub fn next_priority(count: usize) -> Priority {
    count as Priority
}

/// Pair every id with its priority (its index).
pub fn assign_priorities<Id: Copy>(order: &[Id]) -> Vec<(Id, Priority)> {
    order
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index as Priority))
        .collect()
}

/// Whether `priorities` is a permutation of `0..n-1`.
pub fn is_contiguous(priorities: &[Priority]) -> bool {
    let mut sorted = priorities.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .enumerate()
        .all(|(index, priority)| *priority == index as Priority)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
