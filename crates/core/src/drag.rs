//! Drag-and-drop payloads.
//!
//! The UI drag source serialises the dragged card or column into a small
//! JSON document; the drop target decodes it and turns it into a
//! [`MoveRequest`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::reorder::MoveRequest;
use crate::types::DbId;

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    /// A book card; its container is a status.
    Book,
    /// A status column; its container is a board.
    Status,
}

/// A dragged item together with the container it was picked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub kind: DragKind,
    pub item_id: DbId,
    pub container_id: DbId,
}

impl DragPayload {
    pub fn book(book_id: DbId, status_id: DbId) -> Self {
        Self {
            kind: DragKind::Book,
            item_id: book_id,
            container_id: status_id,
        }
    }

    pub fn status(status_id: DbId, board_id: DbId) -> Self {
        Self {
            kind: DragKind::Status,
            item_id: status_id,
            container_id: board_id,
        }
    }

    pub fn encode(&self) -> Result<String, CoreError> {
        serde_json::to_string(self)
            .map_err(|e| CoreError::Internal(format!("failed to encode drag payload: {e}")))
    }

    pub fn decode(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("unrecognised drag payload: {e}")))
    }

    /// Build the move request for dropping this payload.
    pub fn into_move_request(
        self,
        destination_item: Option<DbId>,
        destination_container: DbId,
        insert_at_end: bool,
    ) -> MoveRequest<DbId> {
        MoveRequest {
            source_item: self.item_id,
            source_container: self.container_id,
            destination_item,
            destination_container,
            insert_at_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::new_id;

    #[test]
    fn encodes_kind_tag() {
        let payload = DragPayload::book(new_id(), new_id());
        let json = payload.encode().unwrap();
        assert!(json.contains("\"kind\":\"book\""));
        assert_eq!(DragPayload::decode(&json).unwrap(), payload);
    }

    #[test]
    fn rejects_unknown_kind() {
        let raw = format!(
            r#"{{"kind":"tag","item_id":"{}","container_id":"{}"}}"#,
            new_id(),
            new_id()
        );
        assert!(DragPayload::decode(&raw).is_err());
    }

    #[test]
    fn move_request_carries_source_pair() {
        let (status, board, anchor, target) = (new_id(), new_id(), new_id(), new_id());
        let request =
            DragPayload::status(status, board).into_move_request(Some(anchor), target, false);
        assert_eq!(request.source_item, status);
        assert_eq!(request.source_container, board);
        assert_eq!(request.destination_item, Some(anchor));
        assert!(request.is_cross_container());
    }
}
