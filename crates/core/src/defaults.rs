//! Seed data for new boards.

/// Name of the board created on first launch.
pub const DEFAULT_BOARD_NAME: &str = "Default";

/// Cover shown for books without a thumbnail.
pub const NO_IMAGE_THUMBNAIL_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/1/14/No_Image_Available.jpg";

/// A status every new board starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultStatus {
    pub title: &'static str,
    pub color: &'static str,
}

/// Columns of a fresh board, in priority order.
pub const DEFAULT_STATUSES: [DefaultStatus; 4] = [
    DefaultStatus {
        title: "Backlog",
        color: "91918E",
    },
    DefaultStatus {
        title: "Todo",
        color: "6B94B7",
    },
    DefaultStatus {
        title: "In progress",
        color: "8460CC",
    },
    DefaultStatus {
        title: "Completed",
        color: "769980",
    },
];
