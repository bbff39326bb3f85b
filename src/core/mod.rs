pub mod api;
pub mod display;
pub mod panel;
pub mod ticket;

pub use crate::domain::model::{
    BoardState, DisplaySnapshot, QueueEntry, RequestCode, TicketIssued, TicketRequest,
};
pub use crate::domain::ports::{ClientConfig, DisplayView, KioskView, PanelView, TicketDelivery};
pub use crate::utils::error::Result;
