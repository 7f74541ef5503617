//! Wire types shared between the ask client and its hosts.

pub mod event;
pub mod protocol;

pub use event::PanelEvent;
pub use protocol::{
    AskReply, AskRequest, EarningsData, ErrorBody, QueryAssumptions, QueryContext, SourceRef,
};
