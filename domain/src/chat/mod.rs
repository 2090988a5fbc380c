//! Chat events as seen by the bot.
//!
//! The transport adapter translates protocol traffic into [`ChatEvent`]s;
//! [`ChatEvent::display_line`] renders the backlog line conventions the
//! classifier depends on.

pub mod event;

pub use event::ChatEvent;
