//! Message domain: the chat-completion message array as captured.
//!
//! The host's memory component owns the live message array; capture points
//! copy it into [`view::MessageView`]s at the instant of the call and never
//! hold references back into host state.

pub mod entities;
pub mod tool_call;
pub mod view;
