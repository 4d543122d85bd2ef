//! Text frames pushed to connected clients.
//!
//! Session notices (join/leave/echo/relay) come from the gateway loop;
//! mutation notices come from the resource routes after a successful write.

use std::fmt;

use super::types::ClientId;

/// Resource kinds that can appear in a mutation notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Category,
    Item,
    User,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Category => "Category",
            ResourceKind::Item => "Item",
            ResourceKind::User => "User",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound text frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice<'a> {
    /// `Client #<id> joined the chat`
    Joined { client: ClientId },
    /// `Client #<id> left the chat`
    Left { client: ClientId },
    /// `You wrote: <text>` (sender only)
    Echo { text: &'a str },
    /// `Client #<id> says: <text>` (everyone, sender included)
    Says { client: ClientId, text: &'a str },
    /// `<Kind> added: <label>`
    Added { kind: ResourceKind, label: &'a str },
    /// `<Kind> updated: <label>`
    Updated { kind: ResourceKind, label: &'a str },
    /// `<Kind> deleted: ID <id>`
    Deleted { kind: ResourceKind, id: u64 },
}

impl Notice<'_> {
    /// Metric label for the notice family.
    pub fn action(&self) -> &'static str {
        match self {
            Notice::Joined { .. } => "joined",
            Notice::Left { .. } => "left",
            Notice::Echo { .. } => "echo",
            Notice::Says { .. } => "says",
            Notice::Added { .. } => "added",
            Notice::Updated { .. } => "updated",
            Notice::Deleted { .. } => "deleted",
        }
    }
}

impl fmt::Display for Notice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Joined { client } => write!(f, "Client #{client} joined the chat"),
            Notice::Left { client } => write!(f, "Client #{client} left the chat"),
            Notice::Echo { text } => write!(f, "You wrote: {text}"),
            Notice::Says { client, text } => write!(f, "Client #{client} says: {text}"),
            Notice::Added { kind, label } => write!(f, "{kind} added: {label}"),
            Notice::Updated { kind, label } => write!(f, "{kind} updated: {label}"),
            Notice::Deleted { kind, id } => write!(f, "{kind} deleted: ID {id}"),
        }
    }
}
