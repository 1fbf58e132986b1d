//! Message snapshot record: one materialization of the conversation.

use super::SCHEMA_VERSION;
use crate::core::error::ValidationError;
use crate::message::entities::Role;
use crate::message::view::MessageView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of a message array at the moment it was built.
///
/// `role_sequence` and `role_distribution` are redundant with `messages`;
/// [`validate`](Self::validate) checks that all three agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSnapshotRecord {
    pub schema_version: u32,
    pub timestamp: DateTime<Utc>,
    /// Free-form label supplied by the host (e.g. a conversation id).
    pub session: String,
    pub total_messages: usize,
    pub role_sequence: Vec<Role>,
    pub role_distribution: BTreeMap<Role, usize>,
    pub messages: Vec<MessageView>,
}

impl MessageSnapshotRecord {
    /// Build a snapshot, deriving role sequence and distribution in one pass.
    pub fn capture(
        timestamp: DateTime<Utc>,
        session: impl Into<String>,
        messages: Vec<MessageView>,
    ) -> Self {
        let mut role_sequence = Vec::with_capacity(messages.len());
        let mut role_distribution = BTreeMap::new();
        for message in &messages {
            role_sequence.push(message.role);
            *role_distribution.entry(message.role).or_insert(0) += 1;
        }

        Self {
            schema_version: SCHEMA_VERSION,
            timestamp,
            session: session.into(),
            total_messages: messages.len(),
            role_sequence,
            role_distribution,
            messages,
        }
    }

    /// Assemble a snapshot from explicit parts, rejecting inconsistent ones.
    pub fn from_parts(
        timestamp: DateTime<Utc>,
        session: impl Into<String>,
        role_sequence: Vec<Role>,
        role_distribution: BTreeMap<Role, usize>,
        messages: Vec<MessageView>,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            schema_version: SCHEMA_VERSION,
            timestamp,
            session: session.into(),
            total_messages: messages.len(),
            role_sequence,
            role_distribution,
            messages,
        };
        record.validate()?;
        Ok(record)
    }

    /// Count occurrences of each role.
    pub fn count_roles<'a>(roles: impl IntoIterator<Item = &'a Role>) -> BTreeMap<Role, usize> {
        let mut counts = BTreeMap::new();
        for role in roles {
            *counts.entry(*role).or_insert(0) += 1;
        }
        counts
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.role_sequence.len() != self.total_messages
            || self.messages.len() != self.total_messages
        {
            return Err(ValidationError::LengthMismatch {
                total: self.total_messages,
                sequence: self.role_sequence.len(),
                messages: self.messages.len(),
            });
        }

        if let Some((index, (sequence, message))) = self
            .role_sequence
            .iter()
            .zip(&self.messages)
            .enumerate()
            .find(|(_, (role, message))| **role != message.role)
        {
            return Err(ValidationError::RoleOrderMismatch {
                index,
                sequence: *sequence,
                message: message.role,
            });
        }

        let expected = Self::count_roles(&self.role_sequence);
        if expected != self.role_distribution {
            return Err(ValidationError::RoleDistributionMismatch {
                expected,
                found: self.role_distribution.clone(),
            });
        }

        Ok(())
    }
}
