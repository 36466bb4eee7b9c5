//! Serialized rule sets.
//!
//! A rule set is what an editor saves and a game loads: a list of events.
//! Two JSON shapes are accepted on load, a bare array of events or an object
//! with an `events` field. Saving always writes the object form.
//!
//! Loading never fails on opcodes the registries do not know. Those degrade
//! at evaluation time (false predicate, no-op effect);
//! [`RuleSet::unresolved_opcodes`] lists them for diagnostics.

use serde::{Deserialize, Serialize};

use crate::core::{OpcodeKind, RuleError, RuleId};
use crate::registry::Registries;

use super::event::Event;

/// An ordered collection of events.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A condition or action whose opcode has no registered descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedOpcode {
    /// The event that owns the record.
    pub event_id: RuleId,
    /// The condition or action ID.
    pub record_id: RuleId,
    pub kind: OpcodeKind,
    pub opcode: String,
}

impl RuleSet {
    /// Create an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rule set from JSON.
    ///
    /// The shape is picked from the first token, so a malformed field reports
    /// serde's own message and position.
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        if json.trim_start().starts_with('[') {
            let events: Vec<Event> = serde_json::from_str(json)?;
            Ok(Self { events })
        } else {
            Ok(serde_json::from_str(json)?)
        }
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, RuleError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, RuleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every condition and action, at any nesting depth, whose opcode is not
    /// registered. Listed depth first, conditions before actions.
    #[must_use]
    pub fn unresolved_opcodes(&self, registries: &Registries) -> Vec<UnresolvedOpcode> {
        let mut unresolved = Vec::new();
        for root in &self.events {
            root.visit(&mut |event: &Event| {
                for condition in &event.conditions {
                    if !registries.conditions.contains(&condition.opcode) {
                        unresolved.push(UnresolvedOpcode {
                            event_id: event.id.clone(),
                            record_id: condition.id.clone(),
                            kind: OpcodeKind::Condition,
                            opcode: condition.opcode.clone(),
                        });
                    }
                }
                for action in &event.actions {
                    if !registries.actions.contains(&action.opcode) {
                        unresolved.push(UnresolvedOpcode {
                            event_id: event.id.clone(),
                            record_id: action.id.clone(),
                            kind: OpcodeKind::Action,
                            opcode: action.opcode.clone(),
                        });
                    }
                }
            });
        }
        unresolved
    }

    /// Append an event.
    pub fn add(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Remove a top-level event by ID.
    pub fn remove(&mut self, id: &RuleId) -> Option<Event> {
        let index = self.events.iter().position(|e| &e.id == id)?;
        Some(self.events.remove(index))
    }

    /// Find an event by ID, searching sub-events too.
    #[must_use]
    pub fn find(&self, id: &RuleId) -> Option<&Event> {
        fn search<'a>(events: &'a [Event], id: &RuleId) -> Option<&'a Event> {
            events
                .iter()
                .find_map(|e| if &e.id == id { Some(e) } else { search(&e.sub_events, id) })
        }
        search(&self.events, id)
    }

    /// Find an event by ID for editing, searching sub-events too.
    pub fn find_mut(&mut self, id: &RuleId) -> Option<&mut Event> {
        fn search<'a>(events: &'a mut [Event], id: &RuleId) -> Option<&'a mut Event> {
            for event in events {
                if &event.id == id {
                    return Some(event);
                }
                if let Some(found) = search(&mut event.sub_events, id) {
                    return Some(found);
                }
            }
            None
        }
        search(&mut self.events, id)
    }

    /// Append a copy of a top-level event. Returns the copy's ID.
    pub fn duplicate(&mut self, id: &RuleId) -> Option<RuleId> {
        let copy = self.events.iter().find(|e| &e.id == id)?.duplicate();
        let copy_id = copy.id.clone();
        self.events.push(copy);
        Some(copy_id)
    }

    /// Clear trigger-once state across the whole set.
    pub fn reset_triggers(&mut self) {
        for event in &mut self.events {
            event.reset();
        }
    }

    /// Number of top-level events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the set has no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<Vec<Event>> for RuleSet {
    fn from(events: Vec<Event>) -> Self {
        Self { events }
    }
}
