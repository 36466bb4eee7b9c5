//! Events: "when these conditions hold, perform these actions".
//!
//! An event is one rule. It owns an ordered condition list (ANDed), an
//! ordered action list, and optional nested sub-events that are only
//! considered on ticks where the parent's conditions pass.
//!
//! ## Trigger-once
//!
//! With `trigger_once` set, the event is consumed the moment its actions are
//! dispatched (delayed actions included, even before they fire) and is skipped
//! from then on until the host calls [`Event::reset`] or
//! [`EventEvaluator::reset_events`](crate::evaluator::EventEvaluator::reset_events).

use serde::{Deserialize, Serialize};

use crate::core::RuleId;

use super::action::Action;
use super::condition::Condition;

/// Name used when a serialized event omits `name`.
pub const DEFAULT_EVENT_NAME: &str = "Untitled Event";

fn generated_id() -> RuleId {
    RuleId::generate("event")
}

fn default_name() -> String {
    DEFAULT_EVENT_NAME.to_string()
}

fn default_enabled() -> bool {
    true
}

/// A rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier.
    #[serde(default = "generated_id")]
    pub id: RuleId,

    /// Human-readable name (for debugging and editors).
    #[serde(default = "default_name")]
    pub name: String,

    /// Disabled events are skipped entirely, sub-events included.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Execution order within one list. Lower values run first; ties keep
    /// list order.
    #[serde(default)]
    pub priority: i32,

    /// Fire at most once until reset.
    #[serde(default)]
    pub trigger_once: bool,

    /// Set when a trigger-once event has dispatched its actions.
    /// Session state only; never serialized.
    #[serde(skip)]
    pub has_triggered: bool,

    /// Conditions, ANDed in order.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Actions, dispatched in order.
    #[serde(default)]
    pub actions: Vec<Action>,

    /// Nested rules evaluated only when this event's conditions pass.
    #[serde(default)]
    pub sub_events: Vec<Event>,

    /// Author notes.
    #[serde(default)]
    pub comment: String,

    /// Editor grouping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Editor color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Event {
    /// Create an enabled event with a generated ID and no conditions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generated_id(),
            name: name.into(),
            enabled: true,
            priority: 0,
            trigger_once: false,
            has_triggered: false,
            conditions: Vec::new(),
            actions: Vec::new(),
            sub_events: Vec::new(),
            comment: String::new(),
            group: None,
            color: None,
        }
    }

    /// Set the ID (builder pattern).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<RuleId>) -> Self {
        self.id = id.into();
        self
    }

    /// Add a condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add an action (builder pattern).
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Add a nested sub-event (builder pattern).
    #[must_use]
    pub fn with_sub_event(mut self, event: Event) -> Self {
        self.sub_events.push(event);
        self
    }

    /// Set priority (builder pattern).
    /// Lower priority values run first.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Make this a trigger-once event (builder pattern).
    #[must_use]
    pub fn trigger_once(mut self) -> Self {
        self.trigger_once = true;
        self
    }

    /// Disable the event (builder pattern).
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Attach an author comment (builder pattern).
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the editor group (builder pattern).
    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Check whether the event is eligible this tick.
    ///
    /// Eligible means enabled and not a consumed trigger-once event.
    #[must_use]
    pub fn should_execute(&self) -> bool {
        self.enabled && !(self.trigger_once && self.has_triggered)
    }

    /// Record a dispatch. Only trigger-once events change state.
    pub fn mark_triggered(&mut self) {
        if self.trigger_once {
            self.has_triggered = true;
        }
    }

    /// Clear this event's trigger state, and that of every nested sub-event.
    pub fn reset(&mut self) {
        self.has_triggered = false;
        for sub in &mut self.sub_events {
            sub.reset();
        }
    }

    /// Copy this event under a fresh ID, named "<name> (Copy)".
    ///
    /// Conditions, actions and sub-events are copied as-is and trigger state
    /// is cleared.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = generated_id();
        copy.name = format!("{} (Copy)", self.name);
        copy.reset();
        copy
    }

    /// Total number of events in this tree, this one included.
    #[must_use]
    pub fn tree_len(&self) -> usize {
        1 + self.sub_events.iter().map(Event::tree_len).sum::<usize>()
    }

    /// Depth of the deepest sub-event chain (1 for a leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.sub_events.iter().map(Event::depth).max().unwrap_or(0)
    }

    /// Visit this event and every nested sub-event, depth first.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Event)) {
        f(self);
        for sub in &self.sub_events {
            sub.visit(f);
        }
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let event = Event::new("Reach Goal")
            .with_id("event-3")
            .with_priority(10)
            .trigger_once()
            .with_condition(Condition::new("collision"))
            .with_action(Action::new("showText"))
            .with_comment("Win condition");

        assert_eq!(event.id.as_str(), "event-3");
        assert_eq!(event.priority, 10);
        assert!(event.trigger_once);
        assert!(!event.has_triggered);
        assert_eq!(event.conditions.len(), 1);
        assert_eq!(event.actions.len(), 1);
        assert_eq!(event.comment, "Win condition");
    }

    #[test]
    fn test_should_execute() {
        let mut event = Event::new("e").trigger_once();
        assert!(event.should_execute());

        event.mark_triggered();
        assert!(event.has_triggered);
        assert!(!event.should_execute());

        event.reset();
        assert!(event.should_execute());

        let disabled = Event::new("d").disabled();
        assert!(!disabled.should_execute());
    }

    #[test]
    fn test_mark_triggered_ignored_without_trigger_once() {
        let mut event = Event::new("repeat");
        event.mark_triggered();
        assert!(!event.has_triggered);
        assert!(event.should_execute());
    }

    #[test]
    fn test_reset_is_recursive() {
        let mut event = Event::new("parent")
            .trigger_once()
            .with_sub_event(Event::new("child").trigger_once());
        event.has_triggered = true;
        event.sub_events[0].has_triggered = true;

        event.reset();

        assert!(!event.has_triggered);
        assert!(!event.sub_events[0].has_triggered);
    }

    #[test]
    fn test_duplicate() {
        let mut original = Event::new("Collect Coin")
            .trigger_once()
            .with_action(Action::new("addToVariable"));
        original.has_triggered = true;

        let copy = original.duplicate();

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.name, "Collect Coin (Copy)");
        assert_eq!(copy.actions, original.actions);
        assert!(!copy.has_triggered);
    }

    #[test]
    fn test_tree_metrics() {
        let event = Event::new("root")
            .with_sub_event(Event::new("a").with_sub_event(Event::new("a1")))
            .with_sub_event(Event::new("b"));

        assert_eq!(event.tree_len(), 4);
        assert_eq!(event.depth(), 3);

        let mut names = Vec::new();
        event.visit(&mut |e| names.push(e.name.as_str()));
        assert_eq!(names, vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn test_serialized_shape() {
        let mut event = Event::new("Enemy Hit").with_id("event-2").trigger_once();
        event.has_triggered = true;

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["triggerOnce"], true);
        assert!(json.get("hasTriggered").is_none());
        assert!(json.get("subEvents").is_some());
        assert!(json.get("group").is_none());
    }

    #[test]
    fn test_deserialize_defaults() {
        let event: Event = serde_json::from_str(r#"{"id": "e1"}"#).unwrap();

        assert_eq!(event.name, DEFAULT_EVENT_NAME);
        assert!(event.enabled);
        assert_eq!(event.priority, 0);
        assert!(!event.trigger_once);
        assert!(!event.has_triggered);
        assert!(event.sub_events.is_empty());
    }
}
