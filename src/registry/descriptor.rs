//! Descriptors: what an opcode means.
//!
//! A descriptor pairs editor-facing metadata (label, category, parameter
//! schema) with the behavior that runs at evaluation time. Condition
//! descriptors hold a [`Predicate`], action descriptors an [`Effect`].
//!
//! Plain closures implement both traits, so most descriptors are written as
//!
//! ```ignore
//! ConditionDescriptor::new("Always", "Basic", |_params, _ctx| Ok(true))
//! ```

use crate::context::RuleContext;
use crate::core::{BehaviorResult, OpcodeKind, ParamValue, Params};

/// The kind of editor widget a parameter uses.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamKind {
    Number,
    Text,
    Bool,
    /// Object type name.
    Object,
    /// One of a fixed set of choices.
    Select(Vec<String>),
    Variable,
    Key,
    Sound,
    Scene,
    Color,
    /// Multi-line host script source.
    Code,
    /// Bounded number.
    Slider { min: f64, max: f64, step: f64 },
}

impl ParamKind {
    /// A select over string choices.
    pub fn select<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamKind::Select(choices.into_iter().map(Into::into).collect())
    }
}

/// Visibility rule: is this parameter relevant given the other values?
pub type VisibilityRule = Box<dyn Fn(&Params) -> bool>;

/// Schema for one parameter of a descriptor.
pub struct ParamSpec {
    pub name: String,
    pub label: String,
    pub kind: ParamKind,
    pub default: Option<ParamValue>,
    pub required: bool,
    visible_if: Option<VisibilityRule>,
}

impl ParamSpec {
    /// Create an optional parameter labelled with its name.
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            kind,
            default: None,
            required: false,
            visible_if: None,
        }
    }

    /// Set the editor label (builder pattern).
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the default value (builder pattern).
    #[must_use]
    pub fn default_value(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark as required (builder pattern).
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Only show this parameter when `rule` holds (builder pattern).
    #[must_use]
    pub fn visible_if(mut self, rule: impl Fn(&Params) -> bool + 'static) -> Self {
        self.visible_if = Some(Box::new(rule));
        self
    }

    /// Check whether the parameter should be shown for these values.
    /// Parameters without a visibility rule are always visible.
    #[must_use]
    pub fn is_visible(&self, params: &Params) -> bool {
        self.visible_if.as_ref().map_or(true, |rule| rule(params))
    }
}

impl std::fmt::Debug for ParamSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamSpec")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("conditional", &self.visible_if.is_some())
            .finish()
    }
}

/// Editor-facing metadata shared by both descriptor kinds.
#[derive(Debug, Default)]
pub struct DescriptorInfo {
    pub label: String,
    pub description: String,
    pub category: String,
    pub params: Vec<ParamSpec>,
}

impl DescriptorInfo {
    /// Fill unset parameters with their declared defaults.
    #[must_use]
    pub fn with_defaults(&self, params: &Params) -> Params {
        let mut filled = params.clone();
        for spec in &self.params {
            if let Some(default) = &spec.default {
                if !filled.contains(&spec.name) {
                    filled.insert(spec.name.clone(), default.clone());
                }
            }
        }
        filled
    }
}

/// A condition behavior.
///
/// Predicates must not mutate the world; the one permitted write is
/// [`RuleContext::record_collision`].
pub trait Predicate {
    fn test(&self, params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool>;
}

impl<F> Predicate for F
where
    F: Fn(&Params, &RuleContext<'_>) -> BehaviorResult<bool>,
{
    fn test(&self, params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
        self(params, ctx)
    }
}

/// An action behavior.
pub trait Effect {
    fn apply(&self, params: &Params, ctx: &mut RuleContext<'_>) -> BehaviorResult<()>;
}

impl<F> Effect for F
where
    F: Fn(&Params, &mut RuleContext<'_>) -> BehaviorResult<()>,
{
    fn apply(&self, params: &Params, ctx: &mut RuleContext<'_>) -> BehaviorResult<()> {
        self(params, ctx)
    }
}

/// Common surface of condition and action descriptors.
pub trait Descriptor {
    /// Which registry this descriptor lives in.
    const KIND: OpcodeKind;

    fn info(&self) -> &DescriptorInfo;

    fn label(&self) -> &str {
        &self.info().label
    }

    fn category(&self) -> &str {
        &self.info().category
    }
}

/// A registered condition opcode.
pub struct ConditionDescriptor {
    pub info: DescriptorInfo,
    predicate: Box<dyn Predicate>,
}

impl ConditionDescriptor {
    /// Describe a condition backed by a closure.
    pub fn new<F>(label: impl Into<String>, category: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Params, &RuleContext<'_>) -> BehaviorResult<bool> + 'static,
    {
        Self::from_predicate(label, category, predicate)
    }

    /// Describe a condition backed by any [`Predicate`] implementation.
    pub fn from_predicate(
        label: impl Into<String>,
        category: impl Into<String>,
        predicate: impl Predicate + 'static,
    ) -> Self {
        Self {
            info: DescriptorInfo {
                label: label.into(),
                category: category.into(),
                ..DescriptorInfo::default()
            },
            predicate: Box::new(predicate),
        }
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    /// Add a parameter (builder pattern).
    #[must_use]
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.info.params.push(spec);
        self
    }

    /// Run the predicate.
    pub fn test(&self, params: &Params, ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
        self.predicate.test(params, ctx)
    }
}

impl Descriptor for ConditionDescriptor {
    const KIND: OpcodeKind = OpcodeKind::Condition;

    fn info(&self) -> &DescriptorInfo {
        &self.info
    }
}

impl std::fmt::Debug for ConditionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionDescriptor").field("info", &self.info).finish_non_exhaustive()
    }
}

/// A registered action opcode.
pub struct ActionDescriptor {
    pub info: DescriptorInfo,
    effect: Box<dyn Effect>,
}

impl ActionDescriptor {
    /// Describe an action backed by a closure.
    pub fn new<F>(label: impl Into<String>, category: impl Into<String>, effect: F) -> Self
    where
        F: Fn(&Params, &mut RuleContext<'_>) -> BehaviorResult<()> + 'static,
    {
        Self::from_effect(label, category, effect)
    }

    /// Describe an action backed by any [`Effect`] implementation.
    pub fn from_effect(
        label: impl Into<String>,
        category: impl Into<String>,
        effect: impl Effect + 'static,
    ) -> Self {
        Self {
            info: DescriptorInfo {
                label: label.into(),
                category: category.into(),
                ..DescriptorInfo::default()
            },
            effect: Box::new(effect),
        }
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.info.description = description.into();
        self
    }

    /// Add a parameter (builder pattern).
    #[must_use]
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.info.params.push(spec);
        self
    }

    /// Run the effect.
    pub fn apply(&self, params: &Params, ctx: &mut RuleContext<'_>) -> BehaviorResult<()> {
        self.effect.apply(params, ctx)
    }
}

impl Descriptor for ActionDescriptor {
    const KIND: OpcodeKind = OpcodeKind::Action;

    fn info(&self) -> &DescriptorInfo {
        &self.info
    }
}

impl std::fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDescriptor").field("info", &self.info).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GameWorld;
    use crate::core::{BehaviorError, Timestamp};
    use crate::host::SceneState;

    struct Threshold(f64);

    impl Predicate for Threshold {
        fn test(&self, params: &Params, _ctx: &RuleContext<'_>) -> BehaviorResult<bool> {
            Ok(params.require_number("value")? > self.0)
        }
    }

    #[test]
    fn test_closure_descriptor() {
        let descriptor = ConditionDescriptor::new("Always", "Basic", |_p: &Params, _c: &RuleContext<'_>| Ok(true))
            .describe("Always true");

        let mut world = SceneState::new();
        let ctx = RuleContext::new(&mut world, Timestamp::ZERO);

        assert_eq!(descriptor.test(&Params::new(), &ctx), Ok(true));
        assert_eq!(descriptor.label(), "Always");
        assert_eq!(descriptor.category(), "Basic");
        assert_eq!(descriptor.info.description, "Always true");
    }

    #[test]
    fn test_struct_predicate() {
        let descriptor = ConditionDescriptor::from_predicate("Above", "Test", Threshold(5.0));
        let mut world = SceneState::new();
        let ctx = RuleContext::new(&mut world, Timestamp::ZERO);

        assert_eq!(descriptor.test(&Params::new().with("value", 7.0), &ctx), Ok(true));
        assert_eq!(
            descriptor.test(&Params::new(), &ctx),
            Err(BehaviorError::MissingParam("value".into()))
        );
    }

    #[test]
    fn test_effect_closure() {
        let descriptor = ActionDescriptor::new("Set", "Variables", |p: &Params, ctx: &mut RuleContext<'_>| {
            ctx.world_mut().set_variable("x", p.number_or("value", 0.0).into());
            Ok(())
        });

        let mut world = SceneState::new();
        {
            let mut ctx = RuleContext::new(&mut world, Timestamp::ZERO);
            descriptor.apply(&Params::new().with("value", 4.0), &mut ctx).unwrap();
        }
        assert_eq!(world.variable("x"), Some(ParamValue::Number(4.0)));
    }

    #[test]
    fn test_param_visibility() {
        let spec = ParamSpec::new("objectType", ParamKind::Object)
            .visible_if(|p| p.text("object") == Some("all_of_type"));
        let plain = ParamSpec::new("x", ParamKind::Number);

        assert!(spec.is_visible(&Params::new().with("object", "all_of_type")));
        assert!(!spec.is_visible(&Params::new().with("object", "collision_other")));
        assert!(plain.is_visible(&Params::new()));
    }

    #[test]
    fn test_with_defaults() {
        let info = DescriptorInfo {
            params: vec![
                ParamSpec::new("volume", ParamKind::Number).default_value(1.0),
                ParamSpec::new("sound", ParamKind::Sound).required(),
            ],
            ..DescriptorInfo::default()
        };

        let filled = info.with_defaults(&Params::new().with("sound", "coin"));
        assert_eq!(filled.number("volume"), Some(1.0));
        assert_eq!(filled.text("sound"), Some("coin"));

        let explicit = info.with_defaults(&Params::new().with("volume", 0.2));
        assert_eq!(explicit.number("volume"), Some(0.2));
    }
}
