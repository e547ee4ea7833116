//! Component Traits
//!
//! Defines the component base trait, the concrete-class trait used for registration,
//! and the claim list through which a class states the interfaces it implements.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use crate::config::ConfigManager;
use crate::plugin::error::PluginResult;
use crate::plugin::interface::{Interface, InterfaceHandle, InterfaceRegistry};
use crate::plugin::predicate::EnableRule;
use crate::plugin::settings::RunParams;
use crate::plugin::compatibility::BASE_API_VERSION;

/// Core component interface that every plugin implements
pub trait Component: Send + Sync + 'static {
    /// Human-readable identifier, unique within a registry
    fn name(&self) -> &str;

    /// One-line description shown in component listings
    fn description(&self) -> &str {
        ""
    }

    /// Dispatch priority (higher values configure and receive events first)
    fn priority(&self) -> i32 {
        0
    }

    /// Declarative enablement rule used by the default `is_enabled`
    fn enable_rule(&self) -> EnableRule {
        EnableRule::never()
    }

    /// Contribute command-line options; called once before parsing
    fn add_options(&self, command: clap::Command) -> clap::Command {
        command
    }

    /// Read parameters and configuration.
    ///
    /// Components may write only into configuration sections they own.
    fn configure(&self, _params: &RunParams, _config: &mut ConfigManager) -> PluginResult<()> {
        Ok(())
    }

    /// Decide participation in dispatch.
    ///
    /// Must be a pure function of `(params, config)`; it is evaluated on every
    /// extension-point iteration.
    fn is_enabled(&self, params: &RunParams, config: &ConfigManager) -> PluginResult<bool> {
        self.enable_rule().evaluate(params, config)
    }
}

/// A concrete component class that the registry can instantiate.
///
/// Abstract bases are either plain traits (which cannot be registered) or
/// classes setting `ABSTRACT = true`, which the registry skips.
pub trait ComponentClass: Component + Sized {
    /// Class name, checked for uniqueness at definition time
    const NAME: &'static str;

    /// Marks a base class that must never be instantiated
    const ABSTRACT: bool = false;

    /// Component API version this class targets
    const API_VERSION: u32 = BASE_API_VERSION;

    /// Construct the single instance of this class
    fn construct() -> Self;

    /// State which interfaces this class implements
    fn claims(claims: &mut Claims<Self>);
}

type Caster<C> = Box<dyn Fn(Arc<C>) -> Box<dyn Any + Send + Sync> + Send + Sync>;

pub(crate) struct Claim<C> {
    pub(crate) type_id: TypeId,
    pub(crate) interface: &'static str,
    pub(crate) declare: fn(&mut InterfaceRegistry) -> PluginResult<InterfaceHandle>,
    pub(crate) caster: Caster<C>,
}

/// Interfaces claimed by a component class
pub struct Claims<C> {
    entries: Vec<Claim<C>>,
}

impl<C: ComponentClass> Claims<C> {
    pub(crate) fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Claim interface `I`; `view` converts the instance into the interface object.
    ///
    /// The trait bound is checked by the compiler, so a class can only claim
    /// interfaces it actually implements.
    pub fn add<I: Interface + ?Sized>(&mut self, view: fn(Arc<C>) -> Arc<I>) -> &mut Self {
        self.entries.push(Claim {
            type_id: TypeId::of::<I>(),
            interface: I::NAME,
            declare: InterfaceRegistry::declare_typed::<I>,
            caster: Box::new(move |instance: Arc<C>| -> Box<dyn Any + Send + Sync> {
                Box::new(view(instance))
            }),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<Claim<C>> {
        self.entries
    }
}

/// Claim one or more interface traits for a component class.
///
/// ```ignore
/// fn claims(claims: &mut Claims<Self>) {
///     implements!(claims, HostsCleanup, Reporter);
/// }
/// ```
#[macro_export]
macro_rules! implements {
    ($claims:expr, $($iface:ident),+ $(,)?) => {
        $(
            $claims.add::<dyn $iface>(|instance| -> ::std::sync::Arc<dyn $iface> { instance });
        )+
    };
}

/// Lifecycle state of a component instance within a manager session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentState {
    /// Constructed, not yet configured
    Loaded,

    /// configure() succeeded
    Configured,

    /// configure() failed; disabled for the rest of the session
    Failed(String),
}

impl ComponentState {
    pub fn is_failed(&self) -> bool {
        matches!(self, ComponentState::Failed(_))
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentState::Loaded => write!(f, "loaded"),
            ComponentState::Configured => write!(f, "configured"),
            ComponentState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Built instance plus its interface views, keyed by interface type
pub(crate) struct ConstructedComponent {
    pub(crate) instance: Arc<dyn Component>,
    pub(crate) views: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

/// Snapshot of one component, used for listings
#[derive(Debug, Clone)]
pub struct ComponentSummary {
    pub name: String,
    pub description: String,
    pub interfaces: Vec<String>,
    pub priority: i32,
    pub state: ComponentState,
    pub enabled: bool,
}
