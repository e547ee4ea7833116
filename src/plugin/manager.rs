//! Component Manager
//!
//! Owns the single instance of every registered component class, the run
//! configuration and the parsed parameters. Resolves enablement on every
//! lookup so configuration changes take effect without reconstruction.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use log::{debug, info, warn};
use crate::config::ConfigManager;
use crate::plugin::component::{Component, ComponentClass, ComponentState, ComponentSummary};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::extension::{ExtensionPoint, Implementer};
use crate::plugin::interface::{Interface, InterfaceHandle};
use crate::plugin::priority_queue::PriorityQueue;
use crate::plugin::registry::ComponentRegistry;
use crate::plugin::settings::RunParams;

/// Identifier of a component within a manager session (registration index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(usize);

impl ComponentId {
    pub fn index(&self) -> usize {
        self.0
    }
}

struct ComponentEntry {
    id: ComponentId,
    name: String,
    interfaces: Vec<InterfaceHandle>,
    priority: i32,
    instance: Arc<dyn Component>,
    views: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    state: ComponentState,
}

/// Component failure recorded during configure_all
#[derive(Debug, Clone)]
pub struct ConfigureFailure {
    pub component: String,
    pub error: PluginError,
}

/// Central component manager responsible for:
/// - the one-time construction pass
/// - configuring components in dispatch order
/// - enablement resolution against the current parameters and configuration
/// - extension-point lookups
pub struct ComponentManager {
    registry: ComponentRegistry,
    entries: Vec<ComponentEntry>,
    order: PriorityQueue<usize>,
    by_type: HashMap<TypeId, usize>,
    by_name: HashMap<String, usize>,
    config: ConfigManager,
    params: RunParams,
    loaded: bool,
}

impl ComponentManager {
    /// Create a manager over a populated registry
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            entries: Vec::new(),
            order: PriorityQueue::new(),
            by_type: HashMap::new(),
            by_name: HashMap::new(),
            config: ConfigManager::empty(),
            params: RunParams::new(),
            loaded: false,
        }
    }

    /// Construct exactly one instance of every known class.
    ///
    /// Calling `load` twice is an error; instances live for the whole session.
    pub fn load(&mut self, config: ConfigManager) -> PluginResult<()> {
        if self.loaded {
            return Err(PluginError::invalid_state("components already loaded"));
        }

        // Build into locals so a failed pass leaves the manager empty
        let mut entries = Vec::with_capacity(self.registry.len());
        let mut order = PriorityQueue::new();
        let mut by_type = HashMap::new();
        let mut by_name = HashMap::new();

        for (index, definition) in self.registry.definitions().iter().enumerate() {
            let constructed = definition.construct();
            let priority = constructed.instance.priority();
            let name = constructed.instance.name().to_string();

            if name != definition.name() {
                return Err(PluginError::malformed_component(
                    definition.type_name(),
                    format!("instance reports name '{}' but class is '{}'", name, definition.name()),
                ));
            }

            debug!("Constructed component '{}' (priority {})", name, priority);

            by_type.insert(definition.type_id(), index);
            by_name.insert(name.clone(), index);
            order.push(priority, index);
            entries.push(ComponentEntry {
                id: ComponentId(index),
                name,
                interfaces: definition.interfaces().to_vec(),
                priority,
                instance: constructed.instance,
                views: constructed.views,
                state: ComponentState::Loaded,
            });
        }

        self.entries = entries;
        self.order = order;
        self.by_type = by_type;
        self.by_name = by_name;
        self.config = config;
        self.loaded = true;
        info!("Loaded {} component(s)", self.entries.len());
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Let every component contribute its command-line options
    pub fn add_options(&self, command: clap::Command) -> clap::Command {
        self.order
            .items()
            .fold(command, |command, &index| self.entries[index].instance.add_options(command))
    }

    /// Configure every component in dispatch order.
    ///
    /// A failing component is logged, marked failed and excluded from all
    /// extension points; the remaining components are still configured.
    pub fn configure_all(&mut self, params: RunParams) -> PluginResult<Vec<ConfigureFailure>> {
        if !self.loaded {
            return Err(PluginError::invalid_state("configure_all called before load"));
        }

        self.params = params;
        let mut failures = Vec::new();
        let order: Vec<usize> = self.order.items().copied().collect();

        for index in order {
            let instance = Arc::clone(&self.entries[index].instance);
            match instance.configure(&self.params, &mut self.config) {
                Ok(()) => {
                    debug!("Configured component '{}'", self.entries[index].name);
                    self.entries[index].state = ComponentState::Configured;
                }
                Err(e) => {
                    let entry = &mut self.entries[index];
                    warn!("Component '{}' failed to configure and is disabled: {}", entry.name, e);
                    entry.state = ComponentState::Failed(e.to_string());
                    failures.push(ConfigureFailure { component: entry.name.clone(), error: e });
                }
            }
        }

        info!(
            "Configured {} component(s), {} failed",
            self.entries.len() - failures.len(),
            failures.len()
        );
        Ok(failures)
    }

    /// Replace the parameters used by enablement predicates
    pub fn set_params(&mut self, params: RunParams) {
        self.params = params;
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    /// Mutable configuration; enablement is re-evaluated on the next lookup
    pub fn config_mut(&mut self) -> &mut ConfigManager {
        &mut self.config
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    fn entry_enabled(&self, entry: &ComponentEntry) -> bool {
        if entry.state.is_failed() {
            return false;
        }
        match entry.instance.is_enabled(&self.params, &self.config) {
            Ok(enabled) => enabled,
            Err(e) => {
                warn!("Enablement check for component '{}' failed, treating as disabled: {}", entry.name, e);
                false
            }
        }
    }

    /// Whether the named component currently participates in dispatch
    pub fn is_enabled(&self, name: &str) -> bool {
        self.by_name
            .get(name)
            .map(|&index| self.entry_enabled(&self.entries[index]))
            .unwrap_or(false)
    }

    /// Whether class `C` currently participates in dispatch
    pub fn is_class_enabled<C: ComponentClass>(&self) -> bool {
        self.by_type
            .get(&TypeId::of::<C>())
            .map(|&index| self.entry_enabled(&self.entries[index]))
            .unwrap_or(false)
    }

    /// The single instance of class `C`
    pub fn instance_of<C: ComponentClass>(&self) -> Option<Arc<C>> {
        let index = *self.by_type.get(&TypeId::of::<C>())?;
        self.entries[index]
            .views
            .get(&TypeId::of::<C>())
            .and_then(|view| view.downcast_ref::<Arc<C>>())
            .map(Arc::clone)
    }

    /// Component by name, as the base trait object
    pub fn component(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.by_name.get(name).map(|&index| Arc::clone(&self.entries[index].instance))
    }

    pub fn component_id(&self, name: &str) -> Option<ComponentId> {
        self.by_name.get(name).map(|&index| self.entries[index].id)
    }

    pub fn state_of(&self, name: &str) -> Option<&ComponentState> {
        self.by_name.get(name).map(|&index| &self.entries[index].state)
    }

    /// Names of components whose configure() failed
    pub fn failed_components(&self) -> Vec<&str> {
        self.order
            .items()
            .map(|&index| &self.entries[index])
            .filter(|entry| entry.state.is_failed())
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// Enabled implementers of `I` with their names, in dispatch order
    pub(crate) fn implementers<I: Interface + ?Sized>(&self) -> Vec<Implementer<'_, I>> {
        let key = TypeId::of::<I>();
        self.order
            .items()
            .map(|&index| &self.entries[index])
            .filter_map(|entry| {
                let view = entry.views.get(&key)?.downcast_ref::<Arc<I>>()?;
                Some((entry, view))
            })
            .filter(|(entry, _)| self.entry_enabled(entry))
            .map(|(entry, view)| Implementer::new(&entry.name, Arc::clone(view)))
            .collect()
    }

    /// Enabled implementers of `I`, in dispatch order
    pub fn components_for<I: Interface + ?Sized>(&self) -> Vec<Arc<I>> {
        self.implementers::<I>()
            .into_iter()
            .map(Implementer::into_component)
            .collect()
    }

    /// Typed extension point for interface `I`
    pub fn extension_point<I: Interface + ?Sized>(&self) -> ExtensionPoint<'_, I> {
        ExtensionPoint::new(self)
    }

    /// Snapshot of every component in dispatch order
    pub fn summaries(&self) -> Vec<ComponentSummary> {
        self.order
            .items()
            .map(|&index| {
                let entry = &self.entries[index];
                ComponentSummary {
                    name: entry.name.clone(),
                    description: entry.instance.description().to_string(),
                    interfaces: entry.interfaces.iter().map(|h| h.name().to_string()).collect(),
                    priority: entry.priority,
                    state: entry.state.clone(),
                    enabled: self.entry_enabled(entry),
                }
            })
            .collect()
    }

    /// Component names in dispatch order
    pub fn component_names(&self) -> Vec<&str> {
        self.order.items().map(|&index| self.entries[index].name.as_str()).collect()
    }

    pub fn component_count(&self) -> usize {
        self.entries.len()
    }
}
