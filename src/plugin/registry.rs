//! Component Registry
//!
//! Ordered list of known component classes. Classes are added through explicit
//! `define` calls from an initialisation routine; the registry is a value handed
//! to the component manager, so each test can build its own.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use log::debug;
use crate::plugin::compatibility::VersionCompatibilityChecker;
use crate::plugin::component::{Claims, Component, ComponentClass, ConstructedComponent};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::interface::{InterfaceHandle, InterfaceRegistry};

type Factory = Box<dyn Fn() -> ConstructedComponent + Send + Sync>;

/// Definition of one concrete component class
pub struct ComponentDefinition {
    type_id: TypeId,
    name: &'static str,
    type_name: &'static str,
    api_version: u32,
    interfaces: Vec<InterfaceHandle>,
    factory: Factory,
}

impl ComponentDefinition {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rust type path of the class
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    pub fn interfaces(&self) -> &[InterfaceHandle] {
        &self.interfaces
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn construct(&self) -> ConstructedComponent {
        (self.factory)()
    }
}

/// Registry of component classes and the interfaces they claim
pub struct ComponentRegistry {
    definitions: Vec<ComponentDefinition>,
    names: HashSet<&'static str>,
    types: HashSet<TypeId>,
    interfaces: InterfaceRegistry,
    compatibility: VersionCompatibilityChecker,
}

impl ComponentRegistry {
    /// Create a registry validating against this build's API version
    pub fn new() -> Self {
        Self::with_checker(VersionCompatibilityChecker::default())
    }

    pub fn with_checker(compatibility: VersionCompatibilityChecker) -> Self {
        Self {
            definitions: Vec::new(),
            names: HashSet::new(),
            types: HashSet::new(),
            interfaces: InterfaceRegistry::new(),
            compatibility,
        }
    }

    /// Define a component class.
    ///
    /// Abstract classes are skipped. Empty names, duplicate classes or names,
    /// duplicate claims and incompatible API versions are declaration errors.
    pub fn define<C: ComponentClass>(&mut self) -> PluginResult<()> {
        let type_name = std::any::type_name::<C>();

        if C::ABSTRACT {
            debug!("Skipping abstract component class {}", type_name);
            return Ok(());
        }

        if C::NAME.trim().is_empty() {
            return Err(PluginError::malformed_component(type_name, "component name is empty"));
        }

        if self.types.contains(&TypeId::of::<C>()) || self.names.contains(C::NAME) {
            return Err(PluginError::component_already_registered(C::NAME));
        }

        self.compatibility.check_component(C::NAME, C::API_VERSION)?;

        let mut claims = Claims::<C>::new();
        C::claims(&mut claims);
        let claims = claims.into_entries();

        let mut seen = HashSet::new();
        for claim in &claims {
            if !seen.insert(claim.type_id) {
                return Err(PluginError::malformed_component(
                    C::NAME,
                    format!("interface '{}' claimed twice", claim.interface),
                ));
            }
        }

        // Declare on a scratch copy first so a conflict leaves the registry untouched
        let mut declared = self.interfaces.clone();
        let mut interfaces = Vec::with_capacity(claims.len());
        for claim in &claims {
            interfaces.push((claim.declare)(&mut declared)?);
        }

        let factory: Factory = Box::new(move || {
            let instance = Arc::new(C::construct());
            let mut views: HashMap<TypeId, Box<dyn Any + Send + Sync>> = HashMap::new();
            views.insert(TypeId::of::<C>(), Box::new(Arc::clone(&instance)));
            for claim in &claims {
                views.insert(claim.type_id, (claim.caster)(Arc::clone(&instance)));
            }
            ConstructedComponent {
                instance: instance as Arc<dyn Component>,
                views,
            }
        });

        debug!(
            "Defined component '{}' ({}) implementing [{}]",
            C::NAME,
            type_name,
            interfaces.iter().map(|h| h.name()).collect::<Vec<_>>().join(", ")
        );

        self.interfaces = declared;
        self.names.insert(C::NAME);
        self.types.insert(TypeId::of::<C>());
        self.definitions.push(ComponentDefinition {
            type_id: TypeId::of::<C>(),
            name: C::NAME,
            type_name,
            api_version: C::API_VERSION,
            interfaces,
            factory,
        });
        Ok(())
    }

    /// Builder form of [`define`](Self::define)
    pub fn with<C: ComponentClass>(mut self) -> PluginResult<Self> {
        self.define::<C>()?;
        Ok(self)
    }

    /// Declare an interface that no class claims yet
    pub fn declare_interface(&mut self, name: &str, methods: &[&str]) -> PluginResult<InterfaceHandle> {
        self.interfaces.declare(name, methods)
    }

    /// Component API version classes are checked against
    pub fn api_version(&self) -> u32 {
        self.compatibility.api_version()
    }

    /// Known classes in registration order
    pub fn definitions(&self) -> &[ComponentDefinition] {
        &self.definitions
    }

    pub fn interfaces(&self) -> &InterfaceRegistry {
        &self.interfaces
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
