//! Interface Declarations
//!
//! An interface is a Rust trait over [`Component`](crate::plugin::Component) whose
//! trait-object type carries an [`Interface`] marker. The marker names the contract,
//! lists its methods and fixes the default dispatch discipline for its events.
//!
//! ```
//! use plmanagement::declare_interface;
//! use plmanagement::plugin::{Component, Discipline, PluginResult};
//!
//! pub trait MigrationListener: Component {
//!     fn on_migration_done(&self, vm: &str) -> PluginResult<()>;
//! }
//!
//! declare_interface!(MigrationListener, "IMigrationListener", ["on_migration_done"], Discipline::BestEffort);
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use log::debug;
use crate::plugin::error::{PluginError, PluginResult};

/// How a broadcast reacts to a failing implementer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discipline {
    /// Log the failure and continue with the next implementer
    BestEffort,

    /// Stop at the first failure and propagate it
    FailFast,
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discipline::BestEffort => write!(f, "best-effort"),
            Discipline::FailFast => write!(f, "fail-fast"),
        }
    }
}

/// Marker implemented on `dyn Trait` for every interface trait.
///
/// Use [`declare_interface!`](crate::declare_interface) rather than implementing by hand.
pub trait Interface: Send + Sync + 'static {
    /// Interface name, unique within a registry
    const NAME: &'static str;

    /// Method names making up the contract
    const METHODS: &'static [&'static str];

    /// Discipline used by `ExtensionPoint::broadcast`
    const DISPATCH: Discipline = Discipline::BestEffort;
}

/// Declare the [`Interface`] marker for an interface trait.
///
/// The discipline argument is optional and defaults to `Discipline::BestEffort`.
#[macro_export]
macro_rules! declare_interface {
    ($iface:ident, $name:literal, [$($method:literal),* $(,)?]) => {
        $crate::declare_interface!($iface, $name, [$($method),*], $crate::plugin::interface::Discipline::BestEffort);
    };
    ($iface:ident, $name:literal, [$($method:literal),* $(,)?], $discipline:expr) => {
        impl $crate::plugin::interface::Interface for dyn $iface {
            const NAME: &'static str = $name;
            const METHODS: &'static [&'static str] = &[$($method),*];
            const DISPATCH: $crate::plugin::interface::Discipline = $discipline;
        }
    };
}

/// Handle returned by an interface declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceHandle {
    id: usize,
    name: String,
    methods: Vec<String>,
}

impl InterfaceHandle {
    /// Declaration order within the owning registry
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }
}

impl fmt::Display for InterfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.methods.join(", "))
    }
}

/// Registry of declared interfaces.
///
/// Re-declaring a name with the same method set returns the existing handle.
/// Re-declaring it with a different method set is a [`PluginError::DuplicateInterface`].
#[derive(Debug, Clone, Default)]
pub struct InterfaceRegistry {
    handles: Vec<InterfaceHandle>,
    by_name: HashMap<String, usize>,
    by_type: HashMap<TypeId, usize>,
}

impl InterfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an interface by name and method set
    pub fn declare(&mut self, name: &str, methods: &[&str]) -> PluginResult<InterfaceHandle> {
        let normalised = normalise_methods(methods);

        if let Some(&index) = self.by_name.get(name) {
            let existing = &self.handles[index];
            if existing.methods == normalised {
                return Ok(existing.clone());
            }
            let existing_methods: Vec<&str> = existing.methods.iter().map(String::as_str).collect();
            return Err(PluginError::duplicate_interface(name, &existing_methods));
        }

        let handle = InterfaceHandle {
            id: self.handles.len(),
            name: name.to_string(),
            methods: normalised,
        };
        debug!("Declared interface {}", handle);
        self.by_name.insert(handle.name.clone(), handle.id);
        self.handles.push(handle.clone());
        Ok(handle)
    }

    /// Declare the interface described by a marker type
    pub fn declare_typed<I: Interface + ?Sized>(&mut self) -> PluginResult<InterfaceHandle> {
        if let Some(&index) = self.by_type.get(&TypeId::of::<I>()) {
            return Ok(self.handles[index].clone());
        }
        let handle = self.declare(I::NAME, I::METHODS)?;
        self.by_type.insert(TypeId::of::<I>(), handle.id);
        Ok(handle)
    }

    /// Look up a handle by interface name
    pub fn lookup(&self, name: &str) -> Option<&InterfaceHandle> {
        self.by_name.get(name).map(|&index| &self.handles[index])
    }

    /// Look up the handle for a marker type, if declared
    pub fn lookup_typed<I: Interface + ?Sized>(&self) -> Option<&InterfaceHandle> {
        self.by_type.get(&TypeId::of::<I>()).map(|&index| &self.handles[index])
    }

    /// All handles in declaration order
    pub fn handles(&self) -> &[InterfaceHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

fn normalise_methods(methods: &[&str]) -> Vec<String> {
    let mut normalised: Vec<String> = methods.iter().map(|m| m.to_string()).collect();
    normalised.sort();
    normalised.dedup();
    normalised
}
