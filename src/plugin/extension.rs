//! Extension Points
//!
//! Typed view over the enabled implementers of one interface. Dispatch goes
//! through the methods here so the failure discipline is applied in one place.

use std::marker::PhantomData;
use std::sync::Arc;
use log::{debug, error};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::interface::{Discipline, Interface};
use crate::plugin::manager::ComponentManager;

/// An enabled implementer paired with its component name
pub struct Implementer<'m, I: ?Sized> {
    name: &'m str,
    component: Arc<I>,
}

impl<'m, I: ?Sized> Implementer<'m, I> {
    pub(crate) fn new(name: &'m str, component: Arc<I>) -> Self {
        Self { name, component }
    }

    pub fn name(&self) -> &'m str {
        self.name
    }

    pub fn component(&self) -> &Arc<I> {
        &self.component
    }

    pub fn into_component(self) -> Arc<I> {
        self.component
    }
}

/// One failed invocation during a broadcast
#[derive(Debug, Clone)]
pub struct DispatchFailure {
    pub component: String,
    pub error: PluginError,
}

/// Outcome of a broadcast
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub event: String,
    pub invoked: usize,
    pub failures: Vec<DispatchFailure>,
}

impl DispatchReport {
    fn new(event: &str) -> Self {
        Self {
            event: event.to_string(),
            invoked: 0,
            failures: Vec::new(),
        }
    }

    /// True when every implementer returned Ok
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_components(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.component.as_str()).collect()
    }
}

/// Typed handle on the enabled implementers of interface `I`.
///
/// Enablement is resolved again by every call, so configuration changes made
/// between two calls are honoured.
pub struct ExtensionPoint<'m, I: Interface + ?Sized> {
    manager: &'m ComponentManager,
    marker: PhantomData<fn() -> Arc<I>>,
}

impl<'m, I: Interface + ?Sized> ExtensionPoint<'m, I> {
    pub(crate) fn new(manager: &'m ComponentManager) -> Self {
        Self { manager, marker: PhantomData }
    }

    fn resolve(&self) -> Vec<Implementer<'m, I>> {
        let implementers = self.manager.implementers::<I>();
        debug!("Extension point {} resolved {} implementer(s)", I::NAME, implementers.len());
        implementers
    }

    pub fn interface_name(&self) -> &'static str {
        I::NAME
    }

    /// Implementers in dispatch order
    pub fn components(&self) -> Components<'m, I> {
        Components { inner: self.resolve().into_iter() }
    }

    pub fn names(&self) -> Vec<&'m str> {
        self.resolve().iter().map(Implementer::name).collect()
    }

    pub fn len(&self) -> usize {
        self.resolve().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolve().is_empty()
    }

    /// Invoke `f` on every implementer using the interface's declared discipline
    pub fn broadcast<F>(&self, event: &str, f: F) -> PluginResult<DispatchReport>
    where
        F: FnMut(&I) -> PluginResult<()>,
    {
        match I::DISPATCH {
            Discipline::BestEffort => Ok(self.notify(event, f)),
            Discipline::FailFast => self.notify_all(event, f),
        }
    }

    /// Best-effort: every implementer is called; failures are logged and collected
    pub fn notify<F>(&self, event: &str, mut f: F) -> DispatchReport
    where
        F: FnMut(&I) -> PluginResult<()>,
    {
        let mut report = DispatchReport::new(event);
        let implementers = self.resolve();
        if implementers.is_empty() {
            debug!("No implementers of {} for event {}", I::NAME, event);
            return report;
        }

        for implementer in &implementers {
            report.invoked += 1;
            if let Err(e) = f(&*implementer.component) {
                error!("Component '{}' failed handling {}: {}", implementer.name, event, e);
                report.failures.push(DispatchFailure {
                    component: implementer.name.to_string(),
                    error: e,
                });
            }
        }
        report
    }

    /// Fail-fast: stop at the first failure and return it as `DispatchFailed`
    pub fn notify_all<F>(&self, event: &str, mut f: F) -> PluginResult<DispatchReport>
    where
        F: FnMut(&I) -> PluginResult<()>,
    {
        let mut report = DispatchReport::new(event);
        let implementers = self.resolve();
        if implementers.is_empty() {
            debug!("No implementers of {} for event {}", I::NAME, event);
            return Ok(report);
        }

        for implementer in &implementers {
            report.invoked += 1;
            if let Err(e) = f(&*implementer.component) {
                error!("Component '{}' failed handling {}, aborting: {}", implementer.name, event, e);
                return Err(PluginError::dispatch_failed(event, implementer.name, &e));
            }
        }
        Ok(report)
    }

    /// Collect one value from every implementer, skipping failures
    pub fn gather<T, F>(&self, event: &str, mut f: F) -> Vec<T>
    where
        F: FnMut(&I) -> PluginResult<T>,
    {
        let implementers = self.resolve();
        let mut values = Vec::with_capacity(implementers.len());
        for implementer in &implementers {
            match f(&*implementer.component) {
                Ok(value) => values.push(value),
                Err(e) => error!("Component '{}' failed handling {}: {}", implementer.name, event, e),
            }
        }
        values
    }

    /// Collect one value from every implementer, stopping at the first failure
    pub fn try_gather<T, F>(&self, event: &str, mut f: F) -> PluginResult<Vec<T>>
    where
        F: FnMut(&I) -> PluginResult<T>,
    {
        let implementers = self.resolve();
        let mut values = Vec::with_capacity(implementers.len());
        for implementer in &implementers {
            let value = f(&*implementer.component)
                .map_err(|e| PluginError::dispatch_failed(event, implementer.name, &e))?;
            values.push(value);
        }
        Ok(values)
    }

    /// True when any implementer answers true; stops at the first true
    pub fn any<F>(&self, mut f: F) -> bool
    where
        F: FnMut(&I) -> bool,
    {
        self.resolve().iter().any(|implementer| f(&*implementer.component))
    }

    /// First non-empty answer in dispatch order.
    ///
    /// A failing implementer is logged and skipped.
    pub fn first_some<T, F>(&self, event: &str, mut f: F) -> Option<T>
    where
        F: FnMut(&I) -> PluginResult<Option<T>>,
    {
        for implementer in &self.resolve() {
            match f(&*implementer.component) {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {}
                Err(e) => error!("Component '{}' failed handling {}: {}", implementer.name, event, e),
            }
        }
        None
    }
}

/// Iterator over the components of an extension point
pub struct Components<'m, I: ?Sized> {
    inner: std::vec::IntoIter<Implementer<'m, I>>,
}

impl<'m, I: ?Sized> Iterator for Components<'m, I> {
    type Item = Arc<I>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Implementer::into_component)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'m, 'p, I: Interface + ?Sized> IntoIterator for &'p ExtensionPoint<'m, I> {
    type Item = Arc<I>;
    type IntoIter = Components<'m, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.components()
    }
}
