//! Dispatch Tests

use crate::config::ConfigManager;
use crate::plugin::component::Component;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::manager::ComponentManager;
use crate::plugin::registry::ComponentRegistry;
use crate::plugin::settings::RunParams;
use super::log_capture;
use super::mock_components::*;

fn three_with_faulty_second() -> ComponentManager {
    let registry = ComponentRegistry::new()
        .with::<Alpha>().unwrap()
        .with::<Faulty>().unwrap()
        .with::<Gamma>().unwrap();
    let mut manager = ComponentManager::new(registry);
    manager.load(ConfigManager::empty()).unwrap();
    manager.configure_all(RunParams::new()).unwrap();
    manager
}

#[test]
fn test_fail_fast_stops_at_second() {
    let manager = three_with_faulty_second();
    let ext = manager.extension_point::<dyn Bar>();

    let result = ext.notify_all("on_bar", |c| c.on_bar());

    match result {
        Err(PluginError::DispatchFailed { event, component, .. }) => {
            assert_eq!(event, "on_bar");
            assert_eq!(component, "faulty");
        }
        other => panic!("expected DispatchFailed, got {:?}", other),
    }
    assert_eq!(manager.instance_of::<Alpha>().unwrap().state.bar_calls(), 1);
    assert_eq!(manager.instance_of::<Faulty>().unwrap().state.bar_calls(), 1);
    assert_eq!(manager.instance_of::<Gamma>().unwrap().state.bar_calls(), 0);
}

#[test]
fn test_best_effort_reaches_third() {
    let manager = three_with_faulty_second();
    let report = manager.extension_point::<dyn Bar>().notify("on_bar", |c| c.on_bar());

    assert_eq!(report.invoked, 3);
    assert!(!report.is_clean());
    assert_eq!(report.failed_components(), vec!["faulty"]);
    assert_eq!(manager.instance_of::<Gamma>().unwrap().state.bar_calls(), 1);
}

#[test]
fn test_broadcast_uses_declared_discipline() {
    let manager = three_with_faulty_second();

    // IBar is fail-fast
    let bar = manager.extension_point::<dyn Bar>().broadcast("on_bar", |c| c.on_bar());
    assert!(bar.is_err());
    assert_eq!(manager.instance_of::<Gamma>().unwrap().state.bar_calls(), 0);

    // IFoo is best-effort
    let foo = manager.extension_point::<dyn Foo>().broadcast("on_foo", |c| c.on_foo()).unwrap();
    assert_eq!(foo.failed_components(), vec!["faulty"]);
    assert_eq!(manager.instance_of::<Gamma>().unwrap().state.foo_calls(), 1);
}

#[test]
fn test_zero_implementers_is_a_no_op() {
    let registry = ComponentRegistry::new().with::<Alpha>().unwrap();
    let mut manager = ComponentManager::new(registry);
    manager.load(ConfigManager::empty()).unwrap();
    manager.configure_all(RunParams::new()).unwrap();

    let ext = manager.extension_point::<dyn Lonely>();
    assert!(ext.is_empty());
    assert_eq!(ext.interface_name(), "ILonely");

    let report = ext.notify("on_lonely", |c| c.on_lonely());
    assert_eq!(report.invoked, 0);
    assert!(report.is_clean());

    let report = ext.notify_all("on_lonely", |c| c.on_lonely()).unwrap();
    assert_eq!(report.invoked, 0);
    assert!(ext.gather("on_lonely", |c| c.on_lonely()).is_empty());
}

#[test]
fn test_zero_implementers_logs_no_error() {
    let registry = ComponentRegistry::new().with::<Alpha>().unwrap();
    let mut manager = ComponentManager::new(registry);
    manager.load(ConfigManager::empty()).unwrap();
    manager.configure_all(RunParams::new()).unwrap();

    log_capture::start();
    let ext = manager.extension_point::<dyn Lonely>();
    ext.notify("on_lonely", |c| c.on_lonely());
    ext.broadcast("on_lonely", |c| c.on_lonely()).unwrap();
    ext.notify_all("on_lonely", |c| c.on_lonely()).unwrap();
    ext.gather("on_lonely", |c| c.on_lonely());

    assert!(log_capture::errors().is_empty(), "unexpected errors: {:?}", log_capture::errors());
}

#[test]
fn test_best_effort_logs_failure_with_component_and_event() {
    let manager = three_with_faulty_second();

    log_capture::start();
    let report = manager.extension_point::<dyn Bar>().notify("on_bar", |c| c.on_bar());
    assert_eq!(report.failed_components(), vec!["faulty"]);

    let errors = log_capture::errors();
    assert_eq!(errors.len(), 1, "expected one error record: {:?}", errors);
    assert!(errors[0].message.contains("faulty"));
    assert!(errors[0].message.contains("on_bar"));
    assert!(errors[0].target.ends_with("extension"));
}

#[test]
fn test_iteration_follows_dispatch_order() {
    let manager = three_with_faulty_second();
    let ext = manager.extension_point::<dyn Foo>();

    let mut seen = Vec::new();
    for component in &ext {
        seen.push(component.name().to_string());
    }
    assert_eq!(seen, vec!["alpha", "faulty", "gamma"]);
    assert_eq!(ext.components().count(), 3);
}

#[test]
fn test_gather_skips_failures() {
    let manager = three_with_faulty_second();
    let ext = manager.extension_point::<dyn Foo>();

    let values: Vec<String> = ext.gather("on_foo", |c| c.on_foo().map(|_| c.name().to_string()));
    assert_eq!(values, vec!["alpha", "gamma"]);

    let result: PluginResult<Vec<String>> = ext.try_gather("on_foo", |c| c.on_foo().map(|_| c.name().to_string()));
    assert!(matches!(result, Err(PluginError::DispatchFailed { ref component, .. }) if component == "faulty"));
}

#[test]
fn test_first_some_short_circuits() {
    let manager = three_with_faulty_second();
    let ext = manager.extension_point::<dyn Foo>();

    let mut asked = Vec::new();
    let answer = ext.first_some("on_foo", |c| {
        asked.push(c.name().to_string());
        c.on_foo().map(|_| if c.name() == "alpha" { None } else { Some(c.name().to_string()) })
    });

    assert_eq!(answer.as_deref(), Some("gamma"));
    assert_eq!(asked, vec!["alpha", "faulty", "gamma"]);
}

#[test]
fn test_any_stops_at_first_true() {
    let manager = three_with_faulty_second();
    let ext = manager.extension_point::<dyn Foo>();

    let mut asked = 0;
    assert!(ext.any(|c| {
        asked += 1;
        c.name() == "faulty"
    }));
    assert_eq!(asked, 2);
}

#[test]
fn test_disabled_component_receives_nothing() {
    let registry = ComponentRegistry::new()
        .with::<Alpha>().unwrap()
        .with::<Beta>().unwrap();
    let mut manager = ComponentManager::new(registry);
    manager.load(ConfigManager::empty()).unwrap();
    manager.configure_all(RunParams::new()).unwrap();

    manager.extension_point::<dyn Foo>().notify("on_foo", |c| c.on_foo());
    assert_eq!(manager.instance_of::<Beta>().unwrap().state.foo_calls(), 0);

    manager.config_mut().set_value("RUN", "feature", "yes");
    manager.extension_point::<dyn Foo>().notify("on_foo", |c| c.on_foo());
    assert_eq!(manager.instance_of::<Beta>().unwrap().state.foo_calls(), 1);
    assert_eq!(manager.instance_of::<Alpha>().unwrap().state.foo_calls(), 2);
}
