//! Component System Tests
//!
//! Registry, manager and dispatch tests over mock components.


mod dispatch_tests;
