mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{Gauge, Widget};
use memref_core::reference::Target;
use memref_core::{
    Diagnostics, Error, MemberReference, PersistedReference, ReferenceState, ScopeFlags, Value,
};

#[derive(Default)]
struct Collect(RefCell<Vec<String>>);

impl Diagnostics for Collect {
    fn report(&self, failure: &Error) {
        self.0.borrow_mut().push(failure.to_string());
    }
}

fn gauge() -> Rc<RefCell<Gauge>> {
    Rc::new(RefCell::new(Gauge {
        label: "boiler".to_string(),
        level: 2.0,
        ..Gauge::default()
    }))
}

fn resolved(target: &Rc<RefCell<Gauge>>, token: &str) -> (MemberReference, Rc<Collect>) {
    let sink = Rc::new(Collect::default());
    let mut reference = MemberReference::new()
        .with_target(target)
        .with_token(token)
        .with_diagnostics(sink.clone());
    reference.refresh();
    (reference, sink)
}

#[test]
fn unresolved_until_refresh() {
    let target = gauge();
    let mut reference = MemberReference::new()
        .with_target(&target)
        .with_token("Fields/string label");
    assert_eq!(reference.state(), ReferenceState::Unresolved);
    assert!(!reference.can_operate());
    assert_eq!(reference.get(&[]), None);

    reference.refresh();
    assert_eq!(reference.state(), ReferenceState::Resolved);
    assert!(reference.can_operate());
}

#[test]
fn get_and_set_field() {
    let target = gauge();
    let (reference, sink) = resolved(&target, "Fields/string label");

    assert_eq!(reference.get(&[]), Some(Value::String("boiler".to_string())));
    assert_eq!(reference.set(&[Value::from("kettle")]), None);
    assert_eq!(target.borrow().label, "kettle");
    assert_eq!(reference.get_as::<String>(&[]).as_deref(), Some("kettle"));
    assert!(sink.0.borrow().is_empty());
}

#[test]
fn get_ignores_args_for_data() {
    let target = gauge();
    let (reference, _) = resolved(&target, "Properties/float Level");
    assert_eq!(reference.get(&[Value::Int(1), Value::Int(2)]), Some(Value::Float(2.0)));
}

#[test]
fn set_accessor() {
    let target = gauge();
    let (reference, _) = resolved(&target, "Properties/float Level");
    assert_eq!(reference.set(&[Value::Float(5.5)]), None);
    assert!((target.borrow().level - 5.5).abs() < f32::EPSILON);
}

#[test]
fn read_only_accessor_reports() {
    let target = gauge();
    let (reference, sink) = resolved(&target, "Properties/bool Armed");
    assert_eq!(reference.get(&[]), Some(Value::Bool(false)));
    assert_eq!(reference.set(&[Value::Bool(true)]), None);
    assert_eq!(sink.0.borrow().as_slice(), ["'Armed' is read-only"]);
    assert!(matches!(
        reference.try_set(&[Value::Bool(true)]),
        Err(Error::ReadOnly(_))
    ));
}

#[test]
fn set_type_mismatch_reports() {
    let target = gauge();
    let (reference, sink) = resolved(&target, "Fields/string label");
    assert_eq!(reference.set(&[Value::Int(3)]), None);
    assert_eq!(target.borrow().label, "boiler");
    assert_eq!(
        sink.0.borrow().as_slice(),
        ["Type mismatch: expected string, found int"]
    );
}

#[test]
fn set_without_value_reports() {
    let target = gauge();
    let (reference, sink) = resolved(&target, "Fields/string label");
    assert_eq!(reference.set(&[]), None);
    assert_eq!(sink.0.borrow().len(), 1);
}

#[test]
fn invoke_callable_through_get_and_set() {
    let target = gauge();
    let (reference, sink) = resolved(&target, "Methods/void Arm ()");
    assert_eq!(reference.get(&[]), None);
    assert_eq!(reference.set(&[]), None);
    assert!(target.borrow().armed);
    assert_eq!(target.borrow().calls, 2);
    assert!(sink.0.borrow().is_empty());
}

#[test]
fn void_callable_result_is_unit_when_fallible() {
    let target = gauge();
    let (reference, _) = resolved(&target, "Methods/void Arm ()");
    assert_eq!(reference.try_get(&[]).unwrap(), Value::Unit);
    assert_eq!(reference.try_set(&[]).unwrap(), Some(Value::Unit));
}

#[test]
fn invoke_with_args() {
    let target = gauge();
    let (reference, _) = resolved(&target, "Methods/float Scale (float factor, float offset)");
    assert_eq!(
        reference.get(&[Value::Float(3.0), Value::Float(1.0)]),
        Some(Value::Float(7.0))
    );
    assert_eq!(reference.get_as::<f32>(&[Value::Float(1.0), Value::Float(0.0)]), Some(7.0));
}

#[test]
fn wrong_argument_count_reports() {
    let target = gauge();
    let (reference, sink) = resolved(&target, "Methods/float Scale (float factor)");
    assert_eq!(reference.get(&[]), None);
    assert_eq!(
        sink.0.borrow().as_slice(),
        ["'Scale' takes 1 argument(s), got 0"]
    );
}

#[test]
fn callable_error_is_caught() {
    let target = gauge();
    let (reference, sink) = resolved(&target, "Methods/void Fail (string reason)");
    assert_eq!(reference.get(&[Value::from("jammed")]), None);
    assert_eq!(
        sink.0.borrow().as_slice(),
        ["Invocation of 'Fail' failed: jammed"]
    );
}

#[test]
fn callable_panic_is_caught() {
    let target = gauge();
    let (reference, sink) = resolved(&target, "Methods/int Explode ()");
    assert_eq!(reference.get(&[]), None);
    assert_eq!(
        sink.0.borrow().as_slice(),
        ["'Explode' panicked: gauge exploded"]
    );
    // The target stays usable after the panic.
    assert_eq!(target.borrow().label, "boiler");
}

#[test]
fn busy_target_is_reported() {
    let target = gauge();
    let (reference, sink) = resolved(&target, "Fields/string label");
    let guard = target.borrow_mut();
    assert_eq!(reference.get(&[]), None);
    drop(guard);
    assert_eq!(
        sink.0.borrow().as_slice(),
        ["Reference target is already borrowed"]
    );
}

#[test]
fn stale_token_fails_silently() {
    let target = gauge();
    let (reference, sink) = resolved(&target, "Fields/int pressure");
    assert_eq!(reference.state(), ReferenceState::Unresolved);
    assert!(!reference.can_operate());
    assert_eq!(reference.get(&[]), None);
    assert_eq!(reference.set(&[Value::Int(1)]), None);
    assert!(sink.0.borrow().is_empty());
}

#[test]
fn malformed_token_fails_silently() {
    let target = gauge();
    let (reference, _) = resolved(&target, "Fields/label");
    assert!(!reference.can_operate());
    let (reference, _) = resolved(&target, "Events/void Tick ()");
    assert!(!reference.can_operate());
}

#[test]
fn scope_flags_gate_resolution() {
    let target = gauge();
    let mut reference = MemberReference::new()
        .with_target(&target)
        .with_token("Fields/int secret");
    reference.refresh();
    assert!(!reference.can_operate());

    reference.set_scope_flags(ScopeFlags::NON_PUBLIC | ScopeFlags::INSTANCE);
    reference.refresh();
    assert!(reference.can_operate());
    assert_eq!(reference.get(&[]), Some(Value::Int(0)));
}

#[test]
fn dropped_target_stops_operation() {
    let target = gauge();
    let (reference, _) = resolved(&target, "Fields/string label");
    assert!(reference.can_operate());
    drop(target);
    assert!(!reference.can_operate());
    assert_eq!(reference.get(&[]), None);
    assert_eq!(reference.state(), ReferenceState::Resolved);
}

#[test]
fn refresh_transitions_back_to_unresolved() {
    let target = gauge();
    let (mut reference, _) = resolved(&target, "Fields/string label");
    assert_eq!(reference.state(), ReferenceState::Resolved);

    reference.select("Fields/string missing");
    reference.refresh();
    assert_eq!(reference.state(), ReferenceState::Unresolved);

    reference.select("Fields/string label");
    reference.refresh();
    reference.refresh();
    assert_eq!(reference.state(), ReferenceState::Resolved);

    reference.clear();
    assert_eq!(reference.token(), "");
    assert_eq!(reference.state(), ReferenceState::Unresolved);
}

#[test]
fn refresh_without_target() {
    let mut reference = MemberReference::new().with_token("Fields/int count");
    reference.refresh();
    assert_eq!(reference.state(), ReferenceState::Unresolved);
}

#[test]
fn restore_refreshes_once() {
    let widget = Rc::new(RefCell::new(Widget { count: 4 }));
    let target: Target = widget.clone();
    let persisted: PersistedReference = serde_json::from_str(
        r#"{ "target": "w1", "token": "Methods/bool Compute (int x)", "scopeFlags": 20 }"#,
    )
    .unwrap();

    let reference = MemberReference::restore(&persisted, Some(&target));
    assert!(reference.can_operate());
    assert_eq!(reference.get(&[Value::Int(9)]), Some(Value::Bool(true)));
    assert_eq!(reference.get_as::<bool>(&[Value::Int(1)]), Some(false));
    assert_eq!(reference.persist(Some("w1".to_string())), persisted);
}

#[test]
fn restore_without_target() {
    let persisted = PersistedReference {
        token: "Fields/int count".to_string(),
        ..PersistedReference::default()
    };
    let reference = MemberReference::restore(&persisted, None);
    assert!(!reference.can_operate());
}

#[test]
fn get_as_mismatch_reports() {
    let widget = Rc::new(RefCell::new(Widget { count: 4 }));
    let sink = Rc::new(Collect::default());
    let mut reference = MemberReference::new()
        .with_target(&widget)
        .with_token("Fields/int count")
        .with_diagnostics(sink.clone());
    reference.refresh();
    assert_eq!(reference.get_as::<bool>(&[]), None);
    assert_eq!(sink.0.borrow().len(), 1);
}

#[test]
fn closure_diagnostics() {
    let widget = Rc::new(RefCell::new(Widget::default()));
    let seen = Rc::new(RefCell::new(0));
    let counter = seen.clone();
    let mut reference = MemberReference::new()
        .with_target(&widget)
        .with_token("Fields/int count")
        .with_diagnostics(Rc::new(move |_: &Error| *counter.borrow_mut() += 1));
    reference.refresh();
    reference.set(&[]);
    assert_eq!(*seen.borrow(), 1);
}
