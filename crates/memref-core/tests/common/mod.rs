#![allow(dead_code)]

use memref_core::introspect::{Binding, TypeInfo, Visibility};
use memref_core::{impl_reflect, Error, Param, TypeRef, Value};

#[derive(Debug, Default)]
pub struct Widget {
    pub count: i32,
}

impl_reflect!(Widget, || {
    TypeInfo::builder::<Widget>("Widget")
        .field("count", |w: &Widget| w.count, |w: &mut Widget, v| w.count = v)
        .method1("Compute", "x", |w: &mut Widget, x: i32| x > w.count)
        .build()
});

#[derive(Debug, Default)]
pub struct Gauge {
    pub label: String,
    pub level: f32,
    pub samples: Vec<f32>,
    pub armed: bool,
    pub calls: i32,
    pub secret: i32,
}

impl_reflect!(Gauge, || {
    TypeInfo::builder::<Gauge>("Gauge")
        .field("label", |g: &Gauge| g.label.clone(), |g: &mut Gauge, v| g.label = v)
        .field("samples", |g: &Gauge| g.samples.clone(), |g: &mut Gauge, v| g.samples = v)
        .property_mut("Level", |g: &Gauge| g.level, |g: &mut Gauge, v| g.level = v)
        .property("Armed", |g: &Gauge| g.armed)
        .method0("Arm", |g: &mut Gauge| {
            g.armed = true;
            g.calls += 1;
        })
        .method2("Scale", ["factor", "offset"], |g: &mut Gauge, f: f32, o: f32| {
            g.level = g.level * f + o;
            g.level
        })
        .method1("Scale", "factor", |g: &mut Gauge, f: f32| {
            g.level *= f;
            g.level
        })
        .method_raw(
            "Fail",
            TypeRef::Void,
            vec![Param::new(TypeRef::String, "reason")],
            |_: &mut Gauge, args: &[Value]| {
                let reason = match &args[0] {
                    Value::String(reason) => reason.clone(),
                    other => other.type_name(),
                };
                Err(Error::invocation("Fail", reason))
            },
        )
        .method0("Explode", |_: &mut Gauge| -> i32 { panic!("gauge exploded") })
        .scope(Visibility::NonPublic, Binding::Instance)
        .field("secret", |g: &Gauge| g.secret, |g: &mut Gauge, v| g.secret = v)
        .build()
});
