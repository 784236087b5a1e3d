//! Determinism, cycle handling and configuration behavior

use deep_render::{Identity, Kind, RenderConfig, Renderer, Type, Value, render};
use std::sync::Arc;
use std::thread;

fn render_ptr(v: &Value) -> String {
    Renderer::new(RenderConfig::with_address_token("PTR")).render(v)
}

fn string_int_map(pairs: &[(&str, i64)]) -> Value {
    Value::map(
        Type::string(),
        Type::int(),
        pairs
            .iter()
            .map(|(k, v)| (Value::string(k), Value::int(*v)))
            .collect(),
    )
}

#[test]
fn test_rendering_is_repeatable() {
    let m = string_int_map(&[("x", 1), ("y", 2), ("z", 3)]);
    let first = render(&m);
    for _ in 0..10 {
        assert_eq!(render(&m), first);
    }
}

#[test]
fn test_map_insertion_order_does_not_matter() {
    let pairs = [("delta", 4), ("alpha", 1), ("charlie", 3), ("bravo", 2)];
    let expected = r#"map[string]int{"alpha":1, "bravo":2, "charlie":3, "delta":4}"#;

    let forward = string_int_map(&pairs);
    let mut reversed = pairs;
    reversed.reverse();
    let backward = string_int_map(&reversed);

    let incremental = Value::map(Type::string(), Type::int(), vec![]);
    for (k, v) in [pairs[2], pairs[0], pairs[3], pairs[1]] {
        incremental.insert(Value::string(k), Value::int(v)).unwrap();
    }

    assert_eq!(render(&forward), expected);
    assert_eq!(render(&backward), expected);
    assert_eq!(render(&incremental), expected);
}

#[test]
fn test_mixed_numeric_keys_independent_of_insertion_order() {
    let keys = [
        Value::any(Value::float(-f64::NAN)),
        Value::any(Value::float(f64::NEG_INFINITY)),
        Value::any(Value::int(5)),
    ];
    let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
    for order in orders {
        let m = Value::map(Type::any(), Type::int(), vec![]);
        for i in order {
            m.insert(keys[i].clone(), Value::int(0)).unwrap();
        }
        assert_eq!(render(&m), "map[any]int{NaN:0, -Inf:0, 5:0}");
    }
}

#[test]
fn test_shared_reference_renders_fully_in_each_position() {
    let shared = Value::pointer_to(Value::int(7));
    let pair = Value::array(Type::pointer_to(Type::int()), vec![shared.clone(), shared]);
    assert_eq!(render_ptr(&pair), "[2]*int{(*int)(7), (*int)(7)}");
}

#[test]
fn test_self_pointer_cycle() {
    let t = Type::named("list.Node", Kind::Struct);
    let a = Value::cell(Value::record(
        t.clone(),
        vec![("V", Value::int(1)), ("Next", Value::nil_pointer(t.clone()))],
    ));
    let b = Value::cell(Value::record(
        t.clone(),
        vec![("V", Value::int(2)), ("Next", Value::nil_pointer(t))],
    ));
    let pa = Value::pointer(&a);
    let pb = Value::pointer(&b);
    a.borrow_mut().set_field("Next", pb.clone()).unwrap();
    b.borrow_mut().set_field("Next", pa.clone()).unwrap();

    assert_eq!(
        render_ptr(&pa),
        "(*list.Node){V:1, Next:(*list.Node){V:2, Next:<REC(*list.Node)>}}"
    );
    assert_eq!(
        render_ptr(&pb),
        "(*list.Node){V:2, Next:(*list.Node){V:1, Next:<REC(*list.Node)>}}"
    );
}

#[test]
fn test_slice_containing_itself() {
    let s = Value::slice(Type::any(), vec![Value::any(Value::int(1))]);
    s.push(Value::any(s.clone())).unwrap();
    assert_eq!(render_ptr(&s), "[]any{1, <REC([]any)>}");
}

#[test]
fn test_cycle_through_interface_keeps_type() {
    let s = Value::slice(Type::slice_of(Type::any()), vec![]);
    let inner = Value::slice(Type::any(), vec![]);
    s.push(inner.clone()).unwrap();
    inner.push(Value::any(s.clone())).unwrap();
    assert_eq!(render_ptr(&s), "[][]any{{<REC([][]any)>}}");
}

#[test]
fn test_cycle_in_implied_slot_omits_type() {
    let t = Type::named("g.T", Kind::Struct);
    let kids = Type::slice_of(Type::pointer_to(t.clone()));
    let node = Value::cell(Value::record(t.clone(), vec![("Kids", Value::nil_slice(kids))]));
    let p = Value::pointer(&node);
    node.borrow_mut()
        .set_field("Kids", Value::slice(Type::pointer_to(t), vec![p.clone()]))
        .unwrap();
    assert_eq!(render_ptr(&p), "(*g.T){Kids:[]*g.T{<REC()>}}");
}

#[test]
fn test_doubly_indirected_nil() {
    let v = Value::pointer_to(Value::nil_pointer(Type::int()));
    assert_eq!(render_ptr(&v), "(**int)(nil)");
}

#[test]
fn test_custom_address_formatter() {
    let config = RenderConfig::with_address_formatter(|id: Identity| {
        if id.0 == 0 { "none".to_string() } else { "some".to_string() }
    });
    let r = Renderer::new(config);
    assert_eq!(r.render(&Value::nil_chan(Type::int())), "(chan int)(none)");
    assert_eq!(r.render(&Value::chan(Type::int())), "(chan int)(some)");
}

#[test]
fn test_default_addresses_are_hex() {
    let text = render(&Value::chan(Type::string()));
    let addr = text
        .strip_prefix("(chan string)(0x")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap();
    assert_eq!(addr.len(), 16);
    assert!(addr.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_renderer_shared_across_threads() {
    let renderer = Arc::new(Renderer::new(RenderConfig::with_address_token("PTR")));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let renderer = Arc::clone(&renderer);
            thread::spawn(move || {
                let m = string_int_map(&[("b", i), ("a", -i)]);
                renderer.render(&m)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let i = i as i64;
        assert_eq!(
            handle.join().unwrap(),
            format!(r#"map[string]int{{"a":{}, "b":{}}}"#, -i, i)
        );
    }
}
