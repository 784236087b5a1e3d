//! Canonical ordering of map keys
//!
//! Maps have no iteration order, so their entries are sorted before
//! rendering. The order is total and stable within one render call; it is
//! not meant to mean anything beyond reproducible output. Keys that still
//! compare equal are ordered by their rendered text by the caller.

use crate::introspect::{Introspect, Shape};
use std::cmp::Ordering;

/// Compare two map keys
pub fn compare_keys<V: Introspect>(a: &V, b: &V) -> Ordering {
    match (a.shape(), b.shape()) {
        (Ok(a), Ok(b)) => compare_shapes(&a, &b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}

/// Rank of a key's class; lower ranks sort first
fn class<V>(shape: &Shape<V>) -> u8 {
    match shape {
        Shape::Bool(_) => 0,
        Shape::Int(_) | Shape::Uint(_) | Shape::Float(_) => 1,
        Shape::String(_) => 2,
        Shape::Complex(..) => 3,
        Shape::Struct { .. } | Shape::Array(_) => 4,
        Shape::Pointer(_) | Shape::Handle(_) => 5,
        Shape::Interface(_) => 6,
        Shape::Invalid | Shape::Slice(_) | Shape::Map(_) => 7,
    }
}

#[derive(Clone, Copy)]
enum Number {
    Integer(i128),
    Float(f64),
}

fn number<V>(shape: &Shape<V>) -> Option<Number> {
    match shape {
        Shape::Int(n) => Some(Number::Integer(*n as i128)),
        Shape::Uint(n) => Some(Number::Integer(*n as i128)),
        Shape::Float(f) => Some(Number::Float(*f)),
        _ => None,
    }
}

/// Exact integer-float comparison, consistent with `f64::total_cmp`
///
/// NaNs sit beyond the infinities on the side of their sign. An integer
/// sorts just before a float of equal value, so `0 < -0.0 < 0.0`.
fn compare_integer_float(i: i128, f: f64) -> Ordering {
    if f.is_nan() {
        return if f.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    // 2^127: every i128 is below it and at or above its negation
    let limit = i128::MAX as f64;
    if f >= limit {
        return Ordering::Less;
    }
    if f < -limit {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i128)) {
        Ordering::Equal if f < whole => Ordering::Greater,
        Ordering::Equal => Ordering::Less,
        ord => ord,
    }
}

fn compare_numbers(a: Number, b: Number) -> Ordering {
    match (a, b) {
        (Number::Integer(a), Number::Integer(b)) => a.cmp(&b),
        (Number::Float(a), Number::Float(b)) => a.total_cmp(&b),
        (Number::Integer(a), Number::Float(b)) => compare_integer_float(a, b),
        (Number::Float(a), Number::Integer(b)) => compare_integer_float(b, a).reverse(),
    }
}

fn compare_sequences<V: Introspect>(a: &[V], b: &[V]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = compare_keys(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_shapes<V: Introspect>(a: &Shape<V>, b: &Shape<V>) -> Ordering {
    let by_class = class(a).cmp(&class(b));
    if by_class != Ordering::Equal {
        return by_class;
    }

    if let (Some(x), Some(y)) = (number(a), number(b)) {
        return compare_numbers(x, y);
    }

    match (a, b) {
        (Shape::Bool(x), Shape::Bool(y)) => x.cmp(y),
        (Shape::String(x), Shape::String(y)) => x.as_bytes().cmp(y.as_bytes()),
        (Shape::Complex(ar, ai), Shape::Complex(br, bi)) => {
            ar.total_cmp(br).then_with(|| ai.total_cmp(bi))
        }
        (
            Shape::Struct {
                fields: fa,
                summary: sa,
            },
            Shape::Struct {
                fields: fb,
                summary: sb,
            },
        ) => {
            let fa: Vec<&V> = fa.iter().map(|(_, v)| v).collect();
            let fb: Vec<&V> = fb.iter().map(|(_, v)| v).collect();
            let mut ord = Ordering::Equal;
            for (x, y) in fa.iter().zip(fb.iter()) {
                ord = compare_keys(*x, *y);
                if ord != Ordering::Equal {
                    break;
                }
            }
            ord.then_with(|| fa.len().cmp(&fb.len()))
                .then_with(|| sa.cmp(sb))
        }
        (Shape::Array(x), Shape::Array(y)) => compare_sequences(x, y),
        // Records before arrays when a key class mixes them
        (Shape::Struct { .. }, Shape::Array(_)) => Ordering::Less,
        (Shape::Array(_), Shape::Struct { .. }) => Ordering::Greater,
        (Shape::Pointer(x), Shape::Pointer(y)) => {
            x.as_ref().map(|r| r.identity).cmp(&y.as_ref().map(|r| r.identity))
        }
        (Shape::Handle(x), Shape::Handle(y)) => x.cmp(y),
        (Shape::Pointer(x), Shape::Handle(y)) => x.as_ref().map(|r| r.identity).cmp(y),
        (Shape::Handle(x), Shape::Pointer(y)) => x.cmp(&y.as_ref().map(|r| r.identity)),
        (Shape::Interface(x), Shape::Interface(y)) => match (x, y) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => compare_keys(x, y),
        },
        _ => Ordering::Equal,
    }
}
