//! Property tests over generated values.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use agraph_common::GraphId;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use proptest::prelude::*;

use super::graph::{build_edge, build_vertex, make_path};
use super::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        (-1e12f64..1e12).prop_map(Value::Float),
        prop::num::f64::NORMAL.prop_map(Value::Float),
        (any::<i64>(), 0i64..6)
            .prop_map(|(m, scale)| Value::Numeric(BigDecimal::new(BigInt::from(m), scale))),
        (-3_000_000_000_000_000i64..3_000_000_000_000_000).prop_map(Value::Timestamp),
        "[a-zA-Z0-9 _\"\\\\é\n]{0,8}".prop_map(Value::String),
    ]
}

fn key() -> impl Strategy<Value = String> {
    "[a-z]{1,4}"
}

fn float_extremes() -> impl Strategy<Value = Value> {
    prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)].prop_map(Value::Float)
}

fn vertex(id: i64, props: Value) -> Value {
    build_vertex(GraphId::new(id), "V", props).expect("valid vertex")
}

fn props() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(key(), scalar(), 0..3)
        .prop_map(|props| Value::object(props).expect("keys are unique"))
}

fn edge() -> impl Strategy<Value = Value> {
    (0i64..1000, 0i64..1000, 0i64..1000, props()).prop_map(|(id, start, end, props)| {
        let (start, end) = (GraphId::new(start), GraphId::new(end));
        build_edge(GraphId::new(id), start, end, "E", props).expect("valid edge")
    })
}

/// Paths over 1..4 vertices, each edge pointing forward or backward.
fn path() -> impl Strategy<Value = Value> {
    prop::collection::vec((0i64..1000, any::<bool>()), 1..4).prop_map(|hops| {
        let mut elements = vec![vertex(hops[0].0, Value::Null)];
        for (i, pair) in hops.windows(2).enumerate() {
            let (from, to) = (GraphId::new(pair[0].0), GraphId::new(pair[1].0));
            let (start, end) = if pair[1].1 { (to, from) } else { (from, to) };
            let id = GraphId::new(1000 + i as i64);
            elements.push(build_edge(id, start, end, "E", Value::Null).expect("valid edge"));
            elements.push(vertex(pair[1].0, Value::Null));
        }
        make_path(&elements).expect("connected path")
    })
}

fn nested(leaf: impl Strategy<Value = Value> + 'static) -> impl Strategy<Value = Value> {
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(key(), inner.clone(), 0..6)
                .prop_map(|pairs| Value::object(pairs).expect("keys are unique")),
            (0i64..1000, prop::collection::btree_map(key(), inner, 0..3)).prop_map(
                |(id, props): (i64, BTreeMap<String, Value>)| {
                    vertex(id, Value::object(props).expect("keys are unique"))
                }
            ),
            edge(),
            path(),
        ]
    })
}

/// Values that compare structurally equal to their own round trip.
fn value() -> impl Strategy<Value = Value> {
    nested(scalar())
}

/// Every variant, NaN and infinities included.
fn any_value() -> impl Strategy<Value = Value> {
    nested(prop_oneof![6 => scalar(), 1 => float_extremes()])
}

proptest! {
    #[test]
    fn binary_round_trip(v in value()) {
        let encoded = encode(&v).unwrap();
        prop_assert_eq!(decode(&encoded).unwrap(), v);
    }

    #[test]
    fn text_round_trip(v in value(), indent in any::<bool>()) {
        let text = to_text(&v, indent).unwrap();
        prop_assert_eq!(from_text(&text).unwrap(), v, "text: {}", text);
    }

    #[test]
    fn equal_numbers_hash_equal(i in -(1i64 << 53)..(1i64 << 53)) {
        let int = Value::Integer(i);
        let float = Value::Float(i as f64);
        let numeric = Value::Numeric(BigDecimal::new(BigInt::from(i) * 100, 2));
        prop_assert_eq!(compare(&int, &float), Ordering::Equal);
        prop_assert_eq!(compare(&int, &numeric), Ordering::Equal);
        prop_assert_eq!(hash_value(&int).unwrap(), hash_value(&float).unwrap());
        prop_assert_eq!(hash_value(&int).unwrap(), hash_value(&numeric).unwrap());
    }

    #[test]
    fn keys_are_canonical_and_searchable(
        pairs in prop::collection::btree_map(key(), scalar(), 1..20)
    ) {
        let v = Value::object(pairs.clone()).unwrap();
        let encoded = encode(&v).unwrap();
        let keys: Vec<&str> = encoded.keys().collect::<Result<_, _>>().unwrap();
        for w in keys.windows(2) {
            prop_assert_eq!(key_cmp(w[0].as_bytes(), w[1].as_bytes()), Ordering::Less);
        }
        for (k, expected) in &pairs {
            let found = encoded.find_key(k).unwrap();
            prop_assert_eq!(found.as_ref(), Some(expected));
        }
        prop_assert_eq!(encoded.find_key("absent-key").unwrap(), None);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10_000))]

    #[test]
    fn order_is_antisymmetric(a in any_value(), b in any_value()) {
        prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
        prop_assert_eq!(compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn order_is_transitive(a in any_value(), b in any_value(), c in any_value()) {
        let mut sorted = [a, b, c];
        sorted.sort_by(compare);
        prop_assert_ne!(compare(&sorted[0], &sorted[1]), Ordering::Greater);
        prop_assert_ne!(compare(&sorted[1], &sorted[2]), Ordering::Greater);
        prop_assert_ne!(compare(&sorted[0], &sorted[2]), Ordering::Greater);
    }

    #[test]
    fn encoded_order_matches(a in any_value(), b in any_value()) {
        let ea = encode(&a).unwrap();
        let eb = encode(&b).unwrap();
        prop_assert_eq!(compare_encoded(&ea, &eb).unwrap(), compare(&a, &b));
    }

    #[test]
    fn hash_is_consistent(v in any_value()) {
        let encoded = encode(&v).unwrap();
        prop_assert_eq!(hash_encoded(&encoded).unwrap(), hash_value(&v).unwrap());
        let copy = decode(&encoded).unwrap();
        prop_assert_eq!(hash_value(&copy).unwrap(), hash_value(&v).unwrap());
    }
}
