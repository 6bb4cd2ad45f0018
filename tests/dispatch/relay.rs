//! Decoded path: `relay`.

use std::sync::{Arc, Mutex};

use routed_rust::{Codec, DispatchRegistry, JsonCodec, Message, Variant};

use crate::support::{CountingCodec, Forward, Reading, Wire, WireKind, NESTED, RECEIVER};

#[test]
fn relay_invokes_decoded_handler_without_decoding() {
    let registry = DispatchRegistry::<Wire, CountingCodec>::new(CountingCodec::default());
    let hop = registry.dispatcher_for(RECEIVER).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    hop.register(NESTED, move |message: &Forward| {
        sink.lock().unwrap().push(message.param2.clone());
    })
    .unwrap();

    let message = Wire::from(Forward { param2: "fufufu".into() });
    let delivery = hop.relay(&message, [NESTED]).unwrap();

    assert_eq!(delivery.kind, WireKind::Forward);
    assert_eq!(delivery.delivered, 1);
    assert_eq!(*seen.lock().unwrap(), vec!["fufufu"]);
    assert_eq!(registry.codec().kind_reads(), 0);
    assert_eq!(registry.codec().body_reads(), 0);
}

#[test]
fn relay_passes_values_that_cannot_round_trip() {
    // JSON has no NaN: it encodes as null and null does not decode as f64.
    let encoded = JsonCodec
        .encode(&WireKind::Reading, &Reading { value: f64::NAN })
        .unwrap();
    assert!(JsonCodec.decode_body::<WireKind, Reading>(&encoded).is_err());

    let registry = DispatchRegistry::<Wire>::json();
    let hop = registry.dispatcher_for(RECEIVER).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    hop.register(NESTED, move |reading: &Reading| {
        sink.lock().unwrap().push(reading.value);
    })
    .unwrap();

    let delivery = hop
        .relay_variant(&Reading { value: f64::NAN }, [NESTED])
        .unwrap();

    assert_eq!(delivery.delivered, 1);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].is_nan());
}

#[test]
fn relay_to_group_without_handler_is_a_no_op() {
    let registry = DispatchRegistry::<Wire>::json();
    let hop = registry.dispatcher_for(RECEIVER).unwrap();
    hop.register(NESTED, |_: &Forward| panic!("wrong group"))
        .unwrap();

    let delivery = hop
        .relay(&Wire::from(Forward::default()), ["elsewhere"])
        .unwrap();
    assert!(delivery.is_empty());
}

#[test]
fn relay_matches_on_the_value_kind() {
    let registry = DispatchRegistry::<Wire>::json();
    let hop = registry.dispatcher_for(RECEIVER).unwrap();
    hop.register(NESTED, |_: &Forward| panic!("kind mismatch"))
        .unwrap();

    let reading = Wire::from(Reading { value: 1.5 });
    assert_eq!(reading.kind(), <Reading as Variant<Wire>>::KIND);

    let delivery = hop.relay(&reading, [NESTED]).unwrap();
    assert_eq!(delivery.kind, WireKind::Reading);
    assert!(delivery.is_empty());
}

#[test]
fn byte_and_relay_paths_reach_the_same_handler() {
    let registry = DispatchRegistry::<Wire>::json();
    let hop = registry.dispatcher_for(RECEIVER).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    hop.register(NESTED, move |message: &Forward| {
        sink.lock().unwrap().push(message.clone());
    })
    .unwrap();

    let value = Forward { param2: "same".into() };
    let bytes = hop.encode_variant(&value).unwrap();
    hop.send_to(&bytes, [NESTED]).unwrap();
    hop.relay_variant(&value, [NESTED]).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}
