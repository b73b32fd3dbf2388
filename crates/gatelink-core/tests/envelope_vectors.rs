//! Envelope decode vectors (header decode + payload reinterpretation).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use gatelink_core::protocol::codec::decode;
use gatelink_core::protocol::interaction::Interaction;
use gatelink_core::protocol::payload::Hello;

mod vector_loader;
use vector_loader::load;

#[test]
fn envelope_vectors() {
    let files = [
        "hello.json",
        "hello_bad_shape.json",
        "interaction_create.json",
        "heartbeat_ack.json",
        "dispatch_missing_seq.json",
        "unknown_op.json",
        "not_json.json",
        "op_out_of_range.json",
        "op_wide.json",
    ];

    for f in files {
        let v = load(f);
        let res = decode(&v.frame_text());

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.kind().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let env = res.expect("expected ok envelope");
        let ex = v.expect.expect("missing expect block");

        assert_eq!(env.op, ex["op"].as_i64().unwrap(), "vector={}", v.description);
        assert_eq!(env.dispatch_sequence(), ex["seq"].as_u64(), "vector={}", v.description);
        assert_eq!(env.dispatch_event(), ex["event"].as_str(), "vector={}", v.description);

        match ex["payload_kind"].as_str().unwrap() {
            "hello" => {
                let hello = env.reinterpret::<Hello>();
                if let Some(err) = &v.expect_reinterpret_error {
                    let e = hello.expect_err("expected reinterpret error");
                    assert_eq!(e.kind().as_str(), err.code, "vector={}", v.description);
                } else {
                    let hello = hello.unwrap();
                    assert_eq!(
                        hello.heartbeat_interval,
                        ex["heartbeat_interval"].as_u64().unwrap(),
                        "vector={}",
                        v.description
                    );
                }
            }
            "interaction" => {
                let i: Interaction = env.reinterpret().unwrap();
                assert_eq!(i.command_name(), ex["command"].as_str(), "vector={}", v.description);
                assert_eq!(
                    i.focused_value(),
                    ex["focused"].as_str().unwrap(),
                    "vector={}",
                    v.description
                );
            }
            "none" => assert!(env.payload.is_none(), "vector={}", v.description),
            "opaque" => assert!(env.payload.is_some(), "vector={}", v.description),
            other => panic!("unknown payload_kind: {other}"),
        }
    }
}

#[test]
fn any_non_hello_first_opcode_is_distinguishable() {
    for op in -1i64..=1000 {
        let env = decode(&format!(r#"{{"op":{op},"d":null}}"#)).unwrap();
        assert_eq!(env.op == 10, env.opcode() == Some(gatelink_core::protocol::OpCode::Hello));
    }
}
