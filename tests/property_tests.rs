//! Property tests for the two wire-framing round-trip laws: the serial
//! header/ACK and the radio command/ACK/ready-marker alphabets.
//!
//! Runs on host only — proptest is a dev-dependency, never linked into the
//! board firmware.

use fl_satcore::rpc::codec::{Scope, SerialAck, SerialCmd, SerialHeader};
use fl_satcore::rpc::command::{RadioAck, RadioCommand, ReadyMarker};
use proptest::prelude::*;

fn serial_cmd_strategy() -> impl Strategy<Value = SerialCmd> {
    prop_oneof![
        Just(SerialCmd::Send),
        Just(SerialCmd::Receive),
        Just(SerialCmd::SampleCount),
        Just(SerialCmd::Aggregate),
        Just(SerialCmd::EpochCount),
    ]
}

fn scope_strategy() -> impl Strategy<Value = Scope> {
    prop_oneof![Just(Scope::Local), Just(Scope::Global)]
}

fn radio_command_strategy() -> impl Strategy<Value = RadioCommand> {
    prop_oneof![
        any::<u32>().prop_map(|length| RadioCommand::Receive { length }),
        any::<u32>().prop_map(|length| RadioCommand::Send { length }),
        Just(RadioCommand::SampleCount),
        Just(RadioCommand::EpochCount),
        Just(RadioCommand::Led),
    ]
}

proptest! {
    /// `SerialHeader::decode(header.encode())` recovers the original header
    /// for any cmd/scope/length/client_id/sample_count combination.
    #[test]
    fn serial_header_round_trips(
        cmd in serial_cmd_strategy(),
        scope in scope_strategy(),
        payload_len in any::<u32>(),
        client_id in any::<u16>(),
        sample_count in any::<u32>(),
    ) {
        let header = SerialHeader { cmd, scope, payload_len, client_id, sample_count };
        let decoded = SerialHeader::decode(&header.encode()).unwrap();
        prop_assert_eq!(decoded, header);
    }

    #[test]
    fn serial_ack_round_trips(ok in any::<bool>(), value in any::<u32>()) {
        let ack = SerialAck { ok, value };
        let decoded = SerialAck::decode(&ack.encode()).unwrap();
        prop_assert_eq!(decoded, ack);
    }

    /// `RadioCommand::decode(cmd.encode())` recovers the original command,
    /// over both the length-carrying and nullary tags.
    #[test]
    fn radio_command_round_trips(cmd in radio_command_strategy()) {
        let mut buf = heapless::Vec::new();
        cmd.encode(&mut buf);
        let decoded = RadioCommand::decode(&buf).unwrap();
        prop_assert_eq!(decoded, cmd);
    }

    #[test]
    fn radio_ack_round_trips(ok in any::<bool>(), value in any::<u32>()) {
        let ack = RadioAck { ok, value };
        let decoded = RadioAck::decode(&ack.encode()).unwrap();
        prop_assert_eq!(decoded, ack);
    }

    #[test]
    fn ready_marker_round_trips(length in any::<u32>()) {
        let marker = ReadyMarker { length };
        let decoded = ReadyMarker::decode(&marker.encode()).unwrap();
        prop_assert_eq!(decoded, marker);
    }

    /// A header always encodes to exactly 12 bytes regardless of field
    /// values — the wire format has no variable-length encoding.
    #[test]
    fn serial_header_encoding_is_fixed_size(
        cmd in serial_cmd_strategy(),
        scope in scope_strategy(),
        payload_len in any::<u32>(),
    ) {
        let header = SerialHeader { cmd, scope, payload_len, client_id: 0, sample_count: 0 };
        prop_assert_eq!(header.encode().len(), fl_satcore::rpc::codec::HEADER_SIZE);
    }
}
