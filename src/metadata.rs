//! Builds the reflection-facing metadata each message and field carries: the
//! presence encoding the runtime uses to test/set a field without knowing
//! its has-bit layout ahead of time, and the serialized `FileDescriptorProto`
//! bytes embedded for the `upbdefs` pool to rebuild itself from at runtime.

use prost::Message;

use crate::descriptor::{MessageView, is_in_real_oneof, requires_has_bit};
use crate::layout::Layout;
use crate::pb::FileDescriptorProto;

/// How a field's presence is tested: never tracked at all, a plain has-bit,
/// or a oneof case-tag comparison. `OneofCase` carries the byte offset (in
/// the 64-bit ABI) of the oneof's case-tag slot, not the oneof's declaration
/// index — the runtime tests presence by reading that offset, not by
/// looking the oneof up by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    None,
    HasBit(u32),
    OneofCase(u32),
}

/// Matches the single-`i32` presence encoding the generated metadata array
/// stores per field: `0` for `None`, the has-bit index (always positive,
/// has-bits are numbered from 1) for `HasBit`, and the bitwise complement of
/// the oneof case-tag offset for `OneofCase` — complementing keeps it
/// negative and distinct from every positive has-bit index without needing a
/// tag byte.
pub fn encode_presence(presence: Presence) -> i32 {
    match presence {
        Presence::None => 0,
        Presence::HasBit(index) => index as i32,
        Presence::OneofCase(case_offset) => !(case_offset as i32),
    }
}

pub fn field_presence(field: &crate::pb::FieldDescriptorProto, is_proto3: bool, layout: &Layout) -> Presence {
    if is_in_real_oneof(field) {
        Presence::OneofCase(layout.oneof_case_offset(field.oneof_index()).s64)
    } else if requires_has_bit(field, is_proto3) {
        Presence::HasBit(layout.has_bit_index(field.number()).expect("has-bit was assigned"))
    } else {
        Presence::None
    }
}

#[derive(Debug, Clone)]
pub struct FieldMetadata {
    pub number: i32,
    pub presence: i32,
    pub submsg_slot: Option<u32>,
}

pub fn build_field_metadata(
    message: &MessageView,
    is_proto3: bool,
    layout: &Layout,
    submsg_index: &crate::submsg::SubmsgIndex,
) -> Vec<FieldMetadata> {
    message
        .fields()
        .iter()
        .map(|field| FieldMetadata {
            number: field.number(),
            presence: encode_presence(field_presence(field, is_proto3, layout)),
            submsg_slot: submsg_index.slot_of(field.number()),
        })
        .collect()
}

/// Serializes `file` to the wire-format bytes embedded verbatim in the
/// generated `upbdefs` source so the def pool can be rebuilt at process
/// start without re-running this generator.
pub fn serialize_file_descriptor(file: &FileDescriptorProto) -> Vec<u8> {
    file.encode_to_vec()
}

/// The file's own dependency list as the generator emits it: each entry a
/// dependency's index into this file's own `proto_file` transitive set,
/// terminated with the sentinel `-1` the runtime treats as "no more
/// dependencies" rather than a valid index.
pub fn dependency_index_list(file: &FileDescriptorProto, all_files_in_order: &[String]) -> Vec<i32> {
    let mut out: Vec<i32> = file
        .dependency
        .iter()
        .map(|dep| {
            all_files_in_order
                .iter()
                .position(|f| f == dep)
                .map(|i| i as i32)
                .unwrap_or(-1)
        })
        .collect();
    out.push(-1);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_presence_encodes_to_zero() {
        assert_eq!(encode_presence(Presence::None), 0);
    }

    #[test]
    fn hasbit_presence_encodes_positive() {
        assert_eq!(encode_presence(Presence::HasBit(3)), 3);
    }

    #[test]
    fn oneof_presence_encodes_case_offset_negated_via_complement() {
        let encoded = encode_presence(Presence::OneofCase(8));
        assert_eq!(encoded, !8);
        assert!(encoded < 0);
        assert_ne!(encoded, encode_presence(Presence::HasBit(1)));
    }

    #[test]
    fn dependency_list_ends_with_sentinel() {
        let file = FileDescriptorProto {
            name: Some("a.proto".to_string()),
            dependency: vec!["b.proto".to_string()],
            ..Default::default()
        };
        let order = vec!["b.proto".to_string(), "a.proto".to_string()];
        let indices = dependency_index_list(&file, &order);
        assert_eq!(indices, vec![0, -1]);
    }

    #[test]
    fn unresolved_dependency_maps_to_negative_one() {
        let file = FileDescriptorProto {
            name: Some("a.proto".to_string()),
            dependency: vec!["missing.proto".to_string()],
            ..Default::default()
        };
        let indices = dependency_index_list(&file, &["a.proto".to_string()]);
        assert_eq!(indices, vec![-1, -1]);
    }

    #[test]
    fn serialized_descriptor_round_trips_through_prost() {
        let file = FileDescriptorProto {
            name: Some("a.proto".to_string()),
            ..Default::default()
        };
        let bytes = serialize_file_descriptor(&file);
        let decoded = FileDescriptorProto::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded.name(), "a.proto");
    }
}
