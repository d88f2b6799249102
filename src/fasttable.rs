//! Builds each message's fast-decode dispatch table: a power-of-two array of
//! 64-bit entries, each pairing a decode handler function pointer with a
//! packed "data word" the handler uses to find the field without re-parsing
//! the tag.
//!
//! Table size and entry placement follow the field number modulo the table
//! size; a message whose fields don't fit densely into a small table simply
//! falls back to the slow, fully general decoder for the colliding fields
//! (this table is a performance fast path, never the only way to decode a
//! message).

use std::collections::HashSet;

use crate::descriptor::{is_in_real_oneof, target_full_name, MessageView};
use crate::layout::Layout;
use crate::pb::{FieldDescriptorProto, Label, Type};
use crate::submsg::SubmsgIndex;

const MAX_TABLE_SIZE: u32 = 32;

#[derive(Debug, Clone)]
pub struct FastTableEntry {
    pub slot: u32,
    pub field_number: i32,
    pub handler: String,
    pub data_word: u64,
}

#[derive(Debug, Clone)]
pub struct FastTable {
    pub size: u32,
    pub entries: Vec<FastTableEntry>,
}

/// A field can take a fast-table slot only if it isn't a oneof member (those
/// need the case-tag comparison the fast path doesn't do), isn't a repeated
/// non-message field (repeated scalars always fall back to the generic
/// parser), isn't a map field (map entries need key/value handling the fast
/// path doesn't do either, even though a map field is wire-encoded as a
/// repeated message), and has a type this generator has a fast-decode code
/// for.
fn is_fast_eligible(field: &FieldDescriptorProto, map_entry_targets: &HashSet<String>) -> bool {
    if field.number() < 1 || field.number() > 2047 {
        return false;
    }
    if is_in_real_oneof(field) {
        return false;
    }
    if field.label() == Label::Repeated && !matches!(field.r#type(), Type::Message | Type::Group) {
        return false;
    }
    if field.r#type() == Type::Message && map_entry_targets.contains(target_full_name(field)) {
        return false;
    }
    type_code(field).is_some()
}

/// The table grows by doubling while it's still smaller than the largest
/// field number below 32 that will actually occupy a slot; fields numbered
/// 32 or higher are still placed (by `number mod size`) but never force the
/// table to grow past its cap.
fn table_size_for(eligible_numbers: impl Iterator<Item = i32>) -> u32 {
    let max_small = eligible_numbers.filter(|&n| n < 32).max().unwrap_or(0) as u32;
    let mut size = 1u32;
    while size < MAX_TABLE_SIZE && max_small >= size {
        size *= 2;
    }
    size
}

fn cardinality_letter(field: &FieldDescriptorProto) -> &'static str {
    if field.label() == Label::Repeated {
        "r"
    } else {
        "s"
    }
}

/// The fast-decode type code and protobuf wire type for a field's encoding,
/// or `None` if this generator has no fast-decode handler for it (fixed-width
/// numeric types and groups always fall back to the generic decoder).
fn type_code(field: &FieldDescriptorProto) -> Option<(&'static str, u32)> {
    const WIRE_VARINT: u32 = 0;
    const WIRE_LENGTH_DELIMITED: u32 = 2;

    match field.r#type() {
        Type::Bool => Some(("b1", WIRE_VARINT)),
        Type::Int32 | Type::Uint32 | Type::Enum => Some(("v4", WIRE_VARINT)),
        Type::Sint32 => Some(("z4", WIRE_VARINT)),
        Type::Int64 | Type::Uint64 => Some(("v8", WIRE_VARINT)),
        Type::Sint64 => Some(("z8", WIRE_VARINT)),
        Type::String | Type::Bytes => Some(("s", WIRE_LENGTH_DELIMITED)),
        Type::Message => Some(("m", WIRE_LENGTH_DELIMITED)),
        Type::Fixed32 | Type::Sfixed32 | Type::Float | Type::Fixed64 | Type::Sfixed64 | Type::Double | Type::Group => None,
    }
}

fn tag_byte_width(field_number: i32) -> u32 {
    if field_number < 16 { 1 } else { 2 }
}

/// The expected wire tag this field's fast-decode handler compares the
/// incoming byte(s) against: `(field_number << 3) | wire_type`, with the
/// high bit of the second tag byte (`0x100`) set once the field number no
/// longer fits in a single-byte varint tag.
fn expected_tag(field: &FieldDescriptorProto, wire_type: u32) -> u16 {
    let n = field.number() as u32;
    let mut tag = (n << 3) | wire_type;
    if n > 15 {
        tag |= 0x100;
    }
    tag as u16
}

/// The fixed family of `_max{N}b` handler variants a same-file submessage
/// can fit into. A target whose 64-bit size plus 8 bytes of arena-header
/// slop exceeds every ceiling here falls back to `_maxmaxb`, which re-checks
/// the size at decode time instead of baking a compile-time bound into the
/// handler name.
const SUBMSG_SIZE_CEILINGS: [u32; 4] = [64, 128, 192, 256];

/// Picks the smallest `_max{N}b` ceiling that fits `submsg_size` plus the
/// arena-header slop, or `None` if every ceiling is too small (the field
/// falls back to `_maxmaxb`).
fn submsg_size_ceiling(submsg_size: u32) -> Option<u32> {
    SUBMSG_SIZE_CEILINGS.iter().copied().find(|&ceiling| submsg_size + 8 <= ceiling)
}

/// `upb_p{cardinality}{type}_{1|2}bt[_max{N}b|_maxmaxb]`, the name of the
/// generated fast-decode handler this field's table entry dispatches to.
fn handler_name(field: &FieldDescriptorProto, code: &str, submsg_size: Option<u32>) -> String {
    let mut name = format!(
        "upb_p{}{}_{}bt",
        cardinality_letter(field),
        code,
        tag_byte_width(field.number()),
    );
    if matches!(field.r#type(), Type::Message | Type::Group) {
        match submsg_size.and_then(submsg_size_ceiling) {
            Some(ceiling) => name.push_str(&format!("_max{ceiling}b")),
            None => name.push_str("_maxmaxb"),
        }
    }
    name
}

/// Packs a message field's data word: tag in bits 0-15, same-file submsg
/// index in bits 16-31, has-bit slot (0 if the field carries no has-bit) in
/// bits 32-47, field offset in bits 48-63.
fn message_data_word(tag: u16, submsg_slot: u16, hasbit_slot: u16, offset: u16) -> u64 {
    (tag as u64) | ((submsg_slot as u64) << 16) | ((hasbit_slot as u64) << 32) | ((offset as u64) << 48)
}

/// Packs a non-message field's data word: tag in bits 0-15, a single bit set
/// at `hasbit_slot` (0 if the field carries no has-bit, which contributes
/// nothing once masked) standing in for the aux/has-bit-slot pair that
/// message fields use separately, field offset in bits 48-63.
fn scalar_data_word(tag: u16, hasbit_slot: u16, offset: u16) -> u64 {
    let hasbit_mask = (1u64 << hasbit_slot) & !0xFFFFu64;
    (tag as u64) | hasbit_mask | ((offset as u64) << 48)
}

pub fn build_fast_table(
    message: &MessageView,
    _is_proto3: bool,
    layout: &Layout,
    submsg_index: &SubmsgIndex,
    same_file_sizes: &std::collections::BTreeMap<String, u32>,
    map_entry_targets: &HashSet<String>,
) -> FastTable {
    let eligible: Vec<&FieldDescriptorProto> =
        message.fields().iter().filter(|f| is_fast_eligible(f, map_entry_targets)).collect();
    let size = table_size_for(eligible.iter().map(|f| f.number()));

    let mut slot_owner: Vec<Option<i32>> = vec![None; size as usize];
    let mut entries = Vec::new();

    for field in &eligible {
        let slot = (field.number() as u32 % size) as usize;
        if slot_owner[slot].is_some() {
            continue;
        }
        slot_owner[slot] = Some(field.number());

        let (code, wire_type) = type_code(field).expect("is_fast_eligible checked type_code");
        let tag = expected_tag(field, wire_type);
        let offset = layout.field_offset(field.number()).pick(crate::size::Abi::Bits64) as u16;
        let hasbit_slot = layout.has_bit_index(field.number()).map(|idx| (idx + 16) as u16).unwrap_or(0);

        let is_message = matches!(field.r#type(), Type::Message | Type::Group);
        let submsg_size = if is_message {
            same_file_sizes.get(target_full_name(field)).copied()
        } else {
            None
        };

        let data_word = if is_message {
            let submsg_slot = submsg_index.slot_of(field.number()).unwrap_or(0) as u16;
            message_data_word(tag, submsg_slot, hasbit_slot, offset)
        } else {
            scalar_data_word(tag, hasbit_slot, offset)
        };

        entries.push(FastTableEntry {
            slot: slot as u32,
            field_number: field.number(),
            handler: handler_name(field, code, submsg_size),
            data_word,
        });
    }

    FastTable { size, entries }
}
