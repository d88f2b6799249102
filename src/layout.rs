//! The layout engine: decides has-bit indices, oneof case-slot offsets,
//! per-field byte offsets, and total message size, under both pointer ABIs
//! at once.
//!
//! The two ABI streams are packed completely independently (a field's
//! alignment class can differ between them — a `string` field is 4-byte
//! aligned under the 32-bit ABI but 8-byte aligned under the 64-bit one) and
//! only zipped together into `DualSize` values at the end.

use std::collections::HashMap;

use crate::descriptor::{MessageView, is_in_real_oneof, requires_has_bit};
use crate::pb::FieldDescriptorProto;
use crate::size::{Abi, DualSize, TypeClass, align_of_class, round_up, size_of_class};

#[derive(Debug, Clone)]
pub struct Layout {
    has_bit_index: HashMap<i32, u32>,
    field_offset: HashMap<i32, DualSize>,
    oneof_case_offset: HashMap<i32, DualSize>,
    message_size: DualSize,
    data_start: DualSize,
}

impl Layout {
    /// Precondition: `field_number` names a field that `requires_has_bit`.
    pub fn has_bit_index(&self, field_number: i32) -> Option<u32> {
        self.has_bit_index.get(&field_number).copied()
    }

    pub fn field_offset(&self, field_number: i32) -> DualSize {
        self.field_offset
            .get(&field_number)
            .copied()
            .unwrap_or(DualSize::ZERO)
    }

    pub fn oneof_case_offset(&self, oneof_index: i32) -> DualSize {
        self.oneof_case_offset
            .get(&oneof_index)
            .copied()
            .unwrap_or(DualSize::ZERO)
    }

    pub fn message_size(&self) -> DualSize {
        self.message_size
    }

    pub fn data_start(&self) -> DualSize {
        self.data_start
    }
}

fn field_type_class(field: &FieldDescriptorProto) -> TypeClass {
    use crate::pb::Type;

    if field.label() == crate::pb::Label::Repeated {
        return TypeClass::Repeated;
    }
    match field.r#type() {
        Type::Message | Type::Group => TypeClass::Submessage,
        Type::Bool => TypeClass::Fixed1,
        Type::Int32
        | Type::Uint32
        | Type::Sint32
        | Type::Enum
        | Type::Fixed32
        | Type::Sfixed32
        | Type::Float => TypeClass::Fixed4,
        Type::Int64 | Type::Uint64 | Type::Sint64 | Type::Fixed64 | Type::Sfixed64 | Type::Double => {
            TypeClass::Fixed8
        }
        Type::String | Type::Bytes => TypeClass::StringLike,
    }
}

enum ItemKind {
    Field(i32),
    OneofSlot(i32),
    OneofCaseTag(i32),
}

struct Item {
    kind: ItemKind,
    size: DualSize,
    align: DualSize,
}

pub fn compute_layout(message: &MessageView, is_proto3: bool) -> Layout {
    let mut has_bit_index = HashMap::new();
    let mut next = 1u32;
    for field in message.fields() {
        if requires_has_bit(field, is_proto3) {
            has_bit_index.insert(field.number(), next);
            next += 1;
        }
    }
    let hasbit_bytes = if next == 1 {
        0
    } else {
        let highest = next - 1;
        (highest as u64 + 1).div_ceil(8) as u32
    };
    let data_start_scalar = round_up(hasbit_bytes, 8);
    let data_start = DualSize::new(data_start_scalar, data_start_scalar);

    let mut items = Vec::new();
    let mut seen_oneofs = std::collections::HashSet::new();
    for field in message.fields() {
        if is_in_real_oneof(field) {
            let oneof_index = field.oneof_index();
            if seen_oneofs.insert(oneof_index) {
                let members = message.oneof_members(oneof_index);
                let mut slot_size = DualSize::ZERO;
                let mut slot_align = DualSize::new(1, 1);
                for member in &members {
                    let tc = field_type_class(member);
                    slot_size = slot_size.max(size_of_class(tc));
                    slot_align = slot_align.max(align_of_class(tc));
                }
                items.push(Item {
                    kind: ItemKind::OneofSlot(oneof_index),
                    size: slot_size,
                    align: slot_align,
                });
                items.push(Item {
                    kind: ItemKind::OneofCaseTag(oneof_index),
                    size: DualSize::new(4, 4),
                    align: DualSize::new(4, 4),
                });
            }
        } else {
            let tc = field_type_class(field);
            items.push(Item {
                kind: ItemKind::Field(field.number()),
                size: size_of_class(tc),
                align: align_of_class(tc),
            });
        }
    }

    let (offsets32, watermark32) = pack_single_abi(&items, data_start_scalar, Abi::Bits32);
    let (offsets64, watermark64) = pack_single_abi(&items, data_start_scalar, Abi::Bits64);

    let mut field_offset = HashMap::new();
    let mut oneof_case_offset = HashMap::new();
    let mut oneof_slot_offset: HashMap<i32, DualSize> = HashMap::new();

    for (i, item) in items.iter().enumerate() {
        let offset = DualSize::new(offsets32[i], offsets64[i]);
        match item.kind {
            ItemKind::Field(number) => {
                field_offset.insert(number, offset);
            }
            ItemKind::OneofSlot(oneof_index) => {
                oneof_slot_offset.insert(oneof_index, offset);
            }
            ItemKind::OneofCaseTag(oneof_index) => {
                oneof_case_offset.insert(oneof_index, offset);
            }
        }
    }

    for field in message.fields() {
        if is_in_real_oneof(field) {
            let offset = oneof_slot_offset[&field.oneof_index()];
            field_offset.insert(field.number(), offset);
        }
    }

    let message_size = DualSize::new(round_up(watermark32, 8), round_up(watermark64, 8));

    Layout {
        has_bit_index,
        field_offset,
        oneof_case_offset,
        message_size,
        data_start,
    }
}

/// Packs `items` for a single ABI, largest alignment class first (8, 4, 2,
/// 1), preserving each class's relative declaration order. Returns the
/// per-item offsets (parallel to `items`) and the final watermark before the
/// message-size rounding.
fn pack_single_abi(items: &[Item], data_start: u32, abi: Abi) -> (Vec<u32>, u32) {
    let mut offsets = vec![0u32; items.len()];
    let mut watermark = data_start;
    for &class in &[8u32, 4, 2, 1] {
        for (i, item) in items.iter().enumerate() {
            if item.align.pick(abi) == class {
                watermark = round_up(watermark, class);
                offsets[i] = watermark;
                watermark += item.size.pick(abi);
            }
        }
    }
    (offsets, watermark)
}
