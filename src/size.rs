//! Dual-ABI sizes: every offset and size in this crate is carried as a pair,
//! one value for the 32-bit-pointer ABI and one for the 64-bit-pointer ABI,
//! because the two target layouts are computed independently rather than
//! derived from one another.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct DualSize {
    pub s32: u32,
    pub s64: u32,
}

impl DualSize {
    pub const ZERO: DualSize = DualSize { s32: 0, s64: 0 };

    pub const fn new(s32: u32, s64: u32) -> Self {
        DualSize { s32, s64 }
    }

    pub fn max(self, other: DualSize) -> DualSize {
        DualSize::new(self.s32.max(other.s32), self.s64.max(other.s64))
    }

    pub fn pick(self, abi: Abi) -> u32 {
        match abi {
            Abi::Bits32 => self.s32,
            Abi::Bits64 => self.s64,
        }
    }
}

/// Which of the two simultaneously-computed pointer ABIs a packing pass
/// operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Abi {
    Bits32,
    Bits64,
}

pub fn round_up(value: u32, align: u32) -> u32 {
    if align <= 1 {
        return value;
    }
    value.div_ceil(align) * align
}

/// The closed set of field shapes the layout engine and fast-decode table
/// builder reason about. Map and repeated fields share a shape (a pointer to
/// a runtime array header) so they are not distinguished here — the
/// distinction only matters to the table builder and metadata emitter, which
/// track it separately via each message's map-entry set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Fixed1,
    Fixed4,
    Fixed8,
    StringLike,
    Submessage,
    Repeated,
}

pub fn size_of_class(class: TypeClass) -> DualSize {
    match class {
        TypeClass::Fixed1 => DualSize::new(1, 1),
        TypeClass::Fixed4 => DualSize::new(4, 4),
        TypeClass::Fixed8 => DualSize::new(8, 8),
        TypeClass::StringLike => DualSize::new(8, 16),
        TypeClass::Submessage | TypeClass::Repeated => DualSize::new(4, 8),
    }
}

pub fn align_of_class(class: TypeClass) -> DualSize {
    match class {
        TypeClass::StringLike => DualSize::new(4, 8),
        other => size_of_class(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_up_rounds_to_multiple() {
        assert_eq!(round_up(0, 8), 0);
        assert_eq!(round_up(1, 8), 8);
        assert_eq!(round_up(8, 8), 8);
        assert_eq!(round_up(9, 8), 16);
    }

    #[test]
    fn string_like_alignment_differs_from_size() {
        let size = size_of_class(TypeClass::StringLike);
        let align = align_of_class(TypeClass::StringLike);
        assert_eq!(size, DualSize::new(8, 16));
        assert_eq!(align, DualSize::new(4, 8));
    }
}
