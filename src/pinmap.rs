// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Logical to physical pin mapping.
//!
//! The host numbers the usable lines 1..=12. Two lines of port D (bits 2 and 4) carry the host
//! link and two lines of port B (bits 6 and 7) drive the clock oscillator, so those four never
//! appear in the logical numbering:
//!
//! | Logical | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 | 10 | 11 | 12 |
//! | ------- | - | - | - | - | - | - | - | - | - | -- | -- | -- |
//! | Physical | D0 | D1 | D3 | D5 | D6 | D7 | B0 | B1 | B2 | B3 | B4 | B5 |

use crate::config::GPIO_COUNT;

/// Host-visible pin number, valid in 1..=12.
pub type LogicalPin = u8;

/// GPIO register group.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub enum RegisterGroup {
    D,
    B,
}

/// Concrete hardware line: register group and bit index (0..=7).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub struct PhysicalPin {
    pub group: RegisterGroup,
    pub bit: u8,
}

impl PhysicalPin {
    const fn new(group: RegisterGroup, bit: u8) -> Self {
        Self { group, bit }
    }

    /// Single-bit mask for this line within its register group.
    #[inline]
    pub fn mask(&self) -> u8 {
        1 << self.bit
    }
}

/// Lines that are wired to the host link and the oscillator.
pub const RESERVED: [PhysicalPin; 4] = [
    PhysicalPin::new(RegisterGroup::D, 2),
    PhysicalPin::new(RegisterGroup::D, 4),
    PhysicalPin::new(RegisterGroup::B, 6),
    PhysicalPin::new(RegisterGroup::B, 7),
];

/// Indexed by `logical - 1`.
const PIN_TABLE: [PhysicalPin; GPIO_COUNT as usize] = [
    PhysicalPin::new(RegisterGroup::D, 0),
    PhysicalPin::new(RegisterGroup::D, 1),
    PhysicalPin::new(RegisterGroup::D, 3),
    PhysicalPin::new(RegisterGroup::D, 5),
    PhysicalPin::new(RegisterGroup::D, 6),
    PhysicalPin::new(RegisterGroup::D, 7),
    PhysicalPin::new(RegisterGroup::B, 0),
    PhysicalPin::new(RegisterGroup::B, 1),
    PhysicalPin::new(RegisterGroup::B, 2),
    PhysicalPin::new(RegisterGroup::B, 3),
    PhysicalPin::new(RegisterGroup::B, 4),
    PhysicalPin::new(RegisterGroup::B, 5),
];

/// Translate a logical pin into its hardware line. Returns `None` outside 1..=12.
#[inline]
pub fn map(logical: LogicalPin) -> Option<PhysicalPin> {
    match logical {
        1..=GPIO_COUNT => Some(PIN_TABLE[(logical - 1) as usize]),
        _ => None,
    }
}

/// Every host-visible line, in logical order.
pub fn lines() -> impl Iterator<Item = PhysicalPin> {
    PIN_TABLE.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_all_entries() {
        use RegisterGroup::{B, D};

        let expected = [
            (1, D, 0),
            (2, D, 1),
            (3, D, 3),
            (4, D, 5),
            (5, D, 6),
            (6, D, 7),
            (7, B, 0),
            (8, B, 1),
            (9, B, 2),
            (10, B, 3),
            (11, B, 4),
            (12, B, 5),
        ];

        for (logical, group, bit) in expected {
            assert_eq!(map(logical), Some(PhysicalPin { group, bit }), "pin {}", logical);
        }
    }

    #[test]
    fn test_map_out_of_range() {
        assert_eq!(map(0), None);
        assert_eq!(map(13), None);
        assert_eq!(map(0xFF), None);
    }

    #[test]
    fn test_map_is_deterministic() {
        for logical in 0..=u8::MAX {
            assert_eq!(map(logical), map(logical));
        }
    }

    #[test]
    fn test_map_injective_and_skips_reserved() {
        let mapped: Vec<PhysicalPin> = (1..=GPIO_COUNT).filter_map(map).collect();
        assert_eq!(mapped.len(), GPIO_COUNT as usize);

        for (i, a) in mapped.iter().enumerate() {
            assert!(a.bit < 8);
            assert!(!RESERVED.contains(a), "{:?} is reserved", a);
            for b in &mapped[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_lines_cover_jtag_pins() {
        let all: Vec<PhysicalPin> = lines().collect();
        assert_eq!(all.len(), GPIO_COUNT as usize);
        assert_eq!(all[0], PhysicalPin::new(RegisterGroup::D, 0));
        assert!(all.contains(&PhysicalPin::new(RegisterGroup::B, 3)));
        assert!(all.contains(&PhysicalPin::new(RegisterGroup::B, 4)));
        for (i, pin) in all.iter().enumerate() {
            assert_eq!(map(i as u8 + 1), Some(*pin));
        }
    }

    #[test]
    fn test_mask() {
        assert_eq!(map(3).map(|p| p.mask()), Some(0b0000_1000));
        assert_eq!(map(12).map(|p| p.mask()), Some(0b0010_0000));
    }
}
