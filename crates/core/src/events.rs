//! Synthetic window-server event records.
//!
//! Focus transfers inside a single application are driven by injecting
//! fixed-size binary event records into the window server's event stream
//! instead of performing a full application switch. The byte layout is an
//! interoperability contract with the window server and must be reproduced
//! bit for bit: a record is 0xf8 bytes, carries its own length tag, an
//! opcode, and the target window id in little-endian order.
//!
//! [`EventRecord::encode`] is the only place the layout is materialized;
//! nothing else in the tree touches raw offsets.

use crate::model::WindowId;

/// Total size of a synthetic event record in bytes.
pub const RECORD_LEN: usize = 0xf8;

/// Record length tag stored inside the record.
const OFF_LENGTH: usize = 0x04;
/// Event opcode.
const OFF_OPCODE: usize = 0x08;
/// Handshake state byte, set only on the post-focus pair.
const OFF_STATE: usize = 0x3a;
/// Target window id, little-endian u32.
const OFF_WINDOW_ID: usize = 0x3c;
/// Focus role byte, set only on the focus-class records.
const OFF_FOCUS_ROLE: usize = 0x8a;

const OPCODE_FOCUS: u8 = 0x0d;
const OPCODE_POST_DOWN: u8 = 0x01;
const OPCODE_POST_UP: u8 = 0x02;

const ROLE_GAINED: u8 = 0x01;
const ROLE_LOST: u8 = 0x02;
const ROLE_PRE: u8 = 0x09;

const STATE_POST: u8 = 0x10;

/// The synthetic record kinds the focus engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Announces an upcoming focus change to the owner.
    PreFocus,
    /// The previously focused window is giving up focus.
    LostFocus,
    /// The target window is taking focus.
    GainedFocus,
    /// First half of the post-focus handshake pair.
    PostFocusDown,
    /// Second half of the post-focus handshake pair.
    PostFocusUp,
}

/// A synthetic event addressed to a window's owning process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub kind: RecordKind,
    pub window_id: WindowId,
}

impl EventRecord {
    pub fn new(kind: RecordKind, window_id: WindowId) -> Self {
        Self { kind, window_id }
    }

    /// Serialize to the exact wire layout the window server expects.
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut bytes = [0u8; RECORD_LEN];
        bytes[OFF_LENGTH] = RECORD_LEN as u8;

        match self.kind {
            RecordKind::PreFocus => {
                bytes[OFF_OPCODE] = OPCODE_FOCUS;
                bytes[OFF_FOCUS_ROLE] = ROLE_PRE;
            }
            RecordKind::LostFocus => {
                bytes[OFF_OPCODE] = OPCODE_FOCUS;
                bytes[OFF_FOCUS_ROLE] = ROLE_LOST;
            }
            RecordKind::GainedFocus => {
                bytes[OFF_OPCODE] = OPCODE_FOCUS;
                bytes[OFF_FOCUS_ROLE] = ROLE_GAINED;
            }
            RecordKind::PostFocusDown => {
                bytes[OFF_OPCODE] = OPCODE_POST_DOWN;
                bytes[OFF_STATE] = STATE_POST;
            }
            RecordKind::PostFocusUp => {
                bytes[OFF_OPCODE] = OPCODE_POST_UP;
                bytes[OFF_STATE] = STATE_POST;
            }
        }

        bytes[OFF_WINDOW_ID..OFF_WINDOW_ID + 4]
            .copy_from_slice(&self.window_id.0.to_le_bytes());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every byte not at a named offset must stay zero.
    fn assert_zero_elsewhere(bytes: &[u8; RECORD_LEN]) {
        for (offset, byte) in bytes.iter().enumerate() {
            if matches!(
                offset,
                OFF_LENGTH | OFF_OPCODE | OFF_STATE | OFF_FOCUS_ROLE
            ) || (OFF_WINDOW_ID..OFF_WINDOW_ID + 4).contains(&offset)
            {
                continue;
            }
            assert_eq!(*byte, 0, "unexpected nonzero byte at offset {:#x}", offset);
        }
    }

    #[test]
    fn test_pre_focus_layout() {
        let bytes = EventRecord::new(RecordKind::PreFocus, WindowId(0x1234)).encode();
        assert_eq!(bytes[0x04], 0xf8);
        assert_eq!(bytes[0x08], 0x0d);
        assert_eq!(bytes[0x8a], 0x09);
        assert_eq!(bytes[0x3a], 0x00);
        assert_eq!(&bytes[0x3c..0x40], &[0x34, 0x12, 0x00, 0x00]);
        assert_zero_elsewhere(&bytes);
    }

    #[test]
    fn test_lost_and_gained_focus_layout() {
        let lost = EventRecord::new(RecordKind::LostFocus, WindowId(7)).encode();
        assert_eq!(lost[0x08], 0x0d);
        assert_eq!(lost[0x8a], 0x02);

        let gained = EventRecord::new(RecordKind::GainedFocus, WindowId(7)).encode();
        assert_eq!(gained[0x08], 0x0d);
        assert_eq!(gained[0x8a], 0x01);

        assert_eq!(&gained[0x3c..0x40], &[0x07, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_post_focus_pair_layout() {
        let id = WindowId(0xdead_beef);

        let down = EventRecord::new(RecordKind::PostFocusDown, id).encode();
        assert_eq!(down[0x04], 0xf8);
        assert_eq!(down[0x08], 0x01);
        assert_eq!(down[0x3a], 0x10);
        assert_eq!(down[0x8a], 0x00);
        assert_eq!(&down[0x3c..0x40], &[0xef, 0xbe, 0xad, 0xde]);
        assert_zero_elsewhere(&down);

        let up = EventRecord::new(RecordKind::PostFocusUp, id).encode();
        assert_eq!(up[0x08], 0x02);
        assert_eq!(up[0x3a], 0x10);
    }
}
