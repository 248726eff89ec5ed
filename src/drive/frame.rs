// Wire frame for the drive unit
//
// One motor command pair packs into exactly five bytes:
// [tag, left opcode, left magnitude, right opcode, right magnitude]
// The channel is unidirectional, so there is no decoder.

use crate::messages::MotorCommand;

/// Frame length on the wire
pub const FRAME_LEN: usize = 5;

/// Fixed frame-type tag, always the first byte
pub const FRAME_TAG: u8 = 0x01;

// Opcodes select motor and direction
const LEFT_FORWARD: u8 = 1;
const LEFT_REVERSE: u8 = 0;
const RIGHT_FORWARD: u8 = 4;
const RIGHT_REVERSE: u8 = 5;

/// Encode a motor command pair into its 5-byte frame
///
/// Zero speed encodes as the reverse opcode with magnitude 0, so the
/// stop frame is always the same byte string.
pub fn encode(cmd: MotorCommand) -> [u8; FRAME_LEN] {
    let (lop, left) = if cmd.left > 0 {
        (LEFT_FORWARD, cmd.left as u8)
    } else {
        (LEFT_REVERSE, cmd.left.unsigned_abs())
    };

    let (rop, right) = if cmd.right > 0 {
        (RIGHT_FORWARD, cmd.right as u8)
    } else {
        (RIGHT_REVERSE, cmd.right.unsigned_abs())
    };

    [FRAME_TAG, lop, left, rop, right]
}
