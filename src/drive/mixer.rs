// Control law for the two-wheel base
// Converts a two-axis tilt reading into independent left/right motor speeds.

use crate::messages::MotorCommand;

/// Full-scale motor speed. One below the i8 minimum's magnitude so
/// every command can be negated when the frame encoder takes |value|.
pub const MAX_SPEED: f64 = 127.0;

/// Tilt (in accelerometer units) that maps to full throttle.
/// Half a g forward is plenty on a handheld device.
const TILT_FULL_SCALE: f64 = 0.5;

/// Convert a tilt sample to motor speeds
///
/// # Arguments
/// * `x` - pitch axis, positive = throttle forward
/// * `y` - roll axis, positive = steer left
///
/// Total over all finite inputs: the mix is clamped before narrowing,
/// so arbitrarily large tilt never overflows the 8-bit command.
pub fn mix(x: f64, y: f64) -> MotorCommand {
    let throttle = x / TILT_FULL_SCALE;

    let left = clamp_speed((throttle + y) * MAX_SPEED);
    let right = clamp_speed((throttle - y) * MAX_SPEED);

    MotorCommand::new(left, right)
}

/// Narrow a raw mix value to a signed 8-bit speed
fn clamp_speed(raw: f64) -> i8 {
    // Clamp to [-127, 127] first; narrowing an out-of-range float
    // directly would silently saturate to -128 on the low side.
    raw.round().clamp(-MAX_SPEED, MAX_SPEED) as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_device_is_stopped() {
        let cmd = mix(0.0, 0.0);
        assert_eq!(cmd, MotorCommand::zero());
    }

    #[test]
    fn test_full_forward_tilt() {
        // Half a g of forward tilt is full throttle, both wheels equal
        let cmd = mix(0.5, 0.0);
        assert_eq!(cmd.left, 127);
        assert_eq!(cmd.right, 127);
    }

    #[test]
    fn test_full_reverse_tilt() {
        let cmd = mix(-0.5, 0.0);
        assert_eq!(cmd.left, -127);
        assert_eq!(cmd.right, -127);
    }

    #[test]
    fn test_roll_steers() {
        // Rolling left while driving forward should slow the right wheel
        // relative to the left
        let cmd = mix(0.2, 0.3);
        assert!(
            cmd.left > cmd.right,
            "left={} should exceed right={} when rolling left",
            cmd.left,
            cmd.right
        );

        let cmd = mix(0.2, -0.3);
        assert!(
            cmd.right > cmd.left,
            "right={} should exceed left={} when rolling right",
            cmd.right,
            cmd.left
        );
    }

    #[test]
    fn test_pure_roll_spins_in_place() {
        let cmd = mix(0.0, 0.4);
        assert!(cmd.left > 0);
        assert!(cmd.right < 0);
        assert_eq!(cmd.left, -cmd.right);
    }

    #[test]
    fn test_extreme_tilt_saturates() {
        // The accelerometer does not promise [-1, 1]; sweep well past it
        // and check the mix never leaves the command range
        for i in -20..=20 {
            for j in -20..=20 {
                let x = f64::from(i) * 0.5;
                let y = f64::from(j) * 0.5;
                let cmd = mix(x, y);
                assert!(
                    (-127..=127).contains(&i32::from(cmd.left)),
                    "left={} out of range for x={}, y={}",
                    cmd.left,
                    x,
                    y
                );
                assert!(
                    (-127..=127).contains(&i32::from(cmd.right)),
                    "right={} out of range for x={}, y={}",
                    cmd.right,
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_never_produces_int_min() {
        let cmd = mix(-100.0, -100.0);
        assert_eq!(cmd.left, -127);
        assert_eq!(cmd.right, -127);
    }
}
