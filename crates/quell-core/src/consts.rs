/// Sample value treated as suspected "pepper" (black) impulse noise.
pub const SENTINEL_BLACK: u8 = 0;

/// Sample value treated as suspected "salt" (white) impulse noise.
pub const SENTINEL_WHITE: u8 = 255;

/// Number of frames in the temporal median window.
pub const TEMPORAL_WINDOW: usize = 5;

/// Frames on each side of the window center (window = 2 * radius + 1).
pub const TEMPORAL_RADIUS: usize = 2;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// SER timestamp resolution: 100 ns ticks per second.
pub const TICKS_PER_SECOND: f64 = 10_000_000.0;
