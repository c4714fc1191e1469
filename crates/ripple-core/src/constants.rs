// Stamp pool and compositing tuning constants shared by every front-end.

// Pool
pub const POOL_CAPACITY: usize = 100; // concurrent ripples never exceed this
pub const SPAWN_THRESHOLD: f32 = 0.1; // per-axis movement (scene units) needed to spawn

// Spawn state
pub const SPAWN_SCALE: f32 = 1.75;
pub const SPAWN_OPACITY: f32 = 1.0;

// Per-frame decay
pub const ROTATION_STEP: f32 = 0.025; // radians per frame
pub const OPACITY_DECAY: f32 = 0.95; // multiplied into opacity each frame
pub const SCALE_EASE: f32 = 0.98; // scale' = SCALE_EASE * scale + SCALE_GAIN * REST_FACTOR
pub const SCALE_GAIN: f32 = 0.155;
pub const REST_FACTOR: f32 = 1.0;
pub const VISIBILITY_EPSILON: f32 = 0.002; // below this opacity a stamp goes dormant

// Geometry
pub const STAMP_SIZE: f32 = 60.0; // brush quad edge in scene units before scaling
pub const CAMERA_NEAR: f32 = -1000.0;
pub const CAMERA_FAR: f32 = 1000.0;

// Compositing
pub const DISPLACEMENT_STRENGTH: f32 = 0.075; // uv offset at full displacement
pub const DISPLACEMENT_CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
pub const BACKGROUND_CLEAR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

// Procedural brush
pub const BRUSH_TEXTURE_SIZE: u32 = 128;
