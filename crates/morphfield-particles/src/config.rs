//! Tunables of the particle field.

use morphfield_engine::paint::Color;

use crate::camera::Camera;
use crate::error::FieldError;
use crate::kernel::Noise;
use crate::shapes::ShapeId;
use crate::texels::MAX_SIZE;

/// Tint per shape; the particle pass blends the tints of A and B.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Palette {
    pub rocket: Color,
    pub earth: Color,
    pub land: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            rocket: Color::from_srgb_u8(255, 122, 69, 255),
            earth: Color::from_srgb_u8(77, 148, 255, 255),
            land: Color::from_srgb_u8(102, 221, 140, 255),
        }
    }
}

impl Palette {
    pub fn get(&self, shape: ShapeId) -> Color {
        match shape {
            ShapeId::Rocket => self.rocket,
            ShapeId::Earth => self.earth,
            ShapeId::Land => self.land,
        }
    }

    /// Premultiplied RGBA rows indexed by [`ShapeId::index`].
    pub fn to_uniform(&self) -> [[f32; 4]; 3] {
        ShapeId::ALL.map(|shape| self.get(shape).to_array())
    }
}

/// Particle field configuration.
///
/// ```ignore
/// let config = FieldConfig::default().with_size(256).with_rotation_speed(0.1);
/// config.validate()?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Side of every particle texture; the field has `size²` particles.
    pub size: u32,
    /// Whole-cloud rotation about +Y, radians per second of elapsed time.
    pub rotation_speed: f32,
    pub noise_amplitude: f32,
    pub noise_speed: f32,
    /// Sprite radius in physical pixels before jitter.
    pub point_size: f32,
    /// Uniform scale applied to sampled positions.
    pub model_scale: f32,
    pub camera: Camera,
    pub palette: Palette,
    /// Seed for sampling and the randomness table; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        let noise = Noise::default();
        Self {
            size: 128,
            rotation_speed: 0.05,
            noise_amplitude: noise.amplitude,
            noise_speed: noise.speed,
            point_size: 1.5,
            model_scale: 1.7,
            camera: Camera::default(),
            palette: Palette::default(),
            seed: None,
        }
    }
}

impl FieldConfig {
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_rotation_speed(mut self, radians_per_second: f32) -> Self {
        self.rotation_speed = radians_per_second;
        self
    }

    pub fn with_noise(mut self, amplitude: f32, speed: f32) -> Self {
        self.noise_amplitude = amplitude;
        self.noise_speed = speed;
        self
    }

    pub fn with_point_size(mut self, point_size: f32) -> Self {
        self.point_size = point_size;
        self
    }

    pub fn with_model_scale(mut self, scale: f32) -> Self {
        self.model_scale = scale;
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn noise(&self) -> Noise {
        Noise { amplitude: self.noise_amplitude, speed: self.noise_speed }
    }

    pub fn particle_count(&self) -> u64 {
        u64::from(self.size) * u64::from(self.size)
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        let fail = |msg: String| Err(FieldError::Config(msg));

        if self.size == 0 || self.size > MAX_SIZE {
            return fail(format!("size must be in 1..={MAX_SIZE}, got {}", self.size));
        }
        if !self.rotation_speed.is_finite() {
            return fail("rotation_speed must be finite".into());
        }
        if !(self.noise_amplitude.is_finite() && self.noise_amplitude >= 0.0) {
            return fail(format!("noise_amplitude must be >= 0, got {}", self.noise_amplitude));
        }
        if !self.noise_speed.is_finite() {
            return fail("noise_speed must be finite".into());
        }
        if !(self.point_size.is_finite() && self.point_size > 0.0) {
            return fail(format!("point_size must be > 0, got {}", self.point_size));
        }
        if !(self.model_scale.is_finite() && self.model_scale > 0.0) {
            return fail(format!("model_scale must be > 0, got {}", self.model_scale));
        }
        if !self.camera.is_valid() {
            return fail(format!("invalid camera {:?}", self.camera));
        }
        for shape in ShapeId::ALL {
            if !self.palette.get(shape).is_finite() {
                return fail(format!("non-finite tint for {shape}"));
            }
        }
        Ok(())
    }
}
