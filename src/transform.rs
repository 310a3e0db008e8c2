use nalgebra_glm as glm;

// Scale factors below this are treated as degenerate when decomposing
const MIN_SCALE: f32 = 1e-6_f32;

/// Scale, rotation and translation of a node relative to its parent.
/// GLM style matrices are column major, so composing these in matrix form
/// is `T * R * S` and scale is applied to a vector first.
#[derive(Clone, Copy, Debug)]
pub struct Srt {
    pub scale: glm::Vec3,
    pub rotation: glm::Quat,
    pub translation: glm::Vec3,
}

impl Default for Srt {
    fn default() -> Self {
        Self {
            scale: glm::vec3(1.0, 1.0, 1.0),
            // Identity quaternion, w last in glm ordering
            rotation: glm::quat(0.0, 0.0, 0.0, 1.0),
            translation: glm::Vec3::zeros(),
        }
    }
}

impl Srt {
    /// Composes the parts into a single transform matrix
    #[must_use]
    pub fn to_mat4(&self) -> glm::Mat4 {
        let m = glm::translate(&glm::Mat4::identity(), &self.translation);
        let m = m * glm::quat_to_mat4(&self.rotation);
        glm::scale(&m, &self.scale)
    }
}

/// Conversion from a transform matrix. The matrix is assumed to be a
/// composition of scale, rotation and translation. Shear and projection
/// are not recovered and negative scale will decompose to a rotation.
impl From<&glm::Mat4> for Srt {
    fn from(m: &glm::Mat4) -> Self {
        let x = glm::vec3(m[(0, 0)], m[(1, 0)], m[(2, 0)]);
        let y = glm::vec3(m[(0, 1)], m[(1, 1)], m[(2, 1)]);
        let z = glm::vec3(m[(0, 2)], m[(1, 2)], m[(2, 2)]);
        let scale =
            glm::vec3(glm::length(&x), glm::length(&y), glm::length(&z));
        let rot = glm::mat3(
            x.x / scale.x.max(MIN_SCALE),
            y.x / scale.y.max(MIN_SCALE),
            z.x / scale.z.max(MIN_SCALE),
            x.y / scale.x.max(MIN_SCALE),
            y.y / scale.y.max(MIN_SCALE),
            z.y / scale.z.max(MIN_SCALE),
            x.z / scale.x.max(MIN_SCALE),
            y.z / scale.y.max(MIN_SCALE),
            z.z / scale.z.max(MIN_SCALE),
        );
        Self {
            scale,
            rotation: glm::quat_normalize(&glm::mat3_to_quat(&rot)),
            translation: glm::vec3(m[(0, 3)], m[(1, 3)], m[(2, 3)]),
        }
    }
}

impl From<Srt> for glm::Mat4 {
    fn from(srt: Srt) -> Self {
        srt.to_mat4()
    }
}

/// Conversion to GLSL shader ready mat4
impl From<Srt> for [[f32; 4]; 4] {
    fn from(srt: Srt) -> [[f32; 4]; 4] {
        srt.to_mat4().into()
    }
}

/// Interpolates between two transforms. Scale and translation use linear
/// interpolation while rotation uses spherical linear interpolation. The
/// amount is expected to already be clamped to the 0 to 1 range.
#[must_use]
pub fn blend(s1: &Srt, s2: &Srt, amount: f32) -> Srt {
    Srt {
        scale: glm::lerp(&s1.scale, &s2.scale, amount),
        rotation: glm::quat_slerp(&s1.rotation, &s2.rotation, amount),
        translation: glm::lerp(&s1.translation, &s2.translation, amount),
    }
}

/// Reinterprets matrices as flat float arrays, for example to write into
/// a uniform or storage buffer without a copy
#[must_use]
pub fn matrices_to_arrays(matrices: &[glm::Mat4]) -> &[[f32; 16]] {
    bytemuck::cast_slice(matrices)
}
