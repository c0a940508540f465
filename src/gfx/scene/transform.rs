//! # Transform Decoding
//!
//! Converts the declarative `transformation` block of a scene node into a
//! 4x4 matrix.
//!
//! The matrix is `T * R * S`: applied to a column vector, the point is scaled
//! first, then rotated, then translated. Rotation angles are Euler angles in
//! degrees, applied about X, then Y, then Z (`R = Rz * Ry * Rx`).

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

/// Translation, rotation and scale of a node relative to its parent.
///
/// Every field is optional in the scene document; missing fields take the
/// identity value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformDesc {
    pub translation: [f32; 3],
    /// Euler angles in degrees about X, Y and Z.
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for TransformDesc {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl TransformDesc {
    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: [x, y, z],
            ..Default::default()
        }
    }

    /// Rejects NaN and infinite components.
    pub fn validate(&self) -> SceneResult<()> {
        let fields = [
            ("translation", &self.translation),
            ("rotation", &self.rotation),
            ("scale", &self.scale),
        ];
        for (name, values) in fields {
            if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                return Err(SceneError::parse(
                    "transformation",
                    0,
                    format!("{} component {} is not finite", name, bad),
                ));
            }
        }
        Ok(())
    }

    /// Builds the `T * R * S` matrix.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let [tx, ty, tz] = self.translation;
        let [rx, ry, rz] = self.rotation;
        let [sx, sy, sz] = self.scale;

        let t = Matrix4::from_translation(Vector3::new(tx, ty, tz));
        let r = Matrix4::from_angle_z(Deg(rz))
            * Matrix4::from_angle_y(Deg(ry))
            * Matrix4::from_angle_x(Deg(rx));
        let s = Matrix4::from_nonuniform_scale(sx, sy, sz);
        t * r * s // Order matters: T * R * S
    }
}

/// Decodes a transform description into a matrix.
pub fn decode(desc: &TransformDesc) -> SceneResult<Matrix4<f32>> {
    desc.validate()?;
    Ok(desc.to_matrix())
}

/// Decodes a JSON `transformation` object, e.g.
/// `{"translation": [1, 0, 0], "rotation": [0, 90, 0]}`.
pub fn decode_json(json: &str) -> SceneResult<Matrix4<f32>> {
    let desc: TransformDesc =
        serde_json::from_str(json).map_err(|e| SceneError::json("transformation", e))?;
    decode(&desc)
}

/// Identity transform.
pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

/// Component-wise comparison within `epsilon`.
pub fn approx_eq(a: &Matrix4<f32>, b: &Matrix4<f32>, epsilon: f32) -> bool {
    let a: &[f32; 16] = a.as_ref();
    let b: &[f32; 16] = b.as_ref();
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Transform};

    const EPS: f32 = 1e-5;

    #[test]
    fn test_default_is_identity() {
        let m = decode(&TransformDesc::default()).unwrap();
        assert!(approx_eq(&m, &identity(), 0.0));
    }

    #[test]
    fn test_from_translation() {
        let m = decode(&TransformDesc::from_translation(4.0, -1.0, 2.5)).unwrap();
        let p = m.transform_point(Point3::new(1.0, 1.0, 1.0));
        assert!((p.x - 5.0).abs() < EPS && p.y.abs() < EPS && (p.z - 3.5).abs() < EPS);
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        let desc = TransformDesc {
            translation: [10.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 90.0],
            scale: [2.0, 2.0, 2.0],
        };
        let m = decode(&desc).unwrap();
        // (1,0,0) -> scaled (2,0,0) -> rotated about Z (0,2,0) -> translated (10,2,0)
        let p = m.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert!((p.x - 10.0).abs() < EPS);
        assert!((p.y - 2.0).abs() < EPS);
        assert!(p.z.abs() < EPS);
    }

    #[test]
    fn test_rotation_applies_x_before_z() {
        let desc = TransformDesc {
            rotation: [90.0, 0.0, 90.0],
            ..Default::default()
        };
        let m = decode(&desc).unwrap();
        // Rx(90) maps +Y to +Z; Rz(90) leaves +Z alone.
        let p = m.transform_point(Point3::new(0.0, 1.0, 0.0));
        assert!(p.x.abs() < EPS && p.y.abs() < EPS && (p.z - 1.0).abs() < EPS);
    }

    #[test]
    fn test_decode_json_partial_fields() {
        let m = decode_json(r#"{"translation": [1, 2, 3]}"#).unwrap();
        let expected = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        assert!(approx_eq(&m, &expected, EPS));
    }

    #[test]
    fn test_decode_json_malformed_number() {
        let err = decode_json(r#"{"scale": [1, "two", 3]}"#).unwrap_err();
        assert!(matches!(err, SceneError::Parse { .. }));
    }

    #[test]
    fn test_decode_json_wrong_arity() {
        assert!(decode_json(r#"{"rotation": [1, 2]}"#).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let desc = TransformDesc {
            scale: [1.0, f32::NAN, 1.0],
            ..Default::default()
        };
        assert!(matches!(decode(&desc), Err(SceneError::Parse { .. })));
    }
}
