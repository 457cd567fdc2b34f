use bevy::prelude::*;

/// Query-only collision shape. Centered on the entity's `GlobalTransform`.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

impl Collider {
    pub fn sphere(radius: f32) -> Self {
        Collider::Sphere { radius }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        Collider::Cuboid { half_extents }
    }

    /// Distance along `ray` to the first intersection, if any. A shape
    /// collapsed by a zero scale never intersects.
    pub fn intersect(&self, transform: &GlobalTransform, ray: Ray3d) -> Option<f32> {
        let dir = *ray.direction;
        match *self {
            Collider::Sphere { radius } => {
                let (scale, _, center) = transform.to_scale_rotation_translation();
                let r = radius * scale.abs().max_element();
                if !(r.is_finite() && r > 0.0) {
                    return None;
                }
                ray_sphere(ray.origin - center, dir, r)
            }
            Collider::Cuboid { half_extents } => {
                let affine = transform.affine();
                let det = affine.matrix3.determinant();
                if !det.is_finite() || det == 0.0 {
                    return None;
                }
                // the ray parameter is preserved by an affine change of basis
                let inv = affine.inverse();
                let origin = inv.transform_point3(ray.origin);
                let local_dir = inv.transform_vector3(dir);
                ray_aabb(origin, local_dir, half_extents)
            }
        }
    }
}

/// What a ray cast intersected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
    pub point: Vec3,
}

/// Nearest collider hit along `ray` within `max_distance`.
pub fn cast_ray<'a, I>(ray: Ray3d, max_distance: f32, colliders: I) -> Option<RayHit>
where
    I: IntoIterator<Item = (Entity, &'a Collider, &'a GlobalTransform)>,
{
    let mut best: Option<RayHit> = None;
    for (entity, collider, transform) in colliders {
        let Some(t) = collider.intersect(transform, ray) else {
            continue;
        };
        if t > max_distance {
            continue;
        }
        if best.map_or(true, |b| t < b.distance) {
            best = Some(RayHit {
                entity,
                distance: t,
                point: ray.get_point(t),
            });
        }
    }
    best
}

fn ray_sphere(oc: Vec3, dir: Vec3, radius: f32) -> Option<f32> {
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let near = -b - sq;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sq;
    (far >= 0.0).then_some(far)
}

fn ray_aabb(origin: Vec3, dir: Vec3, half: Vec3) -> Option<f32> {
    if !origin.is_finite() || !dir.is_finite() {
        return None;
    }
    let mut t_min = 0.0_f32;
    let mut t_max = f32::MAX;
    for axis in 0..3 {
        let (o, d, h) = (origin[axis], dir[axis], half[axis]);
        if d.abs() < f32::EPSILON {
            if o < -h || o > h {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (-h - o) * inv;
        let mut t1 = (h - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    Some(t_min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn down_z(x: f32, y: f32) -> Ray3d {
        Ray3d {
            origin: Vec3::new(x, y, 100.0),
            direction: Dir3::NEG_Z,
        }
    }

    #[test]
    fn sphere_hit_reports_near_surface() {
        let tf = GlobalTransform::from_translation(Vec3::new(0.0, 0.0, 10.0));
        let t = Collider::sphere(2.0).intersect(&tf, down_z(0.0, 0.0)).unwrap();
        assert_relative_eq!(t, 88.0, epsilon = 1e-4);
        assert!(Collider::sphere(2.0)
            .intersect(&tf, down_z(3.0, 0.0))
            .is_none());
    }

    #[test]
    fn sphere_radius_follows_scale() {
        let tf = GlobalTransform::from(Transform::from_scale(Vec3::splat(3.0)));
        assert!(Collider::sphere(1.0).intersect(&tf, down_z(2.5, 0.0)).is_some());
    }

    #[test]
    fn cuboid_respects_translation_and_rotation() {
        let tf = GlobalTransform::from(
            Transform::from_xyz(5.0, 0.0, 0.0)
                .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_4)),
        );
        let shape = Collider::cuboid(Vec3::splat(1.0));
        let t = shape.intersect(&tf, down_z(5.0, 0.0)).unwrap();
        assert_relative_eq!(t, 99.0, epsilon = 1e-4);
        // the rotated corner reaches past the unrotated half extent
        assert!(shape.intersect(&tf, down_z(6.3, 0.0)).is_some());
        assert!(shape.intersect(&tf, down_z(0.0, 0.0)).is_none());
    }

    #[test]
    fn ray_pointing_away_misses() {
        let tf = GlobalTransform::from_translation(Vec3::new(0.0, 0.0, 200.0));
        assert!(Collider::sphere(1.0).intersect(&tf, down_z(0.0, 0.0)).is_none());
        assert!(Collider::cuboid(Vec3::ONE)
            .intersect(&tf, down_z(0.0, 0.0))
            .is_none());
    }

    #[test]
    fn cast_returns_nearest_hit() {
        let far = Collider::cuboid(Vec3::ONE);
        let near = Collider::sphere(1.0);
        let far_tf = GlobalTransform::from_translation(Vec3::new(0.0, 0.0, 0.0));
        let near_tf = GlobalTransform::from_translation(Vec3::new(0.0, 0.0, 50.0));
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);

        let hit = cast_ray(
            down_z(0.0, 0.0),
            f32::MAX,
            [(a, &far, &far_tf), (b, &near, &near_tf)],
        )
        .unwrap();
        assert_eq!(hit.entity, b);
        assert_relative_eq!(hit.distance, 49.0, epsilon = 1e-4);
        assert_relative_eq!(hit.point.z, 51.0, epsilon = 1e-4);
    }

    #[test]
    fn zero_scaled_shapes_never_catch_rays() {
        let flat = GlobalTransform::from(
            Transform::from_xyz(500.0, 500.0, 0.0).with_scale(Vec3::new(1.0, 1.0, 0.0)),
        );
        let hidden = GlobalTransform::from(Transform::from_scale(Vec3::ZERO));
        let box_shape = Collider::cuboid(Vec3::ONE);
        let ball = Collider::sphere(1.0);
        assert!(box_shape.intersect(&flat, down_z(0.0, 0.0)).is_none());
        assert!(box_shape.intersect(&flat, down_z(500.0, 500.0)).is_none());
        assert!(ball.intersect(&hidden, down_z(0.0, 0.0)).is_none());

        let real = GlobalTransform::IDENTITY;
        let collapsed = Entity::from_raw(2);
        let solid = Entity::from_raw(3);
        let hit = cast_ray(
            down_z(0.0, 0.0),
            f32::MAX,
            [(collapsed, &box_shape, &flat), (solid, &box_shape, &real)],
        )
        .unwrap();
        assert_eq!(hit.entity, solid);
        assert_relative_eq!(hit.distance, 99.0, epsilon = 1e-4);

        let only_collapsed = [(collapsed, &box_shape, &flat), (collapsed, &ball, &hidden)];
        assert!(cast_ray(down_z(0.0, 0.0), f32::MAX, only_collapsed).is_none());
    }

    #[test]
    fn cast_honours_max_distance() {
        let shape = Collider::sphere(1.0);
        let tf = GlobalTransform::IDENTITY;
        let hits = [(Entity::from_raw(1), &shape, &tf)];
        assert!(cast_ray(down_z(0.0, 0.0), 10.0, hits).is_none());
        assert!(cast_ray(down_z(0.0, 0.0), f32::MAX, hits).is_some());
    }
}
