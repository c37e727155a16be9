//! Unit tests for mas-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ActorId, Kind};

    #[test]
    fn index_roundtrip() {
        let id = ActorId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ActorId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(ActorId(0) < ActorId(1));
        assert!(Kind(100) > Kind(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(ActorId::INVALID.0, u32::MAX);
        assert_eq!(Kind::INVALID.0, u16::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(ActorId(7).to_string(), "ActorId(7)");
    }
}

#[cfg(test)]
mod vec2 {
    use crate::Vec2;

    #[test]
    fn distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.distance_sq(b), 25.0);
    }

    #[test]
    fn normalized_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn normalized_is_unit() {
        let v = Vec2::new(10.0, 0.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn step_toward_partial() {
        let p = Vec2::ZERO.step_toward(Vec2::new(10.0, 0.0), 3.0);
        assert!((p.x - 3.0).abs() < 1e-6);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn step_toward_lands_exactly() {
        let target = Vec2::new(1.0, 1.0);
        let p = Vec2::ZERO.step_toward(target, 5.0);
        assert_eq!(p, target);
        // Stepping from the target stays on the target.
        assert_eq!(target.step_toward(target, 5.0), target);
    }
}

#[cfg(test)]
mod rect {
    use crate::{Rect, Vec2};

    #[test]
    fn half_open_containment() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(9.999, 9.999)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
        assert!(!r.contains(Vec2::new(5.0, 10.0)));
    }

    #[test]
    fn covers_is_closed() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.covers(Vec2::new(10.0, 10.0)));
        assert!(!r.covers(Vec2::new(10.1, 10.0)));
    }

    #[test]
    fn quadrants_partition() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let p = Vec2::new(5.0, 5.0); // on both seams → SE only
        let holders: Vec<usize> = (0..4).filter(|&i| r.quadrant(i).contains(p)).collect();
        assert_eq!(holders, vec![3]);
    }

    #[test]
    fn min_dist_sq_inside_is_zero() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(r.min_dist_sq(Vec2::new(5.0, 5.0)), 0.0);
    }

    #[test]
    fn min_dist_sq_outside() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        // 3-4-5 triangle from the corner at (10, 10).
        assert_eq!(r.min_dist_sq(Vec2::new(13.0, 14.0)), 25.0);
    }

    #[test]
    fn clamp_pulls_inside() {
        let r = Rect::new(0.0, 0.0, 100.0, 100.0);
        let p = r.clamp(Vec2::new(150.0, -20.0));
        assert!(r.contains(p));
    }

    #[test]
    fn around_is_centered() {
        let r = Rect::around(Vec2::new(50.0, 50.0), 10.0);
        assert_eq!(r.center(), Vec2::new(50.0, 50.0));
        assert_eq!(r.w, 20.0);
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn display() {
        assert_eq!(Tick(12).to_string(), "T12");
    }
}

#[cfg(test)]
mod rng {
    use crate::{ActorId, ActorRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = ActorRng::new(12345, ActorId(0));
        let mut r2 = ActorRng::new(12345, ActorId(0));
        for _ in 0..100 {
            let a: f32 = r1.random();
            let b: f32 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_actors_differ() {
        let mut r0 = ActorRng::new(1, ActorId(0));
        let mut r1 = ActorRng::new(1, ActorId(1));
        let a: u64 = r0.random();
        let b: u64 = r1.random();
        assert_ne!(a, b, "seeds for adjacent actors should diverge");
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = ActorRng::new(0, ActorId(0));
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f32..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = ActorRng::new(0, ActorId(0));
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }
}
