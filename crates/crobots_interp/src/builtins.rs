//! The injected primitive-call table: the robot control set (host
//! implemented) and the math set (provided here).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fault::Fault;
use crobots_ast::Name;

/// Trig values are scaled by this factor; angles are in degrees.
pub const TRIG_SCALE: i64 = 100_000;

/// Robot-control primitives, implemented by the host (arena,
/// simulator, or a stub).
pub trait RobotApi {
    /// Distance to the closest robot within the scan arc, 0 if none.
    fn scan(&mut self, degree: i64, resolution: i64) -> i64;
    /// 1 if a missile was fired, 0 if the cannon is reloading.
    fn cannon(&mut self, degree: i64, range: i64) -> i64;
    fn drive(&mut self, degree: i64, speed: i64);
    /// Damage as a percentage.
    fn damage(&mut self) -> i64;
    /// Speed as a percentage.
    fn speed(&mut self) -> i64;
    fn loc_x(&mut self) -> i64;
    fn loc_y(&mut self) -> i64;
}

/// A robot with no arena: every query answers zero. Backs tests and
/// plain expression evaluation.
#[derive(Debug, Default)]
pub struct NullRobot;

impl RobotApi for NullRobot {
    fn scan(&mut self, _degree: i64, _resolution: i64) -> i64 {
        0
    }
    fn cannon(&mut self, _degree: i64, _range: i64) -> i64 {
        0
    }
    fn drive(&mut self, _degree: i64, _speed: i64) {}
    fn damage(&mut self) -> i64 {
        0
    }
    fn speed(&mut self) -> i64 {
        0
    }
    fn loc_x(&mut self) -> i64 {
        0
    }
    fn loc_y(&mut self) -> i64 {
        0
    }
}

/// Pure-ish math primitives, independent of the robot's state.
pub struct MathApi {
    rng: StdRng,
}

impl MathApi {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded variant for repeatable runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A number in `0..bound`; 0 when the bound is not positive.
    pub fn rand(&mut self, bound: i64) -> i64 {
        if bound <= 0 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }

    /// Integer square root; the argument is made positive first.
    pub fn sqrt(&self, x: i64) -> i64 {
        (x.unsigned_abs() as f64).sqrt() as i64
    }

    pub fn sin(&self, degree: i64) -> i64 {
        ((degree as f64).to_radians().sin() * TRIG_SCALE as f64).round() as i64
    }

    pub fn cos(&self, degree: i64) -> i64 {
        ((degree as f64).to_radians().cos() * TRIG_SCALE as f64).round() as i64
    }

    pub fn tan(&self, degree: i64) -> i64 {
        ((degree as f64).to_radians().tan() * TRIG_SCALE as f64).round() as i64
    }

    /// Arctangent of a y/x ratio scaled by [`TRIG_SCALE`]; the result
    /// is a degree value in [-90, +90].
    pub fn atan(&self, ratio: i64) -> i64 {
        (ratio as f64 / TRIG_SCALE as f64).atan().to_degrees().round() as i64
    }
}

impl Default for MathApi {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub enum PrimResult {
    Value(i64),
    /// The primitive returns nothing; the call reduces to the
    /// no-value term.
    Void,
}

/// The name → callable table the execution engine consults before
/// trying user functions.
pub struct Primitives {
    robot: Box<dyn RobotApi>,
    math: MathApi,
}

impl Primitives {
    pub fn new(robot: Box<dyn RobotApi>, math: MathApi) -> Self {
        Self { robot, math }
    }

    /// Restart the math generator from a known seed.
    pub fn reseed(&mut self, seed: u64) {
        self.math = MathApi::with_seed(seed);
    }

    /// `Ok(None)` if the name is not a primitive at all. A matching
    /// name with the wrong number of arguments is an
    /// `ArgumentMismatch` fault.
    pub fn call(&mut self, name: &Name, args: &[i64]) -> Result<Option<PrimResult>, Fault> {
        let expected = match name.as_str() {
            "scan" | "cannon" | "drive" => 2,
            "rand" | "sqrt" | "sin" | "cos" | "tan" | "atan" => 1,
            "damage" | "speed" | "loc_x" | "loc_y" => 0,
            _ => return Ok(None),
        };
        if args.len() != expected {
            return Err(Fault::ArgumentMismatch {
                name: name.clone(),
                expected,
                actual: args.len(),
            });
        }
        let result = match name.as_str() {
            "scan" => PrimResult::Value(self.robot.scan(args[0], args[1])),
            "cannon" => PrimResult::Value(self.robot.cannon(args[0], args[1])),
            "drive" => {
                self.robot.drive(args[0], args[1]);
                PrimResult::Void
            }
            "damage" => PrimResult::Value(self.robot.damage()),
            "speed" => PrimResult::Value(self.robot.speed()),
            "loc_x" => PrimResult::Value(self.robot.loc_x()),
            "loc_y" => PrimResult::Value(self.robot.loc_y()),
            "rand" => PrimResult::Value(self.math.rand(args[0])),
            "sqrt" => PrimResult::Value(self.math.sqrt(args[0])),
            "sin" => PrimResult::Value(self.math.sin(args[0])),
            "cos" => PrimResult::Value(self.math.cos(args[0])),
            "tan" => PrimResult::Value(self.math.tan(args[0])),
            "atan" => PrimResult::Value(self.math.atan(args[0])),
            _ => unreachable!(),
        };
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trig_is_scaled_by_one_hundred_thousand() {
        let math = MathApi::with_seed(0);
        assert_eq!(math.sin(90), TRIG_SCALE);
        assert_eq!(math.cos(0), TRIG_SCALE);
        assert_eq!(math.sin(30), 50_000);
        assert_eq!(math.atan(TRIG_SCALE), 45);
    }

    #[test]
    fn sqrt_ignores_the_sign() {
        let math = MathApi::with_seed(0);
        assert_eq!(math.sqrt(49), 7);
        assert_eq!(math.sqrt(-49), 7);
        assert_eq!(math.sqrt(50), 7);
    }

    #[test]
    fn rand_respects_the_bound() {
        let mut math = MathApi::with_seed(42);
        for _ in 0..100 {
            let v = math.rand(10);
            assert!((0..10).contains(&v));
        }
        assert_eq!(math.rand(0), 0);
        assert_eq!(math.rand(-5), 0);
    }

    #[test]
    fn seeded_runs_are_repeatable() {
        let mut a = MathApi::with_seed(7);
        let mut b = MathApi::with_seed(7);
        let xs: Vec<i64> = (0..10).map(|_| a.rand(1000)).collect();
        let ys: Vec<i64> = (0..10).map(|_| b.rand(1000)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn arity_is_checked_per_primitive() {
        let mut prims = Primitives::new(Box::new(NullRobot), MathApi::with_seed(0));
        let fault = prims.call(&Name::from("scan"), &[1]).unwrap_err();
        assert_eq!(
            fault,
            Fault::ArgumentMismatch {
                name: Name::from("scan"),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn unknown_names_are_not_primitives() {
        let mut prims = Primitives::new(Box::new(NullRobot), MathApi::with_seed(0));
        assert!(prims.call(&Name::from("main"), &[]).unwrap().is_none());
    }
}
