//! Concrete collaborator instantiation used only by this crate's own
//! tests (never compiled outside `#[cfg(test)]`): a tiny Weierstrass
//! curve `y^2 = x^3 + 4` over `F_6067`, with a prime-order subgroup
//! small enough to brute-force-verify its own group law, plus a genuine
//! GLV endomorphism so the endomorphism adapter has something real to
//! exercise. None of this
//! is part of the MSM core itself — it plays the same role a `curves::
//! bls12_377` / `fields::bls12_377` pairing plays in a production test
//! suite, scaled down so the constants below are checkable by brute force
//! rather than taken on faith.
//!
//! Curve data (verified by direct point counting and brute-force
//! discrete log, not asserted on faith):
//! - `p = 6067` (prime, `p ≡ 1 (mod 3)` so a nontrivial cube root of
//!   unity exists mod `p`).
//! - curve order `6159 = 3 × 2053`; `n = 2053` is the prime subgroup
//!   order, cofactor `3`.
//! - `G = (2444, 3590)` has order exactly `n`.
//! - `zeta = 665` is a nontrivial cube root of unity mod `p`
//!   (`zeta^2 + zeta + 1 ≡ 0 mod p`); `phi(x, y) = (zeta·x, y)` is an
//!   endomorphism of the curve acting as multiplication by
//!   `lambda = 197` on the order-`n` subgroup (`lambda^2 + lambda + 1 ≡
//!   0 mod n`, `phi(G) = lambda·G`).
//! - GLV lattice basis (short vectors `(a, b)` with `a ≡ b·lambda mod
//!   n`, via 2-D Gaussian lattice reduction, Hankerson et al. Algorithm
//!   3.74): `v1 = (21, -52)`, `v2 = (31, 21)`, determinant `2053 = n`.

use crate::bigint::{BigInteger, BigInteger384};
use crate::traits::curve::{AffineCurve, ProjectiveCurve};
use crate::traits::endo::EndomorphismParameters;
use crate::traits::field::{Field, FpParameters, PrimeField};

const FQ_MODULUS: u64 = 6067;
const FR_MODULUS: u64 = 2053;
const CURVE_B: u64 = 4;
const ZETA: u64 = 665;
const LAMBDA: u64 = 197;

/// Nearest-integer division (ties away from zero), used by the GLV
/// decomposition's lattice rounding step.
fn round_div(a: i64, b: i64) -> i64 {
    debug_assert!(b > 0);
    let q = a.div_euclid(b);
    let r = a.rem_euclid(b);
    if 2 * r >= b {
        q + 1
    } else {
        q
    }
}

fn mod_inverse(a: i64, m: i64) -> Option<i64> {
    let (mut old_r, mut r) = (a.rem_euclid(m), m);
    let (mut old_s, mut s) = (1i64, 0i64);
    while r != 0 {
        let q = old_r / r;
        let (nr, ns) = (old_r - q * r, old_s - q * s);
        old_r = r;
        r = nr;
        old_s = s;
        s = ns;
    }
    if old_r != 1 {
        None
    } else {
        Some(old_s.rem_euclid(m))
    }
}

macro_rules! prime_field {
    ($name:ident, $modulus:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name(u64);

        impl $name {
            pub fn new(v: u64) -> Self {
                $name(v % $modulus)
            }

            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl Field for $name {
            fn zero() -> Self {
                $name(0)
            }
            fn one() -> Self {
                $name(1)
            }
            fn is_zero(&self) -> bool {
                self.0 == 0
            }
            fn add(&self, other: &Self) -> Self {
                $name((self.0 + other.0) % $modulus)
            }
            fn sub(&self, other: &Self) -> Self {
                $name((self.0 + $modulus - other.0) % $modulus)
            }
            fn neg(&self) -> Self {
                if self.0 == 0 {
                    *self
                } else {
                    $name($modulus - self.0)
                }
            }
            fn mul(&self, other: &Self) -> Self {
                $name(((self.0 as u128 * other.0 as u128) % $modulus as u128) as u64)
            }
            fn halve(&self) -> Self {
                if self.0 % 2 == 0 {
                    $name(self.0 / 2)
                } else {
                    $name((self.0 + $modulus) / 2)
                }
            }
            fn inverse_vartime(&self) -> Option<Self> {
                if self.is_zero() {
                    None
                } else {
                    mod_inverse(self.0 as i64, $modulus as i64).map(|v| $name(v as u64))
                }
            }
        }
    };
}

prime_field!(Fq, FQ_MODULUS);
prime_field!(Fr, FR_MODULUS);

pub struct FrParameters;
impl FpParameters for FrParameters {
    const MODULUS_BITS: u32 = 12;
}

impl PrimeField for Fr {
    type BigInt = BigInteger384;
    type Params = FrParameters;

    fn into_repr(&self) -> BigInteger384 {
        BigInteger384::new([self.0, 0, 0, 0, 0, 0])
    }

    fn from_repr(repr: BigInteger384) -> Self {
        Fr::new(repr.as_limbs()[0])
    }
}

/// `(x, y)`, with the curve's basepoint-excluded sentinel `(0, 0)`
/// (never on the curve, since `0 != b`) standing for the identity, the
/// same convention the crate's `AffineCurve` collaborator contract uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestAffine {
    x: Fq,
    y: Fq,
}

impl AffineCurve for TestAffine {
    type BaseField = Fq;
    type ScalarField = Fr;
    type Projective = TestProjective;

    fn identity() -> Self {
        TestAffine { x: Fq::zero(), y: Fq::zero() }
    }

    fn is_identity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    fn x(&self) -> Fq {
        self.x
    }

    fn y(&self) -> Fq {
        self.y
    }

    fn from_xy_unchecked(x: Fq, y: Fq) -> Self {
        TestAffine { x, y }
    }

    fn neg(&self) -> Self {
        if self.is_identity() {
            *self
        } else {
            TestAffine { x: self.x, y: self.y.neg() }
        }
    }

    fn into_projective(&self) -> TestProjective {
        if self.is_identity() {
            TestProjective::identity()
        } else {
            TestProjective { x: self.x, y: self.y, z: Fq::one() }
        }
    }
}

/// Jacobian coordinates `(X, Y, Z)`, `x = X/Z^2`, `y = Y/Z^3`, identity
/// represented by `Z = 0`. Formulas are the standard `a = 0`
/// short-Weierstrass EFD family (`dbl-2009-l`, `madd-2007-bl`,
/// `add-2007-bl`) referenced by the glossary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestProjective {
    x: Fq,
    y: Fq,
    z: Fq,
}

impl ProjectiveCurve for TestProjective {
    type BaseField = Fq;
    type ScalarField = Fr;
    type Affine = TestAffine;

    fn identity() -> Self {
        TestProjective { x: Fq::one(), y: Fq::one(), z: Fq::zero() }
    }

    fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    fn double_in_place(&mut self) {
        if self.is_identity() || self.y.is_zero() {
            *self = Self::identity();
            return;
        }
        // dbl-2009-l
        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = self.x.add(&b).square().sub(&a).sub(&c).double();
        let e = a.double().add(&a);
        let f = e.square();
        let x3 = f.sub(&d.double());
        let y3 = e.mul(&d.sub(&x3)).sub(&c.double().double().double());
        let z3 = self.y.mul(&self.z).double();
        self.x = x3;
        self.y = y3;
        self.z = z3;
    }

    fn add_assign_vartime(&mut self, other: &Self) {
        if self.is_identity() {
            *self = *other;
            return;
        }
        if other.is_identity() {
            return;
        }
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = other.x.mul(&z1z1);
        let s1 = self.y.mul(&other.z).mul(&z2z2);
        let s2 = other.y.mul(&self.z).mul(&z1z1);
        if u1 == u2 {
            if s1 == s2 {
                self.double_in_place();
            } else {
                *self = Self::identity();
            }
            return;
        }
        let h = u2.sub(&u1);
        let i = h.double().square();
        let j = h.mul(&i);
        let r = s2.sub(&s1).double();
        let v = u1.mul(&i);
        let x3 = r.square().sub(&j).sub(&v.double());
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&j).double());
        let z3 = self.z.add(&other.z).square().sub(&z1z1).sub(&z2z2).mul(&h);
        self.x = x3;
        self.y = y3;
        self.z = z3;
    }

    fn madd_assign_vartime(&mut self, other: &TestAffine) {
        if other.is_identity() {
            return;
        }
        if self.is_identity() {
            *self = other.into_projective();
            return;
        }
        let z1z1 = self.z.square();
        let u2 = other.x.mul(&z1z1);
        let s2 = other.y.mul(&self.z).mul(&z1z1);
        if self.x == u2 {
            if self.y == s2 {
                self.double_in_place();
            } else {
                *self = Self::identity();
            }
            return;
        }
        // madd-2007-bl
        let h = u2.sub(&self.x);
        let hh = h.square();
        let i = hh.double().double();
        let j = h.mul(&i);
        let r = s2.sub(&self.y).double();
        let v = self.x.mul(&i);
        let x3 = r.square().sub(&j).sub(&v.double());
        let y3 = r.mul(&v.sub(&x3)).sub(&self.y.mul(&j).double());
        let z3 = self.z.add(&h).square().sub(&z1z1).sub(&hh);
        self.x = x3;
        self.y = y3;
        self.z = z3;
    }

    fn neg(&self) -> Self {
        if self.is_identity() {
            *self
        } else {
            TestProjective { x: self.x, y: self.y.neg(), z: self.z }
        }
    }

    fn to_affine(&self) -> TestAffine {
        if self.is_identity() {
            TestAffine::identity()
        } else {
            let z_inv = self.z.inverse_vartime().expect("nonzero Z for a non-identity point");
            let z_inv2 = z_inv.square();
            let z_inv3 = z_inv2.mul(&z_inv);
            TestAffine { x: self.x.mul(&z_inv2), y: self.y.mul(&z_inv3) }
        }
    }
}

/// `M = 2` GLV decomposition using the lattice basis in the module docs.
pub struct TestEndo;

impl EndomorphismParameters<TestAffine> for TestEndo {
    const DIMENSION: usize = 2;
    const THRESHOLD_BITS: usize = 4;

    fn decompose(scalar: &BigInteger384) -> Vec<(BigInteger384, bool)> {
        let k = (scalar.as_limbs()[0] % FR_MODULUS) as i64;
        let n = FR_MODULUS as i64;
        // Short basis: v1 = (21, -52), v2 = (31, 21); both satisfy
        // a - b*lambda == 0 (mod n). det(v1, v2) == n exactly.
        let (a1, b1) = (21i64, -52i64);
        let (a2, b2) = (31i64, 21i64);
        let det = a1 * b2 - a2 * b1;
        debug_assert_eq!(det, n);

        let c1 = round_div(k * b2, det);
        let c2 = round_div(-k * b1, det);
        let k1 = k - c1 * a1 - c2 * a2;
        let k2 = -(-c1 * b1 - c2 * b2); // mini-scalar paired with phi(G) is -k2

        let to_digit = |v: i64| -> (BigInteger384, bool) {
            let mag = v.unsigned_abs();
            (BigInteger384::new([mag, 0, 0, 0, 0, 0]), v < 0)
        };
        vec![to_digit(k1), to_digit(k2)]
    }

    fn apply_endomorphism(point: &TestAffine, m: usize) -> TestAffine {
        debug_assert_eq!(m, 1, "TestEndo has dimension 2: only m=1 is a nontrivial map");
        if point.is_identity() {
            return *point;
        }
        let zeta = Fq::new(ZETA);
        TestAffine { x: point.x.mul(&zeta), y: point.y }
    }
}

pub fn generator() -> TestAffine {
    let g = TestAffine { x: Fq::new(2444), y: Fq::new(3590) };
    debug_assert!(point_is_on_curve(&g));
    g
}

fn point_is_on_curve(p: &TestAffine) -> bool {
    if p.is_identity() {
        return true;
    }
    let lhs = p.y.square();
    let rhs = p.x.square().mul(&p.x).add(&Fq::new(CURVE_B));
    lhs == rhs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_has_the_expected_prime_order() {
        let g = generator().into_projective();
        let mut acc = TestProjective::identity();
        for _ in 0..FR_MODULUS - 1 {
            acc.add_assign_vartime(&g);
        }
        // (n-1)*G + G == identity
        acc.add_assign_vartime(&g);
        assert!(acc.is_identity());
    }

    #[test]
    fn generator_is_on_curve() {
        assert!(point_is_on_curve(&generator()));
    }

    #[test]
    fn doubling_matches_repeated_addition() {
        let g = generator().into_projective();
        let mut by_add = g;
        by_add.add_assign_vartime(&g);
        let mut by_dbl = g;
        by_dbl.double_in_place();
        assert_eq!(by_add, by_dbl);
    }

    #[test]
    fn endomorphism_acts_as_multiplication_by_lambda() {
        let g = generator();
        let phi_g = TestEndo::apply_endomorphism(&g, 1);

        let mut lambda_g = TestProjective::identity();
        let g_proj = g.into_projective();
        for _ in 0..LAMBDA {
            lambda_g.add_assign_vartime(&g_proj);
        }
        assert_eq!(phi_g.into_projective(), lambda_g);
    }

    #[test]
    fn decompose_reconstructs_scalar_via_endomorphism() {
        for k in [0u64, 1, 2, 197, 1000, 2052] {
            let repr = BigInteger384::new([k, 0, 0, 0, 0, 0]);
            let digits = TestEndo::decompose(&repr);
            assert_eq!(digits.len(), 2);

            let g = generator().into_projective();
            let phi_g = TestEndo::apply_endomorphism(&generator(), 1).into_projective();

            let scale = |acc: &mut TestProjective, base: &TestProjective, mag: &BigInteger384, neg: bool| {
                let m = mag.as_limbs()[0];
                let mut term = TestProjective::identity();
                for _ in 0..m {
                    term.add_assign_vartime(base);
                }
                if neg {
                    term = term.neg();
                }
                acc.add_assign_vartime(&term);
            };

            let mut total = TestProjective::identity();
            scale(&mut total, &g, &digits[0].0, digits[0].1);
            scale(&mut total, &phi_g, &digits[1].0, digits[1].1);

            let mut expected = TestProjective::identity();
            for _ in 0..k {
                expected.add_assign_vartime(&g);
            }
            assert_eq!(total, expected, "k={k} digits={digits:?}");
        }
    }
}
