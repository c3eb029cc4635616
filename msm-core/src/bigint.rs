//! The big-integer substrate the signed-digit window extractor reads
//! from. Field and scalar types hand the core a `BigInteger`-shaped view of
//! their canonical representation; the core never touches field arithmetic.

use derivative::Derivative;
use std::fmt::Debug;

/// A fixed-width unsigned integer, little-endian limb order, that a field or
/// scalar collaborator can produce a view of via [`crate::PrimeField::into_repr`].
///
/// The core only ever reads bits out of a `BigInteger`; it never adds,
/// multiplies, or inverts one. Implementors are free to choose whatever limb
/// width suits their field.
pub trait BigInteger:
    Copy + Clone + Debug + Default + Eq + Ord + Send + Sync + 'static
{
    /// Number of 64-bit limbs backing the representation.
    const NUM_LIMBS: usize;

    /// Returns the bit at position `i` (0 = least significant), or `false`
    /// if `i` is out of range.
    fn get_bit(&self, i: usize) -> bool;

    /// `true` iff every limb is zero.
    fn is_zero(&self) -> bool;

    /// Index one past the highest set bit (0 if the value is zero). Used by
    /// the `determine_bits_set` high-order-window-skip optimisation.
    fn num_bits(&self) -> usize;

    /// Little-endian limb view.
    fn as_limbs(&self) -> &[u64];

    /// Builds a `BigInteger` whose low 64 bits equal `v` and whose
    /// remaining limbs are zero. Convenience for tests and small constants.
    fn from_u64(v: u64) -> Self;
}

/// A 384-bit (6-limb) big integer, wide enough for the ~381-bit scalars
/// typical of BLS-family curves.
#[derive(Derivative)]
#[derivative(
    Copy(bound = ""),
    Clone(bound = ""),
    Debug(bound = ""),
    Default(bound = ""),
    PartialEq(bound = ""),
    Eq(bound = ""),
    PartialOrd(bound = ""),
    Ord(bound = ""),
    Hash(bound = "")
)]
pub struct BigInteger384(pub [u64; 6]);

impl BigInteger384 {
    pub const fn new(limbs: [u64; 6]) -> Self {
        BigInteger384(limbs)
    }
}

impl BigInteger for BigInteger384 {
    const NUM_LIMBS: usize = 6;

    #[inline]
    fn get_bit(&self, i: usize) -> bool {
        let limb = i / 64;
        if limb >= 6 {
            return false;
        }
        let shift = i % 64;
        (self.0[limb] >> shift) & 1 == 1
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0.iter().all(|&x| x == 0)
    }

    fn num_bits(&self) -> usize {
        for (idx, limb) in self.0.iter().enumerate().rev() {
            if *limb != 0 {
                return idx * 64 + (64 - limb.leading_zeros() as usize);
            }
        }
        0
    }

    #[inline]
    fn as_limbs(&self) -> &[u64] {
        &self.0
    }

    fn from_u64(v: u64) -> Self {
        let mut limbs = [0u64; 6];
        limbs[0] = v;
        BigInteger384(limbs)
    }
}
