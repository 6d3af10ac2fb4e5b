#![no_main]
use coin_cipher::{FieldElement, Scalar};
use libfuzzer_sys::fuzz_target;
use rand_chacha::{ChaChaRng, rand_core::SeedableRng};

fn test_scalar(a: Scalar, b: Scalar, c: Scalar) {
    // Associativity
    assert_eq!(a + (b + c), (a + b) + c);
    assert_eq!(a * (b * c), (a * b) * c);

    // Commutativity
    assert_eq!(a + b, b + a);
    assert_eq!(a * b, b * a);

    // Distributivity
    assert_eq!(a * (b + c), a * b + a * c);

    // Inverse
    assert_eq!(a - a, Scalar::ZERO);
    assert_eq!(a + (-a), Scalar::ZERO);
    if !bool::from(a.is_zero()) {
        assert_eq!(a * a.invert().unwrap(), Scalar::ONE);
    }

    // Splitting
    let (lo, hi) = a.split_128();
    let mut two_128 = [0u8; 32];
    two_128[15] = 1;
    assert_eq!(lo + hi * Scalar::from_bytes(&two_128).unwrap(), a);
    assert_eq!(a.is_high().unwrap_u8() ^ (-a).is_high().unwrap_u8(), {
        u8::from(!bool::from(a.is_zero()))
    });
}

fn test_field(a: FieldElement, b: FieldElement, c: FieldElement) {
    assert_eq!(a * &(b * &c), (a * &b) * &c);
    assert_eq!(a * &(b + &c), a * &b + &(a * &c));
    assert_eq!(a + &a.negate(1), FieldElement::ZERO);
    assert_eq!(a.square(), a * &a);
    if !bool::from(a.normalizes_to_zero()) {
        assert_eq!(a * &a.invert().unwrap(), FieldElement::ONE);
    }
    let square = a.square();
    let root = square.sqrt().unwrap();
    assert_eq!(root.square(), square);
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 192 {
        return;
    }

    // Backup plan for `from_bytes` failures
    let mut rng = ChaChaRng::from_seed(data[0..32].try_into().unwrap());

    let mut scalars = [Scalar::ZERO; 3];
    for (i, scalar) in scalars.iter_mut().enumerate() {
        let bytes: [u8; 32] = data[32 + 32 * i..64 + 32 * i].try_into().unwrap();
        *scalar = Option::<Scalar>::from(Scalar::from_bytes(&bytes))
            .unwrap_or_else(|| Scalar::random_nonzero(&mut rng));
    }
    test_scalar(scalars[0], scalars[1], scalars[2]);

    let mut elements = [FieldElement::ZERO; 3];
    for (i, element) in elements.iter_mut().enumerate() {
        let bytes: [u8; 32] = data[96 + 32 * i..128 + 32 * i].try_into().unwrap();
        *element = Option::<FieldElement>::from(FieldElement::from_bytes(&bytes)).unwrap_or(FieldElement::ONE);
    }
    test_field(elements[0], elements[1], elements[2]);
});
