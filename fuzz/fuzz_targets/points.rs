#![no_main]
use ciborium::de;
use coin_cipher::{
    AffinePoint, JacobianPoint, PublicKey, Scalar,
    arithmetic::mul::{double_and_add, lincomb, mul, mul_generator},
};
use libfuzzer_sys::fuzz_target;
use rand_chacha::{ChaChaRng, rand_core::SeedableRng};

fn test_group(p: AffinePoint, q: AffinePoint, a: Scalar, b: Scalar) {
    let pj = JacobianPoint::from(p);
    let qj = JacobianPoint::from(q);

    // Test that addition and doubling are consistent
    assert_eq!(pj.double(), pj + pj);
    assert_eq!(pj + &q, pj + qj);

    // Test that negation works correctly
    let sum = pj + qj;
    assert!(bool::from((sum + (-sum)).is_identity()));

    // Test the multiplication routines against each other
    let pa = mul(&p, &a);
    assert_eq!(pa, double_and_add(&pj, &a));
    assert_eq!(pa + pa, mul(&p, &(a + a)));
    assert_eq!(lincomb(&p, &a, &b), pa + mul_generator(&b));
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 160 {
        return;
    }

    let mut rng = ChaChaRng::from_seed(data[0..32].try_into().unwrap());

    let compressed: [u8; 33] = data[32..65].try_into().unwrap();
    let p = Option::<AffinePoint>::from(AffinePoint::from_compressed(&compressed))
        .unwrap_or(AffinePoint::GENERATOR);

    let uncompressed: [u8; 65] = data[64..129].try_into().unwrap();
    let q = Option::<AffinePoint>::from(AffinePoint::from_uncompressed(&uncompressed))
        .unwrap_or_else(|| mul_generator(&Scalar::random_nonzero(&mut rng)).to_affine());

    let serialized = &data[128..128 + usize::from(data[3] & 0x1f)];
    let r = de::from_reader(serialized)
        .map(|key: PublicKey| *key.as_affine())
        .unwrap_or(AffinePoint::GENERATOR);

    let a = Scalar::from_bytes_reduced(&data[96..128].try_into().unwrap());
    let b = Scalar::random_nonzero(&mut rng);

    test_group(p, (JacobianPoint::from(q) + &r).to_affine(), a, b);
});
