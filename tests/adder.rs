use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::R1CSVar;
use ark_relations::r1cs::ConstraintSystem;

use nzcp_snark::adder::{bin_add, bin_add_native};

fn to_bits(value: u64, width: usize) -> Vec<bool> {
    (0..width).map(|i| (value >> i) & 1 == 1).collect()
}

fn from_bits(bits: &[bool]) -> u64 {
    bits.iter()
        .enumerate()
        .fold(0u64, |acc, (i, bit)| acc | (u64::from(*bit) << i))
}

fn circuit_add(op1: &[bool], op2: &[bool]) -> (Vec<bool>, bool) {
    let cs = ConstraintSystem::<Fr>::new_ref();
    let a: Vec<Boolean<Fr>> = op1
        .iter()
        .map(|bit| Boolean::new_witness(cs.clone(), || Ok(*bit)).expect("alloc"))
        .collect();
    let b: Vec<Boolean<Fr>> = op2
        .iter()
        .map(|bit| Boolean::new_witness(cs.clone(), || Ok(*bit)).expect("alloc"))
        .collect();
    let result = bin_add(&a, &b).expect("bin_add");
    assert!(cs.is_satisfied().expect("satisfiability"));
    let sum = result
        .sum
        .iter()
        .map(|bit| bit.value().expect("sum bit"))
        .collect();
    (sum, result.carry.value().expect("carry bit"))
}

#[test]
fn exhaustive_small_widths() {
    for width in 1..=4usize {
        for a in 0..1u64 << width {
            for b in 0..1u64 << width {
                let (sum, carry) = circuit_add(&to_bits(a, width), &to_bits(b, width));
                let value = from_bits(&sum) + (u64::from(carry) << width);
                assert_eq!(value, a + b, "width {width}: {a} + {b}");

                let (native_sum, native_carry) =
                    bin_add_native(&to_bits(a, width), &to_bits(b, width));
                assert_eq!(native_sum, sum);
                assert_eq!(native_carry, carry);
            }
        }
    }
}

#[test]
fn production_width_zero() {
    let zero = vec![false; 496];
    let (sum, carry) = circuit_add(&zero, &zero);
    assert!(sum.iter().all(|bit| !bit));
    assert!(!carry);
}

#[test]
fn production_width_doubling() {
    // An arbitrary fixed 496-bit operand; doubling shifts every bit up by
    // one and carries out the former top bit.
    let x: Vec<bool> = (0..496).map(|i| (i * 7 + 3) % 5 < 2).collect();
    let (sum, carry) = circuit_add(&x, &x);
    assert!(!sum[0]);
    for i in 1..496 {
        assert_eq!(sum[i], x[i - 1], "bit {i}");
    }
    assert_eq!(carry, x[495]);
}

#[test]
fn production_width_all_ones_plus_one() {
    let ones = vec![true; 496];
    let mut one = vec![false; 496];
    one[0] = true;
    let (sum, carry) = circuit_add(&ones, &one);
    assert!(sum.iter().all(|bit| !bit));
    assert!(carry);
}

#[test]
fn production_width_all_ones_plus_top_bit() {
    let ones = vec![true; 496];
    let mut top = vec![false; 496];
    top[495] = true;
    let (sum, carry) = circuit_add(&ones, &top);
    // Exact integer identity: 2^496 - 1 + 2^495 = 2^496 + 2^495 - 1.
    for (i, bit) in sum.iter().enumerate() {
        assert_eq!(*bit, i != 495, "bit {i}");
    }
    assert!(carry);

    let (native_sum, native_carry) = bin_add_native(&ones, &top);
    assert_eq!(native_sum, sum);
    assert!(native_carry);
}
