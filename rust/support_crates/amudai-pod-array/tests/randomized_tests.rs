//! Random operation sequences checked against a `Vec` model.

use amudai_pod_array::{PaddedPodArray, PaddingPolicy, PodArray};

fn random_values(len: usize) -> Vec<u32> {
    (0..len).map(|_| fastrand::u32(..1000)).collect()
}

fn check_invariants<P: PaddingPolicy>(a: &PodArray<u32, P>, model: &[u32]) {
    assert_eq!(a.as_slice(), model);
    assert!(a.len() <= a.capacity());
    if a.allocated_bytes() != 0 {
        assert_eq!(
            a.allocated_bytes(),
            a.capacity() * 4 + a.padding().total()
        );
    }
}

fn run_random_ops<P: PaddingPolicy>(seed: u64, steps: usize) {
    fastrand::seed(seed);
    let mut a = PodArray::<u32, P>::new();
    let mut model = Vec::<u32>::new();

    for _ in 0..steps {
        match fastrand::u32(0..12) {
            0 | 1 => {
                let v = fastrand::u32(..);
                a.push(v);
                model.push(v);
            }
            2 => {
                let values = random_values(fastrand::usize(0..50));
                a.extend_from_slice(&values);
                model.extend_from_slice(&values);
            }
            3 => {
                let index = fastrand::usize(0..=model.len());
                let values = random_values(fastrand::usize(0..50));
                a.insert_slice(index, &values);
                model.splice(index..index, values.iter().copied());
            }
            4 => {
                let index = fastrand::usize(0..=model.len());
                let values = (0..fastrand::usize(0..50))
                    .map(|_| fastrand::u8(..))
                    .collect::<Vec<_>>();
                a.insert_from(index, values.iter().copied());
                model.splice(index..index, values.iter().map(|&v| v as u32));
            }
            5 if !model.is_empty() => {
                let start = fastrand::usize(0..model.len());
                let end = fastrand::usize(start..=model.len());
                let index = fastrand::usize(0..=model.len());
                a.insert_from_self(index, start..end);
                let copy = model[start..end].to_vec();
                model.splice(index..index, copy);
            }
            6 if !model.is_empty() => {
                let start = fastrand::usize(0..model.len());
                let end = fastrand::usize(start..=model.len());
                a.erase(start..end);
                model.drain(start..end);
            }
            7 => {
                let values = random_values(fastrand::usize(0..20));
                a.extend_from_raw_bytes(bytemuck::cast_slice(&values));
                model.extend_from_slice(&values);
            }
            8 => {
                assert_eq!(a.pop(), model.pop());
            }
            9 => {
                let len = fastrand::usize(0..=model.len() + 10);
                a.resize(len);
                model.resize(len, 0);
            }
            10 => {
                if fastrand::u32(0..10) == 0 {
                    let values = random_values(fastrand::usize(0..30));
                    a.assign_slice(&values);
                    model = values;
                } else {
                    a.shrink_to_fit();
                }
            }
            _ => {
                let len = fastrand::usize(0..=model.len());
                a.truncate(len);
                model.truncate(len);
            }
        }
        check_invariants(&a, &model);
    }
}

#[test]
fn test_random_ops_unpadded() {
    for seed in 0..8 {
        run_random_ops::<amudai_pod_array::NoPadding>(seed, 2000);
    }
}

#[test]
fn test_random_ops_padded() {
    for seed in 100..108 {
        run_random_ops::<amudai_pod_array::SimdPadding>(seed, 2000);
    }
}

#[test]
fn test_random_inserts_model() {
    fastrand::seed(2985745485);
    let mut a = PaddedPodArray::<u64>::new();
    let mut model = Vec::<u64>::new();
    for _ in 0..500 {
        let index = fastrand::usize(0..=model.len());
        let values = (0..fastrand::usize(0..200))
            .map(|_| fastrand::i16(..))
            .collect::<Vec<_>>();
        a.insert_from(index, values.iter().copied());
        model.splice(index..index, values.iter().map(|&v| v as u64));
    }
    assert_eq!(a, model);
}

#[test]
fn test_random_self_insert() {
    fastrand::seed(42);
    for _ in 0..200 {
        let base = (0..fastrand::usize(1..100))
            .map(|_| fastrand::u16(..))
            .collect::<Vec<_>>();
        let mut a = PaddedPodArray::<u16>::from(base.as_slice());
        let start = fastrand::usize(0..base.len());
        let end = fastrand::usize(start..=base.len());
        let index = fastrand::usize(0..=base.len());
        a.insert_from_self(index, start..end);

        let mut expected = PaddedPodArray::<u16>::from(base.as_slice());
        expected.insert_slice(index, &base[start..end]);
        assert_eq!(a, expected);
    }
}
