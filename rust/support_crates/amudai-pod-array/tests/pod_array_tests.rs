use amudai_page_alloc::{HeapAllocator, LimitedAllocator};
use amudai_pod_array::{NoPadding, PaddedPodArray, PodArray, SimdPadding};

#[test]
fn test_insert_bytes() {
    let mut s = b"test_string_abacaba".to_vec();
    let mut chars = PodArray::<u8>::new();
    chars.insert_from(chars.len(), s.iter().copied());
    assert_eq!(chars, s);

    let middle = "insert_in_the_middle";
    let pos = s.len() / 2;
    s = [&s[..pos], middle.as_bytes(), &s[pos..]].concat();
    chars.insert_from(pos, middle.bytes());
    assert_eq!(chars, s);

    // Large enough to force a reallocation during the insert.
    let with_resize = (b'a'..=b'z')
        .cycle()
        .take(chars.capacity() * 2)
        .collect::<Vec<u8>>();
    s = [&with_resize[..], &s[..]].concat();
    chars.insert_from(0, with_resize.iter().copied());
    assert_eq!(chars, s);
}

#[test]
fn test_converting_insert_large() {
    let size = 1 << 20;
    let value = 123u8;

    let mut big = PodArray::<u64>::new();
    let small = PodArray::<u8>::from_elem(size, value);
    assert_eq!(big.len(), 0);
    assert_eq!(small.len(), size);

    big.extend_from(small.iter().copied());
    assert_eq!(big.len(), size);
    assert_eq!(*big.back(), value as u64);

    big.assign_from(small.iter().copied());
    assert_eq!(big.len(), size);
    assert_eq!(*big.back(), value as u64);

    big.insert_from(0, small.iter().copied());
    assert_eq!(big.len(), size * 2);
    assert_eq!(*big.front(), value as u64);
    assert_eq!(*big.back(), value as u64);
    assert!(big.iter().all(|&v| v == 123));
}

#[test]
fn test_cross_width_insert() {
    let mut arr1 = PodArray::<u16>::from([1, 2, 3, 4, 5]);
    let mut arr2 = PodArray::<u32>::from([11, 12]);

    arr1.insert_from(3, arr2.iter().copied());
    assert_eq!(arr1, PodArray::<u16>::from([1, 2, 3, 11, 12, 4, 5]));

    arr2.insert_from(1, arr1.iter().copied());
    assert_eq!(
        arr2,
        PodArray::<u32>::from([11, 1, 2, 3, 11, 12, 4, 5, 12])
    );
}

#[test]
fn test_push_back_raw_many() {
    let mut chars = PodArray::<u8>::new();
    unsafe { chars.push_back_raw_many(5, b"first".as_ptr()) };
    assert_eq!(chars.as_slice(), b"first");
    assert_eq!(chars.len(), 5);
    assert!(chars.capacity() - chars.len() <= 10);

    unsafe { chars.push_back_raw_many(10, b"0123456789".as_ptr()) };
    assert_eq!(chars.len(), 15);
    assert_eq!(chars.as_slice(), b"first0123456789");
}

#[test]
fn test_raw_append_matches_typed_append() {
    let values = (0..5000u32).map(|i| i.wrapping_mul(2654435761)).collect::<Vec<_>>();

    let mut typed = PaddedPodArray::<u32>::new();
    let mut raw = PaddedPodArray::<u32>::new();
    for chunk in values.chunks(333) {
        typed.extend_from_slice(chunk);
        raw.extend_from_raw_bytes(bytemuck::cast_slice(chunk));
    }
    assert_eq!(typed, raw);
    assert_eq!(typed.as_bytes(), raw.as_bytes());
    assert_eq!(raw, values);
}

#[test]
fn test_no_overallocation() {
    let mut chars = PaddedPodArray::<u8>::new();
    let mut capacities = Vec::new();

    let mut prev_capacity = 0;
    for _ in 0..1_000_000 {
        chars.emplace_back();
        if chars.capacity() != prev_capacity {
            prev_capacity = chars.capacity();
            capacities.push(prev_capacity);
        }
    }

    assert_eq!(
        capacities,
        [4065, 8161, 16353, 32737, 65505, 131041, 262113, 524257, 1048545]
    );
}

#[test]
fn test_physical_sizes_are_powers_of_two() {
    let mut a = PaddedPodArray::<u64>::new();
    for i in 0..100_000u64 {
        a.push(i);
        assert!(a.allocated_bytes().is_power_of_two());
        assert_eq!(a.allocated_bytes(), a.capacity() * 8 + 32);
    }

    let mut b = PaddedPodArray::<u8>::new();
    for n in [1usize, 7, 100, 4065, 4066, 70_000] {
        b.extend_from_slice(&vec![1; n]);
        assert!(b.allocated_bytes().is_power_of_two());
    }
}

#[test]
fn test_self_insert_matches_copy() {
    let mut a = PaddedPodArray::<i64>::new();
    a.extend(0..50i64);
    a.shrink_to_fit();

    for (index, start, end) in [(0, 0, 50), (25, 10, 40), (50, 0, 50), (3, 40, 50), (45, 0, 10)] {
        let mut by_self = a.clone();
        by_self.insert_from_self(index, start..end);

        let copy = a[start..end].to_vec();
        let mut by_copy = a.clone();
        by_copy.insert_slice(index, &copy);

        assert_eq!(by_self, by_copy, "index {index}, range {start}..{end}");
    }
}

#[test]
fn test_assign_idempotent() {
    let src = (0..1000u16).collect::<Vec<_>>();
    let mut a = PodArray::<u32>::from([7, 7, 7]);
    a.assign_from(src.iter().copied());
    let first = a.clone();
    a.assign_from(src.iter().copied());
    assert_eq!(a, first);

    let mut b = PaddedPodArray::<u16>::new();
    b.assign_slice(&src);
    b.assign_slice(&src);
    assert_eq!(b, src);
}

#[test]
fn test_failed_growth_keeps_contents() {
    let alloc = LimitedAllocator::new(64 * 1024);
    let mut a = PodArray::<u32, SimdPadding, _>::new_in(&alloc);
    a.extend_from_slice(&[1, 2, 3, 4]);
    let capacity = a.capacity();
    let allocated = a.allocated_bytes();

    let big = vec![9u32; 20_000];
    assert!(a.try_insert_slice(2, &big).unwrap_err().is_out_of_memory());
    assert!(a.try_extend_from_slice(&big).unwrap_err().is_out_of_memory());
    assert!(a.try_assign_slice(&big).unwrap_err().is_out_of_memory());
    assert!(a
        .try_extend_from_raw_bytes(bytemuck::cast_slice(&big))
        .unwrap_err()
        .is_out_of_memory());
    assert!(a.try_reserve(20_000).unwrap_err().is_out_of_memory());
    assert!(a.try_reserve_exact(20_000).unwrap_err().is_out_of_memory());

    assert_eq!(a, [1, 2, 3, 4]);
    assert_eq!(a.capacity(), capacity);
    assert_eq!(a.allocated_bytes(), allocated);
    assert_eq!(alloc.used(), allocated);

    drop(a);
    assert_eq!(alloc.used(), 0);
}

#[test]
#[should_panic(expected = "out of memory")]
fn test_infallible_growth_panics_on_failure() {
    let alloc = LimitedAllocator::new(1024);
    let mut a = PodArray::<u8, NoPadding, _>::new_in(&alloc);
    a.extend_from_slice(&[0; 2000]);
}

#[test]
fn test_heap_allocator_array() {
    let mut a = PaddedPodArray::<f32, HeapAllocator>::new_in(HeapAllocator);
    a.extend_from([1u8, 2, 3]);
    a.insert_from(0, [0.5f64]);
    assert_eq!(a, [0.5, 1.0, 2.0, 3.0]);
    assert_eq!(a.padding().total(), 32);
}

#[test]
fn test_erase_then_reuse_capacity() {
    let mut a = PodArray::<u16>::from_iter(0..100);
    let allocated = a.allocated_bytes();
    a.erase(10..90);
    assert_eq!(a.len(), 20);
    a.extend(100..180u16);
    assert_eq!(a.allocated_bytes(), allocated);
    assert_eq!(a[9], 9);
    assert_eq!(a[10], 90);
    assert_eq!(*a.back(), 179);
}
