use proptest::prelude::*;
use typedbuf::{ErrorKind, TypedBuffer};

fn filled(values: &[u16]) -> TypedBuffer {
    let mut buffer = TypedBuffer::for_type::<u16>(1).unwrap();
    for v in values {
        buffer.push(*v).unwrap();
    }
    buffer
}

fn contents(buffer: &TypedBuffer) -> Vec<u16> {
    (0..buffer.len())
        .map(|i| buffer.get_value::<u16>(i).unwrap())
        .collect()
}

proptest! {
    #[test]
    fn append_grows_by_doubling(values in prop::collection::vec(any::<u16>(), 0..100)) {
        let mut buffer = TypedBuffer::for_type::<u16>(1).unwrap();
        for (n, v) in values.iter().enumerate() {
            let before = buffer.capacity();
            buffer.push(*v).unwrap();
            prop_assert_eq!(buffer.len(), n + 1);
            if n == before {
                prop_assert_eq!(buffer.capacity(), before * 2);
            } else {
                prop_assert_eq!(buffer.capacity(), before);
            }
        }
        prop_assert_eq!(contents(&buffer), values);
    }

    #[test]
    fn insert_matches_vec_insert(
        values in prop::collection::vec(any::<u16>(), 1..64),
        x in any::<u16>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(values.len());
        let mut buffer = filled(&values);
        let mut expected = values.clone();

        buffer.insert_value(x, index).unwrap();
        expected.insert(index, x);

        prop_assert_eq!(contents(&buffer), expected);
    }

    #[test]
    fn remove_matches_vec_remove(
        values in prop::collection::vec(any::<u16>(), 1..64),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(values.len());
        let mut buffer = filled(&values);
        let capacity = buffer.capacity();
        let mut expected = values.clone();

        buffer.remove(index).unwrap();
        expected.remove(index);

        prop_assert_eq!(contents(&buffer), expected.clone());
        if capacity > 1 && expected.len() <= capacity / 4 {
            prop_assert_eq!(buffer.capacity(), capacity / 2);
        } else {
            prop_assert_eq!(buffer.capacity(), capacity);
        }
        prop_assert!(buffer.capacity() >= 1);
        prop_assert!(buffer.len() <= buffer.capacity());
    }

    #[test]
    fn set_then_get_round_trips(
        values in prop::collection::vec(any::<u16>(), 1..32),
        x in any::<u16>(),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(values.len());
        let mut buffer = filled(&values);

        buffer.set(index, &x.to_ne_bytes()).unwrap();
        let mut copy = [0u8; 2];
        buffer.get_copy(&mut copy, index).unwrap();

        prop_assert_eq!(buffer.get(index).unwrap(), &x.to_ne_bytes()[..]);
        prop_assert_eq!(copy, x.to_ne_bytes());
    }

    #[test]
    fn out_of_bounds_access_is_invalid_argument(
        values in prop::collection::vec(any::<u16>(), 0..16),
        past in 0usize..8,
    ) {
        let index = values.len() + past;
        let mut buffer = filled(&values);

        prop_assert_eq!(buffer.get(index).unwrap_err().kind(), ErrorKind::InvalidArgument);
        prop_assert_eq!(buffer.remove(index).unwrap_err().kind(), ErrorKind::InvalidArgument);
        prop_assert_eq!(buffer.set(index, &[0, 0]).unwrap_err().kind(), ErrorKind::InvalidArgument);
        prop_assert_eq!(buffer.insert(&[0, 0], index).unwrap_err().kind(), ErrorKind::InvalidArgument);
        prop_assert_eq!(contents(&buffer), values);
    }
}
