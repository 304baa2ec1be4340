use typedbuf::{BufferConfig, TypeTag, TypedBuffer, AUTO_SIZE, DEFAULT_SIZE};

#[test]
fn test_buffer_initialization() {
    let buffer = TypedBuffer::new(5, 4).unwrap();

    assert_eq!(buffer.len(), 0);
    assert!(buffer.is_empty());
    assert_eq!(buffer.capacity(), 5);
    assert_eq!(buffer.element_size(), 4);
    assert_eq!(buffer.type_tag(), TypeTag::Opaque);
    assert!(!buffer.has_renderer());
    assert!(buffer.as_bytes().is_empty());
}

#[test]
fn test_size_constants() {
    assert_eq!(TypedBuffer::with_auto_capacity(8).unwrap().capacity(), AUTO_SIZE);
    assert_eq!(TypedBuffer::with_default_capacity(8).unwrap().capacity(), DEFAULT_SIZE);
    assert_eq!(AUTO_SIZE, 1);
    assert_eq!(DEFAULT_SIZE, 10);
}

#[test]
fn test_config_is_stored_verbatim() {
    let config = BufferConfig::new(2)
        .initial_capacity(3)
        .type_tag(TypeTag::Unsigned);
    let buffer = TypedBuffer::from_config(config).unwrap();

    assert_eq!(buffer.capacity(), 3);
    assert_eq!(buffer.element_size(), 2);
    assert_eq!(buffer.type_tag(), TypeTag::Unsigned);
    assert!(buffer.has_renderer());
}

#[test]
fn test_memory_layout_integrity() {
    let mut buffer = TypedBuffer::new(4, 5).unwrap();

    buffer.append(b"hello").unwrap();
    buffer.append(b"world").unwrap();

    assert_eq!(buffer.get(0).unwrap(), b"hello");
    assert_eq!(buffer.get(1).unwrap(), b"world");
    assert_eq!(buffer.as_bytes(), b"helloworld");
    assert_eq!(buffer.len(), 2);
}

#[test]
fn test_narrow_element_is_zero_padded() {
    let mut buffer = TypedBuffer::new(2, 4).unwrap();

    buffer.append(b"ab").unwrap();
    assert_eq!(buffer.get(0).unwrap(), b"ab\0\0");

    buffer.set(0, b"xyzw").unwrap();
    buffer.set(0, b"q").unwrap();
    assert_eq!(buffer.get(0).unwrap(), b"q\0\0\0");
}

#[test]
fn test_scenario_append_ten_integers() {
    let mut buffer = TypedBuffer::for_type::<i32>(AUTO_SIZE).unwrap();
    assert_eq!(buffer.element_size(), 4);

    for i in 0..10i32 {
        buffer.push(i).unwrap();
    }

    assert_eq!(buffer.len(), 10);
    assert_eq!(buffer.capacity(), 16);
    assert_eq!(buffer.get_value::<i32>(9).unwrap(), 9);
    assert_eq!(buffer.get(9).unwrap(), &9i32.to_ne_bytes());
}

#[test]
fn test_append_doubles_only_when_full() {
    let mut buffer = TypedBuffer::new(2, 1).unwrap();
    let mut seen = Vec::new();

    for i in 0..9u8 {
        let before = buffer.capacity();
        let was_full = buffer.len() == before;
        buffer.append(&[i]).unwrap();
        let expected = if was_full { before * 2 } else { before };
        assert_eq!(buffer.capacity(), expected, "after appending {}", i);
        seen.push(buffer.capacity());
    }

    assert_eq!(seen, vec![2, 2, 4, 4, 8, 8, 8, 8, 16]);
    assert_eq!(buffer.as_bytes(), &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_get_copy_and_set_round_trip() {
    let mut buffer = TypedBuffer::new(4, 3).unwrap();
    buffer.append(b"one").unwrap();
    buffer.append(b"two").unwrap();

    let mut saved = [0u8; 3];
    buffer.get_copy(&mut saved, 0).unwrap();
    buffer.set(1, &saved).unwrap();

    assert_eq!(buffer.get(1).unwrap(), &saved);
    assert_eq!(buffer.get(0).unwrap(), b"one");
}

#[test]
fn test_get_copy_into_larger_destination() {
    let mut buffer = TypedBuffer::new(1, 2).unwrap();
    buffer.append(b"hi").unwrap();

    let mut destination = [0xAAu8; 4];
    buffer.get_copy(&mut destination, 0).unwrap();
    assert_eq!(destination, [b'h', b'i', 0xAA, 0xAA]);
}

#[test]
fn test_typed_values() {
    let mut buffer = TypedBuffer::for_type::<f64>(2).unwrap();
    buffer.push(1.5f64).unwrap();
    buffer.push(-2.0f64).unwrap();
    buffer.insert_value(0.25f64, 1).unwrap();
    buffer.set_value(0, 3.0f64).unwrap();

    assert_eq!(buffer.get_value::<f64>(0).unwrap(), 3.0);
    assert_eq!(buffer.get_value::<f64>(1).unwrap(), 0.25);
    assert_eq!(buffer.get_value::<f64>(2).unwrap(), -2.0);

    // Same width, different interpretation.
    assert_eq!(buffer.get_value::<u64>(1).unwrap(), 0.25f64.to_bits());
}

#[test]
fn test_char_elements() {
    let mut buffer = TypedBuffer::for_type::<char>(DEFAULT_SIZE).unwrap();
    for c in "añ€".chars() {
        buffer.push(c).unwrap();
    }
    assert_eq!(buffer.type_tag(), TypeTag::Char);
    assert_eq!(buffer.get_value::<char>(2).unwrap(), '€');
    assert_eq!(buffer.render_all().unwrap(), "añ€");
}

#[test]
fn test_clear_keeps_capacity() {
    let mut buffer = TypedBuffer::new(1, 1).unwrap();
    for i in 0..5u8 {
        buffer.append(&[i]).unwrap();
    }
    assert_eq!(buffer.capacity(), 8);

    buffer.clear();

    assert!(buffer.is_empty());
    assert_eq!(buffer.capacity(), 8);
    assert!(buffer.get(0).is_err());
}

#[test]
fn test_release_plain_buffer() {
    let mut buffer = TypedBuffer::new(3, 8).unwrap();
    buffer.append(&7u64.to_ne_bytes()).unwrap();
    assert_eq!(buffer.release(), 0);
}
