#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

//! `TypedBuffer`: a type-erased dynamic array of fixed-size slots.
//!
//! The slot width is chosen when the buffer is created; every element is
//! copied in and out as exactly that many bytes. Elements can be added at the
//! end, inserted before an existing element, removed, read and overwritten by
//! index. An optional per-element renderer turns a range of elements into a
//! single string.
//!
//! This crate is `no_std` compatible; it needs `alloc` for the backing memory.
//!
//! # Growth and Shrink Policy
//!
//! - Adding to a full buffer doubles its capacity before the write.
//! - A removal that leaves `len() <= capacity() / 4` halves the capacity once.
//! - Capacity never falls below one slot.
//!
//! ```
//! # use typedbuf::{TypedBuffer, AUTO_SIZE};
//! let mut buffer = TypedBuffer::for_type::<i32>(AUTO_SIZE).unwrap();
//! for i in 0..10i32 {
//!     buffer.push(i).unwrap();
//! }
//! assert_eq!(buffer.len(), 10);
//! assert_eq!(buffer.capacity(), 16);
//! assert_eq!(buffer.get_value::<i32>(9).unwrap(), 9);
//! ```
//!
//! # Byte-Level Interface
//!
//! The core operations work on byte slices. An element narrower than a slot
//! is zero-padded; a wider one is rejected.
//!
//! ```
//! # use typedbuf::TypedBuffer;
//! let mut buffer = TypedBuffer::new(2, 3).unwrap();
//! buffer.append(b"abc").unwrap();
//! buffer.append(b"xyz").unwrap();
//! buffer.insert(b"mn", 1).unwrap();
//!
//! assert_eq!(buffer.get(1).unwrap(), b"mn\0");
//! assert_eq!(buffer.as_bytes(), b"abcmn\0xyz");
//!
//! let mut copy = [0u8; 3];
//! buffer.get_copy(&mut copy, 2).unwrap();
//! assert_eq!(&copy, b"xyz");
//!
//! buffer.remove(0).unwrap();
//! assert_eq!(buffer.len(), 2);
//! assert!(buffer.append(b"toolong").is_err());
//! ```
//!
//! Inserting requires an existing element at the target index, so the end of
//! the buffer, and an empty buffer, are only reachable through `append`.
//!
//! # Rendering
//!
//! ```
//! # use typedbuf::{BufferConfig, RenderFormat, TypeTag, TypedBuffer};
//! let config = BufferConfig::new(8)
//!     .type_tag(TypeTag::Float)
//!     .format(RenderFormat::from_chars(',', '<', '>'));
//! let mut buffer = TypedBuffer::from_config(config).unwrap();
//! buffer.push(0.5f64).unwrap();
//! buffer.push(2.25f64).unwrap();
//! assert_eq!(buffer.render_all().unwrap(), "<0.5,2.25>");
//! ```
//!
//! # Owned Elements
//!
//! An owning buffer stores boxed values and drops them on `remove`, `clear`,
//! `release` and when the buffer itself is dropped. `take_owned` hands a
//! value back instead.
//!
//! ```
//! # use typedbuf::TypedBuffer;
//! let mut names = TypedBuffer::owning::<String>(4).unwrap();
//! names.push_owned(Box::new(String::from("ada"))).unwrap();
//! names.push_owned(Box::new(String::from("grace"))).unwrap();
//!
//! assert_eq!(names.get_owned::<String>(1).unwrap(), "grace");
//! let first = names.take_owned::<String>(0).unwrap();
//! assert_eq!(*first, "ada");
//! assert_eq!(names.release(), 1);
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns `Result<_, TypedBufferError>` and leaves
//! the buffer unchanged on error. `TypedBufferError::kind` groups the errors
//! into invalid arguments, allocation failures and render failures.

extern crate alloc;

#[macro_use]
mod logging;

mod config;
mod core;
mod element;
mod error;
mod owned;
mod render;
mod slots;

pub use crate::core::TypedBuffer;
pub use config::{BufferConfig, AUTO_SIZE, DEFAULT_SIZE};
pub use element::{render_char, render_float, render_signed, render_unsigned, Element, TypeTag};
pub use error::{ErrorKind, TypedBufferError};
pub use render::{ElementRenderer, RenderFormat, RENDER_INITIAL_CAPACITY};
