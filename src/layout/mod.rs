//! Pixel-layout transcoding between linear index buffers and the packed
//! hardware layouts used by SSI-IMG files.
//!
//! A *linear* buffer holds one palette index per byte, row-major. The packed
//! layouts are:
//!
//! - [`planar`]: four bit-planes, 8 pixels per plane byte, most significant bit
//!   first. Plane *k* carries bit *k* of every index. The planes either span the
//!   whole image ([`planar::decode`]) or repeat per scanline
//!   ([`planar::decode_interleaved`]).
//! - [`cga`]: 2 bits per pixel, 4 pixels per byte, leftmost pixel in the top
//!   bits, with all even scanlines in the first half of the buffer and all odd
//!   scanlines in the second half.
//!
//! The `*_into` functions take pre-sized slices and panic when a length does
//! not match the geometry. The allocating wrappers size their output from the
//! input and only panic on the same geometry preconditions. The
//! [`crate::ssi`] dispatcher validates geometry first and never trips these
//! assertions.

pub mod cga;
pub mod planar;
