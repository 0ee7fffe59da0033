//! Block processing capability.

/// A unit driven once per audio block by an external scheduler.
///
/// Blocks are only borrowed for the duration of the call. `input` is `None`
/// when the host had no block to deliver, which implementations treat as
/// silence. `output` must be filled completely.
pub trait AudioStream {
    fn update(&mut self, input: Option<&[i16]>, output: &mut [i16]);
}
