//! Color conversions used to bring any decoded image into the RGB layout the
//! convolution engine works on, and into the luminance view the tracer explains.

mod convert;
pub use convert::*;

mod gray;
pub use gray::*;
