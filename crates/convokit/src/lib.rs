#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use convokit_image as image;

#[doc(inline)]
pub use convokit_imgproc as imgproc;

#[doc(inline)]
pub use convokit_io as io;
