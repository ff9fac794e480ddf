pub mod color;
pub mod f32;
pub mod io;
pub mod traits;
pub mod u8;

pub use self::color::{ChannelOrder, ColorImageU8, RawImage, COLOR_CHANNELS};
pub use self::f32::ImageF32;
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::{GrayImageU8, ImageU8};
