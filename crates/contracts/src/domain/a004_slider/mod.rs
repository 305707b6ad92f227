pub mod aggregate;

pub use aggregate::{Slider, SliderPayload, SLIDER_IMAGE_FIELD};
