//! Data-shaping helpers for views: prices, request parameters, image
//! references and utility class lists.

mod class_names;
mod currency;
mod image;
mod query_params;

pub use class_names::{merge_class_names, ClassInput};
pub use currency::format_currency;
pub use image::{normalize_image_ref, ImageSource};
pub use query_params::{build_query_params, to_query_string, ParamValue};
