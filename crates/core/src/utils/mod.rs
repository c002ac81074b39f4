pub mod debounce;
pub mod format;

pub use debounce::Debouncer;
pub use format::{
    convert_to_usdt, format_rate, format_rub, format_usdt, resolve_image_url, UNAVAILABLE,
};
